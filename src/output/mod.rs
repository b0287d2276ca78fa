//! Writing query results and reports.
//!
//! - [`json`] - JSON array export and atomic writes
//! - [`csv`] - flattened CSV export
//! - [`terminal`] - end-of-run report

mod csv;
mod json;
mod terminal;

pub use csv::{export_csv, records_to_csv};
pub use json::{export_json, write_atomic, write_json_atomic};
pub use terminal::{format_field, render_summary};

use crate::config::ExportConfig;
use crate::error::{AuditError, Result};
use crate::models::QueryResult;
use std::path::PathBuf;

/// Files written for one query and the formats that failed.
#[derive(Debug, Default)]
pub struct ExportOutcome {
    pub files: Vec<PathBuf>,
    pub failures: Vec<AuditError>,
}

/// Writes successful query results into the output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Exporter { config }
    }

    /// Create the output directory and its parents.
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        Ok(())
    }

    /// Write each requested format of `result` as `<stem>.<ext>`.
    ///
    /// Formats fail independently: a CSV failure never removes the JSON file
    /// and the other way round. CSV is not attempted for an empty result.
    pub fn export(&self, result: &QueryResult, file_stem: &str) -> ExportOutcome {
        let mut outcome = ExportOutcome::default();
        let format = self.config.format;

        if format.json() {
            let path = self.path_for(file_stem, "json");
            match export_json(result.records(), &path) {
                Ok(()) => outcome.files.push(path),
                Err(e) => outcome.failures.push(AuditError::export("json", e.to_string())),
            }
        }

        if format.csv() && !result.records().is_empty() {
            let path = self.path_for(file_stem, "csv");
            match export_csv(result.records(), &path) {
                Ok(()) => outcome.files.push(path),
                Err(e @ AuditError::Export { .. }) => outcome.failures.push(e),
                Err(e) => outcome.failures.push(AuditError::export("csv", e.to_string())),
            }
        }

        outcome
    }

    fn path_for(&self, file_stem: &str, ext: &str) -> PathBuf {
        self.config.output_dir.join(format!("{file_stem}.{ext}"))
    }
}
