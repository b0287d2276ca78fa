//! Run configuration and shared constants.

use chrono_tz::Tz;
use std::path::PathBuf;
use std::time::Duration;

/// Resource Graph rejects page sizes above this.
pub const MAX_PAGE_SIZE: usize = 1000;
/// Records kept per query before pagination stops.
pub const DEFAULT_RESULT_CAP: usize = 10_000;
pub const DEFAULT_OUTPUT_DIR: &str = "./alz-audit-exports";
pub const SUMMARY_FILE_NAME: &str = "execution_summary.json";
/// `execution_time` format in the summary (UTC, microsecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_AZ_PATH: &str = "az";

/// Which files the exporter writes for each successful query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
    #[default]
    Both,
}

impl ExportFormat {
    pub fn json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    pub fn csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Both => "both",
        };
        f.write_str(s)
    }
}

/// Where and how results are written.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub format: ExportFormat,
}

impl ExportConfig {
    pub fn new(output_dir: impl Into<PathBuf>, format: ExportFormat) -> Self {
        ExportConfig {
            output_dir: output_dir.into(),
            format,
        }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE_NAME)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR, ExportFormat::default())
    }
}

/// Knobs for one batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub export: ExportConfig,
    pub result_cap: usize,
    /// Pause between page requests, for sharing the per-credential rate limit.
    pub page_pause: Duration,
    /// Per-command timeout for every az invocation.
    pub timeout: Duration,
    /// Display timezone for the run banner. The summary is always UTC.
    pub timezone: Tz,
    pub az_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            export: ExportConfig::default(),
            result_cap: DEFAULT_RESULT_CAP,
            page_pause: Duration::ZERO,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            timezone: Tz::UTC,
            az_path: PathBuf::from(DEFAULT_AZ_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_flags() {
        assert!(ExportFormat::Both.json() && ExportFormat::Both.csv());
        assert!(ExportFormat::Json.json() && !ExportFormat::Json.csv());
        assert!(!ExportFormat::Csv.json() && ExportFormat::Csv.csv());
    }

    #[test]
    fn test_summary_path() {
        let cfg = ExportConfig::new("/tmp/out", ExportFormat::Json);
        assert_eq!(
            cfg.summary_path(),
            PathBuf::from("/tmp/out/execution_summary.json")
        );
    }

    #[test]
    fn test_run_config_defaults() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.result_cap, 10_000);
        assert_eq!(cfg.export.format, ExportFormat::Both);
        assert_eq!(cfg.page_pause, Duration::ZERO);
    }
}
