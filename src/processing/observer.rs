//! Progress events emitted while a batch runs.

use crate::error::AuditError;
use crate::models::{AccountSet, ExecutionSummary, QueryDefinition};
use colored::Colorize;
use std::path::Path;

/// Receives batch progress. Every method defaults to doing nothing.
pub trait BatchObserver: Send + Sync {
    fn batch_started(&self, _total: usize, _accounts: &AccountSet) {}
    /// `index` counts from 1.
    fn query_started(&self, _index: usize, _total: usize, _def: &QueryDefinition) {}
    fn query_skipped(&self, _def: &QueryDefinition) {}
    fn query_failed(&self, _def: &QueryDefinition, _error: &str) {}
    fn file_exported(&self, _def: &QueryDefinition, _path: &Path, _count: usize) {}
    fn export_failed(&self, _def: &QueryDefinition, _error: &AuditError) {}
    fn batch_finished(&self, _summary: &ExecutionSummary, _summary_path: &Path) {}
}

/// Observer that writes progress to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl BatchObserver for LogObserver {
    fn batch_started(&self, total: usize, accounts: &AccountSet) {
        log::info!(
            "Queries to execute: {total} across {} subscription(s)",
            accounts.len()
        );
    }

    fn query_started(&self, index: usize, total: usize, def: &QueryDefinition) {
        log::info!("[{index}/{total}] Executing: {}", def.name);
    }

    fn query_skipped(&self, def: &QueryDefinition) {
        log::warn!("Skipping {}: No query text", def.name);
    }

    fn query_failed(&self, _def: &QueryDefinition, error: &str) {
        log::error!("  → {}: {error}", "Failed".red());
    }

    fn file_exported(&self, _def: &QueryDefinition, path: &Path, count: usize) {
        let file = path.file_name().unwrap_or(path.as_os_str());
        log::info!("  → Exported {count} records to {}", file.to_string_lossy());
    }

    fn export_failed(&self, _def: &QueryDefinition, error: &AuditError) {
        log::warn!("  → {error}");
    }

    fn batch_finished(&self, _summary: &ExecutionSummary, summary_path: &Path) {
        log::info!("Execution summary saved to {}", summary_path.display());
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BatchObserver for NullObserver {}
