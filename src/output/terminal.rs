//! Terminal report of a finished batch.

use crate::models::{ExecutionSummary, QueryReport};
use colored::Colorize;

/// Pad a value on the right to `width` characters.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    format!("{value_str:<width$}")
}

fn status(report: &QueryReport) -> colored::ColoredString {
    if report.skipped {
        "SKIPPED".yellow()
    } else if report.success {
        "OK".green()
    } else {
        "FAILED".on_red()
    }
}

/// Multi-line report: one row per query, then counts, then failures.
pub fn render_summary(summary: &ExecutionSummary) -> String {
    let width = summary
        .queries
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max(5);

    let mut out = String::new();
    for report in &summary.queries {
        out.push_str(&format!(
            "  {name} {status:<8} {count:>6} records  {files} file(s)\n",
            name = format_field(&report.name, width),
            status = status(report),
            count = report.count,
            files = report.output_files.len(),
        ));
        for warning in &report.warnings {
            out.push_str(&format!("      warning: {warning}\n"));
        }
    }

    out.push_str(&format!(
        "Total queries: {}\nSuccessful: {}\nFailed: {}\nSkipped: {}\n",
        summary.total_queries, summary.successful, summary.failed, summary.skipped
    ));

    if summary.failed > 0 {
        out.push_str("Failed queries:\n");
        for report in summary.failures() {
            out.push_str(&format!(
                "  - {}: {}\n",
                report.name,
                report.error.as_deref().unwrap_or("Unknown")
            ));
        }
    }
    out
}
