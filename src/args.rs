//! Command-line arguments.
//!
//! Every option can also come from an `ALZ_AUDIT_*` environment variable
//! (a `.env` file is loaded first).

use crate::azure::parse_account_filter;
use crate::catalog::CatalogSource;
use crate::config::{
    ExportConfig, ExportFormat, RunConfig, DEFAULT_AZ_PATH, DEFAULT_OUTPUT_DIR,
    DEFAULT_RESULT_CAP, DEFAULT_TIMEOUT_SECS,
};
use chrono_tz::Tz;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// ALZ Snapshot Audit - Azure Resource Graph query executor.
#[derive(Parser, Debug)]
#[command(name = "alz-audit-executor")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Queries JSON config file (uses built-in queries if not provided)
    #[arg(short, long, value_name = "PATH", env = "ALZ_AUDIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR, env = "ALZ_AUDIT_OUTPUT")]
    pub output: PathBuf,

    /// Comma-separated subscription IDs to query (default: all enabled)
    #[arg(short, long, value_name = "IDS", env = "ALZ_AUDIT_SUBSCRIPTIONS")]
    pub subscriptions: Option<String>,

    /// Export format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Both, env = "ALZ_AUDIT_FORMAT")]
    pub format: ExportFormat,

    /// Execute a single ad-hoc query instead of a catalog
    #[arg(short, long, value_name = "KQL")]
    pub query: Option<String>,

    /// Name and output file stem for the ad-hoc query
    #[arg(long, default_value = "adhoc_query")]
    pub query_name: String,

    /// Maximum records kept per query
    #[arg(long, default_value_t = DEFAULT_RESULT_CAP, value_parser = parse_result_cap, env = "ALZ_AUDIT_MAX_RESULTS")]
    pub max_results: usize,

    /// Timeout in seconds for each az invocation
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "ALZ_AUDIT_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Pause between page requests in milliseconds
    #[arg(long, default_value_t = 0, env = "ALZ_AUDIT_PAGE_PAUSE_MS")]
    pub page_pause_ms: u64,

    /// IANA timezone used to display the run start time
    #[arg(long, default_value = "UTC", value_parser = parse_timezone, env = "ALZ_AUDIT_TIMEZONE")]
    pub timezone: Tz,

    /// Path to the az executable
    #[arg(long, default_value = DEFAULT_AZ_PATH, env = "ALZ_AUDIT_AZ_PATH")]
    pub az_path: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            export: ExportConfig::new(&self.output, self.format),
            result_cap: self.max_results,
            page_pause: Duration::from_millis(self.page_pause_ms),
            timeout: Duration::from_secs(self.timeout_secs),
            timezone: self.timezone,
            az_path: self.az_path.clone(),
        }
    }

    /// Ad-hoc query beats a config file, which beats the built-in catalog.
    pub fn catalog_source(&self) -> CatalogSource {
        match (&self.query, &self.config) {
            (Some(query), _) => CatalogSource::AdHoc {
                name: self.query_name.clone(),
                query: query.clone(),
            },
            (None, Some(path)) => CatalogSource::File(path.clone()),
            (None, None) => CatalogSource::Builtin,
        }
    }

    pub fn account_filter(&self) -> Option<Vec<String>> {
        self.subscriptions.as_deref().map(parse_account_filter)
    }
}

fn parse_result_cap(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_timezone(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>()
        .map_err(|e| format!("unknown timezone '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("alz-audit-executor").chain(args.iter().copied()))
            .expect("Error parsing args")
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(args.format, ExportFormat::Both);
        assert_eq!(args.max_results, DEFAULT_RESULT_CAP);
        assert_eq!(args.catalog_source(), CatalogSource::Builtin);
        assert_eq!(args.account_filter(), None);
    }

    #[test]
    fn test_adhoc_query_wins_over_config() {
        let args = parse(&["-c", "queries.json", "-q", "resources | count", "--query-name", "cnt"]);
        assert_eq!(
            args.catalog_source(),
            CatalogSource::AdHoc {
                name: "cnt".into(),
                query: "resources | count".into()
            }
        );
    }

    #[test]
    fn test_config_file_source() {
        let args = parse(&["--config", "queries.json"]);
        assert_eq!(args.catalog_source(), CatalogSource::File("queries.json".into()));
    }

    #[test]
    fn test_subscription_filter_and_format() {
        let args = parse(&["-s", "sub1, sub2", "-f", "csv"]);
        assert_eq!(
            args.account_filter(),
            Some(vec!["sub1".to_string(), "sub2".to_string()])
        );
        assert_eq!(args.run_config().export.format, ExportFormat::Csv);
    }

    #[test]
    fn test_run_config_values() {
        let args = parse(&[
            "--max-results",
            "250",
            "--timeout-secs",
            "30",
            "--page-pause-ms",
            "500",
            "--timezone",
            "Pacific/Auckland",
        ]);
        let cfg = args.run_config();
        assert_eq!(cfg.result_cap, 250);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.page_pause, Duration::from_millis(500));
        assert_eq!(cfg.timezone, chrono_tz::Pacific::Auckland);
    }

    #[test]
    fn test_rejects_zero_cap_and_bad_timezone() {
        let base = "alz-audit-executor";
        assert!(Args::try_parse_from([base, "--max-results", "0"]).is_err());
        assert!(Args::try_parse_from([base, "--timezone", "Mars/Olympus"]).is_err());
        assert!(Args::try_parse_from([base, "--format", "xlsx"]).is_err());
    }
}
