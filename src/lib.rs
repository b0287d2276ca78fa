//! ALZ audit query executor.
//!
//! Runs a catalog of Azure Resource Graph queries across a set of
//! subscriptions, exports each result as JSON/CSV and writes an
//! `execution_summary.json` describing what succeeded, failed or was skipped.
//!
//! # Module structure
//!
//! - [`azure`] - az CLI, Resource Graph client, subscription resolution
//! - [`catalog`] - built-in queries and config file normalization
//! - [`models`] - domain types
//! - [`processing`] - paginated runner and batch orchestration
//! - [`output`] - JSON/CSV export and terminal report

pub mod args;
pub mod azure;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;

use azure::{resolve_accounts, GraphClient};
use catalog::CatalogSource;
use config::RunConfig;
use error::Result;
use models::ExecutionSummary;
use processing::{BatchExecutor, BatchObserver};

/// Resolve subscriptions, load the catalog and run the batch.
///
/// Credential, subscription and catalog problems are returned before any
/// query runs. Once the batch starts only output directory or summary write
/// errors are returned; query failures live in the summary.
pub async fn run<C>(
    client: &C,
    source: &CatalogSource,
    account_filter: Option<&[String]>,
    config: &RunConfig,
    observer: &dyn BatchObserver,
) -> Result<ExecutionSummary>
where
    C: GraphClient + ?Sized,
{
    let accounts = resolve_accounts(client, account_filter).await?;
    let catalog = source.load()?;

    let local_start = chrono::Utc::now().with_timezone(&config.timezone);
    log::info!(
        "Run started {} ({})",
        local_start.format("%Y-%m-%d %H:%M:%S"),
        config.timezone
    );
    log::info!("Output directory: {}", config.export.output_dir.display());
    log::info!("Export format: {}", config.export.format);

    BatchExecutor::new(client, config, observer)
        .run_batch(&catalog, &accounts)
        .await
}
