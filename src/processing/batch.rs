//! Batch execution of a query catalog.
//!
//! Queries run one after another in catalog order. A failing query is
//! recorded and the batch moves on; only setup (output directory) and the
//! final summary write can fail the batch itself.

use super::observer::BatchObserver;
use super::runner::QueryRunner;
use crate::azure::GraphClient;
use crate::config::{RunConfig, TIMESTAMP_FORMAT};
use crate::error::Result;
use crate::models::{AccountSet, ExecutionSummary, QueryCatalog, QueryDefinition, QueryReport};
use crate::output::{write_json_atomic, Exporter};

pub struct BatchExecutor<'a, C: ?Sized> {
    client: &'a C,
    config: &'a RunConfig,
    observer: &'a dyn BatchObserver,
}

impl<'a, C> BatchExecutor<'a, C>
where
    C: GraphClient + ?Sized,
{
    pub fn new(client: &'a C, config: &'a RunConfig, observer: &'a dyn BatchObserver) -> Self {
        BatchExecutor {
            client,
            config,
            observer,
        }
    }

    /// Run every catalog entry and persist `execution_summary.json` last.
    ///
    /// Per-query files are written as each query finishes, so an aborted run
    /// leaves its exports on disk without a summary.
    pub async fn run_batch(
        &self,
        catalog: &QueryCatalog,
        accounts: &AccountSet,
    ) -> Result<ExecutionSummary> {
        let exporter = Exporter::new(self.config.export.clone());
        exporter.prepare()?;

        let runner = QueryRunner::new(self.client)
            .with_result_cap(self.config.result_cap)
            .with_page_pause(self.config.page_pause);

        let started = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let mut summary = ExecutionSummary::new(started, accounts.clone(), catalog.len());
        self.observer.batch_started(catalog.len(), accounts);

        for (i, def) in catalog.iter().enumerate() {
            self.observer.query_started(i + 1, catalog.len(), def);
            let report = if def.has_query_text() {
                self.run_query(&runner, &exporter, def, accounts).await
            } else {
                self.observer.query_skipped(def);
                QueryReport::skipped(def)
            };
            summary.record(report);
        }

        let summary_path = self.config.export.summary_path();
        write_json_atomic(&summary_path, &summary)?;
        self.observer.batch_finished(&summary, &summary_path);
        Ok(summary)
    }

    async fn run_query(
        &self,
        runner: &QueryRunner<'_, C>,
        exporter: &Exporter,
        def: &QueryDefinition,
        accounts: &AccountSet,
    ) -> QueryReport {
        let result = runner.run(&def.query, accounts).await;
        let mut report = QueryReport::from_result(def, &result);

        match result.error() {
            None => {
                let outcome = exporter.export(&result, &def.output_file);
                for path in &outcome.files {
                    self.observer.file_exported(def, path, result.count());
                }
                for failure in &outcome.failures {
                    self.observer.export_failed(def, failure);
                }
                report.output_files = outcome.files;
                report.warnings = outcome.failures.iter().map(|e| e.to_string()).collect();
            }
            Some(error) => self.observer.query_failed(def, error),
        }
        report
    }
}
