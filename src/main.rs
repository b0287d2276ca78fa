use alz_audit_executor::args::Args;
use alz_audit_executor::azure::{AzCli, AzCliGraph};
use alz_audit_executor::error::AuditError;
use alz_audit_executor::output::render_summary;
use alz_audit_executor::processing::LogObserver;
use alz_audit_executor::{logging, run};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = Args::parse();
    if let Err(e) = logging::init(args.verbose) {
        eprintln!("Error initializing log4rs: {e}");
        return ExitCode::FAILURE;
    }

    log::info!("{}", "=".repeat(60));
    log::info!("ALZ Snapshot Audit - Query Executor");
    log::info!("{}", "=".repeat(60));

    let config = args.run_config();
    let cli = AzCli::new(&config.az_path, config.timeout);
    let filter = args.account_filter();

    let result = match AzCliGraph::connect(cli).await {
        Ok(client) => {
            run(
                &client,
                &args.catalog_source(),
                filter.as_deref(),
                &config,
                &LogObserver,
            )
            .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => {
            log::info!("{}", "=".repeat(60));
            log::info!("EXECUTION SUMMARY");
            log::info!("{}", "=".repeat(60));
            print!("{}", render_summary(&summary));
            log::info!("Results saved to: {}", config.export.output_dir.display());
            if summary.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            report_fatal(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_fatal(e: &AuditError) {
    log::error!("{} {e}", "FATAL".on_red());
    if let Some(hint) = e.hint() {
        log::error!("{hint}");
    }
}
