//! Integration tests for alz-audit-executor
//!
//! These tests drive the full workflow from subscription resolution to the
//! persisted execution summary against the mock Resource Graph client.

use alz_audit_executor::azure::{MockGraphClient, MockPage};
use alz_audit_executor::catalog::CatalogSource;
use alz_audit_executor::config::{ExportConfig, ExportFormat, RunConfig, SUMMARY_FILE_NAME};
use alz_audit_executor::error::AuditError;
use alz_audit_executor::models::ExecutionSummary;
use alz_audit_executor::processing::NullObserver;
use alz_audit_executor::run;
use serde_json::{json, Value};
use std::path::Path;

fn config(dir: &Path) -> RunConfig {
    RunConfig {
        export: ExportConfig::new(dir, ExportFormat::Both),
        ..Default::default()
    }
}

fn write_catalog(dir: &Path, doc: &Value) -> std::path::PathBuf {
    let path = dir.join("queries.json");
    std::fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn test_end_to_end_one_success_one_failure() {
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("exports");
    let catalog = write_catalog(
        work.path(),
        &json!({
            "inv": {"query": "resources | project name", "description": "Inventory"},
            "bad": {"query": "resources | nonsense", "description": "Broken"}
        }),
    );
    let client = MockGraphClient::new()
        .with_pages(
            "resources | project name",
            vec![
                MockPage::records(vec![json!({"name": "vm-01"})], Some("page-2")),
                MockPage::records(vec![json!({"name": "vm-02"})], None),
            ],
        )
        .with_pages(
            "resources | nonsense",
            vec![MockPage::fail("(BadRequest) Query is invalid")],
        );
    let filter = vec!["sub-a".to_string()];

    let summary = run(
        &client,
        &CatalogSource::File(catalog),
        Some(filter.as_slice()),
        &config(&out),
        &NullObserver,
    )
    .await
    .expect("batch should complete");

    assert_eq!(summary.total_queries, 2);
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 1);
    assert!(!summary.all_succeeded());

    let inv = summary.get("inv").unwrap();
    assert_eq!(inv.count, 2);
    assert_eq!(inv.pages, 2);
    assert_eq!(inv.output_files, vec![out.join("inv.json"), out.join("inv.csv")]);

    let bad = summary.get("bad").unwrap();
    assert!(bad.error.as_deref().unwrap().contains("BadRequest"));
    assert!(bad.output_files.is_empty());
    assert!(!out.join("bad.json").exists());

    // Every page went to the explicit subscription.
    assert!(client
        .requests()
        .iter()
        .all(|r| r.subscriptions == vec!["sub-a".to_string()]));

    // The persisted summary is enough to reconstruct the run.
    let persisted: Value = serde_json::from_str(
        &std::fs::read_to_string(out.join(SUMMARY_FILE_NAME)).unwrap(),
    )
    .unwrap();
    assert_eq!(persisted["total_queries"], 2);
    assert_eq!(persisted["successful"], 1);
    assert_eq!(persisted["failed"], 1);
    assert_eq!(persisted["subscriptions"], json!(["sub-a"]));
    assert_eq!(persisted["queries"]["inv"]["count"], 2);
    assert_eq!(persisted["queries"]["inv"]["output_files"].as_array().unwrap().len(), 2);
    assert!(persisted["queries"]["bad"]["error"].is_string());
    assert_eq!(
        ExecutionSummary::load(&out.join(SUMMARY_FILE_NAME)).unwrap(),
        summary
    );

    let exported: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("inv.json")).unwrap()).unwrap();
    assert_eq!(exported, json!([{"name": "vm-01"}, {"name": "vm-02"}]));
    assert_eq!(
        std::fs::read_to_string(out.join("inv.csv")).unwrap(),
        "name\nvm-01\nvm-02\n"
    );
}

#[tokio::test]
async fn test_grouped_catalog_uses_listed_accounts() {
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("exports");
    let catalog = write_catalog(
        work.path(),
        &json!({"net": {"queries": [{"name": "q1", "query": "x"}]}}),
    );
    let client = MockGraphClient::new()
        .with_accounts(["sub-1", "sub-2"])
        .with_pages("x", vec![MockPage::records(vec![], None)]);

    let summary = run(
        &client,
        &CatalogSource::File(catalog),
        None,
        &config(&out),
        &NullObserver,
    )
    .await
    .unwrap();

    assert!(summary.all_succeeded());
    assert_eq!(summary.subscriptions.ids(), &["sub-1", "sub-2"]);
    let q1 = summary.get("q1").unwrap();
    assert_eq!(q1.count, 0);
    // Empty result: JSON file with an empty array, no CSV.
    assert_eq!(q1.output_files, vec![out.join("q1.json")]);
    assert!(!out.join("q1.csv").exists());
}

#[tokio::test]
async fn test_no_accounts_is_fatal_and_writes_nothing() {
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("exports");
    let client = MockGraphClient::new();

    let err = run(
        &client,
        &CatalogSource::Builtin,
        None,
        &config(&out),
        &NullObserver,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AuditError::NoAccounts));
    assert!(err.is_fatal());
    assert!(!out.exists());
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn test_malformed_catalog_is_fatal() {
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("exports");
    let path = work.path().join("queries.json");
    std::fs::write(&path, "{\"inv\": ").unwrap();
    let filter = vec!["sub-a".to_string()];

    let err = run(
        &MockGraphClient::new(),
        &CatalogSource::File(path),
        Some(filter.as_slice()),
        &config(&out),
        &NullObserver,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AuditError::CatalogParse { .. }));
    assert!(!out.join(SUMMARY_FILE_NAME).exists());
}

#[tokio::test]
async fn test_builtin_catalog_failures_are_isolated() {
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("exports");
    // No scripts: every built-in query fails at the API.
    let client = MockGraphClient::new().with_accounts(["sub-a"]);

    let summary = run(
        &client,
        &CatalogSource::Builtin,
        None,
        &config(&out),
        &NullObserver,
    )
    .await
    .unwrap();

    assert!(summary.total_queries > 0);
    assert_eq!(summary.failed, summary.total_queries);
    assert_eq!(client.requests().len(), summary.total_queries);
    assert!(out.join(SUMMARY_FILE_NAME).exists());
}

#[tokio::test]
async fn test_unrecognized_catalog_runs_empty_batch() {
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("exports");
    let catalog = write_catalog(work.path(), &json!({"a": "not a query"}));
    let filter = vec!["sub-a".to_string()];

    let summary = run(
        &MockGraphClient::new(),
        &CatalogSource::File(catalog),
        Some(filter.as_slice()),
        &config(&out),
        &NullObserver,
    )
    .await
    .unwrap();

    assert_eq!(summary.total_queries, 0);
    assert!(summary.all_succeeded());
}
