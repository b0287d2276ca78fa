//! Execution summary: the persisted record of what a batch did.

use super::{AccountSet, QueryDefinition, QueryResult};
use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-query entry of the summary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct QueryReport {
    /// Key of the entry in the `queries` map.
    #[serde(skip)]
    pub name: String,
    pub description: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
    pub count: usize,
    #[serde(default)]
    pub pages: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
    #[serde(default)]
    pub output_files: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Export formats that failed while the query itself succeeded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl QueryReport {
    pub fn skipped(def: &QueryDefinition) -> Self {
        QueryReport {
            name: def.name.clone(),
            description: def.description.clone(),
            skipped: true,
            ..Default::default()
        }
    }

    pub fn from_result(def: &QueryDefinition, result: &QueryResult) -> Self {
        QueryReport {
            name: def.name.clone(),
            description: def.description.clone(),
            success: result.success(),
            count: result.count(),
            pages: result.pages(),
            total_records: result.success().then(|| result.total_records()),
            error: result.error().map(str::to_string),
            ..Default::default()
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.success && !self.skipped
    }
}

/// Everything a batch did, in catalog order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// UTC start of the batch, see [`crate::config::TIMESTAMP_FORMAT`].
    pub execution_time: String,
    pub subscriptions: AccountSet,
    pub total_queries: usize,
    pub successful: usize,
    pub failed: usize,
    #[serde(default)]
    pub skipped: usize,
    #[serde(with = "reports_by_name")]
    pub queries: Vec<QueryReport>,
}

impl ExecutionSummary {
    pub fn new(execution_time: String, subscriptions: AccountSet, total_queries: usize) -> Self {
        ExecutionSummary {
            execution_time,
            subscriptions,
            total_queries,
            successful: 0,
            failed: 0,
            skipped: 0,
            queries: Vec::with_capacity(total_queries),
        }
    }

    /// Append a finished entry and bump the matching counter.
    pub fn record(&mut self, report: QueryReport) {
        if report.skipped {
            self.skipped += 1;
        } else if report.success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.queries.push(report);
    }

    pub fn get(&self, name: &str) -> Option<&QueryReport> {
        self.queries.iter().find(|r| r.name == name)
    }

    pub fn failures(&self) -> impl Iterator<Item = &QueryReport> {
        self.queries.iter().filter(|r| r.is_failure())
    }

    /// True when no entry failed. Skips do not count as failures.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Reconstruct a summary from its persisted JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut de = serde_json::Deserializer::from_str(&json);
        serde_path_to_error::deserialize(&mut de).map_err(|e| AuditError::SummaryParse {
            path: path.to_path_buf(),
            at: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }
}

/// Serialize reports as a JSON object keyed by query name, keeping order.
mod reports_by_name {
    use super::QueryReport;
    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        reports: &[QueryReport],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(reports.iter().map(|r| (&r.name, r)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<QueryReport>, D::Error> {
        struct ReportsVisitor;

        impl<'de> Visitor<'de> for ReportsVisitor {
            type Value = Vec<QueryReport>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of query name to report")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut reports = Vec::new();
                while let Some((name, mut report)) = map.next_entry::<String, QueryReport>()? {
                    report.name = name;
                    reports.push(report);
                }
                Ok(reports)
            }
        }

        deserializer.deserialize_map(ReportsVisitor)
    }
}
