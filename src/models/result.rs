//! Outcome of running one query across all pages.

use serde_json::Value;

/// Aggregated result of one query. Failure is all-or-nothing: a failed
/// result never carries records, even if some pages were fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    records: Vec<Value>,
    pages: usize,
    total_records: Option<u64>,
    error: Option<String>,
}

impl QueryResult {
    pub fn succeeded(records: Vec<Value>, pages: usize, total_records: Option<u64>) -> Self {
        QueryResult {
            records,
            pages,
            total_records,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>, pages: usize) -> Self {
        QueryResult {
            records: Vec::new(),
            pages,
            total_records: None,
            error: Some(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Pages requested, including the one that failed.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Total reported by the API, falling back to the accumulated count.
    ///
    /// When the API omits its total this equals `count()`, so a result
    /// truncated at the cap is indistinguishable from a complete one.
    pub fn total_records(&self) -> u64 {
        self.total_records.unwrap_or(self.records.len() as u64)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
