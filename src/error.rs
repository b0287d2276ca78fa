//! Error types for the audit executor.
//!
//! Fatal errors stop the run before any query executes. Everything else is
//! isolated to one catalog entry (or one export format of an entry) and ends
//! up in the execution summary.

use std::path::PathBuf;
use thiserror::Error;

/// Hint printed next to fatal credential problems.
pub const LOGIN_HINT: &str = "Ensure you are logged in: az login";

#[derive(Error, Debug)]
pub enum AuditError {
    /// Credential could not be established (az not logged in, az missing, ...).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Listing returned zero enabled subscriptions and none were supplied.
    #[error("No enabled subscriptions visible to the current credential")]
    NoAccounts,

    /// Query config file could not be read.
    #[error("Cannot read query config {}: {source}", path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Query config file is not valid JSON.
    #[error("Invalid query config {}: {source}", path.display())]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An external command exited non-zero or could not be spawned.
    #[error("Command failed: {0}")]
    Command(String),

    /// An external command did not finish within the configured timeout.
    #[error("Timed out after {secs}s: {what}")]
    Timeout { what: String, secs: u64 },

    /// The Resource Graph response could not be decoded.
    #[error("Unexpected Resource Graph response at '{path}': {message}")]
    GraphResponse { path: String, message: String },

    /// A query failed at the API level (bad KQL, authorization, ...).
    #[error("Query execution failed: {0}")]
    QueryExecution(String),

    /// One export format of one query could not be written.
    #[error("{format} export failed: {message}")]
    Export {
        format: &'static str,
        message: String,
    },

    /// A persisted execution summary could not be decoded.
    #[error("Invalid execution summary {} at '{at}': {message}", path.display())]
    SummaryParse {
        path: PathBuf,
        at: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AuditError {
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    pub fn export(format: &'static str, msg: impl Into<String>) -> Self {
        Self::Export {
            format,
            message: msg.into(),
        }
    }

    /// True for errors that abort the whole run before the batch starts.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_)
                | Self::NoAccounts
                | Self::CatalogRead { .. }
                | Self::CatalogParse { .. }
        )
    }

    /// Remediation hint shown to the user, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Authentication(_) | Self::NoAccounts => Some(LOGIN_HINT),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(AuditError::Authentication("no token".into()).is_fatal());
        assert!(AuditError::NoAccounts.is_fatal());
        assert!(!AuditError::QueryExecution("BadRequest".into()).is_fatal());
        assert!(!AuditError::export("csv", "mixed rows").is_fatal());
    }

    #[test]
    fn test_hint_only_for_credential_errors() {
        assert_eq!(AuditError::NoAccounts.hint(), Some(LOGIN_HINT));
        assert_eq!(AuditError::command("boom").hint(), None);
    }

    #[test]
    fn test_display_export() {
        let err = AuditError::export("csv", "record 3 is not an object");
        assert_eq!(err.to_string(), "csv export failed: record 3 is not an object");
    }

    #[test]
    fn test_display_timeout() {
        let err = AuditError::Timeout {
            what: "az graph query".into(),
            secs: 30,
        };
        assert_eq!(err.to_string(), "Timed out after 30s: az graph query");
    }
}
