//! Domain models for the audit executor.
//!
//! - [`AccountSet`] - subscriptions a batch is scoped to
//! - [`QueryDefinition`] and [`QueryCatalog`] - normalized query catalog
//! - [`QueryResult`] - aggregated pages of one query
//! - [`ExecutionSummary`] and [`QueryReport`] - persisted run report

mod account;
mod query;
mod result;
mod summary;

pub use account::AccountSet;
pub use query::{default_file_stem, QueryCatalog, QueryDefinition};
pub use result::QueryResult;
pub use summary::{ExecutionSummary, QueryReport};
