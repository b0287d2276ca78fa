//! Query execution logic.
//!
//! - [`runner`] - paginated execution of one query
//! - [`batch`] - catalog-wide execution with failure isolation
//! - [`observer`] - progress events

mod batch;
mod observer;
mod runner;

pub use batch::BatchExecutor;
pub use observer::{BatchObserver, LogObserver, NullObserver};
pub use runner::QueryRunner;
