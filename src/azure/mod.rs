//! Azure CLI and Resource Graph interaction.
//!
//! - [`cli`] - `az` command execution with timeout
//! - [`graph`] - Resource Graph pages and the [`GraphClient`] seam
//! - [`accounts`] - subscription resolution
//! - [`mock`] - scripted client for tests

mod accounts;
mod cli;
mod graph;
pub mod mock;

pub use accounts::{parse_account_filter, resolve_accounts};
pub use cli::AzCli;
pub use graph::{AzCliGraph, GraphClient, GraphPage, PageRequest};
pub use mock::{MockGraphClient, MockPage};
