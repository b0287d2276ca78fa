//! Azure Resource Graph access.
//!
//! [`GraphClient`] is the seam between the batch logic and Azure: it lists
//! enabled subscriptions and fetches one page of a query. [`AzCliGraph`]
//! implements it on top of `az account list` and `az graph query`.

use super::cli::AzCli;
use crate::error::{AuditError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page request against the full subscription set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub query: &'a str,
    pub subscriptions: &'a [String],
    /// Page size hint, already bounded by the caller.
    pub top: usize,
    /// Cursor from the previous page, absent on the first request.
    pub skip_token: Option<&'a str>,
}

/// Response data from one Resource Graph page.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct GraphPage {
    /// Records returned on this page.
    #[serde(default)]
    pub data: Vec<Value>,
    /// Token for the next page (if more results available).
    #[serde(default, alias = "skipToken")]
    pub skip_token: Option<String>,
    /// Total number of records matching the query.
    #[serde(default, alias = "totalRecords")]
    pub total_records: Option<u64>,
    /// Count of records in this response.
    #[serde(default)]
    pub count: u64,
}

impl GraphPage {
    /// Cursor for the next page; an empty token means exhausted.
    pub fn next_cursor(&self) -> Option<&str> {
        self.skip_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Capability the batch needs from Azure.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Ids of subscriptions in the `Enabled` state, in listing order.
    async fn list_enabled_accounts(&self) -> Result<Vec<String>>;

    /// Execute one page of a query.
    async fn query_page(&self, request: &PageRequest<'_>) -> Result<GraphPage>;
}

/// Subscription entry from `az account list`.
#[derive(Deserialize, Debug)]
struct AccountEntry {
    id: String,
    #[serde(default)]
    state: Option<String>,
}

/// [`GraphClient`] backed by the Azure CLI and its current login.
#[derive(Debug, Clone)]
pub struct AzCliGraph {
    cli: AzCli,
}

impl AzCliGraph {
    /// Wrap the CLI after checking that a login is active.
    pub async fn connect(cli: AzCli) -> Result<Self> {
        cli.run(&to_args(&["account", "show", "--output", "json"]))
            .await
            .map_err(|e| AuditError::Authentication(e.to_string()))?;
        log::info!("Azure CLI credential verified");
        Ok(AzCliGraph { cli })
    }
}

#[async_trait]
impl GraphClient for AzCliGraph {
    async fn list_enabled_accounts(&self) -> Result<Vec<String>> {
        let output = self
            .cli
            .run(&to_args(&["account", "list", "--all", "--output", "json"]))
            .await?;
        parse_enabled_accounts(&output)
    }

    async fn query_page(&self, request: &PageRequest<'_>) -> Result<GraphPage> {
        let output = self.cli.run(&page_args(request)).await?;
        parse_page(&output)
    }
}

fn to_args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// `az graph query` arguments for one page.
fn page_args(request: &PageRequest<'_>) -> Vec<String> {
    let mut args = to_args(&["graph", "query", "-q"]);
    args.push(request.query.to_string());
    args.push("--first".to_string());
    args.push(request.top.to_string());
    if !request.subscriptions.is_empty() {
        args.push("--subscriptions".to_string());
        args.extend(request.subscriptions.iter().cloned());
    }
    if let Some(token) = request.skip_token {
        args.push("--skip-token".to_string());
        args.push(token.to_string());
    }
    args.extend(to_args(&["--output", "json"]));
    args
}

fn parse_page(output: &str) -> Result<GraphPage> {
    let mut de = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut de).map_err(|e| {
        log::debug!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        AuditError::GraphResponse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        }
    })
}

fn parse_enabled_accounts(output: &str) -> Result<Vec<String>> {
    let mut de = serde_json::Deserializer::from_str(output);
    let entries: Vec<AccountEntry> =
        serde_path_to_error::deserialize(&mut de).map_err(|e| AuditError::GraphResponse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })?;
    let total = entries.len();
    let enabled: Vec<String> = entries
        .into_iter()
        .filter(|a| a.state.as_deref() == Some("Enabled"))
        .map(|a| a.id)
        .collect();
    log::debug!("{} of {total} subscriptions enabled", enabled.len());
    Ok(enabled)
}
