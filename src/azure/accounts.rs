//! Subscription resolution.
//!
//! Turns an optional caller-supplied filter into the [`AccountSet`] a batch
//! runs against.

use super::graph::GraphClient;
use crate::error::{AuditError, Result};
use crate::models::AccountSet;
use regex::Regex;
use std::sync::OnceLock;

static FILTER_SPLIT_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_filter_split_regex() -> &'static Regex {
    FILTER_SPLIT_REGEX.get_or_init(|| Regex::new(r"[,;\s]+").expect("Invalid Regex"))
}

/// Split `"sub1, sub2 sub3"` into ids. Empty pieces are dropped.
pub fn parse_account_filter(raw: &str) -> Vec<String> {
    get_filter_split_regex()
        .split(raw.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the subscriptions for this run.
///
/// Explicit ids are used verbatim without checking they exist; a bad id shows
/// up later as a query failure. Without ids, every `Enabled` subscription
/// visible to the credential is used.
pub async fn resolve_accounts<C>(client: &C, explicit: Option<&[String]>) -> Result<AccountSet>
where
    C: GraphClient + ?Sized,
{
    if let Some(ids) = explicit.filter(|ids| !ids.is_empty()) {
        let accounts = AccountSet::new(ids.iter().cloned());
        log::info!("Using {} subscription(s) from filter", accounts.len());
        return Ok(accounts);
    }

    let ids = client
        .list_enabled_accounts()
        .await
        .map_err(|e| AuditError::Authentication(e.to_string()))?;
    if ids.is_empty() {
        return Err(AuditError::NoAccounts);
    }
    let accounts = AccountSet::new(ids);
    log::info!("Initialized with {} subscription(s)", accounts.len());
    Ok(accounts)
}
