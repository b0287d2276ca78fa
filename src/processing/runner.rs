//! Paginated query execution.
//!
//! Fetches pages with the continuation cursor until the API stops returning
//! one or the result cap is reached.

use crate::azure::{GraphClient, PageRequest};
use crate::config::{DEFAULT_RESULT_CAP, MAX_PAGE_SIZE};
use crate::models::{AccountSet, QueryResult};
use std::time::Duration;

/// Runs one query to completion against a [`GraphClient`].
pub struct QueryRunner<'a, C: ?Sized> {
    client: &'a C,
    result_cap: usize,
    page_pause: Duration,
}

impl<'a, C> QueryRunner<'a, C>
where
    C: GraphClient + ?Sized,
{
    pub fn new(client: &'a C) -> Self {
        QueryRunner {
            client,
            result_cap: DEFAULT_RESULT_CAP,
            page_pause: Duration::ZERO,
        }
    }

    /// Records kept before pagination stops. Values below 1 are raised to 1.
    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap.max(1);
        self
    }

    /// Pause between consecutive page requests.
    pub fn with_page_pause(mut self, pause: Duration) -> Self {
        self.page_pause = pause;
        self
    }

    /// Execute `query` across `accounts` and aggregate every page.
    ///
    /// Any failed page fails the whole query; records from earlier pages are
    /// discarded. Results beyond the cap are dropped without error.
    pub async fn run(&self, query: &str, accounts: &AccountSet) -> QueryResult {
        let mut records: Vec<serde_json::Value> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut total_records = None;
        let mut pages = 0;

        loop {
            let request = PageRequest {
                query,
                subscriptions: accounts.ids(),
                top: MAX_PAGE_SIZE.min(self.result_cap - records.len()),
                skip_token: cursor.as_deref(),
            };
            pages += 1;

            let page = match self.client.query_page(&request).await {
                Ok(page) => page,
                Err(e) => {
                    log::error!("Query execution failed on page {pages}: {e}");
                    return QueryResult::failed(e.to_string(), pages);
                }
            };

            let next_cursor = page.next_cursor().map(str::to_string);
            let received = page.data.len();
            if page.total_records.is_some() {
                total_records = page.total_records;
            }
            records.extend(page.data);
            records.truncate(self.result_cap);

            log::debug!(
                "got page#{pages:2} record_count=+{received:3} => {total:3}",
                total = records.len(),
            );

            let next = match next_cursor {
                Some(next) if records.len() < self.result_cap => next,
                Some(_) => {
                    log::info!(
                        "Result cap {} reached after {pages} page(s), more records available",
                        self.result_cap
                    );
                    break;
                }
                None => break,
            };
            if cursor.as_deref() == Some(next.as_str()) {
                return QueryResult::failed(
                    format!("Skip token not unique on page {pages} - possible infinite loop"),
                    pages,
                );
            }
            cursor = Some(next);

            if !self.page_pause.is_zero() {
                tokio::time::sleep(self.page_pause).await;
            }
        }

        QueryResult::succeeded(records, pages, total_records)
    }
}
