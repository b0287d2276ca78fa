//! Mock Resource Graph client for testing.
//!
//! Serves scripted pages per query text and records every page request, so
//! pagination and batch behaviour can be exercised without Azure.

use super::graph::{GraphClient, GraphPage, PageRequest};
use crate::error::{AuditError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One scripted response.
#[derive(Debug, Clone)]
pub enum MockPage {
    Page(GraphPage),
    Fail(String),
}

impl MockPage {
    /// A page of records, with a cursor when more pages follow.
    pub fn records(data: Vec<Value>, cursor: Option<&str>) -> Self {
        MockPage::Page(GraphPage {
            count: data.len() as u64,
            data,
            skip_token: cursor.map(str::to_string),
            total_records: None,
        })
    }

    pub fn fail(message: impl Into<String>) -> Self {
        MockPage::Fail(message.into())
    }
}

#[derive(Debug)]
enum Script {
    Pages(VecDeque<MockPage>),
    /// Always full pages, always a fresh cursor.
    Endless { page_size: usize, served: usize },
}

/// Page request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub query: String,
    pub subscriptions: Vec<String>,
    pub top: usize,
    pub skip_token: Option<String>,
}

/// A mock client that returns predefined pages.
#[derive(Debug, Default)]
pub struct MockGraphClient {
    accounts: Vec<String>,
    scripts: Mutex<HashMap<String, Script>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockGraphClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accounts = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Serve `pages` in order for `query`. Requests past the script fail.
    pub fn with_pages(self, query: &str, pages: Vec<MockPage>) -> Self {
        self.script(query, Script::Pages(pages.into()))
    }

    /// Serve an unbounded result set for `query`.
    pub fn with_endless(self, query: &str, page_size: usize) -> Self {
        self.script(
            query,
            Script::Endless {
                page_size,
                served: 0,
            },
        )
    }

    fn script(self, query: &str, script: Script) -> Self {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(query.to_string(), script);
        }
        self
    }

    /// Every page request received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.to_vec())
            .unwrap_or_default()
    }

    /// Page requests received for one query.
    pub fn requests_for(&self, query: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.query == query)
            .collect()
    }
}

#[async_trait]
impl GraphClient for MockGraphClient {
    async fn list_enabled_accounts(&self) -> Result<Vec<String>> {
        Ok(self.accounts.clone())
    }

    async fn query_page(&self, request: &PageRequest<'_>) -> Result<GraphPage> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                query: request.query.to_string(),
                subscriptions: request.subscriptions.to_vec(),
                top: request.top,
                skip_token: request.skip_token.map(str::to_string),
            });
        }

        let mut scripts = self
            .scripts
            .lock()
            .map_err(|_| AuditError::QueryExecution("mock state poisoned".into()))?;
        match scripts.get_mut(request.query) {
            Some(Script::Pages(pages)) => match pages.pop_front() {
                Some(MockPage::Page(page)) => Ok(page),
                Some(MockPage::Fail(message)) => Err(AuditError::QueryExecution(message)),
                None => Err(AuditError::QueryExecution(format!(
                    "mock script exhausted for query '{}'",
                    request.query
                ))),
            },
            Some(Script::Endless { page_size, served }) => {
                let n = (*page_size).min(request.top);
                let data = (0..n).map(|i| json!({"row": *served + i})).collect();
                *served += n;
                Ok(GraphPage {
                    data,
                    skip_token: Some(format!("cursor-{served}")),
                    total_records: None,
                    count: n as u64,
                })
            }
            None => Err(AuditError::QueryExecution(format!(
                "(BadRequest) no mock script for query '{}'",
                request.query
            ))),
        }
    }
}
