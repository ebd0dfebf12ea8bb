//! In-memory fetcher for unit tests.

use crate::error::{DiscoveryError, Result};
use crate::fetch::{Fetch, FetchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

/// Serves canned responses by exact URL and records request order. URLs with
/// no canned response fail like a dead host.
#[derive(Default)]
pub(crate) struct StubFetcher {
    responses: HashMap<String, FetchResult>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, result: FetchResult) -> Self {
        self.responses.insert(url.to_string(), result);
        self
    }

    pub fn with_json(self, url: &str, body: &str) -> Self {
        self.with(
            url,
            FetchResult {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: body.to_string(),
            },
        )
    }

    pub fn with_html(self, url: &str, body: &str) -> Self {
        self.with(
            url,
            FetchResult {
                status: 200,
                content_type: Some("text/html; charset=utf-8".to_string()),
                body: body.to_string(),
            },
        )
    }

    pub fn with_text(self, url: &str, body: &str) -> Self {
        self.with(
            url,
            FetchResult {
                status: 200,
                content_type: Some("text/plain".to_string()),
                body: body.to_string(),
            },
        )
    }

    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with(
            url,
            FetchResult {
                status,
                content_type: None,
                body: String::new(),
            },
        )
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResult> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| DiscoveryError::FetchFailed {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
    }
}
