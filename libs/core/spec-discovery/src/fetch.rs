//! HTTP fetch layer
//!
//! Discovery logic runs against one narrow async trait so tests can drive it
//! from an in-memory stub. The real implementation wraps a reqwest client
//! with an identifying User-Agent and a bounded timeout; no fetch is ever
//! retried, and dropping the future aborts the request in flight.

use crate::error::{DiscoveryError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Identifying header value sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; MOJ-Converter/1.0)";

/// Per-request timeout; no fetch blocks past this.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response snapshot for one fetch.
///
/// Non-2xx statuses are data, not errors: probes skip them, required
/// fetches turn them into [`DiscoveryError::FetchFailed`]. Only wire-level
/// failures surface as `Err`.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// HTML by declared content-type or by body sniff.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("text/html"))
            || looks_like_html(&self.body)
    }

    /// JSON by declared content-type or by leading brace.
    pub fn is_json_like(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("json"))
            || self.body.trim_start().starts_with('{')
    }
}

/// Markup sniff: a body opening with a tag or carrying a doctype is HTML no
/// matter what the content-type header claims.
pub fn looks_like_html(body: &str) -> bool {
    body.trim_start().starts_with('<') || body.contains("<!DOCTYPE html")
}

/// Fetch capability the discovery pipeline is generic over.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchResult>;
}

/// reqwest-backed fetcher used outside tests.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|error| DiscoveryError::FetchFailed {
                url: "client initialization".to_string(),
                reason: error.to_string(),
            })?;
        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResult> {
        debug!(%url, "fetching");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| DiscoveryError::FetchFailed {
                url: url.to_string(),
                reason: error.to_string(),
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response
            .text()
            .await
            .map_err(|error| DiscoveryError::FetchFailed {
                url: url.to_string(),
                reason: error.to_string(),
            })?;

        Ok(FetchResult {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_sniff_ignores_content_type() {
        let result = FetchResult {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: "  <!DOCTYPE html><html></html>".to_string(),
        };
        assert!(result.is_html());
    }

    #[test]
    fn json_body_is_not_html() {
        assert!(!looks_like_html("{\"openapi\": \"3.0.0\"}"));
        assert!(looks_like_html("<html>"));
        assert!(looks_like_html("\n\t<!DOCTYPE html><body/>"));
    }

    #[test]
    fn json_like_accepts_header_or_brace() {
        let by_header = FetchResult {
            status: 200,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: String::new(),
        };
        assert!(by_header.is_json_like());

        let by_body = FetchResult {
            status: 200,
            content_type: None,
            body: "{\"a\": 1}".to_string(),
        };
        assert!(by_body.is_json_like());
    }

    #[test]
    fn status_classification() {
        let ok = FetchResult { status: 204, content_type: None, body: String::new() };
        assert!(ok.is_success());
        let missing = FetchResult { status: 404, content_type: None, body: String::new() };
        assert!(!missing.is_success());
    }
}
