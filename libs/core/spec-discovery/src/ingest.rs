//! Ingest boundary
//!
//! The contract the display surface calls: `{data, type, provider}` in, an
//! envelope with the validated document (or one error message) out. Swagger
//! URLs go through the full discovery chain; Postman documentation links are
//! rewritten to the collection endpoint and fetched once, with no discovery
//! chain, since collections are self-contained; inline text skips fetching
//! entirely.

use crate::document::WorkingDocument;
use crate::error::{DiscoveryError, Result};
use crate::fetch::Fetch;
use crate::orchestrator::DiscoveryOrchestrator;
use crate::validator::{SpecDocument, SpecValidator};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecProvider {
    Swagger,
    Postman,
}

/// Input contract from the (external) form surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub data: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub provider: SpecProvider,
}

/// What ingestion produced; the caller picks the matching transform.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestedDocument {
    Spec(SpecDocument),
    Collection(Value),
}

impl IngestedDocument {
    /// The raw document, for the response envelope.
    pub fn into_value(self) -> Value {
        match self {
            Self::Spec(spec) => spec.document,
            Self::Collection(collection) => collection,
        }
    }
}

/// Serialized output contract: success with data, or failure with a single
/// human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<IngestedDocument>> for IngestResponse {
    fn from(result: Result<IngestedDocument>) -> Self {
        match result {
            Ok(document) => Self {
                success: true,
                data: Some(document.into_value()),
                error: None,
            },
            Err(error) => Self {
                success: false,
                data: None,
                error: Some(error.to_string()),
            },
        }
    }
}

/// Documentation links hide the collection behind the documenter gateway.
static POSTMAN_VIEW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"view/([^/]+)/([^/?]+)").expect("valid pattern"));

pub async fn ingest(request: &IngestRequest, fetcher: &dyn Fetch) -> Result<IngestedDocument> {
    match (request.provider, request.kind) {
        (SpecProvider::Postman, InputKind::Url) => ingest_postman_url(&request.data, fetcher).await,
        (SpecProvider::Postman, InputKind::Text) => {
            let collection = serde_json::from_str(&request.data).map_err(|error| {
                DiscoveryError::ValidationFailed(format!("collection is not valid JSON: {error}"))
            })?;
            Ok(IngestedDocument::Collection(collection))
        }
        (SpecProvider::Swagger, InputKind::Url) => {
            let orchestrator = DiscoveryOrchestrator::new(fetcher);
            Ok(IngestedDocument::Spec(
                orchestrator.discover(&request.data).await?,
            ))
        }
        (SpecProvider::Swagger, InputKind::Text) => Ok(IngestedDocument::Spec(
            SpecValidator::validate(WorkingDocument::parse(&request.data))?,
        )),
    }
}

/// Rewrite a `.../view/{ownerId}/{slug}` documentation URL to the provider's
/// collection-fetch endpoint; raw collection links pass through untouched.
fn collection_fetch_url(input: &str) -> String {
    match POSTMAN_VIEW_PATTERN.captures(input) {
        Some(captures) => format!(
            "https://documenter.gw.postman.com/api/collections/{}/{}?segregateAuth=true&versionTag=latest",
            &captures[1], &captures[2]
        ),
        None => input.to_string(),
    }
}

async fn ingest_postman_url(input: &str, fetcher: &dyn Fetch) -> Result<IngestedDocument> {
    let target = collection_fetch_url(input);
    let url = Url::parse(&target).map_err(|_| DiscoveryError::InvalidUrl(target.clone()))?;

    info!(%url, "fetching Postman collection");
    let response = fetcher.fetch(&url).await?;
    if !response.is_success() {
        return Err(DiscoveryError::FetchFailed {
            url: url.to_string(),
            reason: format!("status {}", response.status),
        });
    }

    let collection = serde_json::from_str(&response.body).map_err(|error| {
        DiscoveryError::ValidationFailed(format!("collection is not valid JSON: {error}"))
    })?;
    Ok(IngestedDocument::Collection(collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubFetcher;
    use serde_json::json;

    #[test]
    fn documentation_link_is_rewritten() {
        let rewritten =
            collection_fetch_url("https://documenter.getpostman.com/view/2676638/2sAYQUptZc");
        assert_eq!(
            rewritten,
            "https://documenter.gw.postman.com/api/collections/2676638/2sAYQUptZc?segregateAuth=true&versionTag=latest"
        );
    }

    #[test]
    fn raw_collection_link_passes_through() {
        let raw = "https://api.example.com/my-collection.json";
        assert_eq!(collection_fetch_url(raw), raw);
    }

    #[tokio::test]
    async fn postman_url_is_fetched_once() {
        let fetcher = StubFetcher::new().with_json(
            "https://documenter.gw.postman.com/api/collections/owner/slug?segregateAuth=true&versionTag=latest",
            r#"{"item": []}"#,
        );
        let request = IngestRequest {
            data: "https://documenter.getpostman.com/view/owner/slug".to_string(),
            kind: InputKind::Url,
            provider: SpecProvider::Postman,
        };

        let document = ingest(&request, &fetcher).await.unwrap();
        assert_eq!(document, IngestedDocument::Collection(json!({"item": []})));
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn inline_spec_text_bypasses_discovery() {
        let fetcher = StubFetcher::new();
        let request = IngestRequest {
            data: r#"{"openapi": "3.0.0", "info": {"title": "T", "version": "1"}, "paths": {}}"#
                .to_string(),
            kind: InputKind::Text,
            provider: SpecProvider::Swagger,
        };

        let document = ingest(&request, &fetcher).await.unwrap();
        assert!(matches!(document, IngestedDocument::Spec(_)));
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn failure_envelope_carries_one_message() {
        let fetcher = StubFetcher::new();
        let request = IngestRequest {
            data: "https://unreachable.example.com/spec".to_string(),
            kind: InputKind::Url,
            provider: SpecProvider::Swagger,
        };

        let response = IngestResponse::from(ingest(&request, &fetcher).await);
        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response.error.unwrap().contains("unreachable.example.com"));
    }

    #[test]
    fn request_contract_round_trips() {
        let request: IngestRequest = serde_json::from_str(
            r#"{"data": "https://x.test", "type": "url", "provider": "swagger"}"#,
        )
        .unwrap();
        assert_eq!(request.kind, InputKind::Url);
        assert_eq!(request.provider, SpecProvider::Swagger);
    }

    #[test]
    fn success_envelope_shape() {
        let spec = json!({"openapi": "3.0.0"});
        let response = IngestResponse::from(Ok(IngestedDocument::Collection(spec.clone())));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"success": true, "data": spec}));
    }
}
