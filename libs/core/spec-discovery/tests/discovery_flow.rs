//! End-to-end discovery flows against an in-memory fetcher.

use async_trait::async_trait;
use spec_discovery::{
    DiscoveryError, DiscoveryOrchestrator, Fetch, FetchResult, Result, ValidationTier,
};
use std::collections::HashMap;
use url::Url;

#[derive(Default)]
struct FakeHost {
    responses: HashMap<String, FetchResult>,
}

impl FakeHost {
    fn new() -> Self {
        Self::default()
    }

    fn serve(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchResult {
                status: 200,
                content_type: Some(content_type.to_string()),
                body: body.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl Fetch for FakeHost {
    async fn fetch(&self, url: &Url) -> Result<FetchResult> {
        self.responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| DiscoveryError::FetchFailed {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
    }
}

const USER_SPEC: &str = r#"{
    "openapi": "3.0.0",
    "paths": {
        "/users/{id}": {
            "get": {
                "operationId": "getUser",
                "parameters": [
                    {"name": "id", "in": "path", "schema": {"type": "string"}, "required": true}
                ],
                "responses": {
                    "200": {
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "id": {"type": "string"},
                                        "name": {"type": "string"}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}"#;

#[tokio::test]
async fn direct_entry_url_yields_the_document() {
    let host = FakeHost::new().serve(
        "https://api.example.com/openapi.json",
        "application/json",
        USER_SPEC,
    );

    let spec = DiscoveryOrchestrator::new(&host)
        .discover("https://api.example.com/openapi.json")
        .await
        .unwrap();

    // No info section, so the lenient tier admits it
    assert_eq!(spec.tier, ValidationTier::Lenient);
    assert!(spec.document.get("paths").is_some());
}

#[tokio::test]
async fn documentation_page_chain_resolves_to_selected_spec() {
    // HTML page -> initializer script -> swagger-config.json -> /x.json
    let page = r#"<html><body><div id="swagger-ui"></div></body></html>"#;
    let initializer = r##"window.ui = SwaggerUIBundle({
        configUrl: "/swagger-config.json",
        dom_id: "#swagger-ui"
    });"##;
    let config = r#"{"urls": [{"name": "X", "url": "/x.json"}]}"#;

    let host = FakeHost::new()
        .serve("https://example.com/docs/index.html", "text/html", page)
        .serve(
            "https://example.com/docs/swagger-initializer.js",
            "application/javascript",
            initializer,
        )
        .serve(
            "https://example.com/swagger-config.json",
            "application/json",
            config,
        )
        .serve("https://example.com/x.json", "application/json", USER_SPEC);

    let spec = DiscoveryOrchestrator::new(&host)
        .discover("https://example.com/docs/index.html")
        .await
        .unwrap();

    assert!(spec.document.get("paths").and_then(|p| p.get("/users/{id}")).is_some());
}

#[tokio::test]
async fn html_all_the_way_down_fails_cleanly() {
    let page = r#"<html><script>x({ url: "/inner" });</script></html>"#;
    let host = FakeHost::new()
        .serve("https://example.com/docs", "text/html", page)
        .serve("https://example.com/inner", "text/html", "<html>nope</html>");

    let error = DiscoveryOrchestrator::new(&host)
        .discover("https://example.com/docs")
        .await
        .unwrap_err();

    assert!(matches!(error, DiscoveryError::HtmlNotASpec(_)));
}
