//! Location strategies, in the order they are tried
//!
//! 1. `configUrl:` assignment in an inline script, preferred because it
//!    usually carries the multi-spec `urls` setup.
//! 2. `url:` assignment in an inline script, checked only after 1 failed
//!    across all scripts.
//! 3. The conventional initializer script of documentation UI pages,
//!    re-scanned with the same two patterns.
//! 4. Well-known spec/config endpoint paths, probed in fixed order.

use super::{HtmlPage, LocateStrategy};
use crate::document;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::resolver::ResolutionTrail;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

static CONFIG_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?configUrl["']?\s*:\s*["']([^"']+)["']"#).expect("valid pattern")
});

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?\burl["']?\s*:\s*["']([^"']+)["']"#).expect("valid pattern")
});

/// Conventional relative path of the documentation UI initializer script.
const INITIALIZER_SCRIPT: &str = "swagger-initializer.js";

/// Well-known spec/config endpoints, relative-to-page and root-relative,
/// covering both spec-version families.
const CANDIDATE_PATHS: [&str; 5] = [
    "../../v3/api-docs/swagger-config",
    "../../v3/api-docs",
    "../../v2/api-docs",
    "/v3/api-docs",
    "/v2/api-docs",
];

/// First capture of `pattern` across the scripts, in document order.
fn scan_scripts(scripts: &[String], pattern: &Regex) -> Option<String> {
    scripts.iter().find_map(|content| {
        pattern
            .captures(content)
            .and_then(|captures| captures.get(1))
            .map(|capture| capture.as_str().to_string())
    })
}

/// Strategy 1: `configUrl` assignment embedded in an inline script.
pub struct ScriptConfigUrl;

#[async_trait]
impl LocateStrategy for ScriptConfigUrl {
    fn name(&self) -> &'static str {
        "script-config-url"
    }

    async fn attempt(
        &self,
        page: &HtmlPage,
        _fetcher: &dyn Fetch,
        _trail: &mut ResolutionTrail,
    ) -> Result<Option<Url>> {
        Ok(scan_scripts(&page.scripts, &CONFIG_URL_PATTERN)
            .and_then(|found| page.url.join(&found).ok()))
    }
}

/// Strategy 2: looser `url` assignment embedded in an inline script.
pub struct ScriptUrl;

#[async_trait]
impl LocateStrategy for ScriptUrl {
    fn name(&self) -> &'static str {
        "script-url"
    }

    async fn attempt(
        &self,
        page: &HtmlPage,
        _fetcher: &dyn Fetch,
        _trail: &mut ResolutionTrail,
    ) -> Result<Option<Url>> {
        Ok(scan_scripts(&page.scripts, &URL_PATTERN)
            .and_then(|found| page.url.join(&found).ok()))
    }
}

/// Strategy 3: fetch the conventional initializer script and re-run the two
/// script patterns against its content. Gated on the documentation UI
/// marker; anything found resolves against the initializer's own URL.
pub struct InitializerScript;

#[async_trait]
impl LocateStrategy for InitializerScript {
    fn name(&self) -> &'static str {
        "initializer-script"
    }

    async fn attempt(
        &self,
        page: &HtmlPage,
        fetcher: &dyn Fetch,
        _trail: &mut ResolutionTrail,
    ) -> Result<Option<Url>> {
        if !page.is_doc_ui {
            return Ok(None);
        }
        let Ok(initializer_url) = page.url.join(INITIALIZER_SCRIPT) else {
            return Ok(None);
        };

        debug!(url = %initializer_url, "fetching initializer script");
        let content = match fetcher.fetch(&initializer_url).await {
            Ok(result) if result.is_success() => result.body,
            _ => {
                warn!(url = %initializer_url, "failed to fetch initializer script");
                return Ok(None);
            }
        };

        let scripts = [content];
        let found = scan_scripts(&scripts, &CONFIG_URL_PATTERN)
            .or_else(|| scan_scripts(&scripts, &URL_PATTERN));
        Ok(found.and_then(|value| initializer_url.join(&value).ok()))
    }
}

/// Strategy 4: probe well-known endpoint paths.
///
/// Each reachable JSON response may be a config pointer (followed one extra
/// hop against the shared budget), a multi-spec config (selected via
/// `urls.primaryName`, else first), or the spec itself. Failed probes are
/// skipped silently.
pub struct ConventionalEndpoints;

#[async_trait]
impl LocateStrategy for ConventionalEndpoints {
    fn name(&self) -> &'static str {
        "conventional-endpoints"
    }

    async fn attempt(
        &self,
        page: &HtmlPage,
        fetcher: &dyn Fetch,
        trail: &mut ResolutionTrail,
    ) -> Result<Option<Url>> {
        for candidate in CANDIDATE_PATHS {
            let Ok(candidate_url) = page.url.join(candidate) else {
                continue;
            };

            debug!(url = %candidate_url, "probing conventional endpoint");
            let Ok(result) = fetcher.fetch(&candidate_url).await else {
                continue;
            };
            if !result.is_success() || !result.is_json_like() {
                continue;
            }
            let Ok(mut data) = serde_json::from_str::<Value>(&result.body) else {
                continue;
            };

            // A probe may answer with a pointer to the real config
            if let Some(pointer) = document::config_url(&data).map(str::to_string)
                && let Ok(next) = candidate_url.join(&pointer)
                && trail.admit(&next)?
            {
                debug!(url = %next, "following configUrl from probe");
                match fetcher.fetch(&next).await {
                    Ok(followed) if followed.is_success() => {
                        if let Ok(Value::Object(fields)) =
                            serde_json::from_str::<Value>(&followed.body)
                            && let Some(target) = data.as_object_mut()
                        {
                            for (key, value) in fields {
                                target.insert(key, value);
                            }
                        }
                    }
                    _ => warn!(url = %next, "failed to follow configUrl from probe"),
                }
            }

            if let Some(urls) = document::spec_urls(&data)
                && let Some(selected) = document::select_spec_url(urls, &page.url)
                && let Ok(resolved) = candidate_url.join(selected)
            {
                return Ok(Some(resolved));
            }

            if document::has_spec_marker(&data) {
                return Ok(Some(candidate_url));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::HtmlSpecLocator;
    use crate::test_support::StubFetcher;

    fn page(html: &str, url: &str) -> HtmlPage {
        HtmlPage::parse(html, Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn config_url_in_script_wins_over_url() {
        let html = r##"<html><body><script>
            window.ui = SwaggerUIBundle({
                url: "/openapi.json",
                configUrl: "/swagger-config.json",
                dom_id: "#swagger-ui"
            });
        </script></body></html>"##;
        let page = page(html, "https://example.com/docs/index.html");
        let fetcher = StubFetcher::new();

        let found = HtmlSpecLocator::default()
            .locate(&page, &fetcher)
            .await
            .unwrap();

        assert_eq!(
            found.unwrap().as_str(),
            "https://example.com/swagger-config.json"
        );
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn url_in_script_is_second_choice() {
        let html = r#"<html><body><script>
            SwaggerUIBundle({ url: "./openapi.json" });
        </script></body></html>"#;
        let page = page(html, "https://example.com/docs/index.html");
        let fetcher = StubFetcher::new();

        let found = HtmlSpecLocator::default()
            .locate(&page, &fetcher)
            .await
            .unwrap();

        assert_eq!(found.unwrap().as_str(), "https://example.com/docs/openapi.json");
    }

    #[tokio::test]
    async fn quoted_keys_are_recognized() {
        let scripts = vec![r#"{"configUrl": "/cfg.json"}"#.to_string()];
        assert_eq!(
            scan_scripts(&scripts, &CONFIG_URL_PATTERN),
            Some("/cfg.json".to_string())
        );
    }

    #[tokio::test]
    async fn initializer_script_is_consulted_for_doc_ui_pages() {
        let html = r#"<html><body><div id="swagger-ui"></div></body></html>"#;
        let page = page(html, "https://example.com/swagger-ui/index.html");
        let fetcher = StubFetcher::new().with_text(
            "https://example.com/swagger-ui/swagger-initializer.js",
            r#"window.ui = SwaggerUIBundle({ configUrl: "/v3/api-docs/swagger-config" });"#,
        );

        let found = HtmlSpecLocator::default()
            .locate(&page, &fetcher)
            .await
            .unwrap();

        assert_eq!(
            found.unwrap().as_str(),
            "https://example.com/v3/api-docs/swagger-config"
        );
    }

    #[tokio::test]
    async fn probes_conventional_endpoints_in_order() {
        let html = "<html><body>plain page</body></html>";
        let page = page(html, "https://example.com/swagger-ui/index.html");
        // First two probes fail; the third answers with a spec
        let fetcher = StubFetcher::new()
            .with_status("https://example.com/v3/api-docs/swagger-config", 404)
            .with_status("https://example.com/v3/api-docs", 404)
            .with_json("https://example.com/v2/api-docs", r#"{"swagger": "2.0"}"#);

        let found = HtmlSpecLocator::default()
            .locate(&page, &fetcher)
            .await
            .unwrap();

        assert_eq!(found.unwrap().as_str(), "https://example.com/v2/api-docs");
    }

    #[tokio::test]
    async fn probe_config_with_urls_selects_by_primary_name() {
        let html = "<html><body>docs</body></html>";
        let page = page(
            html,
            "https://example.com/swagger-ui/index.html?urls.primaryName=CardService",
        );
        let fetcher = StubFetcher::new().with_json(
            "https://example.com/v3/api-docs/swagger-config",
            r#"{"urls": [
                {"name": "AccountService", "url": "/v3/api-docs/accounts"},
                {"name": "CardService", "url": "/v3/api-docs/cards"}
            ]}"#,
        );

        let found = HtmlSpecLocator::default()
            .locate(&page, &fetcher)
            .await
            .unwrap();

        assert_eq!(found.unwrap().as_str(), "https://example.com/v3/api-docs/cards");
    }

    #[tokio::test]
    async fn probe_follows_config_pointer_one_hop() {
        let html = "<html><body>docs</body></html>";
        let page = page(html, "https://example.com/swagger-ui/index.html");
        let fetcher = StubFetcher::new()
            .with_json(
                "https://example.com/v3/api-docs/swagger-config",
                r#"{"configUrl": "/real-config.json"}"#,
            )
            .with_json(
                "https://example.com/real-config.json",
                r#"{"urls": [{"name": "Main", "url": "/main.json"}]}"#,
            );

        let found = HtmlSpecLocator::default()
            .locate(&page, &fetcher)
            .await
            .unwrap();

        // Selected URL resolves against the probe URL
        assert_eq!(found.unwrap().as_str(), "https://example.com/main.json");
    }

    #[tokio::test]
    async fn exhausted_heuristics_return_none() {
        let html = "<html><body>nothing here</body></html>";
        let page = page(html, "https://example.com/page.html");
        let fetcher = StubFetcher::new();

        let found = HtmlSpecLocator::default()
            .locate(&page, &fetcher)
            .await
            .unwrap();

        assert!(found.is_none());
    }
}
