//! HTML spec locator
//!
//! Given a documentation page, finds the URL of the underlying
//! machine-readable spec or of a config object pointing at it. The
//! heuristics are an ordered list of strategy objects tried in sequence;
//! the first hit wins, which bounds worst-case latency to the list length.
//! Strategies may issue their own probe fetches; a failed probe just moves
//! the search along.

pub mod strategies;

use crate::error::Result;
use crate::fetch::Fetch;
use crate::resolver::ResolutionTrail;
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

/// Marker identifying an interactive documentation UI page.
const DOC_UI_MARKER: &str = "swagger-ui";

/// Pre-extracted page context.
///
/// The HTML is parsed exactly once, up front; only plain strings cross into
/// the async strategies.
pub struct HtmlPage {
    pub url: Url,
    /// Inline script bodies, in document order
    pub scripts: Vec<String>,
    /// Whether the page is recognizably a documentation UI
    pub is_doc_ui: bool,
}

impl HtmlPage {
    pub fn parse(html: &str, url: Url) -> Self {
        let document = Html::parse_document(html);

        let mut scripts = Vec::new();
        if let Ok(selector) = Selector::parse("script") {
            scripts = document
                .select(&selector)
                .map(|element| element.text().collect::<String>())
                .filter(|content| !content.trim().is_empty())
                .collect();
        }

        Self {
            url,
            scripts,
            is_doc_ui: html.contains(DOC_UI_MARKER),
        }
    }
}

/// One ordered resolution heuristic.
#[async_trait]
pub trait LocateStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Try to produce a spec/config URL; `Ok(None)` passes to the next
    /// strategy in line.
    async fn attempt(
        &self,
        page: &HtmlPage,
        fetcher: &dyn Fetch,
        trail: &mut ResolutionTrail,
    ) -> Result<Option<Url>>;
}

/// Runs the strategy list in order, short-circuiting on the first hit.
pub struct HtmlSpecLocator {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl Default for HtmlSpecLocator {
    fn default() -> Self {
        Self {
            strategies: vec![
                Box::new(strategies::ScriptConfigUrl),
                Box::new(strategies::ScriptUrl),
                Box::new(strategies::InitializerScript),
                Box::new(strategies::ConventionalEndpoints),
            ],
        }
    }
}

impl HtmlSpecLocator {
    pub async fn locate(&self, page: &HtmlPage, fetcher: &dyn Fetch) -> Result<Option<Url>> {
        let mut trail = ResolutionTrail::seeded(&page.url);

        for strategy in &self.strategies {
            if let Some(found) = strategy.attempt(page, fetcher, &mut trail).await? {
                info!(strategy = strategy.name(), url = %found, "located spec candidate");
                return Ok(Some(found));
            }
            debug!(strategy = strategy.name(), "strategy yielded nothing");
        }

        Ok(None)
    }
}
