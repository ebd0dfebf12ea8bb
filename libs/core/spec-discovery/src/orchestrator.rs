//! Discovery orchestration
//!
//! The top-level state machine: fetch the entry, classify the response,
//! scrape or resolve indirection, fetch the final candidate, validate.
//! Every step runs once: a network failure on a required fetch ends the
//! attempt, nothing is retried, and markup never reaches the validator.

use crate::document::WorkingDocument;
use crate::error::{DiscoveryError, Result};
use crate::fetch::{Fetch, looks_like_html};
use crate::locator::{HtmlPage, HtmlSpecLocator};
use crate::resolver::ConfigResolver;
use crate::validator::{SpecDocument, SpecValidator};
use tracing::{debug, info};
use url::Url;

pub struct DiscoveryOrchestrator<'a> {
    fetcher: &'a dyn Fetch,
}

impl<'a> DiscoveryOrchestrator<'a> {
    pub fn new(fetcher: &'a dyn Fetch) -> Self {
        Self { fetcher }
    }

    /// Resolve an entry URL down to one validated specification document.
    pub async fn discover(&self, entry_url: &str) -> Result<SpecDocument> {
        let entry = normalize_entry_url(entry_url)?;
        info!(url = %entry, "starting spec discovery");

        let response = self.fetcher.fetch(&entry).await?;
        if !response.is_success() {
            return Err(DiscoveryError::FetchFailed {
                url: entry.to_string(),
                reason: format!("status {}", response.status),
            });
        }

        let (working_url, body) = if response.is_html() {
            debug!("entry returned HTML, scraping for a spec URL");
            let page = HtmlPage::parse(&response.body, entry.clone());
            let locator = HtmlSpecLocator::default();
            let Some(spec_url) = locator.locate(&page, self.fetcher).await? else {
                return Err(DiscoveryError::NoSpecFound(entry.to_string()));
            };

            let scraped = self.fetcher.fetch(&spec_url).await?;
            if !scraped.is_success() {
                return Err(DiscoveryError::FetchFailed {
                    url: spec_url.to_string(),
                    reason: format!("status {}", scraped.status),
                });
            }
            (spec_url, scraped.body)
        } else {
            (entry.clone(), response.body)
        };

        // Markup never reaches the validator
        if looks_like_html(&body) {
            return Err(DiscoveryError::HtmlNotASpec(working_url.to_string()));
        }

        let mut document = WorkingDocument::parse(&body);
        if let WorkingDocument::Config(config) = document {
            debug!(url = %working_url, "candidate lacks a spec marker, resolving as config");
            document = ConfigResolver::resolve(self.fetcher, config, &working_url, &entry).await?;
        }

        SpecValidator::validate(document)
    }
}

/// Prepend a scheme when the entry was given bare.
fn normalize_entry_url(raw: &str) -> Result<Url> {
    let candidate = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    Url::parse(&candidate).map_err(|_| DiscoveryError::InvalidUrl(raw.to_string()))
}
