//! Config indirection resolution
//!
//! A fetched JSON object without a spec marker may still point at the real
//! spec: through a `configUrl` chain, a multi-spec `urls` array, or a single
//! `url`. Every hop shares one visited set and one hop budget so indirection
//! cycles terminate deterministically instead of looping.

use crate::document::{self, WorkingDocument};
use crate::error::{DiscoveryError, Result};
use crate::fetch::Fetch;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// Uniform cap on config-following hops per discovery attempt.
pub const MAX_RESOLUTION_HOPS: usize = 5;

/// Visited-URL set plus hop budget shared across all resolution paths.
#[derive(Debug, Default)]
pub struct ResolutionTrail {
    visited: HashSet<String>,
    hops: usize,
}

impl ResolutionTrail {
    /// Trail pre-seeded with the URL the current document came from, so a
    /// trivial self-reference is rejected before any fetch.
    pub fn seeded(origin: &Url) -> Self {
        let mut trail = Self::default();
        trail.visited.insert(origin.to_string());
        trail
    }

    /// Admit one more hop. `Ok(false)` means the target was already visited
    /// and must not be fetched again; exceeding the budget is fatal.
    pub fn admit(&mut self, target: &Url) -> Result<bool> {
        if !self.visited.insert(target.to_string()) {
            return Ok(false);
        }
        self.hops += 1;
        if self.hops > MAX_RESOLUTION_HOPS {
            return Err(DiscoveryError::TooManyRedirects(target.to_string()));
        }
        Ok(true)
    }
}

/// Resolves config indirections down to a concrete fetched document.
pub struct ConfigResolver;

impl ConfigResolver {
    /// Resolve a config fetched from `document_url`. `entry_url` supplies
    /// the `urls.primaryName` selector. A config without any usable
    /// indirection passes through unchanged and fails spec validation
    /// downstream.
    pub async fn resolve(
        fetcher: &dyn Fetch,
        config: Value,
        document_url: &Url,
        entry_url: &Url,
    ) -> Result<WorkingDocument> {
        let mut trail = ResolutionTrail::seeded(document_url);
        let config = Self::merge_config_chain(fetcher, config, document_url, &mut trail).await?;

        if let Some(urls) = document::spec_urls(&config) {
            if let Some(selected) = document::select_spec_url(urls, entry_url) {
                let target = document_url
                    .join(selected)
                    .map_err(|_| DiscoveryError::ResolvedSpecFetchFailed(selected.to_string()))?;
                info!(url = %target, "resolved spec URL from config urls");
                return Self::fetch_final(fetcher, &target).await;
            }
        } else if let Some(single) = document::single_url(&config) {
            let target = document_url
                .join(single)
                .map_err(|_| DiscoveryError::ResolvedSpecFetchFailed(single.to_string()))?;
            info!(url = %target, "resolved spec URL from config");
            return Self::fetch_final(fetcher, &target).await;
        }

        debug!("config carries no resolvable indirection, passing through");
        Ok(WorkingDocument::Config(config))
    }

    /// Follow `configUrl` pointers, merging fetched fields onto the config
    /// (fetched fields win on collision). Failures on this edge are
    /// non-fatal; revisiting a URL stops the chain.
    async fn merge_config_chain(
        fetcher: &dyn Fetch,
        mut config: Value,
        document_url: &Url,
        trail: &mut ResolutionTrail,
    ) -> Result<Value> {
        let mut base = document_url.clone();

        loop {
            let Some(pointer) = document::config_url(&config).map(str::to_string) else {
                break;
            };
            let Ok(next) = base.join(&pointer) else {
                break;
            };
            if !trail.admit(&next)? {
                debug!(url = %next, "config chain revisited a URL, stopping");
                break;
            }

            debug!(url = %next, "following configUrl");
            let fetched = match fetcher.fetch(&next).await {
                Ok(result) if result.is_success() => {
                    serde_json::from_str::<Value>(&result.body).ok()
                }
                _ => None,
            };
            let Some(Value::Object(fields)) = fetched else {
                warn!(url = %next, "failed to follow configUrl, continuing unmerged");
                break;
            };
            let Some(target) = config.as_object_mut() else {
                break;
            };
            for (key, value) in fields {
                target.insert(key, value);
            }
            base = next;
        }

        Ok(config)
    }

    /// Terminal fetch of the selected spec URL; failure here is fatal.
    async fn fetch_final(fetcher: &dyn Fetch, target: &Url) -> Result<WorkingDocument> {
        match fetcher.fetch(target).await {
            Ok(result) if result.is_success() => Ok(WorkingDocument::parse(&result.body)),
            _ => Err(DiscoveryError::ResolvedSpecFetchFailed(target.to_string())),
        }
    }
}
