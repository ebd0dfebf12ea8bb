//! Working-document classification
//!
//! The discovery pipeline moves loosely-typed JSON around: a fetched body
//! may be a spec, a config indirection, or something else entirely. The
//! union below pins each intermediate down right after parsing instead of
//! probing fields at every use site.

use serde_json::Value;
use url::Url;

/// Top-level keys marking a document as a spec rather than a config.
const SPEC_MARKERS: [&str; 2] = ["openapi", "swagger"];

/// A parsed-and-classified intermediate document.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkingDocument {
    /// Carries an `openapi`/`swagger` marker
    Spec(Value),
    /// JSON without a spec marker; possibly a config indirection
    Config(Value),
    /// Not JSON; only the validator's YAML path can still use it
    OpaqueText(String),
}

impl WorkingDocument {
    /// Parse a fetched body, keeping it as opaque text when it is not JSON.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::classify(value),
            Err(_) => Self::OpaqueText(text.to_string()),
        }
    }

    pub fn classify(value: Value) -> Self {
        if has_spec_marker(&value) {
            Self::Spec(value)
        } else {
            Self::Config(value)
        }
    }
}

pub fn has_spec_marker(value: &Value) -> bool {
    SPEC_MARKERS.iter().any(|marker| value.get(*marker).is_some())
}

/// `configUrl` pointer of a config indirection, when present.
pub fn config_url(config: &Value) -> Option<&str> {
    config.get("configUrl").and_then(Value::as_str)
}

/// Multi-spec `urls` array of a config indirection, when present.
pub fn spec_urls(config: &Value) -> Option<&Vec<Value>> {
    config.get("urls").and_then(Value::as_array)
}

/// Singular `url` pointer of a config indirection, when present.
pub fn single_url(config: &Value) -> Option<&str> {
    config.get("url").and_then(Value::as_str)
}

/// Pick from a `urls` array: the entry whose `name` matches the
/// `urls.primaryName` query parameter of `entry_url` when present and
/// matching, else the first entry.
pub fn select_spec_url<'a>(urls: &'a [Value], entry_url: &Url) -> Option<&'a str> {
    let primary = query_param(entry_url, "urls.primaryName");

    let matched = primary.as_deref().and_then(|name| {
        urls.iter()
            .find(|entry| entry.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|entry| entry.get("url").and_then(Value::as_str))
    });

    matched.or_else(|| {
        urls.first()
            .and_then(|entry| entry.get("url").and_then(Value::as_str))
    })
}

pub fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}
