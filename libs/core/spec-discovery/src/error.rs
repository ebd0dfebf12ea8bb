//! Error types for spec discovery

use thiserror::Error;

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors that end a discovery attempt.
///
/// Every variant renders as a single human-readable message for the caller
/// envelope. The two non-fatal cases (a failed `configUrl` merge and a
/// failed candidate probe) never surface here.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Entry data could not be turned into an absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A required fetch returned non-2xx or failed on the wire
    #[error("Failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// An HTML page exhausted every location heuristic
    #[error("Could not find a valid spec URL within the HTML page at {0}")]
    NoSpecFound(String),

    /// The final candidate document is still markup
    #[error("Document at {0} is an HTML page, not a spec")]
    HtmlNotASpec(String),

    /// A config's selected spec target could not be retrieved
    #[error("Failed to fetch resolved spec: {0}")]
    ResolvedSpecFetchFailed(String),

    /// Config indirection exceeded the shared hop budget
    #[error("Too many config redirects while resolving {0}")]
    TooManyRedirects(String),

    /// Both the strict and the lenient validation passes failed
    #[error("Spec validation failed: {0}")]
    ValidationFailed(String),
}
