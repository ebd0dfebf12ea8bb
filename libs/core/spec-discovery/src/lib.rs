//! Spec Discovery
//!
//! Turns an arbitrary, often ambiguous entry point (a bare spec URL, an
//! interactive documentation page, or a config indirection object) into one
//! concrete, validated API-specification document:
//! - Documentation pages are scraped through an ordered list of heuristics
//!   (script-embedded URLs, the conventional initializer script, well-known
//!   endpoint probes).
//! - Config indirections (`configUrl`, `urls`, `url`) are followed with a
//!   shared visited set and hop budget.
//! - Candidates pass a strict typed validation first, then a lenient
//!   syntax-only fallback.
//!
//! Every invocation runs as one sequential chain over its own documents;
//! nothing is cached or shared, so independent discoveries can run in
//! parallel freely.

pub mod document;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod locator;
pub mod orchestrator;
pub mod resolver;
pub mod validator;

pub use document::WorkingDocument;
pub use error::{DiscoveryError, Result};
pub use fetch::{Fetch, FetchResult, HttpFetcher};
pub use ingest::{IngestRequest, IngestResponse, IngestedDocument, InputKind, SpecProvider, ingest};
pub use orchestrator::DiscoveryOrchestrator;
pub use resolver::ConfigResolver;
pub use validator::{SpecDocument, SpecValidator, ValidationTier};

#[cfg(test)]
pub(crate) mod test_support;
