//! Two-tier spec validation
//!
//! Strict first: a typed OpenAPI deserialization that only well-formed
//! documents survive. On failure, a lenient syntax-only pass keeps the many
//! real-world specs with minor schema violations usable. The lenient pass
//! still requires the `openapi`/`swagger` marker, so config objects and
//! arbitrary JSON fail here rather than producing empty output. When both
//! tiers fail, the strict error is the one reported; it carries the
//! diagnostics.

use crate::document::{self, WorkingDocument};
use crate::error::{DiscoveryError, Result};
use serde_json::Value;
use tracing::{debug, info};

/// Which validation pass admitted the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationTier {
    /// Full typed structural validation
    Strict,
    /// Syntax parse plus spec-marker check only
    Lenient,
}

/// A validated specification, ready for the MOJ transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    /// The document itself, order-preserving
    pub document: Value,
    pub tier: ValidationTier,
}

pub struct SpecValidator;

impl SpecValidator {
    pub fn validate(document: WorkingDocument) -> Result<SpecDocument> {
        match document {
            WorkingDocument::Spec(value) | WorkingDocument::Config(value) => {
                Self::validate_value(value)
            }
            WorkingDocument::OpaqueText(text) => Self::validate_text(&text),
        }
    }

    fn validate_value(value: Value) -> Result<SpecDocument> {
        match serde_json::from_value::<openapiv3::OpenAPI>(value.clone()) {
            Ok(_) => {
                debug!("strict validation passed");
                Ok(SpecDocument {
                    document: value,
                    tier: ValidationTier::Strict,
                })
            }
            Err(strict_error) => {
                if document::has_spec_marker(&value) {
                    info!(error = %strict_error, "strict validation failed, using lenient parse");
                    Ok(SpecDocument {
                        document: value,
                        tier: ValidationTier::Lenient,
                    })
                } else {
                    Err(DiscoveryError::ValidationFailed(strict_error.to_string()))
                }
            }
        }
    }

    /// Bodies that were not JSON end up here; YAML is the remaining format.
    fn validate_text(text: &str) -> Result<SpecDocument> {
        let value = serde_yaml_ng::from_str::<Value>(text)
            .map_err(|error| DiscoveryError::ValidationFailed(error.to_string()))?;
        Self::validate_value(value)
    }
}
