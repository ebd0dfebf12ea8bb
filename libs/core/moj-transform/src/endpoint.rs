//! MOJ endpoint model
//!
//! The normalized, source-agnostic representation both transforms produce:
//! one [`Endpoint`] per operation, carrying a request [`Blueprint`] and the
//! flattened shape of the first success response.

use crate::skeleton::SchemaSkeleton;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Context fallback for operations carrying no summary or description.
pub const NO_DESCRIPTION: &str = "No description provided";

/// Type and requirement info for one query or path parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Request-shape portion of a normalized endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Upper-case HTTP verb
    pub method: String,
    pub path: String,
    /// Header parameter names, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    /// Query and path parameters keyed by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, ParameterSpec>>,
    /// Flattened JSON request body shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<SchemaSkeleton>,
}

/// One normalized endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Declared operation id, or a slug derived from method and path.
    /// Unique best-effort only; colliding slugs are kept as-is.
    pub id: String,
    /// Human-oriented one-liner, never empty
    pub context: String,
    pub blueprint: Blueprint,
    /// Shape of the first 2xx JSON response; empty object when absent
    pub success_schema: SchemaSkeleton,
}

/// Final MOJ output: endpoints in source traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MojOutput {
    pub endpoints: Vec<Endpoint>,
}

/// Slug for operations without a declared identifier:
/// `GET /users/{id}` becomes `get_users_id`.
pub fn slug_id(method: &str, path: &str) -> String {
    let cleaned: String = path
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | ':'))
        .collect();
    let cleaned = cleaned.trim_start_matches('/').replace('/', "_");
    format!("{}_{}", method.to_lowercase(), cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_braces_and_slashes() {
        assert_eq!(slug_id("GET", "/users/{id}"), "get_users_id");
        assert_eq!(slug_id("POST", "/orders"), "post_orders");
        assert_eq!(slug_id("DELETE", "/carts/:cartId/items"), "delete_carts_cartId_items");
    }

    #[test]
    fn optional_blueprint_fields_are_omitted() {
        let blueprint = Blueprint {
            method: "GET".to_string(),
            path: "/ping".to_string(),
            headers: None,
            parameters: None,
            body: None,
        };
        let value = serde_json::to_value(&blueprint).unwrap();
        assert_eq!(value, serde_json::json!({"method": "GET", "path": "/ping"}));
    }
}
