//! MOJ Transform
//!
//! Converts machine-readable API descriptions into the MOJ format: a compact,
//! token-efficient endpoint list meant for automated agents rather than
//! humans. Two source formats are supported:
//! - OpenAPI/Swagger documents, walked path by path ([`transform_spec`])
//! - Postman collections, walked in folder pre-order ([`transform_collection`])
//!
//! Both produce the same [`MojOutput`] shape. All transforms here are pure
//! functions over in-memory JSON; fetching and validation live upstream.

pub mod endpoint;
pub mod openapi;
pub mod postman;
pub mod skeleton;

pub use endpoint::{Blueprint, Endpoint, MojOutput, ParameterSpec};
pub use openapi::transform_spec;
pub use postman::transform_collection;
pub use skeleton::{SchemaFlattener, SchemaSkeleton};
