//! OpenAPI transform
//!
//! Walks a validated (or leniently parsed) OpenAPI/Swagger document as raw
//! JSON and produces one endpoint per path-method pair, preserving document
//! order. Loose typing is deliberate: real-world specs with minor schema
//! violations still pass through here after the lenient validation tier.

use crate::endpoint::{Blueprint, Endpoint, MojOutput, NO_DESCRIPTION, ParameterSpec, slug_id};
use crate::skeleton::{SchemaFlattener, SchemaSkeleton};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

const HTTP_METHODS: [&str; 8] = [
    "get", "post", "put", "patch", "delete", "head", "options", "trace",
];

/// Transform an OpenAPI document into MOJ output.
///
/// Every path-method pair becomes exactly one endpoint; keys under a path
/// item that are not HTTP verbs with object values (path-level `parameters`,
/// vendor extensions) are skipped.
pub fn transform_spec(spec: &Value) -> MojOutput {
    let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
        return MojOutput::default();
    };

    let flattener = SchemaFlattener::new(spec);
    let mut endpoints = Vec::new();

    for (path, item) in paths {
        let Some(item) = item.as_object() else { continue };
        for (method, operation) in item {
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            let Some(operation) = operation.as_object() else { continue };
            endpoints.push(map_operation(&flattener, path, method, operation));
        }
    }

    debug!(endpoints = endpoints.len(), "transformed OpenAPI document");
    MojOutput { endpoints }
}

/// Map one operation object to one endpoint.
fn map_operation(
    flattener: &SchemaFlattener<'_>,
    path: &str,
    method: &str,
    operation: &Map<String, Value>,
) -> Endpoint {
    let id = operation
        .get("operationId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| slug_id(method, path));

    let context = [operation.get("summary"), operation.get("description")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|text| !text.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    Endpoint {
        id,
        context,
        blueprint: map_blueprint(flattener, path, method, operation),
        success_schema: map_success_schema(flattener, operation),
    }
}

fn map_blueprint(
    flattener: &SchemaFlattener<'_>,
    path: &str,
    method: &str,
    operation: &Map<String, Value>,
) -> Blueprint {
    let mut headers = Vec::new();
    let mut parameters = IndexMap::new();

    if let Some(declared) = operation.get("parameters").and_then(Value::as_array) {
        for parameter in declared {
            let Some(parameter) = parameter.as_object() else { continue };
            let (Some(name), Some(location)) = (
                parameter.get("name").and_then(Value::as_str),
                parameter.get("in").and_then(Value::as_str),
            ) else {
                continue;
            };

            match location {
                "header" => headers.push(name.to_string()),
                "query" | "path" => {
                    parameters.insert(
                        name.to_string(),
                        ParameterSpec {
                            schema_type: parameter
                                .get("schema")
                                .and_then(|schema| schema.get("type"))
                                .and_then(Value::as_str)
                                .unwrap_or("string")
                                .to_string(),
                            description: parameter
                                .get("description")
                                .and_then(Value::as_str)
                                .map(String::from),
                            required: parameter.get("required").and_then(Value::as_bool),
                        },
                    );
                }
                _ => {}
            }
        }
    }

    // Only JSON request bodies carry a shape
    let body = operation
        .get("requestBody")
        .and_then(|body| body.get("content"))
        .and_then(|content| content.get("application/json"))
        .and_then(|media| media.get("schema"))
        .map(|schema| flattener.flatten(schema));

    Blueprint {
        method: method.to_uppercase(),
        path: path.to_string(),
        headers: (!headers.is_empty()).then_some(headers),
        parameters: (!parameters.is_empty()).then_some(parameters),
        body,
    }
}

/// Shape of the first response whose status code starts with `2`.
fn map_success_schema(
    flattener: &SchemaFlattener<'_>,
    operation: &Map<String, Value>,
) -> SchemaSkeleton {
    let Some(responses) = operation.get("responses").and_then(Value::as_object) else {
        return SchemaSkeleton::empty_object();
    };

    responses
        .iter()
        .find(|(status, _)| status.starts_with('2'))
        .and_then(|(_, response)| response.get("content"))
        .and_then(|content| content.get("application/json"))
        .and_then(|media| media.get("schema"))
        .map(|schema| flattener.flatten(schema))
        .unwrap_or_else(SchemaSkeleton::empty_object)
}
