//! Postman collection transform
//!
//! Walks the folder tree of a Postman collection in pre-order and produces
//! one endpoint per request item. Collections carry example data rather than
//! schemas, so body and response shapes are inferred from literal values.

use crate::endpoint::{Blueprint, Endpoint, MojOutput, NO_DESCRIPTION, ParameterSpec, slug_id};
use crate::skeleton::SchemaSkeleton;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Transform a Postman collection into MOJ output.
///
/// Folders recurse; requests without a usable path are skipped.
pub fn transform_collection(collection: &Value) -> MojOutput {
    let mut endpoints = Vec::new();
    if let Some(items) = collection.get("item").and_then(Value::as_array) {
        walk_items(items, &mut endpoints);
    }

    debug!(endpoints = endpoints.len(), "transformed Postman collection");
    MojOutput { endpoints }
}

fn walk_items(items: &[Value], endpoints: &mut Vec<Endpoint>) {
    for item in items {
        if let Some(children) = item.get("item").and_then(Value::as_array) {
            walk_items(children, endpoints);
        } else if item.get("request").is_some()
            && let Some(endpoint) = map_request(item)
        {
            endpoints.push(endpoint);
        }
    }
}

fn map_request(item: &Value) -> Option<Endpoint> {
    let request = item.get("request")?;
    let method = request
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or("GET")
        .to_uppercase();

    let path = extract_path(request.get("url")?)?;

    let context = item
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    Some(Endpoint {
        id: slug_id(&method, &path),
        context,
        blueprint: map_blueprint(request, &path, &method),
        success_schema: map_success_schema(item.get("response")),
    })
}

/// Pull a request path out of the three URL shapes collections use: a plain
/// string, a URL object with a `path` segment array, or a `raw` string.
fn extract_path(url: &Value) -> Option<String> {
    let path = if let Some(raw) = url.as_str() {
        path_from_raw(raw)
    } else if let Some(segments) = url.get("path") {
        match segments {
            Value::Array(parts) => {
                let joined: Vec<&str> = parts.iter().filter_map(Value::as_str).collect();
                format!("/{}", joined.join("/"))
            }
            Value::String(path) => path.clone(),
            _ => return None,
        }
    } else if let Some(raw) = url.get("raw").and_then(Value::as_str) {
        path_from_raw(raw)
    } else {
        return None;
    };

    (!path.is_empty() && path != "/").then_some(path)
}

fn path_from_raw(raw: &str) -> String {
    Url::parse(raw)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn map_blueprint(request: &Value, path: &str, method: &str) -> Blueprint {
    let mut headers = Vec::new();
    if let Some(declared) = request.get("header").and_then(Value::as_array) {
        for header in declared {
            if let Some(key) = header.get("key").and_then(Value::as_str) {
                headers.push(key.to_string());
            }
        }
    }

    let mut parameters = IndexMap::new();

    // Query parameters: collections do not type them
    if let Some(query) = request
        .get("url")
        .and_then(|url| url.get("query"))
        .and_then(Value::as_array)
    {
        for entry in query {
            if let Some(key) = entry.get("key").and_then(Value::as_str) {
                parameters.insert(
                    key.to_string(),
                    ParameterSpec {
                        schema_type: "string".to_string(),
                        description: entry
                            .get("description")
                            .and_then(Value::as_str)
                            .map(String::from),
                        required: None,
                    },
                );
            }
        }
    }

    // Path variables are always required
    if let Some(variables) = request
        .get("url")
        .and_then(|url| url.get("variable"))
        .and_then(Value::as_array)
    {
        for variable in variables {
            if let Some(key) = variable.get("key").and_then(Value::as_str) {
                parameters.insert(
                    key.to_string(),
                    ParameterSpec {
                        schema_type: "string".to_string(),
                        description: variable
                            .get("description")
                            .and_then(Value::as_str)
                            .map(String::from),
                        required: Some(true),
                    },
                );
            }
        }
    }

    Blueprint {
        method: method.to_string(),
        path: path.to_string(),
        headers: (!headers.is_empty()).then_some(headers),
        parameters: (!parameters.is_empty()).then_some(parameters),
        body: map_body(request.get("body")),
    }
}

fn map_body(body: Option<&Value>) -> Option<SchemaSkeleton> {
    let body = body?;
    match body.get("mode").and_then(Value::as_str)? {
        "raw" => {
            let raw = body.get("raw").and_then(Value::as_str)?;
            let trimmed = raw.trim_start();
            if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
                return None;
            }
            let example: Value = serde_json::from_str(raw).ok()?;
            Some(SchemaSkeleton::infer(&example))
        }
        "formdata" => {
            let fields = body.get("formdata").and_then(Value::as_array)?;
            let shape: IndexMap<String, SchemaSkeleton> = fields
                .iter()
                .filter_map(|field| {
                    let key = field.get("key").and_then(Value::as_str)?;
                    let kind = field.get("type").and_then(Value::as_str).unwrap_or("string");
                    Some((key.to_string(), SchemaSkeleton::Type(kind.to_string())))
                })
                .collect();
            Some(SchemaSkeleton::Object(shape))
        }
        _ => None,
    }
}

/// Shape of the first captured response with a 2xx status code.
fn map_success_schema(responses: Option<&Value>) -> SchemaSkeleton {
    let Some(responses) = responses.and_then(Value::as_array) else {
        return SchemaSkeleton::empty_object();
    };

    responses
        .iter()
        .find(|response| {
            response
                .get("code")
                .and_then(Value::as_u64)
                .is_some_and(|code| (200..300).contains(&code))
        })
        .and_then(|response| response.get("body").and_then(Value::as_str))
        .and_then(|body| serde_json::from_str::<Value>(body).ok())
        .map(|example| SchemaSkeleton::infer(&example))
        .unwrap_or_else(SchemaSkeleton::empty_object)
}
