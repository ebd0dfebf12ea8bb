//! Schema skeletons
//!
//! A skeleton is the flattened, type-only shape of a JSON value: a scalar
//! type name, a single-element array wrapping the element shape, or an
//! ordered map of field name to skeleton. It is what MOJ output carries in
//! place of full JSON Schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flattened shape of a JSON schema or example value.
///
/// Serializes to exactly the wire form: `"string"`, `["string"]`, or
/// `{"field": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSkeleton {
    /// Scalar type name (`"string"`, `"integer"`, `"any"`, ...)
    Type(String),
    /// Element shape of an array; always exactly one element
    Array(Vec<SchemaSkeleton>),
    /// Field name to field shape, in declaration order
    Object(IndexMap<String, SchemaSkeleton>),
}

impl SchemaSkeleton {
    /// The shape of a value nothing is known about.
    pub fn any() -> Self {
        Self::Type("any".to_string())
    }

    /// The empty object shape, used where no schema applies.
    pub fn empty_object() -> Self {
        Self::Object(IndexMap::new())
    }

    /// Wrap an element shape into an array shape.
    pub fn array_of(element: SchemaSkeleton) -> Self {
        Self::Array(vec![element])
    }

    /// Type a literal example value.
    ///
    /// Postman collections carry example data rather than schemas, so shapes
    /// are inferred from the literals: numbers all become `"number"`, an
    /// array takes the shape of its first element.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Null => Self::Type("null".to_string()),
            Value::Bool(_) => Self::Type("boolean".to_string()),
            Value::Number(_) => Self::Type("number".to_string()),
            Value::String(_) => Self::Type("string".to_string()),
            Value::Array(items) => Self::array_of(
                items.first().map(Self::infer).unwrap_or_else(Self::any),
            ),
            Value::Object(fields) => Self::Object(
                fields
                    .iter()
                    .map(|(name, field)| (name.clone(), Self::infer(field)))
                    .collect(),
            ),
        }
    }
}

/// Keys that mark a JSON object as a schema rather than a skeleton. An object
/// carrying none of these is treated as already flattened.
const SCHEMA_KEYWORDS: [&str; 12] = [
    "$ref",
    "type",
    "properties",
    "items",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "enum",
    "format",
    "additionalProperties",
    "nullable",
];

/// Recursion cap for pathological or self-referential schemas.
const MAX_DEPTH: usize = 32;

/// Reduces a JSON-Schema-like value to a [`SchemaSkeleton`].
///
/// Total over any input: unknown or missing type information becomes `"any"`,
/// never an error. Local `#/` references are resolved against the document
/// root; a reference already on the active resolution path, or nesting past
/// the depth cap, short-circuits to `"any"` instead of recursing. Idempotent
/// over skeletons it produced itself.
pub struct SchemaFlattener<'a> {
    root: &'a Value,
}

impl<'a> SchemaFlattener<'a> {
    /// Flattener resolving references against `root`.
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    pub fn flatten(&self, schema: &Value) -> SchemaSkeleton {
        self.flatten_at(schema, &mut Vec::new(), 0)
    }

    fn flatten_at(
        &self,
        schema: &Value,
        active_refs: &mut Vec<String>,
        depth: usize,
    ) -> SchemaSkeleton {
        if depth > MAX_DEPTH {
            return SchemaSkeleton::any();
        }

        match schema {
            // A bare type name is its own skeleton
            Value::String(name) => SchemaSkeleton::Type(name.clone()),
            // A single-element array is an already-flattened array shape
            Value::Array(items) => items
                .first()
                .map(|item| {
                    SchemaSkeleton::array_of(self.flatten_at(item, active_refs, depth + 1))
                })
                .unwrap_or_else(SchemaSkeleton::any),
            Value::Object(_) => self.flatten_object(schema, active_refs, depth),
            _ => SchemaSkeleton::any(),
        }
    }

    fn flatten_object(
        &self,
        schema: &Value,
        active_refs: &mut Vec<String>,
        depth: usize,
    ) -> SchemaSkeleton {
        let obj = match schema.as_object() {
            Some(obj) => obj,
            None => return SchemaSkeleton::any(),
        };

        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            return self.flatten_reference(reference, active_refs, depth);
        }

        let declared = obj.get("type").and_then(Value::as_str);

        if declared == Some("object")
            && let Some(properties) = obj.get("properties").and_then(Value::as_object)
        {
            return SchemaSkeleton::Object(
                properties
                    .iter()
                    .map(|(name, prop)| {
                        (name.clone(), self.flatten_at(prop, active_refs, depth + 1))
                    })
                    .collect(),
            );
        }

        if declared == Some("array")
            && let Some(items) = obj.get("items")
        {
            return SchemaSkeleton::array_of(self.flatten_at(items, active_refs, depth + 1));
        }

        if let Some(name) = declared {
            return SchemaSkeleton::Type(name.to_string());
        }

        // No schema keywords at all: a non-empty object is an already
        // flattened skeleton, kept as a fixed point.
        if !obj.is_empty() && SCHEMA_KEYWORDS.iter().all(|key| !obj.contains_key(*key)) {
            return SchemaSkeleton::Object(
                obj.iter()
                    .map(|(name, field)| {
                        (name.clone(), self.flatten_at(field, active_refs, depth + 1))
                    })
                    .collect(),
            );
        }

        SchemaSkeleton::any()
    }

    fn flatten_reference(
        &self,
        reference: &str,
        active_refs: &mut Vec<String>,
        depth: usize,
    ) -> SchemaSkeleton {
        // Cycle guard keyed by reference identity
        if active_refs.iter().any(|seen| seen == reference) {
            return SchemaSkeleton::any();
        }

        let Some(target) = resolve_pointer(self.root, reference) else {
            return SchemaSkeleton::any();
        };

        active_refs.push(reference.to_string());
        let skeleton = self.flatten_at(target, active_refs, depth + 1);
        active_refs.pop();
        skeleton
    }
}

/// Resolve a local `#/a/b/c` JSON pointer. Remote references yield `None`.
fn resolve_pointer<'v>(root: &'v Value, reference: &str) -> Option<&'v Value> {
    let path = reference.strip_prefix("#/")?;
    let mut current = root;
    for segment in path.split('/') {
        current = current.get(segment)?;
    }
    Some(current)
}
