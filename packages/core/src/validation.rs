use serde_json::Value;
use thiserror::Error;

use crate::types::{Attribution, Properties, MAX_KINDS};

/// Errors returned when a node, edge, or property map breaks the document schema.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaViolation {
    #[error("property {0:?} cannot be an object; only primitive types and arrays are allowed")]
    ObjectProperty(String),

    #[error("property {0:?} array cannot contain objects")]
    ObjectInArray(String),

    #[error("property {key:?} array may only contain primitive values, found {found}")]
    NonPrimitiveInArray { key: String, found: &'static str },

    #[error(
        "property {key:?} array must be homogeneous (all items the same type); \
         first item is {expected}, found {found}"
    )]
    HeterogeneousArray {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("node {0:?} must have at least one kind when no source kind is specified")]
    MissingKinds(String),

    #[error("node {id:?} cannot have more than 3 kinds, got {kinds:?}")]
    TooManyKinds { id: String, kinds: Vec<String> },

    #[error(
        "merging node {id:?} would result in more than 3 kinds: \
         cannot merge kinds {incoming:?} with existing kinds {existing:?}"
    )]
    MergeKindOverflow {
        id: String,
        existing: Vec<String>,
        incoming: Vec<String>,
    },

    #[error("edge must have a kind")]
    EmptyEdgeKind,
}

/// Remove every entry whose value is `null`.
///
/// Runs before [`validate_properties`], so a null entry never triggers a
/// schema error.
pub fn strip_nulls(mut properties: Properties) -> Properties {
    properties.retain(|_, v| !v.is_null());
    properties
}

/// Check a property map against the schema: primitive values, or arrays whose
/// items are all the same primitive type.
///
/// Returns the first [`SchemaViolation`] in key order. Pure: calling it twice
/// on the same map gives the same answer and changes nothing.
pub fn validate_properties(properties: &Properties) -> Result<(), SchemaViolation> {
    for (key, value) in properties {
        match value {
            Value::Object(_) => return Err(SchemaViolation::ObjectProperty(key.clone())),
            Value::Array(items) => validate_array(key, items)?,
            _ => {}
        }
    }
    Ok(())
}

/// Check the kind count of a node against its attribution.
pub fn validate_kinds(
    id: &str,
    kinds: &[String],
    attribution: Attribution,
) -> Result<(), SchemaViolation> {
    if kinds.is_empty() && !attribution.allows_empty_kinds() {
        return Err(SchemaViolation::MissingKinds(id.to_string()));
    }
    if kinds.len() > MAX_KINDS {
        return Err(SchemaViolation::TooManyKinds {
            id: id.to_string(),
            kinds: kinds.to_vec(),
        });
    }
    Ok(())
}

// --- helpers -----------------------------------------------------------------

fn validate_array(key: &str, items: &[Value]) -> Result<(), SchemaViolation> {
    let Some(first) = items.first() else {
        return Ok(());
    };

    if items.iter().any(Value::is_object) {
        return Err(SchemaViolation::ObjectInArray(key.to_string()));
    }
    if let Some(bad) = items.iter().find(|v| v.is_null() || v.is_array()) {
        return Err(SchemaViolation::NonPrimitiveInArray {
            key: key.to_string(),
            found: primitive_class(bad),
        });
    }

    let expected = primitive_class(first);
    match items.iter().map(primitive_class).find(|c| *c != expected) {
        Some(found) => Err(SchemaViolation::HeterogeneousArray {
            key: key.to_string(),
            expected,
            found,
        }),
        None => Ok(()),
    }
}

/// The runtime type of a JSON value, splitting numbers into integer and float.
fn primitive_class(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// --- tests -------------------------------------------------------------------
