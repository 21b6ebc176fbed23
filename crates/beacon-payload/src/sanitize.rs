//! Recursive payload sanitization.
//!
//! [`filter_unjsonable`] turns an arbitrary payload tree into a value that a
//! standard JSON encoder accepts, substituting rather than failing: unique
//! identifiers become their string form, everything else that cannot be
//! encoded becomes the empty string. The walk is depth-first with no cycle
//! guard; a self-referential input is the caller's bug, not ours to detect.

use serde_json::Value as JsonValue;

use crate::value::Value;

/// Pure JSON-encodability probe. No side effects, never panics.
///
/// A container is jsonable only if every nested leaf is; already-plain
/// containers still get re-walked by [`filter_unjsonable`] so nested leaves
/// are revalidated. Non-finite floats count as not encodable (JSON has no
/// NaN/Infinity).
pub fn is_jsonable(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(_) | Value::Int(_) | Value::String(_) => true,
        Value::Float(f) => f.is_finite(),
        Value::Uuid(_) | Value::Opaque(_) | Value::Omitted => false,
        Value::Array(items) => items.iter().all(is_jsonable),
        Value::Object(map) => map.values().all(is_jsonable),
    }
}

/// Sanitize an arbitrary payload into a JSON-safe value. Total function:
/// returns for any input, never panics.
///
/// Per-entry policy for mappings and sequences: recurse into containers and
/// jsonable values, convert unique identifiers to their hyphenated string
/// form, replace everything else with the empty string. Key insertion order
/// is preserved.
pub fn filter_unjsonable(value: &Value) -> JsonValue {
    match value {
        Value::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize_slot(v)))
                .collect(),
        ),
        Value::Array(items) => JsonValue::Array(items.iter().map(sanitize_slot).collect()),
        leaf => sanitize_leaf(leaf),
    }
}

fn sanitize_slot(value: &Value) -> JsonValue {
    if matches!(value, Value::Object(_) | Value::Array(_)) || is_jsonable(value) {
        filter_unjsonable(value)
    } else if let Value::Uuid(id) = value {
        JsonValue::String(id.to_string())
    } else {
        JsonValue::String(String::new())
    }
}

fn sanitize_leaf(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(String::new())),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Uuid(id) => JsonValue::String(id.to_string()),
        // Opaque, Omitted, and containers handled by the caller
        _ => JsonValue::String(String::new()),
    }
}
