//! Fallback-probing payload serialization.
//!
//! [`safe_serialize`] trades the sanitizer's strict type-safety for better
//! fidelity: instead of blanking rich objects it probes them for a known
//! serialization capability and embeds whatever that produces. Two phases:
//!
//! 1. **Strip**: drop mapping entries holding control markers (`self` keys,
//!    null values, the "no value supplied" placeholder). No JSON-safety
//!    enforcement here.
//! 2. **Encode**: standard JSON encoding with a fallback for leaves the
//!    encoder cannot take natively. Unique identifiers become strings;
//!    opaque objects are probed capability by capability; anything left
//!    becomes the diagnostic placeholder `<<non-serializable: {type_name}>>`.
//!
//! A capability method that panics propagates to the caller unrecovered;
//! probed objects are expected to be well-behaved.

use serde::ser::{Serialize, Serializer};
use tracing::debug;

use crate::value::{Map, Opaque, Value};

/// Mapping key treated as a control marker and stripped before encoding.
const SELF_KEY: &str = "self";

/// Serialize any payload to JSON text. Never fails, assuming probed
/// capability methods behave.
pub fn safe_serialize(value: &Value) -> String {
    let stripped = strip_control_markers(value);
    serde_json::to_string(&Encoded(&stripped)).expect("stripped payload always encodes")
}

/// Recursively drop mapping entries whose value is null or the omitted
/// placeholder, or whose key is the literal `self`. Sequences keep all
/// elements (nulls included) and recurse; leaves pass through unmodified.
fn strip_control_markers(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, v)| {
                    !matches!(v, Value::Null | Value::Omitted) && k.as_str() != SELF_KEY
                })
                .map(|(k, v)| (k.clone(), strip_control_markers(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_control_markers).collect()),
        leaf => leaf.clone(),
    }
}

/// Encoding adapter: drives a standard JSON encoder over the payload tree,
/// resolving non-natively-safe leaves through the capability fallback.
struct Encoded<'a>(&'a Value);

impl Serialize for Encoded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            // JSON has no NaN/Infinity; substitute rather than fail
            Value::Float(_) => serializer.serialize_str(&placeholder("f64")),
            Value::String(s) => serializer.serialize_str(s),
            Value::Uuid(id) => serializer.collect_str(id),
            Value::Array(items) => serializer.collect_seq(items.iter().map(Encoded)),
            Value::Object(map) => {
                serializer.collect_map(map.iter().map(|(k, v)| (k, Encoded(v))))
            }
            // An omitted placeholder surviving strip (e.g. inside a sequence)
            Value::Omitted => serializer.serialize_str(&placeholder("Omitted")),
            Value::Opaque(object) => serialize_fallback(object.as_ref(), serializer),
        }
    }
}

/// Probe capabilities in fixed priority order. Text-returning capabilities
/// are embedded as JSON string values; mapping-returning capabilities are
/// encoded recursively through the same fallback (and are not re-stripped).
fn serialize_fallback<S: Serializer>(
    object: &dyn Opaque,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if let Some(cap) = object.as_model_dump_json() {
        serializer.serialize_str(&cap.model_dump_json())
    } else if let Some(cap) = object.as_to_json() {
        serializer.serialize_str(&cap.to_json())
    } else if let Some(cap) = object.as_json() {
        serializer.serialize_str(&cap.json())
    } else if let Some(cap) = object.as_to_dict() {
        serialize_dict(&cap.to_dict(), serializer)
    } else if let Some(cap) = object.as_dict() {
        serialize_dict(&cap.dict(), serializer)
    } else {
        let type_name = object.type_name();
        debug!(type_name, "no serialization capability, substituting placeholder");
        serializer.serialize_str(&placeholder(type_name))
    }
}

fn serialize_dict<S: Serializer>(map: &Map, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(map.iter().map(|(k, v)| (k, Encoded(v))))
}

fn placeholder(type_name: &str) -> String {
    format!("<<non-serializable: {}>>", type_name)
}
