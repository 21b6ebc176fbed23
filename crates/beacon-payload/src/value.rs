//! Traversal value model for event payloads.
//!
//! Instrumented call sites hand us arbitrary runtime data: plain JSON-shaped
//! trees, identifiers, and rich third-party objects we know nothing about.
//! [`Value`] is the node type the sanitizer and serializer walk. Anything
//! that is not JSON-shaped lands in [`Value::Opaque`], which carries the
//! runtime type name and an ordered set of optional serialization
//! capabilities (see [`Opaque`]).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use uuid::Uuid;

/// Keyed mapping with insertion order preserved.
pub type Map = IndexMap<String, Value>;

/// An untyped node in a payload traversal tree.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// 128-bit unique identifier; requires explicit string conversion
    /// before JSON encoding.
    Uuid(Uuid),
    Array(Vec<Value>),
    Object(Map),
    /// Anything else: a third-party object with an optional set of
    /// serialization capabilities.
    Opaque(Arc<dyn Opaque>),
    /// "No value supplied" placeholder; stripped from mappings before
    /// serialization.
    Omitted,
}

impl Value {
    /// Wrap a third-party object as an opaque leaf.
    pub fn opaque(object: impl Opaque + 'static) -> Self {
        Value::Opaque(Arc::new(object))
    }
}

/// Capability: `model_dump_json` returning JSON text.
pub trait HasModelDumpJson {
    fn model_dump_json(&self) -> String;
}

/// Capability: `to_json` returning JSON text.
pub trait HasToJson {
    fn to_json(&self) -> String;
}

/// Capability: `json` returning JSON text.
pub trait HasJson {
    fn json(&self) -> String;
}

/// Capability: `to_dict` returning a keyed mapping of payload values.
pub trait HasToDict {
    fn to_dict(&self) -> Map;
}

/// Capability: `dict` returning a keyed mapping of payload values.
pub trait HasDict {
    fn dict(&self) -> Map;
}

/// A third-party object carried through a payload.
///
/// Implementations opt in to serialization capabilities by overriding the
/// matching accessor. The serializer probes the accessors in a fixed
/// priority order: `model_dump_json`, `to_json`, `json`, `to_dict`, `dict`.
/// An object exposing none of them serializes to the diagnostic placeholder
/// `<<non-serializable: {type_name}>>`.
pub trait Opaque: fmt::Debug + Send + Sync {
    /// Unqualified runtime type name, used in the diagnostic placeholder.
    fn type_name(&self) -> &'static str {
        unqualified(std::any::type_name::<Self>())
    }

    fn as_model_dump_json(&self) -> Option<&dyn HasModelDumpJson> {
        None
    }

    fn as_to_json(&self) -> Option<&dyn HasToJson> {
        None
    }

    fn as_json(&self) -> Option<&dyn HasJson> {
        None
    }

    fn as_to_dict(&self) -> Option<&dyn HasToDict> {
        None
    }

    fn as_dict(&self) -> Option<&dyn HasDict> {
        None
    }
}

/// Strip module path and generic arguments: `foo::Bar<baz::Qux>` -> `Bar`.
fn unqualified(name: &str) -> &str {
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Object(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    // u64 beyond i64::MAX degrades to f64
                    Value::Float(f)
                } else {
                    Value::Null
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}
