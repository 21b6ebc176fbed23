//! Safe event-payload serialization for the Beacon client.
//!
//! Instrumented calls hand the client arbitrary runtime values, often
//! produced by third-party objects that are not JSON-safe. This crate turns
//! them into something safe to transmit, without ever raising on malformed
//! input:
//!
//! - [`filter_unjsonable`] - strict sanitization: the output is guaranteed
//!   encodable by a standard JSON encoder; anything unencodable is blanked.
//! - [`safe_serialize`] - debug/log-oriented serialization: strips control
//!   markers, then probes rich objects for a known serialization capability
//!   before falling back to a diagnostic placeholder.
//!
//! # Quick start
//!
//! ```
//! use beacon_payload::{safe_serialize, Map, Value};
//!
//! let mut payload = Map::new();
//! payload.insert("run_id".into(), Value::from(uuid::Uuid::new_v4()));
//! payload.insert("attempt".into(), Value::from(1i64));
//! payload.insert("self".into(), Value::from("stripped"));
//!
//! let text = safe_serialize(&Value::Object(payload));
//! assert!(text.contains("attempt"));
//! assert!(!text.contains("stripped"));
//! ```
//!
//! Both entry points are pure functions over their input and safe to call
//! concurrently. Neither guards against cyclic inputs; payload trees built
//! with owned [`Value`] nodes cannot form cycles.

pub mod sanitize;
pub mod serialize;
pub mod value;

pub use sanitize::{filter_unjsonable, is_jsonable};
pub use serialize::safe_serialize;
pub use value::{
    HasDict, HasJson, HasModelDumpJson, HasToDict, HasToJson, Map, Opaque, Value,
};
