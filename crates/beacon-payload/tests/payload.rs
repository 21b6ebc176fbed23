//! Black-box coverage of the public payload API: sanitizer totality and
//! idempotence, serializer strip/fallback behavior, and the interplay of
//! the two over the same inputs.

use beacon_payload::{filter_unjsonable, is_jsonable, safe_serialize, Map, Opaque, Value};
use uuid::Uuid;

#[derive(Debug)]
struct Session {
    #[allow(dead_code)]
    api_key: &'static str,
}

impl Opaque for Session {}

fn event_payload() -> Value {
    let mut tags = Map::new();
    tags.insert("env".into(), Value::from("prod"));
    tags.insert("session".into(), Value::opaque(Session { api_key: "sk-x" }));

    let mut payload = Map::new();
    payload.insert("self".into(), Value::opaque(Session { api_key: "sk-x" }));
    payload.insert("event_id".into(), Value::Uuid(Uuid::new_v4()));
    payload.insert("agent_id".into(), Value::Null);
    payload.insert("params".into(), Value::Omitted);
    payload.insert("retries".into(), Value::Int(2));
    payload.insert("tags".into(), Value::Object(tags));
    payload.insert(
        "history".into(),
        Value::Array(vec![Value::Null, Value::from("ok"), Value::Float(0.25)]),
    );
    Value::Object(payload)
}

#[test]
fn sanitizer_output_always_encodes() {
    let sanitized = filter_unjsonable(&event_payload());
    let text = serde_json::to_string(&sanitized).expect("sanitized output must encode");
    assert!(text.contains("retries"));
    // The opaque session is blanked, not leaked
    assert!(!text.contains("sk-x"));
}

#[test]
fn sanitizer_is_idempotent_over_event_payloads() {
    let once = filter_unjsonable(&event_payload());
    let twice = filter_unjsonable(&Value::from(once.clone()));
    assert_eq!(once, twice);
}

#[test]
fn sanitizer_accepts_deep_nesting() {
    let mut value = Value::Int(1);
    for _ in 0..200 {
        value = Value::Array(vec![value]);
    }
    let sanitized = filter_unjsonable(&value);
    assert!(is_jsonable(&Value::from(sanitized)));
}

#[test]
fn serializer_accepts_deep_nesting() {
    let mut value = Value::Uuid(Uuid::new_v4());
    for _ in 0..200 {
        value = Value::Array(vec![value]);
    }
    let text = safe_serialize(&value);
    assert!(text.starts_with("[[["));
    assert!(text.ends_with("]]]"));
}

#[test]
fn serializer_never_fails_on_mixed_trees() {
    let text = safe_serialize(&event_payload());
    let decoded: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
    let object = decoded.as_object().expect("top-level object");

    // Control markers stripped
    assert!(!object.contains_key("self"));
    assert!(!object.contains_key("agent_id"));
    assert!(!object.contains_key("params"));

    // Sequences keep their nulls
    assert_eq!(
        object["history"],
        serde_json::json!([null, "ok", 0.25])
    );

    // Zero-capability object falls back to the placeholder
    assert_eq!(
        object["tags"]["session"],
        serde_json::json!("<<non-serializable: Session>>")
    );
}

#[test]
fn serializer_and_sanitizer_agree_on_plain_payloads() {
    let mut payload = Map::new();
    payload.insert("a".into(), Value::Int(1));
    payload.insert("b".into(), Value::from("two"));
    payload.insert("c".into(), Value::Array(vec![Value::Bool(true)]));
    let value = Value::Object(payload);

    let sanitized = serde_json::to_string(&filter_unjsonable(&value)).unwrap();
    let serialized = safe_serialize(&value);
    assert_eq!(sanitized, serialized);
}
