use super::*;
use serde_json::json;

fn sample() -> Envelope {
    Envelope::build(
        "router",
        "support_agent",
        "refund_request",
        Some(json!({"customer_id": 1, "text": "refund please"})),
    )
}

#[test]
fn test_build_fills_ids_and_defaults() {
    let env = Envelope::build("router", "customer_data_agent", "get_customer_info", None);

    assert_eq!(env.kind, MessageType::Request);
    assert_eq!(env.payload, json!({}));
    assert!(!env.message_id.is_empty());
    assert!(!env.correlation_id.is_empty());
    assert!(env.timestamp.is_some());
    assert!(env.validate().is_ok());
}

#[test]
fn test_build_never_reuses_message_id() {
    let a = sample();
    let b = sample();
    assert_ne!(a.message_id, b.message_id);
    assert_ne!(a.correlation_id, b.correlation_id);
}

#[test]
fn test_wire_field_names() {
    let value = sample().to_value().unwrap();

    assert_eq!(value["type"], "request");
    assert_eq!(value["from"], "router");
    assert_eq!(value["to"], "support_agent");
    assert_eq!(value["intent"], "refund_request");
    assert!(value.get("kind").is_none());
}

#[test]
fn test_validate_reports_each_missing_field() {
    let full = sample().to_value().unwrap();

    for field in REQUIRED_FIELDS {
        let mut raw = full.clone();
        raw.as_object_mut().unwrap().remove(field);

        match validate(&raw) {
            Err(Error::Schema { missing }) => assert_eq!(missing, vec![field.to_string()]),
            other => panic!("expected schema error for {field}, got {other:?}"),
        }
    }
}

#[test]
fn test_validate_reports_several_in_order() {
    let raw = json!({
        "message_id": "m-1",
        "type": "request",
        "intent": "support_request",
    });

    match validate(&raw) {
        Err(Error::Schema { missing }) => {
            assert_eq!(missing, vec!["from", "to", "payload", "correlation_id"]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_validate_treats_blank_ids_as_missing() {
    let mut raw = sample().to_value().unwrap();
    raw["correlation_id"] = json!("");
    raw["intent"] = json!([]);

    match validate(&raw) {
        Err(Error::Schema { missing }) => assert_eq!(missing, vec!["intent", "correlation_id"]),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_validate_does_not_inspect_payload() {
    let mut raw = sample().to_value().unwrap();
    raw["payload"] = json!(["anything", 1, true]);
    assert!(validate(&raw).is_ok());
}

#[test]
fn test_validate_non_object() {
    match validate(&json!("nope")) {
        Err(Error::Schema { missing }) => assert_eq!(missing.len(), REQUIRED_FIELDS.len()),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_timestamp_optional_on_input() {
    let mut raw = sample().to_value().unwrap();
    raw.as_object_mut().unwrap().remove("timestamp");

    let env = Envelope::from_value(raw).unwrap();
    assert!(env.timestamp.is_none());
}

#[test]
fn test_from_value_rejects_bad_type() {
    let mut raw = sample().to_value().unwrap();
    raw["type"] = json!("gossip");

    assert!(matches!(Envelope::from_value(raw), Err(Error::Malformed(_))));
}

#[test]
fn test_intent_list_round_trip() {
    let env = Envelope::build(
        "router",
        "support_agent",
        vec!["refund_request".to_string(), "upgrade_request".to_string()],
        None,
    );
    let value = env.to_value().unwrap();
    assert_eq!(value["intent"], json!(["refund_request", "upgrade_request"]));

    let back = Envelope::from_value(value).unwrap();
    assert_eq!(back.intent.position("upgrade_request"), Some(1));
    assert_eq!(back.intent.position("cancel_subscription"), None);
}

#[test]
fn test_reply_preserves_correlation() {
    let request = sample();
    let reply = request.reply("support_agent", MessageType::Response, json!([]));

    assert_eq!(reply.correlation_id, request.correlation_id);
    assert_eq!(reply.to, "router");
    assert_eq!(reply.from, "support_agent");
    assert_eq!(reply.intent, request.intent);
    assert_ne!(reply.message_id, request.message_id);
}

#[test]
fn test_error_reply_preserves_correlation() {
    let request = sample();
    let raw = request.to_value().unwrap();
    let reply = error_reply(&raw, "handler exploded");

    assert_eq!(reply.kind, MessageType::Error);
    assert_eq!(reply.correlation_id, request.correlation_id);
    assert_eq!(reply.to, "router");
    assert_eq!(reply.from, "support_agent");
    assert_eq!(reply.payload, json!({"error": "handler exploded"}));
}

#[test]
fn test_error_reply_degrades_on_invalid_input() {
    let raw = json!({"correlation_id": "c-42"});
    let reply = error_reply(&raw, "missing fields");

    assert_eq!(reply.from, UNKNOWN_PARTY);
    assert_eq!(reply.to, UNKNOWN_PARTY);
    assert_eq!(reply.intent, Intent::from(UNKNOWN_PARTY));
    assert_eq!(reply.correlation_id, "c-42");
    assert!(reply.validate().is_ok());
}

#[test]
fn test_error_reply_on_garbage() {
    let reply = error_reply(&json!(null), "not an envelope");
    assert!(!reply.correlation_id.is_empty());
    assert!(reply.validate().is_ok());
}

#[test]
fn test_reply_swaps_parties() {
    let request = sample();
    let reply = request.reply("support_agent", MessageType::Response, json!([]));

    assert_eq!(reply.from, "support_agent");
    assert_eq!(reply.to, "router");
    assert_eq!(reply.correlation_id, request.correlation_id);
    assert_ne!(reply.message_id, request.message_id);
    tokio_test::assert_ok!(reply.validate());
    tokio_test::assert_err!(validate(&json!({"from": "router"})));
}
