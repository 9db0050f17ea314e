//! Reply normalization
//!
//! Agents answer in different shapes: a response envelope whose payload is a
//! list of per-intent results, an error envelope, or a plain JSON object.
//! Everything is reduced to a `(status, data)` pair here.

use serde_json::Value;

use crate::connector::{CallResult, Status};
use crate::envelope::MessageType;

fn status_of(value: &Value) -> Status {
    match value.get("status").and_then(Value::as_str) {
        Some("error") => Status::Error,
        _ => Status::Ok,
    }
}

fn error_detail(payload: &Value) -> Value {
    payload
        .get("error")
        .cloned()
        .unwrap_or_else(|| payload.clone())
}

fn is_envelope(value: &Value) -> bool {
    value.get("type").is_some() && value.get("payload").is_some()
}

/// Reduce one connector result to the status and data of `intent`
pub(crate) fn normalize(intent: &str, call: CallResult) -> (Status, Value) {
    if !call.is_ok() {
        return (call.status, call.data);
    }

    let reply = call.data;
    if !is_envelope(&reply) {
        return (status_of(&reply), reply);
    }

    let payload = reply.get("payload").cloned().unwrap_or(Value::Null);
    let kind = reply
        .get("type")
        .cloned()
        .and_then(|v| serde_json::from_value::<MessageType>(v).ok());
    if kind == Some(MessageType::Error) {
        return (Status::Error, error_detail(&payload));
    }

    match payload {
        Value::Array(mut items) => {
            match intent_position(&reply, intent) {
                Some(position) if position < items.len() => {
                    let item = items.swap_remove(position);
                    (status_of(&item), item)
                }
                _ => (
                    Status::Error,
                    Value::String(format!("reply carries no result for '{intent}'")),
                ),
            }
        }
        other => (Status::Ok, other),
    }
}

/// Index of `intent` in the reply's tag list; `None` when a list lacks it
fn intent_position(reply: &Value, intent: &str) -> Option<usize> {
    match reply.get("intent") {
        Some(Value::Array(tags)) => tags.iter().position(|t| t.as_str() == Some(intent)),
        _ => Some(0),
    }
}
