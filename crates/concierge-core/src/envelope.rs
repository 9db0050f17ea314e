//! Envelope protocol shared by every agent.
//!
//! Every hop between agents carries an [`Envelope`]. Incoming JSON is checked
//! with [`validate`] before it is turned into a typed value, so a malformed
//! message is rejected before any handler runs.
//!
//! ## Design
//!
//! - `message_id` is fresh per envelope, `correlation_id` is shared by every
//!   envelope that answers the same logical request
//! - `payload` stays an open JSON value here; handlers validate its shape
//! - [`error_reply`] works on raw JSON so it can answer envelopes that failed
//!   validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Fields every envelope must carry, in canonical order.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "message_id",
    "from",
    "to",
    "type",
    "intent",
    "payload",
    "correlation_id",
];

/// Sender/recipient used when an error reply cannot recover them.
pub const UNKNOWN_PARTY: &str = "unknown";

/// Envelope message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Asks the recipient to do something
    Request,
    /// Answers a request
    Response,
    /// Fire-and-forget notification
    Event,
    /// Reports a failure to process a request
    Error,
}

impl MessageType {
    /// Returns the wire representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
            Self::Event => "event",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One intent tag, or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Intent {
    /// A single tag
    Single(String),
    /// Several tags handled in one envelope
    Multiple(Vec<String>),
}

impl Intent {
    /// All tags in order
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        match self {
            Self::Single(tag) => vec![tag.clone()],
            Self::Multiple(tags) => tags.clone(),
        }
    }

    /// Position of `tag` within this intent, if present
    #[must_use]
    pub fn position(&self, tag: &str) -> Option<usize> {
        match self {
            Self::Single(t) => (t == tag).then_some(0),
            Self::Multiple(tags) => tags.iter().position(|t| t == tag),
        }
    }

    /// True when there is no usable tag at all
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Single(tag) => tag.trim().is_empty(),
            Self::Multiple(tags) => tags.is_empty(),
        }
    }
}

impl From<&str> for Intent {
    fn from(tag: &str) -> Self {
        Self::Single(tag.to_string())
    }
}

impl From<String> for Intent {
    fn from(tag: String) -> Self {
        Self::Single(tag)
    }
}

impl From<Vec<String>> for Intent {
    fn from(tags: Vec<String>) -> Self {
        Self::Multiple(tags)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(tag) => f.write_str(tag),
            Self::Multiple(tags) => write!(f, "[{}]", tags.join(", ")),
        }
    }
}

/// The unit of inter-agent communication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique per envelope instance
    pub message_id: String,
    /// Logical sender id
    pub from: String,
    /// Logical recipient id
    pub to: String,
    /// Message type
    #[serde(rename = "type")]
    pub kind: MessageType,
    /// Intent tag(s)
    pub intent: Intent,
    /// Intent-specific content
    pub payload: Value,
    /// Shared by every envelope answering the same request
    pub correlation_id: String,
    /// Creation time of this envelope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Envelope {
    /// Build a request envelope with fresh ids.
    ///
    /// A missing or null payload becomes an empty object.
    pub fn build(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        intent: impl Into<Intent>,
        payload: Option<Value>,
    ) -> Self {
        let payload = match payload {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(value) => value,
        };
        Self {
            message_id: Uuid::new_v4().to_string(),
            from: sender.into(),
            to: recipient.into(),
            kind: MessageType::Request,
            intent: intent.into(),
            payload,
            correlation_id: Uuid::new_v4().to_string(),
            timestamp: Some(Utc::now()),
        }
    }

    /// Set the message type
    #[must_use]
    pub fn with_kind(mut self, kind: MessageType) -> Self {
        self.kind = kind;
        self
    }

    /// Reuse an existing correlation id
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    /// Validate raw JSON and convert it into an envelope.
    pub fn from_value(raw: Value) -> Result<Self> {
        validate(&raw)?;
        serde_json::from_value(raw).map_err(|e| Error::Malformed(e.to_string()))
    }

    /// Serialize to JSON.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::Malformed(e.to_string()))
    }

    /// Check this envelope against the same rules applied to incoming JSON.
    pub fn validate(&self) -> Result<()> {
        validate(&self.to_value()?)
    }

    /// Derive a reply addressed back to the sender of `self`.
    ///
    /// The intent and correlation id are echoed; ids and timestamp are new.
    pub fn reply(&self, sender: impl Into<String>, kind: MessageType, payload: Value) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            from: sender.into(),
            to: self.from.clone(),
            kind,
            intent: self.intent.clone(),
            payload,
            correlation_id: self.correlation_id.clone(),
            timestamp: Some(Utc::now()),
        }
    }
}

/// Check that `raw` carries every required envelope field.
///
/// A field counts as missing when it is absent or null. Identifier fields
/// that are empty strings, and an empty intent, also count as missing. The
/// payload shape is not inspected.
pub fn validate(raw: &Value) -> Result<()> {
    let Some(fields) = raw.as_object() else {
        return Err(Error::Schema {
            missing: REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
        });
    };

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|name| match fields.get(**name) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(Value::Array(items)) => **name == "intent" && items.is_empty(),
            Some(_) => false,
        })
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Schema { missing })
    }
}

/// Build an error envelope answering `original`, whatever state it is in.
///
/// Never fails: unrecoverable parties and intent degrade to `"unknown"`, and
/// a missing correlation id is replaced with a fresh one.
pub fn error_reply(original: &Value, error_text: impl fmt::Display) -> Envelope {
    let text_field = |name: &str| {
        original
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    let intent = original
        .get("intent")
        .and_then(|v| serde_json::from_value::<Intent>(v.clone()).ok())
        .filter(|i| !i.is_blank())
        .unwrap_or_else(|| Intent::from(UNKNOWN_PARTY));

    Envelope {
        message_id: Uuid::new_v4().to_string(),
        from: text_field("to").unwrap_or_else(|| UNKNOWN_PARTY.to_string()),
        to: text_field("from").unwrap_or_else(|| UNKNOWN_PARTY.to_string()),
        kind: MessageType::Error,
        intent,
        payload: serde_json::json!({ "error": error_text.to_string() }),
        correlation_id: text_field("correlation_id")
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        timestamp: Some(Utc::now()),
    }
}

#[cfg(test)]
mod tests;
