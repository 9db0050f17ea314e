//! Request and response types of the router

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::connector::Status;
use crate::error::{Error, Result};
use crate::task::QueryContext;

/// External query as posted to `/query`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Free-form text to classify
    #[serde(default)]
    pub text: Option<String>,
    /// Customer the query is about
    #[serde(default)]
    pub customer_id: Option<i64>,
}

impl QueryRequest {
    /// Create a request with both fields set
    pub fn new(text: impl Into<String>, customer_id: i64) -> Self {
        Self {
            text: Some(text.into()),
            customer_id: Some(customer_id),
        }
    }

    /// Lenient parse of a raw body; fields of the wrong type count as absent
    #[must_use]
    pub fn from_value(raw: &Value) -> Self {
        Self {
            text: raw.get("text").and_then(Value::as_str).map(str::to_string),
            customer_id: raw.get("customer_id").and_then(Value::as_i64),
        }
    }

    /// Check required fields and produce the routing context
    pub fn into_context(self) -> Result<QueryContext> {
        let text = self
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::MissingField("text".to_string()))?;
        let customer_id = self
            .customer_id
            .filter(|id| *id != 0)
            .ok_or_else(|| Error::MissingField("customer_id".to_string()))?;

        Ok(QueryContext::new(customer_id, text))
    }
}

/// Result of one task after transport and normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Intent tag of the task
    pub intent: String,
    /// Per-intent status
    pub status: Status,
    /// Result on success, error detail on failure
    pub data: Value,
    /// Escalation hint carried over from the task
    pub requires_escalation: bool,
}

impl Outcome {
    /// Failed outcome with a textual detail
    pub fn failed(
        intent: impl Into<String>,
        detail: impl Into<String>,
        requires_escalation: bool,
    ) -> Self {
        Self {
            intent: intent.into(),
            status: Status::Error,
            data: Value::String(detail.into()),
            requires_escalation,
        }
    }

    /// True when `status` is ok
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Merged answer to one external query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResponse {
    /// Always ok; per-intent detail lives in `results`
    pub status: Status,
    /// One outcome per task, in submission order
    pub results: Vec<Outcome>,
}

impl AggregateResponse {
    /// Wrap ordered outcomes
    pub fn new(results: Vec<Outcome>) -> Self {
        Self {
            status: Status::Ok,
            results,
        }
    }
}
