//! Agent connector
//!
//! Delivers one envelope to one agent and normalizes what comes back into a
//! [`CallResult`]. The same retry discipline drives calls to the tool server.
//!
//! # Module Structure
//!
//! - `transport`: the `Transport` trait and its `reqwest` implementation
//! - `retry`: bounded exponential backoff

mod retry;
mod transport;


pub use retry::{retry_with_backoff, RetryConfig, RetryError};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

#[cfg(test)]
pub use transport::MockTransport;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::envelope::Envelope;
use crate::error::{Error, Result};

/// Data reported when every attempt failed at the transport level
pub const ATTEMPTS_EXHAUSTED: &str = "attempts exhausted";

/// Outcome status of a call or intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Call succeeded
    Ok,
    /// Call failed
    Error,
}

impl Status {
    /// Returns the wire representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized result of one agent or tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    /// Whether the call succeeded
    pub status: Status,
    /// Reply body on success, error detail on failure
    pub data: Value,
}

impl CallResult {
    /// Successful call
    pub fn ok(data: Value) -> Self {
        Self {
            status: Status::Ok,
            data,
        }
    }

    /// Failed call
    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            data: Value::String(detail.into()),
        }
    }

    /// True when `status` is ok
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// JSON form, for handlers that forward a call result verbatim
    #[must_use]
    pub fn into_value(self) -> Value {
        serde_json::json!({
            "status": self.status.as_str(),
            "data": self.data,
        })
    }
}

/// Connector settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    /// Retry policy shared by agent and tool calls
    pub retry: RetryConfig,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Base URL of the tool server
    pub tools_url: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            timeout: Duration::from_secs(5),
            tools_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

/// Sends envelopes to agents and tool calls to the tool server
#[derive(Clone)]
pub struct AgentConnector {
    transport: Arc<dyn Transport>,
    config: ConnectorConfig,
}

impl fmt::Debug for AgentConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConnector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AgentConnector {
    /// Create a connector speaking HTTP
    pub fn new(config: ConnectorConfig) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()), config)
    }

    /// Create a connector over a custom transport
    pub fn with_transport(transport: Arc<dyn Transport>, config: ConnectorConfig) -> Self {
        Self { transport, config }
    }

    /// Connector settings
    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Deliver `envelope` to the agent at `target` (a base URL).
    ///
    /// Fails fast with [`Error::Schema`] when the envelope is invalid; no
    /// request is made in that case. Every other failure is reported as a
    /// [`CallResult`] with `status = error`.
    pub async fn send(&self, target: &str, envelope: &Envelope) -> Result<CallResult> {
        let body = envelope.to_value()?;
        crate::envelope::validate(&body)?;

        let url = format!("{}/a2a", target.trim_end_matches('/'));
        let span = info_span!("a2a", correlation_id = %envelope.correlation_id);

        async {
            info!(target = %url, intent = %envelope.intent, "A2A send");
            let result = retry_with_backoff(
                &self.config.retry,
                |attempt| self.attempt(&url, &body, attempt),
                Error::is_retryable,
            )
            .await;
            Ok(self.finish(result))
        }
        .instrument(span)
        .await
    }

    /// Call `tool_name` on the tool server with `arguments`.
    ///
    /// A reply whose body reports `"status": "error"` becomes an error result
    /// carrying the body's `error` text.
    pub async fn invoke_tool(&self, tool_name: &str, arguments: Value) -> CallResult {
        let url = format!(
            "{}/tool/{}",
            self.config.tools_url.trim_end_matches('/'),
            tool_name
        );

        let span = info_span!("tool", tool = %tool_name);

        async {
            info!(args = %arguments, "Tool call");
            let result = retry_with_backoff(
                &self.config.retry,
                |attempt| self.attempt(&url, &arguments, attempt),
                Error::is_retryable,
            )
            .await;

            match self.finish(result) {
                CallResult {
                    status: Status::Ok,
                    data,
                } => normalize_tool_body(data),
                failed => failed,
            }
        }
        .instrument(span)
        .await
    }

    /// One delivery; logs inherit the caller's `a2a` or `tool` span
    async fn attempt(&self, url: &str, body: &Value, attempt: u32) -> Result<Value> {
        debug!(attempt, url = %url, "Delivery attempt");

        let response = tokio::time::timeout(
            self.config.timeout,
            self.transport.post_json(url, body, self.config.timeout),
        )
        .await
        .map_err(|_| TransportError::Timeout(self.config.timeout))??;

        if !response.is_success() {
            return Err(Error::Application {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body)
            .map_err(|e| Error::Transport(TransportError::Decode(e.to_string())))
    }

    fn finish(&self, result: std::result::Result<Value, RetryError<Error>>) -> CallResult {
        match result {
            Ok(data) => {
                info!("Reply received");
                CallResult::ok(data)
            }
            Err(RetryError {
                last_error: Error::Application { status, body },
                ..
            }) => {
                error!(http = status, body = %body, "Peer rejected call");
                CallResult::error(format!("HTTP {}: {}", status, body))
            }
            Err(RetryError {
                last_error,
                attempts,
            }) => {
                warn!(attempts, error = %last_error, "Giving up on call");
                if last_error.is_retryable() {
                    CallResult::error(ATTEMPTS_EXHAUSTED)
                } else {
                    CallResult::error(last_error.to_string())
                }
            }
        }
    }
}

fn normalize_tool_body(body: Value) -> CallResult {
    let reported_error = body.get("status").and_then(Value::as_str) == Some("error");
    if !reported_error {
        return CallResult::ok(body);
    }

    let detail = match body.get("error") {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "tool reported an error".to_string(),
    };
    CallResult::error(detail)
}
