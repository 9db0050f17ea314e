//! Error types for concierge-core

use crate::connector::TransportError;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Envelope is missing one or more required fields
    #[error("invalid envelope, missing fields: {}", missing.join(", "))]
    Schema {
        /// Names of the missing fields, in canonical order
        missing: Vec<String>,
    },

    /// Envelope has every field but one of them has the wrong shape
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// Connection, timeout or decode failure while talking to a peer
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Peer responded, but with a non-success status
    #[error("application error: HTTP {status}: {body}")]
    Application {
        /// HTTP status code returned by the peer
        status: u16,
        /// Response body as text
        body: String,
    },

    /// No handler is registered for the intent tag
    #[error("unknown intent: {0}")]
    UnknownIntent(String),

    /// A required top-level request field is absent or empty
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Intent payload does not match the shape the handler expects
    #[error("invalid payload for '{intent}': {message}")]
    InvalidPayload {
        /// Intent tag being handled
        intent: String,
        /// What was wrong with it
        message: String,
    },

    /// Intent tag is blank or otherwise unusable
    #[error("invalid intent tag: {0:?}")]
    InvalidIntent(String),

    /// No endpoint is configured for the target agent
    #[error("no endpoint configured for agent '{0}'")]
    UnknownAgent(String),
}

impl Error {
    /// Whether the connector should try this delivery again
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_schema_error_lists_fields() {
        let err = Error::Schema {
            missing: vec!["from".to_string(), "payload".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "invalid envelope, missing fields: from, payload"
        );
    }

    #[test]
    fn test_only_transport_errors_retry() {
        assert!(Error::Transport(TransportError::Timeout(Duration::from_secs(1))).is_retryable());
        assert!(!Error::Application {
            status: 500,
            body: "boom".to_string()
        }
        .is_retryable());
        assert!(!Error::Schema { missing: vec![] }.is_retryable());
        assert!(!Error::UnknownIntent("x".to_string()).is_retryable());
    }
}
