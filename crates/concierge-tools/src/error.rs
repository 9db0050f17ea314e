//! Error types for concierge-tools

use thiserror::Error;

/// Tool error type
#[derive(Debug, Error)]
pub enum Error {
    /// No tool registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments do not match the tool's parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Referenced record does not exist
    #[error("{kind} {id} not found")]
    NotFound {
        /// Record kind, e.g. `customer`
        kind: &'static str,
        /// Requested id
        id: i64,
    },
}

impl Error {
    /// Shorthand for a missing customer
    #[must_use]
    pub fn customer_not_found(id: i64) -> Self {
        Self::NotFound {
            kind: "customer",
            id,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
