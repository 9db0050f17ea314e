//! Concierge Core - Agent Protocol and Orchestration
//!
//! This crate provides the inter-agent layer of the Concierge agents,
//! including:
//! - Envelope: the message unit agents exchange, its validation and replies
//! - Connector: delivery with bounded retry, plus tool invocation
//! - Classifier: free text to intent tags
//! - Task: intent to target agent and typed payload
//! - Orchestrator: concurrent fan-out and ordered aggregation
//! - Handler: intent registry dispatch for downstream agents

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod card;
pub mod classifier;
pub mod connector;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod orchestrator;
pub mod task;

pub use card::AgentCard;
pub use classifier::{IntentClassifier, KeywordClassifier};
pub use connector::{
    AgentConnector, CallResult, ConnectorConfig, HttpTransport, RetryConfig, Status, Transport,
    TransportError, TransportResponse,
};
pub use envelope::{error_reply, validate, Envelope, Intent, MessageType};
pub use error::{Error, Result};
pub use handler::{AgentHandler, IntentHandler, IntentRegistry, IntentRequest};
pub use orchestrator::{AggregateResponse, Orchestrator, Outcome, QueryRequest};
pub use task::{
    intents, AgentDirectory, AgentRole, CustomerUpdates, QueryContext, Task, TaskBuilder,
    TaskPayload,
};
