//! Downstream agent dispatch
//!
//! An [`AgentHandler`] receives an envelope that may carry several intents,
//! looks each one up in its [`IntentRegistry`], runs the handlers
//! concurrently and replies with one result per intent, in intent order.

use async_trait::async_trait;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::envelope::{error_reply, Envelope, Intent, MessageType};
use crate::error::{Error, Result};

/// One intent of an incoming envelope, as seen by its handler
#[derive(Debug, Clone, PartialEq)]
pub struct IntentRequest {
    /// Intent tag being handled
    pub intent: String,
    /// Envelope payload, shared by every intent of the envelope
    pub payload: Value,
    /// Correlation id of the envelope
    pub correlation_id: String,
    /// Sender of the envelope
    pub sender: String,
}

impl IntentRequest {
    /// Deserialize the payload into the handler's argument type
    pub fn args<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone()).map_err(|e| Error::InvalidPayload {
            intent: self.intent.clone(),
            message: e.to_string(),
        })
    }
}

/// Handles one intent tag
#[async_trait]
pub trait IntentHandler: Send + Sync {
    /// Produce the per-intent result map
    async fn handle(&self, request: IntentRequest) -> Result<Value>;
}

#[async_trait]
impl<F, Fut> IntentHandler for F
where
    F: Fn(IntentRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send,
{
    async fn handle(&self, request: IntentRequest) -> Result<Value> {
        (self)(request).await
    }
}

/// Intent tag to handler table
#[derive(Default, Clone)]
pub struct IntentRegistry {
    handlers: HashMap<String, Arc<dyn IntentHandler>>,
}

impl fmt::Debug for IntentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRegistry")
            .field("intents", &self.intents())
            .finish()
    }
}

impl IntentRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `intent`, replacing any previous one
    pub fn register(&mut self, intent: impl Into<String>, handler: impl IntentHandler + 'static) {
        let intent = intent.into();
        debug!(intent = %intent, "Registering intent handler");
        self.handlers.insert(intent, Arc::new(handler));
    }

    /// Builder form of [`register`](Self::register)
    #[must_use]
    pub fn with(
        mut self,
        intent: impl Into<String>,
        handler: impl IntentHandler + 'static,
    ) -> Self {
        self.register(intent, handler);
        self
    }

    /// Handler for `intent`
    #[must_use]
    pub fn get(&self, intent: &str) -> Option<Arc<dyn IntentHandler>> {
        self.handlers.get(intent).cloned()
    }

    /// Registered tags, sorted
    #[must_use]
    pub fn intents(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.handlers.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Number of registered intents
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

fn error_entry(error: impl fmt::Display) -> Value {
    json!({ "status": "error", "error": error.to_string() })
}

/// Envelope entry point of a downstream agent
#[derive(Debug, Clone)]
pub struct AgentHandler {
    agent_id: String,
    registry: Arc<IntentRegistry>,
}

impl AgentHandler {
    /// Create a handler answering as `agent_id`
    pub fn new(agent_id: impl Into<String>, registry: IntentRegistry) -> Self {
        Self {
            agent_id: agent_id.into(),
            registry: Arc::new(registry),
        }
    }

    /// Agent id used as sender of replies
    #[must_use]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Intent table
    #[must_use]
    pub fn registry(&self) -> &IntentRegistry {
        &self.registry
    }

    /// Answer one raw envelope. Never fails: invalid input gets an error
    /// envelope, per-intent failures become error entries in the payload.
    pub async fn handle(&self, raw: Value) -> Envelope {
        let envelope = match Envelope::from_value(raw.clone()) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(agent = %self.agent_id, error = %e, "Rejected envelope");
                return error_reply(&raw, e);
            }
        };

        let cid = envelope.correlation_id.clone();
        let tags = envelope.intent.tags();
        info!(
            agent = %self.agent_id,
            correlation_id = %cid,
            intents = ?tags,
            "A2A request"
        );

        let results = join_all(tags.iter().map(|tag| self.run(tag, &envelope))).await;

        let mut reply = envelope.reply(
            self.agent_id.clone(),
            MessageType::Response,
            Value::Array(results),
        );
        reply.intent = Intent::Multiple(tags);
        reply
    }

    async fn run(&self, tag: &str, envelope: &Envelope) -> Value {
        let Some(handler) = self.registry.get(tag) else {
            warn!(agent = %self.agent_id, intent = %tag, "Unknown intent");
            return error_entry(Error::UnknownIntent(tag.to_string()));
        };

        let request = IntentRequest {
            intent: tag.to_string(),
            payload: envelope.payload.clone(),
            correlation_id: envelope.correlation_id.clone(),
            sender: envelope.from.clone(),
        };

        match handler.handle(request).await {
            Ok(result) => result,
            Err(e) => {
                warn!(agent = %self.agent_id, intent = %tag, error = %e, "Intent failed");
                error_entry(e)
            }
        }
    }
}
