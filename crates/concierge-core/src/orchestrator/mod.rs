//! Router orchestration
//!
//! One external query is classified into intents, each intent becomes a
//! [`Task`], every task is delivered on its own tokio task, and the replies
//! are merged into an [`AggregateResponse`] in submission order.
//!
//! # Module Structure
//!
//! - `types`: query, outcome and aggregate types
//! - `normalize`: reduction of heterogeneous replies to `(status, data)`

mod normalize;
mod types;

#[cfg(test)]
mod tests;

pub use types::{AggregateResponse, Outcome, QueryRequest};

use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::classifier::{IntentClassifier, KeywordClassifier};
use crate::connector::{AgentConnector, CallResult};
use crate::error::Result;
use crate::task::{QueryContext, Task, TaskBuilder};

/// Sender id used by the router
pub const ROUTER_ID: &str = "router";

enum Branch {
    Resolved(Outcome),
    Running {
        intent: String,
        requires_escalation: bool,
        handle: JoinHandle<CallResult>,
    },
}

impl Branch {
    async fn settle(self) -> Outcome {
        match self {
            Self::Resolved(outcome) => outcome,
            Self::Running {
                intent,
                requires_escalation,
                handle,
            } => match handle.await {
                Ok(call) => {
                    let (status, data) = normalize::normalize(&intent, call);
                    Outcome {
                        intent,
                        status,
                        data,
                        requires_escalation,
                    }
                }
                Err(e) => {
                    warn!(intent = %intent, error = %e, "Branch aborted");
                    Outcome::failed(intent, format!("branch aborted: {e}"), requires_escalation)
                }
            },
        }
    }
}

/// Fans tasks out to specialist agents and merges their replies
#[derive(Clone)]
pub struct Orchestrator {
    agent_id: String,
    classifier: Arc<dyn IntentClassifier>,
    builder: TaskBuilder,
    connector: Arc<AgentConnector>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("agent_id", &self.agent_id)
            .field("builder", &self.builder)
            .field("connector", &self.connector)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create an orchestrator using the keyword classifier
    pub fn new(builder: TaskBuilder, connector: Arc<AgentConnector>) -> Self {
        Self {
            agent_id: ROUTER_ID.to_string(),
            classifier: Arc::new(KeywordClassifier::new()),
            builder,
            connector,
        }
    }

    /// Replace the classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the sender id put on outgoing envelopes
    #[must_use]
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    /// Sender id of this router
    #[must_use]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Serve one external query.
    ///
    /// Fails only when a required request field is missing; per-intent
    /// failures are reported inside the aggregate.
    pub async fn handle_query(&self, request: QueryRequest) -> Result<AggregateResponse> {
        let context = request.into_context()?;
        let intents = self.classifier.classify(&context.text);

        info!(
            customer_id = context.customer_id,
            intents = ?intents,
            "Routing query"
        );

        let branches = intents
            .iter()
            .map(|intent| self.start(intent, &context))
            .collect();

        Ok(AggregateResponse::new(Self::collect(branches).await))
    }

    /// Deliver already built tasks concurrently; one outcome per task, in order
    pub async fn dispatch(&self, tasks: Vec<Task>) -> Vec<Outcome> {
        let branches = tasks.into_iter().map(|task| self.spawn(task)).collect();
        Self::collect(branches).await
    }

    fn start(&self, intent: &str, context: &QueryContext) -> Branch {
        match self.builder.build(intent, context) {
            Ok(task) => self.spawn(task),
            Err(e) => {
                warn!(intent = %intent, error = %e, "Task build failed");
                Branch::Resolved(Outcome::failed(
                    intent,
                    e.to_string(),
                    crate::task::requires_escalation(intent.trim()),
                ))
            }
        }
    }

    fn spawn(&self, task: Task) -> Branch {
        let intent = task.intent.clone();
        let requires_escalation = task.requires_escalation;
        let connector = self.connector.clone();
        let sender = self.agent_id.clone();

        let handle = tokio::spawn(async move {
            let envelope = match task.envelope(&sender) {
                Ok(envelope) => envelope,
                Err(e) => return CallResult::error(e.to_string()),
            };
            connector
                .send(&task.target_endpoint, &envelope)
                .await
                .unwrap_or_else(|e| CallResult::error(e.to_string()))
        });

        Branch::Running {
            intent,
            requires_escalation,
            handle,
        }
    }

    async fn collect(branches: Vec<Branch>) -> Vec<Outcome> {
        let outcomes = join_all(branches.into_iter().map(Branch::settle)).await;

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        info!(total = outcomes.len(), failed, "Fan-out complete");
        outcomes
    }
}
