//! Specialist agents
//!
//! Each agent is an intent registry plus an agent card; the HTTP surface
//! lives in `crate::api::agent`.

pub mod customer_data;
pub mod support;

use concierge_core::{AgentConnector, IntentHandler, IntentRequest, Result};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Adapt a handler that needs the connector into an [`IntentHandler`]
pub(crate) fn with_connector<F, Fut>(
    connector: &Arc<AgentConnector>,
    handler: F,
) -> impl IntentHandler
where
    F: Fn(Arc<AgentConnector>, IntentRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    let connector = connector.clone();
    move |request: IntentRequest| handler(connector.clone(), request)
}
