//! Customer data agent
//!
//! Serves record lookups and updates by delegating to the tool server.

use concierge_core::{
    intents, AgentCard, AgentConnector, AgentHandler, AgentRole, CustomerUpdates, Error,
    IntentRegistry, IntentRequest, Result,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use super::with_connector;

#[derive(Debug, Deserialize)]
struct LookupArgs {
    customer_id: i64,
}

#[derive(Debug, Deserialize)]
struct EmailUpdateArgs {
    customer_id: i64,
    #[serde(default)]
    updates: CustomerUpdates,
}

#[derive(Debug, Deserialize)]
struct ListingArgs {
    #[serde(default)]
    status: Option<String>,
}

async fn get_customer_info(
    connector: Arc<AgentConnector>,
    request: IntentRequest,
) -> Result<Value> {
    let args: LookupArgs = request.args()?;
    Ok(connector
        .invoke_tool("get_customer", json!({"customer_id": args.customer_id}))
        .await
        .into_value())
}

async fn get_customer_history(
    connector: Arc<AgentConnector>,
    request: IntentRequest,
) -> Result<Value> {
    let args: LookupArgs = request.args()?;
    Ok(connector
        .invoke_tool("get_customer_history", json!({"customer_id": args.customer_id}))
        .await
        .into_value())
}

async fn update_email(connector: Arc<AgentConnector>, request: IntentRequest) -> Result<Value> {
    let args: EmailUpdateArgs = request.args()?;
    if args.updates.email.is_none() {
        return Err(Error::InvalidPayload {
            intent: request.intent,
            message: "no email address found in request".to_string(),
        });
    }

    info!(
        customer_id = args.customer_id,
        correlation_id = %request.correlation_id,
        "Updating customer email"
    );
    Ok(connector
        .invoke_tool(
            "update_customer",
            json!({"customer_id": args.customer_id, "data": args.updates}),
        )
        .await
        .into_value())
}

async fn list_customers(connector: Arc<AgentConnector>, request: IntentRequest) -> Result<Value> {
    let args: ListingArgs = request.args()?;
    Ok(connector
        .invoke_tool("list_customers", json!({"status": args.status}))
        .await
        .into_value())
}

/// Intent table of the customer data agent
pub fn registry(connector: &Arc<AgentConnector>) -> IntentRegistry {
    IntentRegistry::new()
        .with(
            intents::GET_CUSTOMER_INFO,
            with_connector(connector, get_customer_info),
        )
        .with(
            intents::GET_CUSTOMER_HISTORY,
            with_connector(connector, get_customer_history),
        )
        .with(intents::UPDATE_EMAIL, with_connector(connector, update_email))
        .with(
            intents::LIST_CUSTOMERS,
            with_connector(connector, list_customers),
        )
}

/// Envelope handler of the customer data agent
pub fn handler(connector: &Arc<AgentConnector>) -> AgentHandler {
    AgentHandler::new(AgentRole::CustomerData.agent_id(), registry(connector))
}

/// Agent card of the customer data agent
pub fn card(handler: &AgentHandler) -> AgentCard {
    AgentCard::new("Customer Data Agent", "Reads and updates customer records.")
        .with_input("intent", "string")
        .with_input("payload", "object")
        .with_intents(handler.registry().intents())
        .with_tools([
            "get_customer",
            "get_customer_history",
            "update_customer",
            "list_customers",
        ])
}
