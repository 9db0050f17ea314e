//! Support agent
//!
//! Acknowledges account requests, reports ticket status and opens tickets.

use concierge_core::{
    intents, AgentCard, AgentConnector, AgentHandler, AgentRole, Error, IntentHandler,
    IntentRegistry, IntentRequest, Result,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use super::with_connector;

/// Priority of tickets opened by escalation
const ESCALATION_PRIORITY: &str = "medium";

#[derive(Debug, Default, Deserialize)]
struct SupportArgs {
    #[serde(default)]
    customer_id: Option<i64>,
    #[serde(default)]
    text: String,
}

fn acknowledge(answer: &'static str) -> impl IntentHandler {
    move |_request: IntentRequest| async move {
        Ok::<_, Error>(json!({"status": "ok", "answer_text": answer}))
    }
}

async fn support_request(request: IntentRequest) -> Result<Value> {
    let args: SupportArgs = request.args()?;
    Ok(json!({
        "status": "ok",
        "answer_text": format!("Support request received: {}", args.text),
    }))
}

async fn show_ticket_status(
    connector: Arc<AgentConnector>,
    request: IntentRequest,
) -> Result<Value> {
    let args: SupportArgs = request.args()?;
    let customer_id = args
        .customer_id
        .ok_or_else(|| Error::MissingField("customer_id".to_string()))?;

    Ok(connector
        .invoke_tool("list_tickets", json!({"customer_ids": [customer_id]}))
        .await
        .into_value())
}

async fn escalate_issue(connector: Arc<AgentConnector>, request: IntentRequest) -> Result<Value> {
    let args: SupportArgs = request.args()?;

    if args.text.to_lowercase().contains("billing") {
        info!(correlation_id = %request.correlation_id, "Escalation needs billing context");
        return Ok(json!({
            "status": "need_billing_context",
            "note": "Require billing info from data agent",
        }));
    }

    let customer_id = args
        .customer_id
        .ok_or_else(|| Error::MissingField("customer_id".to_string()))?;
    Ok(connector
        .invoke_tool(
            "create_ticket",
            json!({
                "customer_id": customer_id,
                "issue": args.text,
                "priority": ESCALATION_PRIORITY,
            }),
        )
        .await
        .into_value())
}

/// Intent table of the support agent
pub fn registry(connector: &Arc<AgentConnector>) -> IntentRegistry {
    IntentRegistry::new()
        .with(intents::SUPPORT_REQUEST, support_request)
        .with(intents::REFUND_REQUEST, acknowledge("Refund initiated."))
        .with(
            intents::CANCEL_SUBSCRIPTION,
            acknowledge("Subscription cancelled."),
        )
        .with(intents::UPGRADE_REQUEST, acknowledge("Customer upgraded."))
        .with(
            intents::SHOW_TICKET_STATUS,
            with_connector(connector, show_ticket_status),
        )
        .with(
            intents::ESCALATE_ISSUE,
            with_connector(connector, escalate_issue),
        )
}

/// Envelope handler of the support agent
pub fn handler(connector: &Arc<AgentConnector>) -> AgentHandler {
    AgentHandler::new(AgentRole::Support.agent_id(), registry(connector))
}

/// Agent card of the support agent
pub fn card(handler: &AgentHandler) -> AgentCard {
    AgentCard::new("Support Agent", "Handles tickets, refunds, and support logic.")
        .with_input("intent", "string")
        .with_input("payload", "object")
        .with_intents(handler.registry().intents())
        .with_tools(["create_ticket", "list_tickets"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::ConnectorConfig;

    fn request(intent: &str, payload: Value) -> IntentRequest {
        IntentRequest {
            intent: intent.to_string(),
            payload,
            correlation_id: "c-1".to_string(),
            sender: "router".to_string(),
        }
    }

    fn connector() -> Arc<AgentConnector> {
        // never reached by the handlers below
        Arc::new(AgentConnector::new(ConnectorConfig::default()))
    }

    #[tokio::test]
    async fn test_canned_answers() {
        let registry = registry(&connector());
        let refund = registry
            .get(intents::REFUND_REQUEST)
            .unwrap()
            .handle(request(intents::REFUND_REQUEST, json!({"customer_id": 1})))
            .await
            .unwrap();
        assert_eq!(refund, json!({"status": "ok", "answer_text": "Refund initiated."}));

        let support = registry
            .get(intents::SUPPORT_REQUEST)
            .unwrap()
            .handle(request(intents::SUPPORT_REQUEST, json!({"text": "hello"})))
            .await
            .unwrap();
        assert_eq!(support["answer_text"], "Support request received: hello");
    }

    #[tokio::test]
    async fn test_billing_escalation_needs_context() {
        let result = escalate_issue(
            connector(),
            request(
                intents::ESCALATE_ISSUE,
                json!({"customer_id": 1, "text": "Open a ticket about my Billing address"}),
            ),
        )
        .await
        .unwrap();

        assert_eq!(result["status"], "need_billing_context");
    }

    #[tokio::test]
    async fn test_ticket_status_requires_customer() {
        let result = show_ticket_status(
            connector(),
            request(intents::SHOW_TICKET_STATUS, json!({"text": "status?"})),
        )
        .await;

        assert!(matches!(result, Err(Error::MissingField(field)) if field == "customer_id"));
    }

    #[test]
    fn test_card_lists_intents() {
        let card = card(&handler(&connector()));
        assert_eq!(card.name, "Support Agent");
        assert_eq!(card.intents.len(), 6);
        assert_eq!(card.a2a_protocol, "REST_HTTP_JSON");
    }
}
