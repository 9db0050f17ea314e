//! Router agent endpoints
//!
//! POST /query      - classify, fan out and aggregate a customer query
//! POST /a2a        - acknowledge envelopes addressed to the router
//! GET  /agent_card - capability descriptor

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use concierge_core::{
    error_reply, AgentCard, Envelope, Error, MessageType, Orchestrator, QueryRequest,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Body of a rejected query
const MISSING_FIELDS: &str = "Missing 'text' or 'customer_id'";

/// Capability descriptor of the router
pub fn router_card() -> AgentCard {
    AgentCard::new(
        "Router Agent",
        "Orchestrates multi-agent workflows for customer service.",
    )
    .with_input("text", "string")
    .with_input("customer_id", "int")
    .with_output("results", "array")
}

async fn query(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    body: Option<Json<Value>>,
) -> Response {
    let raw = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let request = QueryRequest::from_value(&raw);

    match orchestrator.handle_query(request).await {
        Ok(response) => Json(response).into_response(),
        Err(Error::MissingField(field)) => {
            debug!(field = %field, "Rejecting query");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "message": MISSING_FIELDS})),
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn a2a(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    body: Option<Json<Value>>,
) -> Json<Envelope> {
    let raw = body.map(|Json(v)| v).unwrap_or(Value::Null);
    match Envelope::from_value(raw.clone()) {
        Ok(envelope) => {
            debug!(
                from = %envelope.from,
                correlation_id = %envelope.correlation_id,
                "Router received envelope"
            );
            Json(envelope.reply(
                orchestrator.agent_id(),
                MessageType::Response,
                json!({"status": "ok", "note": "Router received your message"}),
            ))
        }
        Err(e) => Json(error_reply(&raw, e)),
    }
}

async fn agent_card(Extension(card): Extension<Arc<AgentCard>>) -> Json<AgentCard> {
    Json(card.as_ref().clone())
}

/// Create router routes
pub fn router_routes(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/query", post(query))
        .route("/a2a", post(a2a))
        .route("/agent_card", get(agent_card))
        .layer(Extension(orchestrator))
        .layer(Extension(Arc::new(router_card())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_card() {
        let card = router_card();
        assert_eq!(card.name, "Router Agent");
        assert_eq!(card.input_schema["customer_id"], "int");
        assert!(card.tools.is_empty());
    }

    fn orchestrator() -> Extension<Arc<Orchestrator>> {
        let connector = Arc::new(concierge_core::AgentConnector::new(Default::default()));
        let builder = concierge_core::TaskBuilder::new(Default::default());
        Extension(Arc::new(Orchestrator::new(builder, connector)))
    }

    #[tokio::test]
    async fn test_a2a_ack() {
        let request = Envelope::build("support_agent", "router", "support_request", None);
        let body = Json(request.to_value().unwrap());

        let Json(reply) = a2a(orchestrator(), Some(body)).await;

        assert_eq!(reply.kind, MessageType::Response);
        assert_eq!(reply.to, "support_agent");
        assert_eq!(reply.correlation_id, request.correlation_id);
        assert_eq!(reply.payload["note"], "Router received your message");
    }

    #[tokio::test]
    async fn test_a2a_rejects_invalid_envelope() {
        let Json(reply) = a2a(orchestrator(), None).await;
        assert_eq!(reply.kind, MessageType::Error);
    }
}
