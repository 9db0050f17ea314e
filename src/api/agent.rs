//! Downstream agent endpoints
//!
//! POST /a2a        - handle an envelope; always answers with an envelope
//! GET  /agent_card - capability descriptor

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use concierge_core::{AgentCard, AgentHandler, Envelope};
use serde_json::Value;
use std::sync::Arc;

async fn a2a(
    Extension(handler): Extension<Arc<AgentHandler>>,
    body: Option<Json<Value>>,
) -> Json<Envelope> {
    let raw = body.map(|Json(v)| v).unwrap_or(Value::Null);
    Json(handler.handle(raw).await)
}

async fn agent_card(Extension(card): Extension<Arc<AgentCard>>) -> Json<AgentCard> {
    Json(card.as_ref().clone())
}

/// Create routes for one downstream agent
pub fn agent_routes(handler: Arc<AgentHandler>, card: AgentCard) -> Router {
    Router::new()
        .route("/a2a", post(a2a))
        .route("/agent_card", get(agent_card))
        .layer(Extension(handler))
        .layer(Extension(Arc::new(card)))
}
