//! Tool server endpoints
//!
//! GET  /tools/list  - definitions of every registered tool
//! POST /tool/:name  - run one tool with the body as arguments
//! POST /tools/call  - run `tool_name` with `payload`
//! GET  /agent_card  - capability descriptor

use axum::extract::{Extension, Path};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use concierge_core::AgentCard;
use concierge_tools::{ToolDefinition, ToolRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Response of `/tools/list`
#[derive(Debug, Serialize)]
pub struct ToolList {
    pub tools: Vec<ToolDefinition>,
}

/// Body of `/tools/call`
#[derive(Debug, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// Capability descriptor of the tool server
pub fn tools_card(registry: &ToolRegistry) -> AgentCard {
    AgentCard::new("CustomerSupportMCP", "Customer and ticket tools.")
        .with_tools(registry.list_names())
}

fn arguments(body: Option<Json<Value>>) -> Value {
    match body {
        Some(Json(Value::Null)) | None => json!({}),
        Some(Json(v)) => v,
    }
}

async fn list_tools(Extension(registry): Extension<Arc<ToolRegistry>>) -> Json<ToolList> {
    Json(ToolList {
        tools: registry.list_definitions().into_iter().cloned().collect(),
    })
}

async fn call_tool(
    Extension(registry): Extension<Arc<ToolRegistry>>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Json<Value> {
    Json(registry.call(&name, arguments(body)).await)
}

async fn call_named(
    Extension(registry): Extension<Arc<ToolRegistry>>,
    Json(call): Json<ToolCall>,
) -> Json<Value> {
    let input = arguments(call.payload.map(Json));
    Json(registry.call(&call.tool_name, input).await)
}

async fn agent_card(Extension(card): Extension<Arc<AgentCard>>) -> Json<AgentCard> {
    Json(card.as_ref().clone())
}

/// Create tool server routes
pub fn tools_routes(registry: Arc<ToolRegistry>) -> Router {
    let card = tools_card(&registry);
    Router::new()
        .route("/tools/list", get(list_tools))
        .route("/tool/:name", post(call_tool))
        .route("/tools/call", post(call_named))
        .route("/agent_card", get(agent_card))
        .layer(Extension(registry))
        .layer(Extension(Arc::new(card)))
}
