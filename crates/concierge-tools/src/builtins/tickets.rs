//! Ticket tools: create_ticket, get_customer_history, list_tickets

use crate::error::Result;
use crate::registry::{ok_result, parse_input, RiskLevel, Tool, ToolDefinition};
use crate::store::{Priority, RecordStore, TicketFilter};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct CreateTicketInput {
    customer_id: i64,
    issue: String,
    #[serde(default)]
    priority: Option<String>,
}

/// Open a ticket for a customer
pub struct CreateTicketTool {
    definition: ToolDefinition,
    store: Arc<RecordStore>,
}

impl CreateTicketTool {
    /// Create the tool over `store`
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        let definition =
            ToolDefinition::new("create_ticket", "Creates a support ticket for a customer")
                .with_parameters(json!({
                    "type": "object",
                    "properties": {
                        "customer_id": {"type": "integer"},
                        "issue": {"type": "string"},
                        "priority": {"type": "string", "enum": ["low", "medium", "high"]}
                    },
                    "required": ["customer_id", "issue"]
                }))
                .with_risk_level(RiskLevel::Medium);
        Self { definition, store }
    }
}

#[async_trait::async_trait]
impl Tool for CreateTicketTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let input: CreateTicketInput = parse_input(input)?;
        let priority = match input.priority.as_deref() {
            Some(p) => p.parse()?,
            None => Priority::Medium,
        };
        let ticket = self
            .store
            .create_ticket(input.customer_id, &input.issue, priority)
            .await?;
        ok_result("ticket", ticket)
    }
}

#[derive(Debug, Deserialize)]
struct HistoryInput {
    customer_id: i64,
}

/// Ticket history of one customer
pub struct CustomerHistoryTool {
    definition: ToolDefinition,
    store: Arc<RecordStore>,
}

impl CustomerHistoryTool {
    /// Create the tool over `store`
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        let definition = ToolDefinition::new(
            "get_customer_history",
            "Retrieves ticket history for a specific customer",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {"customer_id": {"type": "integer"}},
            "required": ["customer_id"]
        }));
        Self { definition, store }
    }
}

#[async_trait::async_trait]
impl Tool for CustomerHistoryTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let input: HistoryInput = parse_input(input)?;
        ok_result("history", self.store.history(input.customer_id).await?)
    }
}

#[derive(Debug, Deserialize)]
struct ListTicketsInput {
    customer_ids: Vec<i64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

/// Tickets of several customers with optional filters
pub struct ListTicketsTool {
    definition: ToolDefinition,
    store: Arc<RecordStore>,
}

impl ListTicketsTool {
    /// Create the tool over `store`
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        let definition = ToolDefinition::new(
            "list_tickets",
            "Lists tickets for specific customers with optional filters",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "customer_ids": {"type": "array", "items": {"type": "integer"}},
                "status": {"type": "string", "enum": ["open", "in_progress", "resolved"]},
                "priority": {"type": "string", "enum": ["low", "medium", "high"]}
            },
            "required": ["customer_ids"]
        }));
        Self { definition, store }
    }
}

#[async_trait::async_trait]
impl Tool for ListTicketsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let input: ListTicketsInput = parse_input(input)?;
        let filter = TicketFilter {
            customer_ids: input.customer_ids,
            status: input.status.as_deref().map(str::parse).transpose()?,
            priority: input.priority.as_deref().map(str::parse).transpose()?,
        };
        ok_result("tickets", self.store.list_tickets(&filter).await)
    }
}
