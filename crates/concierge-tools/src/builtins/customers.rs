//! Customer record tools: get_customer, list_customers, update_customer

use crate::error::Result;
use crate::registry::{ok_result, parse_input, RiskLevel, Tool, ToolDefinition};
use crate::store::{CustomerFilter, CustomerUpdate, RecordStore};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Default page size of `list_customers`
const DEFAULT_LIST_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct CustomerIdInput {
    customer_id: i64,
}

/// Look up one customer
pub struct GetCustomerTool {
    definition: ToolDefinition,
    store: Arc<RecordStore>,
}

impl GetCustomerTool {
    /// Create the tool over `store`
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        let definition = ToolDefinition::new("get_customer", "Retrieves a customer by their ID")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "customer_id": {"type": "integer", "description": "Customer ID"}
                },
                "required": ["customer_id"]
            }));
        Self { definition, store }
    }
}

#[async_trait::async_trait]
impl Tool for GetCustomerTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let input: CustomerIdInput = parse_input(input)?;
        let customer = self.store.customer(input.customer_id).await?;
        ok_result("customer", customer)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListCustomersInput {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    tier: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

/// List customers with optional status and tier filters
pub struct ListCustomersTool {
    definition: ToolDefinition,
    store: Arc<RecordStore>,
}

impl ListCustomersTool {
    /// Create the tool over `store`
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        let definition = ToolDefinition::new(
            "list_customers",
            "Lists customers with optional filters for status or tier",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "status": {"type": "string", "enum": ["active", "disabled"]},
                "tier": {"type": "string", "enum": ["basic", "premium", "enterprise"]},
                "limit": {"type": "integer", "description": "Maximum results (default: 10)"}
            },
            "required": []
        }));
        Self { definition, store }
    }
}

#[async_trait::async_trait]
impl Tool for ListCustomersTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let input: ListCustomersInput = parse_input(input)?;
        let filter = CustomerFilter {
            status: input.status.as_deref().map(str::parse).transpose()?,
            tier: input.tier.as_deref().map(str::parse).transpose()?,
            limit: Some(input.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
        };
        ok_result("customers", self.store.list_customers(&filter).await)
    }
}

#[derive(Debug, Default, Deserialize)]
struct UpdateFields {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    tier: Option<String>,
    #[serde(default)]
    billing_info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateCustomerInput {
    customer_id: i64,
    #[serde(default)]
    data: UpdateFields,
}

/// Change email, tier or billing note of a customer
pub struct UpdateCustomerTool {
    definition: ToolDefinition,
    store: Arc<RecordStore>,
}

impl UpdateCustomerTool {
    /// Create the tool over `store`
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        let definition = ToolDefinition::new(
            "update_customer",
            "Updates customer details (email, tier, billing_info)",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "customer_id": {"type": "integer"},
                "data": {
                    "type": "object",
                    "properties": {
                        "email": {"type": "string"},
                        "tier": {"type": "string"},
                        "billing_info": {"type": "string"}
                    }
                }
            },
            "required": ["customer_id", "data"]
        }))
        .with_risk_level(RiskLevel::Medium);
        Self { definition, store }
    }
}

#[async_trait::async_trait]
impl Tool for UpdateCustomerTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let input: UpdateCustomerInput = parse_input(input)?;
        let update = CustomerUpdate {
            email: input.data.email,
            tier: input.data.tier.as_deref().map(str::parse).transpose()?,
            billing_info: input.data.billing_info,
        };
        let customer = self.store.update_customer(input.customer_id, update).await?;
        ok_result("customer", customer)
    }
}
