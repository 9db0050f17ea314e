//! reset_db tool

use crate::error::Result;
use crate::registry::{RiskLevel, Tool, ToolDefinition};
use crate::store::RecordStore;
use serde_json::{json, Value};
use std::sync::Arc;

/// Restore the seed records
pub struct ResetDbTool {
    definition: ToolDefinition,
    store: Arc<RecordStore>,
}

impl ResetDbTool {
    /// Create the tool over `store`
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        let definition =
            ToolDefinition::new("reset_db", "Resets the records to their initial state")
                .with_risk_level(RiskLevel::High);
        Self { definition, store }
    }
}

#[async_trait::async_trait]
impl Tool for ResetDbTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        self.store.reset().await;
        Ok(json!({"status": "ok", "message": "Database reset completed"}))
    }

    fn validate_input(&self, _input: &Value) -> Result<()> {
        Ok(())
    }
}
