//! Agent capability descriptors served at `GET /agent_card`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol tag advertised by every agent
pub const A2A_PROTOCOL: &str = "REST_HTTP_JSON";

/// Static description of what an agent offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCard {
    /// Human readable name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Field name to type hint of accepted input
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub input_schema: Map<String, Value>,
    /// Field name to type hint of produced output
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub output_schema: Map<String, Value>,
    /// Intents the agent handles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intents: Vec<String>,
    /// Tool names the agent uses or exposes
    pub tools: Vec<String>,
    /// Transport protocol tag
    pub a2a_protocol: String,
}

impl AgentCard {
    /// Card with no schemas, intents or tools
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: Map::new(),
            output_schema: Map::new(),
            intents: Vec::new(),
            tools: Vec::new(),
            a2a_protocol: A2A_PROTOCOL.to_string(),
        }
    }

    /// Add an input field hint
    #[must_use]
    pub fn with_input(mut self, field: &str, kind: &str) -> Self {
        self.input_schema
            .insert(field.to_string(), Value::String(kind.to_string()));
        self
    }

    /// Add an output field hint
    #[must_use]
    pub fn with_output(mut self, field: &str, kind: &str) -> Self {
        self.output_schema
            .insert(field.to_string(), Value::String(kind.to_string()));
        self
    }

    /// Set handled intents
    #[must_use]
    pub fn with_intents(mut self, intents: Vec<String>) -> Self {
        self.intents = intents;
        self
    }

    /// Set tool names
    #[must_use]
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }
}
