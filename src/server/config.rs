//! Server configuration types
//!
//! Contains the configuration structures shared by every Concierge service.

use concierge_core::{AgentDirectory, AgentRole, ConnectorConfig, RetryConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub connector: ConnectorSettings,
}

impl AppConfig {
    /// Task routing table built from `[agents]`
    pub fn directory(&self) -> AgentDirectory {
        AgentDirectory::new()
            .with_endpoint(AgentRole::CustomerData, &self.agents.customer_data_url)
            .with_endpoint(AgentRole::Support, &self.agents.support_url)
    }

    /// Connector settings built from `[connector]` and the tool server URL
    pub fn connector_config(&self) -> ConnectorConfig {
        let c = &self.connector;
        ConnectorConfig {
            retry: RetryConfig::new()
                .with_max_attempts(c.max_attempts)
                .with_base_delay(Duration::from_millis(c.base_delay_ms))
                .with_max_delay(Duration::from_millis(c.max_delay_ms)),
            timeout: Duration::from_millis(c.timeout_ms),
            tools_url: self.agents.tools_url.clone(),
        }
    }
}

/// Listen addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub router_port: u16,
    pub customer_data_port: u16,
    pub support_port: u16,
    pub tools_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            router_port: 8100,
            customer_data_port: 8101,
            support_port: 8102,
            tools_port: 8000,
        }
    }
}

/// Base URLs used to reach each service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentsConfig {
    pub router_url: String,
    pub customer_data_url: String,
    pub support_url: String,
    pub tools_url: String,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            router_url: "http://127.0.0.1:8100".to_string(),
            customer_data_url: "http://127.0.0.1:8101".to_string(),
            support_url: "http://127.0.0.1:8102".to_string(),
            tools_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

/// Retry and timeout settings of the agent connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            timeout_ms: default_timeout_ms(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_base_delay_ms() -> u64 {
    1000
}
fn default_max_delay_ms() -> u64 {
    30_000
}
