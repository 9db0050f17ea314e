//! Task building
//!
//! Turns one intent tag plus the query context into a [`Task`]: which agent
//! handles it, where that agent lives, what payload it gets, and whether the
//! intent needs escalation. Building never performs I/O.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::envelope::Envelope;
use crate::error::{Error, Result};

/// Intent tags understood by the bundled agents
pub mod intents {
    /// Look up a customer record
    pub const GET_CUSTOMER_INFO: &str = "get_customer_info";
    /// Ticket history of a customer
    pub const GET_CUSTOMER_HISTORY: &str = "get_customer_history";
    /// Change a customer's email address
    pub const UPDATE_EMAIL: &str = "update_email";
    /// List customers by status
    pub const LIST_CUSTOMERS: &str = "list_customers";
    /// Generic support question
    pub const SUPPORT_REQUEST: &str = "support_request";
    /// Refund a charge
    pub const REFUND_REQUEST: &str = "refund_request";
    /// Cancel a subscription
    pub const CANCEL_SUBSCRIPTION: &str = "cancel_subscription";
    /// Upgrade an account
    pub const UPGRADE_REQUEST: &str = "upgrade_request";
    /// Status of existing tickets
    pub const SHOW_TICKET_STATUS: &str = "show_ticket_status";
    /// Open a new ticket
    pub const ESCALATE_ISSUE: &str = "escalate_issue";
}

/// Intents that affect the account or billing
const ESCALATED_INTENTS: [&str; 5] = [
    intents::UPDATE_EMAIL,
    intents::REFUND_REQUEST,
    intents::CANCEL_SUBSCRIPTION,
    intents::UPGRADE_REQUEST,
    intents::ESCALATE_ISSUE,
];

/// Customer status used for listing queries
const LISTING_STATUS: &str = "active";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+").expect("valid email regex")
});

/// Whether `intent` must carry the escalation flag
#[must_use]
pub fn requires_escalation(intent: &str) -> bool {
    ESCALATED_INTENTS.contains(&intent)
}

/// First email address in `text`, without trailing punctuation
#[must_use]
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_PATTERN
        .find(text)
        .map(|m| m.as_str().trim_end_matches(['.', '-']).to_string())
}

/// Specialist agents the router can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Customer records
    CustomerData,
    /// Tickets and account support
    Support,
}

impl AgentRole {
    /// Logical agent id used in envelopes
    #[must_use]
    pub fn agent_id(&self) -> &'static str {
        match self {
            Self::CustomerData => "customer_data_agent",
            Self::Support => "support_agent",
        }
    }

    /// Routing table: which agent handles `intent`
    #[must_use]
    pub fn for_intent(intent: &str) -> Self {
        match intent {
            intents::GET_CUSTOMER_INFO
            | intents::GET_CUSTOMER_HISTORY
            | intents::UPDATE_EMAIL
            | intents::LIST_CUSTOMERS => Self::CustomerData,
            _ => Self::Support,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.agent_id())
    }
}

/// Base URLs of the specialist agents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentDirectory {
    endpoints: HashMap<AgentRole, String>,
}

impl AgentDirectory {
    /// Empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the base URL of `role`
    #[must_use]
    pub fn with_endpoint(mut self, role: AgentRole, url: impl Into<String>) -> Self {
        self.endpoints.insert(role, url.into());
        self
    }

    /// Base URL of `role`, if configured
    #[must_use]
    pub fn endpoint(&self, role: AgentRole) -> Option<&str> {
        self.endpoints.get(&role).map(String::as_str)
    }
}

/// What the router knows about the query being served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// Customer the query is about
    pub customer_id: i64,
    /// Original free-form text
    pub text: String,
}

impl QueryContext {
    /// Create a context
    pub fn new(customer_id: i64, text: impl Into<String>) -> Self {
        Self {
            customer_id,
            text: text.into(),
        }
    }
}

/// Fields to change on a customer record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerUpdates {
    /// New email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Intent-specific task payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TaskPayload {
    /// `update_email`
    EmailUpdate {
        /// Customer to update
        customer_id: i64,
        /// Extracted changes (empty when no address was found)
        updates: CustomerUpdates,
    },
    /// `list_customers`
    Listing {
        /// Requesting customer
        customer_id: i64,
        /// Status filter
        status: String,
    },
    /// Other customer-data lookups
    Lookup {
        /// Customer to look up
        customer_id: i64,
    },
    /// Anything routed to the support agent
    Support {
        /// Requesting customer
        customer_id: i64,
        /// Original text
        text: String,
    },
}

impl TaskPayload {
    /// JSON object for the envelope payload
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::Malformed(e.to_string()))
    }
}

/// One sub-task of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Intent tag
    pub intent: String,
    /// Agent handling it
    pub target_agent: AgentRole,
    /// Base URL of that agent
    pub target_endpoint: String,
    /// Payload to send
    pub payload: TaskPayload,
    /// Escalation hint carried to the outcome
    pub requires_escalation: bool,
}

impl Task {
    /// Request envelope for this task
    pub fn envelope(&self, sender: &str) -> Result<Envelope> {
        Ok(Envelope::build(
            sender,
            self.target_agent.agent_id(),
            self.intent.as_str(),
            Some(self.payload.to_value()?),
        ))
    }
}

/// Maps intents to tasks using a fixed routing table
#[derive(Debug, Clone, Default)]
pub struct TaskBuilder {
    directory: AgentDirectory,
}

impl TaskBuilder {
    /// Create a builder resolving endpoints through `directory`
    pub fn new(directory: AgentDirectory) -> Self {
        Self { directory }
    }

    /// Build the task for one intent.
    ///
    /// Fails for a blank tag or when the target agent has no endpoint.
    pub fn build(&self, intent: &str, context: &QueryContext) -> Result<Task> {
        let intent = intent.trim();
        if intent.is_empty() {
            return Err(Error::InvalidIntent(intent.to_string()));
        }

        let target_agent = AgentRole::for_intent(intent);
        let target_endpoint = self
            .directory
            .endpoint(target_agent)
            .ok_or_else(|| Error::UnknownAgent(target_agent.agent_id().to_string()))?
            .to_string();

        let customer_id = context.customer_id;
        let payload = match (target_agent, intent) {
            (AgentRole::CustomerData, intents::UPDATE_EMAIL) => TaskPayload::EmailUpdate {
                customer_id,
                updates: CustomerUpdates {
                    email: extract_email(&context.text),
                },
            },
            (AgentRole::CustomerData, intents::LIST_CUSTOMERS) => TaskPayload::Listing {
                customer_id,
                status: LISTING_STATUS.to_string(),
            },
            (AgentRole::CustomerData, _) => TaskPayload::Lookup { customer_id },
            (AgentRole::Support, _) => TaskPayload::Support {
                customer_id,
                text: context.text.clone(),
            },
        };

        Ok(Task {
            intent: intent.to_string(),
            target_agent,
            target_endpoint,
            payload,
            requires_escalation: requires_escalation(intent),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> TaskBuilder {
        TaskBuilder::new(
            AgentDirectory::new()
                .with_endpoint(AgentRole::CustomerData, "http://127.0.0.1:8101")
                .with_endpoint(AgentRole::Support, "http://127.0.0.1:8102"),
        )
    }

    #[test]
    fn test_update_email_task() {
        let ctx = QueryContext::new(1, "Update my email to new@email.com");
        let task = builder().build("update_email", &ctx).unwrap();

        assert_eq!(task.target_agent, AgentRole::CustomerData);
        assert_eq!(task.target_endpoint, "http://127.0.0.1:8101");
        assert!(task.requires_escalation);
        assert_eq!(
            task.payload.to_value().unwrap(),
            json!({"customer_id": 1, "updates": {"email": "new@email.com"}})
        );
    }

    #[test]
    fn test_update_email_without_address() {
        let ctx = QueryContext::new(1, "Update my email please");
        let task = builder().build("update_email", &ctx).unwrap();

        assert_eq!(
            task.payload.to_value().unwrap(),
            json!({"customer_id": 1, "updates": {}})
        );
    }

    #[test]
    fn test_listing_and_lookup_payloads() {
        let ctx = QueryContext::new(7, "Show me all active customers");
        let listing = builder().build("list_customers", &ctx).unwrap();
        let lookup = builder().build("get_customer_history", &ctx).unwrap();

        assert_eq!(
            listing.payload.to_value().unwrap(),
            json!({"customer_id": 7, "status": "active"})
        );
        assert_eq!(lookup.payload.to_value().unwrap(), json!({"customer_id": 7}));
        assert!(!listing.requires_escalation);
        assert!(!lookup.requires_escalation);
    }

    #[test]
    fn test_support_routing_and_escalation() {
        let ctx = QueryContext::new(3, "refund please");

        for (intent, escalated) in [
            ("refund_request", true),
            ("cancel_subscription", true),
            ("upgrade_request", true),
            ("escalate_issue", true),
            ("support_request", false),
            ("show_ticket_status", false),
            ("something_new", false),
        ] {
            let task = builder().build(intent, &ctx).unwrap();
            assert_eq!(task.target_agent, AgentRole::Support, "{intent}");
            assert_eq!(task.requires_escalation, escalated, "{intent}");
            assert_eq!(
                task.payload.to_value().unwrap(),
                json!({"customer_id": 3, "text": "refund please"})
            );
        }
    }

    #[test]
    fn test_blank_intent_rejected() {
        let ctx = QueryContext::new(1, "x");
        assert!(matches!(
            builder().build("  ", &ctx),
            Err(Error::InvalidIntent(_))
        ));
    }

    #[test]
    fn test_missing_endpoint() {
        let builder = TaskBuilder::new(
            AgentDirectory::new().with_endpoint(AgentRole::Support, "http://s"),
        );
        let ctx = QueryContext::new(1, "x");

        assert!(matches!(
            builder.build("get_customer_info", &ctx),
            Err(Error::UnknownAgent(agent)) if agent == "customer_data_agent"
        ));
        assert!(builder.build("refund_request", &ctx).is_ok());
    }

    #[test]
    fn test_task_envelope() {
        let ctx = QueryContext::new(1, "details");
        let task = builder().build("get_customer_info", &ctx).unwrap();
        let env = task.envelope("router").unwrap();

        assert_eq!(env.from, "router");
        assert_eq!(env.to, "customer_data_agent");
        assert_eq!(env.payload, json!({"customer_id": 1}));
        assert!(env.validate().is_ok());
    }

    #[test]
    fn test_extract_email() {
        assert_eq!(
            extract_email("Update my email to new@email.com."),
            Some("new@email.com".to_string())
        );
        assert_eq!(
            extract_email("mail a.b+c@mail-host.co.uk now"),
            Some("a.b+c@mail-host.co.uk".to_string())
        );
        assert_eq!(extract_email("no address here"), None);
    }
}
