//! HTTP surface of the Concierge services
//!
//! Provides REST endpoints for:
//! - Health checks (every service)
//! - The router: `/query`, `/a2a`, `/agent_card`
//! - Downstream agents: `/a2a`, `/agent_card`
//! - The tool server: `/tools/list`, `/tool/:name`, `/tools/call`

pub mod agent;
pub mod health;
pub mod router;
pub mod tools;

pub use agent::agent_routes;
pub use health::health_routes;
pub use router::router_routes;
pub use tools::tools_routes;
