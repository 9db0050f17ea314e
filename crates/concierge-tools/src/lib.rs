//! Concierge Tools - Tool Registry and Record Store
//!
//! This crate provides the tool-execution backend of Concierge:
//! - Registry: tool registration and dispatch by name
//! - Store: in-memory customer and ticket records
//! - Builtins: the customer support tool set

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builtins;
pub mod error;
pub mod registry;
pub mod store;

pub use builtins::register_builtins;
pub use error::{Error, Result};
pub use registry::{RiskLevel, Tool, ToolDefinition, ToolRegistry};
pub use store::{
    Customer, CustomerFilter, CustomerStatus, CustomerUpdate, Priority, RecordStore, Ticket,
    TicketFilter, TicketStatus, Tier,
};
