//! Builtins - Customer support tools
//!
//! - Customer tools: get_customer, list_customers, update_customer
//! - Ticket tools: create_ticket, get_customer_history, list_tickets
//! - Admin tools: reset_db

mod admin;
mod customers;
mod tickets;

#[cfg(test)]
mod tests;

pub use admin::ResetDbTool;
pub use customers::{GetCustomerTool, ListCustomersTool, UpdateCustomerTool};
pub use tickets::{CreateTicketTool, CustomerHistoryTool, ListTicketsTool};

use crate::registry::ToolRegistry;
use crate::store::RecordStore;
use std::sync::Arc;

/// Register every built-in tool over a shared record store
pub fn register_builtins(registry: &mut ToolRegistry, store: Arc<RecordStore>) {
    registry.register(Arc::new(GetCustomerTool::new(store.clone())));
    registry.register(Arc::new(ListCustomersTool::new(store.clone())));
    registry.register(Arc::new(UpdateCustomerTool::new(store.clone())));

    registry.register(Arc::new(CreateTicketTool::new(store.clone())));
    registry.register(Arc::new(CustomerHistoryTool::new(store.clone())));
    registry.register(Arc::new(ListTicketsTool::new(store.clone())));

    registry.register(Arc::new(ResetDbTool::new(store)));
}
