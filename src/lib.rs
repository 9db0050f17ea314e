//! Concierge - Multi-Agent Customer Service
//!
//! Wires the protocol crate and the tool crate into four HTTP services:
//! the router, the customer data agent, the support agent and the tool server.

#![forbid(unsafe_code)]

pub mod agents;
pub mod api;
pub mod cli;
pub mod server;
