//! Server module for Concierge
//!
//! Contains configuration and the service run loop.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all services
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Warnings for suspicious settings
//! - `init`: Service assembly, binding and graceful shutdown

pub mod config;
mod init;
mod loader;
mod validation;

pub use init::{build_app, run, serve, Service};
pub use loader::load_config;
pub use validation::validate_config;
