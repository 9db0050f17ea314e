//! Service assembly and main run loop
//!
//! Contains `run()`, which binds every requested service and serves it
//! until Ctrl+C.

use super::config::AppConfig;
use super::loader::load_config;
use super::validation::validate_config;
use crate::agents::{customer_data, support};
use crate::api::{agent_routes, health_routes, router_routes, tools_routes};
use anyhow::{Context, Result};
use axum::Router;
use concierge_core::{AgentConnector, Orchestrator, TaskBuilder};
use concierge_tools::{register_builtins, RecordStore, ToolRegistry};
use std::fmt;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// One of the four Concierge processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Query entry point and orchestrator
    Router,
    /// Customer record agent
    CustomerData,
    /// Ticket and account agent
    Support,
    /// Tool server backed by the record store
    Tools,
}

impl Service {
    /// Every service, in start order
    pub const ALL: [Service; 4] = [
        Service::Tools,
        Service::CustomerData,
        Service::Support,
        Service::Router,
    ];

    /// Name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Router => "router",
            Self::CustomerData => "customer_data",
            Self::Support => "support",
            Self::Tools => "tools",
        }
    }

    /// Configured listen port
    pub fn port(&self, config: &AppConfig) -> u16 {
        match self {
            Self::Router => config.server.router_port,
            Self::CustomerData => config.server.customer_data_port,
            Self::Support => config.server.support_port,
            Self::Tools => config.server.tools_port,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the HTTP application of `service`
pub fn build_app(service: Service, config: &AppConfig) -> Router {
    let connector = Arc::new(AgentConnector::new(config.connector_config()));

    let routes = match service {
        Service::Router => {
            let orchestrator = Orchestrator::new(TaskBuilder::new(config.directory()), connector);
            router_routes(Arc::new(orchestrator))
        }
        Service::CustomerData => {
            let handler = customer_data::handler(&connector);
            let card = customer_data::card(&handler);
            agent_routes(Arc::new(handler), card)
        }
        Service::Support => {
            let handler = support::handler(&connector);
            let card = support::card(&handler);
            agent_routes(Arc::new(handler), card)
        }
        Service::Tools => {
            let mut registry = ToolRegistry::new();
            register_builtins(&mut registry, Arc::new(RecordStore::seeded()));
            info!(tools = registry.len(), "Tool registry initialized");
            tools_routes(Arc::new(registry))
        }
    };

    Router::new()
        .merge(health_routes())
        .merge(routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve `app` on `listener` until `shutdown` is cancelled
pub async fn serve(listener: TcpListener, app: Router, shutdown: CancellationToken) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server error")
}

/// Run `services` with configuration from files and environment
pub async fn run(services: &[Service]) -> Result<()> {
    info!("Starting Concierge v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!("Configuration loaded");
    validate_config(&config);

    let shutdown = CancellationToken::new();
    let mut handles = Vec::with_capacity(services.len());

    for &service in services {
        let addr = format!("{}:{}", config.server.host, service.port(&config));
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {service} to {addr}"))?;
        info!(service = %service, addr = %addr, "Service listening");

        let app = build_app(service, &config);
        let token = shutdown.clone();
        handles.push(tokio::spawn(async move {
            if let Err(e) = serve(listener, app, token).await {
                error!(service = %service, error = %e, "Service stopped");
            }
        }));
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");
    shutdown.cancel();

    for handle in handles {
        let _ = handle.await;
    }
    info!("Concierge stopped");
    Ok(())
}
