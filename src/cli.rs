//! CLI module for Concierge
//!
//! Provides commands:
//! - `serve`: start one service or all of them
//! - `query`: post a query to a running router
//! - `card`: print an agent card

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use concierge_tools::{register_builtins, RecordStore, ToolRegistry};
use serde_json::json;
use std::sync::Arc;

use crate::agents::{customer_data, support};
use crate::api::{router::router_card, tools::tools_card};
use crate::server::{self, Service};

/// Concierge multi-agent customer service
#[derive(Parser, Debug)]
#[command(name = "concierge")]
#[command(about = "Multi-agent customer service router")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start services
    Serve {
        /// Service to start
        #[arg(value_enum, default_value_t = Target::All)]
        target: Target,
    },
    /// Send a query to the running router
    Query {
        /// Free-form request text
        #[arg(long)]
        text: String,
        /// Customer the request is about
        #[arg(long)]
        customer_id: i64,
    },
    /// Print the agent card of a service
    Card {
        #[arg(value_enum)]
        target: Target,
    },
}

/// Service selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Router,
    CustomerData,
    Support,
    Tools,
    All,
}

impl Target {
    fn services(self) -> Vec<Service> {
        match self {
            Self::Router => vec![Service::Router],
            Self::CustomerData => vec![Service::CustomerData],
            Self::Support => vec![Service::Support],
            Self::Tools => vec![Service::Tools],
            Self::All => Service::ALL.to_vec(),
        }
    }
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Serve { target }) => server::run(&target.services()).await,
        Some(Commands::Query { text, customer_id }) => query(text, customer_id).await,
        Some(Commands::Card { target }) => card(target),
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

async fn query(text: String, customer_id: i64) -> Result<()> {
    let config = server::load_config().context("Failed to load configuration")?;
    let url = format!("{}/query", config.agents.router_url.trim_end_matches('/'));

    let response = reqwest::Client::new()
        .post(&url)
        .json(&json!({"text": text, "customer_id": customer_id}))
        .send()
        .await
        .with_context(|| format!("Failed to reach router at {url}"))?;
    let body: serde_json::Value = response.json().await.context("Invalid router response")?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn card(target: Target) -> Result<()> {
    let config = server::load_config().context("Failed to load configuration")?;
    let connector = Arc::new(concierge_core::AgentConnector::new(config.connector_config()));

    let card = match target {
        Target::Router => router_card(),
        Target::CustomerData => customer_data::card(&customer_data::handler(&connector)),
        Target::Support => support::card(&support::handler(&connector)),
        Target::Tools => {
            let mut registry = ToolRegistry::new();
            register_builtins(&mut registry, Arc::new(RecordStore::seeded()));
            tools_card(&registry)
        }
        Target::All => anyhow::bail!("`card` takes a single service"),
    };

    println!("{}", serde_json::to_string_pretty(&card)?);
    Ok(())
}
