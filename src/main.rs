//! Concierge - Multi-Agent Customer Service
//!
//! CLI entry point for the Concierge services.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use concierge::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "concierge=info,concierge_core=info,concierge_tools=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = cli::Cli::parse();
    cli::run(cli).await
}
