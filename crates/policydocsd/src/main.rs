//! policydocsd — the policydocs push-delivery daemon.
//!
//! Hosts the change-notification adapter behind HTTP: each POST to
//! `/push` denormalizes one hostname, and the response status tells the
//! delivery framework whether to acknowledge or redeliver.
//!
//! # Usage
//!
//! ```text
//! policydocsd --config policydocs.toml --bind 0.0.0.0:8080
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "policydocsd", about = "policydocs push-delivery daemon", version)]
struct Cli {
    /// Path to policydocs.toml (default: ./policydocs.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured listen address
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // JSON logs: the daemon's output is consumed by log pipelines.
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,policydocs=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = policydocs_core::Config::load(cli.config.as_deref())?;
    let bind = cli.bind.unwrap_or_else(|| config.trigger.bind.clone());

    // A daemon without its store is useless: fail fast.
    let store = policydocs_store::RedbStore::open(&config.store.path)
        .context("failed to open document store")?;
    info!(path = ?config.store.path, "document store opened");

    let handler = policydocs_trigger::UpdateHandler::new(store);
    let router = policydocs_trigger::build_router(handler);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(%bind, "push listener started");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("policydocsd stopped");
    Ok(())
}
