use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "policydocs",
    about = "policydocs — hostname policy-document denormalizer",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to policydocs.toml (default: ./policydocs.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a hostname existence record as JSON
    GetHostname {
        site_id: String,
        env: String,
        hostname: String,
    },
    /// Print a hostname metadata record as JSON
    GetHostnameMetadata {
        site_id: String,
        env: String,
        hostname: String,
    },
    /// Print an edge-logic record as JSON
    GetEdgeLogic {
        site_id: String,
        env: String,
        hostname: String,
    },
    /// Run the read-merge-write pipeline for one hostname
    Denormalize {
        site_id: String,
        env: String,
        hostname: String,
    },
    /// Load normalized fixture records from a JSON file into the store
    Seed {
        /// Fixture file path
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON for the lookups.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("policydocs=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = policydocs_core::Config::load(cli.config.as_deref())?;
    let store = policydocs_store::RedbStore::open(&config.store.path)?;

    match cli.command {
        Commands::GetHostname {
            site_id,
            env,
            hostname,
        } => commands::lookup::hostname(&store, &site_id, &env, &hostname),
        Commands::GetHostnameMetadata {
            site_id,
            env,
            hostname,
        } => commands::lookup::hostname_metadata(&store, &site_id, &env, &hostname),
        Commands::GetEdgeLogic {
            site_id,
            env,
            hostname,
        } => commands::lookup::edge_logic(&store, &site_id, &env, &hostname),
        Commands::Denormalize {
            site_id,
            env,
            hostname,
        } => commands::denormalize::run(&store, &site_id, &env, &hostname),
        Commands::Seed { file } => commands::seed::run(&store, &file),
    }
}
