//! CLI entrypoint for Stackline
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::Result;
use clap::Parser;
use stackline_infrastructure::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).map_err(|e| anyhow::anyhow!(e))?
    };

    // Initialize logging based on verbosity level, falling back to the
    // configured filter when no -v flags are given
    let filter = match cli.verbose {
        0 => EnvFilter::new(config.log_filter.as_deref().unwrap_or("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Stackline");

    match cli.command {
        Command::Demo(args) => commands::demo::run(args, &config).await,
        Command::Order(args) => commands::order::run(args, &config),
    }
}
