//! chatcast - real-time broadcast chat
//!
//! Main entry point for the chatcast server and terminal client.

mod cli;
mod cmd_client;
mod server;

use clap::Parser;
use tracing::warn;

use chatcast_config::{ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let work_dir = std::env::current_dir()?;
    let mut config = ConfigLoader::discover(cli.config.as_deref(), &work_dir)?;
    cli.apply_overrides(&mut config);

    let warnings = ConfigValidator::ensure_valid(&config)?;
    server::init_tracing(&config.logging)?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    match cli.command {
        None | Some(Commands::Serve) => server::run_server(config).await,
        Some(Commands::Client { url }) => cmd_client::run_client(&url).await,
    }
}
