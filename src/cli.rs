//! CLI definitions for chatcast.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chatcast_config::Config;

/// chatcast CLI.
#[derive(Parser)]
#[command(name = "chatcast")]
#[command(about = "Real-time broadcast chat over WebSocket")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ./chatcast.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server host, overrides the config file
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Server port, overrides the config file
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the chat server (default)
    Serve,

    /// Chat from the terminal: stdin lines are sent, broadcasts are printed
    Client {
        /// WebSocket endpoint of the server
        #[arg(long, default_value = "ws://localhost:3000/ws")]
        url: String,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
