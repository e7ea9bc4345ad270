//! Tracing setup and server startup for chatcast.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatcast_config::{Config, ConfigLoader, LoggingConfig};
use chatcast_server::ChatServer;

/// Initialize tracing with console output and, if configured, a log file.
///
/// `RUST_LOG` takes precedence over `logging.level`. Files rotate daily
/// under `logging.file_dir`, keeping 30 days.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)?,
    };

    let file_layer = match &logging.file_dir {
        Some(dir) => {
            let log_dir = PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy()));
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("chatcast")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the writer flushing for the life of the process
            static GUARD: OnceLock<WorkerGuard> = OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        // stderr, so the terminal client's stdout carries chat lines only
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

/// Run the server until Ctrl-C.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting chatcast v{}", env!("CARGO_PKG_VERSION"));

    let server = ChatServer::new(config.server);
    let addr = server.start().await?;
    info!("Open http://{} in a browser to chat", addr);

    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    server.stop().await?;
    Ok(())
}
