//! # chatcast Server
//!
//! Broadcast chat over WebSocket.
//!
//! This crate:
//! - Serves a small HTML/JS chat page embedded in the binary
//! - Accepts WebSocket connections on `/ws` and gives each an opaque id
//! - Re-broadcasts every inbound `message` event as `"<id> said <text>"` to
//!   all connected clients, the sender included
//!
//! ## Usage
//!
//! ```ignore
//! use chatcast_config::ServerConfig;
//! use chatcast_server::ChatServer;
//!
//! let server = ChatServer::new(ServerConfig::new("127.0.0.1", 3000));
//! let addr = server.start().await?;
//! ```

mod connection;
mod dispatch;
mod registry;
mod server;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use chatcast_config::ServerConfig;
use chatcast_protocols::ChannelError;

pub use dispatch::{dispatch, run_dispatch_loop, DispatchEvent};
pub use registry::{ConnectionRegistry, OutboundSender};
pub use server::create_router;

/// Server state shared across handlers.
pub struct ChatServerState {
    /// Active WebSocket connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Queue feeding the dispatch loop.
    events_tx: mpsc::UnboundedSender<DispatchEvent>,
    /// Cancelled when the server stops; replaced on every start.
    shutdown: Mutex<CancellationToken>,
    /// Server started flag.
    pub started: AtomicBool,
}

impl ChatServerState {
    /// Create the state and the receiving end of its dispatch queue.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<DispatchEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Self {
            registry: Arc::new(ConnectionRegistry::new()),
            events_tx,
            shutdown: Mutex::new(CancellationToken::new()),
            started: AtomicBool::new(false),
        });
        (state, events_rx)
    }

    /// Queue an event for the dispatch loop.
    pub fn dispatch(&self, event: DispatchEvent) -> Result<(), ChannelError> {
        self.events_tx
            .send(event)
            .map_err(|_| ChannelError::Disconnected)
    }

    /// Token that fires when the current run of the server stops.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.lock().clone()
    }

    fn renew_shutdown_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.shutdown.lock() = token.clone();
        token
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

/// WebSocket broadcast chat server.
pub struct ChatServer {
    config: ServerConfig,
    state: Arc<ChatServerState>,
    /// Taken by the first `start`; the dispatch loop outlives restarts.
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<DispatchEvent>>>,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl ChatServer {
    pub fn new(config: ServerConfig) -> Self {
        let (state, events_rx) = ChatServerState::new();
        Self {
            config,
            state,
            events_rx: Mutex::new(Some(events_rx)),
            local_addr: Mutex::new(None),
        }
    }

    /// Configured listen address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Address actually bound, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }

    pub fn state(&self) -> Arc<ChatServerState> {
        self.state.clone()
    }

    pub fn is_started(&self) -> bool {
        self.state.is_started()
    }

    pub fn connection_count(&self) -> usize {
        self.state.registry.len()
    }

    /// Bind the listener and start serving in the background.
    ///
    /// Returns the bound address; with port `0` this is the ephemeral port
    /// the OS picked.
    pub async fn start(&self) -> Result<SocketAddr, ChannelError> {
        if self.is_started() {
            return self
                .local_addr()
                .ok_or_else(|| ChannelError::ConnectionFailed("no bound address".to_string()));
        }

        let listener = tokio::net::TcpListener::bind(self.address())
            .await
            .map_err(|e| ChannelError::ConnectionFailed(format!("Failed to bind: {}", e)))?;
        let addr = listener
            .local_addr()
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        if let Some(events_rx) = self.events_rx.lock().take() {
            tokio::spawn(run_dispatch_loop(events_rx, self.state.registry.clone()));
        }

        let shutdown = self.state.renew_shutdown_token();
        let router = create_router(self.state.clone());

        *self.local_addr.lock() = Some(addr);
        self.state.started.store(true, Ordering::SeqCst);
        info!("listening on {}", addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
            {
                tracing::error!("Chat server error: {}", e);
            }
        });

        Ok(addr)
    }

    /// Stop accepting connections and close the open ones.
    pub async fn stop(&self) -> Result<(), ChannelError> {
        if !self.is_started() {
            return Ok(());
        }

        self.state.started.store(false, Ordering::SeqCst);
        self.state.shutdown_token().cancel();

        debug!("Chat server stopped");
        Ok(())
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
