//! Dispatch loop.
//!
//! Connection tasks never touch the registry or each other. They turn what
//! happens on their socket into [`DispatchEvent`]s, and a single loop
//! applies those events one at a time. Because a `Send` is fanned out to
//! every queue before the next event is taken, all connections observe
//! broadcasts in the same order: the order the loop received them.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use chatcast_protocols::{ChatEvent, ChatMessage, ConnectionId};

use crate::registry::{ConnectionRegistry, OutboundSender};

/// An event produced by a connection task.
#[derive(Debug)]
pub enum DispatchEvent {
    /// A socket was upgraded; register its outbound queue.
    Connect {
        id: ConnectionId,
        outbound: OutboundSender,
    },
    /// A `message` event arrived on the connection.
    Send { id: ConnectionId, text: String },
    /// The socket closed; deregister it.
    Disconnect { id: ConnectionId },
}

/// Run the dispatch loop until every event sender is dropped.
pub async fn run_dispatch_loop(
    mut events: mpsc::UnboundedReceiver<DispatchEvent>,
    registry: Arc<ConnectionRegistry>,
) {
    debug!("Dispatch loop started");
    while let Some(event) = events.recv().await {
        dispatch(event, &registry);
    }
    debug!("Dispatch loop stopped");
}

/// Apply a single event to the registry.
pub fn dispatch(event: DispatchEvent, registry: &ConnectionRegistry) {
    match event {
        DispatchEvent::Connect { id, outbound } => on_connect(registry, id, outbound),
        DispatchEvent::Send { id, text } => {
            let delivered = on_message(registry, id, text);
            debug!(delivered, "Broadcast queued");
        }
        DispatchEvent::Disconnect { id } => on_disconnect(registry, &id),
    }
}

fn on_connect(registry: &ConnectionRegistry, id: ConnectionId, outbound: OutboundSender) {
    registry.insert(id.clone(), outbound.clone());

    // Queued ahead of any broadcast, so the client sees it first and knows
    // it is registered once it does.
    match ChatEvent::Connected(id.to_string()).to_frame() {
        Ok(frame) => {
            if outbound.send(frame).is_err() {
                debug!("Connection {} closed before its connected frame", id);
            }
        }
        Err(e) => warn!("Failed to encode connected frame for {}: {}", id, e),
    }

    info!(connection_id = %id, connections = registry.len(), "user connected");
}

/// Broadcast `<prefix> said <text>` to every connection, sender included.
///
/// Returns the number of connections the broadcast was queued on.
fn on_message(registry: &ConnectionRegistry, id: ConnectionId, text: String) -> usize {
    let display = ChatMessage::new(id, text).display();
    match ChatEvent::Message(display).to_frame() {
        Ok(frame) => registry.broadcast(&frame),
        Err(e) => {
            warn!("Failed to encode broadcast: {}", e);
            0
        }
    }
}

fn on_disconnect(registry: &ConnectionRegistry, id: &ConnectionId) {
    if registry.remove(id) {
        info!(connection_id = %id, connections = registry.len(), "user disconnected");
    } else {
        debug!("Disconnect for unknown connection {}", id);
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
