//! Connection registry.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use chatcast_protocols::ConnectionId;

/// Outbound frame queue of one connection.
pub type OutboundSender = mpsc::UnboundedSender<String>;

/// Active connections: connection id -> outbound frame queue.
///
/// Only the dispatch loop inserts and removes entries; everything else reads.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, OutboundSender>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: ConnectionId, outbound: OutboundSender) {
        self.connections.insert(id, outbound);
    }

    /// Returns `true` if the connection was registered.
    pub fn remove(&self, id: &ConnectionId) -> bool {
        self.connections.remove(id).is_some()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Enqueue `frame` on every registered connection.
    ///
    /// Returns the number of queues that accepted it. A queue whose
    /// connection task already exited is skipped; its `Disconnect` event is
    /// on the way.
    pub fn broadcast(&self, frame: &str) -> usize {
        let mut delivered = 0;
        for entry in self.connections.iter() {
            if entry.value().send(frame.to_string()).is_ok() {
                delivered += 1;
            } else {
                debug!("Skipping closed connection {}", entry.key());
            }
        }
        delivered
    }
}
