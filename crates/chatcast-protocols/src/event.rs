//! Wire envelope.
//!
//! Every WebSocket text frame carries one JSON object of the form
//! `{"event": "<name>", "data": <payload>}`. The same `message` event is
//! used in both directions: client to server it holds the raw text, server
//! to client it holds the composed display string.

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// A named channel event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Text sent by a client, or a broadcast display string sent by the server.
    Message(String),

    /// First frame on a new connection, carrying that connection's own id.
    Connected(String),
}

impl ChatEvent {
    /// Create a `message` event.
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    /// Encode the event as a text frame payload.
    pub fn to_frame(&self) -> Result<String, ChannelError> {
        serde_json::to_string(self).map_err(|e| ChannelError::InvalidFrame(e.to_string()))
    }

    /// Decode a text frame payload.
    ///
    /// Malformed JSON and unknown event names both map to
    /// [`ChannelError::InvalidFrame`].
    pub fn parse(frame: &str) -> Result<Self, ChannelError> {
        serde_json::from_str(frame).map_err(|e| ChannelError::InvalidFrame(e.to_string()))
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
