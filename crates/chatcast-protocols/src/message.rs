//! Connection identity and chat messages.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of identifier characters shown in front of a broadcast.
pub const DISPLAY_PREFIX_LEN: usize = 3;

/// Opaque per-connection identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create an identifier from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier (32 lowercase hex characters).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The first `len` characters of the identifier, or all of it if shorter.
    pub fn prefix(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConnectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single send event, alive only while it is being broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Connection the text arrived on.
    pub sender: ConnectionId,
    /// Text exactly as typed.
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender: ConnectionId, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    /// The broadcast form: `<first 3 chars of sender id> said <text>`.
    ///
    /// The text is not trimmed, escaped or filtered.
    pub fn display(&self) -> String {
        format!("{} said {}", self.sender.prefix(DISPLAY_PREFIX_LEN), self.text)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
