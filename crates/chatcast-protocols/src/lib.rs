//! # chatcast Protocols
//!
//! Types shared by both ends of a chatcast channel:
//!
//! - [`ChatEvent`] - the JSON envelope carried in every WebSocket text frame
//! - [`ConnectionId`] / [`ChatMessage`] - connection identity and the
//!   `"<id> said <text>"` display rule
//! - [`ChatView`] - the display surface a client appends broadcasts to
//! - [`ChannelError`] - channel-level failures

pub mod error;
pub mod event;
pub mod message;
pub mod view;

pub use error::ChannelError;
pub use event::ChatEvent;
pub use message::{ChatMessage, ConnectionId, DISPLAY_PREFIX_LEN};
pub use view::ChatView;
