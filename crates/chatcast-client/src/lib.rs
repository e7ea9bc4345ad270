//! # chatcast Client
//!
//! Client side of a chatcast channel.
//!
//! - [`ChatClient`] connects to a server's `/ws` endpoint, sends the current
//!   input as a `message` event and yields broadcast display strings
//! - [`MessageLog`] and [`TerminalView`] are [`ChatView`](chatcast_protocols::ChatView)s
//!   that keep the newest broadcast in view

mod client;
mod view;

pub use client::ChatClient;
pub use view::{MessageLog, TerminalView};
