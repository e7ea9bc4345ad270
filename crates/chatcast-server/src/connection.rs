//! Per-connection WebSocket task.

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use chatcast_protocols::{ChannelError, ChatEvent, ConnectionId};

use crate::dispatch::DispatchEvent;
use crate::ChatServerState;

/// Drive one WebSocket until it closes or the server shuts down.
///
/// Inbound `message` events become [`DispatchEvent::Send`]; frames queued
/// by the dispatch loop are written back out in queue order.
pub(crate) async fn handle_connection(
    socket: WebSocket,
    state: Arc<ChatServerState>,
    shutdown: CancellationToken,
) {
    let conn_id = ConnectionId::generate();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

    if let Err(e) = state.dispatch(DispatchEvent::Connect {
        id: conn_id.clone(),
        outbound: outbound_tx,
    }) {
        error!("Dropping connection {}: {}", conn_id, e);
        return;
    }

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("Closing {} for shutdown", conn_id);
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            }

            // Server -> client
            Some(frame) = outbound_rx.recv() => {
                if let Err(e) = ws_tx.send(Message::Text(frame.into())).await {
                    warn!("Failed to send frame to {}: {}", conn_id, e);
                    break;
                }
            }

            // Client -> server
            result = ws_rx.next() => {
                match result {
                    Some(Ok(msg)) => match handle_message(&conn_id, msg, &state) {
                        Ok(ControlFlow::Continue(())) => {}
                        Ok(ControlFlow::Break(())) => break,
                        Err(e) => warn!("Ignoring frame from {}: {}", conn_id, e),
                    },
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", conn_id, e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    if let Err(e) = state.dispatch(DispatchEvent::Disconnect {
        id: conn_id.clone(),
    }) {
        warn!("Failed to deregister {}: {}", conn_id, e);
    }
}

/// Handle one inbound WebSocket frame.
///
/// Malformed frames are reported as errors and dropped by the caller; the
/// connection stays open.
fn handle_message(
    conn_id: &ConnectionId,
    msg: Message,
    state: &ChatServerState,
) -> Result<ControlFlow<()>, ChannelError> {
    match msg {
        Message::Text(text) => match ChatEvent::parse(text.as_str())? {
            ChatEvent::Message(text) => {
                debug!("Received message from {}: {}", conn_id, text);
                state.dispatch(DispatchEvent::Send {
                    id: conn_id.clone(),
                    text,
                })?;
            }
            ChatEvent::Connected(_) => {
                return Err(ChannelError::InvalidFrame(
                    "'connected' is a server-only event".to_string(),
                ));
            }
        },
        Message::Binary(_) => {
            debug!("Received binary frame from {} (ignored)", conn_id);
        }
        Message::Ping(_) => {
            // Axum answers pings automatically
            debug!("Received ping from {}", conn_id);
        }
        Message::Pong(_) => {
            debug!("Received pong from {}", conn_id);
        }
        Message::Close(_) => {
            debug!("Received close from {}", conn_id);
            return Ok(ControlFlow::Break(()));
        }
    }

    Ok(ControlFlow::Continue(()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_events() -> (Arc<ChatServerState>, mpsc::UnboundedReceiver<DispatchEvent>) {
        ChatServerState::new()
    }

    #[test]
    fn test_text_message_becomes_send_event() {
        let (state, mut events) = state_with_events();
        let id = ConnectionId::from("abc123");
        let frame = r#"{"event":"message","data":"hello"}"#;

        let flow = handle_message(&id, Message::Text(frame.to_string().into()), &state).unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));

        match events.try_recv().unwrap() {
            DispatchEvent::Send { id, text } => {
                assert_eq!(id.as_str(), "abc123");
                assert_eq!(text, "hello");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_frame_is_error_without_event() {
        let (state, mut events) = state_with_events();
        let id = ConnectionId::from("abc123");

        let result = handle_message(&id, Message::Text("{not json".to_string().into()), &state);
        assert!(matches!(result, Err(ChannelError::InvalidFrame(_))));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_client_sent_connected_is_rejected() {
        let (state, mut events) = state_with_events();
        let id = ConnectionId::from("abc123");
        let frame = r#"{"event":"connected","data":"spoof"}"#;

        let result = handle_message(&id, Message::Text(frame.to_string().into()), &state);
        assert!(matches!(result, Err(ChannelError::InvalidFrame(_))));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_binary_frame_ignored() {
        let (state, mut events) = state_with_events();
        let id = ConnectionId::from("abc123");

        let flow = handle_message(&id, Message::Binary(vec![1, 2, 3].into()), &state).unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_close_frame_breaks() {
        let (state, _events) = state_with_events();
        let id = ConnectionId::from("abc123");

        let flow = handle_message(&id, Message::Close(None), &state).unwrap();
        assert_eq!(flow, ControlFlow::Break(()));
    }

    #[test]
    fn test_send_after_dispatch_loop_gone() {
        let (state, events) = state_with_events();
        drop(events);
        let id = ConnectionId::from("abc123");
        let frame = r#"{"event":"message","data":"hello"}"#;

        let result = handle_message(&id, Message::Text(frame.to_string().into()), &state);
        assert!(matches!(result, Err(ChannelError::Disconnected)));
    }
}
