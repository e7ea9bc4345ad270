//! WebSocket chat client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use chatcast_protocols::{ChannelError, ChatEvent, ChatView, ConnectionId};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Client connection to a chatcast server.
///
/// Sending never echoes locally: the sender's own line arrives through
/// [`next_broadcast`](Self::next_broadcast) like everyone else's.
pub struct ChatClient {
    /// Id the server assigned to this connection.
    connection_id: ConnectionId,
    /// WebSocket sender.
    ws_tx: Mutex<WsSink>,
    /// Broadcast display strings, in server order.
    broadcasts: Mutex<mpsc::UnboundedReceiver<String>>,
    /// Cleared by the receive loop when the socket closes.
    open: Arc<AtomicBool>,
    /// Background task handle.
    _recv_task: tokio::task::JoinHandle<()>,
}

impl ChatClient {
    /// Connect to a chatcast server, e.g. `ws://localhost:3000/ws`.
    ///
    /// Returns once the server has registered the connection, so every
    /// broadcast processed after this call is delivered to it.
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| ChannelError::ConnectionFailed(format!("{}: {}", url, e)))?;

        let (ws_sink, mut ws_source) = ws_stream.split();
        let (tx, rx) = mpsc::unbounded_channel();

        let connection_id = Self::await_registration(&mut ws_source, &tx).await?;
        debug!("Connected to {} as {}", url, connection_id);

        let open = Arc::new(AtomicBool::new(true));
        let recv_task = {
            let open = open.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, tx, open).await;
            })
        };

        Ok(Self {
            connection_id,
            ws_tx: Mutex::new(ws_sink),
            broadcasts: Mutex::new(rx),
            open,
            _recv_task: recv_task,
        })
    }

    /// Read frames until the server's `connected` frame.
    async fn await_registration(
        ws_source: &mut WsSource,
        tx: &mpsc::UnboundedSender<String>,
    ) -> Result<ConnectionId, ChannelError> {
        while let Some(msg) = ws_source.next().await {
            let msg = msg.map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;
            match msg {
                Message::Text(text) => match ChatEvent::parse(text.as_str()) {
                    Ok(ChatEvent::Connected(id)) => return Ok(ConnectionId::new(id)),
                    Ok(ChatEvent::Message(display)) => {
                        let _ = tx.send(display);
                    }
                    Err(e) => warn!("Ignoring frame during handshake: {}", e),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }

        Err(ChannelError::ConnectionFailed(
            "connection closed before registration".to_string(),
        ))
    }

    /// WebSocket receive loop.
    async fn receive_loop(
        mut ws_source: WsSource,
        tx: mpsc::UnboundedSender<String>,
        open: Arc<AtomicBool>,
    ) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => match ChatEvent::parse(text.as_str()) {
                    Ok(ChatEvent::Message(display)) => {
                        if tx.send(display).is_err() {
                            break;
                        }
                    }
                    Ok(ChatEvent::Connected(id)) => {
                        debug!("Unexpected second connected frame: {}", id);
                    }
                    Err(e) => warn!("Ignoring frame: {}", e),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    break;
                }
            }
        }

        open.store(false, Ordering::SeqCst);
        debug!("Receive loop ended");
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Send `text` as a `message` event, exactly as given.
    pub async fn send_current_input(&self, text: &str) -> Result<(), ChannelError> {
        if !self.is_open() {
            return Err(ChannelError::Disconnected);
        }

        let frame = ChatEvent::message(text).to_frame()?;
        self.ws_tx
            .lock()
            .await
            .send(Message::text(frame))
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))
    }

    /// Next broadcast display string, or `None` once the channel is closed
    /// and every received broadcast has been taken.
    pub async fn next_broadcast(&self) -> Option<String> {
        self.broadcasts.lock().await.recv().await
    }

    /// Feed broadcasts into `view` until the channel closes.
    pub async fn run_view<V: ChatView>(&self, view: &mut V) {
        while let Some(display) = self.next_broadcast().await {
            view.on_broadcast_received(&display);
        }
    }

    /// Close the connection. Later sends fail with `Disconnected`.
    pub async fn close(&self) -> Result<(), ChannelError> {
        self.open.store(false, Ordering::SeqCst);
        self.ws_tx
            .lock()
            .await
            .close()
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))
    }
}

impl Drop for ChatClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}
