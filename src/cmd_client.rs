//! Terminal chat client.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use chatcast_client::{ChatClient, TerminalView};
use chatcast_protocols::ChatView;

/// Send each stdin line, print each broadcast, until EOF or disconnect.
pub(crate) async fn run_client(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = ChatClient::connect(url).await?;
    info!("Connected to {} as {}", url, client.connection_id());

    let mut view = TerminalView::new(std::io::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            broadcast = client.next_broadcast() => match broadcast {
                Some(display) => view.on_broadcast_received(&display),
                None => {
                    warn!("Disconnected from {}", url);
                    break;
                }
            },
            line = lines.next_line() => match line? {
                Some(text) => {
                    if let Err(e) = client.send_current_input(&text).await {
                        warn!("Message not sent: {}", e);
                    }
                }
                None => {
                    client.close().await?;
                    break;
                }
            },
        }
    }

    Ok(())
}
