//! WebSocket client: one live connection to the agent, decoded into viewer events.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::types::ServerEvent;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);
pub const RECONNECT_DELAY_MAX: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    TransportConnected,
    Server(ServerEvent),
    Disconnected,
    TransportError(String),
}

// Connect to the agent and return the WS stream
pub async fn connect(url: &str) -> Result<WsStream, tokio_tungstenite::tungstenite::Error> {
    let (ws, _) = connect_async(url).await?;
    Ok(ws)
}

/// Decodes one text frame; anything that is not a known event yields None.
pub fn decode_frame(text: &str) -> Option<ServerEvent> {
    match serde_json::from_str::<ServerEvent>(text) {
        Ok(ev) => Some(ev),
        Err(e) => {
            debug!("ignoring undecodable frame: {e}");
            None
        }
    }
}

/// Reads frames until the socket ends. Returns false when the receiver is gone.
pub async fn pump(ws: &mut WsStream, tx: &mpsc::UnboundedSender<ViewerEvent>) -> bool {
    while let Some(msg) = ws.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Some(ev) = decode_frame(&text) {
                    if tx.send(ViewerEvent::Server(ev)).is_err() {
                        return false;
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                return tx.send(ViewerEvent::TransportError(e.to_string())).is_ok();
            }
        }
    }
    tx.send(ViewerEvent::Disconnected).is_ok()
}

/// A connection that is configured up front and only dials the agent on `spawn`.
pub struct Connection {
    url: String,
}

impl Connection {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connects and keeps reconnecting after drops with a capped backoff.
    /// The task ends once the event receiver is dropped.
    pub fn spawn(self, tx: mpsc::UnboundedSender<ViewerEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut delay = RECONNECT_DELAY;
            loop {
                match connect(&self.url).await {
                    Ok(mut ws) => {
                        info!(url = %self.url, "connected to agent");
                        delay = RECONNECT_DELAY;
                        if tx.send(ViewerEvent::TransportConnected).is_err() {
                            return;
                        }
                        if !pump(&mut ws, &tx).await {
                            return;
                        }
                        info!(url = %self.url, "disconnected from agent");
                    }
                    Err(e) => {
                        warn!(url = %self.url, "connect failed: {e}");
                        if tx.send(ViewerEvent::TransportError(e.to_string())).is_err() {
                            return;
                        }
                    }
                }
                if tx.is_closed() {
                    return;
                }
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(RECONNECT_DELAY_MAX);
            }
        })
    }
}
