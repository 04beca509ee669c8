//! Programmatic client for the monitor WebSocket channel
//!
//! Connects to `/ws/monitor`, yields typed [`MonitorEvent`]s, and sends the
//! two text commands the server understands. Used by the integration tests
//! and by anything that wants to watch the attempt stream without a browser.

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::api::ws::MonitorEvent;

/// Monitor client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection establishment failed
    #[error("Failed to connect to monitor server: {0}")]
    Connect(String),

    /// Not connected
    #[error("Not connected to monitor server")]
    NotConnected,

    /// Send failed
    #[error("Failed to send message: {0}")]
    Send(String),

    /// Receive failed
    #[error("Failed to receive message: {0}")]
    Receive(String),

    /// The server sent an event the client cannot parse
    #[error("Failed to parse event: {0}")]
    Parse(#[from] serde_json::Error),
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client for the monitor channel
pub struct MonitorClient {
    url: String,
    connection: Option<WsStream>,
}

impl MonitorClient {
    /// Create a client for the given WebSocket URL
    /// (e.g., "ws://127.0.0.1:8000/ws/monitor")
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection: None,
        }
    }

    /// Connect to the monitor server
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        tracing::debug!(url = %self.url, "connecting to monitor server");
        let (ws_stream, _) = connect_async(&self.url)
            .await
            .map_err(|e| ClientError::Connect(e.to_string()))?;
        self.connection = Some(ws_stream);
        Ok(())
    }

    /// Receive the next monitor event
    ///
    /// Skips protocol-level frames; returns `None` once the server closes
    /// the channel.
    pub async fn next_event(&mut self) -> Result<Option<MonitorEvent>, ClientError> {
        let ws = self.connection.as_mut().ok_or(ClientError::NotConnected)?;

        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    let event: MonitorEvent = serde_json::from_str(&text)?;
                    return Ok(Some(event));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(ClientError::Receive(e.to_string())),
            }
        }
    }

    /// Send a "ping" text frame; the server answers with a `pong` event
    pub async fn ping(&mut self) -> Result<(), ClientError> {
        self.send_text("ping").await
    }

    /// Request fresh statistics; the server answers with a `stats_update`
    pub async fn request_stats(&mut self) -> Result<(), ClientError> {
        self.send_text("get_stats").await
    }

    /// Close the connection
    pub async fn close(&mut self) -> Result<(), ClientError> {
        if let Some(mut ws) = self.connection.take() {
            ws.close(None)
                .await
                .map_err(|e| ClientError::Send(e.to_string()))?;
        }
        Ok(())
    }

    /// Send an arbitrary text frame
    ///
    /// The server ignores anything other than "ping" and "get_stats".
    pub async fn send_text(&mut self, text: &str) -> Result<(), ClientError> {
        let ws = self.connection.as_mut().ok_or(ClientError::NotConnected)?;
        ws.send(Message::Text(text.to_string()))
            .await
            .map_err(|e| ClientError::Send(e.to_string()))
    }
}
