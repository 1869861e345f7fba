//! Mesh event stream listener.

use futures_util::{SinkExt, Stream, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, tungstenite};
use tokio_util::sync::CancellationToken;

use meshlink_common::MeshEvent;

use crate::config::GatewayConfig;
use crate::error::{Error, Result};

/// Lifecycle of one listening session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Connecting,
    Listening,
    Done,
    Failed,
}

impl std::fmt::Display for ListenerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ListenerState::Connecting => "connecting",
            ListenerState::Listening => "listening",
            ListenerState::Done => "done",
            ListenerState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Listens on the gateway event stream until a `mesh_status` event arrives.
pub struct EventListener {
    ws_url: String,
}

impl EventListener {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            ws_url: config.events_url(),
        }
    }

    /// Connect and wait for the first `mesh_status` event.
    ///
    /// Every decoded event is logged as it arrives; the event that ended the
    /// wait is returned. The connection is closed on every exit path.
    /// Cancelling `cancel` aborts the wait with [`Error::Cancelled`]; with an
    /// un-cancelled token the wait is unbounded.
    pub async fn listen(&self, cancel: &CancellationToken) -> Result<MeshEvent> {
        tracing::info!(state = %ListenerState::Connecting, "Connecting to {}", self.ws_url);

        let (ws_stream, _) = connect_async(&self.ws_url)
            .await
            .map_err(|e| Error::Transport(format!("WebSocket handshake failed: {}", e)))?;
        let (mut write, mut read) = ws_stream.split();

        tracing::debug!(state = %ListenerState::Listening, "Handshake complete, waiting for events");

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            outcome = await_mesh_status(&mut read) => outcome,
        };

        // The connection is released whichever way the wait ended.
        let _ = write.close().await;

        match &result {
            Ok(event) => {
                tracing::info!(state = %ListenerState::Done, "Mesh status received: {}", event)
            }
            Err(e) => tracing::warn!(state = %ListenerState::Failed, "Event wait ended: {}", e),
        }

        result
    }
}

/// Drive the frame stream until a `mesh_status` event, a decode failure, or a
/// transport failure. Generic so tests can feed scripted frames.
async fn await_mesh_status<R>(read: &mut R) -> Result<MeshEvent>
where
    R: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = read.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let event: MeshEvent = serde_json::from_str(&text)
                    .map_err(|e| Error::Protocol(format!("undecodable event frame: {}", e)))?;
                tracing::info!("Received event: {}", event);
                if event.is_mesh_status() {
                    return Ok(event);
                }
            }
            Ok(Message::Close(_)) => {
                return Err(Error::Transport(
                    "gateway closed the event stream".to_string(),
                ));
            }
            // Ping/Pong/Binary frames are not events
            Ok(_) => {}
            Err(e) => {
                return Err(Error::Transport(format!("WebSocket error: {}", e)));
            }
        }
    }

    Err(Error::Transport(
        "event stream ended before a mesh_status event".to_string(),
    ))
}
