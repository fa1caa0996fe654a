//! Hub connection management.
//!
//! [`HubConnection`] owns the WebSocket link to the broadcast hub and the
//! reconnect policy around it. It runs in its own task and feeds the
//! dispatch loop through a channel of [`HubEvent`]s, so a dropped hub never
//! surfaces in the dispatch path as anything but a `Disconnected` marker
//! followed eventually by a fresh `Connected`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::domain::BridgeConfig;

/// Depth of the event channel between the connection task and the dispatch
/// loop. Commands are tiny and dispatch is fast, so a shallow buffer is
/// plenty.
const EVENT_QUEUE_DEPTH: usize = 64;

/// What the connection task reports to the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// A hub connection was (re-)established.
    Connected,
    /// One text frame arrived from the hub, forwarded verbatim.
    Frame(String),
    /// The hub connection dropped; a reconnect attempt follows.
    Disconnected,
}

/// How one established hub session ended.
enum LinkEnd {
    /// The hub closed the connection cleanly.
    Closed,
    /// The connection failed mid-stream.
    TransportError(WsError),
    /// The dispatch loop dropped its receiver; the process is going down.
    ConsumerGone,
}

/// Connection settings lifted out of [`BridgeConfig`].
#[derive(Debug, Clone)]
pub struct HubConnectionConfig {
    pub hub_url: String,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl From<&BridgeConfig> for HubConnectionConfig {
    fn from(cfg: &BridgeConfig) -> Self {
        Self {
            hub_url: cfg.hub_url.clone(),
            initial_backoff: cfg.initial_backoff,
            max_backoff: cfg.max_backoff,
        }
    }
}

/// The hub connection task handle.
pub struct HubConnection {
    config: HubConnectionConfig,
}

impl HubConnection {
    pub fn new(config: HubConnectionConfig) -> Self {
        Self { config }
    }

    /// Spawns the connect/read/reconnect loop and returns the event
    /// receiver. The loop runs until `running` is cleared or the receiver
    /// is dropped.
    pub fn start(self, running: Arc<AtomicBool>) -> mpsc::Receiver<HubEvent> {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        tokio::spawn(async move {
            self.run(tx, running).await;
        });
        rx
    }

    async fn run(self, tx: mpsc::Sender<HubEvent>, running: Arc<AtomicBool>) {
        let mut backoff = self.config.initial_backoff;

        while running.load(Ordering::Relaxed) {
            match connect_async(self.config.hub_url.as_str()).await {
                Ok((ws, _response)) => {
                    info!("connected to hub at {}", self.config.hub_url);
                    backoff = self.config.initial_backoff;
                    if tx.send(HubEvent::Connected).await.is_err() {
                        return;
                    }
                    match read_frames(ws, &tx).await {
                        LinkEnd::Closed => info!("hub closed the connection"),
                        LinkEnd::TransportError(e) => warn!("hub connection lost: {e}"),
                        LinkEnd::ConsumerGone => return,
                    }
                    if tx.send(HubEvent::Disconnected).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!(
                        "cannot reach hub at {}: {e}; retrying in {backoff:?}",
                        self.config.hub_url
                    );
                }
            }

            tokio::time::sleep(backoff).await;
            backoff = next_backoff(backoff, self.config.max_backoff);
        }
        debug!("hub connection task stopping");
    }
}

/// Doubles the delay up to `max`.
fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

/// Drains one established session, forwarding text frames into `tx`.
async fn read_frames(
    mut ws: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    tx: &mpsc::Sender<HubEvent>,
) -> LinkEnd {
    while let Some(message) = ws.next().await {
        match message {
            Ok(WsMessage::Text(frame)) => {
                if tx.send(HubEvent::Frame(frame)).await.is_err() {
                    return LinkEnd::ConsumerGone;
                }
            }
            // The hub only relays text; anything else is noise.
            Ok(WsMessage::Binary(payload)) => {
                warn!("ignoring {}-byte binary frame from hub", payload.len());
            }
            Ok(WsMessage::Ping(_) | WsMessage::Pong(_)) => {}
            Ok(WsMessage::Close(_)) => return LinkEnd::Closed,
            Ok(WsMessage::Frame(_)) => {}
            Err(e) => return LinkEnd::TransportError(e),
        }
    }
    LinkEnd::Closed
}

// ── Tests ─────────────────────────────────────────────────────────────────────
