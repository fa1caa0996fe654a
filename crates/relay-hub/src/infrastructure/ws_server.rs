//! WebSocket server: accept loop and per-peer session tasks.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming connections and upgrading each to a WebSocket.
//! 3. Registering each peer in the shared [`ClientTable`].
//! 4. Running two units of work per peer:
//!    - a **writer task** that exclusively owns the WebSocket sink and drains
//!      the peer's outbound queue, and
//!    - a **reader loop** that forwards every received text frame verbatim to
//!      every registered peer via [`ClientTable::broadcast`].
//! 5. Removing the peer from the table when its connection ends, however it
//!    ends.
//!
//! The accept loop uses a short timeout so it can poll the shutdown flag even
//! when no peers are connecting. Each peer session runs in its own tokio
//! task: a hung write to one peer stalls only that peer's writer, never the
//! accept loop or the other sessions.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use crate::application::{ClientId, ClientTable};
use crate::domain::HubConfig;

/// Error type for hub server operations.
#[derive(Debug, Error)]
pub enum HubServerError {
    /// The TCP listener could not be bound (port in use, no permission).
    #[error("failed to bind hub listener on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the hub listener and runs the accept loop until `running` is
/// cleared.
///
/// # Errors
///
/// Returns [`HubServerError::BindFailed`] if the listener cannot be bound;
/// this is the only startup-fatal condition in the hub.
pub async fn run_server(config: HubConfig, running: Arc<AtomicBool>) -> Result<(), HubServerError> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| HubServerError::BindFailed {
            addr: config.bind_addr,
            source,
        })?;

    info!("relay hub listening on {}", config.bind_addr);
    serve(listener, running).await;
    Ok(())
}

/// Runs the accept loop on an already-bound listener.
///
/// Split from [`run_server`] so integration tests can bind an ephemeral port
/// themselves and learn the address before serving.
pub async fn serve(listener: TcpListener, running: Arc<AtomicBool>) {
    let table = Arc::new(ClientTable::new());

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout so the loop can poll the shutdown flag even when no
        // peers are connecting.
        match timeout(Duration::from_millis(200), listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                let table = Arc::clone(&table);
                tokio::spawn(async move {
                    handle_peer_session(stream, peer_addr, table).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g. fd exhaustion); keep serving.
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout: no new connection in the last 200 ms.
            }
        }
    }
}

// ── Per-peer session ──────────────────────────────────────────────────────────

/// Entry point of each per-peer tokio task; wraps [`run_session`] and logs
/// the outcome so the session body can use `?` freely.
async fn handle_peer_session(raw_stream: TcpStream, peer_addr: SocketAddr, table: Arc<ClientTable>) {
    match run_session(raw_stream, peer_addr, table).await {
        Ok(id) => info!("client {id} ({peer_addr}) disconnected"),
        Err(e) => warn!("session {peer_addr} ended with error: {e}"),
    }
}

/// Runs the complete lifecycle of one peer connection.
///
/// # Errors
///
/// Returns an error only if the WebSocket handshake fails; everything after
/// registration is handled in-loop and ends the session without error.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    table: Arc<ClientTable>,
) -> Result<ClientId, WsError> {
    let ws_stream = accept_async(raw_stream).await?;

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let (client_id, mut out_rx) = table.insert().await;
    info!("client {client_id} connected from {peer_addr}");

    // Writer task: sole owner of the sink. Ends when the queue closes (peer
    // removed) or a send fails (connection gone).
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if let Err(e) = ws_tx.send(WsMessage::Text(frame)).await {
                debug!("client write failed, stopping writer: {e}");
                break;
            }
        }
    });

    // Reader loop: every text frame is forwarded verbatim to all peers,
    // including this one. Per-producer order is preserved because this loop
    // is the only reader for this connection.
    loop {
        match ws_rx.next().await {
            Some(Ok(WsMessage::Text(frame))) => {
                debug!("client {client_id}: relaying frame {frame:?}");
                let dropped = table.broadcast(&frame).await;
                if !dropped.is_empty() {
                    debug!("removed stale peers during fan-out: {dropped:?}");
                }
            }
            Some(Ok(WsMessage::Binary(_))) => {
                // The relay protocol is text-only.
                warn!("client {client_id}: unexpected binary frame (ignored)");
            }
            Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {
                // Protocol-level keepalive; tungstenite answers pings when
                // the sink is flushed.
            }
            Some(Ok(WsMessage::Close(_))) => {
                debug!("client {client_id}: close frame received");
                break;
            }
            Some(Ok(WsMessage::Frame(_))) => {
                debug!("client {client_id}: raw frame (ignored)");
            }
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                debug!("client {client_id}: connection closed");
                break;
            }
            Some(Err(e)) => {
                warn!("client {client_id}: receive error: {e}");
                break;
            }
            None => {
                debug!("client {client_id}: stream ended");
                break;
            }
        }
    }

    // Remove first so no further frames are queued, then stop the writer.
    table.remove(client_id).await;
    writer_task.abort();
    Ok(client_id)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_server_reports_bind_failure_on_occupied_port() {
        // Arrange: occupy a port with a plain listener.
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = occupied.local_addr().unwrap();
        let config = HubConfig { bind_addr: addr };
        let running = Arc::new(AtomicBool::new(true));

        // Act
        let result = run_server(config, running).await;

        // Assert
        assert!(matches!(result, Err(HubServerError::BindFailed { .. })));
    }

    #[tokio::test]
    async fn test_serve_exits_when_running_is_cleared() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let running = Arc::new(AtomicBool::new(false));

        // Must return promptly instead of accepting forever.
        timeout(Duration::from_secs(1), serve(listener, running))
            .await
            .expect("serve must exit once the flag is cleared");
    }
}
