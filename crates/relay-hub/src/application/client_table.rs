//! The hub's client table: peer registration and frame fan-out.
//!
//! The table is the only shared mutable state in the hub. It is guarded by a
//! single async mutex and exposes explicit `insert` / `remove` / `broadcast`
//! operations; the raw map is never handed out. Fan-out iterates a snapshot
//! taken under the lock, so peers removed mid-pass never corrupt iteration.
//!
//! Each peer's outbound frames flow through a bounded mpsc queue drained by
//! that peer's dedicated writer task (which exclusively owns the WebSocket
//! sink). A closed queue means the writer died with the connection — the
//! peer is treated as disconnected and removed. A full queue means the peer
//! is stalled; the frame is dropped for that peer only, since delivery is
//! best-effort and one slow peer must never block the forwarding pass.

use std::collections::HashMap;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

/// Unique peer identifier, monotonically assigned, never reused within a
/// process lifetime.
pub type ClientId = u64;

/// Depth of each peer's outbound frame queue.
const OUTBOUND_QUEUE_DEPTH: usize = 64;

#[derive(Default)]
struct TableInner {
    next_id: ClientId,
    peers: HashMap<ClientId, mpsc::Sender<String>>,
}

/// Registry of currently connected peers.
#[derive(Default)]
pub struct ClientTable {
    inner: Mutex<TableInner>,
}

impl ClientTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new peer and returns its id together with the receiving
    /// end of its outbound frame queue.
    ///
    /// The caller (the session task) hands the receiver to the peer's writer
    /// task; frames broadcast to the table appear there in order.
    pub async fn insert(&self) -> (ClientId, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_DEPTH);
        let mut inner = self.inner.lock().await;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.peers.insert(id, tx);
        (id, rx)
    }

    /// Removes a peer. Returns `false` if the id was not present (already
    /// removed by a failed broadcast, for example) — that is not an error.
    pub async fn remove(&self, id: ClientId) -> bool {
        self.inner.lock().await.peers.remove(&id).is_some()
    }

    /// Number of currently registered peers.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.peers.len()
    }

    /// Returns `true` when no peers are registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Forwards `frame` to every registered peer, including the sender.
    ///
    /// Iterates a snapshot of the table taken under the lock; peers whose
    /// queue has closed (writer task gone — an implicit disconnect) are
    /// removed from the live table after the pass and returned. A failure on
    /// one peer never prevents delivery to the rest.
    pub async fn broadcast(&self, frame: &str) -> Vec<ClientId> {
        let snapshot: Vec<(ClientId, mpsc::Sender<String>)> = {
            let inner = self.inner.lock().await;
            inner.peers.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };

        let mut disconnected = Vec::new();
        for (id, tx) in snapshot {
            match tx.try_send(frame.to_string()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    // Stalled peer: drop this frame for it, keep the peer.
                    warn!("client {id}: outbound queue full, dropping frame");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("client {id}: outbound queue closed, removing peer");
                    disconnected.push(id);
                }
            }
        }

        if !disconnected.is_empty() {
            let mut inner = self.inner.lock().await;
            for id in &disconnected {
                inner.peers.remove(id);
            }
        }
        disconnected
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
