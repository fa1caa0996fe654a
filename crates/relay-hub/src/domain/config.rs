//! Hub configuration.
//!
//! [`HubConfig`] is built once at startup from CLI arguments (with
//! environment-variable overrides) and handed to the server. Keeping it a
//! plain struct — no global state, no env reads in here — makes the hub easy
//! to embed in integration tests.

use std::net::SocketAddr;

/// All runtime configuration for the broadcast hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// The address and port the WebSocket listener binds to.
    ///
    /// `0.0.0.0` accepts peers from any interface; set `127.0.0.1` to accept
    /// only local connections.
    pub bind_addr: SocketAddr,
}

impl Default for HubConfig {
    /// Defaults suitable for local development: all interfaces, port 5000
    /// (the port the upstream analysis pipeline connects to).
    fn default() -> Self {
        Self {
            // Compile-time-known valid socket address string.
            bind_addr: "0.0.0.0:5000".parse().unwrap(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
