//! Bridge configuration.
//!
//! [`BridgeConfig`] is the single source of truth for the bridge's runtime
//! settings. It is built once at startup — from the optional TOML config
//! file (see `infrastructure::storage`), CLI arguments, or defaults — and
//! then passed by reference; nothing in here reads the environment.

use std::time::Duration;

use relay_core::DeviceMap;

/// All runtime configuration for the peripheral bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// WebSocket URL of the broadcast hub.
    pub hub_url: String,

    /// Hand-target → advertised-device-name map; its two names form the
    /// known-device allow-list for the startup scan.
    pub devices: DeviceMap,

    /// First delay of the reconnect backoff after the hub connection drops.
    pub initial_backoff: Duration,

    /// Upper bound of the reconnect backoff. Each failed attempt doubles the
    /// delay up to this cap; a successful connect resets it.
    pub max_backoff: Duration,
}

impl Default for BridgeConfig {
    /// Defaults suitable for a single-host development setup: hub on
    /// localhost port 5000, production device names, 500 ms → 30 s backoff.
    fn default() -> Self {
        Self {
            hub_url: "ws://127.0.0.1:5000/ws".to_string(),
            devices: DeviceMap::default(),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
