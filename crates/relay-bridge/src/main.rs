//! haptic-relay peripheral bridge — entry point.
//!
//! Subscribes to the broadcast hub, parses command frames, and writes
//! intensity codes to the connected haptic peripherals.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config() / CLI          -- build BridgeConfig
//!  └─ discover_and_connect()       -- one-time scan, build DeviceRegistry
//!  └─ HubConnection::start()       -- WebSocket reconnect loop
//!  └─ event dispatch loop
//!       ├─ Connected / Disconnected -> log only
//!       └─ Frame(raw)               -> dispatch_frame()
//! ```
//!
//! # Usage
//!
//! ```text
//! relay-bridge [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Optional TOML config file
//!   --hub-url <URL>   Hub WebSocket URL [default: ws://127.0.0.1:5000/ws]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable              | Description                      |
//! |-----------------------|----------------------------------|
//! | `RELAY_BRIDGE_CONFIG` | Path to the TOML config file     |
//! | `RELAY_HUB_URL`       | Hub WebSocket URL                |
//!
//! # Peripheral transport
//!
//! The `SimulatedTransport` wired in here records writes rather than
//! radiating them. In a production build it is replaced by a platform BLE
//! backend implementing the same `PeripheralTransport` trait.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use relay_bridge::application::{discover_and_connect, dispatch_frame, DeviceRegistry};
use relay_bridge::domain::BridgeConfig;
use relay_bridge::infrastructure::{
    load_config, HubConnection, HubConnectionConfig, HubEvent, SimulatedTransport,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// haptic-relay peripheral bridge.
#[derive(Debug, Parser)]
#[command(
    name = "relay-bridge",
    about = "Peripheral bridge: turns hub command frames into device writes",
    version
)]
struct Cli {
    /// Path to a TOML config file; every field is optional.
    #[arg(long, env = "RELAY_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Hub WebSocket URL; overrides the config file.
    #[arg(long, env = "RELAY_HUB_URL")]
    hub_url: Option<String>,
}

impl Cli {
    /// Builds the runtime configuration: config file (or defaults), then
    /// CLI overrides, then validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the device
    /// map maps both hands to one name.
    fn into_bridge_config(self) -> anyhow::Result<BridgeConfig> {
        let file = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Default::default(),
        };

        let mut config = file.into_bridge_config();
        if let Some(hub_url) = self.hub_url {
            config.hub_url = hub_url;
        }
        config.devices.validate().context("invalid device map")?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_bridge_config()?;

    info!("relay bridge starting; hub at {}", config.hub_url);

    // ── Peripheral setup ──────────────────────────────────────────────────────
    // In production: replace SimulatedTransport with a platform BLE backend.
    let transport = SimulatedTransport::demo_rig();
    let registry = match discover_and_connect(&transport, &config.devices).await {
        Ok(registry) => registry,
        Err(e) => {
            error!("peripheral setup failed: {e}");
            DeviceRegistry::new()
        }
    };
    if registry.is_empty() {
        // Degraded mode: no peripherals to serve, so there is no point in
        // consuming the hub stream. Stay alive until shutdown so service
        // supervision treats this like any other run.
        warn!("no haptic device reached ready state; idling without hub consumption");
        tokio::signal::ctrl_c().await.ok();
        info!("relay bridge stopped");
        return Ok(());
    }

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    // ── Hub connection + dispatch loop ────────────────────────────────────────
    let connection = HubConnection::new(HubConnectionConfig::from(&config));
    let mut events = connection.start(Arc::clone(&running));

    while let Some(event) = events.recv().await {
        if !running.load(Ordering::Relaxed) {
            break;
        }

        match event {
            HubEvent::Connected => info!("hub link up"),
            HubEvent::Disconnected => warn!("hub link down; reconnecting"),
            HubEvent::Frame(raw) => {
                dispatch_frame(&registry, &config.devices, &raw).await;
            }
        }
    }

    info!("relay bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cli_defaults_to_no_config_file() {
        let cli = Cli::parse_from(["relay-bridge"]);
        assert!(cli.config.is_none());
        assert!(cli.hub_url.is_none());
    }

    #[test]
    fn test_no_file_yields_default_config() {
        let cli = Cli::parse_from(["relay-bridge"]);
        let config = cli.into_bridge_config().unwrap();
        assert_eq!(config.hub_url, "ws://127.0.0.1:5000/ws");
        assert_eq!(config.initial_backoff, Duration::from_millis(500));
    }

    #[test]
    fn test_hub_url_flag_overrides_default() {
        let cli = Cli::parse_from(["relay-bridge", "--hub-url", "ws://10.0.0.7:5000/ws"]);
        let config = cli.into_bridge_config().unwrap();
        assert_eq!(config.hub_url, "ws://10.0.0.7:5000/ws");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            hub_url: None,
        };
        assert!(cli.into_bridge_config().is_err());
    }
}
