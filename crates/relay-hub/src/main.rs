//! haptic-relay broadcast hub — entry point.
//!
//! Accepts persistent WebSocket connections from event producers (the
//! analysis pipeline) and consumers (the peripheral bridge) and forwards
//! every text frame to every connected peer.
//!
//! # Usage
//!
//! ```text
//! relay-hub [OPTIONS]
//!
//! Options:
//!   --port <PORT>   WebSocket listener port [default: 5000]
//!   --bind <ADDR>   Bind address [default: 0.0.0.0]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable          | Default   | Description             |
//! |-------------------|-----------|-------------------------|
//! | `RELAY_HUB_PORT`  | `5000`    | WebSocket listener port |
//! | `RELAY_HUB_BIND`  | `0.0.0.0` | Bind address            |

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use relay_hub::domain::HubConfig;
use relay_hub::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// haptic-relay broadcast hub.
#[derive(Debug, Parser)]
#[command(
    name = "relay-hub",
    about = "Broadcast hub: fans every relay frame out to all connected peers",
    version
)]
struct Cli {
    /// TCP port for the WebSocket listener.
    #[arg(long, default_value_t = 5000, env = "RELAY_HUB_PORT")]
    port: u16,

    /// IP address to bind the listener to.
    ///
    /// Use `0.0.0.0` to accept peers from any interface, or `127.0.0.1` for
    /// local-only deployments.
    #[arg(long, default_value = "0.0.0.0", env = "RELAY_HUB_BIND")]
    bind: String,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`HubConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address.
    fn into_hub_config(self) -> anyhow::Result<HubConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;
        Ok(HubConfig { bind_addr })
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

    let config = Cli::parse().into_hub_config()?;

    info!("relay hub starting on {}", config.bind_addr);

    // Graceful shutdown: Ctrl+C clears the flag, the accept loop polls it.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C — initiating graceful shutdown");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    run_server(config, running).await?;

    info!("relay hub stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
