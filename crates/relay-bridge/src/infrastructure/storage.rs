//! Configuration file loading.
//!
//! The bridge reads an optional TOML file; every field has a default, so an
//! empty file (or no file at all) yields the standard single-host setup.
//!
//! ```toml
//! hub_url = "ws://relay-host:5000/ws"
//! initial_backoff_ms = 500
//! max_backoff_ms = 30000
//!
//! [devices]
//! left_hand = "Haptic Definition: Vest"
//! right_hand = "Haptic Definition: Hands"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use relay_core::DeviceMap;

use crate::domain::BridgeConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has the wrong shape.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk shape of the bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfigFile {
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    #[serde(default)]
    pub devices: DeviceMap,
}

fn default_hub_url() -> String {
    "ws://127.0.0.1:5000/ws".to_string()
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for BridgeConfigFile {
    fn default() -> Self {
        Self {
            hub_url: default_hub_url(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            devices: DeviceMap::default(),
        }
    }
}

impl BridgeConfigFile {
    /// Converts the on-disk millisecond fields into runtime durations.
    pub fn into_bridge_config(self) -> BridgeConfig {
        BridgeConfig {
            hub_url: self.hub_url,
            devices: self.devices,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

/// Loads and parses the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if its contents are not a valid config.
pub fn load_config(path: &Path) -> Result<BridgeConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&contents)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
