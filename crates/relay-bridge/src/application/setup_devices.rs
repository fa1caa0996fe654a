//! Startup use case: scan once, connect the known devices, build the
//! registry.
//!
//! Discovery runs exactly once per process lifetime. Devices that are
//! absent from the scan, fail to connect, or expose no writable endpoint
//! are logged and skipped; the bridge then runs degraded with whatever
//! subset reached Ready. Only a failed scan itself aborts setup.

use tracing::{debug, info, warn};

use relay_core::DeviceMap;

use crate::application::peripheral::{PeripheralTransport, TransportError};
use crate::application::registry::DeviceRegistry;

/// Probe payload written to every writable endpoint right after connecting.
/// Confirms the write path end to end before any command traffic flows.
const CONNECT_PROBE: &[u8] = b"Hello World!";

/// Scans for peripherals, connects every device on the allow-list derived
/// from `devices`, and returns the registry of devices that reached Ready.
///
/// An empty registry is a valid outcome (degraded mode), not an error.
///
/// # Errors
///
/// Returns [`TransportError::Discovery`] only when the scan itself fails;
/// per-device connect and enumeration failures are logged and skipped.
pub async fn discover_and_connect(
    transport: &dyn PeripheralTransport,
    devices: &DeviceMap,
) -> Result<DeviceRegistry, TransportError> {
    info!("scanning for haptic peripherals");
    let advertised = transport.discover().await?;
    debug!("scan returned {} device(s)", advertised.len());

    let mut registry = DeviceRegistry::new();

    for candidate in &advertised {
        if !devices.is_known(&candidate.name) {
            debug!("ignoring unknown device '{}'", candidate.name);
            continue;
        }

        let link = match transport.connect(candidate).await {
            Ok(link) => link,
            Err(e) => {
                warn!("skipping '{}': {e}", candidate.name);
                continue;
            }
        };

        let endpoints = match link.endpoints().await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!("skipping '{}': {e}", candidate.name);
                continue;
            }
        };

        let writable: Vec<_> = endpoints
            .into_iter()
            .filter(|e| e.writable)
            .map(|e| e.id)
            .collect();
        if writable.is_empty() {
            warn!(
                "skipping '{}': no writable endpoint exposed",
                candidate.name
            );
            continue;
        }

        // Probe every writable endpoint once so a broken write path shows
        // up at startup rather than on the first command.
        for endpoint in &writable {
            if let Err(e) = link.write(endpoint, CONNECT_PROBE).await {
                warn!("probe write on '{}': {e}", candidate.name);
            }
        }

        let name = candidate.name.clone();
        let endpoint_count = writable.len();
        match registry.register(name.clone(), link, writable) {
            Ok(()) => info!("'{name}' ready with {endpoint_count} writable endpoint(s)"),
            Err(e) => warn!("{e}; keeping the first connection"),
        }
    }

    for name in devices.allow_list() {
        if registry.lookup(name).is_none() {
            warn!("'{name}' did not reach ready state; running without it");
        }
    }

    Ok(registry)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
