//! The peripheral transport seam.
//!
//! The actual short-range wireless primitives (scanning, connecting, GATT
//! writes) live outside this subsystem in a platform BLE stack. The bridge
//! consumes them behind these two traits so that the setup and dispatch use
//! cases can be driven by any backend: a real platform stack in production,
//! [`crate::infrastructure::transport::SimulatedTransport`] in simulation
//! mode and tests.
//!
//! All writes are fire-and-forget: the transport confirms only that the
//! bytes were handed to the link, never that the device acted on them.

use async_trait::async_trait;
use thiserror::Error;

/// Identifier of one writable communication channel on a peripheral.
///
/// For a BLE backend this is the characteristic UUID; the bridge treats it
/// as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointId(pub String);

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error type for peripheral transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The one-time peripheral scan failed outright.
    #[error("peripheral scan failed: {0}")]
    Discovery(String),
    /// A connection to one advertised device could not be established.
    #[error("failed to connect to '{name}': {reason}")]
    Connect { name: String, reason: String },
    /// Endpoint enumeration failed on an established connection.
    #[error("failed to enumerate endpoints: {0}")]
    Endpoints(String),
    /// A transport-level write to one endpoint failed.
    #[error("write to endpoint {endpoint} failed: {reason}")]
    Write {
        endpoint: EndpointId,
        reason: String,
    },
}

/// One device seen during the scan, identified by its advertised name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisedDevice {
    pub name: String,
}

/// One endpoint reported by a connected peripheral, tagged with its write
/// capability. The bridge only ever retains writable endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub id: EndpointId,
    pub writable: bool,
}

/// A live connection to one peripheral.
///
/// The link is established exactly once per process lifetime; a dropped
/// link is a terminal condition for that device until restart (the bridge
/// never reconnects peripherals).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeripheralLink: Send + Sync {
    /// Enumerates the endpoints the device exposes, in discovery order.
    async fn endpoints(&self) -> Result<Vec<Endpoint>, TransportError>;

    /// Writes `payload` to `endpoint`, fire-and-forget.
    async fn write(&self, endpoint: &EndpointId, payload: &[u8]) -> Result<(), TransportError>;
}

/// The platform scanning/connecting primitives.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeripheralTransport: Send + Sync {
    /// Enumerates all reachable peripherals. Called exactly once, at startup.
    async fn discover(&self) -> Result<Vec<AdvertisedDevice>, TransportError>;

    /// Establishes a connection to one advertised device.
    async fn connect(
        &self,
        device: &AdvertisedDevice,
    ) -> Result<Box<dyn PeripheralLink>, TransportError>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
