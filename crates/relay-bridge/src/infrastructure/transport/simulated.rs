//! Simulated peripheral transport.
//!
//! Stands in for a platform BLE stack: advertises a configurable set of
//! peripherals and records every write instead of radiating it. Used by the
//! bridge binary in simulation mode and by the integration tests, which
//! assert on the recorded writes.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::application::peripheral::{
    AdvertisedDevice, Endpoint, EndpointId, PeripheralLink, PeripheralTransport, TransportError,
};

/// One write captured by the simulated transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub device: String,
    pub endpoint: EndpointId,
    pub payload: Vec<u8>,
}

/// Description of one simulated peripheral.
#[derive(Debug, Clone)]
pub struct SimulatedPeripheral {
    pub name: String,
    pub endpoints: Vec<Endpoint>,
    /// Writes to these endpoints fail, to exercise the continue-on-failure
    /// path.
    pub failing_endpoints: Vec<EndpointId>,
}

impl SimulatedPeripheral {
    /// A peripheral with the given writable endpoints and no failures.
    pub fn new(name: &str, endpoint_ids: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            endpoints: endpoint_ids
                .iter()
                .map(|id| Endpoint {
                    id: EndpointId(id.to_string()),
                    writable: true,
                })
                .collect(),
            failing_endpoints: Vec::new(),
        }
    }
}

/// In-memory transport advertising a fixed set of peripherals.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTransport {
    peripherals: Vec<SimulatedPeripheral>,
    writes: Arc<Mutex<Vec<WriteRecord>>>,
    fail_discovery: bool,
}

impl SimulatedTransport {
    pub fn with_peripherals(peripherals: Vec<SimulatedPeripheral>) -> Self {
        Self {
            peripherals,
            ..Self::default()
        }
    }

    /// A transport whose scan fails, for exercising the abort path.
    pub fn failing_discovery() -> Self {
        Self {
            fail_discovery: true,
            ..Self::default()
        }
    }

    /// The production rig: both default devices, one writable endpoint
    /// each. What the bridge binary runs against in simulation mode.
    pub fn demo_rig() -> Self {
        Self::with_peripherals(vec![
            SimulatedPeripheral::new("Haptic Definition: Vest", &["vest-write-1"]),
            SimulatedPeripheral::new("Haptic Definition: Hands", &["hands-write-1"]),
        ])
    }

    /// Everything written so far, across all simulated devices, in order.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.writes.lock().unwrap().clone()
    }

    /// Forgets recorded writes. Lets tests discard the connect probes
    /// before asserting on command traffic.
    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }
}

#[async_trait]
impl PeripheralTransport for SimulatedTransport {
    async fn discover(&self) -> Result<Vec<AdvertisedDevice>, TransportError> {
        if self.fail_discovery {
            return Err(TransportError::Discovery(
                "simulated adapter failure".to_string(),
            ));
        }
        Ok(self
            .peripherals
            .iter()
            .map(|p| AdvertisedDevice {
                name: p.name.clone(),
            })
            .collect())
    }

    async fn connect(
        &self,
        device: &AdvertisedDevice,
    ) -> Result<Box<dyn PeripheralLink>, TransportError> {
        let peripheral = self
            .peripherals
            .iter()
            .find(|p| p.name == device.name)
            .ok_or_else(|| TransportError::Connect {
                name: device.name.clone(),
                reason: "no such simulated peripheral".to_string(),
            })?;
        debug!("simulated connect to '{}'", peripheral.name);
        Ok(Box::new(SimulatedLink {
            device: peripheral.name.clone(),
            endpoints: peripheral.endpoints.clone(),
            failing_endpoints: peripheral.failing_endpoints.clone(),
            writes: Arc::clone(&self.writes),
        }))
    }
}

/// Link to one simulated peripheral; shares the transport's write log.
struct SimulatedLink {
    device: String,
    endpoints: Vec<Endpoint>,
    failing_endpoints: Vec<EndpointId>,
    writes: Arc<Mutex<Vec<WriteRecord>>>,
}

#[async_trait]
impl PeripheralLink for SimulatedLink {
    async fn endpoints(&self) -> Result<Vec<Endpoint>, TransportError> {
        Ok(self.endpoints.clone())
    }

    async fn write(&self, endpoint: &EndpointId, payload: &[u8]) -> Result<(), TransportError> {
        if self.failing_endpoints.contains(endpoint) {
            return Err(TransportError::Write {
                endpoint: endpoint.clone(),
                reason: "simulated endpoint failure".to_string(),
            });
        }
        self.writes.lock().unwrap().push(WriteRecord {
            device: self.device.clone(),
            endpoint: endpoint.clone(),
            payload: payload.to_vec(),
        });
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
