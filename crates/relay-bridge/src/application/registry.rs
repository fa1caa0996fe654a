//! The device registry: connected peripherals keyed by advertised name.
//!
//! The registry is built once by the setup use case and then owned by the
//! single dispatch task, so it needs no lock: all mutation happens before
//! dispatch begins, and dispatch only reads.
//!
//! The backing store is a `Vec` rather than a map on purpose: broadcast
//! writes must visit devices in registration order, and the set is tiny (two
//! devices on the production rig), so linear lookup costs nothing.

use thiserror::Error;
use tracing::warn;

use crate::application::peripheral::{EndpointId, PeripheralLink};

/// Error type for registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The advertised name is already registered. A discovery pass that
    /// yields the same name twice is a scan artifact; only the extra
    /// registration is rejected, never the process.
    #[error("device '{0}' is already registered")]
    DuplicateDevice(String),
}

/// One connected haptic peripheral.
pub struct Device {
    name: String,
    link: Box<dyn PeripheralLink>,
    /// Writable endpoints in discovery order. Only ever appended during
    /// setup; fixed once the device is registered.
    endpoints: Vec<EndpointId>,
}

impl Device {
    /// The name the device advertised during the scan.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The device's writable endpoints, in discovery order.
    pub fn endpoints(&self) -> &[EndpointId] {
        &self.endpoints
    }

    /// Writes the ASCII-encoded intensity code to every endpoint,
    /// sequentially, in discovery order.
    ///
    /// Devices commonly expose multiple equivalent write endpoints, so a
    /// failure on one endpoint is logged and never aborts the writes to the
    /// remaining ones. Fire-and-forget from the caller's perspective: no
    /// error is returned.
    pub async fn write_intensity(&self, intensity: u8) {
        let payload = intensity.to_string().into_bytes();
        for endpoint in &self.endpoints {
            if let Err(e) = self.link.write(endpoint, &payload).await {
                warn!(
                    "device '{}': {e}; continuing with remaining endpoints",
                    self.name
                );
            }
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

/// Registry of connected devices, in registration order.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device under its advertised name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateDevice`] if the name is already
    /// registered.
    pub fn register(
        &mut self,
        name: String,
        link: Box<dyn PeripheralLink>,
        endpoints: Vec<EndpointId>,
    ) -> Result<(), RegistryError> {
        if self.lookup(&name).is_some() {
            return Err(RegistryError::DuplicateDevice(name));
        }
        self.devices.push(Device {
            name,
            link,
            endpoints,
        });
        Ok(())
    }

    /// Looks a device up by advertised name. Absence is a valid outcome,
    /// not an error.
    pub fn lookup(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// All registered devices, in registration order.
    pub fn all(&self) -> &[Device] {
        &self.devices
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` when no device reached Ready.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::peripheral::{Endpoint, TransportError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records writes and fails on a chosen endpoint, in the spirit of the
    /// simulated transport but small enough for unit tests.
    #[derive(Default)]
    struct RecordingLink {
        writes: Mutex<Vec<(EndpointId, Vec<u8>)>>,
        fail_on: Option<EndpointId>,
    }

    #[async_trait]
    impl PeripheralLink for RecordingLink {
        async fn endpoints(&self) -> Result<Vec<Endpoint>, TransportError> {
            Ok(Vec::new())
        }

        async fn write(
            &self,
            endpoint: &EndpointId,
            payload: &[u8],
        ) -> Result<(), TransportError> {
            if self.fail_on.as_ref() == Some(endpoint) {
                return Err(TransportError::Write {
                    endpoint: endpoint.clone(),
                    reason: "simulated failure".to_string(),
                });
            }
            self.writes
                .lock()
                .unwrap()
                .push((endpoint.clone(), payload.to_vec()));
            Ok(())
        }
    }

    fn ep(id: &str) -> EndpointId {
        EndpointId(id.to_string())
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut registry = DeviceRegistry::new();
        registry
            .register("Vest".to_string(), Box::new(RecordingLink::default()), vec![])
            .unwrap();

        let result = registry.register(
            "Vest".to_string(),
            Box::new(RecordingLink::default()),
            vec![],
        );

        assert_eq!(result, Err(RegistryError::DuplicateDevice("Vest".to_string())));
        assert_eq!(registry.len(), 1, "the duplicate must not be inserted");
    }

    #[test]
    fn test_lookup_absent_name_returns_none() {
        let registry = DeviceRegistry::new();
        assert!(registry.lookup("Nowhere").is_none());
    }

    #[test]
    fn test_all_preserves_registration_order() {
        let mut registry = DeviceRegistry::new();
        for name in ["First", "Second", "Third"] {
            registry
                .register(name.to_string(), Box::new(RecordingLink::default()), vec![])
                .unwrap();
        }
        let names: Vec<&str> = registry.all().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_write_intensity_records_ascii_payload_on_each_endpoint() {
        use std::sync::Arc;

        /// Same as RecordingLink but with an externally shared record.
        struct SharedLink {
            writes: Arc<Mutex<Vec<(EndpointId, Vec<u8>)>>>,
            fail_on: Option<EndpointId>,
        }

        #[async_trait]
        impl PeripheralLink for SharedLink {
            async fn endpoints(&self) -> Result<Vec<Endpoint>, TransportError> {
                Ok(Vec::new())
            }
            async fn write(
                &self,
                endpoint: &EndpointId,
                payload: &[u8],
            ) -> Result<(), TransportError> {
                if self.fail_on.as_ref() == Some(endpoint) {
                    return Err(TransportError::Write {
                        endpoint: endpoint.clone(),
                        reason: "simulated failure".to_string(),
                    });
                }
                self.writes
                    .lock()
                    .unwrap()
                    .push((endpoint.clone(), payload.to_vec()));
                Ok(())
            }
        }

        let writes = Arc::new(Mutex::new(Vec::new()));
        let mut registry = DeviceRegistry::new();
        registry
            .register(
                "Vest".to_string(),
                Box::new(SharedLink {
                    writes: Arc::clone(&writes),
                    fail_on: None,
                }),
                vec![ep("a"), ep("b")],
            )
            .unwrap();

        registry.lookup("Vest").unwrap().write_intensity(2).await;

        let recorded = writes.lock().unwrap();
        assert_eq!(
            *recorded,
            vec![(ep("a"), b"2".to_vec()), (ep("b"), b"2".to_vec())]
        );
    }

    #[tokio::test]
    async fn test_failed_endpoint_does_not_abort_remaining_writes() {
        use std::sync::Arc;

        struct SharedLink {
            writes: Arc<Mutex<Vec<EndpointId>>>,
            fail_on: EndpointId,
        }

        #[async_trait]
        impl PeripheralLink for SharedLink {
            async fn endpoints(&self) -> Result<Vec<Endpoint>, TransportError> {
                Ok(Vec::new())
            }
            async fn write(
                &self,
                endpoint: &EndpointId,
                _payload: &[u8],
            ) -> Result<(), TransportError> {
                if *endpoint == self.fail_on {
                    return Err(TransportError::Write {
                        endpoint: endpoint.clone(),
                        reason: "simulated failure".to_string(),
                    });
                }
                self.writes.lock().unwrap().push(endpoint.clone());
                Ok(())
            }
        }

        let writes = Arc::new(Mutex::new(Vec::new()));
        let mut registry = DeviceRegistry::new();
        registry
            .register(
                "Vest".to_string(),
                Box::new(SharedLink {
                    writes: Arc::clone(&writes),
                    fail_on: ep("first"),
                }),
                vec![ep("first"), ep("second")],
            )
            .unwrap();

        registry.lookup("Vest").unwrap().write_intensity(0).await;

        // Endpoint 1 failed; endpoint 2 must still have been attempted.
        assert_eq!(*writes.lock().unwrap(), vec![ep("second")]);
    }
}
