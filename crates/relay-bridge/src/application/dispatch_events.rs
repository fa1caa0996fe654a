//! Dispatch use case: one hub frame in, device writes out.
//!
//! Frames arrive from the hub connection in order and are dispatched
//! sequentially by a single task, so command ordering per device matches
//! frame arrival order by construction.

use tracing::{debug, trace};

use relay_core::{parse, Command, DeviceMap};

use crate::application::registry::DeviceRegistry;

/// Parses one raw hub frame and writes the resulting intensity code to the
/// target device(s).
///
/// Unrecognized frames and targets whose device never connected are logged
/// and dropped; dispatch never fails.
pub async fn dispatch_frame(registry: &DeviceRegistry, devices: &DeviceMap, raw: &str) {
    match parse(raw) {
        Command::Broadcast { intensity } => {
            debug!("broadcast intensity {intensity} to {} device(s)", registry.len());
            for device in registry.all() {
                device.write_intensity(intensity).await;
            }
        }
        Command::Targeted { hand, intensity } => {
            let name = devices.name_for(hand);
            match registry.lookup(name) {
                Some(device) => {
                    debug!("intensity {intensity} to '{name}'");
                    device.write_intensity(intensity).await;
                }
                // Degraded mode: the device never connected at startup.
                None => debug!("dropping command for absent device '{name}'"),
            }
        }
        Command::Unrecognized => trace!("ignoring unrecognized frame {raw:?}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::peripheral::{Endpoint, EndpointId, PeripheralLink, TransportError};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Appends `(device, payload)` to a shared log on every write.
    struct LoggingLink {
        device: String,
        log: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    }

    #[async_trait]
    impl PeripheralLink for LoggingLink {
        async fn endpoints(&self) -> Result<Vec<Endpoint>, TransportError> {
            Ok(Vec::new())
        }

        async fn write(
            &self,
            _endpoint: &EndpointId,
            payload: &[u8],
        ) -> Result<(), TransportError> {
            self.log
                .lock()
                .unwrap()
                .push((self.device.clone(), payload.to_vec()));
            Ok(())
        }
    }

    struct Rig {
        registry: DeviceRegistry,
        devices: DeviceMap,
        log: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    }

    /// Registry with both production devices connected, one endpoint each.
    fn full_rig() -> Rig {
        let devices = DeviceMap::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = DeviceRegistry::new();
        for name in devices.allow_list() {
            registry
                .register(
                    name.to_string(),
                    Box::new(LoggingLink {
                        device: name.to_string(),
                        log: Arc::clone(&log),
                    }),
                    vec![EndpointId("w1".to_string())],
                )
                .unwrap();
        }
        Rig {
            registry,
            devices,
            log,
        }
    }

    fn writes(rig: &Rig) -> Vec<(String, Vec<u8>)> {
        rig.log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_hot_hand_command_reaches_only_its_device() {
        let rig = full_rig();

        dispatch_frame(&rig.registry, &rig.devices, "hot-left_hand").await;

        let left = rig.devices.name_for(relay_core::Hand::Left).to_string();
        assert_eq!(writes(&rig), vec![(left, b"1".to_vec())]);
    }

    #[tokio::test]
    async fn test_non_hot_action_writes_impact_code() {
        let rig = full_rig();

        dispatch_frame(&rig.registry, &rig.devices, "impact-right_hand").await;

        let right = rig.devices.name_for(relay_core::Hand::Right).to_string();
        assert_eq!(writes(&rig), vec![(right, b"0".to_vec())]);
    }

    #[tokio::test]
    async fn test_chest_command_broadcasts_to_every_device() {
        let rig = full_rig();

        dispatch_frame(&rig.registry, &rig.devices, "vibrate-chest").await;

        let recorded = writes(&rig);
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|(_, payload)| payload == b"2"));
    }

    #[tokio::test]
    async fn test_ping_broadcasts_the_liveness_code() {
        let rig = full_rig();

        dispatch_frame(&rig.registry, &rig.devices, "ping").await;

        let recorded = writes(&rig);
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|(_, payload)| payload == b"9"));
    }

    #[tokio::test]
    async fn test_unrecognized_frame_writes_nothing() {
        let rig = full_rig();

        dispatch_frame(&rig.registry, &rig.devices, "definitely not a command").await;

        assert!(writes(&rig).is_empty());
    }

    #[tokio::test]
    async fn test_command_for_absent_device_is_dropped_silently() {
        let devices = DeviceMap::default();
        let registry = DeviceRegistry::new();

        // Must simply return; nothing to panic on, nothing to write to.
        dispatch_frame(&registry, &devices, "hot-left_hand").await;
    }

    #[tokio::test]
    async fn test_broadcast_visits_devices_in_registration_order() {
        let rig = full_rig();

        dispatch_frame(&rig.registry, &rig.devices, "ping").await;

        let order: Vec<String> = writes(&rig).into_iter().map(|(name, _)| name).collect();
        let expected: Vec<String> = rig
            .devices
            .allow_list()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(order, expected);
    }
}
