//! Application layer: use cases and the peripheral transport seam.

pub mod dispatch_events;
pub mod peripheral;
pub mod registry;
pub mod setup_devices;

pub use dispatch_events::dispatch_frame;
pub use peripheral::{
    AdvertisedDevice, Endpoint, EndpointId, PeripheralLink, PeripheralTransport, TransportError,
};
pub use registry::{Device, DeviceRegistry, RegistryError};
pub use setup_devices::discover_and_connect;
