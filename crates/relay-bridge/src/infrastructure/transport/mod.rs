//! Peripheral transport backends.
//!
//! Only the simulated backend lives in-tree; a production deployment plugs
//! a platform BLE stack in behind the same traits.

pub mod simulated;

pub use simulated::{SimulatedPeripheral, SimulatedTransport, WriteRecord};
