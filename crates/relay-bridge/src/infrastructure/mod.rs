//! Infrastructure layer: hub connection, config storage, and the
//! simulated peripheral transport.

pub mod hub_conn;
pub mod storage;
pub mod transport;

pub use hub_conn::{HubConnection, HubConnectionConfig, HubEvent};
pub use storage::{load_config, ConfigError};
pub use transport::{SimulatedTransport, WriteRecord};
