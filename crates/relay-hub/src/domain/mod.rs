//! Domain layer: pure configuration types.

pub mod config;

pub use config::HubConfig;
