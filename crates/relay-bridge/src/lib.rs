//! relay-bridge library crate.
//!
//! The peripheral bridge sits between the broadcast hub and the physical
//! haptic devices. At startup it scans once for peripherals whose advertised
//! name is on the configured allow-list, connects to each, and keeps those
//! connections for the process lifetime. It then consumes the hub's frame
//! stream, parses each frame into a command, and writes the resolved
//! intensity code to every writable endpoint of the targeted device(s).
//!
//! # Architecture
//!
//! ```text
//! broadcast hub (WebSocket)
//!         ↕ reconnecting upstream connection
//! [relay-bridge]
//!   ├── domain/           BridgeConfig
//!   ├── application/
//!   │     peripheral      transport trait seam (discover/connect/write)
//!   │     registry        DeviceRegistry: name → connected device
//!   │     setup_devices   one-time Discovering → Connecting → Ready
//!   │     dispatch_events frame → Command → registry writes
//!   └── infrastructure/
//!         hub_conn        upstream WebSocket with backoff reconnect
//!         transport/      SimulatedTransport (platform BLE plugs in here)
//!         storage         TOML config file loading
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async).
//! - `application` depends on `domain` and `relay-core`; its only async
//!   surface is the transport trait seam.
//! - `infrastructure` depends on all other layers plus `tokio`,
//!   `tokio-tungstenite`, and `toml`.

/// Domain layer: configuration types (no I/O).
pub mod domain;

/// Application layer: registry, setup, and dispatch use cases.
pub mod application;

/// Infrastructure layer: hub connection, peripheral transport, config files.
pub mod infrastructure;
