//! relay-hub library crate.
//!
//! The broadcast hub accepts persistent WebSocket connections from any number
//! of peers and forwards every received text frame verbatim to every peer in
//! its client table — including back to the sender. Producers (the analysis
//! pipeline) and consumers (the peripheral bridge) attach over the same
//! connection primitive; the hub does not interpret frames.
//!
//! # Architecture
//!
//! ```text
//! producer ──┐                        ┌── consumer (peripheral bridge)
//! producer ──┤   [relay-hub]          ├── consumer
//!            └──► accept loop         │
//!                 per-peer session ───┘
//!                 ClientTable (fan-out)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async).
//! - `application` depends on `domain` and tokio's sync primitives only.
//! - `infrastructure` depends on all other layers plus `tokio` and
//!   `tokio-tungstenite`.

/// Domain layer: configuration types (no I/O).
pub mod domain;

/// Application layer: the client table and fan-out logic.
pub mod application;

/// Infrastructure layer: WebSocket accept loop and per-peer sessions.
pub mod infrastructure;
