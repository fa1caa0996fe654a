//! Infrastructure layer: WebSocket listener and per-peer session tasks.

pub mod ws_server;

pub use ws_server::{run_server, serve, HubServerError};
