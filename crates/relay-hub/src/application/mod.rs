//! Application layer: client registry and fan-out.

pub mod client_table;

pub use client_table::{ClientId, ClientTable};
