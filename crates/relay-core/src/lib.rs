//! # relay-core
//!
//! Shared library for haptic-relay containing the relay-message grammar, the
//! normalized command model, and the body-part → device-name map.
//!
//! This crate is used by both the broadcast hub and the peripheral bridge.
//! It has zero dependencies on OS APIs, async runtimes, or network sockets.
//!
//! # System overview
//!
//! haptic-relay connects an analysis pipeline that emits sensory-feedback
//! events ("a hot impact on the right hand") to physical haptic peripherals.
//! Events travel as short text frames through a broadcast hub; the bridge
//! turns each frame into a device-targeted intensity write.
//!
//! This crate defines:
//!
//! - **`command`** – The frame grammar (`ping`, `<action>-<part>`) and its
//!   normalized result: a [`Command`] carrying a target and an intensity
//!   code. Parsing is total; frames outside the grammar become
//!   [`Command::Unrecognized`] rather than errors.
//!
//! - **`device`** – The [`DeviceMap`] that resolves a hand target to the
//!   display name a peripheral advertises, and the allow-list derived from
//!   it. This is configuration data, not protocol.

pub mod command;
pub mod device;

// Re-export the most-used types at the crate root so callers can write
// `relay_core::Command` instead of `relay_core::command::types::Command`.
pub use command::parser::parse;
pub use command::types::{intensity, Action, Command, Hand};
pub use device::{DeviceMap, DeviceMapError};
