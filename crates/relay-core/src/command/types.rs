//! Typed command model: actions, hand targets, intensity codes.
//!
//! The upstream pipeline has a richer action vocabulary (hot / cold / impact
//! / vibrate) than the peripheral firmware can express. The firmware only
//! distinguishes on/off-style intensity levels, so every non-`hot` action
//! collapses to the impact code for hand targets; the mapping lives in
//! [`crate::command::parser`].

use serde::{Deserialize, Serialize};

/// Intensity codes written to peripheral endpoints, interpreted by device
/// firmware as feedback levels. Written on the wire as their ASCII decimal
/// representation (`b"0"`, `b"1"`, ...).
pub mod intensity {
    /// Generic impact / any non-hot hand action.
    pub const IMPACT: u8 = 0;
    /// Hot contact on a hand.
    pub const HOT: u8 = 1;
    /// Chest impact; broadcast to every device.
    pub const CHEST: u8 = 2;
    /// Liveness/test sentinel carried by the `ping` frame, broadcast to
    /// every device. Distinct from all real feedback codes.
    pub const PING: u8 = 9;
}

/// The upstream action vocabulary.
///
/// Unknown action tokens parse to `None` and are treated like any other
/// non-hot action (impact intensity) for hand targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Hot,
    Cold,
    Impact,
    Vibrate,
}

impl Action {
    /// Parses an action token. Case-sensitive; unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "hot" => Some(Action::Hot),
            "cold" => Some(Action::Cold),
            "impact" => Some(Action::Impact),
            "vibrate" => Some(Action::Vibrate),
            _ => None,
        }
    }
}

/// A hand target for a [`Command::Targeted`] command.
///
/// The chest is not representable here: a chest event is a broadcast to
/// every device, never a single-device target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    Right,
}

/// The normalized result of parsing one relay frame.
///
/// Ephemeral: constructed per frame, consumed immediately, never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Write `intensity` to every registered device.
    Broadcast { intensity: u8 },
    /// Write `intensity` to the device mapped to `hand`, if connected.
    Targeted { hand: Hand, intensity: u8 },
    /// The frame did not match the grammar. Dropped silently downstream:
    /// malformed or not-yet-supported event types are expected traffic.
    Unrecognized,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
