//! Total parser for relay frames.
//!
//! Grammar (exact, case-sensitive):
//!
//! ```text
//! frame      = "ping" | action "-" part
//! part       = "chest" | "left_hand" | "right_hand"
//! action     = any token; only "hot" changes the resulting intensity
//! ```
//!
//! - `ping` → broadcast with the sentinel intensity (liveness/test signal).
//! - `<action>-chest` → broadcast with the chest code regardless of action:
//!   every device receives the chest signal.
//! - `<action>-left_hand` / `<action>-right_hand` → targeted; intensity is
//!   [`intensity::HOT`] iff the action is `hot`, otherwise
//!   [`intensity::IMPACT`].
//! - Everything else (wrong token count, unknown part, empty string) →
//!   [`Command::Unrecognized`].
//!
//! Parsing never fails: `Unrecognized` is a variant, not an error, because
//! malformed or not-yet-supported event types are expected relay traffic.

use crate::command::types::{intensity, Action, Command, Hand};

/// Token carried by the liveness/test frame.
const PING_TOKEN: &str = "ping";

/// Parses one relay frame into a [`Command`].
pub fn parse(raw: &str) -> Command {
    if raw == PING_TOKEN {
        return Command::Broadcast {
            intensity: intensity::PING,
        };
    }

    // Exactly one '-' separator; any other token count is unrecognized.
    let mut tokens = raw.split('-');
    let (action_token, part_token) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(action), Some(part), None) => (action, part),
        _ => return Command::Unrecognized,
    };

    let action = Action::from_token(action_token);

    match part_token {
        "chest" => Command::Broadcast {
            intensity: intensity::CHEST,
        },
        "left_hand" => Command::Targeted {
            hand: Hand::Left,
            intensity: hand_intensity(action),
        },
        "right_hand" => Command::Targeted {
            hand: Hand::Right,
            intensity: hand_intensity(action),
        },
        _ => Command::Unrecognized,
    }
}

/// Total action → intensity mapping for hand targets.
///
/// Every action except `hot` (including `cold`, `vibrate`, and tokens
/// outside the known vocabulary) maps to the impact code: the firmware only
/// distinguishes two levels on hand targets.
fn hand_intensity(action: Option<Action>) -> u8 {
    match action {
        Some(Action::Hot) => intensity::HOT,
        Some(Action::Cold) | Some(Action::Impact) | Some(Action::Vibrate) | None => {
            intensity::IMPACT
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
