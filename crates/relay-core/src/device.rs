//! Body-part → device-name mapping and the known-device allow-list.
//!
//! Peripherals are identified by the display name they advertise during a
//! scan. Which advertised name serves which hand is deployment configuration,
//! not protocol, so [`DeviceMap`] is a plain serde-deserializable struct that
//! the bridge loads from its TOML config file (or defaults).
//!
//! The defaults mirror the production rig: the left hand is served by the
//! vest unit and the right hand by the hands unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::types::Hand;

/// Error type for device-map validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceMapError {
    /// Both hands resolve to the same advertised name. A device name may
    /// appear at most once in the registry, so this map could never register
    /// both targets.
    #[error("device name '{0}' is mapped to both hands")]
    DuplicateName(String),
}

/// Resolves a hand target to the display name its peripheral advertises.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceMap {
    /// Advertised name of the device serving the left hand.
    #[serde(default = "default_left_hand")]
    pub left_hand: String,
    /// Advertised name of the device serving the right hand.
    #[serde(default = "default_right_hand")]
    pub right_hand: String,
}

fn default_left_hand() -> String {
    "Haptic Definition: Vest".to_string()
}

fn default_right_hand() -> String {
    "Haptic Definition: Hands".to_string()
}

impl Default for DeviceMap {
    fn default() -> Self {
        Self {
            left_hand: default_left_hand(),
            right_hand: default_right_hand(),
        }
    }
}

impl DeviceMap {
    /// Returns the advertised name for `hand`.
    pub fn name_for(&self, hand: Hand) -> &str {
        match hand {
            Hand::Left => &self.left_hand,
            Hand::Right => &self.right_hand,
        }
    }

    /// The known-device allow-list: every advertised name the bridge should
    /// connect to during its one-time scan.
    pub fn allow_list(&self) -> [&str; 2] {
        [&self.left_hand, &self.right_hand]
    }

    /// Returns whether `advertised` is on the allow-list.
    pub fn is_known(&self, advertised: &str) -> bool {
        self.allow_list().contains(&advertised)
    }

    /// Validates the map invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceMapError::DuplicateName`] when both hands share one
    /// advertised name.
    pub fn validate(&self) -> Result<(), DeviceMapError> {
        if self.left_hand == self.right_hand {
            return Err(DeviceMapError::DuplicateName(self.left_hand.clone()));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map_matches_production_rig() {
        let map = DeviceMap::default();
        assert_eq!(map.name_for(Hand::Left), "Haptic Definition: Vest");
        assert_eq!(map.name_for(Hand::Right), "Haptic Definition: Hands");
    }

    #[test]
    fn test_allow_list_contains_both_names() {
        let map = DeviceMap::default();
        let list = map.allow_list();
        assert!(list.contains(&"Haptic Definition: Vest"));
        assert!(list.contains(&"Haptic Definition: Hands"));
    }

    #[test]
    fn test_is_known_accepts_listed_and_rejects_unlisted() {
        let map = DeviceMap::default();
        assert!(map.is_known("Haptic Definition: Vest"));
        assert!(!map.is_known("Some Other Gadget"));
    }

    #[test]
    fn test_validate_accepts_distinct_names() {
        assert_eq!(DeviceMap::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_shared_name() {
        let map = DeviceMap {
            left_hand: "Unit A".to_string(),
            right_hand: "Unit A".to_string(),
        };
        assert_eq!(
            map.validate(),
            Err(DeviceMapError::DuplicateName("Unit A".to_string()))
        );
    }

    #[test]
    fn test_custom_map_resolves_per_hand() {
        let map = DeviceMap {
            left_hand: "Left Glove".to_string(),
            right_hand: "Right Glove".to_string(),
        };
        assert_eq!(map.name_for(Hand::Left), "Left Glove");
        assert_eq!(map.name_for(Hand::Right), "Right Glove");
    }
}
