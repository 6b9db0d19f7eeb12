//! Interaction states and the material slots they map to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual state of an interactive object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickableState {
    /// Not interacted with
    #[default]
    Normal,
    /// Pointer is hovering
    Over,
    /// Pointer is pressed on the object
    Down,
    /// Interaction is switched off
    Disable,
}

impl ClickableState {
    /// Parse a state key (`"normal"`, `"over"`, `"down"`, `"disable"`)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "normal" => Some(Self::Normal),
            "over" => Some(Self::Over),
            "down" => Some(Self::Down),
            "disable" => Some(Self::Disable),
            _ => None,
        }
    }

    /// Key of this state
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Over => "over",
            Self::Down => "down",
            Self::Disable => "disable",
        }
    }
}

impl fmt::Display for ClickableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// One of the seven slots of a material state set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialSlot {
    /// Unselected, idle. Mandatory
    Normal,
    /// Unselected, hovered
    Over,
    /// Unselected, pressed
    Down,
    /// Interaction disabled, regardless of selection
    Disable,
    /// Selected, idle
    NormalSelect,
    /// Selected, hovered
    OverSelect,
    /// Selected, pressed
    DownSelect,
}

impl MaterialSlot {
    /// Every slot, `Normal` first
    pub const ALL: [MaterialSlot; 7] = [
        Self::Normal,
        Self::Over,
        Self::Down,
        Self::Disable,
        Self::NormalSelect,
        Self::OverSelect,
        Self::DownSelect,
    ];

    /// Slot used for `state` when interaction is enabled.
    ///
    /// `Disable` has no enabled slot and resolves to `Normal`.
    pub fn for_state(state: ClickableState, selected: bool) -> Self {
        match (state, selected) {
            (ClickableState::Normal, false) => Self::Normal,
            (ClickableState::Over, false) => Self::Over,
            (ClickableState::Down, false) => Self::Down,
            (ClickableState::Normal, true) => Self::NormalSelect,
            (ClickableState::Over, true) => Self::OverSelect,
            (ClickableState::Down, true) => Self::DownSelect,
            (ClickableState::Disable, _) => Self::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for state in [
            ClickableState::Normal,
            ClickableState::Over,
            ClickableState::Down,
            ClickableState::Disable,
        ] {
            assert_eq!(ClickableState::from_key(state.as_key()), Some(state));
        }
        assert_eq!(ClickableState::from_key("hover"), None);
    }

    #[test]
    fn selection_picks_select_slots() {
        assert_eq!(
            MaterialSlot::for_state(ClickableState::Over, true),
            MaterialSlot::OverSelect
        );
        assert_eq!(
            MaterialSlot::for_state(ClickableState::Down, false),
            MaterialSlot::Down
        );
    }

    #[test]
    fn disable_without_precedence_falls_back_to_normal() {
        assert_eq!(
            MaterialSlot::for_state(ClickableState::Disable, true),
            MaterialSlot::Normal
        );
    }
}
