//! Click behaviors layered on top of the basic interaction state machine.

use serde::{Deserialize, Serialize};

/// Capability tag of a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Button: clicks carry no state
    Plain,
    /// Checkbox: clicks flip the selection
    Toggle,
    /// Radio button: clicks select, and a selected member is locked by its group
    Exclusive,
}

/// What happens on a completed click, plus the state that behavior owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickBehavior {
    /// Button
    #[default]
    Plain,
    /// Checkbox
    Toggle {
        /// Current selection
        selection: bool,
    },
    /// Radio button
    Exclusive {
        /// Current selection
        selection: bool,
        /// Lock held by the group while this member is selected
        is_frozen: bool,
    },
}

impl ClickBehavior {
    /// Unselected checkbox
    pub const fn toggle() -> Self {
        Self::Toggle { selection: false }
    }

    /// Unselected, unlocked radio button
    pub const fn exclusive() -> Self {
        Self::Exclusive {
            selection: false,
            is_frozen: false,
        }
    }

    /// Capability tag
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Self::Plain => BehaviorKind::Plain,
            Self::Toggle { .. } => BehaviorKind::Toggle,
            Self::Exclusive { .. } => BehaviorKind::Exclusive,
        }
    }

    /// Selection, or `None` for plain buttons
    pub fn selection(&self) -> Option<bool> {
        match *self {
            Self::Plain => None,
            Self::Toggle { selection } | Self::Exclusive { selection, .. } => Some(selection),
        }
    }

    /// Whether the group lock is held
    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Exclusive { is_frozen: true, .. })
    }

    /// Overwrite the selection. Returns `false` for plain buttons
    pub(crate) fn set_selection(&mut self, value: bool) -> bool {
        match self {
            Self::Plain => false,
            Self::Toggle { selection } | Self::Exclusive { selection, .. } => {
                *selection = value;
                true
            }
        }
    }

    /// Overwrite the group lock. Returns `false` unless exclusive
    pub(crate) fn set_frozen(&mut self, value: bool) -> bool {
        match self {
            Self::Exclusive { is_frozen, .. } => {
                *is_frozen = value;
                true
            }
            _ => false,
        }
    }

    /// Click hook. Returns the new selection when the click changed it
    pub(crate) fn on_click(&mut self) -> Option<bool> {
        match self {
            Self::Plain => None,
            Self::Toggle { selection } | Self::Exclusive { selection, .. } => {
                *selection = !*selection;
                Some(*selection)
            }
        }
    }
}
