use serde::{
    Deserialize,
    Serialize,
};
use serde_string_enum::{
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
};

use crate::common::Id;

/// The category of a move, which decides the stats used for damage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum MoveCategory {
    #[string = "Physical"]
    Physical,
    #[string = "Special"]
    Special,
    #[string = "Status"]
    Status,
}

/// What a move targets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum MoveTarget {
    /// An opposing Mon.
    #[string = "Normal"]
    Normal,
    /// The user.
    #[string = "User"]
    User,
    /// The user's side.
    #[string = "AllySide"]
    AllySide,
    /// The opposing side.
    #[string = "FoeSide"]
    FoeSide,
    /// The whole field.
    #[string = "Field"]
    Field,
}

impl MoveTarget {
    /// Does the move target a single Mon?
    pub fn targets_mon(&self) -> bool {
        matches!(self, Self::Normal | Self::User)
    }
}

/// A chance to apply an extra effect after the move hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryEffect {
    /// Percent chance of applying.
    pub chance: u8,
    #[serde(default)]
    pub status: Option<Id>,
    #[serde(default)]
    pub volatile_status: Option<Id>,
}

/// Data about a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub category: MoveCategory,
    #[serde(default)]
    pub base_power: u32,
    /// Percent accuracy. Absent means the move cannot miss.
    #[serde(default)]
    pub accuracy: Option<u8>,
    #[serde(default)]
    pub priority: i8,
    pub pp: u8,
    pub target: MoveTarget,
    /// Status inflicted on the target when the move hits.
    #[serde(default)]
    pub status: Option<Id>,
    /// Volatile added to the target when the move hits.
    #[serde(default)]
    pub volatile_status: Option<Id>,
    /// Condition added to the targeted side.
    #[serde(default)]
    pub side_condition: Option<Id>,
    /// Weather started by the move.
    #[serde(default)]
    pub weather: Option<Id>,
    #[serde(default)]
    pub secondary: Option<SecondaryEffect>,
    /// Drags the target out and replaces it with a random healthy teammate.
    #[serde(default)]
    pub force_switch: bool,
}

impl MoveData {
    /// Data for a damaging move that always hits.
    pub fn damaging(category: MoveCategory, base_power: u32) -> Self {
        Self {
            category,
            base_power,
            accuracy: None,
            priority: 0,
            pp: 10,
            target: MoveTarget::Normal,
            status: None,
            volatile_status: None,
            side_condition: None,
            weather: None,
            secondary: None,
            force_switch: false,
        }
    }

    /// Data for a status move with the given target.
    pub fn status_move(target: MoveTarget) -> Self {
        Self {
            target,
            ..Self::damaging(MoveCategory::Status, 0)
        }
    }

    /// Does the move do anything on its own when it hits, without a Hit handler?
    pub fn has_builtin_effect(&self) -> bool {
        self.status.is_some()
            || self.volatile_status.is_some()
            || self.side_condition.is_some()
            || self.weather.is_some()
            || self.force_switch
    }
}
