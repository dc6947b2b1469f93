use serde::{
    Deserialize,
    Serialize,
};

use crate::common::Id;

/// The kind of [`ChoiceRequest`] a side must answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// Order the team before the battle starts.
    Team,
    /// Act with the active Mon at the start of a turn.
    Turn,
    /// Replace a fainted active Mon.
    Switch,
}

/// One option a side may legally choose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalOption {
    /// Use the move in the move slot.
    Move { slot: usize },
    /// Switch in the Mon at the team position.
    Switch { slot: usize },
    /// Order a team of the given size.
    Team { size: usize },
}

/// Public state of a Mon, as seen by any observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonPerspective {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub status: Option<Id>,
}

/// Public state of a side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePerspective {
    pub name: String,
    pub active: Option<MonPerspective>,
    /// Mons that have not fainted.
    pub remaining: usize,
    pub conditions: Vec<Id>,
}

/// A rendering-agnostic snapshot of the public battle state.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    pub turn: u32,
    pub sides: Vec<SidePerspective>,
    pub weather: Option<Id>,
    pub terrain: Option<Id>,
    pub ended: bool,
}

/// A request for a choice that a side must make before the battle can continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    pub side: usize,
    pub kind: RequestKind,
    pub options: Vec<LegalOption>,
    pub perspective: Perspective,
}

impl ChoiceRequest {
    /// Team positions the side may switch to.
    pub fn switch_options(&self) -> impl Iterator<Item = usize> + '_ {
        self.options.iter().filter_map(|option| match option {
            LegalOption::Switch { slot } => Some(*slot),
            _ => None,
        })
    }

    /// Move slots the side may use.
    pub fn move_options(&self) -> impl Iterator<Item = usize> + '_ {
        self.options.iter().filter_map(|option| match option {
            LegalOption::Move { slot } => Some(*slot),
            _ => None,
        })
    }
}
