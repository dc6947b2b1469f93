use indexmap::IndexMap;

use crate::{
    battle::{
        Choice,
        ChoiceRequest,
        MonHandle,
    },
    common::Id,
    effect::AppliedEffect,
};

/// One side of a battle.
///
/// Battles are singles, so each side has a single active slot.
pub struct Side {
    pub index: usize,
    pub name: String,
    pub team: Vec<MonHandle>,
    pub active: Option<MonHandle>,
    pub conditions: IndexMap<Id, AppliedEffect>,
    /// Conditions on the side's active slot, which outlast the Mon in it.
    pub slot_conditions: IndexMap<Id, AppliedEffect>,

    pub request: Option<ChoiceRequest>,
    pub choice: Option<Choice>,
}

impl Side {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            team: Vec::new(),
            active: None,
            conditions: IndexMap::new(),
            slot_conditions: IndexMap::new(),
            request: None,
            choice: None,
        }
    }

    /// The index of the opposing side.
    pub fn foe_index(&self) -> usize {
        1 - self.index
    }

    /// The Mon at the team position.
    pub fn mon_at(&self, team_position: usize) -> Option<MonHandle> {
        self.team.get(team_position).cloned()
    }

    pub fn has_condition(&self, id: &Id) -> bool {
        self.conditions.contains_key(id)
    }
}
