use std::{
    fmt,
    fmt::Display,
};

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    common::Id,
    effect::{
        AppliedEffect,
        EventKind,
    },
    teams::StatTable,
};

/// A handle to a [`Mon`] owned by the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonHandle(usize);

impl MonHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for MonHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stat other than HP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Atk,
    Def,
    SpA,
    SpD,
    Spe,
}

impl Stat {
    /// The event that modifies the stat.
    pub fn modify_event(&self) -> EventKind {
        match self {
            Self::Atk => EventKind::ModifyAtk,
            Self::Def => EventKind::ModifyDef,
            Self::SpA => EventKind::ModifySpA,
            Self::SpD => EventKind::ModifySpD,
            Self::Spe => EventKind::ModifySpe,
        }
    }

    /// The unmodified value of the stat in the table.
    pub fn base_value(&self, stats: &StatTable) -> u32 {
        match self {
            Self::Atk => stats.atk,
            Self::Def => stats.def,
            Self::SpA => stats.spa,
            Self::SpD => stats.spd,
            Self::Spe => stats.spe,
        }
    }
}

/// A single move slot for a Mon.
#[derive(Debug, Clone)]
pub struct MoveSlot {
    pub id: Id,
    pub name: String,
    pub pp: u8,
    pub max_pp: u8,
    pub disabled: bool,
}

/// A Mon in a battle.
pub struct Mon {
    pub name: String,
    pub side: usize,
    pub team_position: usize,
    pub level: u8,
    pub stats: StatTable,
    pub hp: u32,
    pub max_hp: u32,
    /// Speed after modifiers, recalculated before actions are ordered.
    pub speed: u32,
    pub move_slots: Vec<MoveSlot>,

    pub ability: Option<AppliedEffect>,
    pub item: Option<AppliedEffect>,
    pub status: Option<AppliedEffect>,
    pub volatiles: IndexMap<Id, AppliedEffect>,

    pub active: bool,
    pub active_turns: u32,
    pub fainted: bool,
    pub last_move: Option<Id>,
}

impl Mon {
    /// Creates a new Mon at full health.
    pub fn new(
        name: String,
        side: usize,
        team_position: usize,
        level: u8,
        stats: StatTable,
        move_slots: Vec<MoveSlot>,
    ) -> Self {
        Self {
            name,
            side,
            team_position,
            level,
            stats,
            hp: stats.hp,
            max_hp: stats.hp,
            speed: stats.spe,
            move_slots,
            ability: None,
            item: None,
            status: None,
            volatiles: IndexMap::new(),
            active: false,
            active_turns: 0,
            fainted: false,
            last_move: None,
        }
    }

    /// Is the Mon able to keep battling?
    pub fn is_alive(&self) -> bool {
        !self.fainted && self.hp > 0
    }

    /// Health in the form used by logs.
    pub fn health(&self) -> String {
        format!("{}/{}", self.hp, self.max_hp)
    }

    pub fn has_volatile(&self, id: &Id) -> bool {
        self.volatiles.contains_key(id)
    }

    /// The ID of the Mon's status, if any.
    pub fn status_id(&self) -> Option<&Id> {
        self.status.as_ref().map(|status| status.id())
    }

    /// Indices of move slots that can be selected.
    pub fn usable_move_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.move_slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.pp > 0 && !slot.disabled)
            .map(|(i, _)| i)
    }

    /// Disables every move slot holding the move, returning true if one was found.
    pub fn disable_move(&mut self, id: &Id) -> bool {
        let mut found = false;
        for slot in self.move_slots.iter_mut().filter(|slot| &slot.id == id) {
            slot.disabled = true;
            found = true;
        }
        found
    }

    /// Resets state that only exists while the Mon is active.
    pub fn clear_volatile_state(&mut self) {
        self.volatiles.clear();
        self.active_turns = 0;
        self.speed = self.stats.spe;
        for slot in &mut self.move_slots {
            slot.disabled = false;
        }
    }
}

#[cfg(test)]
mod mon_test {
    use crate::{
        battle::{
            Mon,
            MoveSlot,
        },
        common::Id,
        teams::StatTable,
    };

    fn mon() -> Mon {
        Mon::new(
            "Eevee".to_owned(),
            0,
            0,
            50,
            StatTable {
                hp: 100,
                atk: 50,
                def: 50,
                spa: 50,
                spd: 50,
                spe: 60,
            },
            vec![
                MoveSlot {
                    id: Id::from("tackle"),
                    name: "Tackle".to_owned(),
                    pp: 0,
                    max_pp: 35,
                    disabled: false,
                },
                MoveSlot {
                    id: Id::from("growl"),
                    name: "Growl".to_owned(),
                    pp: 40,
                    max_pp: 40,
                    disabled: false,
                },
            ],
        )
    }

    #[test]
    fn starts_at_full_health() {
        let mon = mon();
        assert_eq!(mon.health(), "100/100");
        assert!(mon.is_alive());
        assert_eq!(mon.speed, 60);
    }

    #[test]
    fn skips_empty_move_slots() {
        let mut mon = mon();
        assert_eq!(mon.usable_move_slots().collect::<Vec<_>>(), vec![1]);
        assert!(mon.disable_move(&Id::from("growl")));
        assert!(!mon.disable_move(&Id::from("surf")));
        assert_eq!(mon.usable_move_slots().count(), 0);
        mon.clear_volatile_state();
        assert_eq!(mon.usable_move_slots().collect::<Vec<_>>(), vec![1]);
    }
}
