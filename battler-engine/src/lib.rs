//! # battler-engine
//!
//! The effect dispatch and action scheduling core of a turn-based Pokémon battle.
//!
//! Content (moves, abilities, items and conditions) is defined as
//! [`EffectDefinition`][`crate::effect::EffectDefinition`]s whose handlers hook into battle
//! events. A [`CoreBattle`][`crate::battle::CoreBattle`], created with a
//! [`BattleBuilder`][`crate::battle::BattleBuilder`], runs the turn loop: it collects choices,
//! orders the resulting actions and dispatches every event to the handlers in scope.

extern crate alloc;

pub mod battle;
pub mod common;
pub mod conditions;
pub mod dex;
pub mod effect;
pub mod error;
pub mod log;
pub mod rng;
pub mod teams;
