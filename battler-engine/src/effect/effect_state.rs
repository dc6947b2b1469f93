use std::{
    fmt,
    sync::Arc,
};

use serde_json::Value;

use crate::{
    battle::MonHandle,
    common::{
        FastHashMap,
        Id,
    },
    effect::EffectDefinition,
};

/// Mutable state of an effect applied to some holder.
#[derive(Debug, Clone, Default)]
pub struct EffectState {
    effect_order: u32,
    duration: Option<u8>,
    source: Option<MonHandle>,
    source_effect: Option<Id>,
    data: FastHashMap<String, Value>,
}

impl EffectState {
    /// Creates state for an effect applied as the `effect_order`-th effect of the battle.
    pub fn new(effect_order: u32) -> Self {
        Self {
            effect_order,
            ..Default::default()
        }
    }

    /// The order the effect was applied in, relative to every other effect in the battle.
    pub fn effect_order(&self) -> u32 {
        self.effect_order
    }

    /// Remaining turns, if the effect is limited.
    pub fn duration(&self) -> Option<u8> {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Option<u8>) {
        self.duration = duration;
    }

    /// Counts one turn down, returning true when the effect has run out.
    pub fn tick_duration(&mut self) -> bool {
        match &mut self.duration {
            Some(duration) => {
                *duration = duration.saturating_sub(1);
                *duration == 0
            }
            None => false,
        }
    }

    /// The Mon that applied the effect.
    pub fn source(&self) -> Option<MonHandle> {
        self.source
    }

    pub fn set_source(&mut self, source: Option<MonHandle>) {
        self.source = source;
    }

    /// The effect that applied the effect, such as the move that inflicted a status.
    pub fn source_effect(&self) -> Option<&Id> {
        self.source_effect.as_ref()
    }

    pub fn set_source_effect(&mut self, source_effect: Option<Id>) {
        self.source_effect = source_effect;
    }

    /// Custom data stored by the effect's handlers.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn set<V>(&mut self, key: &str, value: V)
    where
        V: Into<Value>,
    {
        self.data.insert(key.to_owned(), value.into());
    }

    /// Reads a counter from custom data, treating a missing entry as zero.
    pub fn counter(&self, key: &str) -> u64 {
        self.get(key).and_then(|value| value.as_u64()).unwrap_or(0)
    }
}

/// An effect attached to a holder, together with its state.
#[derive(Clone)]
pub struct AppliedEffect {
    pub effect: Arc<EffectDefinition>,
    pub state: EffectState,
}

impl AppliedEffect {
    pub fn new(effect: Arc<EffectDefinition>, state: EffectState) -> Self {
        Self { effect, state }
    }

    pub fn id(&self) -> &Id {
        self.effect.id()
    }
}

impl fmt::Debug for AppliedEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppliedEffect")
            .field("effect", self.effect.id())
            .field("state", &self.state)
            .finish()
    }
}

/// Where an applied effect lives in the battle.
///
/// Used to find the effect's state again after the handler list is built, since handlers may
/// remove or replace effects while an event is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOrigin {
    MonAbility(MonHandle),
    MonItem(MonHandle),
    MonStatus(MonHandle),
    MonVolatile(MonHandle, Id),
    SideCondition(usize, Id),
    SlotCondition(usize, Id),
    Weather,
    Terrain,
    PseudoWeather(Id),
    Rule(Id),
    /// The effect that triggered the event, which has no persistent state.
    SourceEffect,
}

impl EffectOrigin {
    /// The Mon holding the effect, if the effect is bound to one.
    pub fn mon(&self) -> Option<MonHandle> {
        match self {
            Self::MonAbility(mon)
            | Self::MonItem(mon)
            | Self::MonStatus(mon)
            | Self::MonVolatile(mon, _) => Some(*mon),
            _ => None,
        }
    }

    /// The side holding the effect, if the effect is bound to one.
    pub fn side(&self) -> Option<usize> {
        match self {
            Self::SideCondition(side, _) | Self::SlotCondition(side, _) => Some(*side),
            _ => None,
        }
    }
}
