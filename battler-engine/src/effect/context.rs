use std::sync::Arc;

use anyhow::Result;

use crate::{
    battle::{
        CoreBattle,
        Mon,
        MonHandle,
        Side,
    },
    common::Fraction,
    effect::{
        EffectDefinition,
        EffectOrigin,
        EffectState,
        EventIdentity,
        RelayValue,
    },
    error::WrapOptionError,
};

/// What an event is fired on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Mon(MonHandle),
    Side(usize),
    Field,
    Battle,
}

impl EventTarget {
    pub fn mon(&self) -> Option<MonHandle> {
        match self {
            Self::Mon(mon) => Some(*mon),
            _ => None,
        }
    }
}

/// The state passed to a context handler.
///
/// A context lives for exactly one handler call. Optional pieces, such as the source Mon, are
/// resolved when a handler asks for them.
pub struct DispatchContext<'b> {
    battle: &'b mut CoreBattle,
    identity: EventIdentity,
    effect: Arc<EffectDefinition>,
    origin: EffectOrigin,
    target: EventTarget,
    source: Option<MonHandle>,
    source_effect: Option<Arc<EffectDefinition>>,
    relay: RelayValue,
}

impl<'b> DispatchContext<'b> {
    pub(crate) fn new(
        battle: &'b mut CoreBattle,
        identity: EventIdentity,
        effect: Arc<EffectDefinition>,
        origin: EffectOrigin,
        target: EventTarget,
        source: Option<MonHandle>,
        source_effect: Option<Arc<EffectDefinition>>,
        relay: RelayValue,
    ) -> Self {
        Self {
            battle,
            identity,
            effect,
            origin,
            target,
            source,
            source_effect,
            relay,
        }
    }

    pub fn battle(&self) -> &CoreBattle {
        self.battle
    }

    pub fn battle_mut(&mut self) -> &mut CoreBattle {
        self.battle
    }

    /// The event being handled.
    pub fn identity(&self) -> EventIdentity {
        self.identity
    }

    /// The effect whose handler is running.
    pub fn effect(&self) -> &Arc<EffectDefinition> {
        &self.effect
    }

    /// Where the running effect lives.
    pub fn origin(&self) -> &EffectOrigin {
        &self.origin
    }

    pub fn target(&self) -> EventTarget {
        self.target
    }

    /// The relay value at the time the handler was called.
    pub fn relay(&self) -> &RelayValue {
        &self.relay
    }

    pub fn source_effect(&self) -> Option<&Arc<EffectDefinition>> {
        self.source_effect.as_ref()
    }

    pub fn target_mon(&self) -> Option<MonHandle> {
        self.target.mon()
    }

    pub fn source_mon(&self) -> Option<MonHandle> {
        self.source
    }

    /// The target Mon, or the source Mon when the event has no target Mon.
    pub fn target_or_source_mon(&self) -> Option<MonHandle> {
        match self.target_mon() {
            Some(mon) => Some(mon),
            None => {
                if self.source.is_some() {
                    log::debug!("{} handler uses source in place of target", self.identity);
                }
                self.source
            }
        }
    }

    /// The source Mon, or the target Mon when the event has no source Mon.
    pub fn source_or_target_mon(&self) -> Option<MonHandle> {
        match self.source {
            Some(mon) => Some(mon),
            None => {
                let target = self.target_mon();
                if target.is_some() {
                    log::debug!("{} handler uses target in place of source", self.identity);
                }
                target
            }
        }
    }

    /// The Mon holding the running effect, if the effect is bound to one.
    pub fn holder_mon(&self) -> Option<MonHandle> {
        self.origin.mon()
    }

    /// The side targeted by the event, or the side of the target Mon.
    pub fn target_side(&self) -> Option<usize> {
        match self.target {
            EventTarget::Side(side) => Some(side),
            EventTarget::Mon(mon) => self.battle.mon(mon).ok().map(|mon| mon.side),
            _ => None,
        }
    }

    pub fn mon(&self, mon: MonHandle) -> Result<&Mon> {
        self.battle.mon(mon)
    }

    pub fn mon_mut(&mut self, mon: MonHandle) -> Result<&mut Mon> {
        self.battle.mon_mut(mon)
    }

    /// The target Mon, failing when the event has none.
    pub fn expect_target_mon(&self) -> Result<&Mon> {
        let mon = self
            .target_mon()
            .wrap_expectation_with_format(format_args!("{} has no target mon", self.identity))?;
        self.battle.mon(mon)
    }

    pub fn side(&self, side: usize) -> Result<&Side> {
        self.battle.side(side)
    }

    /// State of the running effect.
    ///
    /// Effects that were never applied to a holder, such as a move's own handlers, have no state.
    pub fn effect_state(&self) -> Option<&EffectState> {
        self.battle
            .applied_effect(&self.origin)
            .map(|applied| &applied.state)
    }

    pub fn effect_state_mut(&mut self) -> Option<&mut EffectState> {
        self.battle
            .applied_effect_mut(&self.origin)
            .map(|applied| &mut applied.state)
    }

    /// Chains a multiplier onto the running event.
    pub fn chain_modify(&mut self, fraction: Fraction) -> Result<()> {
        self.battle.chain_modify(fraction)
    }
}
