//! Conditions shipped with the engine.
//!
//! These exist to exercise the event system end to end. Embedding programs add their own content
//! to a [`StaticDex`][`crate::dex::StaticDex`] alongside them.

use std::sync::Arc;

use anyhow::Result;

use crate::{
    battle::core_battle_actions,
    common::Fraction,
    effect::{
        CapabilityDescriptor,
        DispatchContext,
        EffectDefinition,
        EffectKind,
        EventKind,
        RelayValue,
    },
    log_event,
    rng::rand_util,
};

/// Logs that the Mon holding the effect cannot move, then stops the event.
fn cant_move(context: &mut DispatchContext) -> Result<Option<RelayValue>> {
    let Some(mon) = context.holder_mon() else {
        return Ok(None);
    };
    let entry = log_event!(
        "cant",
        ("mon", &context.mon(mon)?.name),
        ("reason", context.effect().id().clone())
    );
    context.battle_mut().log_entry(entry);
    Ok(Some(RelayValue::Boolean(false)))
}

fn paralysis() -> Result<Arc<EffectDefinition>> {
    EffectDefinition::builder("par", EffectKind::Status)
        .on(CapabilityDescriptor::builder(EventKind::ModifySpe)
            .fixed_default(|battle, _| {
                battle.chain_modify(Fraction::new(1, 2))?;
                Ok(None)
            })?)
        .on(CapabilityDescriptor::builder(EventKind::BeforeMove)
            .priority(1)
            .context(|context| {
                if rand_util::chance(context.battle_mut().prng_mut(), 1, 4) {
                    return cant_move(context);
                }
                Ok(None)
            })?)
        .build()
}

fn poison() -> Result<Arc<EffectDefinition>> {
    EffectDefinition::builder("psn", EffectKind::Status)
        .on(CapabilityDescriptor::builder(EventKind::Residual)
            .sub_order(9)
            .context(|context| {
                let Some(mon) = context.holder_mon() else {
                    return Ok(None);
                };
                let amount = (context.mon(mon)?.max_hp / 8).max(1);
                let effect = context.effect().clone();
                core_battle_actions::damage(context.battle_mut(), mon, amount, None, Some(effect))?;
                Ok(None)
            })?)
        .build()
}

/// Bad poison: residual damage grows by 1/16 of max HP every turn, up to 15/16.
fn toxic() -> Result<Arc<EffectDefinition>> {
    EffectDefinition::builder("tox", EffectKind::Status)
        .on(CapabilityDescriptor::builder(EventKind::Residual)
            .sub_order(9)
            .context(|context| {
                let Some(mon) = context.holder_mon() else {
                    return Ok(None);
                };
                let Some(state) = context.effect_state_mut() else {
                    return Ok(None);
                };
                let stage = (state.counter("stage") + 1).min(15);
                state.set("stage", stage);
                let amount = (context.mon(mon)?.max_hp as u64 * stage / 16).max(1) as u32;
                let effect = context.effect().clone();
                core_battle_actions::damage(context.battle_mut(), mon, amount, None, Some(effect))?;
                Ok(None)
            })?)
        .build()
}

fn flinch() -> Result<Arc<EffectDefinition>> {
    EffectDefinition::builder("flinch", EffectKind::Volatile)
        .duration(1)
        .on(CapabilityDescriptor::builder(EventKind::BeforeMove)
            .priority(8)
            .context(cant_move)?)
        .build()
}

/// Every built-in condition.
pub fn builtin_conditions() -> Result<Vec<Arc<EffectDefinition>>> {
    Ok(vec![paralysis()?, poison()?, toxic()?, flinch()?])
}

#[cfg(test)]
mod conditions_test {
    use pretty_assertions::assert_eq;

    use crate::{
        conditions::builtin_conditions,
        effect::{
            EffectKind,
            EventIdentity,
            EventKind,
        },
    };

    #[test]
    fn builds_every_condition() {
        let conditions = builtin_conditions().unwrap();
        assert_eq!(
            conditions
                .iter()
                .map(|condition| (condition.id().to_string(), condition.kind()))
                .collect::<Vec<_>>(),
            vec![
                ("par".to_owned(), EffectKind::Status),
                ("psn".to_owned(), EffectKind::Status),
                ("tox".to_owned(), EffectKind::Status),
                ("flinch".to_owned(), EffectKind::Volatile),
            ]
        );
    }

    #[test]
    fn flinch_lasts_one_turn() {
        let conditions = builtin_conditions().unwrap();
        let flinch = &conditions[3];
        assert_eq!(flinch.duration(), Some(1));
        assert!(
            flinch
                .handler(&EventIdentity::new(EventKind::BeforeMove))
                .is_some()
        );
    }
}
