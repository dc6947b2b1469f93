use std::sync::Arc;

use anyhow::Result;
use battler_engine::{
    battle::core_battle_actions,
    common::{
        Fraction,
        Id,
    },
    dex::{
        MoveCategory,
        MoveData,
        MoveTarget,
        SecondaryEffect,
        StaticDex,
    },
    effect::{
        CapabilityDescriptor,
        EffectDefinition,
        EffectKind,
        EventIdentity,
        EventKind,
        EventPrefix,
        EventSuffix,
        RelayValue,
    },
    log_event,
};

/// A damaging move whose own ModifyDamage handler always deals the same damage.
fn fixed_damage_move(name: &str, damage: i64, data: MoveData) -> Result<Arc<EffectDefinition>> {
    EffectDefinition::builder(name, EffectKind::Move)
        .move_data(data)
        .on(CapabilityDescriptor::builder(EventKind::ModifyDamage)
            .context(move |_| Ok(Some(RelayValue::Integer(damage))))?)
        .build()
}

fn moves() -> Result<Vec<Arc<EffectDefinition>>> {
    let physical = || MoveData {
        pp: 35,
        ..MoveData::damaging(MoveCategory::Physical, 40)
    };
    Ok(vec![
        EffectDefinition::builder("Tackle", EffectKind::Move)
            .move_data(MoveData {
                accuracy: Some(100),
                ..physical()
            })
            .build()?,
        fixed_damage_move("Fixed Hit", 20, physical())?,
        fixed_damage_move("Heavy Hit", 60, physical())?,
        fixed_damage_move(
            "Quick Strike",
            10,
            MoveData {
                priority: 1,
                ..physical()
            },
        )?,
        fixed_damage_move(
            "Flinch Hit",
            10,
            MoveData {
                priority: 3,
                secondary: Some(SecondaryEffect {
                    chance: 100,
                    status: None,
                    volatile_status: Some(Id::from("flinch")),
                }),
                ..physical()
            },
        )?,
        EffectDefinition::builder("Thunder Wave", EffectKind::Move)
            .move_data(MoveData {
                status: Some(Id::from("par")),
                ..MoveData::status_move(MoveTarget::Normal)
            })
            .build()?,
        EffectDefinition::builder("Poison Gas", EffectKind::Move)
            .move_data(MoveData {
                status: Some(Id::from("psn")),
                ..MoveData::status_move(MoveTarget::Normal)
            })
            .build()?,
        EffectDefinition::builder("Toxic", EffectKind::Move)
            .move_data(MoveData {
                status: Some(Id::from("tox")),
                ..MoveData::status_move(MoveTarget::Normal)
            })
            .build()?,
        EffectDefinition::builder("Roar", EffectKind::Move)
            .move_data(MoveData {
                priority: -6,
                force_switch: true,
                ..MoveData::status_move(MoveTarget::Normal)
            })
            .build()?,
        EffectDefinition::builder("Guard Up", EffectKind::Move)
            .move_data(MoveData {
                side_condition: Some(Id::from("guard")),
                ..MoveData::status_move(MoveTarget::AllySide)
            })
            .build()?,
        EffectDefinition::builder("Sand Whirl", EffectKind::Move)
            .move_data(MoveData {
                weather: Some(Id::from("sandstorm")),
                ..MoveData::status_move(MoveTarget::Field)
            })
            .build()?,
        EffectDefinition::builder("Splash", EffectKind::Move)
            .move_data(MoveData::status_move(MoveTarget::User))
            .on(CapabilityDescriptor::builder(EventKind::Hit).context(|context| {
                context
                    .battle_mut()
                    .log_entry(log_event!("activate", ("move", "Splash")));
                Ok(None)
            })?)
            .build()?,
        EffectDefinition::builder("Mark Slot", EffectKind::Move)
            .move_data(MoveData::status_move(MoveTarget::User))
            .on(CapabilityDescriptor::builder(EventKind::Hit).context(|context| {
                let Some(user) = context.source_mon() else {
                    return Ok(None);
                };
                let side = context.mon(user)?.side;
                let effect = context.effect().clone();
                let added = core_battle_actions::add_slot_condition(
                    context.battle_mut(),
                    side,
                    &Id::from("mark"),
                    Some(user),
                    Some(effect),
                )?;
                Ok(Some(RelayValue::Boolean(added)))
            })?)
            .build()?,
        // A status move that does nothing and has no Hit handler.
        EffectDefinition::builder("Broken Move", EffectKind::Move)
            .move_data(MoveData::status_move(MoveTarget::Normal))
            .build()?,
    ])
}

fn conditions() -> Result<Vec<Arc<EffectDefinition>>> {
    Ok(vec![
        EffectDefinition::builder("Guard", EffectKind::SideCondition)
            .duration(3)
            .on(CapabilityDescriptor::builder(EventKind::ModifyDamage)
                .fixed_default(|battle, _| {
                    battle.chain_modify(Fraction::new(1, 2))?;
                    Ok(None)
                })?)
            .build()?,
        EffectDefinition::builder("Mark", EffectKind::SlotCondition)
            .duration(2)
            .build()?,
        EffectDefinition::builder("Sandstorm", EffectKind::Weather)
            .duration(2)
            .on(CapabilityDescriptor::builder(
                EventIdentity::new(EventKind::Residual).with_suffix(EventSuffix::Field),
            )
            .context(|context| {
                let effect = context.effect().clone();
                let battle = context.battle_mut();
                for mon in battle.healthy_active_mon_handles().collect::<Vec<_>>() {
                    let amount = (battle.mon(mon)?.max_hp / 16).max(1);
                    core_battle_actions::damage(battle, mon, amount, None, Some(effect.clone()))?;
                }
                Ok(None)
            })?)
            .build()?,
    ])
}

/// An ability that makes its holder immune to one condition.
fn immunity_ability(name: &str, condition: &'static str) -> Result<Arc<EffectDefinition>> {
    EffectDefinition::builder(name, EffectKind::Ability)
        .on(CapabilityDescriptor::builder(EventKind::Immunity)
            .nullability([false, false, true, true])
            .fixed_default(move |_, arguments| match arguments.relay(0)? {
                RelayValue::Effect(id) if id.as_ref() == condition => {
                    Ok(Some(RelayValue::Boolean(false)))
                }
                _ => Ok(None),
            })?)
        .build()
}

fn abilities_and_items() -> Result<Vec<Arc<EffectDefinition>>> {
    Ok(vec![
        immunity_ability("Immunity", "psn")?,
        immunity_ability("Inner Focus", "flinch")?,
        EffectDefinition::builder("Shadow Tag", EffectKind::Ability)
            .on(CapabilityDescriptor::builder(
                EventIdentity::new(EventKind::TrapMon).with_prefix(EventPrefix::Foe),
            )
            .context(|_| Ok(Some(RelayValue::Boolean(true))))?)
            .build()?,
        // Foes cannot select Splash.
        EffectDefinition::builder("Imprison Aura", EffectKind::Ability)
            .on(CapabilityDescriptor::builder(
                EventIdentity::new(EventKind::DisableMove).with_prefix(EventPrefix::Foe),
            )
            .fixed_default(|battle, arguments| {
                battle
                    .mon_mut(arguments.mon(0)?)?
                    .disable_move(&Id::from("splash"));
                Ok(None)
            })?)
            .build()?,
        EffectDefinition::builder("Quick Feet", EffectKind::Ability)
            .on(CapabilityDescriptor::builder(EventKind::ModifySpe)
                .fixed_default(|battle, _| {
                    battle.chain_modify(Fraction::new(2, 1))?;
                    Ok(None)
                })?)
            .build()?,
        EffectDefinition::builder("Leftovers", EffectKind::Item)
            .on(CapabilityDescriptor::builder(EventKind::Residual)
                .sub_order(5)
                .context(|context| {
                    let Some(mon) = context.holder_mon() else {
                        return Ok(None);
                    };
                    let amount = (context.mon(mon)?.max_hp / 16).max(1);
                    let effect = context.effect().clone();
                    core_battle_actions::heal(context.battle_mut(), mon, amount, None, Some(effect))?;
                    Ok(None)
                })?)
            .build()?,
    ])
}

/// A dex with the built-in conditions and a small set of content for tests.
///
/// Damaging moves other than Tackle deal fixed damage and never miss, so battle logs do not depend
/// on random rolls.
pub fn test_dex() -> Result<Arc<StaticDex>> {
    test_dex_with(Vec::new())
}

/// [`test_dex`] with additional effects, for tests that need content of their own.
pub fn test_dex_with(effects: Vec<Arc<EffectDefinition>>) -> Result<Arc<StaticDex>> {
    let mut dex = StaticDex::with_builtins()?;
    dex.extend(moves()?)?;
    dex.extend(conditions()?)?;
    dex.extend(abilities_and_items()?)?;
    dex.extend(effects)?;
    Ok(Arc::new(dex))
}
