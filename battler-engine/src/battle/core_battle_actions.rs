use std::sync::Arc;

use anyhow::Result;

use crate::{
    battle::{
        Action,
        ActionChoice,
        CoreBattle,
        EventTrigger,
        MonHandle,
        PokemonAction,
        Stat,
        SwitchAction,
        core_battle_effects,
    },
    common::Id,
    dex::{
        MoveCategory,
        MoveData,
        MoveTarget,
    },
    effect::{
        AppliedEffect,
        EffectDefinition,
        EffectOrigin,
        EffectState,
        EventIdentity,
        EventKind,
        RelayValue,
    },
    error::{
        WrapOptionError,
        general_error,
    },
    log_event,
    rng::rand_util,
};

fn mon_name(battle: &CoreBattle, mon: MonHandle) -> Result<String> {
    Ok(battle.mon(mon)?.name.clone())
}

fn new_effect_state(
    battle: &mut CoreBattle,
    effect: &EffectDefinition,
    source: Option<MonHandle>,
    source_effect: Option<&Arc<EffectDefinition>>,
) -> EffectState {
    let mut state = EffectState::new(battle.next_effect_order());
    state.set_duration(effect.duration());
    state.set_source(source);
    state.set_source_effect(source_effect.map(|effect| effect.id().clone()));
    state
}

/// The priority of a move used by a Mon.
///
/// The move's own ModifyPriority handler runs first, followed by every other handler in scope.
pub fn move_priority(battle: &mut CoreBattle, mon: MonHandle, move_id: &Id) -> Result<i32> {
    let effect = battle.lookup_effect(move_id)?;
    let priority = effect
        .move_data()
        .wrap_expectation_with_format(format_args!("{move_id} is not a move"))?
        .priority as i64;
    let priority = core_battle_effects::run_single_event(
        battle,
        EventIdentity::new(EventKind::ModifyPriority),
        &effect,
        EffectOrigin::SourceEffect,
        EventTrigger::mon(mon)
            .with_source(Some(mon))
            .with_source_effect(Some(effect.clone()))
            .with_relay(priority),
    )?
    .integer()
    .unwrap_or(priority);
    let priority = core_battle_effects::run_event(
        battle,
        EventKind::ModifyPriority,
        EventTrigger::mon(mon)
            .with_source(Some(mon))
            .with_source_effect(Some(effect))
            .with_relay(priority),
    )?
    .integer()
    .unwrap_or(priority);
    Ok(priority.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Switches a Mon into its side's active slot.
///
/// A dragged Mon runs its SwitchIn handlers immediately. Otherwise, SwitchIn runs from a queued
/// action so that every Mon switching in at the same time is ordered by speed.
pub fn switch_in(battle: &mut CoreBattle, side: usize, mon: MonHandle, drag: bool) -> Result<()> {
    if battle.mon(mon)?.active {
        log::debug!("{} is already active", mon_name(battle, mon)?);
        return Ok(());
    }

    if let Some(previous) = battle.side(side)?.active {
        if battle.mon(previous)?.is_alive() {
            core_battle_effects::run_event(
                battle,
                EventKind::BeforeSwitchOut,
                EventTrigger::mon(previous).with_relay(RelayValue::Void),
            )?;
            core_battle_effects::run_event(
                battle,
                EventKind::SwitchOut,
                EventTrigger::mon(previous).with_relay(RelayValue::Void),
            )?;
        }
        for id in battle.mon(previous)?.volatiles.keys().cloned().collect::<Vec<_>>() {
            end_effect(battle, &EffectOrigin::MonVolatile(previous, id))?;
        }
        let previous_mon = battle.mon_mut(previous)?;
        previous_mon.active = false;
        previous_mon.clear_volatile_state();
        battle.queue.cancel_action(previous);
    }

    let context = battle.mon_mut(mon)?;
    context.active = true;
    context.active_turns = 0;
    let entry = log_event!(
        if drag { "drag" } else { "switch" },
        ("mon", &context.name),
        ("health", context.health()),
        ("side", side)
    );
    battle.side_mut(side)?.active = Some(mon);
    battle.log_entry(entry);

    if drag {
        run_switch(battle, mon)
    } else {
        let speed = battle.mon(mon)?.speed;
        battle.queue.insert_action_into_sorted_position(
            Action::from(PokemonAction::new(ActionChoice::RunSwitch, mon)?).with_speed(speed),
        );
        Ok(())
    }
}

/// Switches a Mon in by choice or by a forced switch.
pub fn switch(battle: &mut CoreBattle, side: usize, mon: MonHandle, drag: bool) -> Result<()> {
    let context = battle.mon(mon)?;
    if context.side != side {
        return Err(general_error(format!(
            "{} cannot switch in for side {side}",
            context.name
        )));
    }
    if !context.is_alive() {
        log::debug!("{} cannot switch in: it has fainted", context.name);
        return Ok(());
    }
    switch_in(battle, side, mon, drag)
}

/// Runs the SwitchIn event for a Mon that just entered the battle.
pub fn run_switch(battle: &mut CoreBattle, mon: MonHandle) -> Result<()> {
    let context = battle.mon(mon)?;
    if !context.active || !context.is_alive() {
        return Ok(());
    }
    core_battle_effects::run_event(
        battle,
        EventKind::SwitchIn,
        EventTrigger::mon(mon).with_relay(RelayValue::Void),
    )?;
    Ok(())
}

/// Brings a fainted Mon back at half health.
pub fn revive(battle: &mut CoreBattle, mon: MonHandle) -> Result<bool> {
    let context = battle.mon_mut(mon)?;
    if !context.fainted {
        return Ok(false);
    }
    context.fainted = false;
    context.hp = (context.max_hp / 2).max(1);
    let entry = log_event!("revive", ("mon", &context.name), ("health", context.health()));
    battle.log_entry(entry);
    Ok(true)
}

/// Deals damage to a Mon, returning the damage dealt.
///
/// The Damage event may change or cancel the damage.
pub fn damage(
    battle: &mut CoreBattle,
    target: MonHandle,
    amount: u32,
    source: Option<MonHandle>,
    effect: Option<Arc<EffectDefinition>>,
) -> Result<u32> {
    if amount == 0 || !battle.mon(target)?.is_alive() {
        return Ok(0);
    }
    let effect_id = effect.as_ref().map(|effect| effect.id().clone());
    let amount = core_battle_effects::run_event(
        battle,
        EventKind::Damage,
        EventTrigger::mon(target)
            .with_source(source)
            .with_source_effect(effect)
            .with_relay(amount),
    )?
    .amount_or(amount);
    if amount == 0 {
        return Ok(0);
    }

    let context = battle.mon_mut(target)?;
    let dealt = amount.min(context.hp);
    context.hp -= dealt;
    let entry = log_event!(
        "damage",
        ("mon", &context.name),
        ("health", context.health()),
        effect_id.map(|id| ("from", id))
    );
    battle.log_entry(entry);
    Ok(dealt)
}

/// Heals a Mon, returning the HP restored.
pub fn heal(
    battle: &mut CoreBattle,
    target: MonHandle,
    amount: u32,
    source: Option<MonHandle>,
    effect: Option<Arc<EffectDefinition>>,
) -> Result<u32> {
    let context = battle.mon(target)?;
    if amount == 0 || !context.is_alive() || !context.active || context.hp >= context.max_hp {
        return Ok(0);
    }
    let effect_id = effect.as_ref().map(|effect| effect.id().clone());
    let amount = core_battle_effects::run_event(
        battle,
        EventKind::Heal,
        EventTrigger::mon(target)
            .with_source(source)
            .with_source_effect(effect)
            .with_relay(amount),
    )?
    .amount_or(amount);
    if amount == 0 {
        return Ok(0);
    }

    let context = battle.mon_mut(target)?;
    let healed = amount.min(context.max_hp - context.hp);
    context.hp += healed;
    let entry = log_event!(
        "heal",
        ("mon", &context.name),
        ("health", context.health()),
        effect_id.map(|id| ("from", id))
    );
    battle.log_entry(entry);
    Ok(healed)
}

/// Runs the Immunity event for a condition about to be applied to the Mon.
///
/// A falsy result means the Mon is immune.
fn is_immune(
    battle: &mut CoreBattle,
    target: MonHandle,
    condition: &Id,
    source: Option<MonHandle>,
    source_effect: Option<&Arc<EffectDefinition>>,
) -> Result<bool> {
    let result = core_battle_effects::run_event(
        battle,
        EventKind::Immunity,
        EventTrigger::mon(target)
            .with_source(source)
            .with_source_effect(source_effect.cloned())
            .with_relay(RelayValue::Effect(condition.clone())),
    )?;
    if result.is_truthy() {
        return Ok(false);
    }
    log::debug!("{} is immune to {condition}", mon_name(battle, target)?);
    Ok(true)
}

/// Sets the major status of a Mon.
///
/// Fails if the Mon already has a status, or if a SetStatus or Start handler refuses.
pub fn set_status(
    battle: &mut CoreBattle,
    target: MonHandle,
    status: &Id,
    source: Option<MonHandle>,
    source_effect: Option<Arc<EffectDefinition>>,
) -> Result<bool> {
    let context = battle.mon(target)?;
    if !context.is_alive() || context.status.is_some() {
        return Ok(false);
    }
    let effect = battle.lookup_effect(status)?;
    if is_immune(battle, target, status, source, source_effect.as_ref())? {
        return Ok(false);
    }
    let allowed = core_battle_effects::run_event(
        battle,
        EventKind::SetStatus,
        EventTrigger::mon(target)
            .with_source(source)
            .with_source_effect(source_effect.clone())
            .with_relay(RelayValue::Effect(status.clone())),
    )?;
    if !allowed.is_truthy() {
        return Ok(false);
    }

    let state = new_effect_state(battle, &effect, source, source_effect.as_ref());
    battle.mon_mut(target)?.status = Some(AppliedEffect::new(effect, state));
    let origin = EffectOrigin::MonStatus(target);
    if !core_battle_effects::run_lifecycle_event(
        battle,
        EventKind::Start,
        &origin,
        RelayValue::Boolean(true),
    )?
    .is_truthy()
    {
        battle.remove_applied_effect(&origin);
        return Ok(false);
    }

    let entry = log_event!(
        "status",
        ("mon", mon_name(battle, target)?),
        ("status", status.clone())
    );
    battle.log_entry(entry);
    core_battle_effects::run_event(
        battle,
        EventKind::AfterSetStatus,
        EventTrigger::mon(target)
            .with_source(source)
            .with_source_effect(source_effect)
            .with_relay(RelayValue::Void),
    )?;
    Ok(true)
}

/// Cures the major status of a Mon.
pub fn cure_status(battle: &mut CoreBattle, target: MonHandle) -> Result<bool> {
    if battle.mon(target)?.status.is_none() {
        return Ok(false);
    }
    core_battle_effects::run_event(
        battle,
        EventKind::CureStatus,
        EventTrigger::mon(target).with_relay(RelayValue::Void),
    )?;
    end_effect(battle, &EffectOrigin::MonStatus(target))?;
    Ok(true)
}

/// Adds a volatile condition to a Mon.
///
/// Adding a volatile the Mon already has runs its Restart handler instead.
pub fn add_volatile(
    battle: &mut CoreBattle,
    target: MonHandle,
    volatile: &Id,
    source: Option<MonHandle>,
    source_effect: Option<Arc<EffectDefinition>>,
) -> Result<bool> {
    let context = battle.mon(target)?;
    if !context.is_alive() || !context.active {
        return Ok(false);
    }
    let origin = EffectOrigin::MonVolatile(target, volatile.clone());
    if context.has_volatile(volatile) {
        return Ok(core_battle_effects::run_lifecycle_event(
            battle,
            EventKind::Restart,
            &origin,
            RelayValue::Boolean(false),
        )?
        .is_truthy());
    }

    let effect = battle.lookup_effect(volatile)?;
    if is_immune(battle, target, volatile, source, source_effect.as_ref())? {
        return Ok(false);
    }
    let allowed = core_battle_effects::run_event(
        battle,
        EventKind::AddVolatile,
        EventTrigger::mon(target)
            .with_source(source)
            .with_source_effect(source_effect.clone())
            .with_relay(RelayValue::Effect(volatile.clone())),
    )?;
    if !allowed.is_truthy() {
        return Ok(false);
    }

    let state = new_effect_state(battle, &effect, source, source_effect.as_ref());
    battle
        .mon_mut(target)?
        .volatiles
        .insert(volatile.clone(), AppliedEffect::new(effect, state));
    if !core_battle_effects::run_lifecycle_event(
        battle,
        EventKind::Start,
        &origin,
        RelayValue::Boolean(true),
    )?
    .is_truthy()
    {
        battle.remove_applied_effect(&origin);
        return Ok(false);
    }

    let entry = log_event!(
        "addvolatile",
        ("mon", mon_name(battle, target)?),
        ("volatile", volatile.clone())
    );
    battle.log_entry(entry);
    Ok(true)
}

/// Removes a volatile condition from a Mon, running its End handler.
pub fn remove_volatile(battle: &mut CoreBattle, target: MonHandle, volatile: &Id) -> Result<bool> {
    if !battle.mon(target)?.has_volatile(volatile) {
        return Ok(false);
    }
    end_effect(battle, &EffectOrigin::MonVolatile(target, volatile.clone()))?;
    Ok(true)
}

fn add_side_effect(
    battle: &mut CoreBattle,
    origin: EffectOrigin,
    id: &Id,
    source: Option<MonHandle>,
    source_effect: Option<Arc<EffectDefinition>>,
) -> Result<bool> {
    if battle.applied_effect(&origin).is_some() {
        return Ok(core_battle_effects::run_lifecycle_event(
            battle,
            EventKind::Restart,
            &origin,
            RelayValue::Boolean(false),
        )?
        .is_truthy());
    }
    let side = origin
        .side()
        .wrap_expectation("side effects must be held by a side")?;
    let effect = battle.lookup_effect(id)?;
    let state = new_effect_state(battle, &effect, source, source_effect.as_ref());
    let applied = AppliedEffect::new(effect, state);
    match &origin {
        EffectOrigin::SlotCondition(..) => {
            battle
                .side_mut(side)?
                .slot_conditions
                .insert(id.clone(), applied);
        }
        _ => {
            battle.side_mut(side)?.conditions.insert(id.clone(), applied);
        }
    }
    if !core_battle_effects::run_lifecycle_event(
        battle,
        EventKind::Start,
        &origin,
        RelayValue::Boolean(true),
    )?
    .is_truthy()
    {
        battle.remove_applied_effect(&origin);
        return Ok(false);
    }
    battle.log_entry(log_event!(
        "sidestart",
        ("side", side),
        ("condition", id.clone())
    ));
    Ok(true)
}

/// Adds a condition to a side.
pub fn add_side_condition(
    battle: &mut CoreBattle,
    side: usize,
    condition: &Id,
    source: Option<MonHandle>,
    source_effect: Option<Arc<EffectDefinition>>,
) -> Result<bool> {
    add_side_effect(
        battle,
        EffectOrigin::SideCondition(side, condition.clone()),
        condition,
        source,
        source_effect,
    )
}

/// Adds a condition to a side's active slot.
pub fn add_slot_condition(
    battle: &mut CoreBattle,
    side: usize,
    condition: &Id,
    source: Option<MonHandle>,
    source_effect: Option<Arc<EffectDefinition>>,
) -> Result<bool> {
    add_side_effect(
        battle,
        EffectOrigin::SlotCondition(side, condition.clone()),
        condition,
        source,
        source_effect,
    )
}

pub fn remove_side_condition(battle: &mut CoreBattle, side: usize, condition: &Id) -> Result<bool> {
    let origin = EffectOrigin::SideCondition(side, condition.clone());
    if battle.applied_effect(&origin).is_none() {
        return Ok(false);
    }
    end_effect(battle, &origin)?;
    Ok(true)
}

/// Sets the weather, replacing the current weather.
pub fn set_weather(
    battle: &mut CoreBattle,
    weather: &Id,
    source: Option<MonHandle>,
    source_effect: Option<Arc<EffectDefinition>>,
) -> Result<bool> {
    if battle.field.weather_id() == Some(weather) {
        return Ok(core_battle_effects::run_lifecycle_event(
            battle,
            EventKind::Restart,
            &EffectOrigin::Weather,
            RelayValue::Boolean(false),
        )?
        .is_truthy());
    }
    let allowed = core_battle_effects::run_event(
        battle,
        EventKind::SetWeather,
        EventTrigger::field()
            .with_source(source)
            .with_source_effect(source_effect.clone())
            .with_relay(RelayValue::Effect(weather.clone())),
    )?;
    if !allowed.is_truthy() {
        return Ok(false);
    }

    end_effect(battle, &EffectOrigin::Weather)?;
    let effect = battle.lookup_effect(weather)?;
    let state = new_effect_state(battle, &effect, source, source_effect.as_ref());
    battle.field.weather = Some(AppliedEffect::new(effect, state));
    if !core_battle_effects::run_lifecycle_event(
        battle,
        EventKind::Start,
        &EffectOrigin::Weather,
        RelayValue::Boolean(true),
    )?
    .is_truthy()
    {
        battle.field.weather = None;
        return Ok(false);
    }
    battle.log_entry(log_event!("weather", ("weather", weather.clone())));
    Ok(true)
}

pub fn clear_weather(battle: &mut CoreBattle) -> Result<bool> {
    if battle.field.weather.is_none() {
        return Ok(false);
    }
    end_effect(battle, &EffectOrigin::Weather)?;
    Ok(true)
}

/// Runs the End handler of the effect at the origin, then removes it.
pub fn end_effect(battle: &mut CoreBattle, origin: &EffectOrigin) -> Result<()> {
    if battle.applied_effect(origin).is_none() {
        return Ok(());
    }
    core_battle_effects::run_lifecycle_event(battle, EventKind::End, origin, RelayValue::Void)?;
    let Some(applied) = battle.remove_applied_effect(origin) else {
        return Ok(());
    };
    let id = applied.id().clone();
    let entry = match origin {
        EffectOrigin::MonStatus(mon) => {
            log_event!("curestatus", ("mon", mon_name(battle, *mon)?), ("status", id))
        }
        EffectOrigin::MonVolatile(mon, _) => {
            log_event!("end", ("mon", mon_name(battle, *mon)?), ("volatile", id))
        }
        EffectOrigin::SideCondition(side, _) | EffectOrigin::SlotCondition(side, _) => {
            log_event!("sideend", ("side", side), ("condition", id))
        }
        EffectOrigin::Weather => log_event!("weather", ("weather", "none")),
        _ => log_event!("fieldend", ("effect", id)),
    };
    battle.log_entry(entry);
    Ok(())
}

/// Processes every Mon that reached 0 HP since the last check.
///
/// Returns true if the battle ended.
pub fn faint_messages(battle: &mut CoreBattle) -> Result<bool> {
    if battle.ended() {
        return Ok(true);
    }
    let fainting = battle
        .sides()
        .flat_map(|side| side.team.iter().cloned())
        .filter(|mon| {
            battle
                .mon(*mon)
                .is_ok_and(|mon| mon.hp == 0 && !mon.fainted)
        })
        .collect::<Vec<_>>();
    for mon in fainting {
        let entry = log_event!("faint", ("mon", mon_name(battle, mon)?));
        battle.log_entry(entry);
        core_battle_effects::run_event(
            battle,
            EventKind::Faint,
            EventTrigger::mon(mon).with_relay(RelayValue::Void),
        )?;
        for id in battle.mon(mon)?.volatiles.keys().cloned().collect::<Vec<_>>() {
            end_effect(battle, &EffectOrigin::MonVolatile(mon, id))?;
        }
        end_effect(battle, &EffectOrigin::MonStatus(mon))?;
        battle.mon_mut(mon)?.fainted = true;
        battle.queue.cancel_action(mon);
    }
    Ok(battle.check_win())
}

/// Forces the target out, replacing it with a random healthy teammate.
pub fn force_switch(battle: &mut CoreBattle, target: MonHandle) -> Result<bool> {
    let context = battle.mon(target)?;
    if !context.is_alive() || !context.active {
        return Ok(false);
    }
    let side = context.side;
    let candidates = battle
        .side(side)?
        .team
        .iter()
        .cloned()
        .filter(|mon| {
            battle
                .mon(*mon)
                .is_ok_and(|mon| mon.is_alive() && !mon.active)
        })
        .collect::<Vec<_>>();
    let Some(incoming) = rand_util::sample_slice(battle.prng.as_mut(), &candidates).cloned() else {
        return Ok(false);
    };
    let speed = battle.mon(target)?.speed;
    let action = SwitchAction::new(ActionChoice::InstaSwitch, Some(target), incoming)?;
    battle
        .queue
        .insert_action_into_sorted_position(Action::from(action).with_speed(speed));
    Ok(true)
}

fn resolve_target(
    battle: &mut CoreBattle,
    user: MonHandle,
    data: &MoveData,
    chosen: Option<MonHandle>,
    effect: &Arc<EffectDefinition>,
) -> Result<Option<MonHandle>> {
    match data.target {
        MoveTarget::User => return Ok(Some(user)),
        MoveTarget::Normal => (),
        _ => return Ok(None),
    }
    let foe_side = battle.side(battle.mon(user)?.side)?.foe_index();
    let target = match chosen {
        Some(mon) if battle.mon(mon)?.active && battle.mon(mon)?.is_alive() => Some(mon),
        _ => battle.side(foe_side)?.active,
    };
    let Some(target) = target else {
        return Ok(None);
    };
    let redirected = core_battle_effects::run_event(
        battle,
        EventKind::RedirectTarget,
        EventTrigger::mon(target)
            .with_source(Some(user))
            .with_source_effect(Some(effect.clone()))
            .with_relay(target)
            .fast_exit(),
    )?
    .mon();
    match redirected {
        Some(mon) if mon != target && battle.mon(mon)?.is_alive() && battle.mon(mon)?.active => {
            log::debug!("move target redirected from {target} to {mon}");
            Ok(Some(mon))
        }
        _ => Ok(Some(target)),
    }
}

fn roll_accuracy(
    battle: &mut CoreBattle,
    user: MonHandle,
    target: MonHandle,
    data: &MoveData,
    effect: &Arc<EffectDefinition>,
) -> Result<bool> {
    let accuracy = match data.accuracy {
        Some(accuracy) => RelayValue::Integer(accuracy as i64),
        None => RelayValue::Boolean(true),
    };
    let accuracy = core_battle_effects::run_event(
        battle,
        EventKind::Accuracy,
        EventTrigger::mon(target)
            .with_source(Some(user))
            .with_source_effect(Some(effect.clone()))
            .with_relay(accuracy)
            .on_effect(),
    )?;
    match accuracy {
        RelayValue::Integer(accuracy) => {
            let accuracy = core_battle_effects::run_event(
                battle,
                EventKind::ModifyAccuracy,
                EventTrigger::mon(target)
                    .with_source(Some(user))
                    .with_source_effect(Some(effect.clone()))
                    .with_relay(accuracy),
            )?
            .amount_or(accuracy.max(0) as u32);
            Ok(rand_util::chance(battle.prng.as_mut(), accuracy as u64, 100))
        }
        accuracy => Ok(accuracy.is_truthy()),
    }
}

fn calculate_damage(
    battle: &mut CoreBattle,
    user: MonHandle,
    target: MonHandle,
    data: &MoveData,
    effect: &Arc<EffectDefinition>,
) -> Result<u32> {
    let base_power = core_battle_effects::run_event(
        battle,
        EventKind::BasePower,
        EventTrigger::mon(user)
            .with_source(Some(target))
            .with_source_effect(Some(effect.clone()))
            .with_relay(data.base_power)
            .on_effect(),
    )?
    .amount_or(data.base_power);
    if base_power == 0 {
        return Ok(0);
    }

    let (attack_stat, defense_stat) = match data.category {
        MoveCategory::Special => (Stat::SpA, Stat::SpD),
        _ => (Stat::Atk, Stat::Def),
    };
    let attack = modified_stat(battle, user, attack_stat)?;
    let defense = modified_stat(battle, target, defense_stat)?.max(1);
    let level = battle.mon(user)?.level as u64;

    let base_damage = 2 * level / 5 + 2;
    let base_damage = base_damage * base_power as u64 * attack as u64;
    let base_damage = base_damage / defense as u64;
    let base_damage = base_damage / 50 + 2;

    // Random factor in [85, 100].
    let roll = rand_util::range(battle.prng.as_mut(), 85, 101);
    let damage = (base_damage * roll / 100).max(1);
    let damage = damage.min(u32::MAX as u64) as u32;

    let damage = core_battle_effects::run_event(
        battle,
        EventKind::ModifyDamage,
        EventTrigger::mon(target)
            .with_source(Some(user))
            .with_source_effect(Some(effect.clone()))
            .with_relay(damage)
            .on_effect(),
    )?
    .amount_or(damage);
    Ok(damage)
}

/// A stat of a Mon after every Modify handler for it.
pub fn modified_stat(battle: &mut CoreBattle, mon: MonHandle, stat: Stat) -> Result<u32> {
    let base = stat.base_value(&battle.mon(mon)?.stats);
    Ok(core_battle_effects::run_event(
        battle,
        stat.modify_event(),
        EventTrigger::mon(mon).with_relay(base),
    )?
    .amount_or(base))
}

fn apply_move_effects(
    battle: &mut CoreBattle,
    user: MonHandle,
    target: MonHandle,
    data: &MoveData,
    effect: &Arc<EffectDefinition>,
) -> Result<bool> {
    let mut success = false;
    if !battle.mon(target)?.is_alive() {
        return Ok(success);
    }
    if let Some(status) = &data.status {
        success |= set_status(battle, target, status, Some(user), Some(effect.clone()))?;
    }
    if let Some(volatile) = &data.volatile_status {
        success |= add_volatile(battle, target, volatile, Some(user), Some(effect.clone()))?;
    }
    if let Some(condition) = &data.side_condition {
        let side = battle.mon(target)?.side;
        success |= add_side_condition(battle, side, condition, Some(user), Some(effect.clone()))?;
    }
    if let Some(weather) = &data.weather {
        success |= set_weather(battle, weather, Some(user), Some(effect.clone()))?;
    }
    if data.force_switch {
        success |= force_switch(battle, target)?;
    }
    Ok(success)
}

fn apply_secondary_effects(
    battle: &mut CoreBattle,
    user: MonHandle,
    target: MonHandle,
    data: &MoveData,
    effect: &Arc<EffectDefinition>,
) -> Result<()> {
    let Some(secondary) = &data.secondary else {
        return Ok(());
    };
    if !battle.mon(target)?.is_alive()
        || !rand_util::chance(battle.prng.as_mut(), secondary.chance as u64, 100)
    {
        return Ok(());
    }
    if let Some(status) = &secondary.status {
        set_status(battle, target, status, Some(user), Some(effect.clone()))?;
    }
    if let Some(volatile) = &secondary.volatile_status {
        add_volatile(battle, target, volatile, Some(user), Some(effect.clone()))?;
    }
    Ok(())
}

/// Runs the move's own Hit handler.
fn run_hit(
    battle: &mut CoreBattle,
    user: MonHandle,
    target: MonHandle,
    effect: &Arc<EffectDefinition>,
    required: bool,
) -> Result<bool> {
    let mut trigger = EventTrigger::mon(target)
        .with_source(Some(user))
        .with_source_effect(Some(effect.clone()));
    if required {
        trigger = trigger.required();
    }
    Ok(core_battle_effects::run_single_event(
        battle,
        EventIdentity::new(EventKind::Hit),
        effect,
        EffectOrigin::SourceEffect,
        trigger,
    )?
    .is_truthy())
}

fn hit_target(
    battle: &mut CoreBattle,
    user: MonHandle,
    target: MonHandle,
    data: &MoveData,
    effect: &Arc<EffectDefinition>,
) -> Result<bool> {
    let try_hit = core_battle_effects::run_event(
        battle,
        EventKind::TryHit,
        EventTrigger::mon(target)
            .with_source(Some(user))
            .with_source_effect(Some(effect.clone()))
            .on_effect(),
    )?;
    if !try_hit.is_truthy() {
        return Ok(false);
    }

    if !roll_accuracy(battle, user, target, data, effect)? {
        let entry = log_event!(
            "miss",
            ("mon", mon_name(battle, user)?),
            ("target", mon_name(battle, target)?)
        );
        battle.log_entry(entry);
        return Ok(false);
    }

    if data.category == MoveCategory::Status {
        let has_builtin_effect = data.has_builtin_effect();
        if !run_hit(battle, user, target, effect, !has_builtin_effect)? {
            return Ok(false);
        }
        if has_builtin_effect {
            return apply_move_effects(battle, user, target, data, effect);
        }
        return Ok(true);
    }

    let damage = calculate_damage(battle, user, target, data, effect)?;
    if damage == 0 {
        return Ok(false);
    }
    let dealt = self::damage(battle, target, damage, Some(user), Some(effect.clone()))?;
    if dealt > 0 {
        core_battle_effects::run_event(
            battle,
            EventKind::DamagingHit,
            EventTrigger::mon(target)
                .with_source(Some(user))
                .with_source_effect(Some(effect.clone()))
                .with_relay(dealt),
        )?;
    }
    if battle.mon(target)?.is_alive() {
        run_hit(battle, user, target, effect, false)?;
    }
    apply_move_effects(battle, user, target, data, effect)?;
    apply_secondary_effects(battle, user, target, data, effect)?;
    Ok(true)
}

/// Uses a move in the Mon's move slot.
pub fn use_move(
    battle: &mut CoreBattle,
    user: MonHandle,
    move_slot: usize,
    chosen_target: Option<MonHandle>,
) -> Result<()> {
    let move_id = battle
        .mon(user)?
        .move_slots
        .get(move_slot)
        .wrap_not_found_error(format_args!("move slot {move_slot}"))?
        .id
        .clone();
    let effect = battle.lookup_effect(&move_id)?;
    let data = effect
        .move_data()
        .cloned()
        .wrap_expectation_with_format(format_args!("{move_id} is not a move"))?;

    let before_move = core_battle_effects::run_event(
        battle,
        EventKind::BeforeMove,
        EventTrigger::mon(user)
            .with_source(chosen_target)
            .with_source_effect(Some(effect.clone())),
    )?;
    if !before_move.is_truthy() {
        log::debug!("{} was prevented from using {move_id}", mon_name(battle, user)?);
        battle.mon_mut(user)?.last_move = None;
        return Ok(());
    }

    let deduction = core_battle_effects::run_event(
        battle,
        EventKind::DeductPp,
        EventTrigger::mon(user).with_relay(1u32),
    )?
    .amount_or(1);
    let context = battle.mon_mut(user)?;
    if let Some(slot) = context.move_slots.get_mut(move_slot) {
        slot.pp = slot.pp.saturating_sub(deduction.min(u8::MAX as u32) as u8);
    }
    context.last_move = Some(move_id.clone());

    let target = resolve_target(battle, user, &data, chosen_target, &effect)?;
    let target_name = match target {
        Some(target) if target != user => Some(("target", mon_name(battle, target)?)),
        _ => None,
    };
    let entry = log_event!(
        "move",
        ("mon", mon_name(battle, user)?),
        ("name", effect.name()),
        target_name
    );
    battle.log_entry(entry);

    let try_move = core_battle_effects::run_event(
        battle,
        EventKind::TryMove,
        EventTrigger::mon(user)
            .with_source(target)
            .with_source_effect(Some(effect.clone()))
            .on_effect(),
    )?;
    let success = if !try_move.is_truthy() {
        false
    } else {
        match data.target {
            MoveTarget::Normal | MoveTarget::User => match target {
                Some(target) => hit_target(battle, user, target, &data, &effect)?,
                None => {
                    battle.log_entry(log_event!("notarget"));
                    false
                }
            },
            MoveTarget::AllySide | MoveTarget::FoeSide => {
                let side = battle.mon(user)?.side;
                let side = if data.target == MoveTarget::FoeSide {
                    battle.side(side)?.foe_index()
                } else {
                    side
                };
                match &data.side_condition {
                    Some(condition) => add_side_condition(
                        battle,
                        side,
                        condition,
                        Some(user),
                        Some(effect.clone()),
                    )?,
                    None => false,
                }
            }
            MoveTarget::Field => match &data.weather {
                Some(weather) => set_weather(battle, weather, Some(user), Some(effect.clone()))?,
                None => false,
            },
        }
    };
    if !success {
        let entry = log_event!("fail", ("mon", mon_name(battle, user)?));
        battle.log_entry(entry);
    }

    core_battle_effects::run_event(
        battle,
        EventKind::AfterMove,
        EventTrigger::mon(user)
            .with_source(target)
            .with_source_effect(Some(effect))
            .with_relay(RelayValue::Void)
            .on_effect(),
    )?;
    Ok(())
}
