use std::sync::Arc;

use anyhow::Result;

use crate::{
    battle::{
        CoreBattle,
        MonHandle,
        SpeedOrderable,
        core_battle::EventFrame,
        core_battle_actions,
        speed_sort,
    },
    effect::{
        AppliedEffect,
        Argument,
        Arguments,
        CapabilityDescriptor,
        DispatchContext,
        EffectDefinition,
        EffectOrigin,
        EventIdentity,
        EventKind,
        EventPrefix,
        EventSuffix,
        EventTarget,
        InvocationForm,
        ParameterType,
        RelayValue,
    },
    error::contract_violation_error,
};

/// The participants and options of one event dispatch.
#[derive(Clone)]
pub struct EventTrigger {
    target: EventTarget,
    source: Option<MonHandle>,
    source_effect: Option<Arc<EffectDefinition>>,
    relay: RelayValue,
    on_effect: bool,
    fast_exit: bool,
    required: bool,
}

impl EventTrigger {
    fn new(target: EventTarget) -> Self {
        Self {
            target,
            source: None,
            source_effect: None,
            relay: RelayValue::Boolean(true),
            on_effect: false,
            fast_exit: false,
            required: false,
        }
    }

    /// An event targeting a Mon.
    pub fn mon(mon: MonHandle) -> Self {
        Self::new(EventTarget::Mon(mon))
    }

    /// An event targeting a side.
    pub fn side(side: usize) -> Self {
        Self::new(EventTarget::Side(side))
    }

    /// An event targeting the field.
    pub fn field() -> Self {
        Self::new(EventTarget::Field)
    }

    /// An event targeting the battle as a whole.
    pub fn battle() -> Self {
        Self::new(EventTarget::Battle)
    }

    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_source(mut self, source: Option<MonHandle>) -> Self {
        self.source = source;
        self
    }

    pub fn with_source_effect(mut self, source_effect: Option<Arc<EffectDefinition>>) -> Self {
        self.source_effect = source_effect;
        self
    }

    /// Sets the initial relay value. Defaults to `true`.
    pub fn with_relay<V>(mut self, relay: V) -> Self
    where
        V: Into<RelayValue>,
    {
        self.relay = relay.into();
        self
    }

    /// Also runs the source effect's own handler for the event.
    pub fn on_effect(mut self) -> Self {
        self.on_effect = true;
        self
    }

    /// Stops at the first handler that returns any value.
    pub fn fast_exit(mut self) -> Self {
        self.fast_exit = true;
        self
    }

    /// Fails if the effect has no handler for the event.
    ///
    /// Only meaningful for [`run_single_event`].
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn target(&self) -> EventTarget {
        self.target
    }

    pub fn source(&self) -> Option<MonHandle> {
        self.source
    }
}

/// One handler found for an event.
struct EventListener {
    effect: Arc<EffectDefinition>,
    descriptor: Option<Arc<CapabilityDescriptor>>,
    origin: EffectOrigin,
    identity: EventIdentity,
    holder: EventTarget,
    order: Option<u32>,
    priority: i32,
    speed: u32,
    uses_speed: bool,
    sub_order: u32,
    effect_order: u32,
}

impl EventListener {
    fn new(
        applied: &AppliedEffect,
        descriptor: Option<Arc<CapabilityDescriptor>>,
        origin: EffectOrigin,
        identity: EventIdentity,
        holder: EventTarget,
        speed: u32,
    ) -> Self {
        Self::for_effect(
            applied.effect.clone(),
            Some(applied.state.effect_order()),
            descriptor,
            origin,
            identity,
            holder,
            speed,
        )
    }

    fn for_effect(
        effect: Arc<EffectDefinition>,
        effect_order: Option<u32>,
        descriptor: Option<Arc<CapabilityDescriptor>>,
        origin: EffectOrigin,
        identity: EventIdentity,
        holder: EventTarget,
        speed: u32,
    ) -> Self {
        let (order, priority, uses_speed, sub_order) = match &descriptor {
            Some(descriptor) => (
                descriptor.order(),
                descriptor.priority(),
                descriptor.uses_speed(),
                descriptor
                    .sub_order()
                    .unwrap_or(effect.kind().default_sub_order()),
            ),
            None => (
                None,
                0,
                identity.kind.uses_speed(),
                effect.kind().default_sub_order(),
            ),
        };
        let effect_order = if identity.kind.uses_effect_order() {
            effect_order.unwrap_or(0)
        } else {
            0
        };
        Self {
            effect,
            descriptor,
            origin,
            identity,
            holder,
            order,
            priority,
            speed,
            uses_speed,
            sub_order,
            effect_order,
        }
    }
}

impl SpeedOrderable for EventListener {
    fn order(&self) -> Option<u32> {
        self.order
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn speed(&self) -> u32 {
        self.speed
    }

    fn uses_speed(&self) -> bool {
        self.uses_speed
    }

    fn sub_order(&self) -> u32 {
        self.sub_order
    }

    fn effect_order(&self) -> u32 {
        self.effect_order
    }
}

fn holder_speed(battle: &CoreBattle, holder: EventTarget) -> u32 {
    holder
        .mon()
        .and_then(|mon| battle.mon(mon).ok())
        .map(|mon| mon.speed)
        .unwrap_or(0)
}

fn push_listener(
    battle: &CoreBattle,
    listeners: &mut Vec<EventListener>,
    applied: Option<&AppliedEffect>,
    origin: EffectOrigin,
    identity: EventIdentity,
    holder: EventTarget,
) {
    let Some(applied) = applied else {
        return;
    };
    if !applied.effect.has_any_handlers() {
        return;
    }
    if let Some(descriptor) = applied.effect.handler(&identity) {
        listeners.push(EventListener::new(
            applied,
            Some(descriptor.clone()),
            origin,
            identity,
            holder,
            holder_speed(battle, holder),
        ));
    }
}

fn find_listeners_on_mon(
    battle: &CoreBattle,
    listeners: &mut Vec<EventListener>,
    identity: EventIdentity,
    mon: MonHandle,
) -> Result<()> {
    let holder = EventTarget::Mon(mon);
    let (side, active) = {
        let context = battle.mon(mon)?;
        push_listener(
            battle,
            listeners,
            context.status.as_ref(),
            EffectOrigin::MonStatus(mon),
            identity,
            holder,
        );
        for (id, volatile) in &context.volatiles {
            push_listener(
                battle,
                listeners,
                Some(volatile),
                EffectOrigin::MonVolatile(mon, id.clone()),
                identity,
                holder,
            );
        }
        push_listener(
            battle,
            listeners,
            context.ability.as_ref(),
            EffectOrigin::MonAbility(mon),
            identity,
            holder,
        );
        push_listener(
            battle,
            listeners,
            context.item.as_ref(),
            EffectOrigin::MonItem(mon),
            identity,
            holder,
        );
        (context.side, context.active)
    };
    if active {
        for (id, condition) in &battle.side(side)?.slot_conditions {
            push_listener(
                battle,
                listeners,
                Some(condition),
                EffectOrigin::SlotCondition(side, id.clone()),
                identity,
                holder,
            );
        }
    }
    Ok(())
}

fn find_listeners_on_side(
    battle: &CoreBattle,
    listeners: &mut Vec<EventListener>,
    identity: EventIdentity,
    side: usize,
) -> Result<()> {
    for (id, condition) in &battle.side(side)?.conditions {
        push_listener(
            battle,
            listeners,
            Some(condition),
            EffectOrigin::SideCondition(side, id.clone()),
            identity,
            EventTarget::Side(side),
        );
    }
    Ok(())
}

fn find_listeners_on_field(
    battle: &CoreBattle,
    listeners: &mut Vec<EventListener>,
    identity: EventIdentity,
) {
    let field = battle.field();
    push_listener(
        battle,
        listeners,
        field.weather.as_ref(),
        EffectOrigin::Weather,
        identity,
        EventTarget::Field,
    );
    push_listener(
        battle,
        listeners,
        field.terrain.as_ref(),
        EffectOrigin::Terrain,
        identity,
        EventTarget::Field,
    );
    for (id, pseudo_weather) in &field.pseudo_weather {
        push_listener(
            battle,
            listeners,
            Some(pseudo_weather),
            EffectOrigin::PseudoWeather(id.clone()),
            identity,
            EventTarget::Field,
        );
    }
    for rule in &battle.rules {
        push_listener(
            battle,
            listeners,
            Some(rule),
            EffectOrigin::Rule(rule.id().clone()),
            identity,
            EventTarget::Battle,
        );
    }
}

fn find_all_listeners(
    battle: &CoreBattle,
    kind: EventKind,
    trigger: &EventTrigger,
) -> Result<Vec<EventListener>> {
    let mut listeners = Vec::new();
    let identity = EventIdentity::new(kind);
    let prefixed = kind.has_prefixed_variants();

    match trigger.target {
        EventTarget::Mon(target) => {
            find_listeners_on_mon(battle, &mut listeners, identity, target)?;
            let target_side = battle.mon(target)?.side;
            if prefixed {
                for mon in battle.healthy_active_mon_handles().collect::<Vec<_>>() {
                    let prefix = if battle.mon(mon)?.side == target_side {
                        EventPrefix::Ally
                    } else {
                        EventPrefix::Foe
                    };
                    find_listeners_on_mon(battle, &mut listeners, identity.with_prefix(prefix), mon)?;
                    find_listeners_on_mon(
                        battle,
                        &mut listeners,
                        identity.with_prefix(EventPrefix::Any),
                        mon,
                    )?;
                }
            }
            find_listeners_on_side(battle, &mut listeners, identity, target_side)?;
            if prefixed {
                let foe_side = battle.side(target_side)?.foe_index();
                find_listeners_on_side(
                    battle,
                    &mut listeners,
                    identity.with_prefix(EventPrefix::Foe),
                    foe_side,
                )?;
            }
        }
        EventTarget::Side(side) => {
            find_listeners_on_side(battle, &mut listeners, identity, side)?;
        }
        EventTarget::Field | EventTarget::Battle => (),
    }

    if prefixed {
        if let Some(source) = trigger.source {
            find_listeners_on_mon(
                battle,
                &mut listeners,
                identity.with_prefix(EventPrefix::Source),
                source,
            )?;
        }
    }

    find_listeners_on_field(battle, &mut listeners, identity);

    if trigger.on_effect {
        if let Some(effect) = &trigger.source_effect {
            if let Some(descriptor) = effect.handler(&identity) {
                let holder = trigger
                    .source
                    .map(EventTarget::Mon)
                    .unwrap_or(trigger.target);
                listeners.push(EventListener::for_effect(
                    effect.clone(),
                    None,
                    Some(descriptor.clone()),
                    EffectOrigin::SourceEffect,
                    identity,
                    holder,
                    holder_speed(battle, holder),
                ));
            }
        }
    }

    Ok(listeners)
}

/// Is the listener's effect still attached where it was found?
fn still_attached(battle: &CoreBattle, listener: &EventListener) -> bool {
    match &listener.origin {
        EffectOrigin::SourceEffect => true,
        origin => battle
            .applied_effect(origin)
            .is_some_and(|applied| applied.id() == listener.effect.id()),
    }
}

fn resolve_argument(
    parameter: ParameterType,
    identity: EventIdentity,
    battle: &CoreBattle,
    trigger: &EventTrigger,
    relay: &RelayValue,
) -> Option<Argument> {
    match parameter {
        ParameterType::Relay => Some(Argument::Relay(relay.clone())),
        ParameterType::TargetMon => trigger.target.mon().map(Argument::Mon),
        ParameterType::SourceMon => trigger.source.map(Argument::Mon),
        ParameterType::Mon => match trigger.target.mon() {
            Some(mon) => Some(Argument::Mon(mon)),
            None => {
                if trigger.source.is_some() {
                    log::debug!("{identity} handler receives the source in place of the target");
                }
                trigger.source.map(Argument::Mon)
            }
        },
        ParameterType::Side => match trigger.target {
            EventTarget::Side(side) => Some(Argument::Side(side)),
            EventTarget::Mon(mon) => battle.mon(mon).ok().map(|mon| Argument::Side(mon.side)),
            _ => None,
        },
        ParameterType::SourceEffect => trigger.source_effect.clone().map(Argument::Effect),
    }
}

fn invoke_listener(
    battle: &mut CoreBattle,
    listener: &EventListener,
    trigger: &EventTrigger,
    relay: &RelayValue,
) -> Result<Option<RelayValue>> {
    let Some(descriptor) = &listener.descriptor else {
        return Ok(None);
    };
    let result = match descriptor.form() {
        InvocationForm::Fixed {
            parameters,
            handler,
        } => {
            let values = parameters
                .iter()
                .map(|parameter| {
                    resolve_argument(*parameter, listener.identity, battle, trigger, relay)
                })
                .collect::<Vec<_>>();
            descriptor.check_arguments(&values)?;
            handler(battle, &Arguments::new(values))?
        }
        InvocationForm::Context(handler) => {
            let mut context = DispatchContext::new(
                battle,
                listener.identity,
                listener.effect.clone(),
                listener.origin.clone(),
                trigger.target,
                trigger.source,
                trigger.source_effect.clone(),
                relay.clone(),
            );
            handler(&mut context)?
        }
    };
    descriptor.check_return(&result)?;
    Ok(result)
}

/// Fails if starting another event would nest deeper than the configured limit.
fn check_depth(battle: &CoreBattle, identity: EventIdentity) -> Result<()> {
    let max = battle.options.max_event_depth;
    if battle.event_stack.len() >= max {
        return Err(contract_violation_error(
            identity,
            format!("event depth exceeded the limit of {max}"),
        ));
    }
    Ok(())
}

fn push_frame(battle: &mut CoreBattle, identity: EventIdentity) -> Result<()> {
    check_depth(battle, identity)?;
    battle.event_stack.push(EventFrame {
        identity,
        modifier: 4096,
    });
    Ok(())
}

/// Pops the running frame, applying its modifier to an integer result.
fn pop_frame(battle: &mut CoreBattle, result: Result<RelayValue>) -> Result<RelayValue> {
    let frame = battle.event_stack.pop();
    let relay = result?;
    match (relay, frame) {
        (RelayValue::Integer(value), Some(frame)) if value >= 0 && frame.modifier != 4096 => {
            let modified = (value * frame.modifier as i64 + 2047) / 4096;
            log::trace!("{} modified {value} to {modified}", frame.identity);
            Ok(RelayValue::Integer(modified))
        }
        (relay, _) => Ok(relay),
    }
}

fn run_listeners(
    battle: &mut CoreBattle,
    listeners: Vec<EventListener>,
    trigger: &EventTrigger,
) -> Result<RelayValue> {
    let mut relay = trigger.relay.clone();
    for listener in listeners {
        if !still_attached(battle, &listener) {
            log::debug!(
                "skipping {} handler of {}: effect is no longer attached",
                listener.identity,
                listener.effect.id()
            );
            continue;
        }
        if let Some(value) = invoke_listener(battle, &listener, trigger, &relay)? {
            let stop = value.is_stop() || trigger.fast_exit;
            relay = value;
            if stop {
                break;
            }
        }
    }
    Ok(relay)
}

/// Runs an event on every eligible handler, folding their results into one relay value.
///
/// Handlers are collected from the target and its surroundings, ordered with the same keys as
/// actions, and called in order. A handler returning `false` or `0` stops the event.
pub fn run_event(
    battle: &mut CoreBattle,
    kind: EventKind,
    trigger: EventTrigger,
) -> Result<RelayValue> {
    let identity = EventIdentity::new(kind);
    // Events without listeners still count toward the depth limit.
    check_depth(battle, identity)?;
    let mut listeners = find_all_listeners(battle, kind, &trigger)?;
    if listeners.is_empty() {
        return Ok(trigger.relay);
    }
    speed_sort(
        &mut listeners,
        battle.prng.as_mut(),
        battle.options.speed_tie_resolution,
    );
    log::debug!("{identity} has {} listeners", listeners.len());

    push_frame(battle, identity)?;
    let result = run_listeners(battle, listeners, &trigger);
    pop_frame(battle, result)
}

/// Runs the handler of exactly one effect.
pub fn run_single_event(
    battle: &mut CoreBattle,
    identity: EventIdentity,
    effect: &Arc<EffectDefinition>,
    origin: EffectOrigin,
    trigger: EventTrigger,
) -> Result<RelayValue> {
    check_depth(battle, identity)?;
    let Some(descriptor) = effect.handler(&identity) else {
        if trigger.required {
            return Err(contract_violation_error(
                identity,
                format!("effect {} has no handler for a required event", effect.id()),
            ));
        }
        return Ok(trigger.relay);
    };
    let effect_order = battle
        .applied_effect(&origin)
        .map(|applied| applied.state.effect_order());
    let listener = EventListener::for_effect(
        effect.clone(),
        effect_order,
        Some(descriptor.clone()),
        origin,
        identity,
        trigger.target,
        holder_speed(battle, trigger.target),
    );

    push_frame(battle, identity)?;
    let result = run_listeners(battle, vec![listener], &trigger);
    pop_frame(battle, result)
}

/// The suffix lifecycle events use for effects at the origin.
pub(crate) fn suffix_for_origin(origin: &EffectOrigin) -> Option<EventSuffix> {
    match origin {
        EffectOrigin::SideCondition(..) => Some(EventSuffix::Side),
        EffectOrigin::SlotCondition(..) => Some(EventSuffix::Slot),
        EffectOrigin::Weather | EffectOrigin::Terrain | EffectOrigin::PseudoWeather(_) => {
            Some(EventSuffix::Field)
        }
        _ => None,
    }
}

/// The target of lifecycle events for effects at the origin.
pub(crate) fn target_for_origin(battle: &CoreBattle, origin: &EffectOrigin) -> EventTarget {
    match origin {
        EffectOrigin::MonAbility(mon)
        | EffectOrigin::MonItem(mon)
        | EffectOrigin::MonStatus(mon)
        | EffectOrigin::MonVolatile(mon, _) => EventTarget::Mon(*mon),
        EffectOrigin::SideCondition(side, _) => EventTarget::Side(*side),
        EffectOrigin::SlotCondition(side, _) => {
            match battle.side(*side).ok().and_then(|side| side.active) {
                Some(mon) => EventTarget::Mon(mon),
                None => EventTarget::Side(*side),
            }
        }
        EffectOrigin::Weather | EffectOrigin::Terrain | EffectOrigin::PseudoWeather(_) => {
            EventTarget::Field
        }
        EffectOrigin::Rule(_) | EffectOrigin::SourceEffect => EventTarget::Battle,
    }
}

/// Runs a lifecycle event, such as Start or End, on the effect at the origin.
pub(crate) fn run_lifecycle_event(
    battle: &mut CoreBattle,
    kind: EventKind,
    origin: &EffectOrigin,
    relay: RelayValue,
) -> Result<RelayValue> {
    let Some(applied) = battle.applied_effect(origin) else {
        return Ok(relay);
    };
    let effect = applied.effect.clone();
    let source = applied.state.source();
    let source_effect = applied
        .state
        .source_effect()
        .and_then(|id| battle.dex.effect(id));
    let mut identity = EventIdentity::new(kind);
    if let Some(suffix) = suffix_for_origin(origin) {
        identity = identity.with_suffix(suffix);
    }
    let trigger = EventTrigger::new(target_for_origin(battle, origin))
        .with_source(source)
        .with_source_effect(source_effect)
        .with_relay(relay);
    run_single_event(battle, identity, &effect, origin.clone(), trigger)
}

fn find_residual_listeners(battle: &CoreBattle) -> Result<Vec<EventListener>> {
    let mut listeners = Vec::new();
    let mut push = |applied: &AppliedEffect,
                    origin: EffectOrigin,
                    identity: EventIdentity,
                    holder: EventTarget| {
        let descriptor = applied.effect.handler(&identity).cloned();
        if descriptor.is_none() && applied.state.duration().is_none() {
            return;
        }
        listeners.push(EventListener::new(
            applied,
            descriptor,
            origin,
            identity,
            holder,
            holder_speed(battle, holder),
        ));
    };

    let field = EventIdentity::new(EventKind::Residual).with_suffix(EventSuffix::Field);
    if let Some(weather) = &battle.field.weather {
        push(weather, EffectOrigin::Weather, field, EventTarget::Field);
    }
    if let Some(terrain) = &battle.field.terrain {
        push(terrain, EffectOrigin::Terrain, field, EventTarget::Field);
    }
    for (id, pseudo_weather) in &battle.field.pseudo_weather {
        push(
            pseudo_weather,
            EffectOrigin::PseudoWeather(id.clone()),
            field,
            EventTarget::Field,
        );
    }

    for side in battle.sides() {
        let identity = EventIdentity::new(EventKind::Residual).with_suffix(EventSuffix::Side);
        for (id, condition) in &side.conditions {
            push(
                condition,
                EffectOrigin::SideCondition(side.index, id.clone()),
                identity,
                EventTarget::Side(side.index),
            );
        }
        let identity = EventIdentity::new(EventKind::Residual).with_suffix(EventSuffix::Slot);
        for (id, condition) in &side.slot_conditions {
            let origin = EffectOrigin::SlotCondition(side.index, id.clone());
            let holder = target_for_origin(battle, &origin);
            push(condition, origin, identity, holder);
        }
    }

    let identity = EventIdentity::new(EventKind::Residual);
    for mon in battle.healthy_active_mon_handles().collect::<Vec<_>>() {
        let context = battle.mon(mon)?;
        let holder = EventTarget::Mon(mon);
        if let Some(status) = &context.status {
            push(status, EffectOrigin::MonStatus(mon), identity, holder);
        }
        for (id, volatile) in &context.volatiles {
            push(
                volatile,
                EffectOrigin::MonVolatile(mon, id.clone()),
                identity,
                holder,
            );
        }
        if let Some(ability) = &context.ability {
            push(ability, EffectOrigin::MonAbility(mon), identity, holder);
        }
        if let Some(item) = &context.item {
            push(item, EffectOrigin::MonItem(mon), identity, holder);
        }
    }

    for rule in &battle.rules {
        push(
            rule,
            EffectOrigin::Rule(rule.id().clone()),
            identity,
            EventTarget::Battle,
        );
    }

    Ok(listeners)
}

/// Runs the end-of-turn Residual event across the field, sides and active Mons.
///
/// Durations are counted down first. An effect that runs out is ended and removed instead of
/// running its Residual handler.
pub fn run_residual_event(battle: &mut CoreBattle) -> Result<()> {
    let mut listeners = find_residual_listeners(battle)?;
    speed_sort(
        &mut listeners,
        battle.prng.as_mut(),
        battle.options.speed_tie_resolution,
    );
    log::debug!("Residual has {} listeners", listeners.len());

    for listener in listeners {
        if battle.ended() {
            break;
        }
        if !still_attached(battle, &listener) {
            continue;
        }
        // Slot conditions belong to the slot, so they keep counting down while the slot is empty
        // or its occupant has fainted. Their handlers only run for a healthy occupant.
        let slot_condition = matches!(listener.origin, EffectOrigin::SlotCondition(..));
        let occupied = match listener.holder.mon() {
            Some(mon) => {
                let mon = battle.mon(mon)?;
                mon.active && mon.is_alive()
            }
            None => !slot_condition,
        };
        if !occupied && !slot_condition {
            continue;
        }

        let expired = battle
            .applied_effect_mut(&listener.origin)
            .is_some_and(|applied| applied.state.tick_duration());
        if expired {
            core_battle_actions::end_effect(battle, &listener.origin)?;
        } else if listener.descriptor.is_some() && occupied {
            let source = battle
                .applied_effect(&listener.origin)
                .and_then(|applied| applied.state.source());
            let trigger = EventTrigger::new(listener.holder)
                .with_source(source)
                .with_relay(RelayValue::Void);
            push_frame(battle, listener.identity)?;
            let result = run_listeners(battle, vec![listener], &trigger);
            pop_frame(battle, result)?;
        }
        core_battle_actions::faint_messages(battle)?;
    }
    Ok(())
}

struct MonSpeed {
    mon: MonHandle,
    speed: u32,
}

impl SpeedOrderable for MonSpeed {
    fn order(&self) -> Option<u32> {
        None
    }

    fn priority(&self) -> i32 {
        0
    }

    fn speed(&self) -> u32 {
        self.speed
    }
}

/// Runs an event on every active Mon, fastest first.
pub fn run_each_event(battle: &mut CoreBattle, kind: EventKind) -> Result<()> {
    let mut mons = battle
        .healthy_active_mon_handles()
        .map(|mon| MonSpeed {
            mon,
            speed: holder_speed(battle, EventTarget::Mon(mon)),
        })
        .collect::<Vec<_>>();
    speed_sort(
        &mut mons,
        battle.prng.as_mut(),
        battle.options.speed_tie_resolution,
    );
    for MonSpeed { mon, .. } in mons {
        if battle.mon(mon)?.is_alive() {
            run_event(battle, kind, EventTrigger::mon(mon).with_relay(RelayValue::Void))?;
        }
    }
    Ok(())
}
