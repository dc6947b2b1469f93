use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{
    broadcast,
    watch,
};

use crate::{
    battle::{
        Action,
        ActionChoice,
        BattleOptions,
        BattleQueue,
        Choice,
        ChoiceRequest,
        ChoiceResponse,
        ChoiceTransport,
        EngineOptions,
        EventBurst,
        EventPublisher,
        EventTrigger,
        Field,
        FieldAction,
        LegalOption,
        Mon,
        MonHandle,
        MonPerspective,
        MoveAction,
        Perspective,
        RequestKind,
        Side,
        SidePerspective,
        SwitchAction,
        TeamAction,
        core_battle_actions,
        core_battle_effects,
    },
    common::{
        Fraction,
        Id,
    },
    dex::EffectLookup,
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
        configuration_error,
        general_error,
    },
    log::{
        EventLog,
        LogEntry,
    },
    log_event,
    rng::PseudoRandomNumberGenerator,
};

/// The state of the turn loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    NotStarted,
    /// Waiting for every side with a request to choose.
    AwaitingChoices,
    /// Turning choices into ordered actions.
    Scheduling,
    /// Running actions off the front of the queue.
    Executing,
    TurnComplete,
    BattleEnded,
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    /// The side at the index won.
    Win(usize),
    Tie,
}

/// One event in the stack of running events.
#[derive(Debug)]
pub(crate) struct EventFrame {
    pub identity: EventIdentity,
    /// 4096-based multiplier applied to an integer result.
    pub modifier: u32,
}

/// The core of a battle: every Mon, side and field effect, the action queue and the turn loop.
///
/// A battle is driven by one thread. Choices are collected through [`Self::set_choice`] or a
/// [`ChoiceTransport`], and [`Self::continue_battle`] runs the battle until the next request.
pub struct CoreBattle {
    pub(crate) options: BattleOptions,
    pub(crate) prng: Box<dyn PseudoRandomNumberGenerator>,
    pub(crate) dex: Arc<dyn EffectLookup>,
    pub(crate) log: EventLog,
    pub(crate) mons: Vec<Mon>,
    pub(crate) sides: Vec<Side>,
    pub(crate) field: Field,
    pub(crate) rules: Vec<AppliedEffect>,
    pub(crate) queue: BattleQueue,
    pub(crate) event_stack: Vec<EventFrame>,

    turn: u32,
    phase: BattlePhase,
    outcome: Option<BattleOutcome>,
    next_effect_order: u32,
    publisher: EventPublisher,
    faulted: bool,
}

impl CoreBattle {
    /// Creates a battle with no sides.
    ///
    /// Use [`BattleBuilder`][`crate::battle::BattleBuilder`] to create a complete battle.
    pub(crate) fn new(
        options: BattleOptions,
        engine_options: EngineOptions,
        dex: Arc<dyn EffectLookup>,
    ) -> Result<Self> {
        options.validate()?;
        let prng = (engine_options.rng_factory)(options.seed);
        let publisher = EventPublisher::new(options.observer_capacity);
        let mut battle = Self {
            options,
            prng,
            dex,
            log: EventLog::new(),
            mons: Vec::new(),
            sides: Vec::new(),
            field: Field::default(),
            rules: Vec::new(),
            queue: BattleQueue::new(),
            event_stack: Vec::new(),
            turn: 0,
            phase: BattlePhase::NotStarted,
            outcome: None,
            next_effect_order: 0,
            publisher,
            faulted: false,
        };
        for rule in battle.options.rules.clone() {
            let effect = battle.lookup_effect(&rule)?;
            let state = EffectState::new(battle.next_effect_order());
            battle.rules.push(AppliedEffect::new(effect, state));
        }
        Ok(battle)
    }

    /// Adds a side with its Mons.
    pub(crate) fn add_side(&mut self, name: String, mons: Vec<Mon>) -> usize {
        let index = self.sides.len();
        let mut side = Side::new(index, name);
        for mut mon in mons {
            let handle = MonHandle::new(self.mons.len());
            mon.side = index;
            mon.team_position = side.team.len();
            side.team.push(handle);
            self.mons.push(mon);
        }
        self.sides.push(side);
        index
    }

    pub fn options(&self) -> &BattleOptions {
        &self.options
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn started(&self) -> bool {
        self.phase != BattlePhase::NotStarted
    }

    pub fn ended(&self) -> bool {
        self.phase == BattlePhase::BattleEnded
    }

    /// The battle log.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Adds a line to the battle log.
    pub fn log_entry(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }

    /// Subscribes to bursts of log lines, one per executed action.
    pub fn subscribe(&self) -> broadcast::Receiver<EventBurst> {
        self.publisher.subscribe()
    }

    /// Watches the latest public perspective of the battle.
    pub fn watch_perspective(&self) -> watch::Receiver<Perspective> {
        self.publisher.watch_perspective()
    }

    pub fn prng_mut(&mut self) -> &mut dyn PseudoRandomNumberGenerator {
        self.prng.as_mut()
    }

    pub fn dex(&self) -> &Arc<dyn EffectLookup> {
        &self.dex
    }

    /// Looks up an effect, failing if it does not exist.
    pub fn lookup_effect(&self, id: &Id) -> Result<Arc<EffectDefinition>> {
        self.dex.effect(id).wrap_not_found_error(id)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn mon(&self, mon: MonHandle) -> Result<&Mon> {
        self.mons.get(mon.index()).wrap_not_found_error(format_args!("mon {mon}"))
    }

    pub fn mon_mut(&mut self, mon: MonHandle) -> Result<&mut Mon> {
        self.mons
            .get_mut(mon.index())
            .wrap_not_found_error(format_args!("mon {mon}"))
    }

    pub fn side(&self, side: usize) -> Result<&Side> {
        self.sides
            .get(side)
            .wrap_not_found_error(format_args!("side {side}"))
    }

    pub fn side_mut(&mut self, side: usize) -> Result<&mut Side> {
        self.sides
            .get_mut(side)
            .wrap_not_found_error(format_args!("side {side}"))
    }

    pub fn sides(&self) -> impl Iterator<Item = &Side> {
        self.sides.iter()
    }

    /// Handles of every active Mon, in side order.
    pub fn active_mon_handles(&self) -> impl Iterator<Item = MonHandle> + '_ {
        self.sides.iter().filter_map(|side| side.active)
    }

    /// Handles of active Mons that have not fainted.
    pub fn healthy_active_mon_handles(&self) -> impl Iterator<Item = MonHandle> + '_ {
        self.active_mon_handles()
            .filter(|mon| self.mons.get(mon.index()).is_some_and(|mon| mon.is_alive()))
    }

    /// Returns the next effect order, used to order effects by when they were applied.
    pub fn next_effect_order(&mut self) -> u32 {
        let order = self.next_effect_order;
        self.next_effect_order += 1;
        order
    }

    /// The applied effect at the origin, if it is still attached.
    pub fn applied_effect(&self, origin: &EffectOrigin) -> Option<&AppliedEffect> {
        match origin {
            EffectOrigin::MonAbility(mon) => self.mons.get(mon.index())?.ability.as_ref(),
            EffectOrigin::MonItem(mon) => self.mons.get(mon.index())?.item.as_ref(),
            EffectOrigin::MonStatus(mon) => self.mons.get(mon.index())?.status.as_ref(),
            EffectOrigin::MonVolatile(mon, id) => self.mons.get(mon.index())?.volatiles.get(id),
            EffectOrigin::SideCondition(side, id) => self.sides.get(*side)?.conditions.get(id),
            EffectOrigin::SlotCondition(side, id) => {
                self.sides.get(*side)?.slot_conditions.get(id)
            }
            EffectOrigin::Weather => self.field.weather.as_ref(),
            EffectOrigin::Terrain => self.field.terrain.as_ref(),
            EffectOrigin::PseudoWeather(id) => self.field.pseudo_weather.get(id),
            EffectOrigin::Rule(id) => self.rules.iter().find(|rule| rule.id() == id),
            EffectOrigin::SourceEffect => None,
        }
    }

    pub fn applied_effect_mut(&mut self, origin: &EffectOrigin) -> Option<&mut AppliedEffect> {
        match origin {
            EffectOrigin::MonAbility(mon) => self.mons.get_mut(mon.index())?.ability.as_mut(),
            EffectOrigin::MonItem(mon) => self.mons.get_mut(mon.index())?.item.as_mut(),
            EffectOrigin::MonStatus(mon) => self.mons.get_mut(mon.index())?.status.as_mut(),
            EffectOrigin::MonVolatile(mon, id) => {
                self.mons.get_mut(mon.index())?.volatiles.get_mut(id)
            }
            EffectOrigin::SideCondition(side, id) => {
                self.sides.get_mut(*side)?.conditions.get_mut(id)
            }
            EffectOrigin::SlotCondition(side, id) => {
                self.sides.get_mut(*side)?.slot_conditions.get_mut(id)
            }
            EffectOrigin::Weather => self.field.weather.as_mut(),
            EffectOrigin::Terrain => self.field.terrain.as_mut(),
            EffectOrigin::PseudoWeather(id) => self.field.pseudo_weather.get_mut(id),
            EffectOrigin::Rule(id) => self.rules.iter_mut().find(|rule| rule.id() == id),
            EffectOrigin::SourceEffect => None,
        }
    }

    /// Detaches the applied effect at the origin, without running any of its handlers.
    pub fn remove_applied_effect(&mut self, origin: &EffectOrigin) -> Option<AppliedEffect> {
        match origin {
            EffectOrigin::MonAbility(mon) => self.mons.get_mut(mon.index())?.ability.take(),
            EffectOrigin::MonItem(mon) => self.mons.get_mut(mon.index())?.item.take(),
            EffectOrigin::MonStatus(mon) => self.mons.get_mut(mon.index())?.status.take(),
            EffectOrigin::MonVolatile(mon, id) => {
                self.mons.get_mut(mon.index())?.volatiles.shift_remove(id)
            }
            EffectOrigin::SideCondition(side, id) => {
                self.sides.get_mut(*side)?.conditions.shift_remove(id)
            }
            EffectOrigin::SlotCondition(side, id) => {
                self.sides.get_mut(*side)?.slot_conditions.shift_remove(id)
            }
            EffectOrigin::Weather => self.field.weather.take(),
            EffectOrigin::Terrain => self.field.terrain.take(),
            EffectOrigin::PseudoWeather(id) => self.field.pseudo_weather.shift_remove(id),
            EffectOrigin::Rule(id) => {
                let index = self.rules.iter().position(|rule| rule.id() == id)?;
                Some(self.rules.remove(index))
            }
            EffectOrigin::SourceEffect => None,
        }
    }

    /// Chains a multiplier onto the innermost running event.
    ///
    /// The accumulated multiplier is applied when the event finishes with an integer result.
    pub fn chain_modify(&mut self, fraction: Fraction) -> Result<()> {
        let frame = self
            .event_stack
            .last_mut()
            .wrap_expectation("cannot chain a modifier outside of an event")?;
        let next = fraction.to_modifier() as u64;
        frame.modifier = ((frame.modifier as u64 * next + 2048) >> 12) as u32;
        log::trace!(
            "{} modifier is now {}/4096",
            frame.identity,
            frame.modifier
        );
        Ok(())
    }

    /// A public snapshot of the battle.
    pub fn perspective(&self) -> Perspective {
        let sides = self
            .sides
            .iter()
            .map(|side| SidePerspective {
                name: side.name.clone(),
                active: side
                    .active
                    .and_then(|mon| self.mons.get(mon.index()))
                    .map(|mon| MonPerspective {
                        name: mon.name.clone(),
                        hp: mon.hp,
                        max_hp: mon.max_hp,
                        status: mon.status_id().cloned(),
                    }),
                remaining: side
                    .team
                    .iter()
                    .filter(|mon| self.mons.get(mon.index()).is_some_and(|mon| !mon.fainted))
                    .count(),
                conditions: side.conditions.keys().cloned().collect(),
            })
            .collect();
        Perspective {
            turn: self.turn,
            sides,
            weather: self.field.weather_id().cloned(),
            terrain: self.field.terrain_id().cloned(),
            ended: self.ended(),
        }
    }

    /// Schedules an action in the running turn, ordered among the pending actions.
    ///
    /// Handlers use this to add work mid-turn, such as a transformation before moves run.
    pub fn queue_action(&mut self, action: Action) {
        log::trace!("queueing action {action}");
        self.queue.insert_action_into_sorted_position(action);
    }

    /// Requests that sides must answer before the battle continues.
    pub fn requests(&self) -> impl Iterator<Item = &ChoiceRequest> {
        self.sides.iter().filter_map(|side| side.request.as_ref())
    }

    pub fn request_for_side(&self, side: usize) -> Option<&ChoiceRequest> {
        self.sides.get(side).and_then(|side| side.request.as_ref())
    }

    /// Sets the choice of a side for its pending request.
    ///
    /// Choices outside of the request's legal options are rejected with a
    /// [`ValidationError`][`crate::error::ValidationError`].
    pub fn set_choice(&mut self, side: usize, choice: Choice) -> Result<()> {
        let side = self.side_mut(side)?;
        let request = side
            .request
            .as_ref()
            .wrap_expectation_with_format(format_args!("side {} has no request", side.index))?;
        choice.validate(request)?;
        side.choice = Some(choice);
        Ok(())
    }

    /// Has every side with a request made its choice?
    pub fn ready_to_continue(&self) -> bool {
        self.sides
            .iter()
            .all(|side| side.request.is_none() || side.choice.is_some())
    }

    /// Starts the battle.
    pub fn start(&mut self) -> Result<()> {
        if self.started() {
            return Err(general_error("battle has already started"));
        }
        if self.sides.len() != 2 {
            return Err(configuration_error(format!(
                "battle needs 2 sides, found {}",
                self.sides.len()
            )));
        }
        self.log_entry(log_event!("info", ("battletype", "Singles")));
        for side in 0..self.sides.len() {
            let entry = log_event!(
                "side",
                ("side", side),
                ("name", &self.sides[side].name),
                ("teamsize", self.sides[side].team.len())
            );
            self.log_entry(entry);
        }

        if self.options.team_preview {
            self.log_entry(log_event!("teampreview"));
            self.guarded(|battle| battle.make_requests(RequestKind::Team))?;
            self.publish_burst();
            return Ok(());
        }

        self.queue
            .add_action(FieldAction::new(ActionChoice::Start)?.into());
        self.guarded(|battle| battle.run_queue())
    }

    /// Continues the battle with the choices made so far.
    pub fn continue_battle(&mut self) -> Result<()> {
        if self.faulted {
            return Err(general_error("battle cannot continue after a fault"));
        }
        if !self.started() {
            return Err(general_error("battle has not started"));
        }
        if self.ended() {
            return Err(general_error("battle has already ended"));
        }
        if !self.ready_to_continue() {
            return Err(general_error(
                "cannot continue: every side has not made a choice",
            ));
        }
        self.guarded(|battle| {
            battle.commit_choices()?;
            battle.run_queue()
        })
    }

    /// Collects a choice for every pending request through the transport, then continues.
    ///
    /// A cancelled or invalid response is replaced by the first legal option.
    pub fn run_turn(&mut self, transport: &mut dyn ChoiceTransport) -> Result<()> {
        if !self.started() {
            self.start()?;
            if self.ended() {
                return Ok(());
            }
        }
        let requests = self.requests().cloned().collect::<Vec<_>>();
        for request in requests {
            let choice = match transport.request_choice(&request) {
                ChoiceResponse::Choice(choice) => match choice.validate(&request) {
                    Ok(()) => Some(choice),
                    Err(error) => {
                        log::warn!("side {} chose {choice}: {error}", request.side);
                        None
                    }
                },
                ChoiceResponse::Cancelled => {
                    log::warn!("choice for side {} was cancelled", request.side);
                    None
                }
            };
            let choice = match choice {
                Some(choice) => choice,
                None => Choice::default_for(&request).wrap_expectation_with_format(
                    format_args!("request for side {} has no legal options", request.side),
                )?,
            };
            self.set_choice(request.side, choice)?;
        }
        self.continue_battle()
    }

    /// Runs turns until the battle ends.
    pub fn run_to_completion(
        &mut self,
        transport: &mut dyn ChoiceTransport,
    ) -> Result<BattleOutcome> {
        while !self.ended() {
            self.run_turn(transport)?;
        }
        self.outcome
            .wrap_expectation("battle ended without an outcome")
    }

    /// Runs the function, marking the battle as faulted if it fails.
    ///
    /// A fault leaves the battle in no consistent state, so it never continues afterwards.
    fn guarded<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let result = f(self);
        if let Err(error) = &result {
            log::debug!("battle faulted: {error:#}");
            self.faulted = true;
            self.event_stack.clear();
            self.queue.clear();
        }
        result
    }

    fn commit_choices(&mut self) -> Result<()> {
        self.phase = BattlePhase::Scheduling;
        let mut kind = None;
        for side in 0..self.sides.len() {
            let (request, choice) = {
                let side = &mut self.sides[side];
                (side.request.take(), side.choice.take())
            };
            let (Some(request), Some(choice)) = (request, choice) else {
                continue;
            };
            kind = Some(request.kind);
            self.add_choice_actions(side, choice)?;
        }
        match kind {
            Some(RequestKind::Turn) => {
                self.queue
                    .add_action(FieldAction::new(ActionChoice::BeforeTurn)?.into());
                self.queue
                    .add_action(FieldAction::new(ActionChoice::Residual)?.into());
            }
            Some(RequestKind::Team) => {
                self.queue
                    .add_action(FieldAction::new(ActionChoice::Start)?.into());
            }
            _ => (),
        }
        Ok(())
    }

    fn add_choice_actions(&mut self, side: usize, choice: Choice) -> Result<()> {
        match choice {
            Choice::Move { slot } => {
                let mon = self
                    .side(side)?
                    .active
                    .wrap_expectation_with_format(format_args!("side {side} has no active mon"))?;
                let move_id = self
                    .mon(mon)?
                    .move_slots
                    .get(slot)
                    .wrap_not_found_error(format_args!("move slot {slot}"))?
                    .id
                    .clone();
                let target = self.side(self.side(side)?.foe_index())?.active;
                let priority = core_battle_actions::move_priority(self, mon, &move_id)?;
                let speed = self.mon(mon)?.speed;
                let action = MoveAction::new(ActionChoice::Move, mon, slot, move_id, target)?;
                self.queue.add_action(
                    Action::from(action)
                        .with_priority(priority)
                        .with_speed(speed),
                );
            }
            Choice::Switch { slot } => {
                let incoming = self
                    .side(side)?
                    .mon_at(slot)
                    .wrap_not_found_error(format_args!("team position {slot}"))?;
                let outgoing = self.side(side)?.active;
                let speed = match outgoing {
                    Some(mon) => self.mon(mon)?.speed,
                    None => self.mon(incoming)?.speed,
                };
                let action = SwitchAction::new(ActionChoice::Switch, outgoing, incoming)?;
                self.queue.add_action(Action::from(action).with_speed(speed));
            }
            Choice::Team { order } => {
                for (index, position) in order.into_iter().enumerate() {
                    let mon = self
                        .side(side)?
                        .mon_at(position)
                        .wrap_not_found_error(format_args!("team position {position}"))?;
                    let speed = self.mon(mon)?.speed;
                    let action = TeamAction::new(ActionChoice::Team, mon, index)?;
                    self.queue.add_action(Action::from(action).with_speed(speed));
                }
            }
        }
        Ok(())
    }

    fn run_queue(&mut self) -> Result<()> {
        self.phase = BattlePhase::Scheduling;
        self.update_speed()?;

        self.phase = BattlePhase::Executing;
        while let Some(action) = self.queue.pop_front() {
            self.run_action(action)?;
            if !core_battle_actions::faint_messages(self)? {
                core_battle_effects::run_each_event(self, EventKind::Update)?;
            }
            self.publish_burst();
            if self.ended() {
                return Ok(());
            }
        }

        if !self.make_switch_requests()? {
            self.next_turn()?;
        }
        self.publish_burst();
        Ok(())
    }

    fn run_action(&mut self, action: Action) -> Result<()> {
        log::trace!("running action {action}");
        match action {
            Action::Field(action) => match action.choice {
                ActionChoice::Start => {
                    self.log_entry(log_event!("start"));
                    for side in 0..self.sides.len() {
                        let lead = self.sides[side]
                            .team
                            .iter()
                            .find(|mon| self.mons.get(mon.index()).is_some_and(|mon| mon.is_alive()))
                            .cloned();
                        if let Some(lead) = lead {
                            core_battle_actions::switch_in(self, side, lead, false)?;
                        }
                    }
                }
                ActionChoice::BeforeTurn => {
                    core_battle_effects::run_each_event(self, EventKind::BeforeTurn)?;
                }
                ActionChoice::Residual => {
                    self.log_entry(log_event!("residual"));
                    core_battle_effects::run_residual_event(self)?;
                }
                ActionChoice::Pass => (),
                choice => {
                    return Err(general_error(format!("{choice} is not a field action")));
                }
            },
            Action::Team(action) => {
                let side = self.mon(action.mon)?.side;
                let slot = self
                    .side_mut(side)?
                    .team
                    .get_mut(action.index)
                    .wrap_not_found_error(format_args!("team position {}", action.index))?;
                *slot = action.mon;
                self.mon_mut(action.mon)?.team_position = action.index;
            }
            Action::Switch(action) => {
                if action.choice == ActionChoice::RevivalBlessing {
                    core_battle_actions::revive(self, action.target)?;
                } else {
                    let side = self.mon(action.target)?.side;
                    core_battle_actions::switch(
                        self,
                        side,
                        action.target,
                        action.choice == ActionChoice::InstaSwitch,
                    )?;
                }
            }
            Action::Move(action) => {
                let mon = self.mon(action.mon)?;
                if !mon.active || !mon.is_alive() {
                    return Ok(());
                }
                core_battle_actions::use_move(self, action.mon, action.move_slot, action.target)?;
            }
            Action::Pokemon(action) => match action.choice {
                ActionChoice::RunSwitch => core_battle_actions::run_switch(self, action.mon)?,
                ActionChoice::Event | ActionChoice::MegaEvo | ActionChoice::Terastallize => {
                    if !self.mon(action.mon)?.is_alive() {
                        return Ok(());
                    }
                    if action.choice != ActionChoice::Event {
                        let entry = log_event!(
                            action.choice.to_string().to_lowercase(),
                            ("mon", &self.mon(action.mon)?.name)
                        );
                        self.log_entry(entry);
                    }
                    if let Some(event) = action.event {
                        core_battle_effects::run_event(self, event, EventTrigger::mon(action.mon))?;
                    }
                }
                choice => {
                    return Err(general_error(format!("{choice} is not a pokemon action")));
                }
            },
        }
        Ok(())
    }

    /// Recalculates the speed of every active Mon and re-sorts the queue.
    fn update_speed(&mut self) -> Result<()> {
        for mon in self.healthy_active_mon_handles().collect::<Vec<_>>() {
            let base = self.mon(mon)?.stats.spe;
            let speed = core_battle_effects::run_event(
                self,
                EventKind::ModifySpe,
                EventTrigger::mon(mon).with_relay(base),
            )?
            .amount_or(base);
            self.mon_mut(mon)?.speed = speed;
        }
        let mons = &self.mons;
        self.queue.update_speed(
            |mon| mons.get(mon.index()).map(|mon| mon.speed),
            self.prng.as_mut(),
            self.options.speed_tie_resolution,
        );
        Ok(())
    }

    fn legal_switches(&self, side: usize) -> Result<Vec<LegalOption>> {
        let side = self.side(side)?;
        Ok(side
            .team
            .iter()
            .enumerate()
            .filter(|(_, mon)| {
                Some(**mon) != side.active
                    && self.mons.get(mon.index()).is_some_and(|mon| mon.is_alive())
            })
            .map(|(slot, _)| LegalOption::Switch { slot })
            .collect())
    }

    fn legal_options(&mut self, side: usize, kind: RequestKind) -> Result<Vec<LegalOption>> {
        match kind {
            RequestKind::Team => Ok(vec![LegalOption::Team {
                size: self.side(side)?.team.len(),
            }]),
            RequestKind::Switch => self.legal_switches(side),
            RequestKind::Turn => {
                let active = match self.side(side)?.active {
                    Some(mon) if self.mon(mon)?.is_alive() => mon,
                    _ => return Ok(Vec::new()),
                };
                for slot in &mut self.mon_mut(active)?.move_slots {
                    slot.disabled = false;
                }
                core_battle_effects::run_event(
                    self,
                    EventKind::DisableMove,
                    EventTrigger::mon(active).with_relay(RelayValue::Void),
                )?;
                let mut options = self
                    .mon(active)?
                    .usable_move_slots()
                    .map(|slot| LegalOption::Move { slot })
                    .collect::<Vec<_>>();
                let trapped = core_battle_effects::run_event(
                    self,
                    EventKind::TrapMon,
                    EventTrigger::mon(active).with_relay(false),
                )?
                .boolean()
                    == Some(true);
                if !trapped {
                    options.extend(self.legal_switches(side)?);
                }
                Ok(options)
            }
        }
    }

    fn make_requests(&mut self, kind: RequestKind) -> Result<()> {
        for side in 0..self.sides.len() {
            let options = self.legal_options(side, kind)?;
            if options.is_empty() {
                continue;
            }
            let request = ChoiceRequest {
                side,
                kind,
                options,
                perspective: self.perspective(),
            };
            self.side_mut(side)?.request = Some(request);
        }
        self.phase = BattlePhase::AwaitingChoices;
        Ok(())
    }

    /// Requests a replacement for every fainted active Mon that has a healthy teammate.
    fn make_switch_requests(&mut self) -> Result<bool> {
        let mut requested = false;
        for side in 0..self.sides.len() {
            let needs_switch = match self.sides[side].active {
                Some(mon) => !self.mon(mon)?.is_alive(),
                None => true,
            };
            if !needs_switch {
                continue;
            }
            let options = self.legal_switches(side)?;
            if options.is_empty() {
                continue;
            }
            let request = ChoiceRequest {
                side,
                kind: RequestKind::Switch,
                options,
                perspective: self.perspective(),
            };
            self.side_mut(side)?.request = Some(request);
            requested = true;
        }
        if requested {
            self.phase = BattlePhase::AwaitingChoices;
        }
        Ok(requested)
    }

    fn next_turn(&mut self) -> Result<()> {
        self.phase = BattlePhase::TurnComplete;
        self.turn += 1;
        if self.turn > self.options.max_turns {
            self.log_entry(log_event!("turnlimit"));
            self.end(BattleOutcome::Tie);
            return Ok(());
        }
        for mon in self.active_mon_handles().collect::<Vec<_>>() {
            self.mon_mut(mon)?.active_turns += 1;
        }
        let turn = self.turn;
        self.log_entry(log_event!("turn", ("turn", turn)));
        self.make_requests(RequestKind::Turn)
    }

    /// Ends the battle if a side has no Mons left.
    ///
    /// Returns true if the battle is over.
    pub(crate) fn check_win(&mut self) -> bool {
        if self.ended() {
            return true;
        }
        let defeated = self
            .sides
            .iter()
            .map(|side| {
                side.team
                    .iter()
                    .all(|mon| self.mons.get(mon.index()).is_none_or(|mon| mon.fainted))
            })
            .collect::<Vec<_>>();
        let outcome = match defeated.as_slice() {
            [true, true] => BattleOutcome::Tie,
            [true, false] => BattleOutcome::Win(1),
            [false, true] => BattleOutcome::Win(0),
            _ => return false,
        };
        self.end(outcome);
        true
    }

    fn end(&mut self, outcome: BattleOutcome) {
        match outcome {
            BattleOutcome::Win(side) => self.log_entry(log_event!("win", ("side", side))),
            BattleOutcome::Tie => self.log_entry(log_event!("tie")),
        }
        self.outcome = Some(outcome);
        self.phase = BattlePhase::BattleEnded;
        self.queue.clear();
        for side in &mut self.sides {
            side.request = None;
            side.choice = None;
        }
    }

    fn publish_burst(&mut self) {
        if !self.log.has_new_messages() {
            return;
        }
        let lines = self
            .log
            .read_out()
            .map(|line| line.to_owned())
            .collect::<Vec<_>>();
        let perspective = self.perspective();
        self.publisher.publish(EventBurst { lines, perspective });
    }
}
