use std::{
    fmt,
    fmt::Display,
};

use anyhow::Result;
use serde_string_enum::{
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
};

use crate::{
    battle::{
        MonHandle,
        SpeedOrderable,
    },
    common::Id,
    effect::EventKind,
    error::configuration_error,
};

/// The tag of a scheduled action, naming what the action does.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum ActionChoice {
    #[string = "move"]
    Move,
    #[string = "beforeTurnMove"]
    BeforeTurnMove,
    #[string = "priorityChargeMove"]
    PriorityChargeMove,
    #[string = "switch"]
    Switch,
    /// A switch that happens immediately, such as replacing a Mon dragged out mid-turn.
    #[string = "instaswitch"]
    InstaSwitch,
    #[string = "revivalblessing"]
    RevivalBlessing,
    #[string = "team"]
    Team,
    #[string = "start"]
    Start,
    #[string = "residual"]
    Residual,
    #[string = "pass"]
    Pass,
    #[string = "beforeTurn"]
    BeforeTurn,
    #[string = "megaEvo"]
    MegaEvo,
    #[string = "terastallize"]
    Terastallize,
    #[string = "runSwitch"]
    RunSwitch,
    #[string = "event"]
    Event,
}

impl ActionChoice {
    /// The fixed rank actions with this tag are scheduled with.
    pub fn default_order(&self) -> Option<u32> {
        match self {
            Self::Team => Some(1),
            Self::Start => Some(2),
            Self::InstaSwitch => Some(3),
            Self::BeforeTurn => Some(4),
            Self::BeforeTurnMove => Some(5),
            Self::RevivalBlessing => Some(6),
            Self::RunSwitch => Some(101),
            Self::Switch => Some(103),
            Self::MegaEvo => Some(104),
            Self::Terastallize => Some(106),
            Self::PriorityChargeMove => Some(107),
            Self::Move | Self::Event => Some(200),
            Self::Residual => Some(300),
            Self::Pass => None,
        }
    }
}

/// The largest fixed rank an action may have.
pub const MAX_ACTION_ORDER: u32 = 999;

/// Keys that decide when an action runs relative to the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKeys {
    pub order: Option<u32>,
    pub priority: i32,
    pub speed: u32,
    pub sub_order: u32,
    /// Assigned by the queue when the action is inserted.
    pub effect_order: u32,
}

impl OrderKeys {
    fn for_choice(choice: ActionChoice) -> Self {
        Self {
            order: choice.default_order(),
            priority: 0,
            speed: 0,
            sub_order: 0,
            effect_order: 0,
        }
    }
}

fn check_choice(kind: &str, choice: ActionChoice, allowed: &[ActionChoice]) -> Result<()> {
    if allowed.contains(&choice) {
        Ok(())
    } else {
        Err(configuration_error(format!(
            "{choice} is not a valid choice for a {kind} action"
        )))
    }
}

/// A move action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveAction {
    pub choice: ActionChoice,
    pub mon: MonHandle,
    pub move_slot: usize,
    pub move_id: Id,
    pub target: Option<MonHandle>,
    pub keys: OrderKeys,
}

impl MoveAction {
    pub const CHOICES: &'static [ActionChoice] = &[
        ActionChoice::Move,
        ActionChoice::BeforeTurnMove,
        ActionChoice::PriorityChargeMove,
    ];

    pub fn new(
        choice: ActionChoice,
        mon: MonHandle,
        move_slot: usize,
        move_id: Id,
        target: Option<MonHandle>,
    ) -> Result<Self> {
        check_choice("move", choice, Self::CHOICES)?;
        Ok(Self {
            choice,
            mon,
            move_slot,
            move_id,
            target,
            keys: OrderKeys::for_choice(choice),
        })
    }
}

/// A switch action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchAction {
    pub choice: ActionChoice,
    /// The Mon leaving the field, if any.
    pub mon: Option<MonHandle>,
    /// The Mon coming in.
    pub target: MonHandle,
    pub keys: OrderKeys,
}

impl SwitchAction {
    pub const CHOICES: &'static [ActionChoice] = &[
        ActionChoice::Switch,
        ActionChoice::InstaSwitch,
        ActionChoice::RevivalBlessing,
    ];

    pub fn new(choice: ActionChoice, mon: Option<MonHandle>, target: MonHandle) -> Result<Self> {
        check_choice("switch", choice, Self::CHOICES)?;
        Ok(Self {
            choice,
            mon,
            target,
            keys: OrderKeys::for_choice(choice),
        })
    }
}

/// A Team Preview action, placing a Mon at a team position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAction {
    pub choice: ActionChoice,
    pub mon: MonHandle,
    pub index: usize,
    pub keys: OrderKeys,
}

impl TeamAction {
    pub const CHOICES: &'static [ActionChoice] = &[ActionChoice::Team];

    pub fn new(choice: ActionChoice, mon: MonHandle, index: usize) -> Result<Self> {
        check_choice("team", choice, Self::CHOICES)?;
        let mut keys = OrderKeys::for_choice(choice);
        // Earlier positions are placed first.
        keys.priority = -(index as i32);
        Ok(Self {
            choice,
            mon,
            index,
            keys,
        })
    }
}

/// An action on the whole battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAction {
    pub choice: ActionChoice,
    pub keys: OrderKeys,
}

impl FieldAction {
    pub const CHOICES: &'static [ActionChoice] = &[
        ActionChoice::Start,
        ActionChoice::Residual,
        ActionChoice::Pass,
        ActionChoice::BeforeTurn,
    ];

    pub fn new(choice: ActionChoice) -> Result<Self> {
        check_choice("field", choice, Self::CHOICES)?;
        let mut keys = OrderKeys::for_choice(choice);
        keys.speed = 1;
        Ok(Self { choice, keys })
    }
}

/// An action on a single Mon that is not a move or a switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonAction {
    pub choice: ActionChoice,
    pub mon: MonHandle,
    /// The event to run, for `event` actions.
    pub event: Option<EventKind>,
    pub keys: OrderKeys,
}

impl PokemonAction {
    pub const CHOICES: &'static [ActionChoice] = &[
        ActionChoice::MegaEvo,
        ActionChoice::Terastallize,
        ActionChoice::RunSwitch,
        ActionChoice::Event,
    ];

    pub fn new(choice: ActionChoice, mon: MonHandle) -> Result<Self> {
        check_choice("pokemon", choice, Self::CHOICES)?;
        Ok(Self {
            choice,
            mon,
            event: None,
            keys: OrderKeys::for_choice(choice),
        })
    }

    /// An action that runs the event on the Mon.
    pub fn event(mon: MonHandle, event: EventKind) -> Result<Self> {
        Ok(Self::new(ActionChoice::Event, mon)?.with_event(event))
    }

    /// Runs the event on the Mon when the action runs.
    pub fn with_event(mut self, event: EventKind) -> Self {
        self.event = Some(event);
        self
    }
}

/// A single unit of turn work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(MoveAction),
    Switch(SwitchAction),
    Team(TeamAction),
    Field(FieldAction),
    Pokemon(PokemonAction),
}

impl Action {
    pub fn choice(&self) -> ActionChoice {
        match self {
            Self::Move(action) => action.choice,
            Self::Switch(action) => action.choice,
            Self::Team(action) => action.choice,
            Self::Field(action) => action.choice,
            Self::Pokemon(action) => action.choice,
        }
    }

    pub fn keys(&self) -> &OrderKeys {
        match self {
            Self::Move(action) => &action.keys,
            Self::Switch(action) => &action.keys,
            Self::Team(action) => &action.keys,
            Self::Field(action) => &action.keys,
            Self::Pokemon(action) => &action.keys,
        }
    }

    pub fn keys_mut(&mut self) -> &mut OrderKeys {
        match self {
            Self::Move(action) => &mut action.keys,
            Self::Switch(action) => &mut action.keys,
            Self::Team(action) => &mut action.keys,
            Self::Field(action) => &mut action.keys,
            Self::Pokemon(action) => &mut action.keys,
        }
    }

    /// The Mon acting, if any.
    pub fn mon(&self) -> Option<MonHandle> {
        match self {
            Self::Move(action) => Some(action.mon),
            Self::Switch(action) => action.mon,
            Self::Team(action) => Some(action.mon),
            Self::Field(_) => None,
            Self::Pokemon(action) => Some(action.mon),
        }
    }

    /// Overrides the fixed rank.
    pub fn with_order(mut self, order: u32) -> Result<Self> {
        if !(1..=MAX_ACTION_ORDER).contains(&order) {
            return Err(configuration_error(format!(
                "action order {order} is outside 1..={MAX_ACTION_ORDER}"
            )));
        }
        self.keys_mut().order = Some(order);
        Ok(self)
    }

    /// Removes the fixed rank, so the action runs after every ranked action.
    pub fn without_order(mut self) -> Self {
        self.keys_mut().order = None;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.keys_mut().priority = priority;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.keys_mut().speed = speed;
        self
    }

    pub fn with_sub_order(mut self, sub_order: u32) -> Self {
        self.keys_mut().sub_order = sub_order;
        self
    }
}

impl From<MoveAction> for Action {
    fn from(value: MoveAction) -> Self {
        Self::Move(value)
    }
}

impl From<SwitchAction> for Action {
    fn from(value: SwitchAction) -> Self {
        Self::Switch(value)
    }
}

impl From<TeamAction> for Action {
    fn from(value: TeamAction) -> Self {
        Self::Team(value)
    }
}

impl From<FieldAction> for Action {
    fn from(value: FieldAction) -> Self {
        Self::Field(value)
    }
}

impl From<PokemonAction> for Action {
    fn from(value: PokemonAction) -> Self {
        Self::Pokemon(value)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mon() {
            Some(mon) => write!(f, "{} (mon {mon})", self.choice()),
            None => write!(f, "{}", self.choice()),
        }
    }
}

impl SpeedOrderable for Action {
    fn order(&self) -> Option<u32> {
        self.keys().order
    }

    fn priority(&self) -> i32 {
        self.keys().priority
    }

    fn speed(&self) -> u32 {
        self.keys().speed
    }

    fn sub_order(&self) -> u32 {
        self.keys().sub_order
    }

    fn effect_order(&self) -> u32 {
        self.keys().effect_order
    }
}
