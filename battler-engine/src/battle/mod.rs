mod action;
mod battle_builder;
mod battle_options;
mod choice;
mod core_battle;
pub mod core_battle_actions;
pub mod core_battle_effects;
mod field;
mod mon;
mod queue;
mod request;
mod side;
mod speed_order;
mod transport;

pub use action::{
    Action,
    ActionChoice,
    FieldAction,
    MAX_ACTION_ORDER,
    MoveAction,
    OrderKeys,
    PokemonAction,
    SwitchAction,
    TeamAction,
};
pub use battle_builder::BattleBuilder;
pub use battle_options::{
    BattleOptions,
    EngineOptions,
    SpeedTieResolution,
};
pub use choice::Choice;
pub use core_battle::{
    BattleOutcome,
    BattlePhase,
    CoreBattle,
};
pub use core_battle_effects::EventTrigger;
pub use field::Field;
pub use mon::{
    Mon,
    MonHandle,
    MoveSlot,
    Stat,
};
pub use queue::BattleQueue;
pub use request::{
    ChoiceRequest,
    LegalOption,
    MonPerspective,
    Perspective,
    RequestKind,
    SidePerspective,
};
pub use side::Side;
pub use speed_order::{
    SpeedOrderable,
    compare_priority,
    speed_sort,
};
pub use transport::{
    ChannelChoiceTransport,
    ChoiceResponse,
    ChoiceTransport,
    EventBurst,
    EventPublisher,
    PendingChoice,
};
