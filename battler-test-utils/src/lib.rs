mod error_assert;
mod log_util;
mod rng;
mod test_battle_builder;
mod test_dex;
mod transport;

pub use error_assert::{
    assert_error_message,
    assert_error_message_contains,
};
pub use log_util::{
    LogMatch,
    assert_logs_since_start_eq,
    assert_logs_since_turn_eq,
    assert_turn_logs_eq,
};
pub use rng::{
    ControlledRandomNumberGenerator,
    get_controlled_rng_for_battle,
};
pub use test_battle_builder::TestBattleBuilder;
pub use test_dex::{
    test_dex,
    test_dex_with,
};
pub use transport::ScriptedChoiceTransport;
