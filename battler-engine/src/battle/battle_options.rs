use std::fmt;

use anyhow::Result;
use serde::{
    Deserialize,
    Serialize,
};
use serde_string_enum::{
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
};

use crate::{
    common::Id,
    error::configuration_error,
    rng::{
        RngFactory,
        real_rng_factory,
    },
};

/// How ties are resolved when every ordering key is equal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum SpeedTieResolution {
    /// Shuffle tied elements with the battle's random number generator.
    #[default]
    #[string = "Random"]
    Random,
    /// Keep tied elements in their original order.
    #[string = "Keep"]
    Keep,
    /// Reverse the original order of tied elements.
    #[string = "Reverse"]
    Reverse,
}

fn default_max_turns() -> u32 {
    1000
}

fn default_max_event_depth() -> usize {
    8
}

fn default_observer_capacity() -> usize {
    128
}

/// Options for a single battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleOptions {
    /// The initial seed for random number generation.
    ///
    /// The same seed and the same choices replay the same battle.
    #[serde(default)]
    pub seed: Option<u64>,
    /// How speed ties are resolved.
    #[serde(default)]
    pub speed_tie_resolution: SpeedTieResolution,
    /// The battle ends in a tie once this many turns have passed.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    /// How deep events may nest inside of other events.
    #[serde(default = "default_max_event_depth")]
    pub max_event_depth: usize,
    /// Should sides order their team before the battle starts?
    #[serde(default)]
    pub team_preview: bool,
    /// Format rules whose handlers apply to the whole battle.
    #[serde(default)]
    pub rules: Vec<Id>,
    /// How many event bursts observers may fall behind before they miss some.
    #[serde(default = "default_observer_capacity")]
    pub observer_capacity: usize,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            seed: None,
            speed_tie_resolution: SpeedTieResolution::default(),
            max_turns: default_max_turns(),
            max_event_depth: default_max_event_depth(),
            team_preview: false,
            rules: Vec::new(),
            observer_capacity: default_observer_capacity(),
        }
    }
}

impl BattleOptions {
    /// Validates the options.
    pub fn validate(&self) -> Result<()> {
        if self.max_turns == 0 {
            return Err(configuration_error("max_turns must be at least 1"));
        }
        if self.max_event_depth == 0 {
            return Err(configuration_error("max_event_depth must be at least 1"));
        }
        if self.observer_capacity == 0 {
            return Err(configuration_error("observer_capacity must be at least 1"));
        }
        Ok(())
    }
}

/// Options for how the engine runs, shared by every battle it hosts.
#[derive(Clone)]
pub struct EngineOptions {
    /// Creates the battle's random number generator.
    ///
    /// Tests use this to control every random roll.
    pub rng_factory: RngFactory,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            rng_factory: real_rng_factory,
        }
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod battle_options_test {
    use battler_test_utils::assert_error_message;
    use pretty_assertions::assert_eq;

    use crate::battle::{
        BattleOptions,
        SpeedTieResolution,
    };

    #[test]
    fn deserializes_with_defaults() {
        let options: BattleOptions = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.speed_tie_resolution, SpeedTieResolution::Random);
        assert_eq!(options.max_turns, 1000);
        assert_eq!(options.max_event_depth, 8);
        assert_eq!(options.observer_capacity, 128);
        assert!(!options.team_preview);
        assert!(options.rules.is_empty());
    }

    #[test]
    fn deserializes_tie_resolution() {
        let options: BattleOptions =
            serde_json::from_str(r#"{"speed_tie_resolution": "Reverse", "rules": ["Sleep Clause"]}"#)
                .unwrap();
        assert_eq!(options.speed_tie_resolution, SpeedTieResolution::Reverse);
        assert_eq!(options.rules[0].as_ref(), "sleepclause");
    }

    #[test]
    fn rejects_zero_limits() {
        let options = BattleOptions {
            max_event_depth: 0,
            ..Default::default()
        };
        assert_error_message(
            options.validate(),
            "invalid configuration: max_event_depth must be at least 1",
        );
        let options = BattleOptions {
            max_turns: 0,
            ..Default::default()
        };
        assert_error_message(
            options.validate(),
            "invalid configuration: max_turns must be at least 1",
        );
        assert!(BattleOptions::default().validate().is_ok());
    }
}
