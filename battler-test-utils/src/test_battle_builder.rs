use std::sync::Arc;

use anyhow::Result;
use battler_engine::{
    battle::{
        BattleBuilder,
        BattleOptions,
        CoreBattle,
        EngineOptions,
        SpeedTieResolution,
    },
    common::Id,
    dex::EffectLookup,
    teams::TeamData,
};

use crate::ControlledRandomNumberGenerator;

/// Battle builder object for integration tests.
///
/// Speed ties are kept in queue order unless configured otherwise, so logs are stable.
pub struct TestBattleBuilder {
    options: BattleOptions,
    teams: Vec<(String, TeamData)>,
    controlled_rng: bool,
}

impl TestBattleBuilder {
    pub fn new() -> Self {
        Self {
            options: BattleOptions {
                speed_tie_resolution: SpeedTieResolution::Keep,
                ..Default::default()
            },
            teams: Vec::new(),
            controlled_rng: false,
        }
    }

    /// Builds a new [`CoreBattle`] from the battle builder.
    pub fn build(self, dex: Arc<dyn EffectLookup>) -> Result<CoreBattle> {
        let mut engine_options = EngineOptions::default();
        if self.controlled_rng {
            engine_options.rng_factory =
                |seed: Option<u64>| Box::new(ControlledRandomNumberGenerator::new(seed));
        }
        let mut builder = BattleBuilder::new(self.options).with_engine_options(engine_options);
        for (name, team) in self.teams {
            builder = builder.with_side(name, team);
        }
        builder.build(dex)
    }

    pub fn with_controlled_rng(mut self, controlled_rng: bool) -> Self {
        self.controlled_rng = controlled_rng;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    pub fn with_speed_tie_resolution(mut self, tie_resolution: SpeedTieResolution) -> Self {
        self.options.speed_tie_resolution = tie_resolution;
        self
    }

    pub fn with_team_preview(mut self, team_preview: bool) -> Self {
        self.options.team_preview = team_preview;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.options.max_turns = max_turns;
        self
    }

    pub fn with_max_event_depth(mut self, max_event_depth: usize) -> Self {
        self.options.max_event_depth = max_event_depth;
        self
    }

    pub fn with_rule(mut self, rule: &str) -> Self {
        self.options.rules.push(Id::from(rule));
        self
    }

    /// Adds a side. The first side added is side 0.
    pub fn with_team(mut self, name: &str, team: TeamData) -> Self {
        self.teams.push((name.to_owned(), team));
        self
    }
}
