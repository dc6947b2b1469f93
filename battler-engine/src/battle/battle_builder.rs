use std::sync::Arc;

use anyhow::Result;

use crate::{
    battle::{
        BattleOptions,
        CoreBattle,
        EngineOptions,
        Mon,
        MoveSlot,
    },
    common::Id,
    dex::EffectLookup,
    effect::{
        AppliedEffect,
        EffectKind,
        EffectState,
    },
    error::configuration_error,
    teams::{
        MonData,
        TeamData,
    },
};

const MAX_TEAM_SIZE: usize = 6;
const MAX_MOVES: usize = 4;

struct SideData {
    name: String,
    team: TeamData,
}

/// Builds a [`CoreBattle`] from options and teams.
///
/// Every problem with the teams is collected before failing, so a single error describes
/// everything wrong with the battle.
pub struct BattleBuilder {
    options: BattleOptions,
    engine_options: EngineOptions,
    sides: Vec<SideData>,
}

impl BattleBuilder {
    pub fn new(options: BattleOptions) -> Self {
        Self {
            options,
            engine_options: EngineOptions::default(),
            sides: Vec::new(),
        }
    }

    pub fn with_engine_options(mut self, engine_options: EngineOptions) -> Self {
        self.engine_options = engine_options;
        self
    }

    /// Adds a side. Sides are numbered in the order they are added.
    pub fn with_side<S>(mut self, name: S, team: TeamData) -> Self
    where
        S: Into<String>,
    {
        self.sides.push(SideData {
            name: name.into(),
            team,
        });
        self
    }

    fn validate_mon(
        dex: &dyn EffectLookup,
        side: &str,
        mon: &MonData,
        problems: &mut Vec<String>,
    ) {
        if mon.stats.hp == 0 {
            problems.push(format!("{side}: {} must have at least 1 HP", mon.name));
        }
        if mon.level == 0 || mon.level > 100 {
            problems.push(format!(
                "{side}: {} has invalid level {}",
                mon.name, mon.level
            ));
        }
        if mon.moves.is_empty() || mon.moves.len() > MAX_MOVES {
            problems.push(format!(
                "{side}: {} must have between 1 and {MAX_MOVES} moves",
                mon.name
            ));
        }
        for name in &mon.moves {
            match dex.effect(&Id::from(name.as_str())) {
                Some(effect) if effect.move_data().is_some() => (),
                Some(_) => problems.push(format!("{side}: {name} is not a move")),
                None => problems.push(format!("{side}: move {name} does not exist")),
            }
        }
        for (kind, name) in [
            (EffectKind::Ability, &mon.ability),
            (EffectKind::Item, &mon.item),
        ] {
            let Some(name) = name else {
                continue;
            };
            match dex.effect(&Id::from(name.as_str())) {
                Some(effect) if effect.kind() == kind => (),
                Some(_) => problems.push(format!("{side}: {name} is not an {kind}")),
                None => problems.push(format!("{side}: {kind} {name} does not exist")),
            }
        }
    }

    fn validate(&self, dex: &dyn EffectLookup) -> Result<()> {
        let mut problems = Vec::new();
        if self.sides.len() != 2 {
            problems.push(format!(
                "a battle must have exactly 2 sides, found {}",
                self.sides.len()
            ));
        }
        for side in &self.sides {
            let size = side.team.members.len();
            if size == 0 || size > MAX_TEAM_SIZE {
                problems.push(format!(
                    "{}: team must have between 1 and {MAX_TEAM_SIZE} Mons, found {size}",
                    side.name
                ));
            }
            for mon in &side.team.members {
                Self::validate_mon(dex, &side.name, mon, &mut problems);
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(configuration_error(problems.join("; ")))
        }
    }

    fn build_mon(battle: &CoreBattle, data: &MonData) -> Result<Mon> {
        let move_slots = data
            .moves
            .iter()
            .map(|name| {
                let effect = battle.lookup_effect(&Id::from(name.as_str()))?;
                let pp = effect.move_data().map(|data| data.pp).unwrap_or_default();
                Ok(MoveSlot {
                    id: effect.id().clone(),
                    name: effect.name().to_owned(),
                    pp,
                    max_pp: pp,
                    disabled: false,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Mon::new(
            data.name.clone(),
            0,
            0,
            data.level,
            data.stats,
            move_slots,
        ))
    }

    fn attach(battle: &mut CoreBattle, name: &Option<String>) -> Result<Option<AppliedEffect>> {
        let Some(name) = name else {
            return Ok(None);
        };
        let effect = battle.lookup_effect(&Id::from(name.as_str()))?;
        let state = EffectState::new(battle.next_effect_order());
        Ok(Some(AppliedEffect::new(effect, state)))
    }

    /// Validates the teams and builds the battle.
    pub fn build(self, dex: Arc<dyn EffectLookup>) -> Result<CoreBattle> {
        self.validate(dex.as_ref())?;
        let mut battle = CoreBattle::new(self.options, self.engine_options, dex)?;
        for side in self.sides {
            let mons = side
                .team
                .members
                .iter()
                .map(|data| Self::build_mon(&battle, data))
                .collect::<Result<Vec<_>>>()?;
            let index = battle.add_side(side.name, mons);
            let team = battle.side(index)?.team.clone();
            for (mon, data) in team.into_iter().zip(side.team.members.iter()) {
                let ability = Self::attach(&mut battle, &data.ability)?;
                let item = Self::attach(&mut battle, &data.item)?;
                let mon = battle.mon_mut(mon)?;
                mon.ability = ability;
                mon.item = item;
            }
        }
        log::debug!("built battle with {} Mons", battle.mons.len());
        Ok(battle)
    }
}

#[cfg(test)]
mod battle_builder_test {
    use std::sync::Arc;

    use battler_test_utils::assert_error_message_contains;
    use pretty_assertions::assert_eq;

    use crate::{
        battle::{
            BattleBuilder,
            BattleOptions,
        },
        dex::{
            MoveCategory,
            MoveData,
            StaticDex,
        },
        effect::{
            EffectDefinition,
            EffectKind,
        },
        teams::{
            MonData,
            StatTable,
            TeamData,
        },
    };

    fn dex() -> Arc<StaticDex> {
        let mut dex = StaticDex::new();
        dex.insert(
            EffectDefinition::builder("Tackle", EffectKind::Move)
                .move_data(MoveData::damaging(MoveCategory::Physical, 40))
                .build()
                .unwrap(),
        )
        .unwrap();
        dex.insert(
            EffectDefinition::builder("Leftovers", EffectKind::Item)
                .build()
                .unwrap(),
        )
        .unwrap();
        Arc::new(dex)
    }

    fn mon(name: &str, moves: &[&str]) -> MonData {
        MonData {
            name: name.to_owned(),
            level: 50,
            stats: StatTable {
                hp: 100,
                atk: 50,
                def: 50,
                spa: 50,
                spd: 50,
                spe: 50,
            },
            ability: None,
            item: None,
            moves: moves.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    fn team(mons: Vec<MonData>) -> TeamData {
        TeamData { members: mons }
    }

    #[test]
    fn builds_battle_with_attached_items() {
        let mut holder = mon("Snorlax", &["Tackle"]);
        holder.item = Some("Leftovers".to_owned());
        let battle = BattleBuilder::new(BattleOptions::default())
            .with_side("Red", team(vec![holder, mon("Pikachu", &["Tackle"])]))
            .with_side("Blue", team(vec![mon("Eevee", &["Tackle"])]))
            .build(dex())
            .unwrap();
        assert_eq!(battle.sides().count(), 2);
        let red = battle.side(0).unwrap();
        assert_eq!(red.team.len(), 2);
        let snorlax = battle.mon(red.team[0]).unwrap();
        assert_eq!(snorlax.team_position, 0);
        assert_eq!(
            snorlax.item.as_ref().map(|item| item.id().to_string()),
            Some("leftovers".to_owned())
        );
        assert_eq!(snorlax.move_slots[0].pp, snorlax.move_slots[0].max_pp);
        assert_eq!(battle.mon(red.team[1]).unwrap().side, 0);
    }

    #[test]
    fn collects_every_problem() {
        let mut bad = mon("Ditto", &["Transform"]);
        bad.item = Some("Tackle".to_owned());
        let error = BattleBuilder::new(BattleOptions::default())
            .with_side("Red", team(vec![bad]))
            .with_side("Blue", team(Vec::new()))
            .build(dex())
            .err()
            .unwrap()
            .to_string();
        assert!(error.starts_with("invalid configuration: "), "{error}");
        assert!(error.contains("Red: move Transform does not exist"), "{error}");
        assert!(error.contains("Red: Tackle is not an Item"), "{error}");
        assert!(
            error.contains("Blue: team must have between 1 and 6 Mons, found 0"),
            "{error}"
        );
    }

    #[test]
    fn requires_two_sides() {
        assert_error_message_contains(
            BattleBuilder::new(BattleOptions::default())
                .with_side("Red", team(vec![mon("Pikachu", &["Tackle"])]))
                .build(dex()),
            "a battle must have exactly 2 sides, found 1",
        );
    }
}
