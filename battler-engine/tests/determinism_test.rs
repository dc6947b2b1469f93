#[cfg(test)]
mod determinism_tests {
    use assert_matches::assert_matches;
    use battler_engine::{
        battle::{
            BattleOutcome,
            CoreBattle,
        },
        teams::{
            MonData,
            StatTable,
            TeamData,
        },
    };
    use battler_test_utils::{
        ScriptedChoiceTransport,
        TestBattleBuilder,
        test_dex,
    };
    use pretty_assertions::assert_eq;

    fn mon(name: &str, moves: &[&str]) -> MonData {
        MonData {
            name: name.to_owned(),
            level: 50,
            stats: StatTable {
                hp: 120,
                atk: 60,
                def: 50,
                spa: 50,
                spd: 50,
                // Every Mon has the same speed, so turn order comes down to tie resolution.
                spe: 100,
            },
            ability: None,
            item: None,
            moves: moves.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    fn make_battle(seed: u64) -> CoreBattle {
        TestBattleBuilder::new()
            .with_seed(seed)
            .with_max_turns(50)
            .with_team(
                "Red",
                TeamData {
                    members: vec![
                        mon("Pikachu", &["Tackle", "Thunder Wave"]),
                        mon("Raichu", &["Tackle"]),
                    ],
                },
            )
            .with_team(
                "Blue",
                TeamData {
                    members: vec![
                        mon("Eevee", &["Tackle", "Poison Gas"]),
                        mon("Jolteon", &["Tackle"]),
                    ],
                },
            )
            .build(test_dex().unwrap())
            .unwrap()
    }

    fn play(seed: u64) -> (Option<BattleOutcome>, Vec<String>) {
        let mut battle = make_battle(seed);
        let mut transport = ScriptedChoiceTransport::new()
            .with_choices(0, &["move 1", "move 0", "switch 1", "move 0"])
            .with_choices(1, &["move 1", "move 0", "move 0"]);
        assert_matches!(battle.run_to_completion(&mut transport), Ok(_));
        let logs = battle
            .log()
            .logs()
            .map(|line| line.to_owned())
            .collect::<Vec<_>>();
        (battle.outcome(), logs)
    }

    #[test]
    fn same_seed_and_choices_replay_identical_battle() {
        let (first_outcome, first_logs) = play(12345);
        let (second_outcome, second_logs) = play(12345);

        assert!(first_outcome.is_some());
        assert_eq!(first_outcome, second_outcome);
        assert_eq!(first_logs, second_logs);
        assert!(first_logs.iter().any(|line| line == "turn|turn:4"));
    }
}
