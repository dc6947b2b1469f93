#[cfg(test)]
mod battle_flow_tests {
    use assert_matches::assert_matches;
    use battler_engine::{
        battle::{
            BattleOutcome,
            BattlePhase,
            Choice,
            CoreBattle,
            LegalOption,
            RequestKind,
        },
        teams::{
            MonData,
            StatTable,
            TeamData,
        },
    };
    use battler_test_utils::{
        TestBattleBuilder,
        assert_error_message,
        assert_error_message_contains,
        assert_logs_since_start_eq,
        assert_logs_since_turn_eq,
        test_dex,
    };
    use pretty_assertions::assert_eq;

    fn mon(name: &str, hp: u32, spe: u32, moves: &[&str]) -> MonData {
        MonData {
            name: name.to_owned(),
            level: 50,
            stats: StatTable {
                hp,
                atk: 50,
                def: 50,
                spa: 50,
                spd: 50,
                spe,
            },
            ability: None,
            item: None,
            moves: moves.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    fn make_battle(red: Vec<MonData>, blue: Vec<MonData>) -> CoreBattle {
        TestBattleBuilder::new()
            .with_seed(0)
            .with_team("Red", TeamData { members: red })
            .with_team("Blue", TeamData { members: blue })
            .build(test_dex().unwrap())
            .unwrap()
    }

    #[test]
    fn start_sends_out_leads_and_requests_turn() {
        let mut battle = make_battle(
            vec![
                mon("Pikachu", 100, 90, &["Fixed Hit"]),
                mon("Raichu", 100, 110, &["Fixed Hit"]),
            ],
            vec![mon("Eevee", 100, 50, &["Fixed Hit"])],
        );
        assert_eq!(battle.phase(), BattlePhase::NotStarted);
        assert_matches!(battle.start(), Ok(()));

        assert_eq!(
            battle.log().logs().take(3).collect::<Vec<_>>(),
            vec![
                "info|battletype:Singles",
                "side|side:0|name:Red|teamsize:2",
                "side|side:1|name:Blue|teamsize:1",
            ]
        );
        assert_logs_since_start_eq(
            &battle,
            [
                "switch|mon:Pikachu|health:100/100|side:0",
                "switch|mon:Eevee|health:100/100|side:1",
                "turn|turn:1",
            ],
        );
        assert_eq!(battle.turn(), 1);
        assert_eq!(battle.phase(), BattlePhase::AwaitingChoices);

        let red = battle.request_for_side(0).unwrap();
        assert_eq!(red.kind, RequestKind::Turn);
        assert_eq!(
            red.options,
            vec![LegalOption::Move { slot: 0 }, LegalOption::Switch { slot: 1 }]
        );
        let blue = battle.request_for_side(1).unwrap();
        assert_eq!(blue.options, vec![LegalOption::Move { slot: 0 }]);
    }

    #[test]
    fn battle_cannot_start_twice() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 90, &["Fixed Hit"])],
            vec![mon("Eevee", 100, 50, &["Fixed Hit"])],
        );
        assert_matches!(battle.start(), Ok(()));
        assert_error_message(battle.start(), "battle has already started");
    }

    #[test]
    fn faster_mon_moves_first() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 90, &["Fixed Hit"])],
            vec![mon("Eevee", 100, 50, &["Fixed Hit"])],
        );
        assert_matches!(battle.start(), Ok(()));
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.continue_battle(), Ok(()));

        assert_logs_since_turn_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Fixed Hit|target:Eevee",
                "damage|mon:Eevee|health:80/100|from:fixedhit",
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:80/100|from:fixedhit",
                "residual",
                "turn|turn:2",
            ],
        );
        let pikachu = battle.side(0).unwrap().active.unwrap();
        let slot = &battle.mon(pikachu).unwrap().move_slots[0];
        assert_eq!(slot.pp, slot.max_pp - 1);
    }

    #[test]
    fn priority_beats_speed() {
        let mut battle = make_battle(
            vec![mon("Slowpoke", 100, 15, &["Quick Strike"])],
            vec![mon("Jolteon", 100, 130, &["Fixed Hit"])],
        );
        assert_matches!(battle.start(), Ok(()));
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.continue_battle(), Ok(()));

        assert_logs_since_turn_eq(
            &battle,
            1,
            [
                "move|mon:Slowpoke|name:Quick Strike|target:Jolteon",
                "damage|mon:Jolteon|health:90/100|from:quickstrike",
                "move|mon:Jolteon|name:Fixed Hit|target:Slowpoke",
                "damage|mon:Slowpoke|health:80/100|from:fixedhit",
                "residual",
                "turn|turn:2",
            ],
        );
    }

    #[test]
    fn fainted_mon_is_replaced_before_next_turn() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 90, &["Heavy Hit"])],
            vec![
                mon("Eevee", 50, 50, &["Fixed Hit"]),
                mon("Jolteon", 100, 130, &["Fixed Hit"]),
            ],
        );
        assert_matches!(battle.start(), Ok(()));
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.continue_battle(), Ok(()));

        assert_eq!(battle.request_for_side(0), None);
        let request = battle.request_for_side(1).unwrap();
        assert_eq!(request.kind, RequestKind::Switch);
        assert_eq!(request.options, vec![LegalOption::Switch { slot: 1 }]);
        assert_eq!(battle.turn(), 1);

        assert_matches!(battle.set_choice(1, Choice::Switch { slot: 1 }), Ok(()));
        assert_matches!(battle.continue_battle(), Ok(()));

        assert_logs_since_turn_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Heavy Hit|target:Eevee",
                "damage|mon:Eevee|health:0/50|from:heavyhit",
                "faint|mon:Eevee",
                "residual",
                "switch|mon:Jolteon|health:100/100|side:1",
                "turn|turn:2",
            ],
        );
    }

    #[test]
    fn last_faint_wins_battle() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 90, &["Heavy Hit"])],
            vec![mon("Eevee", 50, 50, &["Fixed Hit"])],
        );
        assert_matches!(battle.start(), Ok(()));
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.continue_battle(), Ok(()));

        assert_logs_since_turn_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Heavy Hit|target:Eevee",
                "damage|mon:Eevee|health:0/50|from:heavyhit",
                "faint|mon:Eevee",
                "win|side:0",
            ],
        );
        assert_eq!(battle.outcome(), Some(BattleOutcome::Win(0)));
        assert_eq!(battle.phase(), BattlePhase::BattleEnded);
        assert_eq!(battle.requests().count(), 0);
        assert_error_message(battle.continue_battle(), "battle has already ended");
    }

    #[test]
    fn turn_limit_ends_in_tie() {
        let mut battle = TestBattleBuilder::new()
            .with_max_turns(1)
            .with_team(
                "Red",
                TeamData {
                    members: vec![mon("Pikachu", 100, 90, &["Fixed Hit"])],
                },
            )
            .with_team(
                "Blue",
                TeamData {
                    members: vec![mon("Eevee", 100, 50, &["Fixed Hit"])],
                },
            )
            .build(test_dex().unwrap())
            .unwrap();
        assert_matches!(battle.start(), Ok(()));
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.continue_battle(), Ok(()));

        let logs = battle.log().logs().collect::<Vec<_>>();
        assert_eq!(logs[logs.len() - 2..], ["turnlimit", "tie"]);
        assert_eq!(battle.outcome(), Some(BattleOutcome::Tie));
    }

    #[test]
    fn team_preview_orders_leads() {
        let mut battle = TestBattleBuilder::new()
            .with_team_preview(true)
            .with_team(
                "Red",
                TeamData {
                    members: vec![
                        mon("Pikachu", 100, 90, &["Fixed Hit"]),
                        mon("Raichu", 100, 110, &["Fixed Hit"]),
                    ],
                },
            )
            .with_team(
                "Blue",
                TeamData {
                    members: vec![mon("Eevee", 100, 50, &["Fixed Hit"])],
                },
            )
            .build(test_dex().unwrap())
            .unwrap();
        assert_matches!(battle.start(), Ok(()));
        assert_eq!(battle.log().logs().last(), Some("teampreview"));
        let request = battle.request_for_side(0).unwrap();
        assert_eq!(request.kind, RequestKind::Team);
        assert_eq!(request.options, vec![LegalOption::Team { size: 2 }]);

        assert_error_message(
            battle.set_choice(0, Choice::Team { order: vec![1, 1] }),
            "validation failed: team order repeats a position",
        );
        assert_matches!(
            battle.set_choice(0, Choice::Team { order: vec![1, 0] }),
            Ok(())
        );
        assert_matches!(battle.set_choice(1, Choice::Team { order: vec![0] }), Ok(()));
        assert_matches!(battle.continue_battle(), Ok(()));

        assert_logs_since_start_eq(
            &battle,
            [
                "switch|mon:Raichu|health:100/100|side:0",
                "switch|mon:Eevee|health:100/100|side:1",
                "turn|turn:1",
            ],
        );
        let raichu = battle.side(0).unwrap().active.unwrap();
        assert_eq!(battle.mon(raichu).unwrap().team_position, 0);
    }

    #[test]
    fn rejects_illegal_choices() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 90, &["Fixed Hit"])],
            vec![mon("Eevee", 100, 50, &["Fixed Hit"])],
        );
        assert_error_message_contains(
            battle.set_choice(0, Choice::Move { slot: 0 }),
            "side 0 has no request",
        );
        assert_error_message(battle.continue_battle(), "battle has not started");

        assert_matches!(battle.start(), Ok(()));
        assert_error_message(
            battle.set_choice(0, Choice::Move { slot: 3 }),
            "validation failed: move slot 3 cannot be used",
        );
        assert_error_message(
            battle.set_choice(0, Choice::Switch { slot: 0 }),
            "validation failed: cannot switch to team position 0",
        );
        assert_error_message(
            battle.set_choice(0, Choice::Team { order: vec![0] }),
            "validation failed: team cannot answer a Turn request",
        );

        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_error_message(
            battle.continue_battle(),
            "cannot continue: every side has not made a choice",
        );
    }

    #[test]
    fn missing_required_handler_faults_battle() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 90, &["Broken Move"])],
            vec![mon("Eevee", 100, 50, &["Fixed Hit"])],
        );
        assert_matches!(battle.start(), Ok(()));
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: 0 }), Ok(()));
        assert_error_message_contains(
            battle.continue_battle(),
            "effect brokenmove has no handler for a required event",
        );
        assert_error_message(
            battle.continue_battle(),
            "battle cannot continue after a fault",
        );
    }
}
