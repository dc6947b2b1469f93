#[cfg(test)]
mod field_effects_tests {
    use assert_matches::assert_matches;
    use battler_engine::{
        battle::{
            Choice,
            CoreBattle,
            LegalOption,
        },
        common::Id,
        teams::{
            MonData,
            StatTable,
            TeamData,
        },
    };
    use battler_test_utils::{
        TestBattleBuilder,
        assert_error_message,
        assert_turn_logs_eq,
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

    fn play_turn(battle: &mut CoreBattle, red: usize, blue: usize) {
        assert_matches!(battle.set_choice(0, Choice::Move { slot: red }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: blue }), Ok(()));
        assert_matches!(battle.continue_battle(), Ok(()));
    }

    #[test]
    fn side_condition_halves_damage_until_it_expires() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 100, &["Guard Up", "Splash"])],
            vec![mon("Eevee", 100, 50, &["Fixed Hit"])],
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);
        assert_eq!(
            battle.perspective().sides[0].conditions,
            vec![Id::from("guard")]
        );
        play_turn(&mut battle, 1, 0);
        play_turn(&mut battle, 1, 0);
        play_turn(&mut battle, 1, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Guard Up",
                "sidestart|side:0|condition:guard",
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:90/100|from:fixedhit",
                "residual",
            ],
        );
        assert_turn_logs_eq(
            &battle,
            3,
            [
                "move|mon:Pikachu|name:Splash",
                "activate|move:Splash",
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:70/100|from:fixedhit",
                "residual",
                "sideend|side:0|condition:guard",
            ],
        );
        assert_turn_logs_eq(
            &battle,
            4,
            [
                "move|mon:Pikachu|name:Splash",
                "activate|move:Splash",
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:50/100|from:fixedhit",
                "residual",
            ],
        );
        assert!(battle.perspective().sides[0].conditions.is_empty());
    }

    #[test]
    fn weather_damages_every_active_mon_then_clears() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 160, 100, &["Sand Whirl", "Splash"])],
            vec![mon("Eevee", 160, 50, &["Splash"])],
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);
        assert_eq!(battle.perspective().weather, Some(Id::from("sandstorm")));
        play_turn(&mut battle, 1, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Sand Whirl",
                "weather|weather:sandstorm",
                "move|mon:Eevee|name:Splash",
                "activate|move:Splash",
                "residual",
                "damage|mon:Pikachu|health:150/160|from:sandstorm",
                "damage|mon:Eevee|health:150/160|from:sandstorm",
            ],
        );
        assert_turn_logs_eq(
            &battle,
            2,
            [
                "move|mon:Pikachu|name:Splash",
                "activate|move:Splash",
                "move|mon:Eevee|name:Splash",
                "activate|move:Splash",
                "residual",
                "weather|weather:none",
            ],
        );
        assert_eq!(battle.perspective().weather, None);
    }

    #[test]
    fn slot_condition_expires_while_slot_occupant_is_fainted() {
        let mut battle = make_battle(
            vec![
                mon("Pikachu", 100, 100, &["Mark Slot", "Splash"]),
                mon("Raichu", 100, 110, &["Splash"]),
            ],
            vec![mon("Eevee", 100, 50, &["Heavy Hit"])],
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);
        play_turn(&mut battle, 1, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Mark Slot",
                "sidestart|side:0|condition:mark",
                "move|mon:Eevee|name:Heavy Hit|target:Pikachu",
                "damage|mon:Pikachu|health:40/100|from:heavyhit",
                "residual",
            ],
        );
        assert_turn_logs_eq(
            &battle,
            2,
            [
                "move|mon:Pikachu|name:Splash",
                "activate|move:Splash",
                "move|mon:Eevee|name:Heavy Hit|target:Pikachu",
                "damage|mon:Pikachu|health:0/100|from:heavyhit",
                "faint|mon:Pikachu",
                "residual",
                "sideend|side:0|condition:mark",
            ],
        );
        assert!(battle.side(0).unwrap().slot_conditions.is_empty());
    }

    #[test]
    fn forced_switch_drags_in_reserve() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 100, &["Roar"])],
            vec![
                mon("Eevee", 100, 50, &["Fixed Hit"]),
                mon("Jolteon", 100, 130, &["Fixed Hit"]),
            ],
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:80/100|from:fixedhit",
                "move|mon:Pikachu|name:Roar|target:Eevee",
                "drag|mon:Jolteon|health:100/100|side:1",
                "residual",
            ],
        );
        let blue = battle.side(1).unwrap();
        let jolteon = blue.active.unwrap();
        assert_eq!(battle.mon(jolteon).unwrap().name, "Jolteon");
        let eevee = battle.mon(blue.team[0]).unwrap();
        assert!(!eevee.active);
    }

    #[test]
    fn forced_switch_fails_without_reserves() {
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 100, &["Roar"])],
            vec![mon("Eevee", 100, 50, &["Fixed Hit"])],
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:80/100|from:fixedhit",
                "move|mon:Pikachu|name:Roar|target:Eevee",
                "fail|mon:Pikachu",
                "residual",
            ],
        );
    }

    #[test]
    fn trapping_ability_removes_foe_switches() {
        let mut gengar = mon("Gengar", 100, 110, &["Fixed Hit"]);
        gengar.ability = Some("Shadow Tag".to_owned());
        let mut battle = make_battle(
            vec![
                mon("Pikachu", 100, 100, &["Fixed Hit"]),
                mon("Raichu", 100, 110, &["Fixed Hit"]),
            ],
            vec![gengar, mon("Haunter", 100, 95, &["Fixed Hit"])],
        );
        assert_matches!(battle.start(), Ok(()));

        assert_eq!(
            battle.request_for_side(0).unwrap().options,
            vec![LegalOption::Move { slot: 0 }]
        );
        assert_eq!(
            battle.request_for_side(1).unwrap().options,
            vec![LegalOption::Move { slot: 0 }, LegalOption::Switch { slot: 1 }]
        );
        assert_error_message(
            battle.set_choice(0, Choice::Switch { slot: 1 }),
            "validation failed: cannot switch to team position 1",
        );
    }

    #[test]
    fn foe_ability_disables_move_selection() {
        let mut gengar = mon("Gengar", 100, 110, &["Fixed Hit"]);
        gengar.ability = Some("Imprison Aura".to_owned());
        let mut battle = make_battle(
            vec![mon("Pikachu", 100, 100, &["Fixed Hit", "Splash"])],
            vec![gengar],
        );
        assert_matches!(battle.start(), Ok(()));

        assert_eq!(
            battle.request_for_side(0).unwrap().options,
            vec![LegalOption::Move { slot: 0 }]
        );
        let pikachu = battle.side(0).unwrap().active.unwrap();
        assert!(battle.mon(pikachu).unwrap().move_slots[1].disabled);
        assert_error_message(
            battle.set_choice(0, Choice::Move { slot: 1 }),
            "validation failed: move slot 1 cannot be used",
        );
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
    }

    #[test]
    fn speed_ability_changes_turn_order() {
        let mut eevee = mon("Eevee", 100, 60, &["Fixed Hit"]);
        eevee.ability = Some("Quick Feet".to_owned());
        let mut battle = make_battle(vec![mon("Pikachu", 100, 100, &["Fixed Hit"])], vec![eevee]);
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:80/100|from:fixedhit",
                "move|mon:Pikachu|name:Fixed Hit|target:Eevee",
                "damage|mon:Eevee|health:80/100|from:fixedhit",
                "residual",
            ],
        );
    }
}
