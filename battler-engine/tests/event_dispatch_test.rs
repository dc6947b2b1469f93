#[cfg(test)]
mod event_dispatch_tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use battler_engine::{
        battle::{
            Action,
            ActionChoice,
            Choice,
            CoreBattle,
            PokemonAction,
        },
        common::Fraction,
        effect::{
            CapabilityDescriptor,
            EffectDefinition,
            EffectKind,
            EventIdentity,
            EventKind,
            EventPrefix,
            RelayValue,
        },
        log_event,
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
        assert_turn_logs_eq,
        test_dex_with,
    };

    fn mon(name: &str, spe: u32, ability: Option<&str>, moves: &[&str]) -> MonData {
        MonData {
            name: name.to_owned(),
            level: 50,
            stats: StatTable {
                hp: 100,
                atk: 50,
                def: 50,
                spa: 50,
                spd: 50,
                spe,
            },
            ability: ability.map(|ability| ability.to_owned()),
            item: None,
            moves: moves.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    /// An item whose Residual handler logs, declaring whether the source effect may be absent.
    fn residual_charm(name: &'static str, source_effect_nullable: bool) -> Arc<EffectDefinition> {
        EffectDefinition::builder(name, EffectKind::Item)
            .on(CapabilityDescriptor::builder(EventKind::Residual)
                .nullability([false, true, source_effect_nullable])
                .fixed_default(move |battle, _| {
                    battle.log_entry(log_event!("activate", ("item", name)));
                    Ok(None)
                })
                .unwrap())
            .build()
            .unwrap()
    }

    fn abilities() -> Vec<Arc<EffectDefinition>> {
        vec![
            EffectDefinition::builder("Stage Fright", EffectKind::Ability)
                .on(CapabilityDescriptor::builder(EventKind::BeforeMove)
                    .priority(10)
                    .context(|context| {
                        context
                            .battle_mut()
                            .log_entry(log_event!("activate", ("ability", "Stage Fright")));
                        Ok(Some(RelayValue::Boolean(false)))
                    })
                    .unwrap())
                .build()
                .unwrap(),
            EffectDefinition::builder("Thick Hide", EffectKind::Ability)
                .on(CapabilityDescriptor::builder(EventKind::ModifyDamage)
                    .fixed_default(|battle, _| {
                        battle.chain_modify(Fraction::new(1, 2))?;
                        Ok(None)
                    })
                    .unwrap())
                .build()
                .unwrap(),
            EffectDefinition::builder("Sharp Claws", EffectKind::Ability)
                .on(CapabilityDescriptor::builder(
                    EventIdentity::new(EventKind::ModifyDamage).with_prefix(EventPrefix::Source),
                )
                .fixed_default(|battle, _| {
                    battle.chain_modify(Fraction::new(3, 2))?;
                    Ok(None)
                })
                .unwrap())
                .build()
                .unwrap(),
            EffectDefinition::builder("Bad Damage", EffectKind::Ability)
                .on(CapabilityDescriptor::builder(EventKind::ModifyDamage)
                    .context(|_| Ok(Some(RelayValue::Boolean(true))))
                    .unwrap())
                .build()
                .unwrap(),
            EffectDefinition::builder("Status Ban", EffectKind::Format)
                .on(CapabilityDescriptor::builder(EventKind::SetStatus)
                    .context(|_| Ok(Some(RelayValue::Boolean(false))))
                    .unwrap())
                .build()
                .unwrap(),
            EffectDefinition::builder("Add Five", EffectKind::Format)
                .on(CapabilityDescriptor::builder(EventKind::ModifyDamage)
                    .sub_order(2)
                    .context(|context| {
                        let damage = context.relay().integer().unwrap_or_default();
                        Ok(Some(RelayValue::Integer(damage + 5)))
                    })
                    .unwrap())
                .build()
                .unwrap(),
            EffectDefinition::builder("Double Up", EffectKind::Format)
                .on(CapabilityDescriptor::builder(EventKind::ModifyDamage)
                    .sub_order(1)
                    .context(|context| {
                        let damage = context.relay().integer().unwrap_or_default();
                        Ok(Some(RelayValue::Integer(damage * 2)))
                    })
                    .unwrap())
                .build()
                .unwrap(),
            residual_charm("Strict Charm", false),
            residual_charm("Lenient Charm", true),
            EffectDefinition::builder("Mega Stone", EffectKind::Item)
                .on(CapabilityDescriptor::builder(EventKind::BeforeTurn)
                    .context(|context| {
                        let Some(mon) = context.holder_mon() else {
                            return Ok(None);
                        };
                        let Some(state) = context.effect_state_mut() else {
                            return Ok(None);
                        };
                        if state.counter("used") > 0 {
                            return Ok(None);
                        }
                        state.set("used", 1u64);
                        let speed = context.mon(mon)?.speed;
                        let action = PokemonAction::new(ActionChoice::MegaEvo, mon)?;
                        context
                            .battle_mut()
                            .queue_action(Action::from(action).with_speed(speed));
                        Ok(None)
                    })
                    .unwrap())
                .build()
                .unwrap(),
        ]
    }

    fn make_battle(red: MonData, blue: MonData) -> CoreBattle {
        make_battle_with(TestBattleBuilder::new(), red, blue)
    }

    fn make_battle_with(builder: TestBattleBuilder, red: MonData, blue: MonData) -> CoreBattle {
        builder
            .with_seed(0)
            .with_team("Red", TeamData { members: vec![red] })
            .with_team("Blue", TeamData { members: vec![blue] })
            .build(test_dex_with(abilities()).unwrap())
            .unwrap()
    }

    fn play_turn(battle: &mut CoreBattle, red: usize, blue: usize) {
        assert_matches!(battle.set_choice(0, Choice::Move { slot: red }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: blue }), Ok(()));
        assert_matches!(battle.continue_battle(), Ok(()));
    }

    #[test]
    fn falsy_result_stops_lower_priority_handlers() {
        let mut battle = make_battle(
            mon("Pikachu", 50, None, &["Flinch Hit"]),
            mon("Eevee", 100, Some("Stage Fright"), &["Fixed Hit"]),
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);

        // Flinch never gets to log that the Mon cannot move.
        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Flinch Hit|target:Eevee",
                "damage|mon:Eevee|health:90/100|from:flinchhit",
                "addvolatile|mon:Eevee|volatile:flinch",
                "activate|ability:Stage Fright",
                "residual",
                "end|mon:Eevee|volatile:flinch",
            ],
        );
    }

    #[test]
    fn modifiers_from_every_holder_chain() {
        let mut battle = make_battle(
            mon("Pikachu", 100, Some("Thick Hide"), &["Guard Up"]),
            mon("Eevee", 50, None, &["Fixed Hit"]),
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Guard Up",
                "sidestart|side:0|condition:guard",
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:95/100|from:fixedhit",
                "residual",
            ],
        );
    }

    #[test]
    fn source_prefix_runs_for_attacker_only() {
        let mut battle = make_battle(
            mon("Pikachu", 100, Some("Sharp Claws"), &["Fixed Hit"]),
            mon("Eevee", 50, None, &["Fixed Hit"]),
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Fixed Hit|target:Eevee",
                "damage|mon:Eevee|health:70/100|from:fixedhit",
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:80/100|from:fixedhit",
                "residual",
            ],
        );
    }

    #[test]
    fn format_rule_applies_to_every_mon() {
        let mut battle = make_battle_with(
            TestBattleBuilder::new().with_rule("Status Ban"),
            mon("Pikachu", 100, None, &["Thunder Wave"]),
            mon("Eevee", 50, None, &["Poison Gas"]),
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Thunder Wave|target:Eevee",
                "fail|mon:Pikachu",
                "move|mon:Eevee|name:Poison Gas|target:Pikachu",
                "fail|mon:Eevee",
                "residual",
            ],
        );
    }

    #[test]
    fn lower_sub_order_feeds_the_next_handler() {
        let mut battle = make_battle_with(
            TestBattleBuilder::new()
                .with_rule("Add Five")
                .with_rule("Double Up"),
            mon("Pikachu", 100, None, &["Fixed Hit"]),
            mon("Eevee", 50, None, &["Splash"]),
        );
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);

        // Doubled first, then five added: (20 * 2) + 5.
        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Fixed Hit|target:Eevee",
                "damage|mon:Eevee|health:55/100|from:fixedhit",
                "move|mon:Eevee|name:Splash",
                "activate|move:Splash",
                "residual",
            ],
        );
    }

    #[test]
    fn actions_queued_mid_turn_run_before_moves() {
        let mut pikachu = mon("Pikachu", 50, None, &["Fixed Hit"]);
        pikachu.item = Some("Mega Stone".to_owned());
        let mut battle = make_battle(pikachu, mon("Eevee", 100, None, &["Fixed Hit"]));
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);
        play_turn(&mut battle, 0, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "megaevo|mon:Pikachu",
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:80/100|from:fixedhit",
                "move|mon:Pikachu|name:Fixed Hit|target:Eevee",
                "damage|mon:Eevee|health:80/100|from:fixedhit",
                "residual",
            ],
        );
        // The item only schedules the action once.
        assert_turn_logs_eq(
            &battle,
            2,
            [
                "move|mon:Eevee|name:Fixed Hit|target:Pikachu",
                "damage|mon:Pikachu|health:60/100|from:fixedhit",
                "move|mon:Pikachu|name:Fixed Hit|target:Eevee",
                "damage|mon:Eevee|health:60/100|from:fixedhit",
                "residual",
            ],
        );
    }

    #[test]
    fn absent_argument_at_nullable_position_is_accepted() {
        let mut pikachu = mon("Pikachu", 100, None, &["Fixed Hit"]);
        pikachu.item = Some("Lenient Charm".to_owned());
        let mut battle = make_battle(pikachu, mon("Eevee", 50, None, &["Splash"]));
        assert_matches!(battle.start(), Ok(()));
        play_turn(&mut battle, 0, 0);

        assert_turn_logs_eq(
            &battle,
            1,
            [
                "move|mon:Pikachu|name:Fixed Hit|target:Eevee",
                "damage|mon:Eevee|health:80/100|from:fixedhit",
                "move|mon:Eevee|name:Splash",
                "activate|move:Splash",
                "residual",
                "activate|item:Lenient Charm",
            ],
        );
    }

    #[test]
    fn absent_argument_at_non_nullable_position_faults_battle() {
        let mut pikachu = mon("Pikachu", 100, None, &["Fixed Hit"]);
        pikachu.item = Some("Strict Charm".to_owned());
        let mut battle = make_battle(pikachu, mon("Eevee", 50, None, &["Splash"]));
        assert_matches!(battle.start(), Ok(()));
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: 0 }), Ok(()));
        // Residual handlers run without a source effect.
        assert_error_message_contains(
            battle.continue_battle(),
            "argument at position 2 (SourceEffect) is absent but not nullable",
        );
        assert_error_message(
            battle.continue_battle(),
            "battle cannot continue after a fault",
        );
    }

    #[test]
    fn unaccepted_return_value_faults_battle() {
        let mut battle = make_battle(
            mon("Pikachu", 100, None, &["Fixed Hit"]),
            mon("Eevee", 50, Some("Bad Damage"), &["Fixed Hit"]),
        );
        assert_matches!(battle.start(), Ok(()));
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: 0 }), Ok(()));
        assert_error_message_contains(
            battle.continue_battle(),
            "which the event does not accept",
        );
        assert_error_message(
            battle.continue_battle(),
            "battle cannot continue after a fault",
        );
    }

    #[test]
    fn nested_events_respect_depth_limit() {
        let mut battle = make_battle_with(
            TestBattleBuilder::new().with_max_event_depth(1),
            mon("Pikachu", 100, None, &["Sand Whirl"]),
            mon("Eevee", 50, None, &["Splash"]),
        );
        assert_matches!(battle.start(), Ok(()));
        assert_matches!(battle.set_choice(0, Choice::Move { slot: 0 }), Ok(()));
        assert_matches!(battle.set_choice(1, Choice::Move { slot: 0 }), Ok(()));
        // Weather damage runs a Damage event inside the Residual handler.
        assert_error_message_contains(
            battle.continue_battle(),
            "event depth exceeded the limit of 1",
        );
    }
}
