#[cfg(test)]
mod tests {
    use crate::battle::engine::resolve_turn;
    use crate::battle::state::{BattlePhase, PlayerAction};
    use crate::battle::tests::common::{
        create_test_battle, create_wild_battle, data, predictable_rng, trainer, TestPokemonBuilder,
    };
    use crate::errors::ActionError;
    use crate::rng::TurnRng;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{Move, Species, TrainerClass};

    fn tackler(species: Species) -> TestPokemonBuilder {
        TestPokemonBuilder::new(species, 10).with_moves(vec![Move::Tackle])
    }

    #[test]
    fn test_faster_pokemon_moves_first() {
        // Rattipaw speed 19, Pidglit speed 16.
        let battle = create_wild_battle(
            tackler(Species::Rattipaw).build(),
            tackler(Species::Pidglit).build(),
        );
        let enemy_hp = battle.enemy_team[0].current_hp;

        let (next, result) = resolve_turn(
            data(),
            &battle,
            PlayerAction::UseMove { move_index: 0 },
            &mut predictable_rng(),
        )
        .unwrap();

        assert_eq!(
            result.messages,
            vec!["Rattipaw used Tackle!", "Pidglit used Tackle!"]
        );
        assert!(result.player_damage > 0);
        assert!(result.enemy_damage > 0);
        assert_eq!(next.phase, BattlePhase::Message);
        assert_eq!(next.messages, result.messages);
        assert_eq!(
            next.enemy_team[0].current_hp,
            enemy_hp - result.enemy_damage
        );
        // The input snapshot is left alone.
        assert_eq!(battle.enemy_team[0].current_hp, enemy_hp);
        assert_eq!(battle.phase, BattlePhase::ActionSelect);
    }

    #[test]
    fn test_priority_beats_speed() {
        let battle = create_wild_battle(
            TestPokemonBuilder::new(Species::Pidglit, 10)
                .with_moves(vec![Move::QuickAttack])
                .build(),
            tackler(Species::Rattipaw).build(),
        );

        let (_, result) = resolve_turn(
            data(),
            &battle,
            PlayerAction::UseMove { move_index: 0 },
            &mut predictable_rng(),
        )
        .unwrap();

        assert_eq!(result.messages[0], "Pidglit used Quick Attack!");
        assert_eq!(result.messages[1], "Rattipaw used Tackle!");
    }

    #[rstest]
    #[case(0.1, "Rattipaw used Tackle!")]
    #[case(0.9, "Foe used Tackle!")]
    fn test_speed_tie_is_a_coin_flip(#[case] tie_roll: f64, #[case] first: &str) {
        let battle = create_wild_battle(
            tackler(Species::Rattipaw).build(),
            tackler(Species::Rattipaw).with_nickname("Foe").build(),
        );
        // The enemy has a single move, so the tie roll is the first draw.
        let mut rng = TurnRng::new_for_test(vec![tie_roll, 0.5]);

        let (_, result) = resolve_turn(
            data(),
            &battle,
            PlayerAction::UseMove { move_index: 0 },
            &mut rng,
        )
        .unwrap();

        assert_eq!(result.messages[0], first);
    }

    #[test]
    fn test_ember_is_super_effective_on_sproutley() {
        let battle = create_wild_battle(
            TestPokemonBuilder::new(Species::Emberon, 5)
                .with_moves(vec![Move::Ember])
                .build(),
            TestPokemonBuilder::new(Species::Sproutley, 5)
                .with_moves(vec![Move::Growl])
                .build(),
        );

        let (next, result) = resolve_turn(
            data(),
            &battle,
            PlayerAction::UseMove { move_index: 0 },
            &mut predictable_rng(),
        )
        .unwrap();

        assert_eq!(result.effectiveness, Some(2.0));
        assert!(!result.critical);
        assert_eq!(result.enemy_damage, 14);
        assert_eq!(
            result.messages,
            vec![
                "Emberon used Ember!",
                "It's super effective!",
                "Sproutley used Growl!",
                "Emberon's Attack fell!",
            ]
        );
        assert_eq!(next.player_stages.get(&schema::StatType::Attack), Some(&-1));
    }

    #[test]
    fn test_immune_target_takes_no_damage() {
        let battle = create_wild_battle(
            tackler(Species::Rattipaw).build(),
            TestPokemonBuilder::new(Species::Ghoulby, 10)
                .with_moves(vec![Move::Growl])
                .build(),
        );

        let (_, result) = resolve_turn(
            data(),
            &battle,
            PlayerAction::UseMove { move_index: 0 },
            &mut predictable_rng(),
        )
        .unwrap();

        assert_eq!(result.enemy_damage, 0);
        assert_eq!(result.effectiveness, Some(0.0));
        assert!(result
            .messages
            .contains(&"It doesn't affect Ghoulby...".to_string()));
    }

    #[test]
    fn test_fainted_enemy_does_not_attack() {
        let battle = create_wild_battle(
            tackler(Species::Rattipaw).build(),
            tackler(Species::Pidglit).with_hp(1).build(),
        );

        let (next, result) = resolve_turn(
            data(),
            &battle,
            PlayerAction::UseMove { move_index: 0 },
            &mut predictable_rng(),
        )
        .unwrap();

        assert_eq!(result.messages, vec!["Rattipaw used Tackle!", "Pidglit fainted!"]);
        assert!(result.enemy_fainted);
        assert_eq!(result.player_damage, 0);
        assert_eq!(next.enemy_team[0].current_hp, 0);
    }

    #[test]
    fn test_move_uses_pp() {
        let battle = create_wild_battle(
            tackler(Species::Rattipaw).build(),
            tackler(Species::Pidglit).build(),
        );
        let (next, _) = resolve_turn(
            data(),
            &battle,
            PlayerAction::UseMove { move_index: 0 },
            &mut predictable_rng(),
        )
        .unwrap();
        assert_eq!(next.player_team[0].moves[0].pp, 34);
        assert_eq!(next.enemy_team[0].moves[0].pp, 34);
    }

    #[test]
    fn test_struggle_when_out_of_pp() {
        let mut player = tackler(Species::Rattipaw).build();
        player.moves[0].pp = 0;
        let battle = create_wild_battle(player, tackler(Species::Pidglit).build());

        let (next, result) = resolve_turn(
            data(),
            &battle,
            PlayerAction::UseMove { move_index: 0 },
            &mut predictable_rng(),
        )
        .unwrap();

        assert_eq!(
            &result.messages[..2],
            &["Rattipaw has no moves left!", "Rattipaw used Struggle!"]
        );
        assert!(result.enemy_damage > 0);
        assert_eq!(next.player_team[0].moves[0].pp, 0);
    }

    #[test]
    fn test_invalid_moves_are_rejected() {
        let mut player = TestPokemonBuilder::new(Species::Rattipaw, 10)
            .with_moves(vec![Move::Tackle, Move::TailWhip])
            .build();
        player.moves[0].pp = 0;
        let battle = create_wild_battle(player, tackler(Species::Pidglit).build());
        let mut rng = predictable_rng();

        assert_eq!(
            resolve_turn(data(), &battle, PlayerAction::UseMove { move_index: 3 }, &mut rng)
                .unwrap_err(),
            ActionError::InvalidMoveIndex(3)
        );
        assert_eq!(
            resolve_turn(data(), &battle, PlayerAction::UseMove { move_index: 0 }, &mut rng)
                .unwrap_err(),
            ActionError::NoPpRemaining(Move::Tackle)
        );
    }

    #[rstest]
    #[case(0.5, true)]
    #[case(0.9, false)]
    fn test_run_from_wild_battle(#[case] roll: f64, #[case] escaped: bool) {
        // Escape chance (19 * 128 / 16 + 30) / 256 is about 0.71.
        let battle = create_wild_battle(
            tackler(Species::Rattipaw).build(),
            tackler(Species::Pidglit).build(),
        );
        let mut rng = TurnRng::new_for_test(vec![roll]);

        let (next, result) = resolve_turn(data(), &battle, PlayerAction::Run, &mut rng).unwrap();

        assert_eq!(result.escaped, escaped);
        if escaped {
            assert_eq!(next.phase, BattlePhase::Run);
            assert_eq!(result.messages, vec!["Got away safely!"]);
        } else {
            assert_eq!(next.phase, BattlePhase::Message);
            assert_eq!(result.messages[0], "Couldn't escape!");
            assert_eq!(result.messages[1], "Pidglit used Tackle!");
        }
    }

    #[test]
    fn test_cannot_run_from_trainer() {
        let battle = create_test_battle(
            trainer("route3_youngster1", "Youngster Joey", TrainerClass::Trainer, 200, None),
            vec![tackler(Species::Rattipaw).build()],
            vec![tackler(Species::Pidglit).build()],
        );
        assert!(!battle.can_run);
        assert_eq!(
            resolve_turn(data(), &battle, PlayerAction::Run, &mut predictable_rng()).unwrap_err(),
            ActionError::CannotRun
        );
    }
}
