#[cfg(test)]
mod tests {
    use crate::battle::flow::{select_bag, use_battle_item};
    use crate::battle::state::{BattleKind, BattlePhase};
    use crate::battle::tests::common::{
        assert_ok, battle, create_test_battle, data, game_in_battle, predictable_rng,
        TestPokemonBuilder,
    };
    use crate::errors::ActionError;
    use crate::game_state::GameState;
    use crate::pokemon::PokemonInst;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{Item, Move, Species, StatusCondition};

    fn in_item_menu(team: Vec<PokemonInst>, items: &[Item]) -> GameState {
        let enemy = TestPokemonBuilder::new(Species::Pidglit, 10)
            .with_moves(vec![Move::Growl])
            .build();
        let mut game = game_in_battle(create_test_battle(BattleKind::Wild, team, vec![enemy]));
        for item in items {
            game.player.add_item(*item, 1);
        }
        assert_ok(select_bag(&game))
    }

    fn rattipaw() -> TestPokemonBuilder {
        TestPokemonBuilder::new(Species::Rattipaw, 10).with_moves(vec![Move::Tackle])
    }

    #[test]
    fn test_full_restore_in_battle() {
        let data = data();
        let game = in_item_menu(
            vec![rattipaw().with_hp(5).with_status(StatusCondition::Poison).build()],
            &[Item::FullRestore],
        );

        let game = assert_ok(use_battle_item(
            data,
            &game,
            Item::FullRestore,
            None,
            &mut predictable_rng(),
        ));

        let state = battle(&game);
        let pokemon = &state.player_team[0];
        assert_eq!(pokemon.current_hp, pokemon.max_hp());
        assert_eq!(pokemon.status, None);
        assert_eq!(state.messages[0], "Used Full Restore!");
        assert_eq!(state.messages[1], "Rattipaw recovered 21 HP!");
        assert_eq!(state.phase, BattlePhase::Message);
        assert_eq!(game.player.item_count(Item::FullRestore), 0);
        assert!(!game.player.bag.contains_key(&Item::FullRestore));
    }

    #[test]
    fn test_revive_picks_the_first_fainted_member() {
        let data = data();
        let game = in_item_menu(
            vec![
                rattipaw().build(),
                TestPokemonBuilder::new(Species::Pidglit, 10).with_hp(0).build(),
            ],
            &[Item::Revive],
        );

        let game = assert_ok(use_battle_item(data, &game, Item::Revive, None, &mut predictable_rng()));

        let revived = &battle(&game).player_team[1];
        assert_eq!(revived.current_hp, revived.max_hp() / 2);
        assert_eq!(battle(&game).messages[1], "Pidglit was revived!");
        assert_eq!(game.player.item_count(Item::Revive), 0);
    }

    #[rstest]
    #[case(Item::Potion, None)]
    #[case(Item::Antidote, Some(StatusCondition::Paralysis))]
    #[case(Item::Revive, None)]
    fn test_items_without_effect_keep_the_turn(
        #[case] item: Item,
        #[case] status: Option<StatusCondition>,
    ) {
        let data = data();
        let mut builder = rattipaw();
        if let Some(status) = status {
            builder = builder.with_status(status);
        }
        let game = in_item_menu(vec![builder.build()], &[Item::Antidote, Item::Revive]);
        let count = game.player.item_count(item);

        let result = use_battle_item(data, &game, item, None, &mut predictable_rng());

        assert_eq!(result.unwrap_err(), ActionError::NoEffect);
        assert_eq!(game.player.item_count(item), count);
        assert_eq!(battle(&game).phase, BattlePhase::ItemSelect);
    }

    #[test]
    fn test_item_must_be_in_the_bag() {
        let data = data();
        let game = in_item_menu(vec![rattipaw().with_hp(3).build()], &[]);
        assert_eq!(
            use_battle_item(data, &game, Item::SuperPotion, None, &mut predictable_rng()).unwrap_err(),
            ActionError::ItemNotInBag(Item::SuperPotion)
        );
    }

    #[test]
    fn test_items_only_from_the_bag_menu() {
        let data = data();
        let game = game_in_battle(create_test_battle(
            BattleKind::Wild,
            vec![rattipaw().with_hp(3).build()],
            vec![TestPokemonBuilder::new(Species::Pidglit, 10).build()],
        ));
        assert_eq!(
            use_battle_item(data, &game, Item::Potion, None, &mut predictable_rng()).unwrap_err(),
            ActionError::WrongBattlePhase(BattlePhase::ActionSelect)
        );
    }
}
