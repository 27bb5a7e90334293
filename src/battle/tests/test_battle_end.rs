#[cfg(test)]
mod tests {
    use crate::battle::flow::{choose_move, select_fight};
    use crate::battle::state::{BattleKind, BattlePhase};
    use crate::battle::tests::common::{
        assert_ok, battle, create_test_battle, create_wild_battle, data, game_in_battle,
        predictable_rng, read_all, trainer, TestPokemonBuilder,
    };
    use crate::data::{CHAMPION_ID, ELITE_FOUR};
    use crate::errors::ActionError;
    use crate::game_state::{GamePhase, GameState, CHAMPION_FLAG};
    use crate::player::Location;
    use crate::pokemon::PokemonInst;
    use pretty_assertions::assert_eq;
    use schema::{Badge, Move, Species, TrainerClass};

    fn striker(species: Species, level: u8) -> PokemonInst {
        TestPokemonBuilder::new(species, level)
            .with_moves(vec![Move::Tackle])
            .build()
    }

    fn fragile(species: Species) -> PokemonInst {
        TestPokemonBuilder::new(species, 2)
            .with_moves(vec![Move::Tackle])
            .with_hp(1)
            .build()
    }

    fn attack(game: GameState) -> GameState {
        let game = assert_ok(select_fight(&game));
        assert_ok(choose_move(data(), &game, 0, &mut predictable_rng()))
    }

    fn brock_battle(enemies: Vec<PokemonInst>) -> GameState {
        game_in_battle(create_test_battle(
            trainer(
                "gym_brock",
                "Leader Brock",
                TrainerClass::GymLeader,
                1500,
                Some(Badge::Boulder),
            ),
            vec![striker(Species::Rattipaw, 10)],
            enemies,
        ))
    }

    #[test]
    fn test_gym_victory_pays_out_and_awards_the_badge() {
        let game = attack(brock_battle(vec![fragile(Species::Geodon)]));

        let game = read_all(game);
        // Trainer battles pay 1.5x: floor(60 * 2 * 1.5 / 7).
        assert_eq!(battle(&game).messages, vec!["Rattipaw gained 25 EXP!"]);

        let game = read_all(game);
        assert_eq!(battle(&game).phase, BattlePhase::Victory);
        assert_eq!(
            battle(&game).messages,
            vec![
                "You defeated Leader Brock!",
                "Leader Brock looks stunned.",
                "Got $1500!"
            ]
        );

        let game = read_all(game);
        assert_eq!(game.battle, None);
        assert_eq!(game.phase, GamePhase::Overworld);
        assert_eq!(game.player.money, 2500);
        assert_eq!(game.player.badges, vec![Badge::Boulder]);
        assert!(game.player.defeated_trainers.contains("gym_brock"));
        assert_eq!(game.player.team[0].exp, 1025);
    }

    #[test]
    fn test_trainer_sends_out_the_next_pokemon() {
        let game = attack(brock_battle(vec![
            fragile(Species::Geodon),
            fragile(Species::Pidglit),
        ]));
        let game = read_all(read_all(game));

        let state = battle(&game);
        assert_eq!(state.phase, BattlePhase::Intro);
        assert_eq!(state.messages, vec!["Leader Brock sent out Pidglit!"]);
        assert_eq!(state.active_enemy, 1);
        assert!(game.player.pokedex.seen.contains(&Species::Pidglit));

        let game = read_all(game);
        assert_eq!(battle(&game).phase, BattlePhase::ActionSelect);
    }

    fn champion_battle(elite_four_cleared: bool) -> GameState {
        let mut game = game_in_battle(create_test_battle(
            trainer(CHAMPION_ID, "Champion Gary", TrainerClass::Champion, 10000, None),
            vec![striker(Species::Infernox, 100)],
            vec![fragile(Species::Rattipaw)],
        ));
        if elite_four_cleared {
            for id in ELITE_FOUR {
                game.player.defeated_trainers.insert(id.to_string());
            }
        }
        game
    }

    /// Win the turn, then read through experience and the victory text.
    fn win(game: GameState) -> GameState {
        let game = read_all(attack(game));
        assert_eq!(battle(&game).phase, BattlePhase::ExpGain);
        let game = read_all(game);
        assert_eq!(battle(&game).phase, BattlePhase::Victory);
        read_all(game)
    }

    #[test]
    fn test_beating_the_champion_rolls_the_credits() {
        let data = data();
        let game = win(champion_battle(true));

        assert_eq!(game.phase, GamePhase::Credits);
        assert_eq!(game.battle, None);
        assert!(game.player.has_flag(CHAMPION_FLAG));
        assert!(game.player.defeated_trainers.contains(CHAMPION_ID));

        assert_eq!(game.finish_credits().unwrap_err(), ActionError::AnimationPlaying);
        let game = game.tick(data, 6000).tick(data, 6000);
        assert!(game.credits.as_ref().unwrap().done);

        let game = game.finish_credits().unwrap();
        assert_eq!(game.phase, GamePhase::Overworld);
        assert_eq!(game.credits, None);
        assert_eq!(game.player.location, game.last_pokecenter);
    }

    #[test]
    fn test_champion_without_the_elite_four_is_just_a_win() {
        let game = win(champion_battle(false));
        assert_eq!(game.phase, GamePhase::Overworld);
        assert!(!game.player.has_flag(CHAMPION_FLAG));
        assert_eq!(game.credits, None);
    }

    #[test]
    fn test_losing_blacks_out() {
        let game = game_in_battle(create_wild_battle(
            TestPokemonBuilder::new(Species::Pidglit, 5)
                .with_moves(vec![Move::Tackle])
                .with_hp(1)
                .build(),
            TestPokemonBuilder::new(Species::Rattipaw, 10)
                .with_moves(vec![Move::Tackle])
                .with_nickname("Foe")
                .build(),
        ));
        let game = attack(game);
        assert_eq!(battle(&game).messages, vec!["Foe used Tackle!", "Pidglit fainted!"]);

        let game = read_all(game);
        assert_eq!(battle(&game).phase, BattlePhase::Defeat);
        assert_eq!(
            battle(&game).messages,
            vec!["All your Pokémon fainted!", "You blacked out!"]
        );

        let game = read_all(game);
        assert_eq!(game.battle, None);
        assert_eq!(game.phase, GamePhase::Overworld);
        assert_eq!(game.player.money, 500);
        assert_eq!(game.player.location, Location::new("pokecenter", 3, 5));
        let pokemon = &game.player.team[0];
        assert_eq!(pokemon.current_hp, pokemon.max_hp() / 2);
    }

    #[test]
    fn test_wild_victory_pays_nothing() {
        let game = game_in_battle(create_test_battle(
            BattleKind::Wild,
            vec![striker(Species::Rattipaw, 10)],
            vec![fragile(Species::Pidglit)],
        ));
        let game = win(game);
        assert_eq!(game.phase, GamePhase::Overworld);
        assert_eq!(game.player.money, 1000);
        assert!(game.player.defeated_trainers.is_empty());
    }
}
