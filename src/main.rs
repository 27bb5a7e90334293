use pokemon_journey::battle::flow;
use pokemon_journey::battle::state::{BattlePhase, BattleState};
use pokemon_journey::config::DEFAULT_CONFIG_PATH;
use pokemon_journey::player::Direction;
use pokemon_journey::{
    load_config, FileSaveStore, GameData, GameError, GamePhase, GameState, SaveStore,
    Species, TurnRng,
};
use tracing::{info, warn};

const ROUTE: &str = "route1";
const GRASS_STEPS: usize = 60;
const GRASS_WIDTH: usize = 6;
const FRAME_MS: u32 = 100;
// Upper bound on inputs for one battle.
const MAX_BATTLE_INPUTS: usize = 2000;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), GameError> {
    let config = load_config(DEFAULT_CONFIG_PATH)?;
    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .init();

    let data = GameData::load()?;
    let mut rng = match config.rng_seed {
        Some(seed) => TurnRng::from_seed(seed),
        None => TurnRng::new_random(),
    };
    let mut store = FileSaveStore::new(&config.save_path);

    let mut game = match store.load() {
        Some(saved) => {
            info!(player = %saved.player.name, "save loaded");
            saved
        }
        None => {
            let mut fresh = GameState::new_game(&config.player_name);
            fresh.player.money = config.starting_money;
            fresh.choose_starter(&data, Species::Emberon, &mut rng)?
        }
    };
    print_team(&data, &game);

    for step in 0..GRASS_STEPS {
        // Pace a strip of tall grass, turning at each end.
        let offset = (step % (2 * GRASS_WIDTH)) as i32;
        let (x, facing) = if offset < GRASS_WIDTH as i32 {
            (offset, Direction::Right)
        } else {
            (2 * GRASS_WIDTH as i32 - 1 - offset, Direction::Left)
        };
        let y = game.player.location.y;
        game.player.step_to(x, y, facing);

        if !game.player.has_usable_pokemon() {
            let center = game.last_pokecenter.clone();
            game = game.heal_at_pokecenter(&data, center)?;
            println!("Your Pokémon were healed.");
        }
        match game.try_wild_encounter(&data, ROUTE, &mut rng)? {
            Some(encounter) => game = play_battle(&data, encounter, &mut rng)?,
            None => continue,
        }
        game = settle_overworld(&data, game)?;
    }

    let center = game.last_pokecenter.clone();
    game = game.heal_at_pokecenter(&data, center)?;
    print_team(&data, &game);
    println!("Walked {} steps.", game.player.steps);
    store.save(&game)?;
    Ok(())
}

/// Drive one battle to its end with the simplest legal choice at each prompt.
fn play_battle(data: &GameData, mut game: GameState, rng: &mut TurnRng) -> Result<GameState, GameError> {
    let mut last_line = None;
    for _ in 0..MAX_BATTLE_INPUTS {
        let Some(battle) = game.battle.as_ref() else {
            return Ok(game);
        };
        if battle.is_animating() {
            game = game.tick(data, FRAME_MS);
            continue;
        }
        if let Some(line) = battle.current_message() {
            if last_line.as_deref() != Some(line) {
                println!("{line}");
                last_line = Some(line.to_string());
            }
        }

        game = match battle.phase {
            BattlePhase::LearnMove if !battle.has_unread_messages() => {
                flow::skip_learn_move(data, &game)?
            }
            phase if phase.is_message_phase() => flow::advance_message(data, &game)?,
            BattlePhase::ActionSelect => flow::select_fight(&game)?,
            BattlePhase::MoveSelect => flow::choose_move(data, &game, pick_move(battle), rng)?,
            BattlePhase::SwitchSelect => match replacement(battle) {
                Some(index) => flow::choose_switch(data, &game, index, rng)?,
                None => flow::back_to_actions(&game)?,
            },
            phase => {
                warn!(?phase, "battle stalled");
                return Ok(game);
            }
        };
    }
    warn!("battle input limit reached");
    Ok(game)
}

fn pick_move(battle: &BattleState) -> usize {
    battle.player_team[battle.active_player]
        .moves
        .iter()
        .position(|slot| slot.pp > 0)
        .unwrap_or(0)
}

fn replacement(battle: &BattleState) -> Option<usize> {
    battle
        .player_team
        .iter()
        .enumerate()
        .find(|(index, pokemon)| *index != battle.active_player && !pokemon.is_fainted())
        .map(|(index, _)| index)
}

/// Let evolutions and credits play out after a battle.
fn settle_overworld(data: &GameData, mut game: GameState) -> Result<GameState, GameError> {
    loop {
        game = match game.phase {
            GamePhase::Evolution => {
                let ticked = game.tick(data, FRAME_MS);
                if ticked.evolution.as_ref().is_some_and(|evolution| evolution.done) {
                    if let Some(evolution) = &ticked.evolution {
                        println!(
                            "{} evolved into {}!",
                            data.species(evolution.from).name,
                            data.species(evolution.to).name
                        );
                    }
                    ticked.complete_evolution(data)?
                } else {
                    ticked
                }
            }
            GamePhase::Credits => {
                let ticked = game.tick(data, FRAME_MS);
                if ticked.credits.as_ref().is_some_and(|credits| credits.done) {
                    ticked.finish_credits()?
                } else {
                    ticked
                }
            }
            _ => return Ok(game),
        };
    }
}

fn print_team(data: &GameData, game: &GameState) {
    println!("{} (${})", game.player.name, game.player.money);
    for pokemon in &game.player.team {
        println!(
            "  {} Lv.{} HP {}/{}",
            pokemon.name(data),
            pokemon.level,
            pokemon.current_hp,
            pokemon.max_hp()
        );
    }
}
