//! Player-facing battle transitions.
//!
//! Each function takes the whole game snapshot, checks that the battle is in
//! a phase that accepts the input, and returns the next snapshot. Anything
//! that arrives in the wrong phase, while an animation is playing or while
//! text is still unread is rejected with an `ActionError`.

use crate::battle::animations::{build_turn_animations, exp_fill_animation, tick_animations};
use crate::battle::engine::resolve_turn;
use crate::battle::state::{BattlePhase, BattleState, LearnMovePrompt, PendingExp, PlayerAction, Side};
use crate::data::GameData;
use crate::errors::{ActionError, ActionResult};
use crate::game_state::GameState;
use crate::progression::{gain_exp, replace_move, try_learn_move, LearnOutcome, RewardCalculator};
use crate::rng::TurnRng;
use schema::Item;
use tracing::{debug, info};

fn battle_of(game: &GameState) -> ActionResult<&BattleState> {
    game.battle.as_ref().ok_or(ActionError::NoBattle)
}

/// Input is accepted only in `phase` with every animation finished.
fn ready_in(battle: &BattleState, phase: BattlePhase) -> ActionResult<()> {
    if battle.is_animating() {
        return Err(ActionError::AnimationPlaying);
    }
    if battle.phase != phase {
        return Err(ActionError::WrongBattlePhase(battle.phase));
    }
    Ok(())
}

fn with_battle(
    game: &GameState,
    update: impl FnOnce(&mut BattleState) -> ActionResult<()>,
) -> ActionResult<GameState> {
    let mut next = game.clone();
    let battle = next.battle.as_mut().ok_or(ActionError::NoBattle)?;
    update(battle)?;
    Ok(next)
}

fn to_action_select(battle: &mut BattleState) {
    battle.show(BattlePhase::ActionSelect, Vec::new());
}

fn select(game: &GameState, phase: BattlePhase) -> ActionResult<GameState> {
    ready_in(battle_of(game)?, BattlePhase::ActionSelect)?;
    with_battle(game, |battle| {
        battle.phase = phase;
        Ok(())
    })
}

pub fn select_fight(game: &GameState) -> ActionResult<GameState> {
    select(game, BattlePhase::MoveSelect)
}

pub fn select_bag(game: &GameState) -> ActionResult<GameState> {
    select(game, BattlePhase::ItemSelect)
}

pub fn select_pokemon(game: &GameState) -> ActionResult<GameState> {
    select(game, BattlePhase::SwitchSelect)
}

/// Leave a sub-menu. A forced switch cannot be backed out of.
pub fn back_to_actions(game: &GameState) -> ActionResult<GameState> {
    let battle = battle_of(game)?;
    if battle.is_animating() {
        return Err(ActionError::AnimationPlaying);
    }
    let in_submenu = matches!(
        battle.phase,
        BattlePhase::MoveSelect | BattlePhase::ItemSelect | BattlePhase::SwitchSelect
    );
    if !in_submenu || battle.forced_switch {
        return Err(ActionError::WrongBattlePhase(battle.phase));
    }
    with_battle(game, |battle| {
        to_action_select(battle);
        Ok(())
    })
}

fn run_turn(
    data: &GameData,
    game: &GameState,
    action: PlayerAction,
    rng: &mut TurnRng,
) -> ActionResult<GameState> {
    let battle = battle_of(game)?;
    let (mut resolved, result) = resolve_turn(data, battle, action, rng)?;
    resolved.animations = build_turn_animations(&result);
    let mut next = game.clone();
    next.battle = Some(resolved);
    Ok(next)
}

pub fn choose_move(
    data: &GameData,
    game: &GameState,
    move_index: usize,
    rng: &mut TurnRng,
) -> ActionResult<GameState> {
    ready_in(battle_of(game)?, BattlePhase::MoveSelect)?;
    run_turn(data, game, PlayerAction::UseMove { move_index }, rng)
}

/// Swap Pokemon. A voluntary switch costs the turn; replacing a fainted
/// Pokemon does not give the enemy an attack.
pub fn choose_switch(
    data: &GameData,
    game: &GameState,
    team_index: usize,
    rng: &mut TurnRng,
) -> ActionResult<GameState> {
    let battle = battle_of(game)?;
    ready_in(battle, BattlePhase::SwitchSelect)?;
    if !battle.forced_switch {
        return run_turn(data, game, PlayerAction::Switch { team_index }, rng);
    }

    let incoming = battle
        .player_team
        .get(team_index)
        .ok_or(ActionError::InvalidTeamIndex(team_index))?;
    if incoming.is_fainted() {
        return Err(ActionError::PokemonFainted);
    }
    let line = format!("Go! {}!", incoming.name(data));
    with_battle(game, |battle| {
        battle.active_player = team_index;
        battle.player_stages.clear();
        battle.forced_switch = false;
        battle.last_result = None;
        battle.show(BattlePhase::Message, vec![line]);
        Ok(())
    })
}

/// Use a bag item. The item leaves the bag only when the turn goes through.
pub fn use_battle_item(
    data: &GameData,
    game: &GameState,
    item: Item,
    target: Option<usize>,
    rng: &mut TurnRng,
) -> ActionResult<GameState> {
    ready_in(battle_of(game)?, BattlePhase::ItemSelect)?;
    if game.player.item_count(item) == 0 {
        return Err(ActionError::ItemNotInBag(item));
    }
    let mut next = run_turn(data, game, PlayerAction::UseItem { item, target }, rng)?;
    next.player.consume_item(item)?;
    Ok(next)
}

pub fn run_away(data: &GameData, game: &GameState, rng: &mut TurnRng) -> ActionResult<GameState> {
    ready_in(battle_of(game)?, BattlePhase::ActionSelect)?;
    run_turn(data, game, PlayerAction::Run, rng)
}

/// Show the next line, or act on the phase once every line has been read.
pub fn advance_message(data: &GameData, game: &GameState) -> ActionResult<GameState> {
    let battle = battle_of(game)?;
    if battle.is_animating() {
        return Err(ActionError::AnimationPlaying);
    }
    if !battle.phase.is_message_phase() {
        return Err(ActionError::WrongBattlePhase(battle.phase));
    }

    let mut next = game.clone();
    if battle.has_unread_messages() {
        if let Some(battle) = next.battle.as_mut() {
            battle.message_index += 1;
        }
        return Ok(next);
    }

    match battle.phase {
        BattlePhase::Run => {
            next.leave_battle();
            info!("escaped");
        }
        BattlePhase::Victory => next.conclude_victory(data),
        BattlePhase::Defeat => next.apply_blackout(),
        BattlePhase::Catch if battle.catch_result.as_ref().is_some_and(|c| c.success) => {
            next.conclude_capture()
        }
        BattlePhase::LearnMove => return Err(ActionError::WrongBattlePhase(BattlePhase::LearnMove)),
        phase => {
            let battle = next.battle.as_mut().ok_or(ActionError::NoBattle)?;
            match phase {
                BattlePhase::Intro => to_action_select(battle),
                BattlePhase::Fainted => {
                    battle.forced_switch = true;
                    battle.show(BattlePhase::SwitchSelect, Vec::new());
                }
                BattlePhase::ExpGain => apply_pending_exp(data, battle),
                BattlePhase::LevelUp => continue_learning(data, battle),
                _ => after_turn(data, battle),
            }
            let enemy = battle.active(Side::Enemy).species;
            next.player.pokedex.mark_seen(enemy);
        }
    }
    Ok(next)
}

/// Decide what follows a resolved turn once its text has been read.
fn after_turn(data: &GameData, battle: &mut BattleState) {
    if battle.last_result.take().is_none() {
        to_action_select(battle);
        return;
    }

    if battle.active(Side::Enemy).is_fainted() {
        let player = battle.active(Side::Player);
        if player.is_fainted() {
            after_progression(data, battle);
            return;
        }
        let amount = RewardCalculator.calculate_exp_gain(
            data,
            battle.active(Side::Enemy),
            !battle.is_wild(),
        );
        let line = format!("{} gained {} EXP!", player.name(data), amount);
        let pokemon_uid = player.uid;
        battle.pending_exp = Some(PendingExp {
            pokemon_uid,
            amount,
        });
        battle.show(BattlePhase::ExpGain, vec![line]);
        battle.animations = vec![exp_fill_animation()];
        return;
    }

    if battle.active(Side::Player).is_fainted() {
        show_player_fainted(battle);
        return;
    }
    to_action_select(battle);
}

fn show_player_fainted(battle: &mut BattleState) {
    if battle.alive_player_count() == 0 {
        battle.show(
            BattlePhase::Defeat,
            vec![
                "All your Pokémon fainted!".to_string(),
                "You blacked out!".to_string(),
            ],
        );
    } else {
        battle.show(
            BattlePhase::Fainted,
            vec!["Choose a Pokémon to send out!".to_string()],
        );
    }
}

fn apply_pending_exp(data: &GameData, battle: &mut BattleState) {
    let Some(pending) = battle.pending_exp.take() else {
        after_progression(data, battle);
        return;
    };
    let Some(pokemon) = battle.player_pokemon_mut(pending.pokemon_uid) else {
        after_progression(data, battle);
        return;
    };

    let outcome = gain_exp(data, pokemon, pending.amount);
    if !outcome.leveled_up() {
        after_progression(data, battle);
        return;
    }
    let line = format!("{} grew to level {}!", pokemon.name(data), outcome.new_level);
    let uid = pokemon.uid;
    battle
        .pending_moves
        .extend(outcome.new_moves.into_iter().map(|move_| LearnMovePrompt {
            pokemon_uid: uid,
            move_,
        }));
    battle.show(BattlePhase::LevelUp, vec![line]);
}

/// Work through unlocked moves: free slots fill silently but for the
/// message, a full move list stops for the player's decision.
fn continue_learning(data: &GameData, battle: &mut BattleState) {
    while let Some(prompt) = battle.pending_moves.pop_front() {
        let Some(pokemon) = battle.player_pokemon_mut(prompt.pokemon_uid) else {
            continue;
        };
        let name = pokemon.name(data).to_string();
        let move_name = data.move_data(prompt.move_).name.clone();
        match try_learn_move(data, pokemon, prompt.move_) {
            LearnOutcome::AlreadyKnown => continue,
            LearnOutcome::Learned => {
                battle.show(
                    BattlePhase::LevelUp,
                    vec![format!("{name} learned {move_name}!")],
                );
            }
            LearnOutcome::NeedsReplacement => {
                battle.learn_move = Some(prompt);
                battle.show(
                    BattlePhase::LearnMove,
                    vec![
                        format!("{name} wants to learn {move_name}!"),
                        format!("But {name} already knows four moves."),
                    ],
                );
            }
        }
        return;
    }
    after_progression(data, battle);
}

/// Progression is done: bring out the next enemy or end the battle.
fn after_progression(data: &GameData, battle: &mut BattleState) {
    if battle.alive_player_count() == 0 {
        show_player_fainted(battle);
        return;
    }

    if let Some(next_enemy) = battle.next_alive_enemy() {
        battle.active_enemy = next_enemy;
        battle.enemy_stages.clear();
        let sender = battle
            .trainer()
            .map(|trainer| trainer.name.clone())
            .unwrap_or_else(|| "Opponent".to_string());
        let mut lines = vec![format!(
            "{} sent out {}!",
            sender,
            battle.active(Side::Enemy).name(data)
        )];
        debug!(index = next_enemy, "next enemy");
        if battle.active(Side::Player).is_fainted() {
            lines.push("Choose a Pokémon to send out!".to_string());
            battle.show(BattlePhase::Fainted, lines);
        } else {
            battle.show(BattlePhase::Intro, lines);
        }
        return;
    }

    let lines = match battle.trainer() {
        Some(trainer) => {
            let mut lines = vec![format!("You defeated {}!", trainer.name)];
            lines.extend(trainer.defeat_dialog.iter().cloned());
            if trainer.reward > 0 {
                lines.push(format!("Got ${}!", trainer.reward));
            }
            lines
        }
        None => vec!["You won!".to_string()],
    };
    battle.show(BattlePhase::Victory, lines);
}

fn pending_prompt(battle: &BattleState) -> ActionResult<LearnMovePrompt> {
    ready_in(battle, BattlePhase::LearnMove)?;
    if battle.has_unread_messages() {
        return Err(ActionError::MessagesPending);
    }
    battle
        .learn_move
        .clone()
        .ok_or(ActionError::WrongBattlePhase(battle.phase))
}

/// Forget the move in `slot` for the one being offered.
pub fn learn_move(data: &GameData, game: &GameState, slot: usize) -> ActionResult<GameState> {
    let prompt = pending_prompt(battle_of(game)?)?;
    with_battle(game, |battle| {
        let pokemon = battle
            .player_pokemon_mut(prompt.pokemon_uid)
            .ok_or(ActionError::NoUsablePokemon)?;
        let forgotten = replace_move(data, pokemon, slot, prompt.move_)?;
        let line = format!(
            "{} forgot {} and learned {}!",
            pokemon.name(data),
            data.move_data(forgotten).name,
            data.move_data(prompt.move_).name
        );
        battle.learn_move = None;
        battle.show(BattlePhase::LevelUp, vec![line]);
        Ok(())
    })
}

pub fn skip_learn_move(data: &GameData, game: &GameState) -> ActionResult<GameState> {
    let prompt = pending_prompt(battle_of(game)?)?;
    with_battle(game, |battle| {
        let name = battle
            .player_team
            .iter()
            .find(|pokemon| pokemon.uid == prompt.pokemon_uid)
            .map(|pokemon| pokemon.name(data).to_string())
            .unwrap_or_default();
        let line = format!("{} did not learn {}.", name, data.move_data(prompt.move_).name);
        battle.learn_move = None;
        battle.show(BattlePhase::LevelUp, vec![line]);
        Ok(())
    })
}

/// Advance battle animations by `dt_ms`.
pub fn tick(game: &GameState, dt_ms: u32) -> GameState {
    let mut next = game.clone();
    if let Some(battle) = next.battle.as_mut() {
        tick_animations(&mut battle.animations, dt_ms);
    }
    next
}
