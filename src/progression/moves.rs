use crate::data::GameData;
use crate::errors::{ActionError, ActionResult};
use crate::pokemon::{MoveInstance, PokemonInst, MAX_MOVES};
use schema::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOutcome {
    Learned,
    AlreadyKnown,
    /// All four slots are taken; the player has to pick one to forget.
    NeedsReplacement,
}

/// Learn `move_` into a free slot if there is one.
pub fn try_learn_move(data: &GameData, pokemon: &mut PokemonInst, move_: Move) -> LearnOutcome {
    if pokemon.knows_move(move_) {
        return LearnOutcome::AlreadyKnown;
    }
    if pokemon.moves.len() >= MAX_MOVES {
        return LearnOutcome::NeedsReplacement;
    }
    pokemon.moves.push(MoveInstance::new(data, move_));
    LearnOutcome::Learned
}

/// Overwrite `slot` with `move_` at full PP. Returns the forgotten move.
pub fn replace_move(
    data: &GameData,
    pokemon: &mut PokemonInst,
    slot: usize,
    move_: Move,
) -> ActionResult<Move> {
    let Some(current) = pokemon.moves.get_mut(slot) else {
        return Err(ActionError::InvalidMoveSlot(slot));
    };
    let forgotten = current.move_;
    *current = MoveInstance::new(data, move_);
    Ok(forgotten)
}
