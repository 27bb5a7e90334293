//! Move selection for opponents.

use crate::pokemon::PokemonInst;
use crate::rng::TurnRng;
use schema::Move;

/// A move slot to use, or Struggle when no slot has PP left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveChoice {
    Slot(usize),
    Struggle,
}

impl MoveChoice {
    pub fn resolve(self, pokemon: &PokemonInst) -> Move {
        match self {
            MoveChoice::Slot(index) => pokemon
                .moves
                .get(index)
                .map(|slot| slot.move_)
                .unwrap_or(Move::Struggle),
            MoveChoice::Struggle => Move::Struggle,
        }
    }
}

/// A trait for any system that can pick the opponent's move.
pub trait Behavior {
    fn choose_move(&self, pokemon: &PokemonInst, rng: &mut TurnRng) -> MoveChoice;
}

/// Picks uniformly among the moves that still have PP.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAI;

impl Behavior for RandomAI {
    fn choose_move(&self, pokemon: &PokemonInst, rng: &mut TurnRng) -> MoveChoice {
        let usable: Vec<usize> = pokemon
            .moves
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.pp > 0)
            .map(|(index, _)| index)
            .collect();

        match usable.len() {
            0 => MoveChoice::Struggle,
            1 => MoveChoice::Slot(usable[0]),
            len => MoveChoice::Slot(usable[rng.index(len, "enemy move")]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::test_data;
    use crate::pokemon::Ivs;
    use pretty_assertions::assert_eq;
    use schema::Species;

    fn pokemon_with(moves: &[Move]) -> PokemonInst {
        let data = test_data();
        let mut pokemon = PokemonInst::new(data, Species::Rattipaw, 10, Ivs::uniform(0));
        pokemon.set_moves(data, moves);
        pokemon
    }

    #[test]
    fn test_picks_only_moves_with_pp() {
        let mut pokemon = pokemon_with(&[Move::Tackle, Move::TailWhip, Move::QuickAttack]);
        pokemon.moves[0].pp = 0;
        let mut rng = TurnRng::new_for_test(vec![0.0, 0.99]);
        assert_eq!(RandomAI.choose_move(&pokemon, &mut rng), MoveChoice::Slot(1));
        assert_eq!(RandomAI.choose_move(&pokemon, &mut rng), MoveChoice::Slot(2));
    }

    #[test]
    fn test_single_usable_move_takes_no_draw() {
        let pokemon = pokemon_with(&[Move::Tackle]);
        let mut rng = TurnRng::new_for_test(vec![0.99, 0.1]);
        assert_eq!(RandomAI.choose_move(&pokemon, &mut rng), MoveChoice::Slot(0));
        // The scripted sequence is untouched.
        assert_eq!(rng.next_outcome("check"), 0.99);
    }

    #[test]
    fn test_struggle_when_out_of_pp() {
        let mut pokemon = pokemon_with(&[Move::Tackle, Move::TailWhip]);
        for slot in &mut pokemon.moves {
            slot.pp = 0;
        }
        let mut rng = TurnRng::new_for_test(vec![]);
        let choice = RandomAI.choose_move(&pokemon, &mut rng);
        assert_eq!(choice, MoveChoice::Struggle);
        assert_eq!(choice.resolve(&pokemon), Move::Struggle);
    }
}
