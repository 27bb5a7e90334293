use crate::data::{GameData, MAX_LEVEL};
use crate::pokemon::PokemonInst;
use schema::Move;
use tracing::debug;

// exp gain = floor(yield * level * multiplier / 7), multiplier 1.5 for trainers.
// Kept as integer fractions so the floor is exact.
const WILD_MULTIPLIER: (u32, u32) = (1, 7);
const TRAINER_MULTIPLIER: (u32, u32) = (3, 14);

/// Total experience needed to reach `level`. Level 1 starts at zero.
pub fn exp_for_level(level: u8) -> u32 {
    if level <= 1 {
        return 0;
    }
    let level = level as u32;
    level * level * level
}

/// Calculator for rewards earned by defeating a Pokemon
pub struct RewardCalculator;

impl RewardCalculator {
    pub fn calculate_exp_gain(
        &self,
        data: &GameData,
        defeated: &PokemonInst,
        trainer_battle: bool,
    ) -> u32 {
        let exp_yield = data.species(defeated.species).exp_yield as u32;
        let (numerator, denominator) = if trainer_battle {
            TRAINER_MULTIPLIER
        } else {
            WILD_MULTIPLIER
        };
        exp_yield * defeated.level as u32 * numerator / denominator
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpOutcome {
    pub old_level: u8,
    pub new_level: u8,
    /// Moves unlocked by the new levels that the Pokemon does not know yet,
    /// in the order they were unlocked.
    pub new_moves: Vec<Move>,
}

impl ExpOutcome {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }

    pub fn levels(&self) -> impl Iterator<Item = u8> {
        (self.old_level + 1)..=self.new_level
    }
}

/// Add experience and apply every level threshold it crosses, up to 100.
/// Each level recomputes stats and adds the max-HP increase to current HP.
pub fn gain_exp(data: &GameData, pokemon: &mut PokemonInst, amount: u32) -> ExpOutcome {
    let mut outcome = ExpOutcome {
        old_level: pokemon.level,
        new_level: pokemon.level,
        new_moves: Vec::new(),
    };
    pokemon.exp = pokemon.exp.saturating_add(amount);

    while pokemon.level < MAX_LEVEL && pokemon.exp >= exp_for_level(pokemon.level + 1) {
        pokemon.level += 1;
        let was_fainted = pokemon.is_fainted();
        let hp_delta = pokemon.recalculate_stats(data);
        if hp_delta > 0 && !was_fainted {
            pokemon.heal(hp_delta as u16);
        }

        for move_ in data.species(pokemon.species).moves_learned_at(pokemon.level) {
            if !pokemon.knows_move(move_) && !outcome.new_moves.contains(&move_) {
                outcome.new_moves.push(move_);
            }
        }
    }

    outcome.new_level = pokemon.level;
    if outcome.leveled_up() {
        debug!(
            species = ?pokemon.species,
            from = outcome.old_level,
            to = outcome.new_level,
            "level up"
        );
    }
    outcome
}
