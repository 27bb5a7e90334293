use super::RewardCalculator;
use crate::data::GameData;
use crate::pokemon::PokemonInst;
use schema::Species;
use tracing::info;

impl RewardCalculator {
    /// Check if Pokemon should evolve at its current level
    /// Returns the species it should evolve into, or None if no evolution
    pub fn should_evolve(&self, data: &GameData, pokemon: &PokemonInst) -> Option<Species> {
        data.species(pokemon.species)
            .evolution
            .as_ref()
            .filter(|evolution| pokemon.level >= evolution.level)
            .map(|evolution| evolution.evolves_to)
    }
}

/// Swap species and recompute stats. Level, experience, IVs and moves carry
/// over; HP keeps its fraction of the new maximum, at least 1 unless fainted.
pub fn evolve(data: &GameData, pokemon: &mut PokemonInst, into: Species) {
    let from = pokemon.species;
    let old_max = pokemon.max_hp().max(1) as u32;
    let old_hp = pokemon.current_hp as u32;

    pokemon.species = into;
    pokemon.recalculate_stats(data);

    let scaled = (old_hp * pokemon.max_hp() as u32 / old_max) as u16;
    pokemon.current_hp = if old_hp == 0 { 0 } else { scaled.max(1) };

    info!(from = ?from, to = ?into, "evolved");
}
