use crate::data::GameData;
use crate::pokemon::PokemonInst;
use crate::rng::TurnRng;
use schema::StatusCondition;

/// Capture probability in `[0, 1]`.
/// Formula: p = min(1, catch_rate * hp_factor * ball_multiplier / 255 + status_bonus)
/// where hp_factor = (3 * max_hp - 2 * current_hp) / (3 * max_hp)
pub fn calculate_catch_probability(
    data: &GameData,
    target_pokemon: &PokemonInst,
    ball_multiplier: f64,
) -> f64 {
    let base_catch_rate = data.species(target_pokemon.species).catch_rate as f64;

    let max_hp = target_pokemon.max_hp().max(1) as f64;
    let current_hp = target_pokemon.current_hp as f64;
    let hp_factor = (max_hp * 3.0 - current_hp * 2.0) / (max_hp * 3.0);

    let probability = base_catch_rate * hp_factor * ball_multiplier / 255.0
        + status_bonus(target_pokemon.status);
    probability.clamp(0.0, 1.0)
}

/// Flat bonus for a status condition on the target
fn status_bonus(status: Option<StatusCondition>) -> f64 {
    match status {
        Some(StatusCondition::Sleep) | Some(StatusCondition::Freeze) => 0.1,
        Some(_) => 0.05,
        None => 0.0,
    }
}

/// Roll for catch success using the calculated probability
/// Returns true if the catch succeeds
pub fn roll_catch_success(probability: f64, rng: &mut TurnRng) -> bool {
    rng.chance(probability, "catch roll")
}
