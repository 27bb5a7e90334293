use crate::battle::calculators::status_damage;
use crate::battle::state::{BattleEvent, EventBus};
use crate::pokemon::PokemonInst;
use crate::rng::TurnRng;
use schema::StatusCondition;

const WAKE_CHANCE: f64 = 0.33;
const THAW_CHANCE: f64 = 0.2;
const FULL_PARALYSIS_CHANCE: f64 = 0.25;

/// Roll the pre-move status checks. Sleep and freeze may clear and let the
/// Pokemon act this turn; paralysis keeps its status either way.
/// Returns whether the Pokemon gets to use its move.
pub fn check_can_act(
    pokemon: &mut PokemonInst,
    name: &str,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> bool {
    let pokemon_name = name.to_string();
    match pokemon.status {
        Some(StatusCondition::Sleep) => {
            if rng.chance(WAKE_CHANCE, "wake up") {
                pokemon.status = None;
                bus.push(BattleEvent::WokeUp {
                    pokemon: pokemon_name,
                });
                true
            } else {
                bus.push(BattleEvent::FastAsleep {
                    pokemon: pokemon_name,
                });
                false
            }
        }
        Some(StatusCondition::Freeze) => {
            if rng.chance(THAW_CHANCE, "thaw") {
                pokemon.status = None;
                bus.push(BattleEvent::ThawedOut {
                    pokemon: pokemon_name,
                });
                true
            } else {
                bus.push(BattleEvent::FrozenSolid {
                    pokemon: pokemon_name,
                });
                false
            }
        }
        Some(StatusCondition::Paralysis) => {
            if rng.chance(FULL_PARALYSIS_CHANCE, "full paralysis") {
                bus.push(BattleEvent::FullyParalyzed {
                    pokemon: pokemon_name,
                });
                false
            } else {
                true
            }
        }
        Some(StatusCondition::Poison) | Some(StatusCondition::Burn) | None => true,
    }
}

/// A Pokemon holds at most one status; fainted Pokemon take none.
pub fn try_inflict_status(pokemon: &mut PokemonInst, status: StatusCondition) -> bool {
    if pokemon.status.is_some() || pokemon.is_fainted() {
        return false;
    }
    pokemon.status = Some(status);
    true
}

/// End-of-turn poison or burn damage. Returns the HP lost.
pub fn apply_status_damage(pokemon: &mut PokemonInst, name: &str, bus: &mut EventBus) -> u16 {
    if pokemon.is_fainted() {
        return 0;
    }
    let Some(status) = pokemon.status else {
        return 0;
    };
    let Some(damage) = status_damage(pokemon.max_hp(), status) else {
        return 0;
    };
    let lost = pokemon.take_damage(damage);
    bus.push(BattleEvent::StatusDamage {
        pokemon: name.to_string(),
        status,
        damage: lost,
    });
    lost
}
