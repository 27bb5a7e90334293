use crate::battle::stats::{effective_attack, effective_defense, StatStages};
use crate::data::GameData;
use crate::pokemon::PokemonInst;
use crate::rng::TurnRng;
use schema::{MoveCategory, MoveData, PokemonType, StatusCondition};
use tracing::debug;

pub const CRIT_MULTIPLIER: f64 = 1.5;
pub const STAB_MULTIPLIER: f64 = 1.5;
const BASE_CRIT_CHANCE: f64 = 1.0 / 16.0;
const HIGH_CRIT_CHANCE: f64 = 1.0 / 4.0;
const MAX_ESCAPE_CHANCE: f64 = 0.95;

/// Product of the chart entries for the move type against every defender type.
pub fn type_effectiveness(move_type: PokemonType, defender_types: &[PokemonType]) -> f64 {
    defender_types
        .iter()
        .map(|defending| PokemonType::type_effectiveness(move_type, *defending))
        .product()
}

pub fn is_critical_hit(high_crit: bool, rng: &mut TurnRng) -> bool {
    let chance = if high_crit {
        HIGH_CRIT_CHANCE
    } else {
        BASE_CRIT_CHANCE
    };
    rng.chance(chance, "critical hit")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub effectiveness: f64,
    pub critical: bool,
}

impl DamageOutcome {
    fn none(effectiveness: f64) -> Self {
        Self {
            damage: 0,
            effectiveness,
            critical: false,
        }
    }
}

/// One side of an attack: the Pokemon and its current stat stages.
#[derive(Debug, Clone, Copy)]
pub struct Combatant<'a> {
    pub pokemon: &'a PokemonInst,
    pub stages: &'a StatStages,
}

/// `floor(((2L/5+2) * power * atk/def / 50 + 2) * crit * stab * eff * random * burn)`
///
/// Draws the critical-hit roll and then the damage roll. Status moves and
/// immune targets take no draws.
pub fn calculate_damage(
    data: &GameData,
    attacker: Combatant<'_>,
    defender: Combatant<'_>,
    move_data: &MoveData,
    rng: &mut TurnRng,
) -> DamageOutcome {
    if move_data.power == 0 || move_data.category == MoveCategory::Status {
        return DamageOutcome::none(1.0);
    }

    let defender_types = &data.species(defender.pokemon.species).types;
    let effectiveness = type_effectiveness(move_data.move_type, defender_types);
    if effectiveness == 0.0 {
        return DamageOutcome::none(0.0);
    }

    let critical = is_critical_hit(move_data.high_crit, rng);
    let roll = rng.next_outcome("damage roll");

    let level = attacker.pokemon.level as f64;
    let attack = effective_attack(attacker.pokemon, attacker.stages, move_data.category) as f64;
    let defense =
        effective_defense(defender.pokemon, defender.stages, move_data.category).max(1) as f64;

    let base = (2.0 * level / 5.0 + 2.0) * move_data.power as f64 * attack / defense / 50.0 + 2.0;
    let crit = if critical { CRIT_MULTIPLIER } else { 1.0 };
    let stab = if data
        .species(attacker.pokemon.species)
        .has_type(move_data.move_type)
    {
        STAB_MULTIPLIER
    } else {
        1.0
    };
    let random = 0.85 + roll * 0.15;
    let burn = if move_data.category == MoveCategory::Physical
        && attacker.pokemon.status == Some(StatusCondition::Burn)
    {
        0.5
    } else {
        1.0
    };

    let raw = (base * crit * stab * effectiveness * random * burn).floor();
    let damage = (raw as u16).max(1);
    debug!(
        move_name = %move_data.name,
        damage,
        effectiveness,
        critical,
        "damage calculated"
    );
    DamageOutcome {
        damage,
        effectiveness,
        critical,
    }
}

/// `min(0.95, (player_speed * 128 / max(1, enemy_speed) + 30) / 256)`
pub fn escape_chance(player_speed: u16, enemy_speed: u16) -> f64 {
    let odds = (player_speed as f64 * 128.0 / enemy_speed.max(1) as f64 + 30.0) / 256.0;
    odds.min(MAX_ESCAPE_CHANCE)
}

/// End-of-turn damage for poison (1/8) and burn (1/16), at least 1.
pub fn status_damage(max_hp: u16, status: StatusCondition) -> Option<u16> {
    match status {
        StatusCondition::Poison => Some((max_hp / 8).max(1)),
        StatusCondition::Burn => Some((max_hp / 16).max(1)),
        _ => None,
    }
}
