use crate::pokemon::PokemonInst;
use crate::rng::TurnRng;
use schema::{MoveCategory, StatType};
use std::collections::HashMap;

pub const MAX_STAGE: i8 = 6;

pub type StatStages = HashMap<StatType, i8>;

fn stage_of(stages: &StatStages, stat: StatType) -> i8 {
    stages.get(&stat).copied().unwrap_or(0)
}

/// A stat with its stage multiplier applied.
pub fn effective_stat(pokemon: &PokemonInst, stages: &StatStages, stat: StatType) -> u16 {
    apply_stat_stage_multiplier(pokemon.stats.get(stat), stage_of(stages, stat))
}

/// Attack stat used by a move of the given category. Status moves use none.
pub fn effective_attack(pokemon: &PokemonInst, stages: &StatStages, category: MoveCategory) -> u16 {
    match category {
        MoveCategory::Physical => effective_stat(pokemon, stages, StatType::Attack),
        MoveCategory::Special => effective_stat(pokemon, stages, StatType::SpecialAttack),
        MoveCategory::Status => 0,
    }
}

pub fn effective_defense(
    pokemon: &PokemonInst,
    stages: &StatStages,
    category: MoveCategory,
) -> u16 {
    match category {
        MoveCategory::Physical => effective_stat(pokemon, stages, StatType::Defense),
        MoveCategory::Special => effective_stat(pokemon, stages, StatType::SpecialDefense),
        MoveCategory::Status => 0,
    }
}

/// Speed after stat stages. Paralysis does not slow the holder.
pub fn effective_speed(pokemon: &PokemonInst, stages: &StatStages) -> u16 {
    effective_stat(pokemon, stages, StatType::Speed)
}

/// Accuracy 0 never misses; 100 and above hit without a draw.
pub fn move_hits(accuracy: u8, rng: &mut TurnRng) -> bool {
    if accuracy == 0 || accuracy >= 100 {
        return true;
    }
    rng.next_outcome("accuracy") * 100.0 < accuracy as f64
}

/// Apply stat stage multipliers according to Pokemon formula
/// Stages range from -6 to +6
/// Negative stages: (2 / (2 + |stage|))
/// Positive stages: ((2 + stage) / 2)
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    let clamped_stage = stage.clamp(-MAX_STAGE, MAX_STAGE);

    if clamped_stage == 0 {
        return base_stat;
    }

    let multiplier = if clamped_stage < 0 {
        2.0 / (2.0 + (-clamped_stage) as f64)
    } else {
        (2.0 + clamped_stage as f64) / 2.0
    };

    ((base_stat as f64) * multiplier).round() as u16
}

/// Move a stage by `delta`, clamped to ±6. Returns the change actually applied.
pub fn change_stage(stages: &mut StatStages, stat: StatType, delta: i8) -> i8 {
    let current = stage_of(stages, stat);
    let next = (current + delta).clamp(-MAX_STAGE, MAX_STAGE);
    if next == 0 {
        stages.remove(&stat);
    } else {
        stages.insert(stat, next);
    }
    next - current
}
