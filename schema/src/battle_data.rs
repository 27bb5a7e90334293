use serde::{Deserialize, Serialize};
use std::fmt;

/// Persistent (non-volatile) status. At most one per Pokemon.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCondition {
    Poison,
    Burn,
    Paralysis,
    Sleep,
    Freeze,
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusCondition::Poison => "poison",
            StatusCondition::Burn => "burn",
            StatusCondition::Paralysis => "paralysis",
            StatusCondition::Sleep => "sleep",
            StatusCondition::Freeze => "freeze",
        };
        write!(f, "{}", display_name)
    }
}

/// Stats that can be raised or lowered in stages during a battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpecialAttack => "Sp. Atk",
            StatType::SpecialDefense => "Sp. Def",
            StatType::Speed => "Speed",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    User,
    Target,
}

/// Secondary effect declared on a move. `chance` is a percentage (0-100).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum MoveEffect {
    Status {
        status: StatusCondition,
        chance: u8,
    },
    StatChange {
        target: EffectTarget,
        stat: StatType,
        stages: i8,
        chance: u8,
    },
    /// Status move: restore half of the user's max HP.
    Heal,
    /// Damaging move: the user recovers half of the damage dealt.
    Drain,
    /// Carried in the tables but not resolved by the engine.
    Flinch { chance: u8 },
}
