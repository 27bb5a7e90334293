use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl PokemonType {
    /// Chart entries that differ from 1.0 when this type attacks.
    fn matchups(self) -> &'static [(PokemonType, f64)] {
        use PokemonType::*;
        match self {
            Normal => &[(Rock, 0.5), (Ghost, 0.0)],
            Fire => &[
                (Fire, 0.5), (Water, 0.5), (Grass, 2.0), (Ice, 2.0),
                (Bug, 2.0), (Rock, 0.5), (Dragon, 0.5),
            ],
            Water => &[
                (Fire, 2.0), (Water, 0.5), (Grass, 0.5), (Ground, 2.0),
                (Rock, 2.0), (Dragon, 0.5),
            ],
            Grass => &[
                (Fire, 0.5), (Water, 2.0), (Grass, 0.5), (Poison, 0.5), (Ground, 2.0),
                (Flying, 0.5), (Bug, 0.5), (Rock, 2.0), (Dragon, 0.5),
            ],
            Electric => &[
                (Water, 2.0), (Grass, 0.5), (Electric, 0.5), (Ground, 0.0),
                (Flying, 2.0), (Dragon, 0.5),
            ],
            Ice => &[
                (Fire, 0.5), (Water, 0.5), (Grass, 2.0), (Ice, 0.5),
                (Ground, 2.0), (Flying, 2.0), (Dragon, 2.0),
            ],
            Fighting => &[
                (Normal, 2.0), (Ice, 2.0), (Poison, 0.5), (Flying, 0.5),
                (Psychic, 0.5), (Bug, 0.5), (Rock, 2.0), (Ghost, 0.0),
            ],
            Poison => &[(Grass, 2.0), (Poison, 0.5), (Ground, 0.5), (Rock, 0.5), (Ghost, 0.5)],
            Ground => &[
                (Fire, 2.0), (Electric, 2.0), (Grass, 0.5), (Poison, 2.0),
                (Flying, 0.0), (Bug, 0.5), (Rock, 2.0),
            ],
            Flying => &[(Grass, 2.0), (Electric, 0.5), (Fighting, 2.0), (Bug, 2.0), (Rock, 0.5)],
            Psychic => &[(Fighting, 2.0), (Poison, 2.0), (Psychic, 0.5)],
            Bug => &[
                (Fire, 0.5), (Grass, 2.0), (Fighting, 0.5), (Poison, 0.5),
                (Flying, 0.5), (Psychic, 2.0), (Ghost, 0.5),
            ],
            Rock => &[
                (Fire, 2.0), (Ice, 2.0), (Fighting, 0.5), (Ground, 0.5),
                (Flying, 2.0), (Bug, 2.0),
            ],
            Ghost => &[(Normal, 0.0), (Ghost, 2.0), (Psychic, 0.0)],
            Dragon => &[(Dragon, 2.0)],
        }
    }

    /// Single chart lookup: 2.0, 0.5, 0.0 or the default 1.0.
    pub fn type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f64 {
        attacking
            .matchups()
            .iter()
            .find(|(defender, _)| *defender == defending)
            .map_or(1.0, |(_, multiplier)| *multiplier)
    }

    /// Product of the chart entries for every defending type.
    pub fn effectiveness_against(attacking: PokemonType, defending: &[PokemonType]) -> f64 {
        defending
            .iter()
            .map(|&defender| Self::type_effectiveness(attacking, defender))
            .product()
    }

    pub fn is_immune(attacking: PokemonType, defending: PokemonType) -> bool {
        Self::type_effectiveness(attacking, defending) == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_types_multiply() {
        use PokemonType::*;
        assert_eq!(PokemonType::effectiveness_against(Ice, &[Ground, Flying]), 4.0);
        assert_eq!(PokemonType::effectiveness_against(Fire, &[Water, Dragon]), 0.25);
        assert_eq!(PokemonType::effectiveness_against(Electric, &[Water, Ground]), 0.0);
        assert_eq!(PokemonType::effectiveness_against(Normal, &[Fire]), 1.0);
    }

    #[test]
    fn ghost_cannot_touch_psychic_or_normal() {
        assert!(PokemonType::is_immune(PokemonType::Ghost, PokemonType::Psychic));
        assert!(PokemonType::is_immune(PokemonType::Ghost, PokemonType::Normal));
        assert!(PokemonType::is_immune(PokemonType::Normal, PokemonType::Ghost));
    }
}
