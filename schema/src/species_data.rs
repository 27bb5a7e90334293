use crate::{Move, PokemonType};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Species {
    // Starters
    Emberon,
    Blazeron,
    Infernox,
    Aqualing,
    Tidalon,
    Tsunamix,
    Sproutley,
    Thornox,
    Florapex,
    // Early routes
    Buglin,
    Rattipaw,
    Rattifang,
    Pidglit,
    Pidgsoar,
    Pidgstorm,
    Oddling,
    Geodon,
    Boulderox,
    Punchub,
    Champeon,
    Goldish,
    Meowzy,
    // Mid game
    Magnolt,
    Voltorex,
    Zaprat,
    Snekil,
    Cobrix,
    Stingbee,
    Psydux,
    Psyclops,
    Jinxia,
    Growlith,
    Foxflame,
    Digmole,
    // Late game
    Drakelet,
    Draconix,
    Frostkit,
    Glacirex,
    Slowpox,
    Ghoulby,
    Spectrox,
    Snorlord,
    Fossilon,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn total(&self) -> u16 {
        self.hp as u16
            + self.attack as u16
            + self.defense as u16
            + self.sp_attack as u16
            + self.sp_defense as u16
            + self.speed as u16
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvolutionData {
    pub level: u8,
    pub evolves_to: Species,
}

/// Static record for a species, loaded from `data/species.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: Species,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    /// (level, move) pairs in ascending level order.
    pub learnset: Vec<(u8, Move)>,
    #[serde(default)]
    pub evolution: Option<EvolutionData>,
    pub catch_rate: u8,
    pub exp_yield: u16,
    #[serde(default)]
    pub description: String,
}

impl SpeciesData {
    /// Moves learned exactly at `level`.
    pub fn moves_learned_at(&self, level: u8) -> impl Iterator<Item = Move> + '_ {
        self.learnset
            .iter()
            .filter(move |(learn_level, _)| *learn_level == level)
            .map(|(_, move_)| *move_)
    }

    /// The last four moves learnable at or below `level`, oldest first.
    pub fn default_moves(&self, level: u8) -> Vec<Move> {
        let available: Vec<Move> = self
            .learnset
            .iter()
            .filter(|(learn_level, _)| *learn_level <= level)
            .map(|(_, move_)| *move_)
            .collect();
        let skip = available.len().saturating_sub(4);
        available.into_iter().skip(skip).collect()
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }
}
