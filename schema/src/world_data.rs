use crate::Species;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainerClass {
    Trainer,
    GymLeader,
    EliteFour,
    Champion,
    Rival,
}

/// Gym badges in the order the gyms are meant to be challenged.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter,
)]
pub enum Badge {
    Boulder,
    Cascade,
    Thunder,
    Rainbow,
    Soul,
    Marsh,
    Volcano,
    Earth,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} Badge", self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainerMon {
    pub species: Species,
    pub level: u8,
}

/// Static record for an NPC trainer, loaded from `data/trainers.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerData {
    pub id: String,
    pub name: String,
    pub class: TrainerClass,
    pub team: Vec<TrainerMon>,
    pub reward: u32,
    #[serde(default)]
    pub badge: Option<Badge>,
    #[serde(default)]
    pub pre_dialog: Vec<String>,
    #[serde(default)]
    pub defeat_dialog: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WildEncounter {
    pub species: Species,
    pub min_level: u8,
    pub max_level: u8,
    pub weight: u32,
}

/// Wild encounter table for one map, loaded from `data/encounters.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterZone {
    pub id: String,
    pub name: String,
    /// Percent chance per grass step.
    pub rate: u8,
    pub encounters: Vec<WildEncounter>,
}

/// A scripted rival fight, loaded from `data/rivals.ron`. The rival's starter
/// is derived from the player's choice; `team` lists the supporting members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RivalEncounter {
    pub id: String,
    /// Map the fight triggers on.
    pub map: String,
    #[serde(default)]
    pub trigger_area: Option<TriggerArea>,
    pub starter_level: u8,
    pub team: Vec<TrainerMon>,
    pub reward: u32,
    #[serde(default)]
    pub requires_flag: Option<String>,
    pub story_flag: String,
    #[serde(default)]
    pub pre_dialog: Vec<String>,
    #[serde(default)]
    pub defeat_dialog: Vec<String>,
}

/// Inclusive tile rectangle on a map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerArea {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl TriggerArea {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}
