//! Read-only registry of the static game tables.
//!
//! The tables ship as RON files embedded into the binary. `GameData::load`
//! parses and cross-checks them once at startup; every lookup afterwards is
//! infallible because a table that fails validation never produces a
//! `GameData` value.

use crate::errors::{DataError, DataResult};
use schema::{
    EncounterZone, Item, ItemCategory, ItemData, ItemEffect, Move, MoveCategory, MoveData,
    RivalEncounter, Species, SpeciesData, TrainerData,
};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// The three species offered at the start of the game.
pub const STARTERS: [Species; 3] = [Species::Emberon, Species::Aqualing, Species::Sproutley];

/// Elite Four trainer ids in challenge order.
pub const ELITE_FOUR: [&str; 4] = [
    "elite4_lorelei",
    "elite4_bruno",
    "elite4_agatha",
    "elite4_lance",
];

pub const CHAMPION_ID: &str = "champion_gary";

pub const MAX_LEVEL: u8 = 100;
pub const MAX_TEAM_SIZE: usize = 6;

/// Raw RON text for each table.
#[derive(Debug, Clone, Copy)]
pub struct DataSources<'a> {
    pub species: &'a str,
    pub moves: &'a str,
    pub items: &'a str,
    pub trainers: &'a str,
    pub encounters: &'a str,
    pub rivals: &'a str,
}

impl DataSources<'static> {
    pub fn embedded() -> Self {
        Self {
            species: include_str!("../data/species.ron"),
            moves: include_str!("../data/moves.ron"),
            items: include_str!("../data/items.ron"),
            trainers: include_str!("../data/trainers.ron"),
            encounters: include_str!("../data/encounters.ron"),
            rivals: include_str!("../data/rivals.ron"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameData {
    // Indexed by enum discriminant; validation guarantees one entry per variant.
    species: Vec<SpeciesData>,
    moves: Vec<MoveData>,
    items: Vec<ItemData>,
    trainers: HashMap<String, TrainerData>,
    zones: HashMap<String, EncounterZone>,
    rivals: Vec<RivalEncounter>,
}

impl GameData {
    /// Load the tables compiled into the binary.
    pub fn load() -> DataResult<Self> {
        Self::from_sources(DataSources::embedded())
    }

    pub fn from_sources(sources: DataSources<'_>) -> DataResult<Self> {
        let species: Vec<SpeciesData> = parse_table("species", sources.species)?;
        let moves: Vec<MoveData> = parse_table("moves", sources.moves)?;
        let items: Vec<ItemData> = parse_table("items", sources.items)?;
        let trainers: Vec<TrainerData> = parse_table("trainers", sources.trainers)?;
        let zones: Vec<EncounterZone> = parse_table("encounters", sources.encounters)?;
        let rivals: Vec<RivalEncounter> = parse_table("rivals", sources.rivals)?;

        let moves = index_moves(moves)?;
        let items = index_items(items)?;
        let species = index_species(species)?;

        for entry in &species {
            validate_species(entry, &species)?;
        }

        let trainers = index_trainers(trainers)?;
        for required in ELITE_FOUR.iter().chain(std::iter::once(&CHAMPION_ID)) {
            if !trainers.contains_key(*required) {
                return Err(DataError::InvalidTrainer {
                    id: required.to_string(),
                    reason: "required trainer is missing".to_string(),
                });
            }
        }

        let zones = index_zones(zones)?;
        validate_rivals(&rivals)?;

        info!(
            species = species.len(),
            moves = moves.len(),
            items = items.len(),
            trainers = trainers.len(),
            zones = zones.len(),
            rivals = rivals.len(),
            "Loaded game data"
        );

        Ok(Self {
            species,
            moves,
            items,
            trainers,
            zones,
            rivals,
        })
    }

    pub fn species(&self, id: Species) -> &SpeciesData {
        &self.species[id as usize]
    }

    pub fn move_data(&self, id: Move) -> &MoveData {
        &self.moves[id as usize]
    }

    pub fn item(&self, id: Item) -> &ItemData {
        &self.items[id as usize]
    }

    pub fn trainer(&self, id: &str) -> Option<&TrainerData> {
        self.trainers.get(id)
    }

    pub fn zone(&self, id: &str) -> Option<&EncounterZone> {
        self.zones.get(id)
    }

    pub fn rival_encounter(&self, id: &str) -> Option<&RivalEncounter> {
        self.rivals.iter().find(|rival| rival.id == id)
    }

    /// Rival encounters in story order.
    pub fn rival_encounters(&self) -> &[RivalEncounter] {
        &self.rivals
    }

    pub fn all_species(&self) -> impl Iterator<Item = &SpeciesData> {
        self.species.iter()
    }

    /// Gym leaders ordered by the badge they award.
    pub fn gym_order(&self) -> Vec<&TrainerData> {
        let mut leaders: Vec<&TrainerData> = self
            .trainers
            .values()
            .filter(|trainer| trainer.badge.is_some())
            .collect();
        leaders.sort_by_key(|trainer| trainer.badge);
        leaders
    }
}

fn parse_table<T: DeserializeOwned>(table: &'static str, text: &str) -> DataResult<Vec<T>> {
    let entries: Vec<T> =
        ron::from_str(text).map_err(|source| DataError::Parse { table, source })?;
    debug!(table, entries = entries.len(), "Parsed table");
    Ok(entries)
}

fn index_species(mut entries: Vec<SpeciesData>) -> DataResult<Vec<SpeciesData>> {
    entries.sort_by_key(|entry| entry.id);
    if let Some(pair) = entries.windows(2).find(|pair| pair[0].id == pair[1].id) {
        return Err(DataError::DuplicateEntry {
            table: "species",
            id: pair[0].id.as_ref().to_string(),
        });
    }
    for (position, expected) in Species::iter().enumerate() {
        if entries.get(position).map(|entry| entry.id) != Some(expected) {
            return Err(DataError::MissingSpecies(expected));
        }
    }
    Ok(entries)
}

fn index_moves(mut entries: Vec<MoveData>) -> DataResult<Vec<MoveData>> {
    entries.sort_by_key(|entry| entry.id);
    if let Some(pair) = entries.windows(2).find(|pair| pair[0].id == pair[1].id) {
        return Err(DataError::DuplicateEntry {
            table: "moves",
            id: pair[0].id.as_ref().to_string(),
        });
    }
    for (position, expected) in Move::iter().enumerate() {
        let Some(entry) = entries.get(position).filter(|entry| entry.id == expected) else {
            return Err(DataError::MissingMove(expected));
        };
        if entry.accuracy > 100 {
            return Err(DataError::InvalidMove(
                expected,
                format!("accuracy {} exceeds 100", entry.accuracy),
            ));
        }
        if entry.pp == 0 {
            return Err(DataError::InvalidMove(expected, "pp must be positive".to_string()));
        }
        if entry.category == MoveCategory::Status && entry.power > 0 {
            return Err(DataError::InvalidMove(
                expected,
                "status moves cannot have power".to_string(),
            ));
        }
    }
    Ok(entries)
}

fn index_items(mut entries: Vec<ItemData>) -> DataResult<Vec<ItemData>> {
    entries.sort_by_key(|entry| entry.id);
    if let Some(pair) = entries.windows(2).find(|pair| pair[0].id == pair[1].id) {
        return Err(DataError::DuplicateEntry {
            table: "items",
            id: pair[0].id.as_ref().to_string(),
        });
    }
    for (position, expected) in Item::iter().enumerate() {
        let Some(entry) = entries.get(position).filter(|entry| entry.id == expected) else {
            return Err(DataError::MissingItem(expected));
        };
        let consistent = match (entry.category, &entry.effect) {
            (ItemCategory::Pokeball, Some(ItemEffect::Catch { multiplier })) => *multiplier > 0.0,
            (ItemCategory::Medicine, Some(effect)) => !matches!(effect, ItemEffect::Catch { .. }),
            (ItemCategory::Key, None) => true,
            _ => false,
        };
        if !consistent {
            return Err(DataError::InvalidItem(
                expected,
                "effect does not match category".to_string(),
            ));
        }
    }
    Ok(entries)
}

fn validate_species(entry: &SpeciesData, all: &[SpeciesData]) -> DataResult<()> {
    if entry.types.is_empty() || entry.types.len() > 2 {
        return Err(DataError::InvalidSpecies(
            entry.id,
            format!("expected 1-2 types, found {}", entry.types.len()),
        ));
    }
    if entry.learnset.is_empty() {
        return Err(DataError::InvalidLearnset(entry.id, "learnset is empty".to_string()));
    }
    if entry.learnset.windows(2).any(|pair| pair[0].0 > pair[1].0) {
        return Err(DataError::InvalidLearnset(
            entry.id,
            "levels are not ascending".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for (level, move_) in &entry.learnset {
        if *level == 0 || *level > MAX_LEVEL {
            return Err(DataError::InvalidLearnset(
                entry.id,
                format!("learn level {level} out of range"),
            ));
        }
        if !seen.insert(*move_) {
            return Err(DataError::InvalidLearnset(
                entry.id,
                format!("{:?} appears twice", move_),
            ));
        }
    }

    if let Some(evolution) = &entry.evolution {
        if evolution.evolves_to == entry.id {
            return Err(DataError::CyclicEvolution(entry.id));
        }
        if evolution.level == 0 || evolution.level > MAX_LEVEL {
            return Err(DataError::InvalidEvolution(
                entry.id,
                format!("evolution level {} out of range", evolution.level),
            ));
        }
    }

    // Walk the chain; a chain longer than the species count must loop.
    let mut current = entry;
    let mut steps = 0;
    while let Some(evolution) = &current.evolution {
        steps += 1;
        if steps > all.len() {
            return Err(DataError::CyclicEvolution(entry.id));
        }
        current = &all[evolution.evolves_to as usize];
    }
    Ok(())
}

fn validate_team(id: &str, team: &[schema::TrainerMon], allow_empty: bool) -> DataResult<()> {
    if team.len() > MAX_TEAM_SIZE || (!allow_empty && team.is_empty()) {
        return Err(DataError::InvalidTrainer {
            id: id.to_string(),
            reason: format!("team size {} out of range", team.len()),
        });
    }
    if let Some(member) = team
        .iter()
        .find(|member| member.level == 0 || member.level > MAX_LEVEL)
    {
        return Err(DataError::InvalidTrainer {
            id: id.to_string(),
            reason: format!("{:?} has invalid level {}", member.species, member.level),
        });
    }
    Ok(())
}

fn index_trainers(entries: Vec<TrainerData>) -> DataResult<HashMap<String, TrainerData>> {
    let mut trainers = HashMap::with_capacity(entries.len());
    for trainer in entries {
        validate_team(&trainer.id, &trainer.team, false)?;
        if trainer.badge.is_some() && trainer.class != schema::TrainerClass::GymLeader {
            return Err(DataError::InvalidTrainer {
                id: trainer.id.clone(),
                reason: "only gym leaders award badges".to_string(),
            });
        }
        if trainers.contains_key(&trainer.id) {
            return Err(DataError::DuplicateEntry {
                table: "trainers",
                id: trainer.id,
            });
        }
        trainers.insert(trainer.id.clone(), trainer);
    }
    Ok(trainers)
}

fn index_zones(entries: Vec<EncounterZone>) -> DataResult<HashMap<String, EncounterZone>> {
    let mut zones = HashMap::with_capacity(entries.len());
    for zone in entries {
        let invalid = |reason: String| DataError::InvalidEncounterZone {
            id: zone.id.clone(),
            reason,
        };
        if zone.rate > 100 {
            return Err(invalid(format!("rate {} exceeds 100", zone.rate)));
        }
        for encounter in &zone.encounters {
            if encounter.weight == 0 {
                return Err(invalid(format!("{:?} has zero weight", encounter.species)));
            }
            if encounter.min_level == 0
                || encounter.min_level > encounter.max_level
                || encounter.max_level > MAX_LEVEL
            {
                return Err(invalid(format!(
                    "{:?} has invalid level range {}-{}",
                    encounter.species, encounter.min_level, encounter.max_level
                )));
            }
        }
        if zones.contains_key(&zone.id) {
            return Err(DataError::DuplicateEntry {
                table: "encounters",
                id: zone.id,
            });
        }
        zones.insert(zone.id.clone(), zone);
    }
    Ok(zones)
}

fn validate_rivals(rivals: &[RivalEncounter]) -> DataResult<()> {
    let mut ids = HashSet::new();
    for rival in rivals {
        if !ids.insert(rival.id.as_str()) {
            return Err(DataError::DuplicateEntry {
                table: "rivals",
                id: rival.id.clone(),
            });
        }
        // The rival's starter takes the final slot.
        if rival.team.len() >= MAX_TEAM_SIZE {
            return Err(DataError::InvalidRivalEncounter {
                id: rival.id.clone(),
                reason: "no room for the rival's starter".to_string(),
            });
        }
        if rival.starter_level == 0 || rival.starter_level > MAX_LEVEL {
            return Err(DataError::InvalidRivalEncounter {
                id: rival.id.clone(),
                reason: format!("starter level {} out of range", rival.starter_level),
            });
        }
        validate_team(&rival.id, &rival.team, true).map_err(|err| {
            DataError::InvalidRivalEncounter {
                id: rival.id.clone(),
                reason: err.to_string(),
            }
        })?;
    }
    Ok(())
}
