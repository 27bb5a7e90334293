use crate::rng::TurnRng;
use schema::{EncounterZone, Species};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WildRoll {
    pub species: Species,
    pub level: u8,
}

/// One grass step. Returns the Pokemon that jumps out, if any.
///
/// Draws: the zone rate, then a weighted pick, then the level.
pub fn roll_wild_encounter(zone: &EncounterZone, rng: &mut TurnRng) -> Option<WildRoll> {
    if rng.next_outcome("encounter rate") * 100.0 >= zone.rate as f64 {
        return None;
    }
    let last = zone.encounters.last()?;

    let total_weight: u32 = zone.encounters.iter().map(|entry| entry.weight).sum();
    let mut roll = rng.next_outcome("encounter species") * total_weight as f64;
    for entry in &zone.encounters {
        roll -= entry.weight as f64;
        if roll < 0.0 {
            let level = rng.range_inclusive(entry.min_level, entry.max_level, "encounter level");
            debug!(zone = %zone.id, species = ?entry.species, level, "wild encounter");
            return Some(WildRoll {
                species: entry.species,
                level,
            });
        }
    }

    Some(WildRoll {
        species: last.species,
        level: last.min_level,
    })
}
