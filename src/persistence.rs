//! Save documents.
//!
//! A save is one JSON document holding the player record, the rival and the
//! last healing point. Sets are written as sorted arrays and rebuilt on
//! load. Battles, dialog, menus, the shop, evolutions and credits are never
//! saved: a loaded game always starts in the overworld.

use crate::data::MAX_TEAM_SIZE;
use crate::errors::PersistError;
use crate::game_state::{GameState, RivalRecord};
use crate::player::{Direction, Location, Mount, PlayerRecord, Pokedex};
use crate::pokemon::PokemonInst;
use schema::{Badge, Item, Species};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

pub const SAVE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersistedPlayer {
    pub name: String,
    pub money: u32,
    pub badges: Vec<Badge>,
    pub team: Vec<PokemonInst>,
    #[serde(default)]
    pub pc: Vec<PokemonInst>,
    pub bag: BTreeMap<Item, u32>,
    pub seen: Vec<Species>,
    pub caught: Vec<Species>,
    pub defeated_trainers: Vec<String>,
    pub story_flags: Vec<String>,
    pub location: Location,
    #[serde(default)]
    pub facing: Direction,
    #[serde(default)]
    pub mount: Mount,
    #[serde(default)]
    pub steps: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersistedGame {
    pub version: u32,
    pub player: PersistedPlayer,
    pub rival: RivalRecord,
    pub last_pokecenter: Location,
}

fn sorted<T: Ord + Clone>(set: &HashSet<T>) -> Vec<T> {
    let mut values: Vec<T> = set.iter().cloned().collect();
    values.sort();
    values
}

pub fn to_persisted(game: &GameState) -> PersistedGame {
    let player = &game.player;
    PersistedGame {
        version: SAVE_VERSION,
        player: PersistedPlayer {
            name: player.name.clone(),
            money: player.money,
            badges: player.badges.clone(),
            team: player.team.clone(),
            pc: player.pc.clone(),
            bag: player.bag.clone(),
            seen: sorted(&player.pokedex.seen),
            caught: sorted(&player.pokedex.caught),
            defeated_trainers: sorted(&player.defeated_trainers),
            story_flags: sorted(&player.story_flags),
            location: player.location.clone(),
            facing: player.facing,
            mount: player.mount,
            steps: player.steps,
        },
        rival: game.rival.clone(),
        last_pokecenter: game.last_pokecenter.clone(),
    }
}

/// Rebuild a game from a decoded document. `None` for a different save
/// version or a document that breaks the team size limit.
pub fn from_persisted(saved: PersistedGame) -> Option<GameState> {
    if saved.version != SAVE_VERSION {
        warn!(found = saved.version, expected = SAVE_VERSION, "save version mismatch");
        return None;
    }
    let persisted = saved.player;
    if persisted.team.len() > MAX_TEAM_SIZE {
        warn!(team = persisted.team.len(), "save has an oversized team");
        return None;
    }

    let mut player = PlayerRecord::new(persisted.name, persisted.money, persisted.location);
    player.badges = persisted.badges;
    player.team = persisted.team;
    player.pc = persisted.pc;
    player.bag = persisted.bag;
    player.bag.retain(|_, count| *count > 0);
    player.pokedex = Pokedex {
        seen: persisted.seen.into_iter().collect(),
        caught: persisted.caught.into_iter().collect(),
    };
    player.defeated_trainers = persisted.defeated_trainers.into_iter().collect();
    player.story_flags = persisted.story_flags.into_iter().collect();
    player.facing = persisted.facing;
    player.mount = persisted.mount;
    player.steps = persisted.steps;

    Some(GameState::from_parts(
        player,
        saved.rival,
        saved.last_pokecenter,
    ))
}

pub fn encode(game: &GameState) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&to_persisted(game))?)
}

/// Decode a save document. Corrupt text and version mismatches are logged
/// and come back as `None`.
pub fn decode(document: &str) -> Option<GameState> {
    match serde_json::from_str::<PersistedGame>(document) {
        Ok(saved) => from_persisted(saved),
        Err(err) => {
            warn!(error = %err, "rejected corrupt save");
            None
        }
    }
}

/// Where saves live.
pub trait SaveStore {
    /// The saved game, or `None` when there is no usable save.
    fn load(&self) -> Option<GameState>;

    fn save(&mut self, game: &GameState) -> Result<(), PersistError>;
}

/// One JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    path: PathBuf,
}

impl FileSaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SaveStore for FileSaveStore {
    fn load(&self) -> Option<GameState> {
        match fs::read_to_string(&self.path) {
            Ok(document) => decode(&document),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "no save loaded");
                None
            }
        }
    }

    fn save(&mut self, game: &GameState) -> Result<(), PersistError> {
        let document = encode(game)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, document)?;
        info!(path = %self.path.display(), "game saved");
        Ok(())
    }
}

/// Keeps the document in memory. Used by tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    pub document: Option<String>,
}

impl SaveStore for MemorySaveStore {
    fn load(&self) -> Option<GameState> {
        self.document.as_deref().and_then(decode)
    }

    fn save(&mut self, game: &GameState) -> Result<(), PersistError> {
        self.document = Some(encode(game)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::test_data;
    use crate::rng::TurnRng;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn played_game() -> GameState {
        let data = test_data();
        let mut rng = TurnRng::new_for_test(vec![0.5]);
        let mut game = GameState::new_game("Red")
            .choose_starter(data, Species::Emberon, &mut rng)
            .unwrap();
        game.player.pokedex.mark_seen(Species::Pidglit);
        game.player.pokedex.mark_seen(Species::Rattipaw);
        game.player.defeated_trainers.insert("gym_brock".to_string());
        game.player.add_badge(Badge::Boulder);
        game.player.set_flag("rival_defeated_oak_lab");
        game
    }

    #[test]
    fn test_save_load_preserves_sets_and_drops_battle() {
        let data = test_data();
        let mut rng = TurnRng::new_for_test(vec![0.5]);
        let in_battle = played_game()
            .start_wild_battle(data, Species::Geodon, 5, &mut rng)
            .unwrap();
        assert!(in_battle.battle.is_some());

        let mut store = MemorySaveStore::default();
        store.save(&in_battle).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.battle, None);
        assert_eq!(loaded.phase, crate::game_state::GamePhase::Overworld);
        for species in [Species::Pidglit, Species::Rattipaw, Species::Geodon, Species::Emberon] {
            assert!(loaded.player.pokedex.seen.contains(&species), "{species:?}");
        }
        assert_eq!(loaded.player.pokedex, in_battle.player.pokedex);
        assert_eq!(loaded.player.defeated_trainers, in_battle.player.defeated_trainers);
        assert_eq!(loaded.player.story_flags, in_battle.player.story_flags);
        assert_eq!(loaded.player.team, in_battle.player.team);
        assert_eq!(loaded.rival, in_battle.rival);
    }

    #[test]
    fn test_sets_are_written_sorted() {
        let saved = to_persisted(&played_game());
        let mut expected = saved.player.seen.clone();
        expected.sort();
        assert_eq!(saved.player.seen, expected);
        assert_eq!(saved.version, SAVE_VERSION);
    }

    #[rstest]
    #[case("")]
    #[case("{ not json")]
    #[case("{\"version\": 1}")]
    fn test_corrupt_documents_load_as_none(#[case] document: &str) {
        assert_eq!(decode(document), None);
    }

    #[test]
    fn test_save_without_pc_loads_an_empty_box() {
        let game = played_game();
        let mut document: serde_json::Value =
            serde_json::from_str(&encode(&game).unwrap()).unwrap();
        document["player"].as_object_mut().unwrap().remove("pc");

        let loaded = decode(&document.to_string()).unwrap();
        assert!(loaded.player.pc.is_empty());
        assert_eq!(loaded.player.team, game.player.team);
    }

    #[test]
    fn test_version_mismatch_loads_as_none() {
        let mut saved = to_persisted(&played_game());
        saved.version = SAVE_VERSION + 1;
        assert_eq!(from_persisted(saved), None);
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        assert_eq!(MemorySaveStore::default().load(), None);
        let missing = FileSaveStore::new("/nonexistent/dir/save.json");
        assert_eq!(missing.load(), None);
    }
}
