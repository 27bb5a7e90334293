use crate::data::MAX_TEAM_SIZE;
use crate::errors::{ActionError, ActionResult};
use crate::pokemon::PokemonInst;
use schema::{Badge, Item, Species};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Maps where the bicycle stays folded.
const INDOOR_MAPS: [&str; 4] = ["pokecenter", "pokemart", "oak_lab", "elite4"];

pub fn is_indoor_map(map: &str) -> bool {
    INDOOR_MAPS.contains(&map) || map.starts_with("gym_")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub map: String,
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(map: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            map: map.into(),
            x,
            y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mount {
    #[default]
    Walking,
    Bicycle,
    Surfing,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pokedex {
    pub seen: HashSet<Species>,
    pub caught: HashSet<Species>,
}

impl Pokedex {
    pub fn mark_seen(&mut self, species: Species) {
        self.seen.insert(species);
    }

    /// Caught implies seen.
    pub fn mark_caught(&mut self, species: Species) {
        self.seen.insert(species);
        self.caught.insert(species);
    }
}

/// Everything the player owns and has done. The team never holds more than six.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub money: u32,
    pub badges: Vec<Badge>,
    pub team: Vec<PokemonInst>,
    pub pc: Vec<PokemonInst>,
    pub bag: BTreeMap<Item, u32>,
    pub pokedex: Pokedex,
    pub defeated_trainers: HashSet<String>,
    pub story_flags: HashSet<String>,
    pub location: Location,
    pub facing: Direction,
    pub mount: Mount,
    pub steps: u32,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, money: u32, location: Location) -> Self {
        Self {
            name: name.into(),
            money,
            badges: Vec::new(),
            team: Vec::new(),
            pc: Vec::new(),
            bag: BTreeMap::new(),
            pokedex: Pokedex::default(),
            defeated_trainers: HashSet::new(),
            story_flags: HashSet::new(),
            location,
            facing: Direction::default(),
            mount: Mount::default(),
            steps: 0,
        }
    }

    pub fn item_count(&self, item: Item) -> u32 {
        self.bag.get(&item).copied().unwrap_or(0)
    }

    pub fn add_item(&mut self, item: Item, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.bag.entry(item).or_insert(0) += quantity;
    }

    /// Take one `item` out of the bag; the entry disappears at zero.
    pub fn consume_item(&mut self, item: Item) -> ActionResult<()> {
        let count = self
            .bag
            .get_mut(&item)
            .filter(|count| **count > 0)
            .ok_or(ActionError::ItemNotInBag(item))?;
        *count -= 1;
        if *count == 0 {
            self.bag.remove(&item);
        }
        Ok(())
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.story_flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: impl Into<String>) {
        self.story_flags.insert(flag.into());
    }

    /// Badges stay sorted in gym order with no duplicates.
    pub fn add_badge(&mut self, badge: Badge) {
        if !self.badges.contains(&badge) {
            self.badges.push(badge);
            self.badges.sort();
        }
    }

    pub fn first_usable_index(&self) -> Option<usize> {
        self.team.iter().position(|pokemon| !pokemon.is_fainted())
    }

    pub fn has_usable_pokemon(&self) -> bool {
        self.first_usable_index().is_some()
    }

    /// Add a newly obtained Pokemon to the team, or the PC when the team is
    /// full. Returns true when it went to the PC.
    pub fn receive_pokemon(&mut self, pokemon: PokemonInst) -> bool {
        self.pokedex.mark_caught(pokemon.species);
        if self.team.len() >= MAX_TEAM_SIZE {
            self.pc.push(pokemon);
            true
        } else {
            self.team.push(pokemon);
            false
        }
    }

    /// Get on or off the bicycle. Needs the Bicycle in the bag, an outdoor
    /// map, and dry land.
    pub fn toggle_bicycle(&mut self) -> ActionResult<Mount> {
        if self.item_count(Item::Bicycle) == 0 {
            return Err(ActionError::ItemNotInBag(Item::Bicycle));
        }
        if is_indoor_map(&self.location.map) || self.mount == Mount::Surfing {
            return Err(ActionError::ItemNotUsable(Item::Bicycle));
        }
        self.mount = match self.mount {
            Mount::Bicycle => Mount::Walking,
            _ => Mount::Bicycle,
        };
        Ok(self.mount)
    }

    pub fn step_to(&mut self, x: i32, y: i32, facing: Direction) {
        self.location.x = x;
        self.location.y = y;
        self.facing = facing;
        self.steps = self.steps.saturating_add(1);
    }
}
