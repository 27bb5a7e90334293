use crate::data::{GameData, MAX_LEVEL};
use crate::progression::experience::exp_for_level;
use crate::rng::TurnRng;
use schema::{Move, Species, SpeciesData, StatType, StatusCondition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_IV: u8 = 15;
pub const MAX_MOVES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl Stats {
    pub fn get(&self, stat: StatType) -> u16 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::SpecialAttack => self.sp_attack,
            StatType::SpecialDefense => self.sp_defense,
            StatType::Speed => self.speed,
        }
    }
}

/// Individual values, 0-15 per stat. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ivs {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl Ivs {
    pub fn uniform(value: u8) -> Self {
        let value = value.min(MAX_IV);
        Self {
            hp: value,
            attack: value,
            defense: value,
            sp_attack: value,
            sp_defense: value,
            speed: value,
        }
    }

    pub fn random(rng: &mut TurnRng) -> Self {
        let mut roll = |stat: &str| rng.range_inclusive(0, MAX_IV, stat);
        Self {
            hp: roll("iv hp"),
            attack: roll("iv attack"),
            defense: roll("iv defense"),
            sp_attack: roll("iv sp_attack"),
            sp_defense: roll("iv sp_defense"),
            speed: roll("iv speed"),
        }
    }
}

/// HP: `floor((base + iv) * 2 * L / 100) + L + 10`
/// Others: `floor((base + iv) * 2 * L / 100) + 5`
pub fn calc_stats(species: &SpeciesData, level: u8, ivs: &Ivs) -> Stats {
    let level = level as u32;
    let scaled = |base: u8, iv: u8| (base as u32 + iv as u32) * 2 * level / 100;
    let other = |base: u8, iv: u8| (scaled(base, iv) + 5) as u16;
    let base = &species.base_stats;
    Stats {
        hp: (scaled(base.hp, ivs.hp) + level + 10) as u16,
        attack: other(base.attack, ivs.attack),
        defense: other(base.defense, ivs.defense),
        sp_attack: other(base.sp_attack, ivs.sp_attack),
        sp_defense: other(base.sp_defense, ivs.sp_defense),
        speed: other(base.speed, ivs.speed),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub move_: Move,
    pub pp: u8,
}

impl MoveInstance {
    pub fn new(data: &GameData, move_: Move) -> Self {
        Self {
            move_,
            pp: data.move_data(move_).pp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub uid: Uuid,
    pub species: Species,
    #[serde(default)]
    pub nickname: Option<String>,
    pub level: u8,
    pub exp: u32,
    pub stats: Stats,
    pub current_hp: u16,
    pub moves: Vec<MoveInstance>,
    #[serde(default)]
    pub status: Option<StatusCondition>,
    pub ivs: Ivs,
}

impl PokemonInst {
    /// Build a fresh instance at full HP with the last four moves its species
    /// knows by `level`.
    pub fn new(data: &GameData, species: Species, level: u8, ivs: Ivs) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        let species_data = data.species(species);
        let stats = calc_stats(species_data, level, &ivs);
        let moves = species_data
            .default_moves(level)
            .into_iter()
            .map(|move_| MoveInstance::new(data, move_))
            .collect();

        Self {
            uid: Uuid::new_v4(),
            species,
            nickname: None,
            level,
            exp: exp_for_level(level),
            stats,
            current_hp: stats.hp,
            moves,
            status: None,
            ivs,
        }
    }

    pub fn name<'a>(&'a self, data: &'a GameData) -> &'a str {
        self.nickname
            .as_deref()
            .unwrap_or(data.species(self.species).name.as_str())
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let restored = amount.min(self.stats.hp.saturating_sub(self.current_hp));
        self.current_hp += restored;
        restored
    }

    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.stats.hp);
    }

    /// Pokemon Center treatment: full HP, no status, full PP.
    pub fn restore_full(&mut self, data: &GameData) {
        self.current_hp = self.stats.hp;
        self.status = None;
        for slot in &mut self.moves {
            slot.pp = data.move_data(slot.move_).pp;
        }
    }

    pub fn knows_move(&self, move_: Move) -> bool {
        self.moves.iter().any(|slot| slot.move_ == move_)
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(|slot| slot.pp > 0)
    }

    /// Replace the move list, truncated to four slots, at full PP.
    pub fn set_moves(&mut self, data: &GameData, moves: &[Move]) {
        self.moves = moves
            .iter()
            .take(MAX_MOVES)
            .map(|move_| MoveInstance::new(data, *move_))
            .collect();
    }

    /// Recompute stats for the current species and level. Returns the change
    /// in max HP.
    pub fn recalculate_stats(&mut self, data: &GameData) -> i32 {
        let old_max = self.stats.hp as i32;
        self.stats = calc_stats(data.species(self.species), self.level, &self.ivs);
        self.current_hp = self.current_hp.min(self.stats.hp);
        self.stats.hp as i32 - old_max
    }
}

/// Create a wild or trainer-owned instance with random IVs.
pub fn create_pokemon(
    data: &GameData,
    species: Species,
    level: u8,
    rng: &mut TurnRng,
) -> PokemonInst {
    let ivs = Ivs::random(rng);
    PokemonInst::new(data, species, level, ivs)
}
