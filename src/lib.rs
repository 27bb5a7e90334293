//! Pokemon Journey
//!
//! A turn-based monster battle and progression engine: wild and trainer
//! battles, capture, experience and evolution, the bag and shop, PC storage,
//! the rival's storyline and a versioned save format. Every transition takes a
//! game snapshot and returns the next one.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod data;
pub mod encounters;
pub mod errors;
pub mod game_state;
pub mod hm;
pub mod items;
pub mod persistence;
pub mod player;
pub mod pokemon;
pub mod progression;
pub mod rival;
pub mod rng;
pub mod shop;
pub mod storage;

// --- PUBLIC API RE-EXPORTS ---

// Static definitions from the `schema` crate.
pub use schema::{
    Badge, BaseStats, Item, ItemEffect, Move, MoveCategory, PokemonType, Species, StatType,
    StatusCondition, TrainerClass,
};

// Static tables.
pub use data::{GameData, CHAMPION_ID, ELITE_FOUR, MAX_LEVEL, MAX_TEAM_SIZE, STARTERS};

// Game and battle state.
pub use battle::engine::resolve_turn;
pub use battle::state::{BattleEvent, BattleKind, BattlePhase, BattleState, PlayerAction, Side};
pub use game_state::{GamePhase, GameState};
pub use player::{Location, PlayerRecord};
pub use pokemon::{create_pokemon, Ivs, PokemonInst};
pub use rng::TurnRng;

// Saving and configuration.
pub use config::{load_config, GameConfig};
pub use persistence::{FileSaveStore, MemorySaveStore, SaveStore};

// Crate-specific error and result types.
pub use errors::{
    ActionError, ActionResult, CatchError, ConfigError, DataError, DataResult, GameError,
    PersistError, ShopError, StorageError,
};
