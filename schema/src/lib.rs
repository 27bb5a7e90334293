// Pokemon Journey Schema - Shared type definitions
// This crate holds the enums and static record types shared between the
// engine crate and the RON tables it embeds under `data/`.

// Re-export the main types
pub use battle_data::*;
pub use item_data::*;
pub use move_data::*;
pub use pokemon_types::*;
pub use species_data::*;
pub use world_data::*;

pub mod battle_data;
pub mod item_data;
pub mod move_data;
pub mod pokemon_types;
pub mod species_data;
pub mod world_data;
