//! Runtime settings read from `journey.toml`.

use crate::errors::ConfigError;
use crate::game_state::STARTING_MONEY;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

pub const DEFAULT_CONFIG_PATH: &str = "journey.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub player_name: String,
    pub save_path: String,
    pub log_level: String,
    /// Fixed seed for reproducible sessions. Unset means OS entropy.
    pub rng_seed: Option<u64>,
    pub starting_money: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_name: "Red".to_string(),
            save_path: "save.json".to_string(),
            log_level: "info".to_string(),
            rng_seed: None,
            starting_money: STARTING_MONEY,
        }
    }
}

impl GameConfig {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.level()?;
        Ok(config)
    }

    pub fn level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

/// Read the config at `path`. A missing file gives the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<GameConfig, ConfigError> {
    match fs::read_to_string(path.as_ref()) {
        Ok(text) => GameConfig::parse(&text),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(GameConfig::default()),
        Err(err) => Err(err.into()),
    }
}
