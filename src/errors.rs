use crate::battle::state::BattlePhase;
use crate::game_state::GamePhase;
use schema::{Item, Move, Species};
use thiserror::Error;

/// Main error type for the Pokemon Journey engine
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Defects in the static tables. These can only come from corrupted data files
/// and abort startup.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to parse {table} table: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("Species {0:?} has no entry in the species table")]
    MissingSpecies(Species),
    #[error("Move {0:?} has no entry in the move table")]
    MissingMove(Move),
    #[error("Item {0:?} has no entry in the item table")]
    MissingItem(Item),
    #[error("Duplicate {table} entry: {id}")]
    DuplicateEntry { table: &'static str, id: String },
    #[error("Species {0:?} is malformed: {1}")]
    InvalidSpecies(Species, String),
    #[error("Species {0:?} has an invalid learnset: {1}")]
    InvalidLearnset(Species, String),
    #[error("Species {0:?} has an invalid evolution: {1}")]
    InvalidEvolution(Species, String),
    #[error("Evolution chain starting at {0:?} is cyclic")]
    CyclicEvolution(Species),
    #[error("Move {0:?} is malformed: {1}")]
    InvalidMove(Move, String),
    #[error("Item {0:?} is malformed: {1}")]
    InvalidItem(Item, String),
    #[error("Trainer '{id}' is malformed: {reason}")]
    InvalidTrainer { id: String, reason: String },
    #[error("Encounter zone '{id}' is malformed: {reason}")]
    InvalidEncounterZone { id: String, reason: String },
    #[error("Rival encounter '{id}' is malformed: {reason}")]
    InvalidRivalEncounter { id: String, reason: String },
}

/// Errors related to catch attempts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatchError {
    #[error("Balls can only be thrown in wild battles")]
    InvalidBattleType,
    #[error("There is no Pokemon to catch")]
    NoTargetPokemon,
    #[error("{0:?} has already fainted")]
    TargetFainted(Species),
}

/// Actions rejected by the state machine. The caller keeps its previous state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("No battle is in progress")]
    NoBattle,
    #[error("A battle is already in progress")]
    BattleInProgress,
    #[error("Action not allowed during the {0:?} battle phase")]
    WrongBattlePhase(BattlePhase),
    #[error("Action not allowed during the {0:?} game phase")]
    WrongGamePhase(GamePhase),
    #[error("There are still unread messages")]
    MessagesPending,
    #[error("An animation is still playing")]
    AnimationPlaying,
    #[error("Invalid move index: {0}")]
    InvalidMoveIndex(usize),
    #[error("{0:?} has no PP left")]
    NoPpRemaining(Move),
    #[error("Invalid team index: {0}")]
    InvalidTeamIndex(usize),
    #[error("That Pokemon is already in battle")]
    AlreadyActive,
    #[error("That Pokemon has fainted")]
    PokemonFainted,
    #[error("No usable Pokemon left")]
    NoUsablePokemon,
    #[error("Can't escape from a trainer battle!")]
    CannotRun,
    #[error("No {0:?} in the bag")]
    ItemNotInBag(Item),
    #[error("{0:?} can't be used here")]
    ItemNotUsable(Item),
    #[error("It won't have any effect.")]
    NoEffect,
    #[error(transparent)]
    Catch(#[from] CatchError),
    #[error("Unknown trainer: {0}")]
    TrainerNotFound(String),
    #[error("Unknown encounter zone: {0}")]
    ZoneNotFound(String),
    #[error("Trainer {0} has already been defeated")]
    TrainerAlreadyDefeated(String),
    #[error("Story requirement not met: {0}")]
    StoryLocked(String),
    #[error("A starter has already been chosen")]
    StarterAlreadyChosen,
    #[error("{0:?} is not a starter")]
    NotAStarter(Species),
    #[error("Invalid move slot: {0}")]
    InvalidMoveSlot(usize),
}

/// Errors related to PC storage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("You can't deposit your last Pokemon!")]
    LastPokemon,
    #[error("Your party is full!")]
    TeamFull,
    #[error("Invalid slot: {0}")]
    InvalidIndex(usize),
}

/// Shop transaction failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("Item not found")]
    ItemNotFound,
    #[error("Not enough money")]
    NotEnoughMoney,
    #[error("Invalid quantity")]
    InvalidQuantity,
    #[error("Not enough items")]
    NotEnoughItems,
    #[error("Cannot sell key items")]
    CannotSellKeyItem,
    #[error("The shop is not open")]
    ShopClosed,
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to write save: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode save: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;
