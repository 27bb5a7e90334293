use crate::battle::animations::BattleAnimation;
use crate::pokemon::PokemonInst;
use schema::{Badge, Item, Move, StatType, StatusCondition, TrainerClass};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainerInfo {
    pub id: String,
    pub name: String,
    pub class: TrainerClass,
    pub reward: u32,
    pub badge: Option<Badge>,
    /// Set on victory (rival fights).
    pub story_flag: Option<String>,
    pub defeat_dialog: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleKind {
    Wild,
    Trainer(TrainerInfo),
}

/// Where the battle state machine is.
///
/// `Intro`, `Message`, `ExpGain`, `LevelUp`, `Victory`, `Defeat`, `Catch` and
/// `Run` only accept `advance_message`; the `*Select` phases only accept their
/// matching selections.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    Intro,
    ActionSelect,
    MoveSelect,
    ItemSelect,
    SwitchSelect,
    Message,
    ExpGain,
    LevelUp,
    LearnMove,
    Fainted,
    Victory,
    Defeat,
    Catch,
    Run,
}

impl BattlePhase {
    pub fn is_message_phase(self) -> bool {
        matches!(
            self,
            BattlePhase::Intro
                | BattlePhase::Message
                | BattlePhase::ExpGain
                | BattlePhase::LevelUp
                | BattlePhase::LearnMove
                | BattlePhase::Fainted
                | BattlePhase::Victory
                | BattlePhase::Defeat
                | BattlePhase::Catch
                | BattlePhase::Run
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    UseMove { move_index: usize },
    UseItem { item: Item, target: Option<usize> },
    Switch { team_index: usize },
    Run,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TurnResult {
    pub messages: Vec<String>,
    pub player_damage: u16,
    pub enemy_damage: u16,
    pub player_fainted: bool,
    pub enemy_fainted: bool,
    /// Type effectiveness of the player's damaging move, if one landed.
    pub effectiveness: Option<f64>,
    pub critical: bool,
    /// `Some` when a ball was thrown.
    pub caught: Option<bool>,
    pub escaped: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatchResult {
    pub success: bool,
    pub probability: f64,
    pub sent_to_pc: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PendingExp {
    pub pokemon_uid: Uuid,
    pub amount: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LearnMovePrompt {
    pub pokemon_uid: Uuid,
    pub move_: Move,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleState {
    pub kind: BattleKind,
    pub player_team: Vec<PokemonInst>,
    pub enemy_team: Vec<PokemonInst>,
    pub active_player: usize,
    pub active_enemy: usize,
    pub phase: BattlePhase,
    pub messages: Vec<String>,
    pub message_index: usize,
    pub animations: Vec<BattleAnimation>,
    pub player_stages: HashMap<StatType, i8>,
    pub enemy_stages: HashMap<StatType, i8>,
    pub can_run: bool,
    pub pending_exp: Option<PendingExp>,
    pub pending_moves: VecDeque<LearnMovePrompt>,
    pub last_result: Option<TurnResult>,
    pub catch_result: Option<CatchResult>,
    pub learn_move: Option<LearnMovePrompt>,
    /// The player must replace a fainted Pokemon; no enemy turn follows.
    pub forced_switch: bool,
}

impl BattleState {
    /// `active_player` must index a non-fainted member.
    pub fn new(
        kind: BattleKind,
        player_team: Vec<PokemonInst>,
        enemy_team: Vec<PokemonInst>,
        active_player: usize,
    ) -> Self {
        let can_run = matches!(kind, BattleKind::Wild);
        Self {
            kind,
            player_team,
            enemy_team,
            active_player,
            active_enemy: 0,
            phase: BattlePhase::Intro,
            messages: Vec::new(),
            message_index: 0,
            animations: Vec::new(),
            player_stages: HashMap::new(),
            enemy_stages: HashMap::new(),
            can_run,
            pending_exp: None,
            pending_moves: VecDeque::new(),
            last_result: None,
            catch_result: None,
            learn_move: None,
            forced_switch: false,
        }
    }

    pub fn trainer(&self) -> Option<&TrainerInfo> {
        match &self.kind {
            BattleKind::Wild => None,
            BattleKind::Trainer(info) => Some(info),
        }
    }

    pub fn is_wild(&self) -> bool {
        matches!(self.kind, BattleKind::Wild)
    }

    pub fn active(&self, side: Side) -> &PokemonInst {
        match side {
            Side::Player => &self.player_team[self.active_player],
            Side::Enemy => &self.enemy_team[self.active_enemy],
        }
    }

    pub fn active_mut(&mut self, side: Side) -> &mut PokemonInst {
        match side {
            Side::Player => &mut self.player_team[self.active_player],
            Side::Enemy => &mut self.enemy_team[self.active_enemy],
        }
    }

    pub fn stages(&self, side: Side) -> &HashMap<StatType, i8> {
        match side {
            Side::Player => &self.player_stages,
            Side::Enemy => &self.enemy_stages,
        }
    }

    pub fn stages_mut(&mut self, side: Side) -> &mut HashMap<StatType, i8> {
        match side {
            Side::Player => &mut self.player_stages,
            Side::Enemy => &mut self.enemy_stages,
        }
    }

    pub fn has_unread_messages(&self) -> bool {
        self.message_index + 1 < self.messages.len()
    }

    pub fn is_animating(&self) -> bool {
        self.animations.iter().any(|animation| !animation.is_finished())
    }

    pub fn current_message(&self) -> Option<&str> {
        self.messages.get(self.message_index).map(String::as_str)
    }

    /// Replace the message queue and move into `phase`.
    pub fn show(&mut self, phase: BattlePhase, messages: Vec<String>) {
        self.phase = phase;
        self.messages = messages;
        self.message_index = 0;
    }

    pub fn alive_player_count(&self) -> usize {
        self.player_team.iter().filter(|p| !p.is_fainted()).count()
    }

    pub fn next_alive_enemy(&self) -> Option<usize> {
        self.enemy_team
            .iter()
            .enumerate()
            .skip(self.active_enemy + 1)
            .find(|(_, pokemon)| !pokemon.is_fainted())
            .map(|(index, _)| index)
    }

    pub fn player_pokemon_mut(&mut self, uid: Uuid) -> Option<&mut PokemonInst> {
        self.player_team.iter_mut().find(|pokemon| pokemon.uid == uid)
    }
}

/// Something that happened during a turn. Most events render as one line of
/// battle text; bookkeeping events are silent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Pokemon Actions
    PlayerRecalled { pokemon: String },
    PlayerSentOut { pokemon: String },
    MoveUsed { pokemon: String, move_name: String },
    NoMovesLeft { pokemon: String },
    MoveMissed,
    CriticalHit,
    AttackTypeEffectiveness { multiplier: f64, defender: String },
    DamageDealt { side: Side, damage: u16, remaining_hp: u16 },
    PokemonFainted { side: Side, pokemon: String },

    // Status Effects
    StatusApplied { pokemon: String, status: StatusCondition },
    StatusFailed,
    StatusCured { pokemon: String, status: StatusCondition },
    StatusDamage { pokemon: String, status: StatusCondition, damage: u16 },
    WokeUp { pokemon: String },
    FastAsleep { pokemon: String },
    ThawedOut { pokemon: String },
    FrozenSolid { pokemon: String },
    FullyParalyzed { pokemon: String },

    // Stat Changes
    StatStageChanged { pokemon: String, stat: StatType, delta: i8 },
    StatChangeBlocked { pokemon: String, stat: StatType, rising: bool },

    // Healing
    HealthRestored { pokemon: String },
    EnergyDrained { pokemon: String },
    ItemRestoredHp { pokemon: String, amount: u16 },
    Revived { pokemon: String },

    // Items & Capture
    ItemUsed { item_name: String },
    Caught { pokemon: String },
    SentToPc { pokemon: String },
    BrokeFree,

    // Escape
    Escaped,
    EscapeFailed,
}

impl BattleEvent {
    /// Formats the event into a human-readable string.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::PlayerRecalled { pokemon } => Some(format!("Come back, {}!", pokemon)),
            BattleEvent::PlayerSentOut { pokemon } => Some(format!("Go! {}!", pokemon)),
            BattleEvent::MoveUsed { pokemon, move_name } => {
                Some(format!("{} used {}!", pokemon, move_name))
            }
            BattleEvent::NoMovesLeft { pokemon } => {
                Some(format!("{} has no moves left!", pokemon))
            }
            BattleEvent::MoveMissed => Some("It missed!".to_string()),
            BattleEvent::CriticalHit => Some("A critical hit!".to_string()),
            BattleEvent::AttackTypeEffectiveness {
                multiplier,
                defender,
            } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m > 0.0 && m < 1.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some(format!("It doesn't affect {}...", defender)),
                _ => None, // Normal effectiveness, no message
            },
            BattleEvent::DamageDealt { .. } => None,
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),

            BattleEvent::StatusApplied { pokemon, status } => {
                Some(format!("{} {}", pokemon, Self::format_status_applied(*status)))
            }
            BattleEvent::StatusFailed => Some("But it failed!".to_string()),
            BattleEvent::StatusCured { pokemon, status } => match status {
                StatusCondition::Sleep => Some(format!("{} woke up!", pokemon)),
                StatusCondition::Freeze => Some(format!("{} thawed out!", pokemon)),
                _ => Some(format!("{} was cured of its {}!", pokemon, status)),
            },
            BattleEvent::StatusDamage {
                pokemon, status, ..
            } => match status {
                StatusCondition::Burn => Some(format!("{} is hurt by its burn!", pokemon)),
                _ => Some(format!("{} is hurt by poison!", pokemon)),
            },
            BattleEvent::WokeUp { pokemon } => Some(format!("{} woke up!", pokemon)),
            BattleEvent::FastAsleep { pokemon } => Some(format!("{} is fast asleep!", pokemon)),
            BattleEvent::ThawedOut { pokemon } => Some(format!("{} thawed out!", pokemon)),
            BattleEvent::FrozenSolid { pokemon } => Some(format!("{} is frozen solid!", pokemon)),
            BattleEvent::FullyParalyzed { pokemon } => {
                Some(format!("{} is paralyzed! It can't move!", pokemon))
            }

            BattleEvent::StatStageChanged {
                pokemon,
                stat,
                delta,
            } => {
                let amount = if delta.abs() >= 2 { " sharply" } else { "" };
                let direction = if *delta > 0 { "rose" } else { "fell" };
                Some(format!("{}'s {}{} {}!", pokemon, stat, amount, direction))
            }
            BattleEvent::StatChangeBlocked {
                pokemon,
                stat,
                rising,
            } => {
                let direction = if *rising { "higher" } else { "lower" };
                Some(format!("{}'s {} won't go any {}!", pokemon, stat, direction))
            }

            BattleEvent::HealthRestored { pokemon } => {
                Some(format!("{} restored health!", pokemon))
            }
            BattleEvent::EnergyDrained { pokemon } => Some(format!("{} drained energy!", pokemon)),
            BattleEvent::ItemRestoredHp { pokemon, amount } => {
                Some(format!("{} recovered {} HP!", pokemon, amount))
            }
            BattleEvent::Revived { pokemon } => Some(format!("{} was revived!", pokemon)),

            BattleEvent::ItemUsed { item_name } => Some(format!("Used {}!", item_name)),
            BattleEvent::Caught { pokemon } => Some(format!("Gotcha! {} was caught!", pokemon)),
            BattleEvent::SentToPc { pokemon } => Some(format!("{} was sent to the PC.", pokemon)),
            BattleEvent::BrokeFree => Some("Oh no! The Pokémon broke free!".to_string()),

            BattleEvent::Escaped => Some("Got away safely!".to_string()),
            BattleEvent::EscapeFailed => Some("Couldn't escape!".to_string()),
        }
    }

    fn format_status_applied(status: StatusCondition) -> &'static str {
        match status {
            StatusCondition::Poison => "was poisoned!",
            StatusCondition::Burn => "was burned!",
            StatusCondition::Paralysis => "is paralyzed! It may be unable to move!",
            StatusCondition::Sleep => "fell asleep!",
            StatusCondition::Freeze => "was frozen solid!",
        }
    }
}

/// Event bus for collecting the events of one turn in order.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Formatted text of every non-silent event.
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod event_formatting_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_silent_events_return_none() {
        let silent_events = vec![
            BattleEvent::DamageDealt {
                side: Side::Enemy,
                damage: 10,
                remaining_hp: 5,
            },
            BattleEvent::AttackTypeEffectiveness {
                multiplier: 1.0,
                defender: "Geodon".to_string(),
            },
        ];

        for event in silent_events {
            assert!(
                event.format().is_none(),
                "Event {:?} should be silent but returned text",
                event
            );
        }
    }

    #[rstest]
    #[case(2.0, "It's super effective!")]
    #[case(0.5, "It's not very effective...")]
    #[case(0.0, "It doesn't affect Ghoulby...")]
    fn test_effectiveness_text(#[case] multiplier: f64, #[case] expected: &str) {
        let event = BattleEvent::AttackTypeEffectiveness {
            multiplier,
            defender: "Ghoulby".to_string(),
        };
        assert_eq!(event.format(), Some(expected.to_string()));
    }

    #[test]
    fn test_status_text() {
        let name = || "Emberon".to_string();
        assert_eq!(
            BattleEvent::StatusDamage {
                pokemon: name(),
                status: StatusCondition::Poison,
                damage: 3
            }
            .format(),
            Some("Emberon is hurt by poison!".to_string())
        );
        assert_eq!(
            BattleEvent::StatusDamage {
                pokemon: name(),
                status: StatusCondition::Burn,
                damage: 1
            }
            .format(),
            Some("Emberon is hurt by its burn!".to_string())
        );
        assert_eq!(
            BattleEvent::FullyParalyzed { pokemon: name() }.format(),
            Some("Emberon is paralyzed! It can't move!".to_string())
        );
        assert_eq!(
            BattleEvent::StatusCured {
                pokemon: name(),
                status: StatusCondition::Burn
            }
            .format(),
            Some("Emberon was cured of its burn!".to_string())
        );
    }

    #[test]
    fn test_stat_change_text() {
        let event = BattleEvent::StatStageChanged {
            pokemon: "Rattipaw".to_string(),
            stat: StatType::Attack,
            delta: -1,
        };
        assert_eq!(event.format(), Some("Rattipaw's Attack fell!".to_string()));

        let event = BattleEvent::StatStageChanged {
            pokemon: "Rattipaw".to_string(),
            stat: StatType::Speed,
            delta: 2,
        };
        assert_eq!(
            event.format(),
            Some("Rattipaw's Speed sharply rose!".to_string())
        );
    }

    #[test]
    fn test_event_bus_skips_silent_events() {
        let mut event_bus = EventBus::new();
        event_bus.push(BattleEvent::MoveUsed {
            pokemon: "Emberon".to_string(),
            move_name: "Ember".to_string(),
        });
        event_bus.push(BattleEvent::DamageDealt {
            side: Side::Enemy,
            damage: 7,
            remaining_hp: 12,
        });
        event_bus.push(BattleEvent::CriticalHit);

        assert_eq!(event_bus.len(), 3);
        assert_eq!(
            event_bus.messages(),
            vec!["Emberon used Ember!".to_string(), "A critical hit!".to_string()]
        );
        assert!(format!("{}", event_bus).contains("DamageDealt"));
    }
}
