//! The persistent root of a play session.
//!
//! Public operations take `&self` and hand back a new snapshot; a rejected
//! action returns an error and the caller keeps the state it already had.

use crate::battle::flow;
use crate::battle::state::{BattleKind, BattlePhase, BattleState, TrainerInfo};
use crate::data::{GameData, CHAMPION_ID, ELITE_FOUR, STARTERS};
use crate::encounters::roll_wild_encounter;
use crate::errors::{ActionError, ActionResult, ShopError, StorageError};
use crate::items::apply_medicine;
use crate::player::{Location, Mount, PlayerRecord};
use crate::pokemon::{create_pokemon, PokemonInst};
use crate::progression::{evolve, RewardCalculator};
use crate::rival::{build_rival_team, counter_starter, player_starter_for, starter_stage};
use crate::rng::TurnRng;
use crate::shop::{self, mart_inventory};
use crate::storage;
use schema::{Item, ItemEffect, RivalEncounter, Species, TrainerClass};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const STARTING_MONEY: u32 = 3000;
pub const STARTER_LEVEL: u8 = 5;
pub const GOT_STARTER_FLAG: &str = "got_starter";
pub const CHAMPION_FLAG: &str = "champion";

const EVOLUTION_DURATION_MS: f64 = 3000.0;
const CREDITS_LINE_HEIGHT: f64 = 28.0;
// 1.5 px per 60 Hz frame.
const CREDITS_SCROLL_PER_MS: f64 = 1.5 * 60.0 / 1000.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Overworld,
    Battle,
    Evolution,
    Credits,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RivalRecord {
    pub name: String,
    /// The rival's base starter.
    pub starter: Species,
}

impl Default for RivalRecord {
    fn default() -> Self {
        Self {
            name: "Gary".to_string(),
            starter: Species::Aqualing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogState {
    pub lines: Vec<String>,
    pub current_line: usize,
    pub speaker: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    Pokemon,
    Bag,
    Pokedex,
    Save,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    pub screen: MenuScreen,
    pub selected_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopMode {
    Select,
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopState {
    pub items: Vec<Item>,
    pub selected_index: usize,
    pub mode: ShopMode,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionState {
    pub team_index: usize,
    pub from: Species,
    pub to: Species,
    pub progress: f64,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreditsState {
    pub scroll: f64,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub player: PlayerRecord,
    pub rival: RivalRecord,
    pub phase: GamePhase,
    pub battle: Option<BattleState>,
    pub dialog: Option<DialogState>,
    pub menu: Option<MenuState>,
    pub shop: Option<ShopState>,
    pub evolution: Option<EvolutionState>,
    pub credits: Option<CreditsState>,
    /// Where a blackout sends the player.
    pub last_pokecenter: Location,
}

impl GameState {
    pub fn new_game(name: &str) -> Self {
        let mut player = PlayerRecord::new(name, STARTING_MONEY, Location::new("player_house", 5, 6));
        player.add_item(Item::Pokeball, 5);
        player.add_item(Item::Potion, 3);
        Self::from_parts(player, RivalRecord::default(), Location::new("player_house", 3, 5))
    }

    /// A state in the overworld with no transient sub-state.
    pub fn from_parts(player: PlayerRecord, rival: RivalRecord, last_pokecenter: Location) -> Self {
        Self {
            player,
            rival,
            phase: GamePhase::Overworld,
            battle: None,
            dialog: None,
            menu: None,
            shop: None,
            evolution: None,
            credits: None,
            last_pokecenter,
        }
    }

    fn ensure_overworld(&self) -> ActionResult<()> {
        if self.battle.is_some() {
            return Err(ActionError::BattleInProgress);
        }
        if self.phase != GamePhase::Overworld {
            return Err(ActionError::WrongGamePhase(self.phase));
        }
        Ok(())
    }

    pub fn choose_starter(
        &self,
        data: &GameData,
        species: Species,
        rng: &mut TurnRng,
    ) -> ActionResult<GameState> {
        if !STARTERS.contains(&species) {
            return Err(ActionError::NotAStarter(species));
        }
        if self.player.has_flag(GOT_STARTER_FLAG) {
            return Err(ActionError::StarterAlreadyChosen);
        }
        let mut next = self.clone();
        next.player
            .receive_pokemon(create_pokemon(data, species, STARTER_LEVEL, rng));
        next.player.set_flag(GOT_STARTER_FLAG);
        next.rival.starter = counter_starter(species);
        info!(?species, rival = ?next.rival.starter, "starter chosen");
        Ok(next)
    }

    // ---- Battle entry ----

    pub fn start_wild_battle(
        &self,
        data: &GameData,
        species: Species,
        level: u8,
        rng: &mut TurnRng,
    ) -> ActionResult<GameState> {
        self.ensure_overworld()?;
        let enemy = create_pokemon(data, species, level, rng);
        let intro = vec![format!("A wild {} appeared!", enemy.name(data))];
        self.enter_battle(data, BattleKind::Wild, vec![enemy], intro)
    }

    /// One step in tall grass of `zone_id`. `Ok(None)` when nothing appears.
    pub fn try_wild_encounter(
        &self,
        data: &GameData,
        zone_id: &str,
        rng: &mut TurnRng,
    ) -> ActionResult<Option<GameState>> {
        self.ensure_overworld()?;
        let zone = data
            .zone(zone_id)
            .ok_or_else(|| ActionError::ZoneNotFound(zone_id.to_string()))?;
        match roll_wild_encounter(zone, rng) {
            Some(roll) => self
                .start_wild_battle(data, roll.species, roll.level, rng)
                .map(Some),
            None => Ok(None),
        }
    }

    pub fn start_trainer_battle(
        &self,
        data: &GameData,
        trainer_id: &str,
        rng: &mut TurnRng,
    ) -> ActionResult<GameState> {
        self.ensure_overworld()?;
        let trainer = data
            .trainer(trainer_id)
            .ok_or_else(|| ActionError::TrainerNotFound(trainer_id.to_string()))?;
        if self.player.defeated_trainers.contains(trainer_id) {
            return Err(ActionError::TrainerAlreadyDefeated(trainer_id.to_string()));
        }

        let mut team: Vec<PokemonInst> = trainer
            .team
            .iter()
            .map(|member| create_pokemon(data, member.species, member.level, rng))
            .collect();
        // The champion's ace is the rival's own starter line.
        if trainer.class == TrainerClass::Champion {
            if let Some(ace) = trainer.team.last() {
                let species = starter_stage(data, self.rival.starter, ace.level);
                team.pop();
                team.push(create_pokemon(data, species, ace.level, rng));
            }
        }

        let info = TrainerInfo {
            id: trainer.id.clone(),
            name: trainer.name.clone(),
            class: trainer.class,
            reward: trainer.reward,
            badge: trainer.badge,
            story_flag: None,
            defeat_dialog: trainer.defeat_dialog.clone(),
        };
        let intro = trainer_intro(data, &trainer.pre_dialog, &trainer.name, &team);
        self.enter_battle(data, BattleKind::Trainer(info), team, intro)
    }

    /// The scripted rival fight the player is standing in, if any.
    pub fn check_rival_encounter<'a>(&self, data: &'a GameData) -> Option<&'a RivalEncounter> {
        if self.phase != GamePhase::Overworld || self.battle.is_some() || self.dialog.is_some() {
            return None;
        }
        let location = &self.player.location;
        data.rival_encounters().iter().find(|encounter| {
            !self.player.has_flag(&encounter.story_flag)
                && encounter
                    .requires_flag
                    .as_deref()
                    .map_or(true, |flag| self.player.has_flag(flag))
                && encounter.map == location.map
                && encounter
                    .trigger_area
                    .map_or(true, |area| area.contains(location.x, location.y))
        })
    }

    pub fn start_rival_battle(
        &self,
        data: &GameData,
        encounter_id: &str,
        rng: &mut TurnRng,
    ) -> ActionResult<GameState> {
        self.ensure_overworld()?;
        let encounter = data
            .rival_encounter(encounter_id)
            .ok_or_else(|| ActionError::TrainerNotFound(encounter_id.to_string()))?;
        if self.player.has_flag(&encounter.story_flag) {
            return Err(ActionError::TrainerAlreadyDefeated(encounter_id.to_string()));
        }
        if let Some(flag) = &encounter.requires_flag {
            if !self.player.has_flag(flag) {
                return Err(ActionError::StoryLocked(flag.clone()));
            }
        }

        let team = build_rival_team(data, encounter, self.rival.starter, rng);
        let info = TrainerInfo {
            id: encounter.id.clone(),
            name: self.rival.name.clone(),
            class: TrainerClass::Rival,
            reward: encounter.reward,
            badge: None,
            story_flag: Some(encounter.story_flag.clone()),
            defeat_dialog: encounter.defeat_dialog.clone(),
        };
        let intro = trainer_intro(data, &encounter.pre_dialog, &self.rival.name, &team);
        self.enter_battle(data, BattleKind::Trainer(info), team, intro)
    }

    fn enter_battle(
        &self,
        data: &GameData,
        kind: BattleKind,
        enemy_team: Vec<PokemonInst>,
        mut intro: Vec<String>,
    ) -> ActionResult<GameState> {
        let active = self
            .player
            .first_usable_index()
            .ok_or(ActionError::NoUsablePokemon)?;

        let mut next = self.clone();
        if let Some(first) = enemy_team.first() {
            next.player.pokedex.mark_seen(first.species);
        }
        intro.push(format!("Go! {}!", self.player.team[active].name(data)));

        let mut battle = BattleState::new(kind, self.player.team.clone(), enemy_team, active);
        battle.show(BattlePhase::Intro, intro);
        info!(
            wild = battle.is_wild(),
            trainer = battle.trainer().map(|t| t.id.as_str()),
            "battle start"
        );

        next.battle = Some(battle);
        next.phase = GamePhase::Battle;
        next.menu = None;
        next.shop = None;
        next.dialog = None;
        Ok(next)
    }

    // ---- Battle exit ----

    /// Drop the battle and write the player's roster back.
    pub(crate) fn leave_battle(&mut self) -> Option<BattleState> {
        let battle = self.battle.take()?;
        self.player.team = battle.player_team.clone();
        self.phase = GamePhase::Overworld;
        Some(battle)
    }

    pub(crate) fn conclude_victory(&mut self, data: &GameData) {
        let Some(battle) = self.leave_battle() else {
            return;
        };
        if let BattleKind::Trainer(trainer) = &battle.kind {
            self.player.money = self.player.money.saturating_add(trainer.reward);
            self.player.defeated_trainers.insert(trainer.id.clone());
            if let Some(badge) = trainer.badge {
                self.player.add_badge(badge);
            }
            if let Some(flag) = &trainer.story_flag {
                self.player.set_flag(flag.clone());
            }
            info!(trainer = %trainer.id, reward = trainer.reward, "trainer defeated");

            let elite_four_cleared = ELITE_FOUR
                .iter()
                .all(|id| self.player.defeated_trainers.contains(*id));
            if trainer.id == CHAMPION_ID && elite_four_cleared {
                self.player.set_flag(CHAMPION_FLAG);
                self.phase = GamePhase::Credits;
                self.credits = Some(CreditsState::default());
                info!("champion crowned");
                return;
            }
        }
        self.queue_next_evolution(data);
    }

    /// Capture succeeded: the wild Pokemon joins the team or the PC.
    pub(crate) fn conclude_capture(&mut self) {
        let Some(mut battle) = self.leave_battle() else {
            return;
        };
        if battle.active_enemy < battle.enemy_team.len() {
            let caught = battle.enemy_team.swap_remove(battle.active_enemy);
            info!(species = ?caught.species, "captured");
            self.player.receive_pokemon(caught);
        }
    }

    /// Whole team to half HP (at least 1), money halved, back to the last
    /// healing point. Status and PP are left alone.
    pub(crate) fn apply_blackout(&mut self) {
        self.leave_battle();
        for pokemon in &mut self.player.team {
            pokemon.current_hp = (pokemon.max_hp() / 2).max(1);
        }
        self.player.money /= 2;
        self.player.location = self.last_pokecenter.clone();
        info!(money = self.player.money, map = %self.last_pokecenter.map, "blacked out");
    }

    pub fn blackout(&self) -> GameState {
        let mut next = self.clone();
        next.apply_blackout();
        next
    }

    fn queue_next_evolution(&mut self, data: &GameData) {
        let candidate = self.player.team.iter().enumerate().find_map(|(index, pokemon)| {
            RewardCalculator
                .should_evolve(data, pokemon)
                .map(|to| (index, pokemon.species, to))
        });
        match candidate {
            Some((team_index, from, to)) => {
                self.phase = GamePhase::Evolution;
                self.evolution = Some(EvolutionState {
                    team_index,
                    from,
                    to,
                    progress: 0.0,
                    done: false,
                });
            }
            None => {
                self.phase = GamePhase::Overworld;
                self.evolution = None;
            }
        }
    }

    pub fn complete_evolution(&self, data: &GameData) -> ActionResult<GameState> {
        if self.phase != GamePhase::Evolution {
            return Err(ActionError::WrongGamePhase(self.phase));
        }
        let Some(evolution) = &self.evolution else {
            return Err(ActionError::WrongGamePhase(self.phase));
        };
        if !evolution.done {
            return Err(ActionError::AnimationPlaying);
        }

        let mut next = self.clone();
        let pokemon = next
            .player
            .team
            .get_mut(evolution.team_index)
            .ok_or(ActionError::InvalidTeamIndex(evolution.team_index))?;
        evolve(data, pokemon, evolution.to);
        next.player.pokedex.mark_caught(evolution.to);
        next.queue_next_evolution(data);
        Ok(next)
    }

    pub fn finish_credits(&self) -> ActionResult<GameState> {
        match &self.credits {
            Some(credits) if self.phase == GamePhase::Credits => {
                if !credits.done {
                    return Err(ActionError::AnimationPlaying);
                }
            }
            _ => return Err(ActionError::WrongGamePhase(self.phase)),
        }
        let mut next = self.clone();
        next.credits = None;
        next.phase = GamePhase::Overworld;
        next.player.location = next.last_pokecenter.clone();
        Ok(next)
    }

    /// Advance every running timer by `dt_ms`.
    pub fn tick(&self, data: &GameData, dt_ms: u32) -> GameState {
        let mut next = flow::tick(self, dt_ms);
        if let Some(evolution) = &mut next.evolution {
            evolution.progress = (evolution.progress + dt_ms as f64 / EVOLUTION_DURATION_MS).min(1.0);
            evolution.done = evolution.progress >= 1.0;
        }
        if next.credits.is_some() {
            let max_scroll = credits_lines(data, &next).len() as f64 * CREDITS_LINE_HEIGHT;
            if let Some(credits) = &mut next.credits {
                if credits.scroll >= max_scroll {
                    credits.done = true;
                } else {
                    credits.scroll += dt_ms as f64 * CREDITS_SCROLL_PER_MS;
                }
            }
        }
        next
    }

    // ---- Overworld services ----

    /// Nurse Joy: full HP, status and PP; this center becomes the blackout
    /// point.
    pub fn heal_at_pokecenter(&self, data: &GameData, location: Location) -> ActionResult<GameState> {
        self.ensure_overworld()?;
        let mut next = self.clone();
        for pokemon in &mut next.player.team {
            pokemon.restore_full(data);
        }
        next.last_pokecenter = location;
        Ok(next)
    }

    /// Use an item from the bag outside battle. Medicine follows the battle
    /// rules; the Bicycle toggles riding.
    pub fn use_field_item(
        &self,
        data: &GameData,
        item: Item,
        team_index: usize,
    ) -> ActionResult<GameState> {
        self.ensure_overworld()?;
        if self.player.item_count(item) == 0 {
            return Err(ActionError::ItemNotInBag(item));
        }
        let mut next = self.clone();
        let lines = match data.item(item).effect {
            None if item == Item::Bicycle => {
                let line = match next.player.toggle_bicycle()? {
                    Mount::Bicycle => format!("{} got on the Bicycle!", next.player.name),
                    _ => format!("{} got off the Bicycle.", next.player.name),
                };
                vec![line]
            }
            None | Some(ItemEffect::Catch { .. }) => return Err(ActionError::ItemNotUsable(item)),
            Some(_) => {
                let pokemon = next
                    .player
                    .team
                    .get_mut(team_index)
                    .ok_or(ActionError::InvalidTeamIndex(team_index))?;
                let outcome = apply_medicine(data, item, pokemon)?;
                let lines = outcome.messages(pokemon.name(data));
                next.player.consume_item(item)?;
                lines
            }
        };
        next.dialog = Some(DialogState {
            lines,
            current_line: 0,
            speaker: None,
        });
        Ok(next)
    }

    /// Trades only happen at an open counter in the overworld.
    fn ensure_shop_open(&self) -> Result<(), ShopError> {
        if self.shop.is_none() || self.ensure_overworld().is_err() {
            return Err(ShopError::ShopClosed);
        }
        Ok(())
    }

    pub fn shop_buy(&self, data: &GameData, item: Item, quantity: u32) -> Result<GameState, ShopError> {
        self.ensure_shop_open()?;
        let receipt = shop::buy(data, item, quantity, self.player.money, &self.player.bag)?;
        let mut next = self.clone();
        next.player.money = receipt.money;
        next.player.bag = receipt.bag;
        Ok(next)
    }

    pub fn shop_sell(&self, data: &GameData, item: Item, quantity: u32) -> Result<GameState, ShopError> {
        self.ensure_shop_open()?;
        let receipt = shop::sell(data, item, quantity, self.player.money, &self.player.bag)?;
        let mut next = self.clone();
        next.player.money = receipt.money;
        next.player.bag = receipt.bag;
        Ok(next)
    }

    pub fn open_shop(&self) -> ActionResult<GameState> {
        self.ensure_overworld()?;
        let mut next = self.clone();
        next.shop = Some(ShopState {
            items: mart_inventory(),
            selected_index: 0,
            mode: ShopMode::Select,
            quantity: 1,
        });
        Ok(next)
    }

    pub fn close_shop(&self) -> GameState {
        let mut next = self.clone();
        next.shop = None;
        next
    }

    pub fn deposit(&self, team_index: usize) -> Result<GameState, StorageError> {
        let mut next = self.clone();
        storage::deposit(&mut next.player, team_index)?;
        Ok(next)
    }

    pub fn withdraw(&self, pc_index: usize) -> Result<GameState, StorageError> {
        let mut next = self.clone();
        storage::withdraw(&mut next.player, pc_index)?;
        Ok(next)
    }

    // ---- Dialog and menu ----

    pub fn show_dialog(&self, lines: Vec<String>, speaker: Option<String>) -> GameState {
        let mut next = self.clone();
        next.dialog = Some(DialogState {
            lines,
            current_line: 0,
            speaker,
        });
        next
    }

    /// Next line, closing the box after the last one.
    pub fn advance_dialog(&self) -> GameState {
        let mut next = self.clone();
        if let Some(dialog) = &mut next.dialog {
            dialog.current_line += 1;
            if dialog.current_line >= dialog.lines.len() {
                next.dialog = None;
            }
        }
        next
    }

    pub fn open_menu(&self) -> ActionResult<GameState> {
        self.ensure_overworld()?;
        let mut next = self.clone();
        next.menu = Some(MenuState {
            screen: MenuScreen::Main,
            selected_index: 0,
        });
        Ok(next)
    }

    pub fn menu_select(&self, screen: MenuScreen) -> GameState {
        let mut next = self.clone();
        if let Some(menu) = &mut next.menu {
            menu.screen = screen;
            menu.selected_index = 0;
        }
        next
    }

    pub fn close_menu(&self) -> GameState {
        let mut next = self.clone();
        next.menu = None;
        next
    }
}

fn trainer_intro(data: &GameData, pre_dialog: &[String], name: &str, team: &[PokemonInst]) -> Vec<String> {
    let mut intro = pre_dialog.to_vec();
    intro.push(format!("{name} wants to battle!"));
    if let Some(lead) = team.first() {
        intro.push(format!("{name} sent out {}!", lead.name(data)));
    }
    intro
}

/// The scrolling end credits.
pub fn credits_lines(data: &GameData, game: &GameState) -> Vec<String> {
    let player = &game.player;
    let mut lines = vec![
        String::new(),
        "You are the new Champion!".to_string(),
        String::new(),
        format!("Trainer: {}", player.name),
        String::new(),
        "Your Team".to_string(),
    ];
    lines.extend(
        player
            .team
            .iter()
            .map(|pokemon| format!("{}  Lv.{}", pokemon.name(data), pokemon.level)),
    );
    lines.extend([
        String::new(),
        format!("Badges Earned: {} / 8", player.badges.len()),
        String::new(),
        format!("Pokédex Seen: {}", player.pokedex.seen.len()),
        format!("Pokédex Caught: {}", player.pokedex.caught.len()),
        String::new(),
        "Thank you for playing!".to_string(),
        String::new(),
        "T H E   E N D".to_string(),
    ]);
    lines
}

/// The player's original starter, for screens that show it.
pub fn player_starter(data: &GameData, game: &GameState) -> Species {
    player_starter_for(data, game.rival.starter)
}
