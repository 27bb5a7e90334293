use crate::battle::state::{BattleKind, BattlePhase, BattleState, TrainerInfo};
use crate::data::test_support::test_data;
use crate::data::GameData;
use crate::errors::ActionResult;
use crate::game_state::{GamePhase, GameState};
use crate::player::{Location, PlayerRecord};
use crate::pokemon::{Ivs, PokemonInst};
use crate::rng::TurnRng;
use schema::{Badge, Move, Species, StatusCondition, TrainerClass};

/// Battle-ready Pokemon with zero IVs, so stats are exact in assertions.
///
/// ```ignore
/// let foe = TestPokemonBuilder::new(Species::Rattipaw, 10)
///     .with_moves(vec![Move::Tackle, Move::TailWhip])
///     .with_hp(1)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species: Species,
    level: u8,
    moves: Option<Vec<Move>>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
    nickname: Option<String>,
    exp: Option<u32>,
}

impl TestPokemonBuilder {
    pub fn new(species: Species, level: u8) -> Self {
        Self {
            species,
            level,
            moves: None,
            status: None,
            current_hp: None,
            nickname: None,
            exp: None,
        }
    }

    /// Replaces the learnset moves.
    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Defaults to max HP.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    /// Tells two Pokemon of the same species apart in battle text.
    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    pub fn with_exp(mut self, exp: u32) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Builds the `PokemonInst` with all IVs at zero.
    pub fn build(self) -> PokemonInst {
        let data = test_data();
        let mut pokemon = PokemonInst::new(data, self.species, self.level, Ivs::uniform(0));
        if let Some(moves) = &self.moves {
            pokemon.set_moves(data, moves);
        }
        pokemon.status = self.status;
        pokemon.nickname = self.nickname;
        if let Some(exp) = self.exp {
            pokemon.exp = exp;
        }
        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp);
        }
        pokemon
    }
}

pub fn data() -> &'static GameData {
    test_data()
}

/// A one-member trainer roster description.
pub fn trainer(id: &str, name: &str, class: TrainerClass, reward: u32, badge: Option<Badge>) -> BattleKind {
    BattleKind::Trainer(TrainerInfo {
        id: id.to_string(),
        name: name.to_string(),
        class,
        reward,
        badge,
        story_flag: None,
        defeat_dialog: vec![format!("{name} looks stunned.")],
    })
}

/// A battle waiting for the player's first action.
pub fn create_test_battle(
    kind: BattleKind,
    player_team: Vec<PokemonInst>,
    enemy_team: Vec<PokemonInst>,
) -> BattleState {
    let mut battle = BattleState::new(kind, player_team, enemy_team, 0);
    battle.show(BattlePhase::ActionSelect, Vec::new());
    battle
}

pub fn create_wild_battle(player: PokemonInst, enemy: PokemonInst) -> BattleState {
    create_test_battle(BattleKind::Wild, vec![player], vec![enemy])
}

/// A game in the middle of `battle`, with the battle's team as the player's.
pub fn game_in_battle(battle: BattleState) -> GameState {
    let mut player = PlayerRecord::new("Red", 1000, Location::new("route1", 4, 4));
    player.team = battle.player_team.clone();
    player.add_item(schema::Item::Pokeball, 5);
    player.add_item(schema::Item::Potion, 2);
    let mut game = GameState::from_parts(
        player,
        Default::default(),
        Location::new("pokecenter", 3, 5),
    );
    game.battle = Some(battle);
    game.phase = GamePhase::Battle;
    game
}

/// Every draw returns 0.5: no crits, hits land, mid damage rolls.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![0.5])
}

pub fn battle(game: &GameState) -> &BattleState {
    game.battle.as_ref().expect("game should be in a battle")
}

/// Finish animations and read lines until the phase changes or the battle ends.
pub fn read_all(game: GameState) -> GameState {
    let data = test_data();
    let mut game = game.tick(data, 10_000);
    let Some(start) = game.battle.as_ref().map(|battle| battle.phase) else {
        return game;
    };
    loop {
        game = assert_ok(crate::battle::flow::advance_message(data, &game)).tick(data, 10_000);
        match &game.battle {
            Some(battle) if battle.phase == start && battle.message_index > 0 => continue,
            _ => return game,
        }
    }
}

/// Unwrap a transition, printing the action error on failure.
pub fn assert_ok<T>(result: ActionResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("transition rejected: {err}"),
    }
}
