use crate::battle::ai::{Behavior, MoveChoice, RandomAI};
use crate::battle::calculators::{calculate_damage, escape_chance, Combatant};
use crate::battle::catch::{calculate_catch_probability, can_attempt_catch, roll_catch_success};
use crate::battle::conditions::{apply_status_damage, check_can_act, try_inflict_status};
use crate::battle::state::{
    BattleEvent, BattlePhase, BattleState, CatchResult, EventBus, PlayerAction, Side, TurnResult,
};
use crate::battle::stats::{change_stage, effective_speed, move_hits};
use crate::data::{GameData, MAX_TEAM_SIZE};
use crate::errors::{ActionError, ActionResult};
use crate::items::{apply_medicine, default_medicine_target};
use crate::rng::TurnRng;
use schema::{EffectTarget, Item, ItemEffect, MoveData, MoveEffect, StatType};
use std::collections::VecDeque;
use tracing::debug;

/// Internal action types for the action stack
/// These represent atomic actions that can be executed during battle resolution
#[derive(Debug, Clone, PartialEq)]
pub enum BattleAction {
    /// The player swaps in another team member
    Switch { team_index: usize },

    /// The player uses a bag item; balls attempt a capture
    UseItem { item: Item, target: Option<usize> },

    /// The player tries to flee
    Run,

    /// One side uses a move against the other
    Attack { side: Side, choice: MoveChoice },
}

/// Action stack for managing battle action execution
#[derive(Debug, Default)]
pub struct ActionStack {
    actions: VecDeque<BattleAction>,
}

impl ActionStack {
    pub fn new() -> Self {
        Self {
            actions: VecDeque::new(),
        }
    }

    pub fn push_back(&mut self, action: BattleAction) {
        self.actions.push_back(action);
    }

    pub fn pop_front(&mut self) -> Option<BattleAction> {
        self.actions.pop_front()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Check a player action against the current battle without changing it.
pub fn validate_player_action(
    data: &GameData,
    state: &BattleState,
    action: &PlayerAction,
) -> ActionResult<()> {
    match action {
        PlayerAction::UseMove { move_index } => {
            let pokemon = state.active(Side::Player);
            if !pokemon.has_usable_move() {
                // Struggle, whatever slot was picked.
                return Ok(());
            }
            let slot = pokemon
                .moves
                .get(*move_index)
                .ok_or(ActionError::InvalidMoveIndex(*move_index))?;
            if slot.pp == 0 {
                return Err(ActionError::NoPpRemaining(slot.move_));
            }
            Ok(())
        }
        PlayerAction::Switch { team_index } => {
            let pokemon = state
                .player_team
                .get(*team_index)
                .ok_or(ActionError::InvalidTeamIndex(*team_index))?;
            if *team_index == state.active_player {
                return Err(ActionError::AlreadyActive);
            }
            if pokemon.is_fainted() {
                return Err(ActionError::PokemonFainted);
            }
            Ok(())
        }
        PlayerAction::UseItem { item, target } => {
            if data.item(*item).is_ball() {
                can_attempt_catch(state)?;
                return Ok(());
            }
            // Dry run on a copy to surface NoEffect before the turn starts.
            let index = match target {
                Some(index) => *index,
                None => default_medicine_target(data, *item, &state.player_team, state.active_player)
                    .ok_or(ActionError::NoEffect)?,
            };
            let mut probe = state
                .player_team
                .get(index)
                .cloned()
                .ok_or(ActionError::InvalidTeamIndex(index))?;
            apply_medicine(data, *item, &mut probe).map(|_| ())
        }
        PlayerAction::Run => {
            if state.can_run {
                Ok(())
            } else {
                Err(ActionError::CannotRun)
            }
        }
    }
}

/// Resolve one full turn: the player's action, the enemy's move, and end-of-turn
/// status damage. Returns the next battle snapshot and a summary of the turn.
///
/// RNG draw order: enemy move choice, speed tie, then for each attacker its
/// status check, accuracy, critical hit, damage roll and secondary effect.
pub fn resolve_turn(
    data: &GameData,
    state: &BattleState,
    action: PlayerAction,
    rng: &mut TurnRng,
) -> ActionResult<(BattleState, TurnResult)> {
    validate_player_action(data, state, &action)?;

    let mut next = state.clone();
    let mut bus = EventBus::new();
    let mut result = TurnResult::default();

    let enemy_choice = RandomAI.choose_move(next.active(Side::Enemy), rng);
    let mut action_stack = build_initial_action_stack(data, &next, &action, enemy_choice, rng);
    debug!(?action, actions = action_stack.len(), "turn start");

    while let Some(battle_action) = action_stack.pop_front() {
        execute_battle_action(data, &mut next, battle_action, &mut bus, &mut result, rng)?;
        if result.escaped || result.caught == Some(true) {
            action_stack.clear();
        }
    }

    if !result.escaped && result.caught != Some(true) {
        execute_end_turn_phase(data, &mut next, &mut bus, &mut result);
    }

    result.player_fainted = next.active(Side::Player).is_fainted();
    result.enemy_fainted = next.active(Side::Enemy).is_fainted();
    result.messages = bus.messages();

    let phase = if result.caught.is_some() {
        BattlePhase::Catch
    } else if result.escaped {
        BattlePhase::Run
    } else {
        BattlePhase::Message
    };
    next.show(phase, result.messages.clone());
    next.last_result = Some(result.clone());

    Ok((next, result))
}

fn build_initial_action_stack(
    data: &GameData,
    state: &BattleState,
    action: &PlayerAction,
    enemy_choice: MoveChoice,
    rng: &mut TurnRng,
) -> ActionStack {
    let mut action_stack = ActionStack::new();
    let enemy_attack = BattleAction::Attack {
        side: Side::Enemy,
        choice: enemy_choice,
    };

    match action {
        PlayerAction::UseMove { move_index } => {
            let player_choice = if state.active(Side::Player).has_usable_move() {
                MoveChoice::Slot(*move_index)
            } else {
                MoveChoice::Struggle
            };
            let player_attack = BattleAction::Attack {
                side: Side::Player,
                choice: player_choice,
            };
            if player_moves_first(data, state, player_choice, enemy_choice, rng) {
                action_stack.push_back(player_attack);
                action_stack.push_back(enemy_attack);
            } else {
                action_stack.push_back(enemy_attack);
                action_stack.push_back(player_attack);
            }
        }
        PlayerAction::Switch { team_index } => {
            action_stack.push_back(BattleAction::Switch {
                team_index: *team_index,
            });
            action_stack.push_back(enemy_attack);
        }
        PlayerAction::UseItem { item, target } => {
            action_stack.push_back(BattleAction::UseItem {
                item: *item,
                target: *target,
            });
            action_stack.push_back(enemy_attack);
        }
        PlayerAction::Run => {
            action_stack.push_back(BattleAction::Run);
            action_stack.push_back(enemy_attack);
        }
    }

    action_stack
}

/// Higher move priority first, then higher effective speed; exact ties are a
/// coin flip.
pub fn player_moves_first(
    data: &GameData,
    state: &BattleState,
    player_choice: MoveChoice,
    enemy_choice: MoveChoice,
    rng: &mut TurnRng,
) -> bool {
    let player = state.active(Side::Player);
    let enemy = state.active(Side::Enemy);
    let player_priority = data.move_data(player_choice.resolve(player)).priority;
    let enemy_priority = data.move_data(enemy_choice.resolve(enemy)).priority;
    if player_priority != enemy_priority {
        return player_priority > enemy_priority;
    }

    let player_speed = effective_speed(player, &state.player_stages);
    let enemy_speed = effective_speed(enemy, &state.enemy_stages);
    debug!(player_speed, enemy_speed, "turn order");
    match player_speed.cmp(&enemy_speed) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => rng.chance(0.5, "speed tie"),
    }
}

pub fn execute_battle_action(
    data: &GameData,
    state: &mut BattleState,
    action: BattleAction,
    bus: &mut EventBus,
    result: &mut TurnResult,
    rng: &mut TurnRng,
) -> ActionResult<()> {
    match action {
        BattleAction::Switch { team_index } => {
            execute_switch(data, state, team_index, bus);
            Ok(())
        }
        BattleAction::UseItem { item, target } => {
            execute_item(data, state, item, target, bus, result, rng)
        }
        BattleAction::Run => {
            execute_run(state, bus, result, rng);
            Ok(())
        }
        BattleAction::Attack { side, choice } => {
            execute_attack(data, state, side, choice, bus, result, rng);
            Ok(())
        }
    }
}

/// Recall the active Pokemon and send out `team_index`. Player stat stages reset.
pub fn execute_switch(data: &GameData, state: &mut BattleState, team_index: usize, bus: &mut EventBus) {
    let outgoing = state.active(Side::Player).name(data).to_string();
    bus.push(BattleEvent::PlayerRecalled { pokemon: outgoing });
    state.active_player = team_index;
    state.player_stages.clear();
    let incoming = state.active(Side::Player).name(data).to_string();
    bus.push(BattleEvent::PlayerSentOut { pokemon: incoming });
}

fn execute_item(
    data: &GameData,
    state: &mut BattleState,
    item: Item,
    target: Option<usize>,
    bus: &mut EventBus,
    result: &mut TurnResult,
    rng: &mut TurnRng,
) -> ActionResult<()> {
    let item_data = data.item(item);
    bus.push(BattleEvent::ItemUsed {
        item_name: item_data.name.clone(),
    });

    if let Some(ItemEffect::Catch { multiplier }) = item_data.effect {
        can_attempt_catch(state)?;
        let target_pokemon = state.active(Side::Enemy);
        let name = target_pokemon.name(data).to_string();
        let probability = calculate_catch_probability(data, target_pokemon, multiplier);
        let success = roll_catch_success(probability, rng);
        let sent_to_pc = success && state.player_team.len() >= MAX_TEAM_SIZE;
        debug!(probability, success, "ball thrown");

        if success {
            bus.push(BattleEvent::Caught {
                pokemon: name.clone(),
            });
            if sent_to_pc {
                bus.push(BattleEvent::SentToPc { pokemon: name });
            }
        } else {
            bus.push(BattleEvent::BrokeFree);
        }
        result.caught = Some(success);
        state.catch_result = Some(CatchResult {
            success,
            probability,
            sent_to_pc,
        });
        return Ok(());
    }

    let index = match target {
        Some(index) => index,
        None => default_medicine_target(data, item, &state.player_team, state.active_player)
            .ok_or(ActionError::NoEffect)?,
    };
    let pokemon = state
        .player_team
        .get_mut(index)
        .ok_or(ActionError::InvalidTeamIndex(index))?;
    let outcome = apply_medicine(data, item, pokemon)?;
    for event in outcome.events(pokemon.name(data)) {
        bus.push(event);
    }
    Ok(())
}

fn execute_run(
    state: &BattleState,
    bus: &mut EventBus,
    result: &mut TurnResult,
    rng: &mut TurnRng,
) {
    let player_speed = effective_speed(state.active(Side::Player), &state.player_stages);
    let enemy_speed = effective_speed(state.active(Side::Enemy), &state.enemy_stages);
    let chance = escape_chance(player_speed, enemy_speed);
    if rng.chance(chance, "escape") {
        bus.push(BattleEvent::Escaped);
        result.escaped = true;
    } else {
        bus.push(BattleEvent::EscapeFailed);
    }
}

fn record_damage(result: &mut TurnResult, side: Side, damage: u16) {
    match side {
        Side::Player => result.player_damage = result.player_damage.saturating_add(damage),
        Side::Enemy => result.enemy_damage = result.enemy_damage.saturating_add(damage),
    }
}

/// Run one attack. A fainted attacker never acts and a fainted target is
/// skipped without a message.
pub fn execute_attack(
    data: &GameData,
    state: &mut BattleState,
    side: Side,
    choice: MoveChoice,
    bus: &mut EventBus,
    result: &mut TurnResult,
    rng: &mut TurnRng,
) {
    let target_side = side.opponent();
    if state.active(side).is_fainted() || state.active(target_side).is_fainted() {
        return;
    }

    let attacker_name = state.active(side).name(data).to_string();
    let target_name = state.active(target_side).name(data).to_string();

    if !check_can_act(state.active_mut(side), &attacker_name, rng, bus) {
        return;
    }

    let move_ = choice.resolve(state.active(side));
    if choice == MoveChoice::Struggle {
        bus.push(BattleEvent::NoMovesLeft {
            pokemon: attacker_name.clone(),
        });
    }
    if let MoveChoice::Slot(index) = choice {
        if let Some(slot) = state.active_mut(side).moves.get_mut(index) {
            slot.pp = slot.pp.saturating_sub(1);
        }
    }
    let move_data = data.move_data(move_);
    bus.push(BattleEvent::MoveUsed {
        pokemon: attacker_name.clone(),
        move_name: move_data.name.clone(),
    });

    if !move_hits(move_data.accuracy, rng) {
        bus.push(BattleEvent::MoveMissed);
        return;
    }

    if move_data.is_damaging() {
        execute_damaging_move(
            data,
            state,
            side,
            move_data,
            (&attacker_name, &target_name),
            bus,
            result,
            rng,
        );
    } else {
        execute_status_move(state, side, move_data, (&attacker_name, &target_name), bus, rng);
    }
}

#[allow(clippy::too_many_arguments)]
fn execute_damaging_move(
    data: &GameData,
    state: &mut BattleState,
    side: Side,
    move_data: &MoveData,
    (attacker_name, target_name): (&str, &str),
    bus: &mut EventBus,
    result: &mut TurnResult,
    rng: &mut TurnRng,
) {
    let target_side = side.opponent();
    let outcome = calculate_damage(
        data,
        Combatant {
            pokemon: state.active(side),
            stages: state.stages(side),
        },
        Combatant {
            pokemon: state.active(target_side),
            stages: state.stages(target_side),
        },
        move_data,
        rng,
    );

    if side == Side::Player {
        result.effectiveness = Some(outcome.effectiveness);
        result.critical = outcome.critical;
    }

    if outcome.effectiveness == 0.0 {
        bus.push(BattleEvent::AttackTypeEffectiveness {
            multiplier: 0.0,
            defender: target_name.to_string(),
        });
        return;
    }

    let dealt = state.active_mut(target_side).take_damage(outcome.damage);
    record_damage(result, target_side, dealt);
    if outcome.critical {
        bus.push(BattleEvent::CriticalHit);
    }
    bus.push(BattleEvent::AttackTypeEffectiveness {
        multiplier: outcome.effectiveness,
        defender: target_name.to_string(),
    });
    bus.push(BattleEvent::DamageDealt {
        side: target_side,
        damage: dealt,
        remaining_hp: state.active(target_side).current_hp,
    });

    let target_fainted = state.active(target_side).is_fainted();
    if target_fainted {
        bus.push(BattleEvent::PokemonFainted {
            side: target_side,
            pokemon: target_name.to_string(),
        });
    }

    match &move_data.effect {
        Some(MoveEffect::Drain) => {
            let healed = state.active_mut(side).heal((dealt / 2).max(1));
            if healed > 0 {
                bus.push(BattleEvent::EnergyDrained {
                    pokemon: attacker_name.to_string(),
                });
            }
        }
        Some(MoveEffect::Status { status, chance }) if !target_fainted => {
            if state.active(target_side).status.is_none()
                && roll_secondary(*chance, rng)
                && try_inflict_status(state.active_mut(target_side), *status)
            {
                bus.push(BattleEvent::StatusApplied {
                    pokemon: target_name.to_string(),
                    status: *status,
                });
            }
        }
        Some(MoveEffect::StatChange {
            target,
            stat,
            stages,
            chance,
        }) => {
            let (affected, name) = match target {
                EffectTarget::User => (side, attacker_name),
                EffectTarget::Target => (target_side, target_name),
            };
            if !state.active(affected).is_fainted() && roll_secondary(*chance, rng) {
                apply_stat_change(state, affected, name, *stat, *stages, bus);
            }
        }
        // Flinch is carried in the move table but has no battle effect.
        Some(MoveEffect::Flinch { .. }) | Some(MoveEffect::Heal) | Some(MoveEffect::Status { .. }) => {}
        None => {}
    }
}

fn execute_status_move(
    state: &mut BattleState,
    side: Side,
    move_data: &MoveData,
    (attacker_name, target_name): (&str, &str),
    bus: &mut EventBus,
    rng: &mut TurnRng,
) {
    let target_side = side.opponent();
    match &move_data.effect {
        Some(MoveEffect::Status { status, chance }) => {
            if state.active(target_side).status.is_some() || !roll_secondary(*chance, rng) {
                bus.push(BattleEvent::StatusFailed);
                return;
            }
            if try_inflict_status(state.active_mut(target_side), *status) {
                bus.push(BattleEvent::StatusApplied {
                    pokemon: target_name.to_string(),
                    status: *status,
                });
            }
        }
        Some(MoveEffect::StatChange {
            target,
            stat,
            stages,
            chance,
        }) => {
            let (affected, name) = match target {
                EffectTarget::User => (side, attacker_name),
                EffectTarget::Target => (target_side, target_name),
            };
            if roll_secondary(*chance, rng) {
                apply_stat_change(state, affected, name, *stat, *stages, bus);
            } else {
                bus.push(BattleEvent::StatusFailed);
            }
        }
        Some(MoveEffect::Heal) => {
            let user = state.active_mut(side);
            if user.current_hp >= user.max_hp() {
                bus.push(BattleEvent::StatusFailed);
                return;
            }
            let amount = (user.max_hp() / 2).max(1);
            user.heal(amount);
            bus.push(BattleEvent::HealthRestored {
                pokemon: attacker_name.to_string(),
            });
        }
        Some(MoveEffect::Drain) | Some(MoveEffect::Flinch { .. }) | None => {
            debug!(move_name = %move_data.name, "status move without effect");
        }
    }
}

/// Chance rolls for secondary effects; 100 or more takes no draw.
fn roll_secondary(chance: u8, rng: &mut TurnRng) -> bool {
    if chance >= 100 {
        return true;
    }
    rng.chance(chance as f64 / 100.0, "secondary effect")
}

fn apply_stat_change(
    state: &mut BattleState,
    side: Side,
    name: &str,
    stat: StatType,
    stages: i8,
    bus: &mut EventBus,
) {
    let applied = change_stage(state.stages_mut(side), stat, stages);
    if applied == 0 {
        bus.push(BattleEvent::StatChangeBlocked {
            pokemon: name.to_string(),
            stat,
            rising: stages > 0,
        });
    } else {
        bus.push(BattleEvent::StatStageChanged {
            pokemon: name.to_string(),
            stat,
            delta: applied,
        });
    }
}

/// Poison and burn damage for each non-fainted active combatant, player first.
pub fn execute_end_turn_phase(
    data: &GameData,
    state: &mut BattleState,
    bus: &mut EventBus,
    result: &mut TurnResult,
) {
    for side in [Side::Player, Side::Enemy] {
        let name = state.active(side).name(data).to_string();
        let lost = apply_status_damage(state.active_mut(side), &name, bus);
        if lost == 0 {
            continue;
        }
        record_damage(result, side, lost);
        if state.active(side).is_fainted() {
            bus.push(BattleEvent::PokemonFainted { side, pokemon: name });
        }
    }
}
