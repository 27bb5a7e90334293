//! Medicine rules shared by battle and overworld item use.

use crate::battle::state::BattleEvent;
use crate::data::GameData;
use crate::errors::{ActionError, ActionResult};
use crate::pokemon::PokemonInst;
use schema::{Item, ItemEffect, StatusCondition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicineOutcome {
    Healed(u16),
    Cured(StatusCondition),
    Restored {
        hp: u16,
        cured: Option<StatusCondition>,
    },
    Revived(u16),
}

impl MedicineOutcome {
    pub fn events(&self, pokemon: &str) -> Vec<BattleEvent> {
        let name = || pokemon.to_string();
        match *self {
            MedicineOutcome::Healed(amount) => vec![BattleEvent::ItemRestoredHp {
                pokemon: name(),
                amount,
            }],
            MedicineOutcome::Cured(status) => vec![BattleEvent::StatusCured {
                pokemon: name(),
                status,
            }],
            MedicineOutcome::Restored { hp, cured } => {
                let mut events = Vec::new();
                if hp > 0 {
                    events.push(BattleEvent::ItemRestoredHp {
                        pokemon: name(),
                        amount: hp,
                    });
                }
                if let Some(status) = cured {
                    events.push(BattleEvent::StatusCured {
                        pokemon: name(),
                        status,
                    });
                }
                events
            }
            MedicineOutcome::Revived(_) => vec![BattleEvent::Revived { pokemon: name() }],
        }
    }

    pub fn messages(&self, pokemon: &str) -> Vec<String> {
        self.events(pokemon)
            .iter()
            .filter_map(BattleEvent::format)
            .collect()
    }
}

/// Which team member an item goes to when the caller names none: the active
/// member, or the first fainted member for Revive.
pub fn default_medicine_target(
    data: &GameData,
    item: Item,
    team: &[PokemonInst],
    active: usize,
) -> Option<usize> {
    match data.item(item).effect {
        Some(ItemEffect::Revive) => team.iter().position(PokemonInst::is_fainted),
        _ if active < team.len() => Some(active),
        _ => None,
    }
}

/// Apply a medicine to `pokemon`. Fails without touching the Pokemon when the
/// item is not a medicine or would have no effect.
pub fn apply_medicine(
    data: &GameData,
    item: Item,
    pokemon: &mut PokemonInst,
) -> ActionResult<MedicineOutcome> {
    let Some(effect) = data.item(item).effect.clone() else {
        return Err(ActionError::ItemNotUsable(item));
    };
    let missing_hp = pokemon.current_hp < pokemon.max_hp();

    match effect {
        ItemEffect::Catch { .. } => Err(ActionError::ItemNotUsable(item)),
        ItemEffect::Heal { amount } => {
            if pokemon.is_fainted() || !missing_hp {
                return Err(ActionError::NoEffect);
            }
            Ok(MedicineOutcome::Healed(pokemon.heal(amount)))
        }
        ItemEffect::FullRestore => {
            if pokemon.is_fainted() || (!missing_hp && pokemon.status.is_none()) {
                return Err(ActionError::NoEffect);
            }
            let hp = pokemon.heal(pokemon.max_hp());
            let cured = pokemon.status.take();
            Ok(MedicineOutcome::Restored { hp, cured })
        }
        ItemEffect::Cure { status } => {
            if pokemon.is_fainted() || pokemon.status != Some(status) {
                return Err(ActionError::NoEffect);
            }
            pokemon.status = None;
            Ok(MedicineOutcome::Cured(status))
        }
        ItemEffect::Revive => {
            if !pokemon.is_fainted() {
                return Err(ActionError::NoEffect);
            }
            pokemon.status = None;
            pokemon.set_hp((pokemon.max_hp() / 2).max(1));
            Ok(MedicineOutcome::Revived(pokemon.current_hp))
        }
    }
}
