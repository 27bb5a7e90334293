use crate::battle::state::{BattleKind, BattleState};
use crate::errors::CatchError;
use schema::Species;

/// Check if catch attempts are allowed based on battle kind
pub fn is_catch_allowed(kind: &BattleKind) -> bool {
    matches!(kind, BattleKind::Wild)
}

/// Validate if a catch attempt can be made and return the target species if valid
pub fn can_attempt_catch(battle_state: &BattleState) -> Result<Species, CatchError> {
    if !is_catch_allowed(&battle_state.kind) {
        return Err(CatchError::InvalidBattleType);
    }

    match battle_state.enemy_team.get(battle_state.active_enemy) {
        Some(target_pokemon) if target_pokemon.is_fainted() => {
            Err(CatchError::TargetFainted(target_pokemon.species))
        }
        Some(target_pokemon) => Ok(target_pokemon.species),
        None => Err(CatchError::NoTargetPokemon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::TrainerInfo;
    use crate::data::test_support::test_data;
    use crate::pokemon::{Ivs, PokemonInst};
    use pretty_assertions::assert_eq;
    use schema::TrainerClass;

    fn create_test_battle_state(kind: BattleKind, opponent_fainted: bool) -> BattleState {
        let data = test_data();
        let player = PokemonInst::new(data, Species::Emberon, 10, Ivs::uniform(5));
        let mut opponent = PokemonInst::new(data, Species::Rattipaw, 4, Ivs::uniform(5));
        if opponent_fainted {
            opponent.set_hp(0);
        }
        BattleState::new(kind, vec![player], vec![opponent], 0)
    }

    fn trainer_kind() -> BattleKind {
        BattleKind::Trainer(TrainerInfo {
            id: "youngster_joey".to_string(),
            name: "Youngster Joey".to_string(),
            class: TrainerClass::Trainer,
            reward: 100,
            badge: None,
            story_flag: None,
            defeat_dialog: Vec::new(),
        })
    }

    #[test]
    fn test_wild_battle_allows_catch() {
        let state = create_test_battle_state(BattleKind::Wild, false);
        assert_eq!(can_attempt_catch(&state), Ok(Species::Rattipaw));
    }

    #[test]
    fn test_trainer_battle_rejects_catch() {
        let state = create_test_battle_state(trainer_kind(), false);
        assert_eq!(
            can_attempt_catch(&state),
            Err(CatchError::InvalidBattleType)
        );
    }

    #[test]
    fn test_fainted_target_rejects_catch() {
        let state = create_test_battle_state(BattleKind::Wild, true);
        assert_eq!(
            can_attempt_catch(&state),
            Err(CatchError::TargetFainted(Species::Rattipaw))
        );
    }
}
