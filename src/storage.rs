//! Bill's PC: moving Pokemon between the team and box storage.

use crate::data::MAX_TEAM_SIZE;
use crate::errors::StorageError;
use crate::player::PlayerRecord;
use tracing::debug;

/// Move team member `team_index` into the PC. The last team member stays.
pub fn deposit(player: &mut PlayerRecord, team_index: usize) -> Result<(), StorageError> {
    if team_index >= player.team.len() {
        return Err(StorageError::InvalidIndex(team_index));
    }
    if player.team.len() <= 1 {
        return Err(StorageError::LastPokemon);
    }
    let pokemon = player.team.remove(team_index);
    debug!(species = ?pokemon.species, "deposited");
    player.pc.push(pokemon);
    Ok(())
}

/// Move PC slot `pc_index` onto the end of the team.
pub fn withdraw(player: &mut PlayerRecord, pc_index: usize) -> Result<(), StorageError> {
    if pc_index >= player.pc.len() {
        return Err(StorageError::InvalidIndex(pc_index));
    }
    if player.team.len() >= MAX_TEAM_SIZE {
        return Err(StorageError::TeamFull);
    }
    let pokemon = player.pc.remove(pc_index);
    debug!(species = ?pokemon.species, "withdrew");
    player.team.push(pokemon);
    Ok(())
}
