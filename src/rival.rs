//! Rival team scaling.
//!
//! The rival always picks the starter that beats the player's, and it
//! evolves along with the story: the stage is chosen from the level the
//! encounter fields it at.

use crate::data::{GameData, STARTERS};
use crate::pokemon::{create_pokemon, PokemonInst};
use crate::rng::TurnRng;
use schema::{RivalEncounter, Species};

const MID_STAGE_LEVEL: u8 = 16;
const FINAL_STAGE_LEVEL: u8 = 36;

/// The rival's answer to the player's base starter.
pub fn counter_starter(player_starter: Species) -> Species {
    match player_starter {
        Species::Emberon => Species::Aqualing,
        Species::Aqualing => Species::Sproutley,
        Species::Sproutley => Species::Emberon,
        _ => Species::Aqualing,
    }
}

/// `base` followed by every species it evolves into, in order.
pub fn evolution_line(data: &GameData, base: Species) -> Vec<Species> {
    let mut line = vec![base];
    let mut current = base;
    while let Some(evolution) = &data.species(current).evolution {
        current = evolution.evolves_to;
        line.push(current);
    }
    line
}

/// The stage of `base`'s line a rival fields at `level`: final from 36,
/// middle from 16, otherwise the base form.
pub fn starter_stage(data: &GameData, base: Species, level: u8) -> Species {
    let line = evolution_line(data, base);
    let stage = if level >= FINAL_STAGE_LEVEL {
        2
    } else if level >= MID_STAGE_LEVEL {
        1
    } else {
        0
    };
    line[stage.min(line.len() - 1)]
}

/// Which base starter's line `species` belongs to.
pub fn base_starter_of(data: &GameData, species: Species) -> Option<Species> {
    STARTERS
        .into_iter()
        .find(|base| evolution_line(data, *base).contains(&species))
}

/// Recover the player's base starter from the rival's, falling back to
/// Emberon for saves that predate the choice.
pub fn player_starter_for(data: &GameData, rival_starter: Species) -> Species {
    base_starter_of(data, rival_starter)
        .and_then(|rival_base| {
            STARTERS
                .into_iter()
                .find(|player_base| counter_starter(*player_base) == rival_base)
        })
        .unwrap_or(Species::Emberon)
}

/// Supporting members first, the rival's starter in the last slot.
pub fn build_rival_team(
    data: &GameData,
    encounter: &RivalEncounter,
    rival_starter: Species,
    rng: &mut TurnRng,
) -> Vec<PokemonInst> {
    let base = base_starter_of(data, rival_starter).unwrap_or(rival_starter);
    let starter = starter_stage(data, base, encounter.starter_level);

    let mut team: Vec<PokemonInst> = encounter
        .team
        .iter()
        .map(|member| create_pokemon(data, member.species, member.level, rng))
        .collect();
    team.push(create_pokemon(data, starter, encounter.starter_level, rng));
    team
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::test_data;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Species::Emberon, Species::Aqualing)]
    #[case(Species::Aqualing, Species::Sproutley)]
    #[case(Species::Sproutley, Species::Emberon)]
    fn test_counter_starter(#[case] player: Species, #[case] rival: Species) {
        assert_eq!(counter_starter(player), rival);
    }

    #[rstest]
    #[case(5, Species::Aqualing)]
    #[case(15, Species::Aqualing)]
    #[case(16, Species::Tidalon)]
    #[case(35, Species::Tidalon)]
    #[case(36, Species::Tsunamix)]
    #[case(63, Species::Tsunamix)]
    fn test_starter_stage_by_level(#[case] level: u8, #[case] expected: Species) {
        assert_eq!(starter_stage(test_data(), Species::Aqualing, level), expected);
    }

    #[test]
    fn test_reverse_lookup() {
        let data = test_data();
        assert_eq!(base_starter_of(data, Species::Florapex), Some(Species::Sproutley));
        assert_eq!(base_starter_of(data, Species::Rattipaw), None);
        // Rival has the water line, so the player took fire.
        assert_eq!(player_starter_for(data, Species::Tidalon), Species::Emberon);
        assert_eq!(player_starter_for(data, Species::Emberon), Species::Sproutley);
    }

    #[test]
    fn test_rival_team_puts_starter_last() {
        let data = test_data();
        let encounter = data.rival_encounter("rival_cerulean").unwrap();
        let mut rng = TurnRng::new_for_test(vec![0.5]);
        let team = build_rival_team(data, encounter, Species::Sproutley, &mut rng);

        assert_eq!(team.len(), encounter.team.len() + 1);
        let starter = team.last().unwrap();
        assert_eq!(starter.species, Species::Thornox);
        assert_eq!(starter.level, 22);
        assert_eq!(team[0].species, Species::Pidgsoar);
    }
}
