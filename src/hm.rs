//! Field moves used from the overworld.

use crate::pokemon::PokemonInst;
use schema::Move;
use std::collections::HashSet;

/// The tile the player is facing, as far as field moves care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTile {
    Ground,
    Water,
    CutTree,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HmAction {
    Cut,
    Surf,
}

/// Whether a non-fainted team member knows `move_`.
pub fn team_knows_move(team: &[PokemonInst], move_: Move) -> bool {
    team.iter()
        .any(|pokemon| !pokemon.is_fainted() && pokemon.knows_move(move_))
}

pub fn hm_action_for(team: &[PokemonInst], tile: FieldTile, surfing: bool) -> Option<HmAction> {
    match tile {
        FieldTile::CutTree if team_knows_move(team, Move::Cut) => Some(HmAction::Cut),
        FieldTile::Water if !surfing && team_knows_move(team, Move::Surf) => Some(HmAction::Surf),
        _ => None,
    }
}

/// Story flag recording that the tree at `(x, y)` on `map` is gone.
pub fn cut_tree_flag(map: &str, x: i32, y: i32) -> String {
    format!("cut_{map}_{x}_{y}")
}

pub fn is_tree_cut(story_flags: &HashSet<String>, map: &str, x: i32, y: i32) -> bool {
    story_flags.contains(&cut_tree_flag(map, x, y))
}

/// Stepping onto anything but water ends surfing.
pub fn should_exit_surf(tile: FieldTile, surfing: bool) -> bool {
    surfing && tile != FieldTile::Water
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::test_data;
    use crate::pokemon::Ivs;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::Species;

    fn knowing(moves: &[Move]) -> PokemonInst {
        let data = test_data();
        let mut pokemon = PokemonInst::new(data, Species::Tidalon, 30, Ivs::uniform(0));
        pokemon.set_moves(data, moves);
        pokemon
    }

    #[test]
    fn test_fainted_members_do_not_count() {
        let mut surfer = knowing(&[Move::Surf]);
        assert!(team_knows_move(std::slice::from_ref(&surfer), Move::Surf));
        surfer.set_hp(0);
        assert!(!team_knows_move(&[surfer], Move::Surf));
    }

    #[rstest]
    #[case(FieldTile::CutTree, false, Some(HmAction::Cut))]
    #[case(FieldTile::Water, false, Some(HmAction::Surf))]
    #[case(FieldTile::Water, true, None)]
    #[case(FieldTile::Ground, false, None)]
    fn test_hm_action_for(
        #[case] tile: FieldTile,
        #[case] surfing: bool,
        #[case] expected: Option<HmAction>,
    ) {
        let team = vec![knowing(&[Move::Cut, Move::Surf])];
        assert_eq!(hm_action_for(&team, tile, surfing), expected);
    }

    #[test]
    fn test_no_action_without_the_move() {
        let team = vec![knowing(&[Move::Tackle])];
        assert_eq!(hm_action_for(&team, FieldTile::CutTree, false), None);
        assert_eq!(hm_action_for(&team, FieldTile::Water, false), None);
    }

    #[test]
    fn test_cut_tree_flags() {
        assert_eq!(cut_tree_flag("route2", 4, 7), "cut_route2_4_7");
        let flags = HashSet::from([cut_tree_flag("route2", 4, 7)]);
        assert!(is_tree_cut(&flags, "route2", 4, 7));
        assert!(!is_tree_cut(&flags, "route2", 7, 4));
    }

    #[rstest]
    #[case(FieldTile::Ground, true, true)]
    #[case(FieldTile::Water, true, false)]
    #[case(FieldTile::Ground, false, false)]
    fn test_should_exit_surf(#[case] tile: FieldTile, #[case] surfing: bool, #[case] expected: bool) {
        assert_eq!(should_exit_surf(tile, surfing), expected);
    }
}
