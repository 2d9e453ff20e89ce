//! Depth-first enumeration of every legal end state for one unit
//!
//! Paths are expanded from a stack. A successor is dropped when its end
//! state key was already reached at equal or lower cost; otherwise it
//! replaces the stored cost and is expanded. Only paths that end in a
//! legal stopping state are published.

use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::board::HexCoord;
use crate::core::config::DecisionConfig;
use crate::core::types::UnitId;
use crate::game::GameSnapshot;
use crate::princess::movement::path::{MovePath, PathKey};
use crate::princess::movement::reachable::ReachableSet;
use crate::princess::movement::rules::{searches_for, MovementRules};
use crate::units::{Unit, UnitKind};

/// Output of one enumeration
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    pub paths: Vec<MovePath>,
    pub nodes_expanded: usize,
    /// The node budget ran out before the search finished
    pub truncated: bool,
}

/// Secondary identity for aerospace paths: same end hex, same enemies
/// overflown
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OverflightKey {
    position: HexCoord,
    off_board: bool,
    altitude: u32,
    velocity: u32,
    overflown: BTreeSet<UnitId>,
}

pub struct PathEnumerator<'a> {
    game: &'a GameSnapshot,
    config: &'a DecisionConfig,
}

impl<'a> PathEnumerator<'a> {
    pub fn new(game: &'a GameSnapshot, config: &'a DecisionConfig) -> Self {
        Self { game, config }
    }

    /// Every legal path for the unit this turn, in a stable order
    pub fn enumerate(&self, unit: &Unit) -> Enumeration {
        let mut result = Enumeration::default();
        let start = match unit.position {
            Some(start) if unit.deployed => start,
            _ => {
                tracing::warn!(unit = %unit.id, "unit has no board position, nothing to enumerate");
                return result;
            }
        };

        let mut remaining = self.config.max_search_nodes;
        for rules in searches_for(unit) {
            self.search(rules, unit, start, &mut remaining, &mut result);
        }

        if unit.kind == UnitKind::Aero {
            result.paths = dedup_overflights(std::mem::take(&mut result.paths));
        }

        let missing_stand_still = !result.paths.iter().any(|p| p.is_stand_still());
        if result.paths.is_empty() || (result.truncated && missing_stand_still) {
            result.paths.push(MovePath::stand_still(unit, start));
        }

        tracing::trace!(
            unit = %unit.id,
            nodes = result.nodes_expanded,
            paths = result.paths.len(),
            truncated = result.truncated,
            "enumerated paths"
        );
        result
    }

    /// Rebuild the reachable set for a unit from a fresh enumeration
    pub fn recalculate_reachable_set(&self, unit: &Unit) -> ReachableSet {
        if unit.position.is_none() || !unit.deployed {
            tracing::warn!(unit = %unit.id, "unit has no board position, reachable set is empty");
            return ReachableSet::empty(unit);
        }
        let enumeration = self.enumerate(unit);
        ReachableSet::from_paths(unit, &enumeration.paths, enumeration.truncated)
    }

    fn search(
        &self,
        rules: &dyn MovementRules,
        unit: &Unit,
        start: HexCoord,
        remaining: &mut Option<usize>,
        result: &mut Enumeration,
    ) {
        let Some(root) = rules.initial_path(unit, start) else {
            return;
        };

        let mut seen: AHashMap<PathKey, u32> = AHashMap::new();
        let mut best: AHashMap<PathKey, MovePath> = AHashMap::new();
        seen.insert(root.key(), root.mp_used);
        let mut stack = vec![root];

        while let Some(path) = stack.pop() {
            if let Some(left) = remaining.as_mut() {
                if *left == 0 {
                    result.truncated = true;
                    break;
                }
                *left -= 1;
            }
            result.nodes_expanded += 1;

            // A cheaper path to this key may have been found since this one
            // was pushed
            let key = path.key();
            if seen.get(&key).is_some_and(|cost| *cost < path.mp_used) {
                continue;
            }

            if rules.should_expand(&path, unit) {
                for next in rules.successors(&path, unit, self.game) {
                    let next_key = next.key();
                    match seen.get(&next_key) {
                        Some(cost) if *cost <= next.mp_used => continue,
                        _ => {
                            seen.insert(next_key, next.mp_used);
                            stack.push(next);
                        }
                    }
                }
            }

            if rules.is_legal_end(&path, unit, self.game) {
                let replace = best
                    .get(&key)
                    .map_or(true, |kept| path.mp_used < kept.mp_used);
                if replace {
                    best.insert(key, path);
                }
            }
        }

        let mut found: Vec<MovePath> = best.into_values().collect();
        found.sort_by(|a, b| a.key().cmp(&b.key()));
        tracing::trace!(unit = %unit.id, mode = rules.name(), paths = found.len(), "search finished");
        result.paths.extend(found);
    }
}

/// Keep the cheapest aerospace path per (end hex, overflown enemies)
fn dedup_overflights(paths: Vec<MovePath>) -> Vec<MovePath> {
    let mut kept: Vec<MovePath> = Vec::with_capacity(paths.len());
    let mut index: AHashMap<OverflightKey, usize> = AHashMap::new();
    for path in paths {
        let key = OverflightKey {
            position: path.position,
            off_board: path.off_board,
            altitude: path.altitude,
            velocity: path.velocity,
            overflown: path.overflown.clone(),
        };
        match index.get(&key) {
            Some(&i) if kept[i].mp_used <= path.mp_used => {}
            Some(&i) => kept[i] = path,
            None => {
                index.insert(key, kept.len());
                kept.push(path);
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Facing, Terrain};
    use crate::princess::movement::step::StepKind;
    use ahash::AHashSet;

    fn enumerate(game: &GameSnapshot, id: u32) -> Enumeration {
        let config = DecisionConfig::default();
        let unit = game.unit(UnitId(id)).unwrap();
        PathEnumerator::new(game, &config).enumerate(unit)
    }

    #[test]
    fn test_keys_are_unique_per_search() {
        let game = GameSnapshot::new(Board::new(12, 12))
            .with_unit(Unit::mech(1, "Griffin", 0, 55.0, 5, 0).at(HexCoord::new(6, 6), Facing::East));
        let result = enumerate(&game, 1);
        let keys: AHashSet<PathKey> = result.paths.iter().map(|p| p.key()).collect();
        assert_eq!(keys.len(), result.paths.len());
    }

    #[test]
    fn test_kept_path_is_cheapest() {
        let game = GameSnapshot::new(Board::new(12, 12))
            .with_unit(Unit::mech(1, "Griffin", 0, 55.0, 5, 0).at(HexCoord::new(6, 6), Facing::East));
        let result = enumerate(&game, 1);
        // One hex ahead, same facing: always exactly one MP
        let ahead = result
            .paths
            .iter()
            .find(|p| p.position == HexCoord::new(7, 6) && p.facing == Facing::East && !p.hull_down)
            .unwrap();
        assert_eq!(ahead.mp_used, 1);
        // Facing west without moving: three turns
        let about_face = result
            .paths
            .iter()
            .find(|p| p.position == HexCoord::new(6, 6) && p.facing == Facing::West && !p.hull_down)
            .unwrap();
        assert_eq!(about_face.mp_used, 3);
    }

    #[test]
    fn test_run_allowance_bounds_reach() {
        let game = GameSnapshot::new(Board::new(20, 20))
            .with_unit(Unit::mech(1, "Commando", 0, 25.0, 4, 0).at(HexCoord::new(10, 10), Facing::East));
        let result = enumerate(&game, 1);
        let origin = HexCoord::new(10, 10);
        assert!(result.paths.iter().all(|p| p.mp_used <= 6));
        assert!(result.paths.iter().all(|p| origin.distance(&p.position) <= 6));
        assert!(result.paths.iter().any(|p| origin.distance(&p.position) == 6));
    }

    #[test]
    fn test_immobile_unit_stands_still() {
        let mut unit = Unit::mech(1, "Wreck", 0, 55.0, 5, 0).at(HexCoord::new(3, 3), Facing::East);
        unit.immobile = true;
        let game = GameSnapshot::new(Board::new(8, 8)).with_unit(unit);
        let result = enumerate(&game, 1);
        assert_eq!(result.paths.len(), 1);
        assert!(result.paths[0].is_stand_still());
    }

    #[test]
    fn test_no_legal_move_falls_back_to_stand_still() {
        // Stacked on a friend and unable to move: nothing is legal
        let mut unit = Unit::mech(1, "Wreck", 0, 55.0, 5, 0).at(HexCoord::new(3, 3), Facing::East);
        unit.immobile = true;
        let friend = Unit::mech(2, "Friend", 0, 55.0, 5, 0).at(HexCoord::new(3, 3), Facing::East);
        let game = GameSnapshot::new(Board::new(8, 8)).with_unit(unit).with_unit(friend);
        let result = enumerate(&game, 1);
        assert_eq!(result.paths.len(), 1);
        assert!(result.paths[0].is_stand_still());
    }

    #[test]
    fn test_hull_down_start_still_moves() {
        let origin = HexCoord::new(6, 6);
        let mut tank = Unit::tank(1, "Manticore", 0, 60.0, 4).at(origin, Facing::East);
        tank.hull_down = true;
        let mut mech = Unit::mech(2, "Griffin", 0, 55.0, 5, 0).at(HexCoord::new(6, 9), Facing::East);
        mech.hull_down = true;
        let game = GameSnapshot::new(Board::new(14, 14)).with_unit(tank).with_unit(mech);

        for (id, start) in [(1, origin), (2, HexCoord::new(6, 9))] {
            let result = enumerate(&game, id);
            assert!(result.paths.len() > 1, "unit {} stuck hull-down", id);
            assert!(result
                .paths
                .iter()
                .any(|p| p.position != start && !p.hull_down && p.has_step(StepKind::HullUp)));
            assert!(result.paths.iter().any(|p| p.is_stand_still() && p.hull_down));

            let config = DecisionConfig::default();
            let unit = game.unit(UnitId(id)).unwrap();
            assert!(PathEnumerator::new(&game, &config).recalculate_reachable_set(unit).len() > 1);
        }
    }

    #[test]
    fn test_undeployed_unit_has_no_paths() {
        let game = GameSnapshot::new(Board::new(8, 8)).with_unit(Unit::mech(1, "Reserve", 0, 55.0, 5, 0));
        let result = enumerate(&game, 1);
        assert!(result.paths.is_empty());
        let config = DecisionConfig::default();
        let unit = game.unit(UnitId(1)).unwrap();
        assert!(PathEnumerator::new(&game, &config).recalculate_reachable_set(unit).is_empty());
    }

    #[test]
    fn test_jump_reaches_over_obstacles() {
        let mut game = GameSnapshot::new(Board::new(12, 12))
            .with_unit(Unit::mech(1, "Spider", 0, 30.0, 1, 4).at(HexCoord::new(2, 2), Facing::East));
        for q in 0..12 {
            game.board.set_terrain(HexCoord::new(q, 3), Terrain::DeepWater);
        }
        let result = enumerate(&game, 1);
        let jumped = result
            .paths
            .iter()
            .filter(|p| p.jumping)
            .map(|p| p.position)
            .collect::<AHashSet<_>>();
        assert!(jumped.contains(&HexCoord::new(2, 5)));
        assert!(result
            .paths
            .iter()
            .filter(|p| p.jumping)
            .all(|p| p.has_step(StepKind::StartJump)));
    }

    #[test]
    fn test_node_budget_truncates() {
        let game = GameSnapshot::new(Board::new(20, 20))
            .with_unit(Unit::mech(1, "Locust", 0, 20.0, 8, 0).at(HexCoord::new(10, 10), Facing::East));
        let config = DecisionConfig {
            max_search_nodes: Some(10),
            ..DecisionConfig::default()
        };
        let unit = game.unit(UnitId(1)).unwrap();
        let result = PathEnumerator::new(&game, &config).enumerate(unit);
        assert!(result.truncated);
        assert_eq!(result.nodes_expanded, 10);
        assert!(result.paths.iter().any(|p| p.is_stand_still()));
    }

    #[test]
    fn test_aero_paths_spend_velocity() {
        let game = GameSnapshot::new(Board::new(20, 20)).with_unit(
            Unit::aero(1, "Seydlitz", 0, 20.0, 4, 3, 5).at(HexCoord::new(10, 10), Facing::East),
        );
        let result = enumerate(&game, 1);
        assert!(!result.paths.is_empty());
        assert!(result
            .paths
            .iter()
            .all(|p| p.off_board || p.hexes_moved == p.velocity));
    }
}
