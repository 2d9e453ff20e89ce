//! Where a unit could end up this turn

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};

use crate::board::{Facing, HexCoord};
use crate::core::types::UnitId;
use crate::princess::movement::path::MovePath;
use crate::princess::movement::region::ConvexRegion;
use crate::units::Unit;

/// Latest reachable set per unit; entries are swapped, never edited
pub type ReachableTable = AHashMap<UnitId, Arc<ReachableSet>>;

/// Reachable (coordinate, facing) end states of one unit plus their
/// bounding region
///
/// Built once by the enumerator and never changed afterwards; a rebuild
/// produces a new set.
#[derive(Debug, Clone)]
pub struct ReachableSet {
    pub unit: UnitId,
    /// Position and facing the set was computed from
    pub origin: Option<HexCoord>,
    pub origin_facing: Facing,
    states: AHashSet<(HexCoord, Facing)>,
    coords: AHashSet<HexCoord>,
    region: Option<ConvexRegion>,
    /// The search hit its node budget before finishing
    pub truncated: bool,
}

impl ReachableSet {
    /// Nothing reachable (unit is not on the board)
    pub fn empty(unit: &Unit) -> Self {
        Self {
            unit: unit.id,
            origin: unit.position,
            origin_facing: unit.facing,
            states: AHashSet::new(),
            coords: AHashSet::new(),
            region: None,
            truncated: false,
        }
    }

    pub fn from_paths(unit: &Unit, paths: &[MovePath], truncated: bool) -> Self {
        let states: AHashSet<(HexCoord, Facing)> = paths
            .iter()
            .filter(|p| !p.off_board)
            .map(|p| (p.position, p.facing))
            .collect();
        let coords: AHashSet<HexCoord> = states.iter().map(|(coord, _)| *coord).collect();
        let region = ConvexRegion::from_coords(&coords);
        Self {
            unit: unit.id,
            origin: unit.position,
            origin_facing: unit.facing,
            states,
            coords,
            region,
            truncated,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.coords.contains(&coord)
    }

    pub fn contains_state(&self, coord: HexCoord, facing: Facing) -> bool {
        self.states.contains(&(coord, facing))
    }

    /// Could the unit end anywhere in `hexes`?
    pub fn contains_any(&self, hexes: &[HexCoord]) -> bool {
        hexes.iter().any(|h| self.contains(*h))
    }

    pub fn region(&self) -> Option<&ConvexRegion> {
        self.region.as_ref()
    }

    /// Lower bound on how close the unit can get to `coord`
    pub fn distance_to(&self, coord: HexCoord) -> Option<u32> {
        self.region.map(|r| r.distance_to(coord))
    }

    pub fn coords(&self) -> impl Iterator<Item = &HexCoord> + '_ {
        self.coords.iter()
    }

    /// Reachable hexes in coordinate order
    pub fn coords_sorted(&self) -> Vec<HexCoord> {
        let mut coords: Vec<HexCoord> = self.coords.iter().copied().collect();
        coords.sort();
        coords
    }

    /// Was this set computed from a different position or facing than the
    /// unit has now?
    pub fn is_stale_for(&self, unit: &Unit) -> bool {
        self.origin != unit.position || self.origin_facing != unit.facing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::princess::movement::step::StepKind;

    #[test]
    fn test_from_paths_collects_states() {
        let unit = Unit::mech(1, "Vindicator", 0, 45.0, 4, 4).at(HexCoord::new(3, 3), Facing::East);
        let still = MovePath::stand_still(&unit, HexCoord::new(3, 3));
        let moved = still.extended(StepKind::Forward, HexCoord::new(4, 3), Facing::East, 1);
        let set = ReachableSet::from_paths(&unit, &[still, moved], false);

        assert_eq!(set.len(), 2);
        assert!(set.contains(HexCoord::new(4, 3)));
        assert!(set.contains_state(HexCoord::new(3, 3), Facing::East));
        assert!(!set.contains_state(HexCoord::new(3, 3), Facing::West));
        assert_eq!(set.distance_to(HexCoord::new(6, 3)), Some(2));
        assert_eq!(set.coords_sorted(), vec![HexCoord::new(3, 3), HexCoord::new(4, 3)]);
    }

    #[test]
    fn test_staleness() {
        let mut unit = Unit::mech(1, "Vindicator", 0, 45.0, 4, 4).at(HexCoord::new(3, 3), Facing::East);
        let set = ReachableSet::empty(&unit);
        assert!(!set.is_stale_for(&unit));
        unit.position = Some(HexCoord::new(4, 3));
        assert!(set.is_stale_for(&unit));
    }
}
