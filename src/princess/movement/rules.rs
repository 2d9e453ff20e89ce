//! Movement capabilities per unit kind
//!
//! Each unit kind gets a `MovementRules` implementation chosen once when a
//! search starts; the enumerator never asks what kind of unit it is
//! moving.

use crate::board::HexCoord;
use crate::game::GameSnapshot;
use crate::princess::movement::aero::AERO_RULES;
use crate::princess::movement::ground::{INFANTRY_RULES, JUMP_RULES, MECH_RULES, TANK_RULES};
use crate::princess::movement::path::MovePath;
use crate::units::{Unit, UnitKind};

/// Successor generation and legality for one movement mode
pub trait MovementRules: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Root of the search, or `None` when this mode is unavailable
    fn initial_path(&self, unit: &Unit, start: HexCoord) -> Option<MovePath>;

    /// Legal one-step extensions of `path`
    fn successors(&self, path: &MovePath, unit: &Unit, game: &GameSnapshot) -> Vec<MovePath>;

    /// May the search extend this path further?
    fn should_expand(&self, path: &MovePath, unit: &Unit) -> bool;

    /// Can the unit legally stop at the end of this path?
    fn is_legal_end(&self, path: &MovePath, unit: &Unit, game: &GameSnapshot) -> bool;

    /// Damage the unit takes from a fall
    fn fall_damage(&self, unit: &Unit) -> f64;
}

/// Rules for the unit's primary movement mode
pub fn rules_for(kind: UnitKind) -> &'static dyn MovementRules {
    match kind {
        UnitKind::Mech => &MECH_RULES,
        UnitKind::Tank => &TANK_RULES,
        UnitKind::Infantry => &INFANTRY_RULES,
        UnitKind::Aero => &AERO_RULES,
    }
}

/// Every movement mode searched for a unit, each with its own dedup table
pub fn searches_for(unit: &Unit) -> Vec<&'static dyn MovementRules> {
    let mut searches = vec![rules_for(unit.kind)];
    if unit.kind == UnitKind::Mech && unit.jump_mp > 0 {
        searches.push(&JUMP_RULES);
    }
    searches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jumping_mechs_get_two_searches() {
        let jumper = Unit::mech(1, "Phoenix Hawk", 0, 45.0, 6, 6);
        let walker = Unit::mech(2, "Atlas", 0, 100.0, 3, 0);
        assert_eq!(searches_for(&jumper).len(), 2);
        assert_eq!(searches_for(&walker).len(), 1);
    }

    #[test]
    fn test_fall_damage_by_kind() {
        let mech = Unit::mech(1, "Atlas", 0, 100.0, 3, 0);
        let tank = Unit::tank(2, "Demolisher", 0, 80.0, 3);
        let foot = Unit::infantry(3, "Foot", 0, 28, 1);
        assert_eq!(rules_for(UnitKind::Mech).fall_damage(&mech), 10.0);
        assert_eq!(rules_for(UnitKind::Tank).fall_damage(&tank), 4.0);
        assert_eq!(rules_for(UnitKind::Infantry).fall_damage(&foot), 0.0);
    }
}
