//! Move paths and their deduplication key

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::{Facing, HexCoord};
use crate::core::types::UnitId;
use crate::princess::movement::piloting::{success_probability, PilotingRoll};
use crate::princess::movement::step::{MoveStep, StepKind};
use crate::units::{MovementMode, Unit, UnitKind};

/// End-state identity used to prune the search
///
/// Two paths with the same key are interchangeable for everything that
/// follows, so only the cheaper one is kept. Velocity, altitude and hexes
/// moved are zero for ground units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathKey {
    pub position: HexCoord,
    pub facing: Facing,
    pub prone: bool,
    pub hull_down: bool,
    pub did_maneuver: bool,
    pub off_board: bool,
    pub velocity: u32,
    pub altitude: u32,
    pub hexes_moved: u32,
}

/// An ordered sequence of steps and the state it ends in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovePath {
    pub unit: UnitId,
    pub kind: UnitKind,
    pub start: HexCoord,
    pub start_facing: Facing,
    pub steps: Vec<MoveStep>,

    pub position: HexCoord,
    pub facing: Facing,
    /// Move points for ground units, thrust for aerospace
    pub mp_used: u32,
    pub hexes_moved: u32,

    pub prone: bool,
    pub hull_down: bool,
    pub jumping: bool,
    pub did_maneuver: bool,
    pub off_board: bool,
    pub unjam_attempted: bool,
    pub masc_used: bool,

    pub velocity: u32,
    pub altitude: u32,
    pub hexes_since_turn: u32,
    /// Enemy units flown over this turn
    pub overflown: BTreeSet<UnitId>,

    pub rolls: Vec<PilotingRoll>,
}

impl MovePath {
    /// The empty path: the unit stays where it is
    pub fn stand_still(unit: &Unit, position: HexCoord) -> Self {
        Self {
            unit: unit.id,
            kind: unit.kind,
            start: position,
            start_facing: unit.facing,
            steps: Vec::new(),
            position,
            facing: unit.facing,
            mp_used: 0,
            hexes_moved: 0,
            prone: unit.prone,
            hull_down: unit.hull_down,
            jumping: false,
            did_maneuver: false,
            off_board: false,
            unjam_attempted: false,
            masc_used: false,
            velocity: unit.velocity,
            altitude: unit.altitude,
            hexes_since_turn: 0,
            overflown: BTreeSet::new(),
            rolls: Vec::new(),
        }
    }

    /// Copy of this path extended by one step
    ///
    /// Position, facing and cost follow the step; flags are left for the
    /// caller to adjust.
    pub fn extended(&self, kind: StepKind, position: HexCoord, facing: Facing, cost: u32) -> Self {
        let mut next = self.clone();
        next.steps.push(MoveStep::new(kind, position, facing, cost));
        next.position = position;
        next.facing = facing;
        next.mp_used += cost;
        if kind.changes_hex() {
            next.hexes_moved += 1;
        }
        next
    }

    pub fn key(&self) -> PathKey {
        let aero = self.kind == UnitKind::Aero;
        PathKey {
            position: self.position,
            facing: self.facing,
            prone: self.prone,
            hull_down: self.hull_down,
            did_maneuver: self.did_maneuver,
            off_board: self.off_board,
            velocity: if aero { self.velocity } else { 0 },
            altitude: if aero { self.altitude } else { 0 },
            hexes_moved: if aero { self.hexes_moved } else { 0 },
        }
    }

    pub fn is_stand_still(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_step(&self) -> Option<&MoveStep> {
        self.steps.last()
    }

    /// Has anything other than thrust changes happened yet?
    pub fn only_thrust_changes(&self) -> bool {
        self.steps.iter().all(|s| s.kind.is_thrust_change())
    }

    pub fn has_step(&self, kind: StepKind) -> bool {
        self.steps.iter().any(|s| s.kind == kind)
    }

    /// Every hex the path passes through, start and end included
    pub fn hexes(&self) -> Vec<HexCoord> {
        let mut hexes = vec![self.start];
        for step in &self.steps {
            if hexes.last() != Some(&step.position) {
                hexes.push(step.position);
            }
        }
        hexes
    }

    pub fn movement_mode(&self, unit: &Unit) -> MovementMode {
        if self.kind == UnitKind::Aero {
            MovementMode::Flew
        } else if self.jumping {
            MovementMode::Jumped
        } else if self.mp_used == 0 {
            MovementMode::Stationary
        } else if self.mp_used <= unit.walk_mp {
            MovementMode::Walked
        } else {
            MovementMode::Ran
        }
    }

    /// Probability of passing every roll this path demands
    pub fn success_probability(&self) -> f64 {
        success_probability(&self.rolls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::princess::movement::piloting::RollReason;

    fn mech() -> Unit {
        Unit::mech(1, "Shadow Hawk", 0, 55.0, 5, 3).at(HexCoord::new(3, 3), Facing::East)
    }

    #[test]
    fn test_extend_tracks_cost_and_hexes() {
        let unit = mech();
        let start = MovePath::stand_still(&unit, HexCoord::new(3, 3));
        let moved = start.extended(StepKind::Forward, HexCoord::new(4, 3), Facing::East, 1);
        let turned = moved.extended(StepKind::TurnLeft, HexCoord::new(4, 3), Facing::NorthEast, 1);
        assert_eq!(turned.mp_used, 2);
        assert_eq!(turned.hexes_moved, 1);
        assert_eq!(turned.hexes(), vec![HexCoord::new(3, 3), HexCoord::new(4, 3)]);
        assert_eq!(start.steps.len(), 0);
    }

    #[test]
    fn test_movement_mode_by_cost() {
        let unit = mech();
        let mut path = MovePath::stand_still(&unit, HexCoord::new(3, 3));
        assert_eq!(path.movement_mode(&unit), MovementMode::Stationary);
        path.mp_used = 5;
        assert_eq!(path.movement_mode(&unit), MovementMode::Walked);
        path.mp_used = 6;
        assert_eq!(path.movement_mode(&unit), MovementMode::Ran);
        path.jumping = true;
        assert_eq!(path.movement_mode(&unit), MovementMode::Jumped);
    }

    #[test]
    fn test_ground_key_ignores_aero_fields() {
        let unit = mech();
        let mut a = MovePath::stand_still(&unit, HexCoord::new(3, 3));
        let mut b = a.clone();
        a.hexes_moved = 2;
        b.velocity = 7;
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_success_probability_uses_rolls() {
        let unit = mech();
        let mut path = MovePath::stand_still(&unit, HexCoord::new(3, 3));
        assert_eq!(path.success_probability(), 1.0);
        path.rolls.push(PilotingRoll::piloting(&unit, RollReason::StandingUp, 0));
        assert!(path.success_probability() < 1.0);
    }
}
