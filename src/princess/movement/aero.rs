//! Aerospace movement: velocity, altitude, banking and maneuvers
//!
//! An aerospace unit must move exactly its velocity in hexes. Thrust is
//! spent on velocity changes (only before the first hex), on banking turns
//! and on maneuvers, of which only one is allowed per turn.

use crate::board::HexCoord;
use crate::game::GameSnapshot;
use crate::princess::constants::AERO_MAX_ALTITUDE;
use crate::princess::movement::path::MovePath;
use crate::princess::movement::rules::MovementRules;
use crate::princess::movement::step::StepKind;
use crate::units::Unit;

pub struct AeroRules;

pub static AERO_RULES: AeroRules = AeroRules;

impl AeroRules {
    fn thrust_left(path: &MovePath, unit: &Unit) -> u32 {
        unit.walk_mp.saturating_sub(path.mp_used)
    }

    /// Record ground enemies in the hex just entered
    fn overfly(path: &mut MovePath, unit: &Unit, game: &GameSnapshot) {
        let hostiles = game
            .units_at(path.position)
            .filter(|other| other.team != unit.team && !other.is_airborne())
            .map(|other| other.id);
        path.overflown.extend(hostiles);
    }

    fn advance(
        path: &MovePath,
        unit: &Unit,
        game: &GameSnapshot,
        kind: StepKind,
        target: HexCoord,
        cost: u32,
    ) -> Option<MovePath> {
        if !game.board.in_bounds(target) {
            return None;
        }
        let mut next = path.extended(kind, target, path.facing, cost);
        next.hexes_since_turn += 1;
        Self::overfly(&mut next, unit, game);
        Some(next)
    }
}

impl MovementRules for AeroRules {
    fn name(&self) -> &'static str {
        "aero"
    }

    fn initial_path(&self, unit: &Unit, start: HexCoord) -> Option<MovePath> {
        Some(MovePath::stand_still(unit, start))
    }

    fn successors(&self, path: &MovePath, unit: &Unit, game: &GameSnapshot) -> Vec<MovePath> {
        let mut next = Vec::new();
        let thrust = Self::thrust_left(path, unit);
        let can_move = path.hexes_moved < path.velocity;

        if path.only_thrust_changes() && thrust > 0 {
            let mut faster = path.extended(StepKind::Accelerate, path.position, path.facing, 1);
            faster.velocity += 1;
            next.push(faster);

            if path.velocity > 0 {
                let mut slower = path.extended(StepKind::Decelerate, path.position, path.facing, 1);
                slower.velocity -= 1;
                next.push(slower);
            }
        }

        if can_move {
            let ahead = path.position.neighbor(path.facing);
            if game.board.in_bounds(ahead) {
                next.extend(Self::advance(path, unit, game, StepKind::Forward, ahead, 0));
            } else {
                let mut gone = path.extended(StepKind::FlyOff, path.position, path.facing, 0);
                gone.off_board = true;
                next.push(gone);
            }

            if path.hexes_since_turn >= 1 && thrust >= 1 {
                for (kind, facing) in [
                    (StepKind::TurnLeft, path.facing.rotate_left()),
                    (StepKind::TurnRight, path.facing.rotate_right()),
                ] {
                    let mut banked = path.extended(kind, path.position, facing, 1);
                    banked.hexes_since_turn = 0;
                    next.push(banked);
                }
            }
        }

        if !path.did_maneuver {
            if thrust >= 1 && path.altitude < AERO_MAX_ALTITUDE {
                let mut climbed = path.extended(StepKind::Climb, path.position, path.facing, 1);
                climbed.altitude += 1;
                climbed.did_maneuver = true;
                next.push(climbed);
            }
            if path.altitude > 0 {
                let mut dived = path.extended(StepKind::Dive, path.position, path.facing, 0);
                dived.altitude -= 1;
                dived.did_maneuver = true;
                next.push(dived);
            }
            if can_move && thrust >= 1 {
                for (kind, direction) in [
                    (StepKind::SideSlipLeft, path.facing.rotate_left()),
                    (StepKind::SideSlipRight, path.facing.rotate_right()),
                ] {
                    let target = path.position.neighbor(direction);
                    if let Some(mut slipped) = Self::advance(path, unit, game, kind, target, 1) {
                        slipped.did_maneuver = true;
                        next.push(slipped);
                    }
                }
            }
        }

        next
    }

    fn should_expand(&self, path: &MovePath, _unit: &Unit) -> bool {
        !path.off_board && (path.hexes_moved < path.velocity || path.only_thrust_changes())
    }

    fn is_legal_end(&self, path: &MovePath, _unit: &Unit, _game: &GameSnapshot) -> bool {
        path.off_board || path.hexes_moved == path.velocity
    }

    fn fall_damage(&self, _unit: &Unit) -> f64 {
        0.0
    }
}
