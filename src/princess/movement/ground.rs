//! Ground and jump movement

use crate::board::{Facing, HexCoord, Terrain};
use crate::game::GameSnapshot;
use crate::princess::constants::{
    HULL_DOWN_COST, MECH_HULL_UP_COST, MECH_MAX_ELEVATION_CHANGE, STAND_UP_COST,
    VEHICLE_MAX_ELEVATION_CHANGE,
};
use crate::princess::movement::path::MovePath;
use crate::princess::movement::piloting::{PilotingRoll, RollReason};
use crate::princess::movement::rules::MovementRules;
use crate::princess::movement::step::StepKind;
use crate::units::Unit;

/// Walking, running and tracked/wheeled movement
pub struct GroundRules {
    name: &'static str,
    max_elevation_change: u32,
    turn_cost: u32,
    can_stand: bool,
    can_hull_down: bool,
    /// MP to leave a hull-down position held from an earlier turn
    hull_up_cost: u32,
    /// Hazardous terrain and skids call for piloting rolls
    piloting_rolls: bool,
    /// Fraction of ceil(weight / 10) taken on a fall
    fall_damage_scale: f64,
    impassable: fn(&Terrain) -> bool,
}

fn never_impassable(_: &Terrain) -> bool {
    false
}

pub static MECH_RULES: GroundRules = GroundRules {
    name: "mech",
    max_elevation_change: MECH_MAX_ELEVATION_CHANGE,
    turn_cost: 1,
    can_stand: true,
    can_hull_down: true,
    hull_up_cost: MECH_HULL_UP_COST,
    piloting_rolls: true,
    fall_damage_scale: 1.0,
    impassable: never_impassable,
};

pub static TANK_RULES: GroundRules = GroundRules {
    name: "tank",
    max_elevation_change: VEHICLE_MAX_ELEVATION_CHANGE,
    turn_cost: 1,
    can_stand: false,
    can_hull_down: true,
    hull_up_cost: 0,
    piloting_rolls: false,
    fall_damage_scale: 0.5,
    impassable: Terrain::impassable_for_tanks,
};

pub static INFANTRY_RULES: GroundRules = GroundRules {
    name: "infantry",
    max_elevation_change: VEHICLE_MAX_ELEVATION_CHANGE,
    turn_cost: 0,
    can_stand: false,
    can_hull_down: false,
    hull_up_cost: 0,
    piloting_rolls: false,
    fall_damage_scale: 0.0,
    impassable: Terrain::impassable_for_infantry,
};

impl GroundRules {
    /// MP the path may spend in total
    fn budget(&self, path: &MovePath, unit: &Unit) -> u32 {
        if path.unjam_attempted {
            unit.walk_mp
        } else {
            unit.max_mp()
        }
    }

    /// Step into the adjacent hex in `direction`, keeping the current facing
    fn enter(
        &self,
        path: &MovePath,
        unit: &Unit,
        game: &GameSnapshot,
        direction: Facing,
        kind: StepKind,
        limit: u32,
    ) -> Option<MovePath> {
        let target = path.position.neighbor(direction);
        let hex = game.board.get_hex(target)?;
        if (self.impassable)(&hex.terrain) {
            return None;
        }
        let climb = game.board.elevation_change(path.position, target);
        if climb > self.max_elevation_change {
            return None;
        }
        if game.occupied_by_enemy(target, unit.team) {
            return None;
        }

        let cost = hex.terrain.movement_cost() + climb;
        if path.mp_used + cost > limit {
            return None;
        }

        let mut next = path.extended(kind, target, path.facing, cost);
        if self.piloting_rolls {
            next.rolls.extend(PilotingRoll::for_terrain(unit, hex.terrain));
        }
        if let Some(target_number) = unit.masc {
            if !next.masc_used && next.mp_used > unit.run_mp() {
                next.masc_used = true;
                next.rolls.push(PilotingRoll::masc(target_number));
            }
        }
        Some(next)
    }

    fn turn(
        &self,
        path: &MovePath,
        unit: &Unit,
        game: &GameSnapshot,
        kind: StepKind,
        facing: Facing,
        limit: u32,
    ) -> Option<MovePath> {
        if path.mp_used + self.turn_cost > limit {
            return None;
        }
        let mut next = path.extended(kind, path.position, facing, self.turn_cost);
        let skids = self.piloting_rolls
            && self.turn_cost > 0
            && next.mp_used > unit.walk_mp
            && game.board.terrain(path.position).is_paved();
        if skids {
            next.rolls.push(PilotingRoll::piloting(unit, RollReason::Skid, 0));
        }
        Some(next)
    }
}

impl MovementRules for GroundRules {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initial_path(&self, unit: &Unit, start: HexCoord) -> Option<MovePath> {
        Some(MovePath::stand_still(unit, start))
    }

    fn successors(&self, path: &MovePath, unit: &Unit, game: &GameSnapshot) -> Vec<MovePath> {
        let mut next = Vec::new();
        let limit = self.budget(path, unit);

        if path.prone {
            if self.can_stand && path.mp_used + STAND_UP_COST <= limit {
                let mut stood = path.extended(StepKind::StandUp, path.position, path.facing, STAND_UP_COST);
                stood.prone = false;
                stood.rolls.push(PilotingRoll::piloting(unit, RollReason::StandingUp, 0));
                next.push(stood);
            }
            return next;
        }

        if path.hull_down {
            if path.mp_used + self.hull_up_cost <= limit {
                let mut up =
                    path.extended(StepKind::HullUp, path.position, path.facing, self.hull_up_cost);
                up.hull_down = false;
                next.push(up);
            }
            return next;
        }

        if path.steps.is_empty() && unit.weapons.iter().any(|w| w.jammed && !w.destroyed) {
            let mut unjam = path.extended(StepKind::Unjam, path.position, path.facing, 0);
            unjam.unjam_attempted = true;
            next.push(unjam);
        }

        next.extend(self.turn(path, unit, game, StepKind::TurnLeft, path.facing.rotate_left(), limit));
        next.extend(self.turn(path, unit, game, StepKind::TurnRight, path.facing.rotate_right(), limit));
        next.extend(self.enter(path, unit, game, path.facing, StepKind::Forward, limit));
        next.extend(self.enter(
            path,
            unit,
            game,
            path.facing.opposite(),
            StepKind::Backward,
            limit.min(unit.walk_mp),
        ));

        if self.can_hull_down && !path.has_step(StepKind::HullUp) && path.mp_used + HULL_DOWN_COST <= limit {
            let mut down = path.extended(StepKind::HullDown, path.position, path.facing, HULL_DOWN_COST);
            down.hull_down = true;
            next.push(down);
        }

        next
    }

    fn should_expand(&self, path: &MovePath, unit: &Unit) -> bool {
        // Going hull-down ends the move
        !unit.immobile
            && !unit.shutdown
            && !path.has_step(StepKind::HullDown)
            && path.mp_used < self.budget(path, unit)
    }

    fn is_legal_end(&self, path: &MovePath, unit: &Unit, game: &GameSnapshot) -> bool {
        !game.occupied_by_friend(path.position, unit.team, unit.id)
    }

    fn fall_damage(&self, unit: &Unit) -> f64 {
        (unit.weight / 10.0).ceil() * self.fall_damage_scale
    }
}

/// Jumping: one MP per hex regardless of terrain, free facing changes
pub struct JumpRules;

pub static JUMP_RULES: JumpRules = JumpRules;

impl MovementRules for JumpRules {
    fn name(&self) -> &'static str {
        "jump"
    }

    fn initial_path(&self, unit: &Unit, start: HexCoord) -> Option<MovePath> {
        if unit.jump_mp == 0 || unit.prone || unit.hull_down || unit.immobile || unit.shutdown {
            return None;
        }
        let mut path =
            MovePath::stand_still(unit, start).extended(StepKind::StartJump, start, unit.facing, 0);
        path.jumping = true;
        if unit.has_damaged_leg() {
            path.rolls.push(PilotingRoll::piloting(unit, RollReason::JumpingWithDamagedLeg, 0));
        }
        Some(path)
    }

    fn successors(&self, path: &MovePath, _unit: &Unit, game: &GameSnapshot) -> Vec<MovePath> {
        let mut next = vec![
            path.extended(StepKind::TurnLeft, path.position, path.facing.rotate_left(), 0),
            path.extended(StepKind::TurnRight, path.position, path.facing.rotate_right(), 0),
        ];
        let target = path.position.neighbor(path.facing);
        if game.board.in_bounds(target) {
            next.push(path.extended(StepKind::Forward, target, path.facing, 1));
        }
        next
    }

    fn should_expand(&self, path: &MovePath, unit: &Unit) -> bool {
        path.mp_used < unit.jump_mp
    }

    fn is_legal_end(&self, path: &MovePath, unit: &Unit, game: &GameSnapshot) -> bool {
        if path.hexes_moved == 0 {
            return false;
        }
        let rise = game.board.elevation(path.position) as i32 - game.board.elevation(path.start) as i32;
        rise <= unit.jump_mp as i32
            && !game.occupied_by_enemy(path.position, unit.team)
            && !game.occupied_by_friend(path.position, unit.team, unit.id)
    }

    fn fall_damage(&self, unit: &Unit) -> f64 {
        MECH_RULES.fall_damage(unit)
    }
}
