//! Hypothetical unit state used by attack estimates
//!
//! An `EntityState` is a small copyable snapshot of the parts of a unit
//! that matter for shooting at it or from it. It can come from the unit as
//! it stands or from a candidate path, so "what if I end here" questions
//! never touch the unit itself.

use serde::{Deserialize, Serialize};

use crate::board::{Facing, HexCoord};
use crate::princess::movement::MovePath;
use crate::units::{MovementMode, Unit, UnitKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub position: Option<HexCoord>,
    pub facing: Facing,
    /// Torso facing; equals `facing` unless twisted
    pub secondary_facing: Facing,
    pub heat: u32,
    pub hexes_moved: u32,
    pub prone: bool,
    pub immobile: bool,
    pub jumping: bool,
    pub hull_down: bool,
    pub airborne: bool,
    pub movement_mode: MovementMode,
}

impl EntityState {
    /// State of the unit as it stands, with whatever movement it has
    /// already committed this turn
    pub fn from_unit(unit: &Unit) -> Self {
        Self {
            position: if unit.deployed { unit.position } else { None },
            facing: unit.facing,
            secondary_facing: unit.secondary_facing,
            heat: unit.heat,
            hexes_moved: unit.hexes_moved,
            prone: unit.prone,
            immobile: unit.immobile,
            jumping: unit.movement_mode == MovementMode::Jumped,
            hull_down: unit.hull_down,
            airborne: unit.is_airborne(),
            movement_mode: unit.movement_mode,
        }
    }

    /// State the unit would be in at the end of `path`, including the
    /// heat the movement itself generates
    pub fn from_path(path: &MovePath, unit: &Unit) -> Self {
        let movement_mode = path.movement_mode(unit);
        Self {
            position: if path.off_board { None } else { Some(path.position) },
            facing: path.facing,
            secondary_facing: path.facing,
            heat: unit.heat + movement_heat(unit, movement_mode, path.hexes_moved),
            hexes_moved: path.hexes_moved,
            prone: path.prone,
            immobile: unit.immobile,
            jumping: path.jumping,
            hull_down: path.hull_down,
            airborne: unit.kind == UnitKind::Aero && path.altitude > 0,
            movement_mode,
        }
    }

    /// A fixed target such as a building or an objective hex
    pub fn stationary_at(coord: HexCoord) -> Self {
        Self {
            position: Some(coord),
            facing: Facing::default(),
            secondary_facing: Facing::default(),
            heat: 0,
            hexes_moved: 0,
            prone: false,
            immobile: true,
            jumping: false,
            hull_down: false,
            airborne: false,
            movement_mode: MovementMode::Stationary,
        }
    }

    /// Same state with the torso turned to `facing`
    pub fn with_secondary_facing(&self, facing: Facing) -> Self {
        Self {
            secondary_facing: facing,
            ..*self
        }
    }
}

/// Heat a heat-tracking unit builds up from moving
fn movement_heat(unit: &Unit, mode: MovementMode, hexes_moved: u32) -> u32 {
    if unit.kind != UnitKind::Mech {
        return 0;
    }
    match mode {
        MovementMode::Stationary | MovementMode::Flew => 0,
        MovementMode::Walked => 1,
        MovementMode::Ran => 2,
        MovementMode::Jumped => hexes_moved.max(3),
    }
}
