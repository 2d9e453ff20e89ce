//! Individual move steps

use serde::{Deserialize, Serialize};

use crate::board::{Facing, HexCoord};

/// What a single step does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    StandUp,
    HullDown,
    /// Leave a hull-down position taken on an earlier turn
    HullUp,
    /// Spend the turn clearing a jammed weapon
    Unjam,
    StartJump,
    // Aerospace
    Accelerate,
    Decelerate,
    Climb,
    Dive,
    SideSlipLeft,
    SideSlipRight,
    FlyOff,
}

impl StepKind {
    /// Does this step enter a new hex?
    pub fn changes_hex(&self) -> bool {
        matches!(
            self,
            StepKind::Forward | StepKind::Backward | StepKind::SideSlipLeft | StepKind::SideSlipRight
        )
    }

    pub fn is_turn(&self) -> bool {
        matches!(self, StepKind::TurnLeft | StepKind::TurnRight)
    }

    /// Aerospace maneuvers, limited to one per turn
    pub fn is_maneuver(&self) -> bool {
        matches!(
            self,
            StepKind::Climb | StepKind::Dive | StepKind::SideSlipLeft | StepKind::SideSlipRight
        )
    }

    /// Thrust changes, only legal before anything else happens
    pub fn is_thrust_change(&self) -> bool {
        matches!(self, StepKind::Accelerate | StepKind::Decelerate)
    }
}

/// One step of a path, with the position and facing after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStep {
    pub kind: StepKind,
    pub position: HexCoord,
    pub facing: Facing,
    /// Move points (or thrust) this step cost
    pub cost: u32,
}

impl MoveStep {
    pub fn new(kind: StepKind, position: HexCoord, facing: Facing, cost: u32) -> Self {
        Self {
            kind,
            position,
            facing,
            cost,
        }
    }
}
