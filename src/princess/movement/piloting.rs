//! Piloting skill rolls implied by a path

use serde::{Deserialize, Serialize};

use crate::board::Terrain;
use crate::princess::fire_control::probability::probability_at_least;
use crate::units::Unit;

/// Why a roll is required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollReason {
    StandingUp,
    EnteringWater,
    EnteringRubble,
    /// Turning on pavement after running
    Skid,
    JumpingWithDamagedLeg,
    Masc,
}

/// A roll the unit must make, with the 2d6 target it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotingRoll {
    pub reason: RollReason,
    pub target: i32,
}

impl PilotingRoll {
    /// A piloting roll: skill, leg damage and a situational modifier
    pub fn piloting(unit: &Unit, reason: RollReason, modifier: i32) -> Self {
        Self {
            reason,
            target: unit.piloting as i32 + unit.leg_damage_modifier() + modifier,
        }
    }

    /// Roll for entering hazardous terrain, if the terrain needs one
    pub fn for_terrain(unit: &Unit, terrain: Terrain) -> Option<Self> {
        if !terrain.requires_piloting_roll() {
            return None;
        }
        let reason = match terrain {
            Terrain::Rubble => RollReason::EnteringRubble,
            _ => RollReason::EnteringWater,
        };
        Some(Self::piloting(unit, reason, terrain.piloting_modifier()))
    }

    /// MASC activation check; fails on rolls below the MASC target number
    pub fn masc(target_number: u32) -> Self {
        Self {
            reason: RollReason::Masc,
            target: target_number as i32,
        }
    }

    pub fn success_probability(&self) -> f64 {
        probability_at_least(self.target)
    }
}

/// Chance of passing every roll in the list
pub fn success_probability(rolls: &[PilotingRoll]) -> f64 {
    rolls.iter().map(|r| r.success_probability()).product()
}
