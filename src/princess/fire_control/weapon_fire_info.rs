//! Outcome estimate for one weapon fired at one target

use serde::{Deserialize, Serialize};

use crate::board::{Arc, Board, HexCoord};
use crate::core::types::{UnitId, WeaponId};
use crate::princess::entity_state::EntityState;
use crate::princess::fire_control::damage::{hit_effect, spread_critical_and_kill};
use crate::princess::fire_control::to_hit::{guess_to_hit, TargetRef, ToHitData};
use crate::units::{TableKind, Unit, Weapon};

/// What a plan is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireTarget {
    Unit(UnitId),
    Hex(HexCoord),
}

impl From<TargetRef<'_>> for FireTarget {
    fn from(target: TargetRef<'_>) -> Self {
        match target {
            TargetRef::Unit(unit) => FireTarget::Unit(unit.id),
            TargetRef::Hex(coord) => FireTarget::Hex(coord),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponFireInfo {
    pub shooter: UnitId,
    pub target: FireTarget,
    pub weapon: WeaponId,
    pub to_hit: ToHitData,
    pub probability: f64,
    /// Heat the shooter builds up by firing
    pub heat: u32,
    pub damage_per_hit: f64,
    pub expected_damage: f64,
    pub expected_criticals: f64,
    pub kill_probability: f64,
    /// Heat the target builds up, weighted by hit chance
    pub heat_inflicted: f64,
    /// Side of the target the shots land on
    pub damage_direction: Arc,
}

impl WeaponFireInfo {
    pub fn compute(
        shooter: &Unit,
        shooter_state: &EntityState,
        target: TargetRef,
        target_state: &EntityState,
        weapon: &Weapon,
        board: &Board,
    ) -> Self {
        let to_hit = guess_to_hit(shooter, shooter_state, target, target_state, weapon, board);
        let probability = to_hit.probability();

        let mut info = Self {
            shooter: shooter.id,
            target: target.into(),
            weapon: weapon.id,
            to_hit,
            probability,
            heat: weapon.heat,
            damage_per_hit: 0.0,
            expected_damage: 0.0,
            expected_criticals: 0.0,
            kill_probability: 0.0,
            heat_inflicted: 0.0,
            damage_direction: Arc::Front,
        };

        let (Some(from), Some(to)) = (shooter_state.position, target_state.position) else {
            return info;
        };
        let Some(bracket) = weapon.range_bracket(from.distance(&to)) else {
            return info;
        };
        if probability <= 0.0 {
            return info;
        }

        let effect = hit_effect(shooter, weapon, bracket, target.kind());
        info.damage_per_hit = effect.damage;
        info.expected_damage = probability * effect.damage;
        info.heat_inflicted = probability * effect.heat;

        if let Some(victim) = target.unit() {
            info.damage_direction = target_state.facing.arc_to(to, from);
            let (criticals, kill) =
                spread_critical_and_kill(victim, info.damage_direction, TableKind::Standard, &effect);
            info.expected_criticals = probability * criticals;
            info.kill_probability = probability * kill;
        }
        info
    }
}
