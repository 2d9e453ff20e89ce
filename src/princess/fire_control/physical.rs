//! Punch and kick estimates

use serde::{Deserialize, Serialize};

use crate::core::config::DecisionConfig;
use crate::core::types::UnitId;
use crate::game::GameSnapshot;
use crate::princess::entity_state::EntityState;
use crate::princess::fire_control::damage::critical_and_kill;
use crate::princess::fire_control::to_hit::{guess_physical_to_hit, PhysicalAttackType, ToHitData, ToHitReason};
use crate::units::{TableKind, Unit};

/// Damage a physical attack does on a hit
pub fn physical_damage(attacker: &Unit, attack: PhysicalAttackType) -> f64 {
    match attack {
        PhysicalAttackType::Punch => (attacker.weight / 10.0).ceil(),
        PhysicalAttackType::Kick => (attacker.weight / 5.0).floor(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalInfo {
    pub attacker: UnitId,
    pub target: UnitId,
    pub attack: PhysicalAttackType,
    pub to_hit: ToHitData,
    pub probability: f64,
    pub damage: f64,
    pub expected_damage: f64,
    pub expected_criticals: f64,
    pub kill_probability: f64,
    pub utility: f64,
}

impl PhysicalInfo {
    pub fn compute(
        attacker: &Unit,
        attacker_state: &EntityState,
        target: &Unit,
        target_state: &EntityState,
        attack: PhysicalAttackType,
        game: &GameSnapshot,
        config: &DecisionConfig,
    ) -> Self {
        let to_hit = if game.options.physical_attacks_allowed(attacker.team) {
            guess_physical_to_hit(attacker, attacker_state, target, target_state, attack, &game.board)
        } else {
            ToHitData::impossible(ToHitReason::PhysicalNotAllowed)
        };
        let probability = to_hit.probability();
        let damage = physical_damage(attacker, attack);

        let mut info = Self {
            attacker: attacker.id,
            target: target.id,
            attack,
            to_hit,
            probability,
            damage,
            expected_damage: 0.0,
            expected_criticals: 0.0,
            kill_probability: 0.0,
            utility: 0.0,
        };
        let (Some(from), Some(to)) = (attacker_state.position, target_state.position) else {
            return info;
        };
        if probability <= 0.0 {
            return info;
        }

        let table = match attack {
            PhysicalAttackType::Punch => TableKind::Punch,
            PhysicalAttackType::Kick => TableKind::Kick,
        };
        let side = target_state.facing.arc_to(to, from);
        let (criticals, kill) = critical_and_kill(target, side, table, damage);

        info.expected_damage = probability * damage;
        info.expected_criticals = probability * criticals;
        info.kill_probability = probability * kill;
        info.utility = config.damage_utility * info.expected_damage
            + config.critical_utility * info.expected_criticals
            + config.kill_utility * info.kill_probability;
        info
    }
}
