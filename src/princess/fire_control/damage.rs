//! Expected damage, critical hits and kill chance for a single hit

use crate::board::Arc;
use crate::princess::constants::{EXPECTED_CRITS_PER_ROLL, NATURAL_CRIT_CHANCE};
use crate::princess::fire_control::probability::probability_exactly;
use crate::units::{HitTable, RangeBracket, TableKind, Unit, UnitKind, Weapon, WeaponClass};

/// Missiles hitting per cluster roll (2..=12) for the standard rack sizes
const CLUSTER_TABLE: [(u32, [u32; 11]); 7] = [
    (2, [1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2]),
    (4, [1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4]),
    (5, [1, 2, 2, 3, 3, 3, 3, 4, 4, 5, 5]),
    (6, [2, 2, 3, 3, 4, 4, 4, 5, 5, 6, 6]),
    (10, [3, 3, 4, 6, 6, 6, 6, 8, 8, 10, 10]),
    (15, [5, 5, 6, 9, 9, 9, 9, 12, 12, 15, 15]),
    (20, [6, 6, 9, 12, 12, 12, 12, 16, 16, 20, 20]),
];

/// Long range missiles land in groups of five
const LRM_GROUP: f64 = 5.0;

/// Expected missiles hitting from a rack of `rack` tubes
///
/// Non-standard racks use the nearest smaller standard rack, scaled up.
pub fn expected_cluster_hits(rack: u32) -> f64 {
    if rack < 2 {
        return rack as f64;
    }
    let Some((standard, hits)) = CLUSTER_TABLE.iter().rev().find(|(size, _)| *size <= rack) else {
        return rack as f64;
    };
    let expected: f64 = hits
        .iter()
        .enumerate()
        .map(|(i, h)| probability_exactly(i as i32 + 2) * *h as f64)
        .sum();
    expected * rack as f64 / *standard as f64
}

/// Damage and heat delivered by one successful attack roll
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitEffect {
    pub damage: f64,
    pub heat: f64,
    /// Damage of the largest chunk landing on a single location
    pub chunk: f64,
}

impl HitEffect {
    /// How many location rolls the damage is spread over
    pub fn chunks(&self) -> f64 {
        if self.chunk > 0.0 {
            self.damage / self.chunk
        } else {
            0.0
        }
    }
}

/// What one hit from `weapon` does to a target of `target_kind`
pub fn hit_effect(
    shooter: &Unit,
    weapon: &Weapon,
    bracket: RangeBracket,
    target_kind: Option<UnitKind>,
) -> HitEffect {
    let tracks_heat = matches!(target_kind, Some(UnitKind::Mech) | Some(UnitKind::Aero));
    match weapon.class {
        WeaponClass::Fixed { .. } | WeaponClass::RangeBanded { .. } => {
            let damage = weapon.nominal_damage(bracket);
            HitEffect {
                damage,
                heat: 0.0,
                chunk: damage,
            }
        }
        WeaponClass::Cluster {
            rack,
            damage_per_missile,
        } => {
            let damage = expected_cluster_hits(rack) * damage_per_missile as f64;
            let chunk = if damage_per_missile == 1 {
                damage.min(LRM_GROUP)
            } else {
                damage_per_missile as f64
            };
            HitEffect {
                damage,
                heat: 0.0,
                chunk,
            }
        }
        WeaponClass::HeatOnly { heat_damage } if tracks_heat => HitEffect {
            damage: 0.0,
            heat: heat_damage as f64,
            chunk: 0.0,
        },
        WeaponClass::HeatOnly { heat_damage } => HitEffect {
            damage: heat_damage as f64,
            heat: 0.0,
            chunk: heat_damage as f64,
        },
        WeaponClass::Infantry { damage_per_trooper } => {
            let damage = damage_per_trooper * shooter.troopers() as f64;
            HitEffect {
                damage,
                heat: 0.0,
                chunk: damage.min(2.0),
            }
        }
    }
}

/// Expected critical hits and kill chance from one chunk of damage landing
/// on `target` from `side`
pub fn critical_and_kill(target: &Unit, side: Arc, table: TableKind, damage: f64) -> (f64, f64) {
    if damage <= 0.0 {
        return (0.0, 0.0);
    }
    let table = HitTable::lookup(target.kind, side, table);
    let mut criticals = 0.0;
    let mut kill = 0.0;

    for (location, probability) in table.probabilities() {
        let Some(status) = target.location(location) else {
            continue;
        };
        if target.kind != UnitKind::Infantry {
            criticals += probability * NATURAL_CRIT_CHANCE;
            if damage > status.armor as f64 {
                criticals += probability * EXPECTED_CRITS_PER_ROLL;
            }
        }
        if target.kind.is_kill_location(location) && damage > status.total() as f64 {
            kill += probability;
        }
    }

    (criticals, kill.min(1.0))
}

/// Critical and kill estimates for a whole hit spread over chunks
pub fn spread_critical_and_kill(target: &Unit, side: Arc, table: TableKind, effect: &HitEffect) -> (f64, f64) {
    let (criticals, kill) = critical_and_kill(target, side, table, effect.chunk);
    let chunks = effect.chunks();
    (criticals * chunks, 1.0 - (1.0 - kill).powf(chunks))
}
