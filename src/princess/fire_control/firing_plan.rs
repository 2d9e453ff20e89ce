//! Firing plans and the heat-indexed plan table
//!
//! Entry `h` of the heat table is the best plan found that fires no more
//! than `h` points of heat. It is built bottom-up: start from the heat-free
//! weapons, then for each level keep the previous level's plan or improve
//! on it by adding one weapon to the plan `weapon.heat` levels below.

use serde::{Deserialize, Serialize};

use crate::core::config::DecisionConfig;
use crate::core::types::WeaponId;
use crate::princess::entity_state::EntityState;
use crate::princess::fire_control::weapon_fire_info::{FireTarget, WeaponFireInfo};
use crate::units::Unit;

/// Torso position a plan is fired from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TorsoTwist {
    #[default]
    None,
    Left,
    Right,
}

impl TorsoTwist {
    /// Order the twists are tried in; earlier wins ties
    pub const ALL: [TorsoTwist; 3] = [TorsoTwist::None, TorsoTwist::Left, TorsoTwist::Right];
}

/// What the shooter's heat situation does to plan utility
#[derive(Debug, Clone, Copy)]
pub struct UtilityContext<'a> {
    pub config: &'a DecisionConfig,
    pub current_heat: u32,
    pub heat_capacity: u32,
    pub tracks_heat: bool,
}

impl<'a> UtilityContext<'a> {
    pub fn for_shooter(config: &'a DecisionConfig, shooter: &Unit, state: &EntityState) -> Self {
        Self {
            config,
            current_heat: state.heat,
            heat_capacity: shooter.heat_capacity,
            tracks_heat: shooter.tracks_heat(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiringPlan {
    pub target: FireTarget,
    pub shots: Vec<WeaponFireInfo>,
    pub twist: TorsoTwist,
    pub utility: f64,
}

impl FiringPlan {
    pub fn empty(target: FireTarget) -> Self {
        Self {
            target,
            shots: Vec::new(),
            twist: TorsoTwist::None,
            utility: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn heat(&self) -> u32 {
        self.shots.iter().map(|s| s.heat).sum()
    }

    pub fn expected_damage(&self) -> f64 {
        self.shots.iter().map(|s| s.expected_damage).sum()
    }

    pub fn expected_criticals(&self) -> f64 {
        self.shots.iter().map(|s| s.expected_criticals).sum()
    }

    /// Chance that at least one shot kills
    pub fn kill_probability(&self) -> f64 {
        1.0 - self
            .shots
            .iter()
            .map(|s| 1.0 - s.kill_probability)
            .product::<f64>()
    }

    pub fn heat_inflicted(&self) -> f64 {
        self.shots.iter().map(|s| s.heat_inflicted).sum()
    }

    pub fn contains(&self, weapon: WeaponId) -> bool {
        self.shots.iter().any(|s| s.weapon == weapon)
    }

    pub fn weapons(&self) -> Vec<WeaponId> {
        self.shots.iter().map(|s| s.weapon).collect()
    }

    /// Copy of this plan with one more shot
    pub fn with_shot(&self, shot: &WeaponFireInfo) -> Self {
        let mut plan = self.clone();
        plan.shots.push(shot.clone());
        plan
    }

    pub fn compute_utility(&mut self, ctx: &UtilityContext) {
        let config = ctx.config;
        let mut utility = config.damage_utility * self.expected_damage()
            + config.critical_utility * self.expected_criticals()
            + config.kill_utility * self.kill_probability()
            + config.heat_inflicted_value * self.heat_inflicted();
        if ctx.tracks_heat {
            let overheat = (self.heat() + ctx.current_heat).saturating_sub(ctx.heat_capacity);
            utility -= config.overheat_disutility * overheat as f64;
        }
        self.utility = utility;
    }
}

/// Build the heat table over every shot with a nonzero hit chance
///
/// The table has one entry per heat level from zero to the total heat of
/// all usable shots, so every budget the shooter can spend has an entry.
pub fn calculate_heat_table(target: FireTarget, shots: &[WeaponFireInfo], ctx: &UtilityContext) -> Vec<FiringPlan> {
    let usable: Vec<&WeaponFireInfo> = shots.iter().filter(|s| s.probability > 0.0).collect();

    let mut base = FiringPlan::empty(target);
    for shot in usable.iter().filter(|s| s.heat == 0) {
        if !base.contains(shot.weapon) {
            base.shots.push((*shot).clone());
        }
    }
    base.compute_utility(ctx);

    let hot: Vec<&WeaponFireInfo> = usable.into_iter().filter(|s| s.heat > 0).collect();
    let max_heat: u32 = hot.iter().map(|s| s.heat).sum();

    let mut table = Vec::with_capacity(max_heat as usize + 1);
    table.push(base);

    for level in 1..=max_heat as usize {
        let mut best = table[level - 1].clone();
        for shot in &hot {
            let heat = shot.heat as usize;
            if heat > level {
                continue;
            }
            let below = &table[level - heat];
            if below.contains(shot.weapon) {
                continue;
            }
            let mut candidate = below.with_shot(shot);
            candidate.compute_utility(ctx);
            if candidate.utility > best.utility {
                best = candidate;
            }
        }
        table.push(best);
    }

    table
}

/// Highest-utility entry of a heat table; the cooler plan wins ties
pub fn best_of_table(table: &[FiringPlan]) -> Option<&FiringPlan> {
    table
        .iter()
        .fold(None, |best: Option<&FiringPlan>, plan| match best {
            Some(kept) if kept.utility >= plan.utility => Some(kept),
            _ => Some(plan),
        })
}
