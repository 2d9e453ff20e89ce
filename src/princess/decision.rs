//! The bot's turn driver
//!
//! `Princess` ties the pieces together for one controlled unit at a time:
//! make sure enemy reachable sets are current, enumerate the unit's own
//! paths, rank them and pick the best; or, in the firing phase, pick the
//! best plan over every target and render it as attack declarations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::DecisionConfig;
use crate::core::error::{PrincessError, Result};
use crate::core::types::{UnitId, WeaponId};
use crate::game::GameSnapshot;
use crate::princess::behavior::BehaviorSettings;
use crate::princess::entity_state::EntityState;
use crate::princess::fire_control::{
    FireControl, FireTarget, FiringPlan, PhysicalAttackType, PhysicalInfo, TargetRef, TorsoTwist,
};
use crate::princess::movement::{MovePath, PathEnumerator, ReachableTable};
use crate::princess::path_ranker::{best_ranked, BasicPathRanker, RankBreakdown, TurnBaseline};
use crate::princess::precognition::Precognition;
use crate::units::Unit;

/// Chosen move for one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDecision {
    pub unit: UnitId,
    pub path: MovePath,
    pub rank: f64,
    pub breakdown: RankBreakdown,
    /// Paths considered
    pub candidates: usize,
    pub truncated: bool,
}

/// One declared action for the firing or physical phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttackDeclaration {
    TorsoTwist { unit: UnitId, twist: TorsoTwist },
    WeaponFire { unit: UnitId, weapon: WeaponId, target: FireTarget },
    Physical { unit: UnitId, attack: PhysicalAttackType, target: UnitId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiringDecision {
    pub unit: UnitId,
    pub plan: Option<FiringPlan>,
    pub physical: Option<PhysicalInfo>,
    pub declarations: Vec<AttackDeclaration>,
}

pub struct Princess {
    behavior: BehaviorSettings,
    config: DecisionConfig,
    precognition: Option<Precognition>,
}

impl Princess {
    /// A bot that enumerates enemy movement on demand
    pub fn new(behavior: BehaviorSettings, config: DecisionConfig) -> Result<Self> {
        behavior.validate().map_err(PrincessError::InvalidConfig)?;
        config.validate().map_err(PrincessError::InvalidConfig)?;
        Ok(Self {
            behavior,
            config,
            precognition: None,
        })
    }

    /// A bot that keeps enemy reachable sets current in the background
    pub fn with_precognition(
        behavior: BehaviorSettings,
        config: DecisionConfig,
        game: Arc<GameSnapshot>,
    ) -> Result<Self> {
        let mut princess = Self::new(behavior, config)?;
        princess.precognition = Some(Precognition::spawn(game, princess.config.clone())?);
        Ok(princess)
    }

    pub fn behavior(&self) -> &BehaviorSettings {
        &self.behavior
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn precognition(&self) -> Option<&Precognition> {
        self.precognition.as_ref()
    }

    fn active_unit<'g>(&self, game: &'g GameSnapshot, id: UnitId) -> Result<&'g Unit> {
        let unit = game.require_unit(id)?;
        if !unit.is_active() {
            return Err(PrincessError::UnitNotDeployed(id));
        }
        Ok(unit)
    }

    /// Reachable sets for every enemy of `unit`, current as of this call.
    ///
    /// The worker is handed `game` first so that moves it never heard about
    /// still reach it; any published set that no longer matches the enemy's
    /// position or facing is recomputed here.
    fn reachable_sets(&self, game: &GameSnapshot, unit: &Unit) -> Result<ReachableTable> {
        let published = match &self.precognition {
            Some(precognition) => {
                precognition.update_snapshot(Arc::new(game.clone()))?;
                precognition.wait_until_current()?;
                precognition.snapshot()
            }
            None => ReachableTable::default(),
        };

        let enumerator = PathEnumerator::new(game, &self.config);
        Ok(game
            .enemies_of(unit)
            .filter(|enemy| enemy.is_active() && !enemy.done)
            .map(|enemy| {
                let set = match published.get(&enemy.id) {
                    Some(set) if !set.is_stale_for(enemy) => Arc::clone(set),
                    Some(_) => {
                        debug!(enemy = %enemy.id, "published reachable set is stale, recomputing");
                        Arc::new(enumerator.recalculate_reachable_set(enemy))
                    }
                    None => Arc::new(enumerator.recalculate_reachable_set(enemy)),
                };
                (enemy.id, set)
            })
            .collect())
    }

    /// Pick the best path for one unit this movement phase
    pub fn calculate_move_turn(&self, game: &GameSnapshot, id: UnitId) -> Result<MoveDecision> {
        let unit = self.active_unit(game, id)?;
        let reachable = self.reachable_sets(game, unit)?;

        let enumeration = PathEnumerator::new(game, &self.config).enumerate(unit);
        let baseline = TurnBaseline::compute(game, &self.config, unit);
        let ranker = BasicPathRanker::new(game, &self.config, &self.behavior, &reachable, &baseline);
        let ranked = ranker.rank_paths(&enumeration.paths, unit);

        let best = best_ranked(&ranked).ok_or(PrincessError::UnitNotDeployed(id))?;
        info!(
            unit = %id,
            to = ?best.path.position,
            facing = ?best.path.facing,
            rank = best.rank,
            candidates = ranked.len(),
            "move decided"
        );
        Ok(MoveDecision {
            unit: id,
            path: best.path.clone(),
            rank: best.rank,
            breakdown: best.breakdown.clone(),
            candidates: ranked.len(),
            truncated: enumeration.truncated,
        })
    }

    /// Pick the weapons to fire and the physical attack to make
    pub fn calculate_firing_turn(&self, game: &GameSnapshot, id: UnitId) -> Result<FiringDecision> {
        let unit = self.active_unit(game, id)?;
        let fc = FireControl::new(game, &self.config);
        let state = EntityState::from_unit(unit);

        let mut best: Option<FiringPlan> = None;
        let mut consider = |plan: FiringPlan| {
            if plan.is_empty() || plan.utility <= 0.0 {
                return;
            }
            if best.as_ref().map_or(true, |kept| plan.utility > kept.utility) {
                best = Some(plan);
            }
        };
        for enemy in game.enemies_of(unit).filter(|e| e.is_active()) {
            consider(fc.best_firing_plan(unit, &state, TargetRef::Unit(enemy), &EntityState::from_unit(enemy)));
        }
        for target in &game.strategic_targets {
            consider(fc.best_plan_vs_hex(unit, &state, target.coord));
        }

        let fires_arm = best.as_ref().is_some_and(|plan| {
            plan.shots.iter().any(|shot| {
                unit.weapons
                    .iter()
                    .any(|w| w.id == shot.weapon && w.location.is_arm())
            })
        });
        let physical = self.best_physical(&fc, unit, &state, game, fires_arm);

        let mut declarations = Vec::new();
        if let Some(plan) = &best {
            if plan.twist != TorsoTwist::None {
                declarations.push(AttackDeclaration::TorsoTwist {
                    unit: id,
                    twist: plan.twist,
                });
            }
            declarations.extend(plan.shots.iter().map(|shot| AttackDeclaration::WeaponFire {
                unit: id,
                weapon: shot.weapon,
                target: shot.target,
            }));
        }
        if let Some(info) = &physical {
            declarations.push(AttackDeclaration::Physical {
                unit: id,
                attack: info.attack,
                target: info.target,
            });
        }

        info!(
            unit = %id,
            target = ?best.as_ref().map(|p| p.target),
            shots = best.as_ref().map_or(0, |p| p.shots.len()),
            physical = ?physical.as_ref().map(|p| p.attack),
            "firing decided"
        );
        Ok(FiringDecision {
            unit: id,
            plan: best,
            physical,
            declarations,
        })
    }

    /// Best punch or kick against any adjacent enemy; arms that fired
    /// cannot punch
    fn best_physical(
        &self,
        fc: &FireControl,
        unit: &Unit,
        state: &EntityState,
        game: &GameSnapshot,
        fired_arms: bool,
    ) -> Option<PhysicalInfo> {
        let mut best: Option<PhysicalInfo> = None;
        for enemy in game.enemies_of(unit).filter(|e| e.is_active()) {
            let enemy_state = EntityState::from_unit(enemy);
            let candidate = if fired_arms {
                Some(fc.physical_info(unit, state, enemy, &enemy_state, PhysicalAttackType::Kick))
                    .filter(|info| info.probability > 0.0)
            } else {
                fc.best_physical(unit, state, enemy, &enemy_state)
            };
            let Some(candidate) = candidate else {
                continue;
            };
            if best.as_ref().map_or(true, |kept| candidate.utility > kept.utility) {
                best = Some(candidate);
            }
        }
        best
    }
}
