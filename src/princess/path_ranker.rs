//! Scores candidate paths for one unit
//!
//! Higher is better. The score weighs damage the unit can deal from the
//! end of the path against damage it can expect to take there, discounts
//! both by the chance of completing the path, and then adds positional
//! terms: closing with the enemy, staying with friends, facing the threat
//! and, for units that want out, heading for the home edge.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::{self, HexCoord};
use crate::core::config::DecisionConfig;
use crate::core::types::UnitId;
use crate::game::GameSnapshot;
use crate::princess::behavior::BehaviorSettings;
use crate::princess::constants::*;
use crate::princess::entity_state::EntityState;
use crate::princess::fire_control::{physical_damage, FireControl, PhysicalAttackType, TargetRef};
use crate::princess::movement::{rules_for, ConvexRegion, MovePath, ReachableSet, ReachableTable};
use crate::units::{Unit, UnitKind};

/// Fixed scores that replace the normal calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankOverride {
    AeroStall,
    AeroCrash,
    AeroFlyOff,
    BuildingCollapse,
}

/// The terms that went into one path's score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankBreakdown {
    pub override_reason: Option<RankOverride>,
    pub success_probability: f64,
    pub expected_fall_damage: f64,
    /// Best ranged damage against any one target
    pub damage_done: f64,
    pub physical_damage: f64,
    pub damage_taken: f64,
    pub aggression: f64,
    pub herd: f64,
    pub facing: f64,
    pub withdrawal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPath {
    pub path: MovePath,
    pub rank: f64,
    pub breakdown: RankBreakdown,
}

/// Damage each enemy could do to some friend of the moving unit, with the
/// moving unit left out
///
/// Computed once per decision. An enemy that would shoot someone anyway
/// only adds risk to a path when it can do more to the mover than that.
#[derive(Debug, Clone, Default)]
pub struct TurnBaseline {
    best_damage_by_enemies: BTreeMap<UnitId, f64>,
}

impl TurnBaseline {
    pub fn compute(game: &GameSnapshot, config: &DecisionConfig, mover: &Unit) -> Self {
        let fc = FireControl::new(game, config);
        let mut best_damage_by_enemies = BTreeMap::new();
        for enemy in game.enemies_of(mover).filter(|e| e.is_active()) {
            let best = game
                .friends_of(mover)
                .filter(|f| f.is_active())
                .map(|friend| fc.exact_best_firing_plan(enemy, friend).expected_damage())
                .fold(0.0, f64::max);
            best_damage_by_enemies.insert(enemy.id, best);
        }
        Self { best_damage_by_enemies }
    }

    pub fn best_damage_by(&self, enemy: UnitId) -> f64 {
        self.best_damage_by_enemies.get(&enemy).copied().unwrap_or(0.0)
    }
}

pub struct BasicPathRanker<'a> {
    game: &'a GameSnapshot,
    config: &'a DecisionConfig,
    behavior: &'a BehaviorSettings,
    reachable: &'a ReachableTable,
    baseline: &'a TurnBaseline,
}

impl<'a> BasicPathRanker<'a> {
    pub fn new(
        game: &'a GameSnapshot,
        config: &'a DecisionConfig,
        behavior: &'a BehaviorSettings,
        reachable: &'a ReachableTable,
        baseline: &'a TurnBaseline,
    ) -> Self {
        Self {
            game,
            config,
            behavior,
            reachable,
            baseline,
        }
    }

    /// Score every path; large candidate sets are ranked on the rayon pool
    pub fn rank_paths(&self, paths: &[MovePath], unit: &Unit) -> Vec<RankedPath> {
        if paths.len() >= self.config.parallel_threshold {
            // PARALLEL: paths are scored independently against the same snapshot
            paths.par_iter().map(|path| self.rank_path(path, unit)).collect()
        } else {
            paths.iter().map(|path| self.rank_path(path, unit)).collect()
        }
    }

    pub fn rank_path(&self, path: &MovePath, unit: &Unit) -> RankedPath {
        let mut breakdown = RankBreakdown::default();
        let rank = self.score(path, unit, &mut breakdown);
        tracing::debug!(
            unit = %unit.id,
            to = ?path.position,
            facing = ?path.facing,
            rank,
            ?breakdown,
            "ranked path"
        );
        RankedPath {
            path: path.clone(),
            rank,
            breakdown,
        }
    }

    fn score(&self, path: &MovePath, unit: &Unit, breakdown: &mut RankBreakdown) -> f64 {
        if let Some((reason, value)) = self.override_for(path, unit) {
            breakdown.override_reason = Some(reason);
            return value;
        }

        let success = path.success_probability();
        let fall = (1.0 - success) * (rules_for(unit.kind).fall_damage(unit) + self.behavior.weights.fall_shame);
        breakdown.success_probability = success;
        breakdown.expected_fall_damage = fall;

        let state = EntityState::from_path(path, unit);
        self.assess_damage(unit, &state, breakdown);

        let weights = &self.behavior.weights;
        let mut utility = success
            * ((breakdown.damage_done + breakdown.physical_damage) * weights.foolish_bravery - breakdown.damage_taken)
            - fall;

        if !unit.kind.is_aero() {
            let distance = self.distance_to_objective(unit, path.position);
            breakdown.aggression = -(distance * weights.hyper_aggression);
            breakdown.herd = -(self.distance_to_friends(unit, path.position) * weights.herd_mentality);
            breakdown.facing = self.facing_penalty(unit, path);
        }
        breakdown.withdrawal = self.withdrawal_term(unit, path);

        utility += breakdown.aggression + breakdown.herd + breakdown.facing + breakdown.withdrawal;
        utility
    }

    /// Fixed scores for paths the rules make disastrous or pointless
    fn override_for(&self, path: &MovePath, unit: &Unit) -> Option<(RankOverride, f64)> {
        if unit.kind == UnitKind::Aero {
            if path.velocity == 0 {
                return Some((RankOverride::AeroStall, AERO_STALL_UTILITY));
            }
            if path.altitude < AERO_MIN_SAFE_ALTITUDE {
                return Some((RankOverride::AeroCrash, AERO_CRASH_UTILITY));
            }
            if path.off_board {
                return Some((RankOverride::AeroFlyOff, AERO_FLY_OFF_UTILITY));
            }
            return None;
        }

        let building = self.game.board.building(path.position)?;
        if building.supports(unit.weight) {
            return None;
        }
        let value = if path.jumping {
            BUILDING_COLLAPSE_JUMP_UTILITY
        } else {
            BUILDING_COLLAPSE_UTILITY
        };
        Some((RankOverride::BuildingCollapse, value))
    }

    fn assess_damage(&self, unit: &Unit, state: &EntityState, breakdown: &mut RankBreakdown) {
        let fc = FireControl::new(self.game, self.config);
        let Some(position) = state.position else {
            return;
        };

        let mut damage_done: f64 = 0.0;
        let mut physical: f64 = 0.0;
        let mut taken = 0.0;

        for enemy in self.game.enemies_of(unit).filter(|e| e.is_active()) {
            let (mine, theirs, kick) = if enemy.done || enemy.immobile {
                self.moved_enemy_exchange(&fc, unit, state, enemy)
            } else {
                self.unmoved_enemy_exchange(&fc, unit, state, position, enemy)
            };
            damage_done = damage_done.max(mine);
            physical = physical.max(kick);
            if theirs > self.baseline.best_damage_by(enemy.id) {
                taken += theirs;
            }
        }

        for target in &self.game.strategic_targets {
            let plan = fc.best_plan_vs_hex(unit, state, target.coord);
            damage_done = damage_done.max(plan.expected_damage());
        }

        breakdown.damage_done = damage_done;
        breakdown.physical_damage = physical;
        breakdown.damage_taken = taken;
    }

    /// Exchange with an enemy whose position for this turn is settled:
    /// (my ranged damage, its damage to me, my likely kick)
    fn moved_enemy_exchange(
        &self,
        fc: &FireControl,
        unit: &Unit,
        state: &EntityState,
        enemy: &Unit,
    ) -> (f64, f64, f64) {
        let enemy_state = EntityState::from_unit(enemy);
        let mine = fc
            .best_firing_plan(unit, state, TargetRef::Unit(enemy), &enemy_state)
            .expected_damage();
        let mut theirs = fc
            .best_firing_plan(enemy, &enemy_state, TargetRef::Unit(unit), state)
            .expected_damage();

        let my_kick = fc.physical_info(unit, state, enemy, &enemy_state, PhysicalAttackType::Kick);
        let kick = if my_kick.probability > KICK_CONSIDER_THRESHOLD {
            my_kick.expected_damage
        } else {
            0.0
        };
        let their_kick = fc.physical_info(enemy, &enemy_state, unit, state, PhysicalAttackType::Kick);
        if their_kick.probability > KICK_CONSIDER_THRESHOLD {
            theirs += their_kick.expected_damage;
        }
        (mine, theirs, kick)
    }

    /// Exchange with an enemy that can still move, estimated from the
    /// closest it can get
    fn unmoved_enemy_exchange(
        &self,
        fc: &FireControl,
        unit: &Unit,
        state: &EntityState,
        position: HexCoord,
        enemy: &Unit,
    ) -> (f64, f64, f64) {
        let reachable = self.reachable.get(&enemy.id);
        let fallback = enemy
            .position
            .map(|origin| ConvexRegion::around(origin, enemy.max_mp()));
        let region = reachable.and_then(|set| set.region().copied()).or(fallback);
        let Some(region) = region else {
            return (0.0, 0.0, 0.0);
        };
        let range = region.distance_to(position);

        let discount = self.config.unmoved_enemy_discount;
        let mine = discount * fc.max_damage_at_range(unit, range, Some(enemy.kind));
        let mut theirs = discount * fc.max_damage_at_range(enemy, range, Some(unit.kind));

        // It could swing round to a side or rear arc and shoot from there
        let flank = self.closest_flank_hex(reachable.map(|set| set.as_ref()), &region, enemy, state, position);
        if let Some(distance) = flank {
            theirs += discount * FLANK_EXPOSURE_FACTOR * fc.max_damage_at_range(enemy, distance, Some(unit.kind));
        }

        // It could walk up to a side or rear hex and kick
        if enemy.kind == UnitKind::Mech && self.game.options.physical_attacks_allowed(enemy.team) {
            let exposed: Vec<HexCoord> = position
                .neighbors()
                .into_iter()
                .filter(|hex| state.facing.arc_to(position, *hex) != board::Arc::Front)
                .collect();
            let can_flank = match reachable {
                Some(set) => set.contains_any(&exposed),
                None => exposed.iter().any(|hex| region.contains(*hex)),
            };
            if can_flank {
                theirs += discount * physical_damage(enemy, PhysicalAttackType::Kick);
            }
        }
        (mine, theirs, 0.0)
    }

    /// Distance to the nearest hex outside the front arc of `state` that
    /// the enemy can end in and still shoot from
    fn closest_flank_hex(
        &self,
        reachable: Option<&ReachableSet>,
        region: &ConvexRegion,
        enemy: &Unit,
        state: &EntityState,
        position: HexCoord,
    ) -> Option<u32> {
        let reach = enemy.operable_weapons().map(|w| w.long_range).max()?;
        let candidates: Vec<HexCoord> = match reachable {
            Some(set) => set.coords().copied().collect(),
            None => enemy
                .position?
                .hexes_in_range(enemy.max_mp())
                .into_iter()
                .filter(|hex| region.contains(*hex))
                .collect(),
        };
        candidates
            .into_iter()
            .filter(|hex| *hex != position && state.facing.arc_to(position, *hex) != board::Arc::Front)
            .map(|hex| position.distance(&hex))
            .filter(|distance| *distance <= reach)
            .min()
    }

    /// Hexes to the nearest enemy, else the nearest objective, else the
    /// board center
    fn distance_to_objective(&self, unit: &Unit, position: HexCoord) -> f64 {
        let nearest_enemy = self
            .game
            .enemies_of(unit)
            .filter_map(|e| if e.is_active() { e.position } else { None })
            .map(|p| position.distance(&p))
            .min();
        let distance = nearest_enemy
            .or_else(|| {
                self.game
                    .strategic_targets
                    .iter()
                    .map(|t| position.distance(&t.coord))
                    .min()
            })
            .unwrap_or_else(|| position.distance(&self.game.board.center()));
        distance as f64
    }

    /// Hex distance to the average position of the unit's friends
    fn distance_to_friends(&self, unit: &Unit, position: HexCoord) -> f64 {
        let friends: Vec<HexCoord> = self
            .game
            .friends_of(unit)
            .filter_map(|f| if f.is_active() { f.position } else { None })
            .collect();
        if friends.is_empty() {
            return 0.0;
        }
        let n = friends.len() as f64;
        let q = friends.iter().map(|f| f.q as f64).sum::<f64>() / n;
        let r = friends.iter().map(|f| f.r as f64).sum::<f64>() / n;
        let dq = q - position.q as f64;
        let dr = r - position.r as f64;
        let ds = -dq - dr;
        dq.abs().max(dr.abs()).max(ds.abs())
    }

    /// Penalty for ending turned away from the nearest enemy
    fn facing_penalty(&self, unit: &Unit, path: &MovePath) -> f64 {
        if unit.kind == UnitKind::Infantry {
            return 0.0;
        }
        let nearest = self
            .game
            .enemies_of(unit)
            .filter_map(|e| if e.is_active() { e.position } else { None })
            .min_by_key(|p| (path.position.distance(p), *p));
        let Some(enemy) = nearest else {
            return 0.0;
        };
        if enemy == path.position {
            return 0.0;
        }
        let ideal = board::Facing::closest_to_bearing(path.position.bearing_to(&enemy));
        let turns = path.facing.turns_to(ideal);
        -(turns.saturating_sub(1) as f64 * FACING_PENALTY_PER_HEXSIDE)
    }

    /// Bonus for closing on the home edge, or a large penalty for not doing
    /// so, when the unit wants to withdraw
    fn withdrawal_term(&self, unit: &Unit, path: &MovePath) -> f64 {
        if !self.behavior.wants_withdrawal(unit.is_crippled()) {
            return 0.0;
        }
        let edge = self.behavior.withdrawal.home_edge;
        let before = self.game.board.distance_to_edge(path.start, edge);
        let after = self.game.board.distance_to_edge(path.position, edge);
        let self_preservation = self.behavior.weights.self_preservation;
        if after < before {
            self_preservation * (before - after) as f64
        } else {
            -(self_preservation * WITHDRAWAL_PENALTY_FACTOR)
        }
    }
}

/// Highest-ranked path; the earliest one wins ties
pub fn best_ranked(ranked: &[RankedPath]) -> Option<&RankedPath> {
    ranked
        .iter()
        .enumerate()
        .max_by_key(|(index, r)| (OrderedFloat(r.rank), std::cmp::Reverse(*index)))
        .map(|(_, r)| r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Facing, HomeEdge};
    use crate::game::StrategicTarget;
    use crate::princess::movement::{PilotingRoll, RollReason, StepKind};
    use crate::units::{Location, Weapon};

    fn behavior() -> BehaviorSettings {
        let mut behavior = BehaviorSettings::default();
        behavior.withdrawal.forced_withdrawal = false;
        behavior
    }

    fn rank(game: &GameSnapshot, behavior: &BehaviorSettings, path: &MovePath) -> RankedPath {
        let config = DecisionConfig::default();
        let table = ReachableTable::new();
        let unit = game.unit(path.unit).unwrap();
        let baseline = TurnBaseline::compute(game, &config, unit);
        BasicPathRanker::new(game, &config, behavior, &table, &baseline).rank_path(path, unit)
    }

    #[test]
    fn test_no_threats_pulls_toward_objective() {
        let mut game = GameSnapshot::new(Board::new(20, 20))
            .with_unit(Unit::mech(1, "Scout", 0, 50.0, 5, 0).at(HexCoord::new(2, 10), Facing::East));
        game.strategic_targets.push(StrategicTarget::new("Depot", HexCoord::new(8, 10)));
        let mut behavior = behavior();
        behavior.weights.hyper_aggression = 10.0;
        let unit = game.unit(UnitId(1)).unwrap();
        let path = MovePath::stand_still(unit, HexCoord::new(2, 10));
        let ranked = rank(&game, &behavior, &path);
        assert_eq!(ranked.breakdown.expected_fall_damage, 0.0);
        assert_eq!(ranked.rank, -60.0);
    }

    #[test]
    fn test_aero_special_cases() {
        let game = GameSnapshot::new(Board::new(20, 20))
            .with_unit(Unit::aero(1, "Sparrowhawk", 0, 30.0, 6, 3, 5).at(HexCoord::new(10, 10), Facing::East));
        let unit = game.unit(UnitId(1)).unwrap();
        let mut path = MovePath::stand_still(unit, HexCoord::new(10, 10));

        path.velocity = 0;
        assert_eq!(rank(&game, &behavior(), &path).rank, AERO_STALL_UTILITY);

        path.velocity = 3;
        path.altitude = 0;
        let crash = rank(&game, &behavior(), &path);
        assert_eq!(crash.rank, AERO_CRASH_UTILITY);
        assert_eq!(crash.breakdown.override_reason, Some(RankOverride::AeroCrash));

        path.altitude = 5;
        path.off_board = true;
        assert_eq!(rank(&game, &behavior(), &path).rank, AERO_FLY_OFF_UTILITY);
    }

    #[test]
    fn test_building_collapse_is_fixed() {
        let mut game = GameSnapshot::new(Board::new(20, 20)).with_unit(
            Unit::mech(1, "Atlas", 0, 100.0, 3, 3)
                .with_weapon(Weapon::medium_laser(0, Location::CenterTorso))
                .at(HexCoord::new(5, 5), Facing::East),
        );
        game.add_unit(Unit::mech(2, "Target", 1, 50.0, 4, 0).at(HexCoord::new(8, 5), Facing::West));
        game.board.set_building(HexCoord::new(6, 5), 40);
        let unit = game.unit(UnitId(1)).unwrap();
        let mut path = MovePath::stand_still(unit, HexCoord::new(5, 5)).extended(
            StepKind::Forward,
            HexCoord::new(6, 5),
            Facing::East,
            1,
        );
        path.jumping = true;
        assert_eq!(rank(&game, &behavior(), &path).rank, BUILDING_COLLAPSE_JUMP_UTILITY);
        path.jumping = false;
        assert_eq!(rank(&game, &behavior(), &path).rank, BUILDING_COLLAPSE_UTILITY);
    }

    #[test]
    fn test_fall_risk_is_subtracted() {
        let game = GameSnapshot::new(Board::new(20, 20))
            .with_unit(Unit::mech(1, "Atlas", 0, 100.0, 3, 0).at(HexCoord::new(10, 10), Facing::East));
        let unit = game.unit(UnitId(1)).unwrap();
        let steady = MovePath::stand_still(unit, HexCoord::new(10, 10));
        let mut risky = steady.clone();
        risky.rolls.push(PilotingRoll::piloting(unit, RollReason::EnteringRubble, 0));

        let a = rank(&game, &behavior(), &steady);
        let b = rank(&game, &behavior(), &risky);
        let failure = 1.0 - risky.success_probability();
        assert!((b.breakdown.expected_fall_damage - failure * (10.0 + 10.0)).abs() < 1e-9);
        assert!((a.rank - b.rank - b.breakdown.expected_fall_damage).abs() < 1e-9);
    }

    #[test]
    fn test_forced_withdrawal_dominates() {
        let mut crippled = Unit::mech(1, "Wounded", 0, 50.0, 5, 0)
            .with_weapon(Weapon::ppc(0, Location::RightArm))
            .at(HexCoord::new(5, 3), Facing::SouthEast);
        crippled.set_location(Location::CenterTorso, 0, 2);
        assert!(crippled.is_crippled());
        let mut target = Unit::mech(2, "Target", 1, 50.0, 4, 0).at(HexCoord::new(5, 7), Facing::NorthWest);
        target.done = true;
        let game = GameSnapshot::new(Board::new(20, 20)).with_unit(crippled).with_unit(target);

        let mut behavior = BehaviorSettings::default();
        behavior.withdrawal.home_edge = HomeEdge::North;
        let unit = game.unit(UnitId(1)).unwrap();
        // North edge distance 3 -> 5
        let away = MovePath::stand_still(unit, HexCoord::new(5, 3))
            .extended(StepKind::Forward, HexCoord::new(5, 4), Facing::SouthEast, 1)
            .extended(StepKind::Forward, HexCoord::new(5, 5), Facing::SouthEast, 1);
        let ranked = rank(&game, &behavior, &away);
        let penalty = behavior.weights.self_preservation * WITHDRAWAL_PENALTY_FACTOR;
        assert_eq!(ranked.breakdown.withdrawal, -penalty);
        assert!(ranked.breakdown.damage_done > 0.0);
        assert!(ranked.rank < 0.0);
    }

    #[test]
    fn test_baseline_absorbs_existing_threat() {
        let mover = Unit::mech(1, "Mover", 0, 50.0, 4, 0).at(HexCoord::new(2, 5), Facing::East);
        let friend = Unit::mech(2, "Friend", 0, 50.0, 4, 0).at(HexCoord::new(4, 6), Facing::East);
        let mut enemy = Unit::mech(3, "Enemy", 1, 50.0, 4, 0)
            .with_weapon(Weapon::medium_laser(0, Location::CenterTorso))
            .at(HexCoord::new(6, 5), Facing::West);
        enemy.done = true;
        let game = GameSnapshot::new(Board::new(20, 20))
            .with_unit(mover)
            .with_unit(friend)
            .with_unit(enemy);
        let config = DecisionConfig::default();
        let unit = game.unit(UnitId(1)).unwrap();
        let baseline = TurnBaseline::compute(&game, &config, unit);
        assert!(baseline.best_damage_by(UnitId(3)) > 0.0);

        // Standing further away than the friend: no more threat than before
        let path = MovePath::stand_still(unit, HexCoord::new(2, 5));
        let ranked = rank(&game, &behavior(), &path);
        assert_eq!(ranked.breakdown.damage_taken, 0.0);
    }

    #[test]
    fn test_unmoved_enemy_uses_fallback_region() {
        let mover = Unit::mech(1, "Mover", 0, 50.0, 4, 0)
            .with_weapon(Weapon::medium_laser(0, Location::CenterTorso))
            .at(HexCoord::new(2, 5), Facing::East);
        let enemy = Unit::mech(2, "Enemy", 1, 50.0, 4, 0)
            .with_weapon(Weapon::medium_laser(0, Location::CenterTorso))
            .at(HexCoord::new(14, 5), Facing::West);
        let game = GameSnapshot::new(Board::new(20, 20)).with_unit(mover).with_unit(enemy);
        let unit = game.unit(UnitId(1)).unwrap();
        // Enemy runs 6: region reaches q = 8, six hexes away
        let path = MovePath::stand_still(unit, HexCoord::new(2, 5));
        let ranked = rank(&game, &behavior(), &path);
        assert!((ranked.breakdown.damage_done - 0.5 * 5.0).abs() < 1e-9);
        assert!((ranked.breakdown.damage_taken - 0.5 * 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_enemy_behind_threatens_flank() {
        let mover = Unit::mech(1, "Mover", 0, 50.0, 4, 0).at(HexCoord::new(10, 10), Facing::East);
        let tank = |at: HexCoord, facing: Facing| {
            Unit::tank(2, "Hunter", 1, 50.0, 4)
                .with_weapon(Weapon::medium_laser(0, Location::Turret))
                .at(at, facing)
        };
        let behind = GameSnapshot::new(Board::new(24, 20))
            .with_unit(mover.clone())
            .with_unit(tank(HexCoord::new(3, 10), Facing::East));
        let ahead = GameSnapshot::new(Board::new(24, 20))
            .with_unit(mover.clone())
            .with_unit(tank(HexCoord::new(17, 10), Facing::West));

        let path = MovePath::stand_still(&mover, HexCoord::new(10, 10));
        let rear = rank(&behind, &behavior(), &path).breakdown.damage_taken;
        let front = rank(&ahead, &behavior(), &path).breakdown.damage_taken;

        // Either tank can close to one hex; only the one behind reaches the rear arc
        let config = DecisionConfig::default();
        let point_blank = FireControl::new(&ahead, &config).max_damage_at_range(
            ahead.unit(UnitId(2)).unwrap(),
            1,
            Some(UnitKind::Mech),
        );
        assert!(point_blank > 0.0);
        assert!((front - 0.5 * point_blank).abs() < 1e-9);
        assert!((rear - front - 0.5 * FLANK_EXPOSURE_FACTOR * point_blank).abs() < 1e-9);
    }

    #[test]
    fn test_flank_uses_published_reachable_set() {
        let mover = Unit::mech(1, "Mover", 0, 50.0, 4, 0).at(HexCoord::new(10, 10), Facing::East);
        let enemy = Unit::tank(2, "Hunter", 1, 50.0, 4)
            .with_weapon(Weapon::medium_laser(0, Location::Turret))
            .at(HexCoord::new(3, 10), Facing::East);
        let game = GameSnapshot::new(Board::new(24, 20)).with_unit(mover.clone()).with_unit(enemy.clone());
        let config = DecisionConfig::default();
        let baseline = TurnBaseline::compute(&game, &config, &mover);
        let path = MovePath::stand_still(&mover, HexCoord::new(10, 10));

        // Pinned in place: its only hex is behind the mover, seven hexes back
        let pinned = MovePath::stand_still(&enemy, HexCoord::new(3, 10));
        let mut table = ReachableTable::new();
        table.insert(UnitId(2), std::sync::Arc::new(ReachableSet::from_paths(&enemy, &[pinned], false)));
        let behavior = behavior();
        let ranker = BasicPathRanker::new(&game, &config, &behavior, &table, &baseline);
        let ranked = ranker.rank_path(&path, &mover);

        let fc = FireControl::new(&game, &config);
        let at_seven = fc.max_damage_at_range(&enemy, 7, Some(UnitKind::Mech));
        let expected = 0.5 * at_seven * (1.0 + FLANK_EXPOSURE_FACTOR);
        assert!((ranked.breakdown.damage_taken - expected).abs() < 1e-9);
    }

    #[test]
    fn test_facing_away_is_penalized() {
        let mover = Unit::mech(1, "Mover", 0, 50.0, 4, 0).at(HexCoord::new(2, 5), Facing::West);
        let enemy = Unit::mech(2, "Enemy", 1, 50.0, 4, 0).at(HexCoord::new(14, 5), Facing::West);
        let game = GameSnapshot::new(Board::new(20, 20)).with_unit(mover).with_unit(enemy);
        let unit = game.unit(UnitId(1)).unwrap();
        let path = MovePath::stand_still(unit, HexCoord::new(2, 5));
        let ranked = rank(&game, &behavior(), &path);
        assert_eq!(ranked.breakdown.facing, -2.0 * FACING_PENALTY_PER_HEXSIDE);
    }

    #[test]
    fn test_best_ranked_breaks_ties_by_order() {
        let unit = Unit::mech(1, "Mover", 0, 50.0, 4, 0).at(HexCoord::new(2, 5), Facing::West);
        let path = MovePath::stand_still(&unit, HexCoord::new(2, 5));
        let ranked = vec![
            RankedPath { path: path.clone(), rank: 1.0, breakdown: RankBreakdown::default() },
            RankedPath { path: path.clone(), rank: 3.0, breakdown: RankBreakdown::default() },
            RankedPath { path, rank: 3.0, breakdown: RankBreakdown::default() },
        ];
        let best = best_ranked(&ranked).unwrap();
        assert!(std::ptr::eq(best, &ranked[1]));
    }
}
