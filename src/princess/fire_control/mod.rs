//! Attack evaluation: to-hit estimates, damage model and firing plans
//!
//! `FireControl` answers two kinds of question against a read-only game
//! snapshot: how likely is this shot to hit, and what is the best set of
//! weapons to fire at this target given heat. Both work on hypothetical
//! `EntityState`s so they can be asked about paths not yet taken.

pub mod damage;
pub mod firing_plan;
pub mod physical;
pub mod probability;
pub mod to_hit;
pub mod weapon_fire_info;

pub use firing_plan::{best_of_table, calculate_heat_table, FiringPlan, TorsoTwist, UtilityContext};
pub use physical::{physical_damage, PhysicalInfo};
pub use probability::{probability_at_least, probability_exactly};
pub use to_hit::{
    exact_to_hit, guess_physical_to_hit, guess_to_hit, PhysicalAttackType, TargetRef, ToHitData, ToHitReason,
};
pub use weapon_fire_info::{FireTarget, WeaponFireInfo};

use crate::board::HexCoord;
use crate::core::config::DecisionConfig;
use crate::game::GameSnapshot;
use crate::princess::entity_state::EntityState;
use crate::units::{Unit, UnitKind};

use damage::hit_effect;

pub struct FireControl<'a> {
    game: &'a GameSnapshot,
    config: &'a DecisionConfig,
}

impl<'a> FireControl<'a> {
    pub fn new(game: &'a GameSnapshot, config: &'a DecisionConfig) -> Self {
        Self { game, config }
    }

    pub fn weapon_fire_info(
        &self,
        shooter: &Unit,
        shooter_state: &EntityState,
        target: TargetRef,
        target_state: &EntityState,
        weapon_index: usize,
    ) -> Option<WeaponFireInfo> {
        let weapon = shooter.weapons.get(weapon_index)?;
        Some(WeaponFireInfo::compute(
            shooter,
            shooter_state,
            target,
            target_state,
            weapon,
            &self.game.board,
        ))
    }

    /// Every operable weapon fired at once, ignoring heat
    pub fn full_firing_plan(
        &self,
        shooter: &Unit,
        shooter_state: &EntityState,
        target: TargetRef,
        target_state: &EntityState,
    ) -> FiringPlan {
        let mut plan = FiringPlan::empty(target.into());
        for weapon in shooter.operable_weapons() {
            let info = WeaponFireInfo::compute(
                shooter,
                shooter_state,
                target,
                target_state,
                weapon,
                &self.game.board,
            );
            if info.probability > 0.0 {
                plan.shots.push(info);
            }
        }
        plan.compute_utility(&UtilityContext::for_shooter(self.config, shooter, shooter_state));
        plan
    }

    pub fn heat_table(
        &self,
        shooter: &Unit,
        shooter_state: &EntityState,
        target: TargetRef,
        target_state: &EntityState,
    ) -> Vec<FiringPlan> {
        let full = self.full_firing_plan(shooter, shooter_state, target, target_state);
        let ctx = UtilityContext::for_shooter(self.config, shooter, shooter_state);
        calculate_heat_table(full.target, &full.shots, &ctx)
    }

    /// Best plan that fires no more than `heat_budget` heat
    pub fn best_plan_at_heat(
        &self,
        shooter: &Unit,
        shooter_state: &EntityState,
        target: TargetRef,
        target_state: &EntityState,
        heat_budget: u32,
    ) -> FiringPlan {
        if !self.positions_known(shooter, shooter_state, target, target_state) {
            return FiringPlan::empty(target.into());
        }
        let mut table = self.heat_table(shooter, shooter_state, target, target_state);
        let level = (heat_budget as usize).min(table.len().saturating_sub(1));
        if level < table.len() {
            table.swap_remove(level)
        } else {
            FiringPlan::empty(target.into())
        }
    }

    /// Best plan over every heat level, trying each torso twist the
    /// shooter can make
    ///
    /// The twist with the highest expected damage wins; no twist beats left
    /// and left beats right on a tie.
    pub fn best_firing_plan(
        &self,
        shooter: &Unit,
        shooter_state: &EntityState,
        target: TargetRef,
        target_state: &EntityState,
    ) -> FiringPlan {
        if !self.positions_known(shooter, shooter_state, target, target_state) {
            return FiringPlan::empty(target.into());
        }

        let twists: &[TorsoTwist] = if shooter.can_torso_twist() {
            &TorsoTwist::ALL
        } else {
            &TorsoTwist::ALL[..1]
        };

        let mut best: Option<FiringPlan> = None;
        for &twist in twists {
            let state = match twist {
                TorsoTwist::None => *shooter_state,
                TorsoTwist::Left => shooter_state.with_secondary_facing(shooter_state.facing.rotate_left()),
                TorsoTwist::Right => shooter_state.with_secondary_facing(shooter_state.facing.rotate_right()),
            };
            let table = self.heat_table(shooter, &state, target, target_state);
            let Some(mut plan) = best_of_table(&table).cloned() else {
                continue;
            };
            plan.twist = twist;
            let better = best
                .as_ref()
                .map_or(true, |kept| plan.expected_damage() > kept.expected_damage());
            if better {
                best = Some(plan);
            }
        }
        best.unwrap_or_else(|| FiringPlan::empty(target.into()))
    }

    /// Best plan using both units as they stand right now
    pub fn exact_best_firing_plan(&self, shooter: &Unit, target: &Unit) -> FiringPlan {
        self.best_firing_plan(
            shooter,
            &EntityState::from_unit(shooter),
            TargetRef::Unit(target),
            &EntityState::from_unit(target),
        )
    }

    /// Best plan against a fixed hex such as a building or objective
    pub fn best_plan_vs_hex(
        &self,
        shooter: &Unit,
        shooter_state: &EntityState,
        coord: HexCoord,
    ) -> FiringPlan {
        self.best_firing_plan(
            shooter,
            shooter_state,
            TargetRef::Hex(coord),
            &EntityState::stationary_at(coord),
        )
    }

    /// Damage the shooter could put out at `range` if every weapon that
    /// reaches hit, ignoring arcs and heat
    pub fn max_damage_at_range(&self, shooter: &Unit, range: u32, target_kind: Option<UnitKind>) -> f64 {
        shooter
            .operable_weapons()
            .filter_map(|weapon| {
                let bracket = weapon.range_bracket(range)?;
                Some(hit_effect(shooter, weapon, bracket, target_kind).damage)
            })
            .sum()
    }

    pub fn physical_info(
        &self,
        attacker: &Unit,
        attacker_state: &EntityState,
        target: &Unit,
        target_state: &EntityState,
        attack: PhysicalAttackType,
    ) -> PhysicalInfo {
        PhysicalInfo::compute(
            attacker,
            attacker_state,
            target,
            target_state,
            attack,
            self.game,
            self.config,
        )
    }

    /// The better of punch and kick, if either can land
    pub fn best_physical(
        &self,
        attacker: &Unit,
        attacker_state: &EntityState,
        target: &Unit,
        target_state: &EntityState,
    ) -> Option<PhysicalInfo> {
        [PhysicalAttackType::Punch, PhysicalAttackType::Kick]
            .into_iter()
            .map(|attack| self.physical_info(attacker, attacker_state, target, target_state, attack))
            .filter(|info| info.probability > 0.0)
            .fold(None, |best: Option<PhysicalInfo>, info| match best {
                Some(kept) if kept.utility >= info.utility => Some(kept),
                _ => Some(info),
            })
    }

    fn positions_known(
        &self,
        shooter: &Unit,
        shooter_state: &EntityState,
        target: TargetRef,
        target_state: &EntityState,
    ) -> bool {
        if shooter_state.position.is_none() {
            tracing::warn!(shooter = %shooter.id, "shooter has no board position, empty firing plan");
            return false;
        }
        if target_state.position.is_none() {
            tracing::warn!(shooter = %shooter.id, target = ?FireTarget::from(target), "target has no board position, empty firing plan");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Facing};
    use crate::core::types::{UnitId, WeaponId};
    use crate::units::{Location, Weapon};

    fn game_with(shooter: Unit, target: Unit) -> GameSnapshot {
        GameSnapshot::new(Board::new(16, 16)).with_unit(shooter).with_unit(target)
    }

    fn hunchback() -> Unit {
        Unit::mech(1, "Hunchback", 0, 50.0, 4, 0)
            .with_weapon(Weapon::autocannon(0, 20, Location::RightTorso))
            .with_weapon(Weapon::medium_laser(1, Location::LeftArm))
            .with_weapon(Weapon::medium_laser(2, Location::RightArm))
            .with_weapon(Weapon::small_laser(3, Location::Head))
            .with_heat_capacity(10)
    }

    #[test]
    fn test_missing_position_gives_empty_plan() {
        let shooter = hunchback().at(HexCoord::new(2, 8), Facing::East);
        let target = Unit::mech(2, "Ghost", 1, 50.0, 4, 0);
        let game = game_with(shooter, target);
        let config = DecisionConfig::default();
        let fc = FireControl::new(&game, &config);
        let plan = fc.exact_best_firing_plan(game.unit(UnitId(1)).unwrap(), game.unit(UnitId(2)).unwrap());
        assert!(plan.is_empty());
        assert_eq!(plan.utility, 0.0);
    }

    #[test]
    fn test_best_plan_is_deterministic() {
        let shooter = hunchback().at(HexCoord::new(2, 8), Facing::East);
        let target = Unit::mech(2, "Target", 1, 50.0, 4, 0).at(HexCoord::new(5, 8), Facing::West);
        let game = game_with(shooter, target);
        let config = DecisionConfig::default();
        let fc = FireControl::new(&game, &config);
        let s = game.unit(UnitId(1)).unwrap();
        let t = game.unit(UnitId(2)).unwrap();
        let a = fc.exact_best_firing_plan(s, t);
        let b = fc.exact_best_firing_plan(s, t);
        assert_eq!(a.utility.to_bits(), b.utility.to_bits());
        assert_eq!(a.weapons(), b.weapons());
        assert!(a.contains(WeaponId(0)));
    }

    #[test]
    fn test_twist_finds_target_on_flank() {
        // Target in the right arc, out of reach of a torso-mounted laser
        let shooter = Unit::mech(1, "Shooter", 0, 50.0, 4, 0)
            .with_weapon(Weapon::medium_laser(0, Location::CenterTorso))
            .at(HexCoord::new(5, 5), Facing::East);
        let target = Unit::mech(2, "Target", 1, 50.0, 4, 0).at(HexCoord::new(4, 8), Facing::NorthWest);
        let game = game_with(shooter, target);
        let config = DecisionConfig::default();
        let fc = FireControl::new(&game, &config);
        let plan = fc.exact_best_firing_plan(game.unit(UnitId(1)).unwrap(), game.unit(UnitId(2)).unwrap());
        assert_eq!(plan.twist, TorsoTwist::Right);
        assert_eq!(plan.shots.len(), 1);
    }

    #[test]
    fn test_no_twist_wins_ties() {
        let shooter = hunchback().at(HexCoord::new(2, 8), Facing::East);
        let target = Unit::mech(2, "Target", 1, 50.0, 4, 0).at(HexCoord::new(4, 8), Facing::West);
        let game = game_with(shooter, target);
        let config = DecisionConfig::default();
        let fc = FireControl::new(&game, &config);
        let plan = fc.exact_best_firing_plan(game.unit(UnitId(1)).unwrap(), game.unit(UnitId(2)).unwrap());
        assert_eq!(plan.twist, TorsoTwist::None);
    }

    #[test]
    fn test_best_plan_at_heat_clamps_budget() {
        let shooter = hunchback().at(HexCoord::new(2, 8), Facing::East);
        let target = Unit::mech(2, "Target", 1, 50.0, 4, 0).at(HexCoord::new(5, 8), Facing::West);
        let game = game_with(shooter, target);
        let config = DecisionConfig::default();
        let fc = FireControl::new(&game, &config);
        let s = game.unit(UnitId(1)).unwrap();
        let t = game.unit(UnitId(2)).unwrap();
        let s_state = EntityState::from_unit(s);
        let t_state = EntityState::from_unit(t);
        let cold = fc.best_plan_at_heat(s, &s_state, TargetRef::Unit(t), &t_state, 0);
        assert!(cold.is_empty());
        let warm = fc.best_plan_at_heat(s, &s_state, TargetRef::Unit(t), &t_state, 3);
        assert!(warm.heat() <= 3);
        let huge = fc.best_plan_at_heat(s, &s_state, TargetRef::Unit(t), &t_state, 1000);
        assert!(huge.heat() <= 17);
        assert!(huge.utility >= warm.utility);
    }

    #[test]
    fn test_max_damage_at_range_counts_weapons_in_reach() {
        let shooter = hunchback();
        let game = GameSnapshot::new(Board::new(4, 4));
        let config = DecisionConfig::default();
        let fc = FireControl::new(&game, &config);
        // AC/20 reaches 9, medium lasers 9, small laser 3
        assert_eq!(fc.max_damage_at_range(&shooter, 2, Some(UnitKind::Mech)), 33.0);
        assert_eq!(fc.max_damage_at_range(&shooter, 5, Some(UnitKind::Mech)), 30.0);
        assert_eq!(fc.max_damage_at_range(&shooter, 12, Some(UnitKind::Mech)), 0.0);
    }

    #[test]
    fn test_best_physical_prefers_kick() {
        let attacker = Unit::mech(1, "Atlas", 0, 100.0, 3, 0).at(HexCoord::new(4, 4), Facing::East);
        let target = Unit::mech(2, "Target", 1, 50.0, 4, 0).at(HexCoord::new(5, 4), Facing::West);
        let game = game_with(attacker, target);
        let config = DecisionConfig::default();
        let fc = FireControl::new(&game, &config);
        let a = game.unit(UnitId(1)).unwrap();
        let t = game.unit(UnitId(2)).unwrap();
        let best = fc
            .best_physical(a, &EntityState::from_unit(a), t, &EntityState::from_unit(t))
            .unwrap();
        assert_eq!(best.attack, PhysicalAttackType::Kick);
    }
}
