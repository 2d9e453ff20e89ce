//! To-hit modifier stack
//!
//! The estimate works on `EntityState`s, so it can be asked about
//! positions a unit has not moved to yet. Attacks the rules forbid get the
//! impossible sentinel, which maps to zero hit probability.

use serde::{Deserialize, Serialize};

use crate::board::{Arc, Board, HexCoord};
use crate::princess::constants::{HEAT_TO_HIT_STEPS, IMPOSSIBLE_TO_HIT, KICK_TO_HIT_BONUS};
use crate::princess::entity_state::EntityState;
use crate::princess::fire_control::probability::probability_at_least;
use crate::units::{Location, MovementMode, Unit, UnitKind, Weapon};

/// One line of the modifier stack, or why the attack cannot happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToHitReason {
    Gunnery,
    Piloting,
    AttackerWalked,
    AttackerRan,
    AttackerJumped,
    AttackerProne,
    TargetMovement,
    TargetJumped,
    Range,
    MinimumRange,
    InterveningWoods,
    TargetInWoods,
    PartialCover,
    TargetProne,
    TargetImmobile,
    TargetInfantry,
    AirborneTarget,
    AttackerHeat,
    WeaponModifier,
    Kick,
    // Impossible
    NoPosition,
    AttackerShutdown,
    WeaponDestroyed,
    WeaponJammed,
    OutOfAmmo,
    OutOfRange,
    OutOfArc,
    NoLineOfSight,
    NotAdjacent,
    PhysicalNotAllowed,
    LimbMissing,
}

/// A to-hit number with the modifiers that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToHitData {
    pub value: i32,
    pub modifiers: Vec<(ToHitReason, i32)>,
    /// Set when the attack is not allowed at all
    pub impossible: Option<ToHitReason>,
}

impl ToHitData {
    pub fn base(reason: ToHitReason, value: i32) -> Self {
        Self {
            value,
            modifiers: vec![(reason, value)],
            impossible: None,
        }
    }

    pub fn impossible(reason: ToHitReason) -> Self {
        Self {
            value: IMPOSSIBLE_TO_HIT,
            modifiers: Vec::new(),
            impossible: Some(reason),
        }
    }

    /// Add a modifier; zero modifiers are not recorded
    pub fn add(&mut self, reason: ToHitReason, modifier: i32) {
        if modifier != 0 && self.impossible.is_none() {
            self.value += modifier;
            self.modifiers.push((reason, modifier));
        }
    }

    pub fn is_impossible(&self) -> bool {
        self.impossible.is_some()
    }

    /// Chance to hit on 2d6
    pub fn probability(&self) -> f64 {
        if self.is_impossible() {
            0.0
        } else {
            probability_at_least(self.value)
        }
    }
}

/// Target movement modifier by hexes moved
pub fn target_movement_modifier(hexes_moved: u32) -> i32 {
    match hexes_moved {
        0..=2 => 0,
        3..=4 => 1,
        5..=6 => 2,
        7..=9 => 3,
        10..=17 => 4,
        18..=24 => 5,
        _ => 6,
    }
}

/// Attacker penalty for running hot
pub fn heat_modifier(heat: u32) -> i32 {
    HEAT_TO_HIT_STEPS
        .iter()
        .find(|(threshold, _)| heat >= *threshold)
        .map_or(0, |(_, modifier)| *modifier)
}

fn attacker_movement(mode: MovementMode) -> Option<(ToHitReason, i32)> {
    match mode {
        MovementMode::Walked => Some((ToHitReason::AttackerWalked, 1)),
        MovementMode::Ran => Some((ToHitReason::AttackerRan, 2)),
        MovementMode::Jumped => Some((ToHitReason::AttackerJumped, 3)),
        MovementMode::Stationary | MovementMode::Flew => None,
    }
}

/// Can a weapon mounted this way fire into `arc`?
pub fn weapon_can_fire_into(kind: UnitKind, weapon: &Weapon, arc: Arc) -> bool {
    if weapon.rear_mounted {
        return arc == Arc::Rear;
    }
    match (kind, weapon.location) {
        (UnitKind::Infantry, _) => true,
        (UnitKind::Tank, Location::Turret) => true,
        (UnitKind::Tank, Location::Left) => arc == Arc::Left,
        (UnitKind::Tank, Location::Right) => arc == Arc::Right,
        (UnitKind::Tank, Location::Rear) | (UnitKind::Aero, Location::Aft) => arc == Arc::Rear,
        (UnitKind::Mech, Location::LeftArm) | (UnitKind::Aero, Location::LeftWing) => {
            matches!(arc, Arc::Front | Arc::Left)
        }
        (UnitKind::Mech, Location::RightArm) | (UnitKind::Aero, Location::RightWing) => {
            matches!(arc, Arc::Front | Arc::Right)
        }
        _ => arc == Arc::Front,
    }
}

/// Arc of the shooter that `to` lies in, measured from the facing the
/// weapon's mount turns with
fn firing_arc(shooter: &Unit, state: &EntityState, weapon: &Weapon, from: HexCoord, to: HexCoord) -> Arc {
    let facing = if shooter.kind == UnitKind::Mech && !weapon.location.is_leg() {
        state.secondary_facing
    } else {
        state.facing
    };
    facing.arc_to(from, to)
}

/// What is being shot at: a unit, or a bare hex (building, objective)
#[derive(Debug, Clone, Copy)]
pub enum TargetRef<'a> {
    Unit(&'a Unit),
    Hex(HexCoord),
}

impl<'a> TargetRef<'a> {
    pub fn kind(&self) -> Option<UnitKind> {
        match self {
            TargetRef::Unit(unit) => Some(unit.kind),
            TargetRef::Hex(_) => None,
        }
    }

    pub fn unit(&self) -> Option<&'a Unit> {
        match self {
            TargetRef::Unit(unit) => Some(unit),
            TargetRef::Hex(_) => None,
        }
    }
}

/// Modifiers that depend on the target alone
fn add_target_modifiers(
    data: &mut ToHitData,
    target: TargetRef,
    target_state: &EntityState,
    board: &Board,
    to: HexCoord,
    distance: u32,
) {
    if target_state.immobile {
        data.add(ToHitReason::TargetImmobile, -4);
    } else {
        data.add(ToHitReason::TargetMovement, target_movement_modifier(target_state.hexes_moved));
        if target_state.jumping {
            data.add(ToHitReason::TargetJumped, 1);
        }
    }
    if target_state.prone {
        data.add(ToHitReason::TargetProne, if distance <= 1 { -2 } else { 1 });
    }
    if target_state.airborne {
        data.add(ToHitReason::AirborneTarget, 2);
    } else {
        data.add(ToHitReason::TargetInWoods, board.terrain(to).woods_modifier());
    }
    if target.kind() == Some(UnitKind::Infantry) {
        data.add(ToHitReason::TargetInfantry, 1);
    }
}

fn add_attacker_movement(data: &mut ToHitData, state: &EntityState) {
    if let Some((reason, modifier)) = attacker_movement(state.movement_mode) {
        data.add(reason, modifier);
    }
    if state.prone {
        data.add(ToHitReason::AttackerProne, 2);
    }
}

/// Estimate the to-hit number for a weapon attack between two states
pub fn guess_to_hit(
    shooter: &Unit,
    shooter_state: &EntityState,
    target: TargetRef,
    target_state: &EntityState,
    weapon: &Weapon,
    board: &Board,
) -> ToHitData {
    let (Some(from), Some(to)) = (shooter_state.position, target_state.position) else {
        return ToHitData::impossible(ToHitReason::NoPosition);
    };
    if shooter.shutdown {
        return ToHitData::impossible(ToHitReason::AttackerShutdown);
    }
    if weapon.destroyed {
        return ToHitData::impossible(ToHitReason::WeaponDestroyed);
    }
    if weapon.jammed {
        return ToHitData::impossible(ToHitReason::WeaponJammed);
    }
    if !weapon.has_ammo() {
        return ToHitData::impossible(ToHitReason::OutOfAmmo);
    }

    let distance = from.distance(&to);
    let Some(bracket) = weapon.range_bracket(distance) else {
        return ToHitData::impossible(ToHitReason::OutOfRange);
    };
    if !weapon_can_fire_into(shooter.kind, weapon, firing_arc(shooter, shooter_state, weapon, from, to)) {
        return ToHitData::impossible(ToHitReason::OutOfArc);
    }

    let flying = shooter_state.airborne || target_state.airborne;
    let los = if flying {
        Default::default()
    } else {
        board.line_of_sight(from, to)
    };
    if los.blocked {
        return ToHitData::impossible(ToHitReason::NoLineOfSight);
    }

    let mut data = ToHitData::base(ToHitReason::Gunnery, shooter.gunnery as i32);
    add_attacker_movement(&mut data, shooter_state);
    data.add(ToHitReason::Range, bracket.modifier());
    data.add(ToHitReason::MinimumRange, weapon.minimum_range_modifier(distance));
    data.add(ToHitReason::InterveningWoods, los.intervening_woods);
    if los.partial_cover || target_state.hull_down {
        data.add(ToHitReason::PartialCover, 1);
    }
    add_target_modifiers(&mut data, target, target_state, board, to, distance);
    if shooter.tracks_heat() {
        data.add(ToHitReason::AttackerHeat, heat_modifier(shooter_state.heat));
    }
    data.add(ToHitReason::WeaponModifier, weapon.to_hit_modifier);
    data
}

/// To-hit for a weapon attack between two units as they stand now.
///
/// This is `guess_to_hit` applied to the committed state of both units:
/// the movement mode and hexes moved they have declared this turn, their
/// posture, and the shooter's torso twist. The two must agree on identical
/// real state, so no separate modifier stack is kept here.
pub fn exact_to_hit(shooter: &Unit, target: &Unit, weapon: &Weapon, board: &Board) -> ToHitData {
    guess_to_hit(
        shooter,
        &EntityState::from_unit(shooter),
        TargetRef::Unit(target),
        &EntityState::from_unit(target),
        weapon,
        board,
    )
}

/// Punch or kick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalAttackType {
    Punch,
    Kick,
}

/// Estimate the to-hit number for a physical attack
pub fn guess_physical_to_hit(
    attacker: &Unit,
    attacker_state: &EntityState,
    target: &Unit,
    target_state: &EntityState,
    attack: PhysicalAttackType,
    board: &Board,
) -> ToHitData {
    let (Some(from), Some(to)) = (attacker_state.position, target_state.position) else {
        return ToHitData::impossible(ToHitReason::NoPosition);
    };
    if attacker.kind != UnitKind::Mech || attacker.shutdown || attacker_state.prone {
        return ToHitData::impossible(ToHitReason::PhysicalNotAllowed);
    }
    if target_state.airborne {
        return ToHitData::impossible(ToHitReason::PhysicalNotAllowed);
    }
    let distance = from.distance(&to);
    if distance != 1 {
        return ToHitData::impossible(ToHitReason::NotAdjacent);
    }

    let (limbs, facing, bonus): (&[Location], _, _) = match attack {
        PhysicalAttackType::Punch => (
            &[Location::LeftArm, Location::RightArm][..],
            attacker_state.secondary_facing,
            0,
        ),
        PhysicalAttackType::Kick => (
            &[Location::LeftLeg, Location::RightLeg][..],
            attacker_state.facing,
            KICK_TO_HIT_BONUS,
        ),
    };
    let limbs_intact = limbs
        .iter()
        .all(|limb| attacker.location(*limb).is_some_and(|s| !s.is_destroyed()));
    if !limbs_intact {
        return ToHitData::impossible(ToHitReason::LimbMissing);
    }
    if facing.arc_to(from, to) != Arc::Front {
        return ToHitData::impossible(ToHitReason::OutOfArc);
    }

    let mut data = ToHitData::base(ToHitReason::Piloting, attacker.piloting as i32);
    data.add(ToHitReason::Kick, bonus);
    add_attacker_movement(&mut data, attacker_state);
    add_target_modifiers(&mut data, TargetRef::Unit(target), target_state, board, to, distance);
    data
}
