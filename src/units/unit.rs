//! Unit record as seen by the decision core
//!
//! A `Unit` is a read-only copy of the engine's unit: position, posture,
//! heat, per-location armor and the weapon list. Constructors build units
//! with standard armor for their weight so scenarios and tests stay short.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{Facing, HexCoord};
use crate::core::types::{TeamId, UnitId};
use crate::units::location::Location;
use crate::units::weapon::Weapon;

/// Remaining fraction of structure below which a unit counts as crippled
const CRIPPLED_FRACTION: f64 = 0.5;

/// Broad unit category; selects hit tables, movement rules and fall damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Mech,
    Tank,
    Infantry,
    Aero,
}

impl UnitKind {
    /// Locations present on a unit of this kind
    pub fn locations(&self) -> &'static [Location] {
        match self {
            UnitKind::Mech => &[
                Location::Head,
                Location::CenterTorso,
                Location::LeftTorso,
                Location::RightTorso,
                Location::LeftArm,
                Location::RightArm,
                Location::LeftLeg,
                Location::RightLeg,
            ],
            UnitKind::Tank => &[
                Location::Front,
                Location::Left,
                Location::Right,
                Location::Rear,
                Location::Turret,
            ],
            UnitKind::Infantry => &[Location::Body],
            UnitKind::Aero => &[
                Location::Nose,
                Location::LeftWing,
                Location::RightWing,
                Location::Aft,
            ],
        }
    }

    /// Does destroying this location destroy the whole unit?
    pub fn is_kill_location(&self, location: Location) -> bool {
        match self {
            UnitKind::Mech => matches!(location, Location::Head | Location::CenterTorso),
            UnitKind::Tank | UnitKind::Aero => true,
            UnitKind::Infantry => location == Location::Body,
        }
    }

    pub fn is_aero(&self) -> bool {
        matches!(self, UnitKind::Aero)
    }
}

/// How a unit moved (or will move) this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MovementMode {
    #[default]
    Stationary,
    Walked,
    Ran,
    Jumped,
    Flew,
}

/// Armor and internal structure of one location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStatus {
    pub armor: u32,
    pub structure: u32,
    pub original_armor: u32,
    pub original_structure: u32,
}

impl LocationStatus {
    pub fn new(armor: u32, structure: u32) -> Self {
        Self {
            armor,
            structure,
            original_armor: armor,
            original_structure: structure,
        }
    }

    /// Has internal structure been hit?
    pub fn is_damaged(&self) -> bool {
        self.structure < self.original_structure
    }

    pub fn is_destroyed(&self) -> bool {
        self.structure == 0
    }

    /// Damage needed to destroy this location outright
    pub fn total(&self) -> u32 {
        self.armor + self.structure
    }
}

/// A unit on (or waiting to enter) the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: TeamId,
    pub kind: UnitKind,
    /// Tons
    pub weight: f64,
    pub gunnery: u32,
    pub piloting: u32,

    pub position: Option<HexCoord>,
    pub facing: Facing,
    pub secondary_facing: Facing,

    pub heat: u32,
    pub heat_capacity: u32,

    pub walk_mp: u32,
    pub jump_mp: u32,
    /// MASC activation target number, if fitted
    #[serde(default)]
    pub masc: Option<u32>,

    pub locations: BTreeMap<Location, LocationStatus>,
    pub weapons: Vec<Weapon>,

    #[serde(default)]
    pub prone: bool,
    #[serde(default)]
    pub immobile: bool,
    #[serde(default)]
    pub shutdown: bool,
    #[serde(default)]
    pub hull_down: bool,
    /// Has already moved this turn
    #[serde(default)]
    pub done: bool,
    #[serde(default = "default_deployed")]
    pub deployed: bool,

    /// Movement committed this turn, for units that have already moved
    #[serde(default)]
    pub movement_mode: MovementMode,
    #[serde(default)]
    pub hexes_moved: u32,

    #[serde(default)]
    pub velocity: u32,
    #[serde(default)]
    pub altitude: u32,
}

fn default_deployed() -> bool {
    true
}

impl Unit {
    fn base(id: u32, name: &str, team: u32, kind: UnitKind, weight: f64) -> Self {
        Self {
            id: UnitId(id),
            name: name.to_string(),
            team: TeamId(team),
            kind,
            weight,
            gunnery: 4,
            piloting: 5,
            position: None,
            facing: Facing::default(),
            secondary_facing: Facing::default(),
            heat: 0,
            heat_capacity: 0,
            walk_mp: 0,
            jump_mp: 0,
            masc: None,
            locations: BTreeMap::new(),
            weapons: Vec::new(),
            prone: false,
            immobile: false,
            shutdown: false,
            hull_down: false,
            done: false,
            deployed: true,
            movement_mode: MovementMode::Stationary,
            hexes_moved: 0,
            velocity: 0,
            altitude: 0,
        }
    }

    /// A mech with standard structure for its weight and armor at twice
    /// structure (head 9 / 3)
    pub fn mech(id: u32, name: &str, team: u32, weight: f64, walk_mp: u32, jump_mp: u32) -> Self {
        let mut unit = Self::base(id, name, team, UnitKind::Mech, weight);
        unit.walk_mp = walk_mp;
        unit.jump_mp = jump_mp;
        unit.heat_capacity = 10;

        let scaled = |factor: f64| ((weight * factor).round() as u32).max(1);
        let torso = scaled(0.31);
        let side = scaled(0.21);
        let arm = scaled(0.17);
        let leg = scaled(0.21);

        unit.locations.insert(Location::Head, LocationStatus::new(9, 3));
        unit.locations.insert(Location::CenterTorso, LocationStatus::new(torso * 2, torso));
        for location in [Location::LeftTorso, Location::RightTorso] {
            unit.locations.insert(location, LocationStatus::new(side * 2, side));
        }
        for location in [Location::LeftArm, Location::RightArm] {
            unit.locations.insert(location, LocationStatus::new(arm * 2, arm));
        }
        for location in [Location::LeftLeg, Location::RightLeg] {
            unit.locations.insert(location, LocationStatus::new(leg * 2, leg));
        }
        unit
    }

    pub fn tank(id: u32, name: &str, team: u32, weight: f64, cruise_mp: u32) -> Self {
        let mut unit = Self::base(id, name, team, UnitKind::Tank, weight);
        unit.walk_mp = cruise_mp;

        let structure = (weight / 10.0).ceil() as u32;
        let armor = |factor: f64| (weight * factor).round() as u32;
        unit.locations.insert(Location::Front, LocationStatus::new(armor(0.3), structure));
        unit.locations.insert(Location::Left, LocationStatus::new(armor(0.25), structure));
        unit.locations.insert(Location::Right, LocationStatus::new(armor(0.25), structure));
        unit.locations.insert(Location::Rear, LocationStatus::new(armor(0.15), structure));
        unit.locations.insert(Location::Turret, LocationStatus::new(armor(0.25), structure));
        unit
    }

    /// A conventional infantry platoon; structure is the trooper count
    pub fn infantry(id: u32, name: &str, team: u32, troopers: u32, ground_mp: u32) -> Self {
        let mut unit = Self::base(id, name, team, UnitKind::Infantry, troopers as f64 * 0.1);
        unit.walk_mp = ground_mp;
        unit.locations.insert(Location::Body, LocationStatus::new(0, troopers));
        unit.weapons.push(Weapon::infantry_rifle(0));
        unit
    }

    pub fn aero(
        id: u32,
        name: &str,
        team: u32,
        weight: f64,
        thrust: u32,
        velocity: u32,
        altitude: u32,
    ) -> Self {
        let mut unit = Self::base(id, name, team, UnitKind::Aero, weight);
        unit.walk_mp = thrust;
        unit.velocity = velocity;
        unit.altitude = altitude;
        unit.heat_capacity = 10;

        let structure = (weight / 10.0).ceil() as u32;
        let armor = |factor: f64| (weight * factor).round() as u32;
        unit.locations.insert(Location::Nose, LocationStatus::new(armor(0.3), structure));
        unit.locations.insert(Location::LeftWing, LocationStatus::new(armor(0.25), structure));
        unit.locations.insert(Location::RightWing, LocationStatus::new(armor(0.25), structure));
        unit.locations.insert(Location::Aft, LocationStatus::new(armor(0.15), structure));
        unit
    }

    /// Place the unit on the board
    pub fn at(mut self, position: HexCoord, facing: Facing) -> Self {
        self.position = Some(position);
        self.facing = facing;
        self.secondary_facing = facing;
        self.deployed = true;
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn with_skills(mut self, gunnery: u32, piloting: u32) -> Self {
        self.gunnery = gunnery;
        self.piloting = piloting;
        self
    }

    pub fn with_heat_capacity(mut self, capacity: u32) -> Self {
        self.heat_capacity = capacity;
        self
    }

    pub fn with_masc(mut self, target_number: u32) -> Self {
        self.masc = Some(target_number);
        self
    }

    /// Overwrite the remaining armor and structure of one location
    pub fn set_location(&mut self, location: Location, armor: u32, structure: u32) {
        if let Some(status) = self.locations.get_mut(&location) {
            status.armor = armor;
            status.structure = structure;
        }
    }

    pub fn location(&self, location: Location) -> Option<&LocationStatus> {
        self.locations.get(&location)
    }

    pub fn run_mp(&self) -> u32 {
        match self.kind {
            UnitKind::Infantry => self.walk_mp,
            _ => (self.walk_mp * 3).div_ceil(2),
        }
    }

    /// Most MP the unit can spend this turn, counting MASC
    pub fn max_mp(&self) -> u32 {
        match self.masc {
            Some(_) if self.kind == UnitKind::Mech => self.run_mp().max(self.walk_mp * 2),
            _ => self.run_mp(),
        }
    }

    pub fn can_torso_twist(&self) -> bool {
        self.kind == UnitKind::Mech && !self.prone && !self.shutdown
    }

    /// Does this kind of unit build up heat from firing?
    pub fn tracks_heat(&self) -> bool {
        matches!(self.kind, UnitKind::Mech | UnitKind::Aero)
    }

    pub fn is_airborne(&self) -> bool {
        self.kind == UnitKind::Aero && self.altitude > 0
    }

    /// Surviving troopers for infantry, zero for everything else
    pub fn troopers(&self) -> u32 {
        match self.kind {
            UnitKind::Infantry => self.location(Location::Body).map_or(0, |s| s.structure),
            _ => 0,
        }
    }

    /// Piloting modifier from leg damage: +1 per damaged leg, +5 per lost leg
    pub fn leg_damage_modifier(&self) -> i32 {
        if self.kind != UnitKind::Mech {
            return 0;
        }
        [Location::LeftLeg, Location::RightLeg]
            .iter()
            .filter_map(|leg| self.location(*leg))
            .map(|status| {
                if status.is_destroyed() {
                    5
                } else if status.is_damaged() {
                    1
                } else {
                    0
                }
            })
            .sum()
    }

    pub fn has_damaged_leg(&self) -> bool {
        self.leg_damage_modifier() > 0
    }

    pub fn operable_weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.iter().filter(|w| w.is_operable())
    }

    /// Heavily damaged: low structure, a failing kill location or nothing
    /// left to shoot with
    pub fn is_crippled(&self) -> bool {
        let (remaining, original) = self
            .locations
            .values()
            .fold((0u32, 0u32), |(r, o), s| (r + s.structure, o + s.original_structure));
        if original > 0 && (remaining as f64) < original as f64 * CRIPPLED_FRACTION {
            return true;
        }

        let failing_kill_location = self.locations.iter().any(|(location, status)| {
            self.kind.is_kill_location(*location)
                && self.kind != UnitKind::Tank
                && self.kind != UnitKind::Aero
                && (status.structure as f64) < status.original_structure as f64 * CRIPPLED_FRACTION
        });
        if failing_kill_location {
            return true;
        }

        self.operable_weapons().next().is_none()
    }

    /// Is the unit on the board and able to act?
    pub fn is_active(&self) -> bool {
        self.deployed && self.position.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mech_standard_locations() {
        let mech = Unit::mech(1, "Hunchback", 0, 50.0, 4, 0);
        assert_eq!(mech.locations.len(), 8);
        assert_eq!(mech.location(Location::Head).map(|s| s.total()), Some(12));
        assert_eq!(mech.run_mp(), 6);
    }

    #[test]
    fn test_run_mp_rounds_up() {
        let mech = Unit::mech(1, "Locust", 0, 20.0, 7, 0);
        assert_eq!(mech.run_mp(), 11);
    }

    #[test]
    fn test_infantry_have_no_run() {
        let platoon = Unit::infantry(1, "Foot", 0, 28, 1);
        assert_eq!(platoon.run_mp(), 1);
        assert_eq!(platoon.troopers(), 28);
    }

    #[test]
    fn test_masc_doubles_walk() {
        let mech = Unit::mech(1, "Wolfhound", 0, 35.0, 6, 0).with_masc(3);
        assert_eq!(mech.max_mp(), 12);
        let plain = Unit::mech(2, "Wolfhound", 0, 35.0, 6, 0);
        assert_eq!(plain.max_mp(), 9);
    }

    #[test]
    fn test_leg_damage_modifier() {
        let mut mech = Unit::mech(1, "Atlas", 0, 100.0, 3, 0);
        assert_eq!(mech.leg_damage_modifier(), 0);
        mech.set_location(Location::LeftLeg, 0, 10);
        assert_eq!(mech.leg_damage_modifier(), 1);
        mech.set_location(Location::RightLeg, 0, 0);
        assert_eq!(mech.leg_damage_modifier(), 6);
    }

    #[test]
    fn test_unarmed_unit_is_crippled() {
        let mech = Unit::mech(1, "Empty", 0, 50.0, 4, 0);
        assert!(mech.is_crippled());
        let armed = mech.with_weapon(Weapon::medium_laser(0, Location::RightArm));
        assert!(!armed.is_crippled());
    }

    #[test]
    fn test_center_torso_damage_cripples() {
        let mut mech = Unit::mech(1, "Centurion", 0, 50.0, 4, 0)
            .with_weapon(Weapon::medium_laser(0, Location::RightArm));
        mech.set_location(Location::CenterTorso, 0, 3);
        assert!(mech.is_crippled());
    }

    #[test]
    fn test_kill_locations() {
        assert!(UnitKind::Mech.is_kill_location(Location::Head));
        assert!(!UnitKind::Mech.is_kill_location(Location::LeftArm));
        assert!(UnitKind::Tank.is_kill_location(Location::Rear));
        assert!(UnitKind::Infantry.is_kill_location(Location::Body));
    }
}
