//! Weapon definitions: damage class, heat, range brackets and mounting

use serde::{Deserialize, Serialize};

use crate::core::types::WeaponId;
use crate::units::location::Location;

/// How a weapon turns a hit into damage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeaponClass {
    /// Same damage on every hit
    Fixed { damage: u32 },
    /// Missile rack rolling on the cluster table
    Cluster { rack: u32, damage_per_missile: u32 },
    /// Damage falls off by range bracket
    RangeBanded { short: u32, medium: u32, long: u32 },
    /// Flamers: heat against heat-tracking targets, damage otherwise
    HeatOnly { heat_damage: u32 },
    /// Conventional infantry weapons, scaled by surviving troopers
    Infantry { damage_per_trooper: f64 },
}

/// Range bracket for a shot at a given distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeBracket {
    Short,
    Medium,
    Long,
}

impl RangeBracket {
    /// To-hit modifier for this bracket
    pub fn modifier(&self) -> i32 {
        match self {
            RangeBracket::Short => 0,
            RangeBracket::Medium => 2,
            RangeBracket::Long => 4,
        }
    }
}

/// One weapon slot on a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: WeaponId,
    pub name: String,
    pub class: WeaponClass,
    pub heat: u32,
    pub min_range: u32,
    pub short_range: u32,
    pub medium_range: u32,
    pub long_range: u32,
    pub location: Location,
    #[serde(default)]
    pub rear_mounted: bool,
    /// Remaining shots; `None` for energy weapons
    #[serde(default)]
    pub ammo: Option<u32>,
    #[serde(default)]
    pub to_hit_modifier: i32,
    #[serde(default)]
    pub destroyed: bool,
    #[serde(default)]
    pub jammed: bool,
}

impl Weapon {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u16,
        name: &str,
        class: WeaponClass,
        heat: u32,
        ranges: (u32, u32, u32, u32),
        location: Location,
    ) -> Self {
        let (min_range, short_range, medium_range, long_range) = ranges;
        Self {
            id: WeaponId(id),
            name: name.to_string(),
            class,
            heat,
            min_range,
            short_range,
            medium_range,
            long_range,
            location,
            rear_mounted: false,
            ammo: None,
            to_hit_modifier: 0,
            destroyed: false,
            jammed: false,
        }
    }

    pub fn small_laser(id: u16, location: Location) -> Self {
        Self::new(id, "Small Laser", WeaponClass::Fixed { damage: 3 }, 1, (0, 1, 2, 3), location)
    }

    pub fn medium_laser(id: u16, location: Location) -> Self {
        Self::new(id, "Medium Laser", WeaponClass::Fixed { damage: 5 }, 3, (0, 3, 6, 9), location)
    }

    pub fn large_laser(id: u16, location: Location) -> Self {
        Self::new(id, "Large Laser", WeaponClass::Fixed { damage: 8 }, 8, (0, 5, 10, 15), location)
    }

    pub fn ppc(id: u16, location: Location) -> Self {
        Self::new(id, "PPC", WeaponClass::Fixed { damage: 10 }, 10, (3, 6, 12, 18), location)
    }

    pub fn snub_nose_ppc(id: u16, location: Location) -> Self {
        Self::new(
            id,
            "Snub-Nose PPC",
            WeaponClass::RangeBanded {
                short: 10,
                medium: 8,
                long: 5,
            },
            10,
            (0, 9, 13, 15),
            location,
        )
    }

    pub fn autocannon(id: u16, damage: u32, location: Location) -> Self {
        let (heat, ranges) = match damage {
            2 => (1, (4, 8, 16, 24)),
            5 => (1, (3, 6, 12, 18)),
            10 => (3, (0, 5, 10, 15)),
            _ => (7, (0, 3, 6, 9)),
        };
        let mut weapon = Self::new(
            id,
            &format!("AC/{}", damage),
            WeaponClass::Fixed { damage },
            heat,
            ranges,
            location,
        );
        weapon.ammo = Some(10);
        weapon
    }

    pub fn lrm(id: u16, rack: u32, location: Location) -> Self {
        let heat = match rack {
            0..=5 => 2,
            6..=10 => 4,
            11..=15 => 5,
            _ => 6,
        };
        let mut weapon = Self::new(
            id,
            &format!("LRM-{}", rack),
            WeaponClass::Cluster {
                rack,
                damage_per_missile: 1,
            },
            heat,
            (6, 7, 14, 21),
            location,
        );
        weapon.ammo = Some(12);
        weapon
    }

    pub fn srm(id: u16, rack: u32, location: Location) -> Self {
        let heat = match rack {
            0..=2 => 2,
            3..=4 => 3,
            _ => 4,
        };
        let mut weapon = Self::new(
            id,
            &format!("SRM-{}", rack),
            WeaponClass::Cluster {
                rack,
                damage_per_missile: 2,
            },
            heat,
            (0, 3, 6, 9),
            location,
        );
        weapon.ammo = Some(15);
        weapon
    }

    pub fn machine_gun(id: u16, location: Location) -> Self {
        let mut weapon = Self::new(
            id,
            "Machine Gun",
            WeaponClass::Fixed { damage: 2 },
            0,
            (0, 1, 2, 3),
            location,
        );
        weapon.ammo = Some(200);
        weapon
    }

    pub fn flamer(id: u16, location: Location) -> Self {
        Self::new(
            id,
            "Flamer",
            WeaponClass::HeatOnly { heat_damage: 2 },
            3,
            (0, 1, 2, 3),
            location,
        )
    }

    pub fn infantry_rifle(id: u16) -> Self {
        Self::new(
            id,
            "Infantry Rifles",
            WeaponClass::Infantry {
                damage_per_trooper: 0.35,
            },
            0,
            (0, 1, 2, 3),
            Location::Body,
        )
    }

    pub fn rear(mut self) -> Self {
        self.rear_mounted = true;
        self
    }

    /// Range bracket at this distance, or `None` beyond long range
    pub fn range_bracket(&self, distance: u32) -> Option<RangeBracket> {
        if distance <= self.short_range {
            Some(RangeBracket::Short)
        } else if distance <= self.medium_range {
            Some(RangeBracket::Medium)
        } else if distance <= self.long_range {
            Some(RangeBracket::Long)
        } else {
            None
        }
    }

    /// To-hit penalty for firing inside minimum range
    pub fn minimum_range_modifier(&self, distance: u32) -> i32 {
        if self.min_range > 0 && distance <= self.min_range {
            (self.min_range - distance + 1) as i32
        } else {
            0
        }
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo.map_or(true, |shots| shots > 0)
    }

    /// Can this weapon fire at all this turn?
    pub fn is_operable(&self) -> bool {
        !self.destroyed && !self.jammed && self.has_ammo()
    }

    /// Nominal damage of one hit, ignoring cluster rolls
    pub fn nominal_damage(&self, bracket: RangeBracket) -> f64 {
        match self.class {
            WeaponClass::Fixed { damage } => damage as f64,
            WeaponClass::Cluster {
                rack,
                damage_per_missile,
            } => (rack * damage_per_missile) as f64,
            WeaponClass::RangeBanded {
                short,
                medium,
                long,
            } => match bracket {
                RangeBracket::Short => short as f64,
                RangeBracket::Medium => medium as f64,
                RangeBracket::Long => long as f64,
            },
            WeaponClass::HeatOnly { heat_damage } => heat_damage as f64,
            WeaponClass::Infantry { damage_per_trooper } => damage_per_trooper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_brackets() {
        let laser = Weapon::medium_laser(0, Location::RightArm);
        assert_eq!(laser.range_bracket(1), Some(RangeBracket::Short));
        assert_eq!(laser.range_bracket(3), Some(RangeBracket::Short));
        assert_eq!(laser.range_bracket(6), Some(RangeBracket::Medium));
        assert_eq!(laser.range_bracket(9), Some(RangeBracket::Long));
        assert_eq!(laser.range_bracket(10), None);
    }

    #[test]
    fn test_minimum_range_penalty() {
        let ppc = Weapon::ppc(0, Location::RightArm);
        assert_eq!(ppc.minimum_range_modifier(1), 3);
        assert_eq!(ppc.minimum_range_modifier(3), 1);
        assert_eq!(ppc.minimum_range_modifier(4), 0);

        let laser = Weapon::medium_laser(1, Location::LeftArm);
        assert_eq!(laser.minimum_range_modifier(1), 0);
    }

    #[test]
    fn test_empty_ammo_is_inoperable() {
        let mut ac = Weapon::autocannon(0, 5, Location::RightTorso);
        assert!(ac.is_operable());
        ac.ammo = Some(0);
        assert!(!ac.is_operable());
    }

    #[test]
    fn test_energy_weapons_never_run_dry() {
        let laser = Weapon::medium_laser(0, Location::CenterTorso);
        assert!(laser.has_ammo());
    }

    #[test]
    fn test_banded_damage() {
        let snub = Weapon::snub_nose_ppc(0, Location::RightArm);
        assert_eq!(snub.nominal_damage(RangeBracket::Short), 10.0);
        assert_eq!(snub.nominal_damage(RangeBracket::Long), 5.0);
    }
}
