//! Hit locations and the tables that map attack direction to location odds

use serde::{Deserialize, Serialize};

use crate::board::Arc;
use crate::units::UnitKind;

/// Armor location across all unit kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    // Mechs
    Head,
    CenterTorso,
    LeftTorso,
    RightTorso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    // Vehicles
    Front,
    Left,
    Right,
    Rear,
    Turret,
    // Infantry
    Body,
    // Aerospace
    Nose,
    LeftWing,
    RightWing,
    Aft,
}

impl Location {
    pub fn mech_locations() -> [Location; 8] {
        [
            Location::Head,
            Location::CenterTorso,
            Location::LeftTorso,
            Location::RightTorso,
            Location::LeftArm,
            Location::RightArm,
            Location::LeftLeg,
            Location::RightLeg,
        ]
    }

    pub fn is_leg(&self) -> bool {
        matches!(self, Location::LeftLeg | Location::RightLeg)
    }

    pub fn is_arm(&self) -> bool {
        matches!(self, Location::LeftArm | Location::RightArm)
    }
}

/// Kind of attack, which selects between the full table and the
/// restricted physical-attack tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Standard,
    Punch,
    Kick,
}

/// A hit location table: (location, weight) pairs over a common denominator
#[derive(Debug, Clone, Copy)]
pub struct HitTable {
    entries: &'static [(Location, u8)],
    denominator: u8,
}

impl HitTable {
    /// Probability of each location being struck
    pub fn probabilities(&self) -> impl Iterator<Item = (Location, f64)> + '_ {
        let denominator = self.denominator as f64;
        self.entries
            .iter()
            .map(move |(location, weight)| (*location, *weight as f64 / denominator))
    }

    pub fn probability_of(&self, location: Location) -> f64 {
        self.probabilities()
            .filter(|(l, _)| *l == location)
            .map(|(_, p)| p)
            .sum()
    }

    /// Look up the table for a target of `kind` struck from `side`
    pub fn lookup(kind: UnitKind, side: Arc, table: TableKind) -> HitTable {
        use Location::*;

        match (kind, table) {
            (UnitKind::Mech, TableKind::Punch) => match side {
                Arc::Front | Arc::Rear => HitTable::new(
                    &[
                        (LeftArm, 1),
                        (LeftTorso, 1),
                        (CenterTorso, 1),
                        (RightTorso, 1),
                        (RightArm, 1),
                        (Head, 1),
                    ],
                    6,
                ),
                Arc::Left => HitTable::new(
                    &[(LeftTorso, 2), (LeftArm, 2), (CenterTorso, 1), (Head, 1)],
                    6,
                ),
                Arc::Right => HitTable::new(
                    &[(RightTorso, 2), (RightArm, 2), (CenterTorso, 1), (Head, 1)],
                    6,
                ),
            },
            (UnitKind::Mech, TableKind::Kick) => match side {
                Arc::Front | Arc::Rear => HitTable::new(&[(LeftLeg, 3), (RightLeg, 3)], 6),
                Arc::Left => HitTable::new(&[(LeftLeg, 6)], 6),
                Arc::Right => HitTable::new(&[(RightLeg, 6)], 6),
            },
            (UnitKind::Mech, TableKind::Standard) => match side {
                Arc::Front | Arc::Rear => HitTable::new(
                    &[
                        (Head, 1),
                        (CenterTorso, 7),
                        (RightArm, 5),
                        (RightTorso, 5),
                        (LeftTorso, 5),
                        (LeftArm, 5),
                        (RightLeg, 4),
                        (LeftLeg, 4),
                    ],
                    36,
                ),
                Arc::Left => HitTable::new(
                    &[
                        (LeftTorso, 7),
                        (LeftLeg, 7),
                        (LeftArm, 7),
                        (CenterTorso, 5),
                        (RightTorso, 4),
                        (RightArm, 3),
                        (RightLeg, 2),
                        (Head, 1),
                    ],
                    36,
                ),
                Arc::Right => HitTable::new(
                    &[
                        (RightTorso, 7),
                        (RightLeg, 7),
                        (RightArm, 7),
                        (CenterTorso, 5),
                        (LeftTorso, 4),
                        (LeftArm, 3),
                        (LeftLeg, 2),
                        (Head, 1),
                    ],
                    36,
                ),
            },
            (UnitKind::Tank, _) => match side {
                Arc::Front => HitTable::new(&[(Front, 22), (Right, 4), (Left, 4), (Turret, 6)], 36),
                Arc::Left => HitTable::new(&[(Left, 26), (Front, 4), (Rear, 3), (Turret, 3)], 36),
                Arc::Right => HitTable::new(&[(Right, 26), (Front, 4), (Rear, 3), (Turret, 3)], 36),
                Arc::Rear => HitTable::new(&[(Rear, 26), (Left, 4), (Right, 3), (Turret, 3)], 36),
            },
            (UnitKind::Aero, _) => match side {
                Arc::Front => HitTable::new(&[(Nose, 26), (LeftWing, 4), (RightWing, 3), (Aft, 3)], 36),
                Arc::Left => HitTable::new(&[(LeftWing, 26), (Nose, 4), (Aft, 3), (RightWing, 3)], 36),
                Arc::Right => HitTable::new(&[(RightWing, 26), (Nose, 4), (Aft, 3), (LeftWing, 3)], 36),
                Arc::Rear => HitTable::new(&[(Aft, 26), (LeftWing, 4), (RightWing, 3), (Nose, 3)], 36),
            },
            (UnitKind::Infantry, _) => HitTable::new(&[(Body, 36)], 36),
        }
    }

    fn new(entries: &'static [(Location, u8)], denominator: u8) -> HitTable {
        HitTable {
            entries,
            denominator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(table: HitTable) -> f64 {
        table.probabilities().map(|(_, p)| p).sum()
    }

    #[test]
    fn test_all_tables_sum_to_one() {
        let kinds = [UnitKind::Mech, UnitKind::Tank, UnitKind::Infantry, UnitKind::Aero];
        let sides = [Arc::Front, Arc::Left, Arc::Right, Arc::Rear];
        let tables = [TableKind::Standard, TableKind::Punch, TableKind::Kick];
        for kind in kinds {
            for side in sides {
                for table in tables {
                    let sum = total(HitTable::lookup(kind, side, table));
                    assert!((sum - 1.0).abs() < 1e-9, "{:?} {:?} {:?}", kind, side, table);
                }
            }
        }
    }

    #[test]
    fn test_mech_head_is_one_in_36() {
        let table = HitTable::lookup(UnitKind::Mech, Arc::Front, TableKind::Standard);
        assert!((table.probability_of(Location::Head) - 1.0 / 36.0).abs() < 1e-9);
        assert!((table.probability_of(Location::CenterTorso) - 7.0 / 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_kick_only_hits_legs() {
        let table = HitTable::lookup(UnitKind::Mech, Arc::Front, TableKind::Kick);
        assert!(table.probabilities().all(|(l, _)| l.is_leg()));
    }
}
