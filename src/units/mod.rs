//! Unit model: unit records, hit locations and weapons

pub mod location;
pub mod unit;
pub mod weapon;

pub use location::{HitTable, Location, TableKind};
pub use unit::{LocationStatus, MovementMode, Unit, UnitKind};
pub use weapon::{RangeBracket, Weapon, WeaponClass};
