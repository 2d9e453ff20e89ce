//! Board model: hex geometry, terrain, elevation, line of sight
//!
//! Read-only during evaluation. The authoritative engine owns the real
//! board; the decision core only ever sees a snapshot of it.

pub mod hex;
pub mod map;
pub mod terrain;

pub use hex::{Arc, Facing, HexCoord};
pub use map::{Board, Hex, HomeEdge, LineOfSight};
pub use terrain::{Building, Terrain};
