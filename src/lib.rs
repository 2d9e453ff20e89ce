//! Princess - tactical decision core for a hex-based armored combat bot
//!
//! Given a read-only snapshot of the game, the bot enumerates where a unit
//! can move, estimates what every unit can shoot, scores each candidate
//! path and declares its attacks.

pub mod board;
pub mod core;
pub mod game;
pub mod princess;
pub mod units;
