//! Game context consumed by the decision core

pub mod events;
pub mod snapshot;

pub use events::GameEvent;
pub use snapshot::{GameOptions, GameSnapshot, Phase, StrategicTarget};
