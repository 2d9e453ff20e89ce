pub mod config;
pub mod error;
pub mod types;

pub use config::DecisionConfig;
pub use error::{PrincessError, Result};
pub use types::{TeamId, UnitId, WeaponId};
