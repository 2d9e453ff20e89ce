//! Movement search: steps, paths, per-kind rules and the enumerator

pub mod aero;
pub mod enumerator;
pub mod ground;
pub mod path;
pub mod piloting;
pub mod reachable;
pub mod region;
pub mod rules;
pub mod step;

pub use enumerator::{Enumeration, PathEnumerator};
pub use path::{MovePath, PathKey};
pub use piloting::{PilotingRoll, RollReason};
pub use reachable::{ReachableSet, ReachableTable};
pub use region::ConvexRegion;
pub use rules::{rules_for, searches_for, MovementRules};
pub use step::{MoveStep, StepKind};
