//! The bot: movement enumeration, fire control, path ranking and the
//! background worker that keeps enemy movement current

pub mod behavior;
pub mod constants;
pub mod decision;
pub mod entity_state;
pub mod fire_control;
pub mod movement;
pub mod path_ranker;
pub mod precognition;

pub use behavior::{load_behavior, BehaviorSettings, BehaviorWeights, WithdrawalConfig};
pub use decision::{AttackDeclaration, FiringDecision, MoveDecision, Princess};
pub use entity_state::EntityState;
pub use fire_control::{FireControl, FiringPlan, WeaponFireInfo};
pub use movement::{MovePath, PathEnumerator, ReachableSet, ReachableTable};
pub use path_ranker::{best_ranked, BasicPathRanker, RankBreakdown, RankedPath, TurnBaseline};
pub use precognition::{Precognition, PrecognitionState};
