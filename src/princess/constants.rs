//! Decision core constants - fixed rule values in one place
//!
//! Tunable weights live in behavior files and `DecisionConfig`; these are
//! the values the rules themselves fix.

// Dice
pub const MIN_ROLL: i32 = 2;
pub const MAX_ROLL: i32 = 12;
/// To-hit sentinel for attacks the rules do not allow
pub const IMPOSSIBLE_TO_HIT: i32 = 10_000;

// Criticals
pub const EXPECTED_CRITS_PER_ROLL: f64 = 22.0 / 36.0; // 0.61 crits per critical roll
pub const NATURAL_CRIT_CHANCE: f64 = 1.0 / 36.0; // through-armor crit on a roll of 2

// Physical attacks
pub const KICK_CONSIDER_THRESHOLD: f64 = 0.5;
pub const KICK_TO_HIT_BONUS: i32 = -2;

// An unmoved enemy that can get round to a side or rear arc hits thinner armor
pub const FLANK_EXPOSURE_FACTOR: f64 = 0.5;

// Heat scale thresholds for attacker to-hit penalties
pub const HEAT_TO_HIT_STEPS: [(u32, i32); 4] = [(24, 4), (17, 3), (13, 2), (8, 1)];

// Aerospace short circuits (ranker)
pub const AERO_STALL_UTILITY: f64 = -1000.0;
pub const AERO_CRASH_UTILITY: f64 = -10_000.0;
pub const AERO_FLY_OFF_UTILITY: f64 = -5.0;

// Terrain guard (ranker)
pub const BUILDING_COLLAPSE_JUMP_UTILITY: f64 = -1000.0;
pub const BUILDING_COLLAPSE_UTILITY: f64 = -500.0;

// Withdrawal and facing (ranker)
pub const WITHDRAWAL_PENALTY_FACTOR: f64 = 100.0;
pub const FACING_PENALTY_PER_HEXSIDE: f64 = 50.0;

// Movement
pub const MECH_MAX_ELEVATION_CHANGE: u32 = 2;
pub const VEHICLE_MAX_ELEVATION_CHANGE: u32 = 1;
pub const STAND_UP_COST: u32 = 2;
pub const HULL_DOWN_COST: u32 = 2;
/// Mechs rise out of hull-down like standing; vehicles just drive off
pub const MECH_HULL_UP_COST: u32 = 2;
pub const AERO_MIN_SAFE_ALTITUDE: u32 = 1;
pub const AERO_MAX_ALTITUDE: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_severity_ordering() {
        assert!(AERO_CRASH_UTILITY < AERO_STALL_UTILITY);
        assert!(AERO_STALL_UTILITY < AERO_FLY_OFF_UTILITY);
        assert!(BUILDING_COLLAPSE_JUMP_UTILITY < BUILDING_COLLAPSE_UTILITY);
    }

    #[test]
    fn test_heat_steps_descending() {
        for pair in HEAT_TO_HIT_STEPS.windows(2) {
            assert!(pair[0].0 > pair[1].0);
        }
    }

    #[test]
    fn test_impossible_beyond_any_roll() {
        assert!(IMPOSSIBLE_TO_HIT > MAX_ROLL);
    }
}
