//! 2d6 odds

use crate::princess::constants::{MAX_ROLL, MIN_ROLL};

/// Ways to roll each total on 2d6, indexed by total
const WAYS: [u32; 13] = [0, 0, 1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1];

/// Probability of rolling `target` or better on 2d6
///
/// Anything at or below 2 always succeeds; anything above 12 (including
/// the impossible sentinel) never does.
pub fn probability_at_least(target: i32) -> f64 {
    if target <= MIN_ROLL {
        return 1.0;
    }
    if target > MAX_ROLL {
        return 0.0;
    }
    let ways: u32 = WAYS[target as usize..].iter().sum();
    ways as f64 / 36.0
}

/// Probability of rolling exactly `total` on 2d6
pub fn probability_exactly(total: i32) -> f64 {
    if !(MIN_ROLL..=MAX_ROLL).contains(&total) {
        return 0.0;
    }
    WAYS[total as usize] as f64 / 36.0
}
