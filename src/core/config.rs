//! Decision engine configuration with documented constants
//!
//! The behavior weights that describe *how* a bot plays live in
//! [`crate::princess::behavior::BehaviorSettings`]. This struct holds the
//! engine-level knobs: utility coefficients for firing plans and the
//! resource limits of the search.

use serde::{Deserialize, Serialize};

/// Configuration for the decision core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    // === FIRING PLAN UTILITY ===
    /// Utility per point of expected damage
    pub damage_utility: f64,

    /// Utility per expected critical hit
    ///
    /// Criticals destroy equipment and can cascade into ammo explosions,
    /// so one expected crit is worth about ten points of armor.
    pub critical_utility: f64,

    /// Utility of a certain kill (scaled by kill probability)
    pub kill_utility: f64,

    /// Utility per point of heat inflicted on a heat-tracking target
    pub heat_inflicted_value: f64,

    /// Disutility per point of heat above the shooter's dissipation capacity
    ///
    /// At 5.0, a plan must buy five points of damage for every point of
    /// overheat before the optimizer will accept it.
    pub overheat_disutility: f64,

    // === RANKING ===
    /// Multiplier applied to max-range damage estimates against enemies
    /// that have not moved yet
    ///
    /// Unmoved enemies may end anywhere in their reachable region, so both
    /// directions of the damage estimate are halved at the default.
    pub unmoved_enemy_discount: f64,

    // === SEARCH ===
    /// Optional cap on the number of nodes expanded per enumeration
    ///
    /// `None` keeps the search unbounded (move-point budgets still bound it).
    /// When set, the enumerator publishes what it has found so far.
    pub max_search_nodes: Option<usize>,

    // === PARALLELIZATION ===
    /// Minimum candidate path count before ranking runs on rayon
    ///
    /// Below this threshold, thread overhead exceeds benefits.
    pub parallel_threshold: usize,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            damage_utility: 1.0,
            critical_utility: 10.0,
            kill_utility: 50.0,
            heat_inflicted_value: 0.5,
            overheat_disutility: 5.0,

            unmoved_enemy_discount: 0.5,

            max_search_nodes: None,

            parallel_threshold: 64,
        }
    }
}

impl DecisionConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        let coefficients = [
            ("damage_utility", self.damage_utility),
            ("critical_utility", self.critical_utility),
            ("kill_utility", self.kill_utility),
            ("heat_inflicted_value", self.heat_inflicted_value),
            ("overheat_disutility", self.overheat_disutility),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} ({}) must be a non-negative number", name, value));
            }
        }

        if !(0.0..=1.0).contains(&self.unmoved_enemy_discount) {
            return Err(format!(
                "unmoved_enemy_discount ({}) must be within 0.0..=1.0",
                self.unmoved_enemy_discount
            ));
        }

        if self.max_search_nodes == Some(0) {
            return Err("max_search_nodes must be positive when set".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DecisionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_coefficient_rejected() {
        let config = DecisionConfig {
            kill_utility: -1.0,
            ..DecisionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discount_out_of_range_rejected() {
        let config = DecisionConfig {
            unmoved_enemy_discount: 1.5,
            ..DecisionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_node_budget_rejected() {
        let config = DecisionConfig {
            max_search_nodes: Some(0),
            ..DecisionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DecisionConfig = toml::from_str("kill_utility = 80.0").unwrap();
        assert_eq!(config.kill_utility, 80.0);
        assert_eq!(config.critical_utility, 10.0);
    }
}
