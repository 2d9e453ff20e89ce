//! Behavior settings loaded from TOML
//!
//! A behavior is the numeric personality of one bot: how much it values
//! dealing damage against taking it, how hard it closes with the enemy,
//! and when it runs for home.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::board::HomeEdge;
use crate::core::error::{PrincessError, Result};

/// Weights applied by the path ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorWeights {
    /// Added to expected fall damage to make falling embarrassing
    pub fall_shame: f64,
    /// Multiplier on damage dealt against damage taken
    pub foolish_bravery: f64,
    /// Penalty per hex of distance to the nearest enemy
    pub hyper_aggression: f64,
    /// Scale of the retreat bonus and penalty
    pub self_preservation: f64,
    /// Penalty per hex of distance to the friendly centroid
    pub herd_mentality: f64,
}

impl Default for BehaviorWeights {
    fn default() -> Self {
        Self {
            fall_shame: 10.0,
            foolish_bravery: 1.0,
            hyper_aggression: 2.5,
            self_preservation: 30.0,
            herd_mentality: 1.0,
        }
    }
}

/// When and where to withdraw
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalConfig {
    /// Board edge the team retreats toward
    #[serde(default)]
    pub home_edge: HomeEdge,
    /// Crippled units head for home
    #[serde(default)]
    pub forced_withdrawal: bool,
    /// Every unit heads for home
    #[serde(default)]
    pub auto_flee: bool,
}

/// Complete behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSettings {
    /// Name of this behavior (set from filename)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weights: BehaviorWeights,
    #[serde(default)]
    pub withdrawal: WithdrawalConfig,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            weights: BehaviorWeights::default(),
            withdrawal: WithdrawalConfig {
                home_edge: HomeEdge::North,
                forced_withdrawal: true,
                auto_flee: false,
            },
        }
    }
}

impl BehaviorSettings {
    /// Parse and validate a behavior from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: BehaviorSettings = toml::from_str(contents)?;
        settings.validate().map_err(PrincessError::InvalidConfig)?;
        Ok(settings)
    }

    /// Should a unit in this state be heading home?
    pub fn wants_withdrawal(&self, crippled: bool) -> bool {
        self.withdrawal.auto_flee || (crippled && self.withdrawal.forced_withdrawal)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let w = &self.weights;
        let named = [
            ("fall_shame", w.fall_shame),
            ("foolish_bravery", w.foolish_bravery),
            ("hyper_aggression", w.hyper_aggression),
            ("self_preservation", w.self_preservation),
            ("herd_mentality", w.herd_mentality),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Load behavior from TOML file
///
/// Loads from `data/behaviors/{name}.toml`
pub fn load_behavior(name: &str) -> Result<BehaviorSettings> {
    let path = behavior_path(name);
    let contents = fs::read_to_string(&path)?;
    let mut settings = BehaviorSettings::from_toml_str(&contents)?;
    settings.name = name.to_string();
    Ok(settings)
}

/// Get path to behavior file
fn behavior_path(name: &str) -> PathBuf {
    PathBuf::from("data/behaviors").join(format!("{}.toml", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_behavior() {
        let behavior = load_behavior("default").expect("Should load default behavior");
        assert_eq!(behavior.name, "default");
        assert!(behavior.weights.self_preservation > 0.0);
    }

    #[test]
    fn test_load_berserker_behavior() {
        let behavior = load_behavior("berserker").expect("Should load berserker behavior");
        let default = BehaviorSettings::default();
        assert!(behavior.weights.foolish_bravery > default.weights.foolish_bravery);
        assert!(!behavior.withdrawal.forced_withdrawal);
    }

    #[test]
    fn test_missing_behavior_is_io_error() {
        assert!(matches!(load_behavior("no_such_behavior"), Err(PrincessError::Io(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let behavior = BehaviorSettings::from_toml_str(
            r#"
            [withdrawal]
            home_edge = "South"
            "#,
        )
        .expect("partial behavior should parse");
        assert_eq!(behavior.withdrawal.home_edge, HomeEdge::South);
        assert_eq!(behavior.weights, BehaviorWeights::default());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = BehaviorSettings::from_toml_str(
            r#"
            [weights]
            fall_shame = 10.0
            foolish_bravery = 1.0
            hyper_aggression = -1.0
            self_preservation = 30.0
            herd_mentality = 1.0
            "#,
        );
        assert!(matches!(result, Err(PrincessError::InvalidConfig(_))));
    }

    #[test]
    fn test_withdrawal_triggers() {
        let mut behavior = BehaviorSettings::default();
        assert!(behavior.wants_withdrawal(true));
        assert!(!behavior.wants_withdrawal(false));
        behavior.withdrawal.auto_flee = true;
        assert!(behavior.wants_withdrawal(false));
    }
}
