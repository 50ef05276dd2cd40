//! Reference tactician thresholds

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticsConfig {
    // === Challenge ===
    /// Closest a defensive node sits to the enemy contact point (default: 18.0)
    pub min_defensive_node_distance: f32,
    /// Below this ball advantage (s) the tactician challenges instead of
    /// attacking (default: 0.5)
    pub challenge_advantage_threshold_secs: f32,

    // === Movement ===
    /// Distance counted as "arrived" at a ground target (default: 3.0)
    pub arrival_radius: f32,
    /// Car height above which we are airborne without wheel contact (default: 1.0)
    pub airborne_height: f32,
}

impl TacticsConfig {
    pub(super) fn validate(&self) -> Result<()> {
        check_distance("tactics.min_defensive_node_distance", self.min_defensive_node_distance)?;
        check_distance("tactics.arrival_radius", self.arrival_radius)?;
        check_distance("tactics.airborne_height", self.airborne_height)?;
        if !self.challenge_advantage_threshold_secs.is_finite() {
            return Err(ConfigError::invalid("tactics.challenge_advantage_threshold_secs", "must be finite"));
        }
        Ok(())
    }
}

fn check_distance(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(field, format!("must be a finite non-negative distance, got {value}")));
    }
    Ok(())
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            min_defensive_node_distance: 18.0,
            challenge_advantage_threshold_secs: 0.5,
            arrival_radius: 3.0,
            airborne_height: 1.0,
        }
    }
}
