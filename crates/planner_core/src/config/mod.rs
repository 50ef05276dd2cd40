//! # Planner Configuration
//!
//! All tuning constants in one place, loadable from JSON or YAML.
//!
//! ## Usage
//! ```rust
//! use planner_core::config::PlannerConfig;
//!
//! let config = PlannerConfig::default();
//! let aggressive = PlannerConfig::aggressive();
//! assert!(aggressive.validate().is_ok());
//! ```

mod planning_config;
mod tactics_config;

pub use planning_config::PlanningConfig;
pub use tactics_config::TacticsConfig;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlannerConfig {
    /// Plan execution settings
    #[serde(default)]
    pub planning: PlanningConfig,
    /// Reference tactician thresholds
    #[serde(default)]
    pub tactics: TacticsConfig,
}

impl PlannerConfig {
    /// Commits to challenges earlier and retries preferred steps sooner.
    pub fn aggressive() -> Self {
        let mut cfg = Self::default();
        cfg.planning.fallback_duration_ms = 250;
        cfg.tactics.challenge_advantage_threshold_secs = 0.2;
        cfg.tactics.min_defensive_node_distance = 12.0;
        cfg
    }

    /// Holds the fallback longer and keeps a deeper defensive node.
    pub fn cautious() -> Self {
        let mut cfg = Self::default();
        cfg.planning.fallback_duration_ms = 1_000;
        cfg.tactics.challenge_advantage_threshold_secs = 1.0;
        cfg.tactics.min_defensive_node_distance = 25.0;
        cfg
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            _ => return Err(ConfigError::UnsupportedFormat { path: path.to_path_buf() }),
        };

        let text = fs::read_to_string(path)?;
        let cfg = parse(&text)?;
        log::info!("Loaded planner config from {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.planning.validate()?;
        self.tactics.validate()
    }
}
