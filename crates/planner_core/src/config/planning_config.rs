//! Plan execution configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::plan::DEFAULT_FALLBACK_DURATION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// How long a retryable plan stays on its fallback before retrying its
    /// preferred steps (default: 500)
    pub fallback_duration_ms: u64,
}

impl PlanningConfig {
    pub fn fallback_duration(&self) -> Duration {
        Duration::from_millis(self.fallback_duration_ms)
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.fallback_duration_ms == 0 {
            return Err(ConfigError::invalid("planning.fallback_duration_ms", "must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self { fallback_duration_ms: DEFAULT_FALLBACK_DURATION.as_millis() as u64 }
    }
}
