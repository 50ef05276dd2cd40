use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating a [`crate::PlannerConfig`].
///
/// Nothing on the per-tick path returns an error; a step that cannot act
/// declines instead.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field, reason: reason.into() }
    }

    /// Whether retrying with the same input could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ConfigError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
