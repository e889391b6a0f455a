//! Error types.
//!
//! Scoring never fails. Only loading and validating configuration does.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("weight `{name}` must be a finite, non-negative number (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("bot weights must sum to 1.0 (got {0:.3})")]
    BotWeightSum(f64),

    #[error("thresholds must satisfy 100 >= critical > high > medium > 0 (got {critical}/{high}/{medium})")]
    InvalidThresholds { critical: u8, high: u8, medium: u8 },
}
