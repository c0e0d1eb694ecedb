//! Configuration errors
//!
//! Everything that can go wrong is caught when a behaviour is built.
//! Per-tick operations never fail once construction succeeded.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lane boundary left ({left}) must be less than right ({right})")]
    InvalidBoundary { left: f32, right: f32 },
    #[error("elevator needs at least one destination")]
    NoDestinations,
    #[error("segment spawner needs at least one prefab")]
    NoSegments,
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidValue { name: &'static str, value: f32 },
    #[error("{name} must be greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Reject NaN, infinities and negative values
    pub(crate) fn check_non_negative(name: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue { name, value })
        }
    }

    /// Reject anything that is not a finite value above zero
    pub(crate) fn check_positive(name: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NotPositive { name, value })
        }
    }
}
