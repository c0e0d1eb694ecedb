//! Lane boundary shared by every runner

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::BoundaryConfig;

/// Left/right limits a runner may strafe between
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    left: f32,
    right: f32,
}

impl Boundary {
    pub fn new(left: f32, right: f32) -> Result<Self, ConfigError> {
        if !(left < right) {
            return Err(ConfigError::InvalidBoundary { left, right });
        }
        Ok(Self { left, right })
    }

    pub fn from_config(config: &BoundaryConfig) -> Result<Self, ConfigError> {
        Self::new(config.left, config.right)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.left
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.right
    }

    /// Whether a step to the left may start from `x`
    #[inline]
    pub fn can_step_left(&self, x: f32) -> bool {
        x > self.left
    }

    /// Whether a step to the right may start from `x`
    #[inline]
    pub fn can_step_right(&self, x: f32) -> bool {
        x < self.right
    }
}

impl Default for Boundary {
    fn default() -> Self {
        let config = BoundaryConfig::default();
        Self {
            left: config.left,
            right: config.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_limits() {
        assert!(Boundary::new(1.0, -1.0).is_err());
        assert!(Boundary::new(1.0, 1.0).is_err());
        assert!(Boundary::new(f32::NAN, 1.0).is_err());
    }

    #[test]
    fn test_step_checks_use_current_position() {
        let b = Boundary::new(-4.5, 4.5).expect("valid");
        assert!(b.can_step_right(4.4));
        assert!(!b.can_step_right(4.5));
        assert!(b.can_step_left(-4.4));
        assert!(!b.can_step_left(-4.5));
    }
}
