//! Targets that fade from white to red as they take damage

use glam::Vec4;
use serde::{Deserialize, Serialize};

const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
const WHITE: Vec4 = Vec4::ONE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destroyable {
    max_health: f32,
    health: f32,
    /// Tint as RGBA
    color: Vec4,
}

impl Default for Destroyable {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Destroyable {
    pub fn new(max_health: f32) -> Self {
        let max_health = max_health.max(f32::EPSILON);
        Self {
            max_health,
            health: max_health,
            color: WHITE,
        }
    }

    /// Negative damage heals
    pub fn take_damage(&mut self, damage: f32) {
        self.health = (self.health - damage).clamp(0.0, self.max_health);
        self.color = RED.lerp(WHITE, self.health / self.max_health);
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_tints_toward_red() {
        let mut target = Destroyable::new(100.0);
        assert_eq!(target.color(), WHITE);

        target.take_damage(50.0);
        assert_eq!(target.health(), 50.0);
        assert_eq!(target.color(), Vec4::new(1.0, 0.5, 0.5, 1.0));

        target.take_damage(500.0);
        assert_eq!(target.health(), 0.0);
        assert_eq!(target.color(), RED);
        assert!(target.is_destroyed());
    }

    #[test]
    fn test_healing_is_capped() {
        let mut target = Destroyable::new(100.0);
        target.take_damage(-40.0);
        assert_eq!(target.health(), 100.0);
        assert_eq!(target.color(), WHITE);
    }
}
