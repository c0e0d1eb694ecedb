//! Minimal rigid body and ground queries
//!
//! Stands in for the host physics: forces are queued during a step and
//! applied when the body integrates, after the controller has written its
//! velocity. Ground contact is a downward probe against flat surfaces.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::volume::Aabb;
use crate::consts::GRAVITY;

/// How a queued force changes velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force, scaled by mass and step length
    Force,
    /// Continuous acceleration, scaled by step length
    Acceleration,
    /// Instant change, scaled by mass
    Impulse,
    /// Instant velocity change
    VelocityChange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading around +Y in degrees (0 faces +Z)
    pub yaw: f32,
    pub mass: f32,
    /// Linear damping per second
    pub drag: f32,
    /// Apply engine gravity while integrating
    pub use_gravity: bool,
    /// Queued per-second acceleration (forces and accelerations)
    #[serde(skip)]
    acceleration: Vec3,
    /// Queued instant velocity change (impulses and velocity changes)
    #[serde(skip)]
    kick: Vec3,
}

impl Body {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            mass: 1.0,
            drag: 0.0,
            use_gravity: true,
            acceleration: Vec3::ZERO,
            kick: Vec3::ZERO,
        }
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass.max(f32::EPSILON);
        self
    }

    /// Queue a force to be applied at the next integration
    pub fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::Force => self.acceleration += force / self.mass,
            ForceMode::Acceleration => self.acceleration += force,
            ForceMode::Impulse => self.kick += force / self.mass,
            ForceMode::VelocityChange => self.kick += force,
        }
    }

    /// Apply queued forces, drag and gravity, then move
    pub fn integrate(&mut self, dt: f32) {
        if self.use_gravity {
            self.velocity.y += GRAVITY * dt;
        }
        self.velocity += self.acceleration * dt + self.kick;
        self.velocity *= (1.0 - self.drag * dt).max(0.0);
        self.acceleration = Vec3::ZERO;
        self.kick = Vec3::ZERO;

        self.position += self.velocity * dt;
    }

    /// Push the body out of any surface it sank into and stop its fall
    pub fn resolve_ground<G: GroundProbe + ?Sized>(&mut self, ground: &G, half_height: f32) {
        let head = self.position + Vec3::Y * half_height;
        if let Some(surface) = ground.cast_down(head, half_height * 2.0) {
            let feet = self.position.y - half_height;
            if feet < surface {
                self.position.y = surface + half_height;
                self.velocity.y = self.velocity.y.max(0.0);
            }
        }
    }

    fn rotation(&self) -> Quat {
        // Positive yaw turns clockwise seen from above
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Facing direction on the ground plane
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    /// Right-hand direction on the ground plane
    pub fn right(&self) -> Vec3 {
        -(self.rotation() * Vec3::X)
    }
}

/// Something that can answer "what is below this point"
pub trait GroundProbe {
    /// Height of the first surface within `max_distance` below `origin`
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<f32>;
}

/// Infinite floor at a fixed height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl GroundProbe for FlatGround {
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        let drop = origin.y - self.height;
        (drop >= 0.0 && drop <= max_distance).then_some(self.height)
    }
}

/// The top faces of a set of boxes
impl GroundProbe for [Aabb] {
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        self.iter()
            .filter(|b| b.covers_xz(origin))
            .map(|b| b.top())
            .filter(|top| {
                let drop = origin.y - top;
                drop >= 0.0 && drop <= max_distance
            })
            .reduce(f32::max)
    }
}

impl<T: GroundProbe + ?Sized> GroundProbe for &T {
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        (**self).cast_down(origin, max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_modes() {
        let mut body = Body::new(Vec3::ZERO).with_mass(2.0);
        body.use_gravity = false;
        body.add_force(Vec3::new(4.0, 0.0, 0.0), ForceMode::Impulse);
        body.add_force(Vec3::new(0.0, 0.0, 1.0), ForceMode::VelocityChange);
        body.integrate(0.5);
        assert_eq!(body.velocity, Vec3::new(2.0, 0.0, 1.0));
        assert_eq!(body.position, Vec3::new(1.0, 0.0, 0.5));

        // Queues are cleared after integrating
        body.integrate(0.5);
        assert_eq!(body.velocity, Vec3::new(2.0, 0.0, 1.0));
    }

    #[test]
    fn test_gravity_and_acceleration() {
        let mut body = Body::new(Vec3::ZERO);
        body.add_force(Vec3::new(0.0, 9.81, 0.0), ForceMode::Acceleration);
        body.integrate(0.1);
        assert!(body.velocity.y.abs() < 1e-5);
    }

    #[test]
    fn test_directions_follow_yaw() {
        let mut body = Body::new(Vec3::ZERO);
        assert!((body.forward() - Vec3::Z).length() < 1e-6);
        assert!((body.right() - Vec3::NEG_X).length() < 1e-6);

        body.yaw = 90.0;
        // Turning right swings forward toward the old right
        assert!((body.forward() - Vec3::NEG_X).length() < 1e-5);
        assert!((body.right() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_flat_ground_probe() {
        let ground = FlatGround { height: 0.0 };
        assert_eq!(ground.cast_down(Vec3::new(0.0, 1.0, 0.0), 1.1), Some(0.0));
        assert_eq!(ground.cast_down(Vec3::new(0.0, 2.0, 0.0), 1.1), None);
        assert_eq!(ground.cast_down(Vec3::new(0.0, -1.0, 0.0), 1.1), None);
    }

    #[test]
    fn test_box_probe_takes_highest_surface() {
        let boxes = [
            Aabb::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0)),
            Aabb::new(Vec3::new(0.0, 0.25, 0.0), Vec3::new(1.0, 0.25, 1.0)),
        ];
        assert_eq!(boxes[..].cast_down(Vec3::new(0.0, 1.2, 0.0), 2.0), Some(0.5));
        assert_eq!(boxes[..].cast_down(Vec3::new(5.0, 1.2, 0.0), 2.0), Some(0.0));
    }

    #[test]
    fn test_resolve_ground_stops_fall() {
        let mut body = Body::new(Vec3::new(0.0, 0.8, 0.0));
        body.velocity.y = -3.0;
        body.resolve_ground(&FlatGround { height: 0.0 }, 1.0);
        assert_eq!(body.position.y, 1.0);
        assert_eq!(body.velocity.y, 0.0);
    }
}
