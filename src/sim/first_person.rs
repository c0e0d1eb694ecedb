//! First-person character controller
//!
//! Runs once per physics step: ground check, input movement, jump, then
//! force application. Movement is applied as an instant velocity while the
//! jump is an extra velocity change on top; vertical velocity is always
//! left to the physics integration.

use glam::Vec3;

use super::body::{Body, ForceMode, GroundProbe};
use super::flags::MovementState;
use crate::consts::{GRAVITY, SLIDE_MARGIN, STATIC_GRAVITY_MODIFIER};
use crate::error::ConfigError;
use crate::settings::MovementConfig;

/// Polled input for one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    /// Strafe axis, -1 (left) to 1 (right)
    pub horizontal: f32,
    /// Forward axis, -1 (back) to 1 (forward)
    pub vertical: f32,
    /// Jump went down this step
    pub jump_pressed: bool,
    /// Sprint is held
    pub sprint: bool,
}

/// Anything a slippery surface can put into a sliding state
pub trait Slidable {
    fn set_sliding(&mut self, sliding: bool);
}

#[derive(Debug, Clone)]
pub struct FirstPersonMovement {
    pub body: Body,
    config: MovementConfig,
    state: MovementState,
    /// Time of the last jump
    last_jump: f64,
}

impl FirstPersonMovement {
    pub fn new(config: &MovementConfig, mut body: Body) -> Result<Self, ConfigError> {
        config.validate()?;
        // Custom gravity replaces the engine's
        body.use_gravity = false;
        Ok(Self {
            body,
            config: *config,
            state: MovementState::empty(),
            last_jump: f64::NEG_INFINITY,
        })
    }

    /// One physics step; the caller integrates the body afterwards
    pub fn fixed_step<G: GroundProbe + ?Sized>(&mut self, input: &MoveInput, ground: &G, now: f64) {
        self.ground_check(ground, now);

        let move_velocity = self.movement_vector(input);
        let jump_velocity = self.jump_vector(input, now);

        self.apply_movement(move_velocity, jump_velocity, input.sprint);
    }

    fn ground_check<G: GroundProbe + ?Sized>(&mut self, ground: &G, now: f64) {
        // Right after a jump the probe would still touch the floor
        if self.state.contains(MovementState::JUMPING)
            && now - (self.config.jump_time as f64) < self.last_jump
        {
            return;
        }

        let half_height = self.config.height / 2.0;
        let probe = half_height + self.config.fall_buffer;

        match ground.cast_down(self.body.position, probe) {
            Some(surface) => {
                self.state.set(MovementState::JUMPING | MovementState::FALLING, false);
                self.body.position.y = surface + half_height;
            }
            None => self.state.set(MovementState::FALLING, true),
        }
    }

    fn movement_vector(&mut self, input: &MoveInput) -> Vec3 {
        let mut velocity = self.body.right() * input.horizontal + self.body.forward() * input.vertical;

        if self.state.contains(MovementState::IMMOBILIZED) {
            velocity = Vec3::ZERO;
        }

        self.state.set(MovementState::MOVING, velocity != Vec3::ZERO);

        // Diagonals move at the same speed as straight lines
        velocity.normalize_or_zero() * self.config.move_speed
    }

    fn jump_vector(&mut self, input: &MoveInput, now: f64) -> Vec3 {
        if self.state.intersects(MovementState::NO_JUMP) || !input.jump_pressed {
            return Vec3::ZERO;
        }

        self.state.insert(MovementState::JUMPING);
        self.last_jump = now;
        Vec3::Y * self.config.jump_force
    }

    fn apply_movement(&mut self, mut move_velocity: Vec3, jump_velocity: Vec3, sprint: bool) {
        self.body.add_force(jump_velocity, ForceMode::VelocityChange);

        let gravity = Vec3::Y * GRAVITY * self.config.gravity_modifier * STATIC_GRAVITY_MODIFIER;
        self.body.add_force(gravity, ForceMode::Acceleration);

        if !self.state.contains(MovementState::FALLING) && sprint {
            move_velocity *= self.config.sprint_modifier;
        }

        // Keep momentum on slippery ground unless input is clearly stronger
        if self.state.contains(MovementState::SLIDING) {
            let current = self.body.velocity;
            if current.x.abs() + SLIDE_MARGIN > move_velocity.x.abs() {
                move_velocity.x = current.x;
            }
            if current.z.abs() + SLIDE_MARGIN > move_velocity.z.abs() {
                move_velocity.z = current.z;
            }
        }

        move_velocity.y = self.body.velocity.y;
        self.body.velocity = move_velocity;
    }

    /// Shove the character with an external impulse
    pub fn add_knockback(&mut self, impulse: Vec3) {
        self.state.insert(MovementState::KNOCKBACK);
        self.body.add_force(impulse, ForceMode::Impulse);
    }

    /// Hand control back after a knockback
    pub fn clear_knockback(&mut self) {
        self.state.remove(MovementState::KNOCKBACK);
    }

    pub fn set_immobilized(&mut self, immobilized: bool) {
        self.state.set(MovementState::IMMOBILIZED, immobilized);
    }

    pub fn is_sliding(&self) -> bool {
        self.state.contains(MovementState::SLIDING)
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn half_height(&self) -> f32 {
        self.config.height / 2.0
    }
}

impl Slidable for FirstPersonMovement {
    fn set_sliding(&mut self, sliding: bool) {
        log::debug!("Sliding {}", if sliding { "on" } else { "off" });
        self.state.set(MovementState::SLIDING, sliding);
    }
}
