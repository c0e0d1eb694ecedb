//! Mouse look for the first-person camera
//!
//! Pitch lives on the camera and is clamped; yaw turns the whole body so
//! that walking forward follows the view.

use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::settings::LookConfig;

const PITCH_LIMIT: f32 = 90.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LookInput {
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Primary button went down this frame
    pub click: bool,
    /// Pointer is over a UI element
    pub pointer_over_ui: bool,
    /// Cancel went down this frame
    pub cancel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Look {
    config: LookConfig,
    /// Degrees, positive looks down
    pitch: f32,
    cursor_locked: bool,
}

impl Look {
    pub fn new(config: &LookConfig) -> Self {
        Self {
            config: *config,
            pitch: 0.0,
            cursor_locked: config.lock_cursor,
        }
    }

    pub fn update(&mut self, input: &LookInput, body: &mut Body, dt: f32) {
        self.check_cursor(input);

        let yaw = input.mouse_x * self.config.sensitivity * dt;
        let pitch = input.mouse_y * self.config.sensitivity * dt;

        self.pitch = (self.pitch - pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        body.yaw += yaw;
    }

    fn check_cursor(&mut self, input: &LookInput) {
        if input.click && !input.pointer_over_ui && self.config.lock_cursor {
            self.cursor_locked = true;
        }
        if input.cancel {
            self.cursor_locked = false;
        }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }
}
