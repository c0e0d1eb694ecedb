//! Endless Run - lane runner and first-person sandbox simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (runner, character controller, elevator, spawner)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `hud`: Text display surface for counters
//! - `audio`: Fire-and-forget sound triggers
//! - `error`: Configuration errors reported at construction time

pub mod audio;
pub mod error;
pub mod hud;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (200 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 200.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Lane limits for the runner
    pub const LANE_LEFT: f32 = -4.5;
    pub const LANE_RIGHT: f32 = 4.5;

    /// Engine gravity (m/s²)
    pub const GRAVITY: f32 = -9.81;
    /// Scale so that a gravity modifier of 1 feels natural
    pub const STATIC_GRAVITY_MODIFIER: f32 = 2.0;
    /// Slack when deciding whether sliding velocity beats input velocity
    pub const SLIDE_MARGIN: f32 = 0.09;

    /// Squared distance at which an elevator counts as arrived
    pub const ARRIVAL_SQR_MARGIN: f32 = 0.1;

    /// Name suffix given to spawned segment copies
    pub const CLONE_SUFFIX: &str = "(Clone)";
}

/// Smooth step: Hermite interpolation with `t` clamped to [0, 1]
#[inline]
pub fn smooth_step(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let t = -2.0 * t * t * t + 3.0 * t * t;
    to * t + from * (1.0 - t)
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
#[inline]
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let dist = to_target.length();
    if dist <= max_delta || dist == 0.0 {
        return target;
    }
    current + to_target / dist * max_delta
}

/// Modulo that is always non-negative for a positive `len`
#[inline]
pub fn wrap_index(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}
