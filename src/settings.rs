//! Game settings and tuning
//!
//! Every behaviour is configured from one serde tree so a level can be tuned
//! from a JSON file without recompiling. Missing fields fall back to the
//! defaults below.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::boundary::Boundary;
use crate::sim::elevator::{Activation, Deactivation};

/// Lateral lane limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub left: f32,
    pub right: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            left: LANE_LEFT,
            right: LANE_RIGHT,
        }
    }
}

/// Lane runner movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Forward speed along +Z (m/s)
    pub forward_speed: f32,
    /// Strafe speed (m/s)
    pub lateral_speed: f32,
    /// Vertical speed during the jump arc (m/s)
    pub jump_speed: f32,
    /// Duration of each half of the jump arc (seconds)
    pub jump_phase: f32,
    /// Lateral input and jumping stay locked until the countdown says go
    pub wait_for_countdown: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            forward_speed: 8.0,
            lateral_speed: 4.0,
            jump_speed: 5.0,
            jump_phase: 0.6,
            wait_for_countdown: true,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_non_negative("runner.lateral_speed", self.lateral_speed)?;
        ConfigError::check_non_negative("runner.jump_speed", self.jump_speed)?;
        ConfigError::check_positive("runner.jump_phase", self.jump_phase)?;
        // Negative forward speed runs the level backwards, which one layout uses
        if !self.forward_speed.is_finite() {
            return Err(ConfigError::InvalidValue {
                name: "runner.forward_speed",
                value: self.forward_speed,
            });
        }
        Ok(())
    }
}

/// How long the spawner waits before placing the next segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnDelay {
    /// Wait a fixed number of seconds
    Fixed { secs: f32 },
    /// Wait as many seconds as the index of the segment just drawn
    SegmentIndex,
}

/// Procedural level segment spawning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Prefab names; a spawned copy is named `<prefab>(Clone)`
    pub prefabs: Vec<String>,
    /// Z of the first spawned segment
    pub start_z: f32,
    /// Distance between consecutive segments
    pub segment_length: f32,
    pub delay: SpawnDelay,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self::sections()
    }
}

impl SpawnerConfig {
    /// Three 50 m sections, one every six seconds
    pub fn sections() -> Self {
        Self {
            prefabs: vec![String::from("Section"); 3],
            start_z: 50.0,
            segment_length: 50.0,
            delay: SpawnDelay::Fixed { secs: 6.0 },
        }
    }

    /// Three 120 m sections, delay taken from the drawn index
    pub fn endless_run() -> Self {
        Self {
            prefabs: vec![String::from("Section"); 3],
            start_z: 120.0,
            segment_length: 120.0,
            delay: SpawnDelay::SegmentIndex,
        }
    }

    /// Two sand floor tiles every two seconds
    pub fn sand_floor() -> Self {
        Self {
            prefabs: vec![String::from("SandFloor"); 2],
            start_z: 20.0,
            segment_length: 50.0,
            delay: SpawnDelay::Fixed { secs: 2.0 },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefabs.is_empty() {
            return Err(ConfigError::NoSegments);
        }
        ConfigError::check_positive("spawner.segment_length", self.segment_length)?;
        if let SpawnDelay::Fixed { secs } = self.delay {
            ConfigError::check_non_negative("spawner.delay", secs)?;
        }
        Ok(())
    }
}

/// Timed self-destruction of spawned segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifetimeConfig {
    /// Seconds a segment lives before it is checked for removal
    pub lifetime: f32,
    /// Only segments with exactly this name are removed
    pub marker: String,
}

impl Default for LifetimeConfig {
    fn default() -> Self {
        Self {
            lifetime: 100.0,
            marker: format!("Section{CLONE_SUFFIX}"),
        }
    }
}

/// 3-2-1-Go sequence at the start of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    /// Pause before the first number appears
    pub lead_in: f32,
    /// Time between cues
    pub interval: f32,
    /// First number shown
    pub from: u8,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            lead_in: 0.5,
            interval: 1.0,
            from: 3,
        }
    }
}

/// Distance counter cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceConfig {
    /// Seconds between distance increments
    pub delay: f32,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self { delay: 0.5 }
    }
}

/// First-person character controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub move_speed: f32,
    /// Set to 1 to disable sprinting
    pub sprint_modifier: f32,
    /// Upward velocity change applied on jump
    pub jump_force: f32,
    /// Time after a jump during which the ground is not checked
    pub jump_time: f32,
    /// Probe slack below the capsule
    pub fall_buffer: f32,
    pub gravity_modifier: f32,
    /// Capsule height
    pub height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            sprint_modifier: 1.5,
            jump_force: 10.0,
            jump_time: 0.35,
            fall_buffer: 0.1,
            gravity_modifier: 1.0,
            height: 2.0,
        }
    }
}

impl MovementConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("movement.move_speed", self.move_speed)?;
        ConfigError::check_positive("movement.sprint_modifier", self.sprint_modifier)?;
        ConfigError::check_non_negative("movement.jump_force", self.jump_force)?;
        ConfigError::check_non_negative("movement.jump_time", self.jump_time)?;
        ConfigError::check_non_negative("movement.fall_buffer", self.fall_buffer)?;
        ConfigError::check_non_negative("movement.gravity_modifier", self.gravity_modifier)?;
        ConfigError::check_positive("movement.height", self.height)?;
        Ok(())
    }
}

/// Mouse look
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    pub lock_cursor: bool,
    /// Degrees per second per unit of mouse axis
    pub sensitivity: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            lock_cursor: true,
            sensitivity: 100.0,
        }
    }
}

/// A moving platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConfig {
    /// Stops the platform loops between, starting at the first
    pub destinations: Vec<Vec3>,
    /// Full speed (m/s)
    pub move_speed: f32,
    /// Seconds to ease up to full speed (0 = instant)
    pub startup_time: f32,
    pub activation: Activation,
    pub deactivation: Deactivation,
    /// Half extents of the platform trigger volume
    pub half_extents: Vec3,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            destinations: vec![Vec3::ZERO, Vec3::new(0.0, 6.0, 0.0)],
            move_speed: 5.0,
            startup_time: 2.0,
            activation: Activation::Player,
            deactivation: Deactivation::Return,
            half_extents: Vec3::new(2.0, 0.25, 2.0),
        }
    }
}

impl ElevatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destinations.is_empty() {
            return Err(ConfigError::NoDestinations);
        }
        ConfigError::check_non_negative("elevator.move_speed", self.move_speed)?;
        ConfigError::check_non_negative("elevator.startup_time", self.startup_time)?;
        Ok(())
    }
}

/// Player pickup handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Force applied to thrown objects (mass dependent)
    pub throw_force: f32,
    /// How close a pickup must be to be grabbed
    pub reach: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            throw_force: 2000.0,
            reach: 1.5,
        }
    }
}

/// Fetching fox
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoxConfig {
    /// Upper bound on the wait before an idle animation
    pub action_interval: f32,
    /// Navigation speed (m/s)
    pub speed: f32,
    /// Squared distance to the player at which the fox drops its snowball
    pub drop_sqr_distance: f32,
    /// Forward force the snowball is dropped with
    pub drop_force: f32,
    /// How close the fox must get to grab its target
    pub reach: f32,
}

impl Default for FoxConfig {
    fn default() -> Self {
        Self {
            action_interval: 10.0,
            speed: 3.5,
            drop_sqr_distance: 25.0,
            drop_force: 50.0,
            reach: 1.0,
        }
    }
}

impl FoxConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_non_negative("fox.action_interval", self.action_interval)?;
        ConfigError::check_positive("fox.speed", self.speed)?;
        ConfigError::check_non_negative("fox.drop_sqr_distance", self.drop_sqr_distance)?;
        Ok(())
    }
}

/// Complete game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,

    // === Runner ===
    pub boundary: BoundaryConfig,
    pub runner: RunnerConfig,
    pub spawner: SpawnerConfig,
    pub lifetime: LifetimeConfig,
    pub countdown: CountdownConfig,
    pub distance: DistanceConfig,

    // === Sandbox ===
    pub movement: MovementConfig,
    pub look: LookConfig,
    pub pickup: PickupConfig,
    pub fox: FoxConfig,
    pub elevators: Vec<ElevatorConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            boundary: BoundaryConfig::default(),
            runner: RunnerConfig::default(),
            spawner: SpawnerConfig::default(),
            lifetime: LifetimeConfig::default(),
            countdown: CountdownConfig::default(),
            distance: DistanceConfig::default(),
            movement: MovementConfig::default(),
            look: LookConfig::default(),
            pickup: PickupConfig::default(),
            fox: FoxConfig::default(),
            elevators: vec![ElevatorConfig::default()],
        }
    }
}

impl Settings {
    /// Settings for the endless-run layout (long sections, index delay)
    pub fn endless_run() -> Self {
        Self {
            spawner: SpawnerConfig::endless_run(),
            runner: RunnerConfig {
                forward_speed: 3.0,
                wait_for_countdown: false,
                ..RunnerConfig::default()
            },
            ..Self::default()
        }
    }

    /// Check every section, failing on the first problem
    pub fn validate(&self) -> Result<(), ConfigError> {
        Boundary::from_config(&self.boundary)?;
        self.runner.validate()?;
        self.spawner.validate()?;
        ConfigError::check_non_negative("lifetime.lifetime", self.lifetime.lifetime)?;
        ConfigError::check_non_negative("countdown.lead_in", self.countdown.lead_in)?;
        ConfigError::check_non_negative("countdown.interval", self.countdown.interval)?;
        ConfigError::check_non_negative("distance.delay", self.distance.delay)?;
        self.movement.validate()?;
        ConfigError::check_non_negative("look.sensitivity", self.look.sensitivity)?;
        ConfigError::check_non_negative("pickup.throw_force", self.pickup.throw_force)?;
        self.fox.validate()?;
        for elevator in &self.elevators {
            elevator.validate()?;
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
