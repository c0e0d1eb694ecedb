//! Procedural level segments
//!
//! The spawner places one randomly chosen segment at a time ahead of the
//! runner, then waits before placing the next. Spawned segments expire after
//! a fixed lifetime if their name carries the clone marker.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Delay;
use super::events::GameEvent;
use crate::consts::CLONE_SUFFIX;
use crate::error::ConfigError;
use crate::settings::{LifetimeConfig, SpawnDelay, SpawnerConfig};

/// A placed copy of a segment prefab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    /// Index into the prefab list
    pub prefab: usize,
    pub name: String,
    pub position: Vec3,
    /// Runs from the moment the segment was placed
    pub lifetime: Delay,
}

/// Places segments along +Z, one in flight at a time
#[derive(Debug, Clone)]
pub struct SegmentSpawner {
    config: SpawnerConfig,
    lifetime: f32,
    rng: Pcg32,
    /// Z of the next segment
    next_z: f32,
    /// Set while waiting out the delay after a spawn
    busy: Option<Delay>,
    next_id: u32,
}

impl SegmentSpawner {
    pub fn new(config: &SpawnerConfig, lifetime: &LifetimeConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        ConfigError::check_non_negative("lifetime.lifetime", lifetime.lifetime)?;
        Ok(Self {
            config: config.clone(),
            lifetime: lifetime.lifetime,
            rng: Pcg32::seed_from_u64(seed),
            next_z: config.start_z,
            busy: None,
            next_id: 1,
        })
    }

    /// Spawn if idle, then let a finished delay clear the busy flag
    pub fn update(&mut self, now: f64, events: &mut Vec<GameEvent>) -> Option<Segment> {
        let spawned = if self.busy.is_none() {
            Some(self.spawn(now, events))
        } else {
            None
        };

        if self.busy.is_some_and(|delay| delay.is_ready(now)) {
            self.busy = None;
        }

        spawned
    }

    fn spawn(&mut self, now: f64, events: &mut Vec<GameEvent>) -> Segment {
        let prefab = self.rng.random_range(0..self.config.prefabs.len());
        let id = self.next_id;
        self.next_id += 1;

        let segment = Segment {
            id,
            prefab,
            name: format!("{}{CLONE_SUFFIX}", self.config.prefabs[prefab]),
            position: Vec3::new(0.0, 0.0, self.next_z),
            lifetime: Delay::start(now, self.lifetime),
        };
        self.next_z += self.config.segment_length;

        let wait = match self.config.delay {
            SpawnDelay::Fixed { secs } => secs,
            SpawnDelay::SegmentIndex => prefab as f32,
        };
        self.busy = Some(Delay::start(now, wait));

        log::debug!("Segment {} '{}' at z={}", id, segment.name, segment.position.z);
        events.push(GameEvent::SegmentSpawned {
            id,
            prefab,
            z: segment.position.z,
        });
        segment
    }

    pub fn is_spawning(&self) -> bool {
        self.busy.is_some()
    }

    pub fn next_z(&self) -> f32 {
        self.next_z
    }
}

/// Remove segments whose lifetime ran out, but only those named `marker`
pub fn sweep_expired(segments: &mut Vec<Segment>, marker: &str, now: f64, events: &mut Vec<GameEvent>) {
    segments.retain(|segment| {
        let expired = segment.lifetime.is_ready(now) && segment.name == marker;
        if expired {
            events.push(GameEvent::SegmentDestroyed { id: segment.id });
        }
        !expired
    });
}
