//! Obstacles the runner can crash into

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, RunnerClip};
use super::runner::Runner;
use super::volume::{Aabb, ColliderId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ColliderId,
    pub volume: Aabb,
    /// Trigger switched off after the first hit
    pub armed: bool,
}

impl Obstacle {
    pub fn new(id: ColliderId, position: Vec3, half_extents: Vec3) -> Self {
        Self {
            id,
            volume: Aabb::new(position, half_extents),
            armed: true,
        }
    }

    /// Stop the runner and play the crash
    pub fn on_trigger_enter(&mut self, runner: &mut Runner, events: &mut Vec<GameEvent>) {
        if !self.armed {
            return;
        }
        self.armed = false;
        runner.disable();
        events.push(GameEvent::RunnerAnimation(RunnerClip::Falling));
        events.push(GameEvent::Crashed { obstacle: self.id });
    }
}
