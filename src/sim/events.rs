//! Events emitted by a tick for the host to present
//!
//! The simulation never plays sounds or touches text itself; it reports what
//! happened and the host decides how to show it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::volume::ColliderId;

/// Animation clips the runner model is told to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerClip {
    Jump,
    Run,
    Falling,
}

/// One step of the start-of-run countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownCue {
    Number(u8),
    Go,
}

/// Idle animation the fox plays while waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoxAction {
    Jump,
    Somersault,
}

/// Something observable happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Countdown(CountdownCue),
    RunnerAnimation(RunnerClip),
    CoinCollected { coin: ColliderId, total: u32 },
    DistanceChanged(u32),
    Crashed { obstacle: ColliderId },
    SegmentSpawned { id: u32, prefab: usize, z: f32 },
    SegmentDestroyed { id: u32 },
    ElevatorArrived {
        elevator: usize,
        index: Option<usize>,
        position: Vec3,
    },
    SlidingChanged(bool),
    Fox(FoxAction),
    FoxFetching { snowball: u32 },
    FoxPickedUp { snowball: u32 },
    FoxDropped { snowball: u32 },
    SnowballThrown { snowball: u32 },
}
