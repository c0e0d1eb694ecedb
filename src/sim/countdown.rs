//! Start-of-run countdown
//!
//! Shows 3, 2, 1 and Go at fixed intervals. The runner is unlocked on Go.

use serde::{Deserialize, Serialize};

use super::clock::Delay;
use super::events::CountdownCue;
use crate::settings::CountdownConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    interval: f32,
    /// Next cue and when it fires; `None` once Go has been shown
    pending: Option<(Delay, CountdownCue)>,
}

impl Countdown {
    pub fn start(config: &CountdownConfig, now: f64) -> Self {
        let first = match config.from {
            0 => CountdownCue::Go,
            n => CountdownCue::Number(n),
        };
        Self {
            interval: config.interval,
            pending: Some((Delay::start(now, config.lead_in), first)),
        }
    }

    /// Returns the cue that fired this tick, if any
    pub fn update(&mut self, now: f64) -> Option<CountdownCue> {
        let (delay, cue) = self.pending?;
        if !delay.is_ready(now) {
            return None;
        }

        let next = match cue {
            CountdownCue::Number(n) if n > 1 => Some(CountdownCue::Number(n - 1)),
            CountdownCue::Number(_) => Some(CountdownCue::Go),
            CountdownCue::Go => None,
        };
        self.pending = next.map(|next| (Delay::start(delay.resume_at(), self.interval), next));
        Some(cue)
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_none()
    }
}
