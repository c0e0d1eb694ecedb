//! Simulation time and single-shot timers
//!
//! Timed sequences (jump arc, spawn delay, countdown) are stored as
//! resume-at timestamps and polled from the tick, never as threads.

use serde::{Deserialize, Serialize};

/// Seconds since the scene started, advanced once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    now: f64,
    ticks: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick of `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.now += dt as f64;
        self.ticks += 1;
    }

    /// Current time in seconds
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of ticks advanced so far
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// A wait started at one instant that resumes at a later one
///
/// A delay never resolves on the tick it was started, even with zero length,
/// matching a continuation that always yields at least once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delay {
    started_at: f64,
    resume_at: f64,
}

impl Delay {
    pub fn start(now: f64, secs: f32) -> Self {
        Self {
            started_at: now,
            resume_at: now + secs.max(0.0) as f64,
        }
    }

    /// Whether the wait is over at `now`
    #[inline]
    pub fn is_ready(&self, now: f64) -> bool {
        now > self.started_at && now >= self.resume_at
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn resume_at(&self) -> f64 {
        self.resume_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advance() {
        let mut clock = Clock::new();
        clock.advance(0.25);
        clock.advance(0.25);
        assert_eq!(clock.ticks(), 2);
        assert!((clock.now() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_delay_waits_until_resume() {
        let delay = Delay::start(1.0, 0.5);
        assert!(!delay.is_ready(1.25));
        assert!(delay.is_ready(1.5));
        assert!(delay.is_ready(2.0));
    }

    #[test]
    fn test_zero_delay_yields_one_tick() {
        let delay = Delay::start(1.0, 0.0);
        assert!(!delay.is_ready(1.0));
        assert!(delay.is_ready(1.01));
    }
}
