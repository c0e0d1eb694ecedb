//! Lane runner movement
//!
//! The runner always advances along +Z. Strafing is allowed while the
//! current position is inside the lane boundary; the check happens before
//! the step, so a single step can carry the runner slightly past a limit.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::clock::Delay;
use super::events::{GameEvent, RunnerClip};
use crate::error::ConfigError;
use crate::settings::RunnerConfig;

/// Held keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerInput {
    /// A / Left arrow
    pub left: bool,
    /// D / Right arrow
    pub right: bool,
    /// W / Up arrow / Space
    pub jump: bool,
}

/// Where the runner is in its jump arc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpPhase {
    Grounded,
    Rising { until: Delay, ground_y: f32 },
    Falling { until: Delay, ground_y: f32 },
}

/// The player in the runner scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    pub position: Vec3,
    config: RunnerConfig,
    /// Strafing and jumping unlocked (by the countdown)
    can_move: bool,
    /// Cleared on crash; stops all movement
    enabled: bool,
    jump: JumpPhase,
}

impl Runner {
    pub fn new(config: &RunnerConfig, position: Vec3) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            position,
            config: *config,
            can_move: !config.wait_for_countdown,
            enabled: true,
            jump: JumpPhase::Grounded,
        })
    }

    /// Advance one frame
    pub fn update(
        &mut self,
        input: &RunnerInput,
        boundary: &Boundary,
        dt: f32,
        now: f64,
        events: &mut Vec<GameEvent>,
    ) {
        if self.enabled {
            self.position.z += self.config.forward_speed * dt;

            if self.can_move {
                self.strafe(input, boundary, dt);

                if input.jump && !self.is_jumping() {
                    self.jump = JumpPhase::Rising {
                        until: Delay::start(now, self.config.jump_phase),
                        ground_y: self.position.y,
                    };
                    events.push(GameEvent::RunnerAnimation(RunnerClip::Jump));
                }

                match self.jump {
                    JumpPhase::Rising { .. } => self.position.y += self.config.jump_speed * dt,
                    JumpPhase::Falling { .. } => self.position.y -= self.config.jump_speed * dt,
                    JumpPhase::Grounded => {}
                }
            }
        }

        // The arc timer keeps running even after the runner is disabled
        self.resume_jump(now, events);
    }

    fn strafe(&mut self, input: &RunnerInput, boundary: &Boundary, dt: f32) {
        let step = self.config.lateral_speed * dt;
        // Both directions are evaluated independently
        if input.left && boundary.can_step_left(self.position.x) {
            self.position.x -= step;
        }
        if input.right && boundary.can_step_right(self.position.x) {
            self.position.x += step;
        }
    }

    fn resume_jump(&mut self, now: f64, events: &mut Vec<GameEvent>) {
        match self.jump {
            JumpPhase::Rising { until, ground_y } if until.is_ready(now) => {
                // Chain from the scheduled time so the arc has a fixed length
                self.jump = JumpPhase::Falling {
                    until: Delay::start(until.resume_at(), self.config.jump_phase),
                    ground_y,
                };
            }
            JumpPhase::Falling { until, ground_y } if until.is_ready(now) => {
                self.jump = JumpPhase::Grounded;
                self.position.y = ground_y;
                events.push(GameEvent::RunnerAnimation(RunnerClip::Run));
            }
            _ => {}
        }
    }

    /// Unlock strafing and jumping
    pub fn allow_movement(&mut self) {
        self.can_move = true;
    }

    /// Stop the runner for good (crash)
    pub fn disable(&mut self) {
        if self.enabled {
            log::info!("Runner stopped at z={:.1}", self.position.z);
        }
        self.enabled = false;
    }

    pub fn can_move(&self) -> bool {
        self.can_move
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_jumping(&self) -> bool {
        !matches!(self.jump, JumpPhase::Grounded)
    }

    pub fn is_coming_down(&self) -> bool {
        matches!(self.jump, JumpPhase::Falling { .. })
    }

    pub fn jump_phase(&self) -> JumpPhase {
        self.jump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::Clock;
    use proptest::prelude::*;

    fn free_runner(x: f32) -> Runner {
        let config = RunnerConfig {
            wait_for_countdown: false,
            ..RunnerConfig::default()
        };
        Runner::new(&config, Vec3::new(x, 0.0, 0.0)).expect("valid config")
    }

    fn quarter_arc_runner() -> Runner {
        // Exactly representable timings
        let config = RunnerConfig {
            wait_for_countdown: false,
            jump_phase: 0.5,
            ..RunnerConfig::default()
        };
        Runner::new(&config, Vec3::ZERO).expect("valid config")
    }

    fn run(runner: &mut Runner, clock: &mut Clock, input: RunnerInput, dt: f32, ticks: usize) {
        let boundary = Boundary::default();
        let mut events = Vec::new();
        for _ in 0..ticks {
            clock.advance(dt);
            runner.update(&input, &boundary, dt, clock.now(), &mut events);
        }
    }

    #[test]
    fn test_forward_is_unconditional() {
        let config = RunnerConfig::default();
        let mut runner = Runner::new(&config, Vec3::ZERO).expect("valid config");
        assert!(!runner.can_move());

        let mut clock = Clock::new();
        let input = RunnerInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        run(&mut runner, &mut clock, input, 0.5, 2);

        // Locked: forward only
        assert!((runner.position.z - 8.0).abs() < 1e-5);
        assert_eq!(runner.position.x, 0.0);
        assert!(!runner.is_jumping());
    }

    #[test]
    fn test_step_overshoots_from_inside() {
        // 4.4 is inside the lane, so the full step is taken
        let mut runner = free_runner(4.4);
        let mut clock = Clock::new();
        let input = RunnerInput {
            right: true,
            ..Default::default()
        };
        run(&mut runner, &mut clock, input, 0.1, 1);
        assert!((runner.position.x - 4.8).abs() < 1e-5);

        // Now outside: no further movement right
        run(&mut runner, &mut clock, input, 0.1, 1);
        assert!((runner.position.x - 4.8).abs() < 1e-5);
    }

    #[test]
    fn test_left_and_right_cancel() {
        let mut runner = free_runner(0.0);
        let mut clock = Clock::new();
        let input = RunnerInput {
            left: true,
            right: true,
            ..Default::default()
        };
        run(&mut runner, &mut clock, input, 0.1, 3);
        assert!(runner.position.x.abs() < 1e-5);
    }

    #[test]
    fn test_jump_arc_duration() {
        let mut runner = quarter_arc_runner();
        let mut clock = Clock::new();
        let boundary = Boundary::default();
        let mut events = Vec::new();
        let jump = RunnerInput {
            jump: true,
            ..Default::default()
        };

        clock.advance(0.125);
        runner.update(&jump, &boundary, 0.125, clock.now(), &mut events);
        assert!(runner.is_jumping());
        assert_eq!(events, vec![GameEvent::RunnerAnimation(RunnerClip::Jump)]);
        let started = clock.now();

        // Holding jump during the arc does not restart it
        let mut peak = 0.0_f32;
        while clock.now() - started < 1.0 - 1e-6 {
            assert!(runner.is_jumping(), "still jumping at {}", clock.now() - started);
            clock.advance(0.125);
            runner.update(&jump, &boundary, 0.125, clock.now(), &mut events);
            peak = peak.max(runner.position.y);
        }

        assert!(!runner.is_jumping());
        assert!(peak > 2.5);
        // Back on the ground it started from
        assert_eq!(runner.position.y, 0.0);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::RunnerAnimation(RunnerClip::Jump)).count(),
            1
        );
        assert_eq!(events.last(), Some(&GameEvent::RunnerAnimation(RunnerClip::Run)));
    }

    #[test]
    fn test_disabled_runner_stands_still() {
        let mut runner = free_runner(0.0);
        let mut clock = Clock::new();
        runner.disable();
        let input = RunnerInput {
            left: true,
            ..Default::default()
        };
        run(&mut runner, &mut clock, input, 0.1, 10);
        assert_eq!(runner.position, Vec3::ZERO);
    }

    #[test]
    fn test_jump_timer_survives_disable() {
        let mut runner = free_runner(0.0);
        let mut clock = Clock::new();
        let jump = RunnerInput {
            jump: true,
            ..Default::default()
        };
        run(&mut runner, &mut clock, jump, 0.1, 1);
        runner.disable();
        run(&mut runner, &mut clock, RunnerInput::default(), 0.1, 15);
        assert!(!runner.is_jumping());
    }

    proptest! {
        #[test]
        fn prop_lateral_overshoot_is_bounded(
            start in -4.5f32..4.5,
            dt in 0.0f32..0.2,
            moves in prop::collection::vec((any::<bool>(), any::<bool>()), 1..200),
        ) {
            let mut runner = free_runner(start);
            let boundary = Boundary::default();
            let mut clock = Clock::new();
            let mut events = Vec::new();
            let step = 4.0 * dt + 1e-4;

            for (left, right) in moves {
                let input = RunnerInput { left, right, jump: false };
                clock.advance(dt);
                runner.update(&input, &boundary, dt, clock.now(), &mut events);
                prop_assert!(runner.position.x <= boundary.right() + step);
                prop_assert!(runner.position.x >= boundary.left() - step);
            }
        }
    }
}
