//! Endless runner world
//!
//! Owns everything in the runner scene and advances it one fixed step at a
//! time. Per tick: runner movement, countdown, segment spawning and expiry,
//! the distance ticker, then trigger contacts against the runner.

use glam::Vec3;

use super::boundary::Boundary;
use super::clock::Clock;
use super::countdown::Countdown;
use super::events::{CountdownCue, GameEvent};
use super::obstacle::Obstacle;
use super::runner::{Runner, RunnerInput};
use super::scoring::{Coin, DistanceTicker, Scoreboard};
use super::spawner::{Segment, SegmentSpawner, sweep_expired};
use super::volume::{Aabb, Collider, ColliderId, Contact, ContactTracker};
use crate::error::ConfigError;
use crate::settings::Settings;

const RUNNER_ID: ColliderId = 1;
const RUNNER_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 1.0, 0.5);

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl From<TickInput> for RunnerInput {
    fn from(input: TickInput) -> Self {
        Self {
            left: input.left,
            right: input.right,
            jump: input.jump,
        }
    }
}

/// What a trigger id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerKind {
    Coin(usize),
    Obstacle(usize),
}

#[derive(Debug, Clone)]
pub struct RunWorld {
    pub clock: Clock,
    pub boundary: Boundary,
    pub runner: Runner,
    pub score: Scoreboard,
    pub segments: Vec<Segment>,
    pub coins: Vec<Coin>,
    pub obstacles: Vec<Obstacle>,
    countdown: Option<Countdown>,
    spawner: SegmentSpawner,
    distance: DistanceTicker,
    /// Segments carrying this name expire
    marker: String,
    contacts: ContactTracker,
    next_id: ColliderId,
}

impl RunWorld {
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let clock = Clock::new();
        let countdown = settings
            .runner
            .wait_for_countdown
            .then(|| Countdown::start(&settings.countdown, clock.now()));

        Ok(Self {
            boundary: Boundary::from_config(&settings.boundary)?,
            runner: Runner::new(&settings.runner, Vec3::ZERO)?,
            score: Scoreboard::default(),
            segments: Vec::new(),
            coins: Vec::new(),
            obstacles: Vec::new(),
            countdown,
            spawner: SegmentSpawner::new(&settings.spawner, &settings.lifetime, settings.seed)?,
            distance: DistanceTicker::new(settings.distance.delay),
            marker: settings.lifetime.marker.clone(),
            contacts: ContactTracker::new(),
            next_id: RUNNER_ID + 1,
            clock,
        })
    }

    fn next_collider_id(&mut self) -> ColliderId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_coin(&mut self, position: Vec3) -> ColliderId {
        let id = self.next_collider_id();
        self.coins.push(Coin::new(id, position));
        id
    }

    pub fn add_obstacle(&mut self, position: Vec3, half_extents: Vec3) -> ColliderId {
        let id = self.next_collider_id();
        self.obstacles.push(Obstacle::new(id, position, half_extents));
        id
    }

    /// Runner's trigger volume, standing on its position
    pub fn runner_volume(&self) -> Aabb {
        Aabb::new(self.runner.position + Vec3::Y * RUNNER_HALF_EXTENTS.y, RUNNER_HALF_EXTENTS)
    }

    /// Advance the world by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.clock.advance(dt);
        let now = self.clock.now();

        self.runner
            .update(&RunnerInput::from(*input), &self.boundary, dt, now, &mut events);

        if let Some(countdown) = &mut self.countdown {
            if let Some(cue) = countdown.update(now) {
                if cue == CountdownCue::Go {
                    self.runner.allow_movement();
                }
                events.push(GameEvent::Countdown(cue));
            }
        }

        if let Some(segment) = self.spawner.update(now, &mut events) {
            self.segments.push(segment);
        }
        sweep_expired(&mut self.segments, &self.marker, now, &mut events);

        self.distance.update(now, &mut self.score, &mut events);

        self.handle_contacts(&mut events);

        events
    }

    fn handle_contacts(&mut self, events: &mut Vec<GameEvent>) {
        let runner = self.runner_volume();

        let mut touching: Vec<(Collider, TriggerKind)> = Vec::new();
        for (i, coin) in self.coins.iter().enumerate() {
            if coin.active && coin.volume.overlaps(&runner) {
                touching.push((Collider::untagged(coin.id), TriggerKind::Coin(i)));
            }
        }
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            if obstacle.armed && obstacle.volume.overlaps(&runner) {
                touching.push((Collider::untagged(obstacle.id), TriggerKind::Obstacle(i)));
            }
        }

        let contacts = self.contacts.update(touching.iter().map(|(collider, _)| collider));
        for contact in contacts {
            let Contact::Enter(collider) = contact else {
                continue;
            };
            let kind = touching
                .iter()
                .find(|(c, _)| c.id == collider.id)
                .map(|(_, kind)| *kind);

            match kind {
                Some(TriggerKind::Coin(i)) => self.coins[i].on_trigger_enter(&mut self.score, events),
                Some(TriggerKind::Obstacle(i)) => {
                    log::info!("Runner crashed into obstacle {}", collider.id);
                    self.obstacles[i].on_trigger_enter(&mut self.runner, events);
                }
                None => {}
            }
        }
    }

    pub fn is_countdown_finished(&self) -> bool {
        self.countdown.as_ref().is_none_or(Countdown::is_finished)
    }

    pub fn is_crashed(&self) -> bool {
        !self.runner.is_enabled()
    }

    pub fn next_segment_z(&self) -> f32 {
        self.spawner.next_z()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::events::RunnerClip;

    fn world() -> RunWorld {
        RunWorld::new(&Settings::default()).expect("default settings are valid")
    }

    fn run_for(world: &mut RunWorld, input: TickInput, secs: f32) -> Vec<GameEvent> {
        let ticks = (secs / SIM_DT).round() as usize;
        (0..ticks).flat_map(|_| world.tick(&input, SIM_DT)).collect()
    }

    #[test]
    fn test_countdown_unlocks_runner() {
        let mut world = world();
        let right = TickInput {
            right: true,
            ..Default::default()
        };

        let events = run_for(&mut world, right, 3.4);
        assert!(!world.runner.can_move());
        assert_eq!(world.runner.position.x, 0.0);
        assert!(world.runner.position.z > 0.0);
        let cues: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Countdown(cue) => Some(*cue),
                _ => None,
            })
            .collect();
        assert_eq!(
            cues,
            vec![
                CountdownCue::Number(3),
                CountdownCue::Number(2),
                CountdownCue::Number(1)
            ]
        );

        let events = run_for(&mut world, right, 0.2);
        assert!(events.contains(&GameEvent::Countdown(CountdownCue::Go)));
        assert!(world.runner.can_move());
        assert!(world.is_countdown_finished());

        run_for(&mut world, right, 0.5);
        assert!(world.runner.position.x > 0.0);
    }

    #[test]
    fn test_coin_counts_once() {
        let mut world = world();
        let coin = world.add_coin(Vec3::new(0.0, 1.0, 2.0));

        let events = run_for(&mut world, TickInput::default(), 1.0);
        let collected: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CoinCollected { .. }))
            .collect();
        assert_eq!(collected, vec![&GameEvent::CoinCollected { coin, total: 1 }]);
        assert_eq!(world.score.coins, 1);
    }

    #[test]
    fn test_crash_stops_runner() {
        let mut world = world();
        let obstacle = world.add_obstacle(Vec3::new(0.0, 1.0, 4.0), Vec3::new(1.0, 1.0, 0.25));

        let events = run_for(&mut world, TickInput::default(), 2.0);
        assert!(world.is_crashed());
        assert!(events.contains(&GameEvent::Crashed { obstacle }));
        assert!(events.contains(&GameEvent::RunnerAnimation(RunnerClip::Falling)));

        let z = world.runner.position.z;
        run_for(&mut world, TickInput::default(), 1.0);
        assert_eq!(world.runner.position.z, z);
        // Distance keeps counting regardless
        assert!(world.score.distance > 4);
    }

    #[test]
    fn test_segments_spawn_and_expire() {
        let mut settings = Settings::default();
        settings.lifetime.lifetime = 10.0;
        let mut world = RunWorld::new(&settings).expect("valid");

        let events = run_for(&mut world, TickInput::default(), 7.0);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::SegmentSpawned { .. }))
            .count();
        assert_eq!(spawned, 2);
        assert_eq!(world.next_segment_z(), 150.0);

        let events = run_for(&mut world, TickInput::default(), 3.5);
        assert!(events.contains(&GameEvent::SegmentDestroyed { id: 1 }));
        assert!(world.segments.iter().all(|s| s.id != 1));
    }

    #[test]
    fn test_distance_ticks_from_the_start() {
        let mut world = world();
        let events = run_for(&mut world, TickInput::default(), 1.2);
        assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::DistanceChanged(_))).count(), 3);
        assert_eq!(world.score.distance, 3);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = world();
        let mut b = world();
        let input = TickInput {
            left: true,
            jump: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            assert_eq!(a.tick(&input, SIM_DT), b.tick(&input, SIM_DT));
        }
        assert_eq!(a.runner.position, b.runner.position);
    }
}
