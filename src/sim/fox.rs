//! A fox that fetches thrown snowballs
//!
//! While idle it plays a random trick now and then. Once a snowball is
//! thrown it runs after it, carries it back to the player and drops it
//! close by.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::events::{FoxAction, GameEvent};
use super::pickup::{PickerUpper, PickupState, Snowball};
use super::volume::{Aabb, ColliderId};
use crate::error::ConfigError;
use crate::move_towards;
use crate::settings::FoxConfig;

/// Carry point relative to the fox, in its facing frame
const MOUTH_OFFSET: Vec3 = Vec3::new(0.0, 0.4, 0.5);
const HALF_EXTENTS: Vec3 = Vec3::new(0.3, 0.4, 0.5);

/// Steers straight toward a destination on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavAgent {
    pub position: Vec3,
    pub velocity: Vec3,
    pub speed: f32,
    destination: Vec3,
    /// Facing, radians around +Y (0 faces +Z)
    heading: f32,
}

impl NavAgent {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            speed,
            destination: position,
            heading: 0.0,
        }
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        self.destination = Vec3::new(destination.x, self.position.y, destination.z);
    }

    pub fn update(&mut self, dt: f32) {
        let next = move_towards(self.position, self.destination, self.speed * dt);
        self.velocity = if dt > 0.0 { (next - self.position) / dt } else { Vec3::ZERO };
        if self.velocity.length_squared() > f32::EPSILON {
            self.heading = self.velocity.x.atan2(self.velocity.z);
        }
        self.position = next;
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }
}

#[derive(Debug, Clone)]
pub struct Fox {
    pub id: ColliderId,
    pub agent: NavAgent,
    config: FoxConfig,
    rng: Pcg32,
    /// Trick to play and when
    queued: Option<(f64, FoxAction)>,
    fetch_target: Option<ColliderId>,
    held: Option<ColliderId>,
    /// Animator speed, 0 when still and 1 at full speed
    move_speed_param: f32,
}

impl Fox {
    pub fn new(id: ColliderId, position: Vec3, config: &FoxConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            id,
            agent: NavAgent::new(position, config.speed),
            config: *config,
            rng: Pcg32::seed_from_u64(seed),
            queued: None,
            fetch_target: None,
            held: None,
            move_speed_param: 0.0,
        })
    }

    pub fn fixed_step(
        &mut self,
        now: f64,
        dt: f32,
        player: Vec3,
        snowballs: &mut [Snowball],
        events: &mut Vec<GameEvent>,
    ) {
        self.handle_actions(now, events);
        self.handle_movement(player, snowballs, events);
        self.agent.update(dt);

        let mouth = self.mouth();
        if let Some(held) = self.held_snowball(snowballs) {
            held.follow(mouth);
        }
    }

    fn handle_actions(&mut self, now: f64, events: &mut Vec<GameEvent>) {
        if self.held.is_some() {
            return;
        }

        if self.queued.is_none() {
            let wait = self.rng.random::<f32>() * self.config.action_interval;
            let action = if self.rng.random_bool(0.5) {
                FoxAction::Jump
            } else {
                FoxAction::Somersault
            };
            self.queued = Some((now + wait as f64, action));
        }

        if let Some((at, action)) = self.queued {
            if now >= at {
                self.queued = None;
                events.push(GameEvent::Fox(action));
            }
        }
    }

    fn handle_movement(&mut self, player: Vec3, snowballs: &mut [Snowball], events: &mut Vec<GameEvent>) {
        self.move_speed_param = self.agent.velocity.length() / self.agent.speed;

        if self.held.is_some() {
            self.agent.set_destination(player);

            if self.agent.position.distance_squared(player) < self.config.drop_sqr_distance {
                self.drop_snowball(snowballs, events);
                let here = self.agent.position;
                self.agent.set_destination(here);
            }
            return;
        }

        if let Some(target) = self.fetch_target {
            if let Some(snowball) = snowballs.iter().find(|s| s.id == target) {
                self.agent.set_destination(snowball.body.position);
            }
            return;
        }

        if let Some(thrown) = snowballs.iter().find(|s| s.state() == PickupState::Thrown) {
            log::info!("Fox is chasing after snowball {}", thrown.id);
            self.fetch_target = Some(thrown.id);
            events.push(GameEvent::FoxFetching { snowball: thrown.id });
        }
    }

    fn drop_snowball(&mut self, snowballs: &mut [Snowball], events: &mut Vec<GameEvent>) {
        let force = self.agent.forward() * self.config.drop_force;
        if let Some(snowball) = self.held_snowball(snowballs) {
            snowball.drop_with(force);
            events.push(GameEvent::FoxDropped { snowball: snowball.id });
        }
        self.held = None;
    }

    fn held_snowball<'a>(&self, snowballs: &'a mut [Snowball]) -> Option<&'a mut Snowball> {
        let id = self.held?;
        snowballs.iter_mut().find(|s| s.id == id)
    }

    fn mouth(&self) -> Vec3 {
        let forward = self.agent.forward();
        self.agent.position + Vec3::Y * MOUTH_OFFSET.y + forward * MOUTH_OFFSET.z
    }

    pub fn volume(&self) -> Aabb {
        Aabb::new(self.agent.position, HALF_EXTENTS)
    }

    pub fn reach(&self) -> f32 {
        self.config.reach
    }

    pub fn fetch_target(&self) -> Option<ColliderId> {
        self.fetch_target
    }

    pub fn held(&self) -> Option<ColliderId> {
        self.held
    }

    pub fn move_speed_param(&self) -> f32 {
        self.move_speed_param
    }
}

impl PickerUpper for Fox {
    /// Only takes the snowball it was sent after
    fn pickup_object(&mut self, snowball: &mut Snowball) -> bool {
        if self.held.is_some() || self.fetch_target != Some(snowball.id) {
            log::debug!("Snowball {} isn't the one the fox is after", snowball.id);
            return false;
        }
        if !snowball.attach(self.id) {
            return false;
        }

        log::info!("Fox found snowball {}", snowball.id);
        self.fetch_target = None;
        self.held = Some(snowball.id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    fn fox_at(position: Vec3) -> Fox {
        Fox::new(50, position, &FoxConfig::default(), 7).expect("valid config")
    }

    fn thrown_snowball(id: ColliderId, position: Vec3) -> Snowball {
        let mut snowball = Snowball::new(id, position);
        snowball.attach(1);
        snowball.throw(Vec3::ZERO);
        snowball
    }

    #[test]
    fn test_idle_actions_keep_coming() {
        let mut fox = fox_at(Vec3::ZERO);
        let mut events = Vec::new();
        let mut now = 0.0;
        for _ in 0..5000 {
            now += DT as f64;
            fox.fixed_step(now, DT, Vec3::new(20.0, 0.0, 0.0), &mut [], &mut events);
        }
        // 100 s with at most 10 s between tricks
        let tricks = events.iter().filter(|e| matches!(e, GameEvent::Fox(_))).count();
        assert!(tricks >= 9);
    }

    #[test]
    fn test_chases_first_thrown() {
        let mut fox = fox_at(Vec3::ZERO);
        let mut snowballs = vec![
            Snowball::new(10, Vec3::new(1.0, 0.0, 0.0)),
            thrown_snowball(11, Vec3::new(0.0, 0.0, 20.0)),
            thrown_snowball(12, Vec3::new(0.0, 0.0, -20.0)),
        ];
        let mut events = Vec::new();

        fox.fixed_step(0.0, DT, Vec3::new(20.0, 0.0, 0.0), &mut snowballs, &mut events);
        assert_eq!(fox.fetch_target(), Some(11));
        assert!(events.contains(&GameEvent::FoxFetching { snowball: 11 }));

        for i in 1..100 {
            fox.fixed_step(i as f64 * DT as f64, DT, Vec3::new(20.0, 0.0, 0.0), &mut snowballs, &mut events);
        }
        assert!(fox.agent.position.z > 1.0);
        assert!((fox.move_speed_param() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_only_picks_up_its_target() {
        let mut fox = fox_at(Vec3::ZERO);
        let mut snowballs = vec![thrown_snowball(11, Vec3::Z), thrown_snowball(12, Vec3::X)];
        let mut events = Vec::new();
        fox.fixed_step(0.0, DT, Vec3::new(20.0, 0.0, 0.0), &mut snowballs, &mut events);

        assert!(!fox.pickup_object(&mut snowballs[1]));
        assert!(fox.pickup_object(&mut snowballs[0]));
        assert_eq!(fox.held(), Some(11));
        assert_eq!(fox.fetch_target(), None);
        assert_eq!(snowballs[0].holder(), Some(50));
    }

    #[test]
    fn test_brings_snowball_back_to_player() {
        let mut fox = fox_at(Vec3::ZERO);
        let mut snowballs = vec![thrown_snowball(11, Vec3::Z)];
        let mut events = Vec::new();
        let player = Vec3::new(20.0, 0.0, 0.0);

        fox.fixed_step(0.0, DT, player, &mut snowballs, &mut events);
        assert!(fox.pickup_object(&mut snowballs[0]));
        let picked_up_at = events.len();

        let mut now = 0.0;
        while fox.held().is_some() && now < 30.0 {
            now += DT as f64;
            fox.fixed_step(now, DT, player, &mut snowballs, &mut events);
        }

        assert_eq!(fox.held(), None);
        assert!(fox.agent.position.distance_squared(player) < 25.0);
        assert_eq!(snowballs[0].state(), PickupState::Resting);
        // No tricks while carrying
        assert_eq!(
            events[picked_up_at..],
            [GameEvent::FoxDropped { snowball: 11 }]
        );
    }
}
