//! Coin and distance counters
//!
//! The scoreboard is owned by the world and lent to whoever writes to it
//! during a tick; the HUD reads it afterwards.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::clock::Delay;
use super::events::GameEvent;
use super::volume::{Aabb, ColliderId};

/// Run totals shown on the HUD
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub coins: u32,
    pub distance: u32,
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: ColliderId,
    pub volume: Aabb,
    /// Cleared once collected
    pub active: bool,
}

impl Coin {
    pub fn new(id: ColliderId, position: Vec3) -> Self {
        Self {
            id,
            volume: Aabb::new(position, Vec3::splat(0.5)),
            active: true,
        }
    }

    /// Anything touching the coin collects it
    pub fn on_trigger_enter(&mut self, score: &mut Scoreboard, events: &mut Vec<GameEvent>) {
        if !self.active {
            return;
        }
        score.coins += 1;
        self.active = false;
        events.push(GameEvent::CoinCollected {
            coin: self.id,
            total: score.coins,
        });
    }
}

/// Adds one to the distance every `delay` seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceTicker {
    delay: f32,
    waiting: Option<Delay>,
}

impl DistanceTicker {
    pub fn new(delay: f32) -> Self {
        Self {
            delay,
            waiting: None,
        }
    }

    pub fn update(&mut self, now: f64, score: &mut Scoreboard, events: &mut Vec<GameEvent>) {
        if self.waiting.is_none() {
            score.distance += 1;
            events.push(GameEvent::DistanceChanged(score.distance));
            self.waiting = Some(Delay::start(now, self.delay));
        }

        if self.waiting.is_some_and(|delay| delay.is_ready(now)) {
            self.waiting = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::Clock;

    #[test]
    fn test_coin_counts_once() {
        let mut score = Scoreboard::default();
        let mut events = Vec::new();
        let mut coin = Coin::new(9, Vec3::ZERO);

        coin.on_trigger_enter(&mut score, &mut events);
        coin.on_trigger_enter(&mut score, &mut events);

        assert_eq!(score.coins, 1);
        assert!(!coin.active);
        assert_eq!(events, vec![GameEvent::CoinCollected { coin: 9, total: 1 }]);
    }

    #[test]
    fn test_distance_ticks_every_delay() {
        let mut score = Scoreboard::default();
        let mut events = Vec::new();
        let mut ticker = DistanceTicker::new(0.5);
        let mut clock = Clock::new();

        // Increments at 0.25, 1.0, 1.75 ... (wait of 0.5 then one tick)
        for _ in 0..12 {
            clock.advance(0.25);
            ticker.update(clock.now(), &mut score, &mut events);
        }
        assert_eq!(score.distance, 4);
        assert_eq!(events.last(), Some(&GameEvent::DistanceChanged(4)));
    }
}
