//! Throwable snowballs and the player's pickup handler

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::{Body, ForceMode};
use super::events::GameEvent;
use super::volume::{Aabb, ColliderId};
use crate::settings::PickupConfig;

const SNOWBALL_RADIUS: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickupState {
    #[default]
    Resting,
    Held,
    Thrown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snowball {
    pub id: ColliderId,
    pub body: Body,
    state: PickupState,
    holder: Option<ColliderId>,
}

impl Snowball {
    pub fn new(id: ColliderId, position: Vec3) -> Self {
        Self {
            id,
            body: Body::new(position).with_drag(0.5),
            state: PickupState::Resting,
            holder: None,
        }
    }

    pub fn state(&self) -> PickupState {
        self.state
    }

    pub fn holder(&self) -> Option<ColliderId> {
        self.holder
    }

    pub fn volume(&self) -> Aabb {
        Aabb::new(self.body.position, Vec3::splat(SNOWBALL_RADIUS))
    }

    /// Hand the snowball to `holder`; fails if someone already has it
    pub fn attach(&mut self, holder: ColliderId) -> bool {
        if self.state == PickupState::Held {
            return false;
        }
        self.state = PickupState::Held;
        self.holder = Some(holder);
        self.body.use_gravity = false;
        self.body.velocity = Vec3::ZERO;
        true
    }

    /// Keep a held snowball at its holder's carry point
    pub fn follow(&mut self, anchor: Vec3) {
        if self.state == PickupState::Held {
            self.body.position = anchor;
            self.body.velocity = Vec3::ZERO;
        }
    }

    pub fn throw(&mut self, force: Vec3) {
        self.release(force);
        self.state = PickupState::Thrown;
    }

    /// Let go without it counting as a throw
    pub fn drop_with(&mut self, force: Vec3) {
        self.release(force);
        self.state = PickupState::Resting;
    }

    fn release(&mut self, force: Vec3) {
        self.holder = None;
        self.body.use_gravity = true;
        self.body.add_force(force, ForceMode::Force);
    }
}

/// Something that can hold a snowball
pub trait PickerUpper {
    /// Try to take the snowball; returns whether it was taken
    fn pickup_object(&mut self, snowball: &mut Snowball) -> bool;
}

/// Lets the player carry one snowball and throw it on release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupHandler {
    owner: ColliderId,
    config: PickupConfig,
    held: Option<ColliderId>,
}

impl PickupHandler {
    pub fn new(owner: ColliderId, config: &PickupConfig) -> Self {
        Self {
            owner,
            config: *config,
            held: None,
        }
    }

    pub fn held(&self) -> Option<ColliderId> {
        self.held
    }

    pub fn reach(&self) -> f32 {
        self.config.reach
    }

    /// Throw the held snowball along `forward` when the button comes up
    pub fn update(
        &mut self,
        released: bool,
        forward: Vec3,
        snowballs: &mut [Snowball],
        events: &mut Vec<GameEvent>,
    ) {
        if !released {
            return;
        }
        let Some(id) = self.held else {
            return;
        };
        if let Some(snowball) = snowballs.iter_mut().find(|s| s.id == id) {
            snowball.throw(forward * self.config.throw_force);
            events.push(GameEvent::SnowballThrown { snowball: id });
        }
        self.held = None;
    }
}

impl PickerUpper for PickupHandler {
    fn pickup_object(&mut self, snowball: &mut Snowball) -> bool {
        if self.held.is_some() {
            return false;
        }
        if !snowball.attach(self.owner) {
            return false;
        }
        self.held = Some(snowball.id);
        true
    }
}
