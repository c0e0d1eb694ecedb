//! First-person sandbox world
//!
//! A walkable floor with elevators, ice patches, throwable snowballs, a fox
//! that fetches them and targets that take hits. Everything is advanced by
//! `step` in a fixed order: look, elevators (carrying riders), the player,
//! triggers and contacts, snowballs, then the fox.

use glam::Vec3;

use super::body::Body;
use super::clock::Clock;
use super::destroyable::Destroyable;
use super::elevator::Elevator;
use super::events::GameEvent;
use super::first_person::{FirstPersonMovement, MoveInput};
use super::fox::Fox;
use super::ice::Ice;
use super::look::{Look, LookInput};
use super::pickup::{PickerUpper, PickupHandler, PickupState, Snowball};
use super::volume::{Aabb, Collider, ColliderId, Contact, ContactTracker};
use crate::error::ConfigError;
use crate::settings::{FoxConfig, Settings};

const PLAYER_ID: ColliderId = 1;
const PLAYER_RADIUS: f32 = 0.5;
/// Thickness of the box under the player's feet used for surface contacts
const FEET_DEPTH: f32 = 0.1;
/// Carry point in front of the camera
const CARRY_DISTANCE: f32 = 1.0;
const CARRY_HEIGHT: f32 = 0.5;
const SNOWBALL_RADIUS: f32 = 0.25;
const SNOWBALL_DAMAGE: f32 = 25.0;

/// Input commands for a single step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SandboxInput {
    pub movement: MoveInput,
    pub look: LookInput,
    /// Primary button came up this step
    pub release: bool,
}

/// A box that snowballs can damage
#[derive(Debug, Clone)]
pub struct Target {
    pub id: ColliderId,
    pub volume: Aabb,
    pub health: Destroyable,
    contacts: ContactTracker,
}

#[derive(Debug)]
pub struct Sandbox {
    pub clock: Clock,
    pub player: FirstPersonMovement,
    pub look: Look,
    pub hands: PickupHandler,
    /// Static walkable boxes
    pub surfaces: Vec<Aabb>,
    pub ice: Vec<(ColliderId, Ice)>,
    pub elevators: Vec<Elevator>,
    pub snowballs: Vec<Snowball>,
    pub fox: Option<Fox>,
    pub targets: Vec<Target>,
    seed: u64,
    fox_config: FoxConfig,
    elevator_contacts: Vec<ContactTracker>,
    ice_contacts: ContactTracker,
    fox_contacts: ContactTracker,
    next_id: ColliderId,
}

impl Sandbox {
    /// An empty floor with the configured elevators
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let body = Body::new(Vec3::new(0.0, settings.movement.height / 2.0, -8.0));
        let elevators = settings
            .elevators
            .iter()
            .map(Elevator::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            clock: Clock::new(),
            player: FirstPersonMovement::new(&settings.movement, body)?,
            look: Look::new(&settings.look),
            hands: PickupHandler::new(PLAYER_ID, &settings.pickup),
            surfaces: vec![Aabb::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0))],
            ice: Vec::new(),
            elevator_contacts: vec![ContactTracker::new(); elevators.len()],
            elevators,
            snowballs: Vec::new(),
            fox: None,
            targets: Vec::new(),
            seed: settings.seed,
            fox_config: settings.fox,
            ice_contacts: ContactTracker::new(),
            fox_contacts: ContactTracker::new(),
            next_id: PLAYER_ID + 1,
        })
    }

    /// The stock layout: an ice rink, a pile of snowballs, a fox and a target
    pub fn demo(settings: &Settings) -> Result<Self, ConfigError> {
        let mut sandbox = Self::new(settings)?;
        sandbox.add_ice(Aabb::new(Vec3::new(10.0, 0.05, 0.0), Vec3::new(4.0, 0.05, 6.0)));
        for x in [-3.0, -2.0, -1.0] {
            sandbox.add_snowball(Vec3::new(x, SNOWBALL_RADIUS, -6.0));
        }
        sandbox.spawn_fox(Vec3::new(6.0, 0.0, -4.0))?;
        sandbox.add_target(Aabb::new(Vec3::new(0.0, 1.5, 12.0), Vec3::new(1.5, 1.5, 0.25)), 100.0);
        Ok(sandbox)
    }

    fn next_collider_id(&mut self) -> ColliderId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_ice(&mut self, volume: Aabb) -> ColliderId {
        let id = self.next_collider_id();
        self.ice.push((id, Ice::new(volume)));
        id
    }

    pub fn add_snowball(&mut self, position: Vec3) -> ColliderId {
        let id = self.next_collider_id();
        self.snowballs.push(Snowball::new(id, position));
        id
    }

    /// Replaces any existing fox
    pub fn spawn_fox(&mut self, position: Vec3) -> Result<ColliderId, ConfigError> {
        let id = self.next_collider_id();
        let fox = Fox::new(id, position, &self.fox_config, self.seed ^ u64::from(id))?;
        log::info!("Found {} snowballs for the fox to fetch", self.snowballs.len());
        self.fox = Some(fox);
        Ok(id)
    }

    pub fn add_target(&mut self, volume: Aabb, max_health: f32) -> ColliderId {
        let id = self.next_collider_id();
        self.targets.push(Target {
            id,
            volume,
            health: Destroyable::new(max_health),
            contacts: ContactTracker::new(),
        });
        id
    }

    pub fn player_collider(&self) -> Collider {
        Collider::player(PLAYER_ID)
    }

    pub fn player_volume(&self) -> Aabb {
        Aabb::new(
            self.player.body.position,
            Vec3::new(PLAYER_RADIUS, self.player.half_height(), PLAYER_RADIUS),
        )
    }

    fn feet_volume(&self) -> Aabb {
        let feet = self.player.body.position - Vec3::Y * self.player.half_height();
        Aabb::new(feet, Vec3::new(PLAYER_RADIUS, FEET_DEPTH, PLAYER_RADIUS))
    }

    /// Camera direction, pitch included
    pub fn view_forward(&self) -> Vec3 {
        let pitch = self.look.pitch().to_radians();
        // Positive pitch looks down
        self.player.body.forward() * pitch.cos() - Vec3::Y * pitch.sin()
    }

    fn carry_point(&self) -> Vec3 {
        self.player.body.position + Vec3::Y * CARRY_HEIGHT + self.view_forward() * CARRY_DISTANCE
    }

    /// Everything that can be stood on right now
    fn ground(&self) -> Vec<Aabb> {
        self.surfaces
            .iter()
            .copied()
            .chain(self.ice.iter().map(|(_, ice)| ice.volume))
            .chain(self.elevators.iter().map(Elevator::platform))
            .collect()
    }

    /// Advance the world by one fixed timestep
    pub fn step(&mut self, input: &SandboxInput, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.clock.advance(dt);
        let now = self.clock.now();

        self.look.update(&input.look, &mut self.player.body, dt);

        self.step_elevators(dt, &mut events);

        let ground = self.ground();
        self.player.fixed_step(&input.movement, &ground[..], now);
        self.player.body.integrate(dt);
        self.player.body.resolve_ground(&ground[..], self.player.half_height());

        self.handle_ice(&mut events);
        self.handle_elevator_triggers();
        self.handle_hands(input, &mut events);
        self.step_snowballs(&ground, dt);
        self.handle_targets();
        self.step_fox(now, dt, &mut events);

        events
    }

    fn step_elevators(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        for (i, elevator) in self.elevators.iter_mut().enumerate() {
            let step = elevator.fixed_step(dt);
            if elevator.is_riding(PLAYER_ID) {
                self.player.body.position += step.displacement;
            }
            if let Some(arrival) = step.arrived {
                events.push(GameEvent::ElevatorArrived {
                    elevator: i,
                    index: arrival.index,
                    position: arrival.position,
                });
            }
        }
    }

    fn handle_ice(&mut self, events: &mut Vec<GameEvent>) {
        let feet = self.feet_volume();
        let touching: Vec<Collider> = self
            .ice
            .iter()
            .filter(|(_, ice)| ice.volume.overlaps(&feet))
            .map(|(id, _)| Collider::untagged(*id))
            .collect();

        for contact in self.ice_contacts.update(&touching) {
            let (id, entering) = match contact {
                Contact::Enter(c) => (c.id, true),
                Contact::Exit(c) => (c.id, false),
            };
            let Some((_, ice)) = self.ice.iter().find(|(ice_id, _)| *ice_id == id) else {
                continue;
            };
            let was_sliding = self.player.is_sliding();
            if entering {
                ice.on_collision_enter(Some(&mut self.player));
            } else {
                ice.on_collision_exit(Some(&mut self.player));
            }
            if self.player.is_sliding() != was_sliding {
                events.push(GameEvent::SlidingChanged(self.player.is_sliding()));
            }
        }
    }

    fn handle_elevator_triggers(&mut self) {
        let player = self.player_volume();
        for (elevator, tracker) in self.elevators.iter_mut().zip(&mut self.elevator_contacts) {
            let trigger = elevator.trigger();
            let mut touching = Vec::new();
            if trigger.overlaps(&player) {
                touching.push(Collider::player(PLAYER_ID));
            }
            touching.extend(
                self.snowballs
                    .iter()
                    .filter(|s| s.state() != PickupState::Held && trigger.overlaps(&s.volume()))
                    .map(|s| Collider::untagged(s.id)),
            );

            for contact in tracker.update(&touching) {
                match contact {
                    Contact::Enter(other) => elevator.on_trigger_enter(&other),
                    Contact::Exit(other) => elevator.on_trigger_exit(&other),
                }
            }
        }
    }

    fn handle_hands(&mut self, input: &SandboxInput, events: &mut Vec<GameEvent>) {
        if input.look.click && self.hands.held().is_none() {
            let origin = self.player.body.position;
            let reach = self.hands.reach();
            let nearest = self
                .snowballs
                .iter_mut()
                .filter(|s| s.state() != PickupState::Held)
                .map(|s| (s.body.position.distance(origin), s))
                .filter(|(distance, _)| *distance <= reach)
                .min_by(|(a, _), (b, _)| a.total_cmp(b));
            if let Some((_, snowball)) = nearest {
                self.hands.pickup_object(snowball);
            }
        }

        let forward = self.view_forward();
        self.hands
            .update(input.release, forward, &mut self.snowballs, events);

        let carry = self.carry_point();
        if let Some(id) = self.hands.held() {
            if let Some(snowball) = self.snowballs.iter_mut().find(|s| s.id == id) {
                snowball.follow(carry);
            }
        }
    }

    fn step_snowballs(&mut self, ground: &[Aabb], dt: f32) {
        for snowball in &mut self.snowballs {
            if snowball.state() == PickupState::Held {
                continue;
            }
            snowball.body.integrate(dt);
            snowball.body.resolve_ground(ground, SNOWBALL_RADIUS);
        }
    }

    fn handle_targets(&mut self) {
        for target in &mut self.targets {
            let touching: Vec<Collider> = self
                .snowballs
                .iter()
                .filter(|s| s.state() == PickupState::Thrown && target.volume.overlaps(&s.volume()))
                .map(|s| Collider::untagged(s.id))
                .collect();

            for contact in target.contacts.update(&touching) {
                if let Contact::Enter(_) = contact {
                    target.health.take_damage(SNOWBALL_DAMAGE);
                    log::debug!("Target {} hit, health {}", target.id, target.health.health());
                }
            }
        }
    }

    fn step_fox(&mut self, now: f64, dt: f32, events: &mut Vec<GameEvent>) {
        let Some(fox) = &mut self.fox else {
            return;
        };
        let player = self.player.body.position;
        fox.fixed_step(now, dt, player, &mut self.snowballs, events);

        let mouth = fox.volume().center;
        let reach = fox.reach();
        let touching: Vec<Collider> = self
            .snowballs
            .iter()
            .filter(|s| s.state() != PickupState::Held && s.body.position.distance(mouth) <= reach)
            .map(|s| Collider::untagged(s.id))
            .collect();

        for contact in self.fox_contacts.update(&touching) {
            let Contact::Enter(other) = contact else {
                continue;
            };
            if let Some(snowball) = self.snowballs.iter_mut().find(|s| s.id == other.id) {
                if fox.pickup_object(snowball) {
                    events.push(GameEvent::FoxPickedUp { snowball: other.id });
                }
            }
        }
    }
}
