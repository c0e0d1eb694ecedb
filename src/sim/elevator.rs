//! Moving platforms
//!
//! An elevator loops through a list of destinations, easing up to speed
//! each time it sets off. What starts and stops it is chosen by its
//! activation and deactivation modes. Anything that enters the trigger and
//! qualifies under the activation mode is an activator; players always
//! become riders and are carried along with the platform.

use std::collections::BTreeSet;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::volume::{Aabb, Collider, ColliderId, Tag};
use crate::consts::ARRIVAL_SQR_MARGIN;
use crate::error::ConfigError;
use crate::settings::ElevatorConfig;
use crate::{move_towards, smooth_step, wrap_index};

/// Height of the trigger zone above the platform surface
const TRIGGER_HEIGHT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activation {
    /// Starts moving on its own
    Automatic,
    /// Moves while the player is on it
    #[default]
    Player,
    /// Moves while anything is on it
    Everything,
    /// Only moves when told to
    Manual,
}

/// What happens once the last activator leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Deactivation {
    Stop,
    /// Finish the trip to the next destination
    Continue,
    /// Head back to the previous destination
    #[default]
    Return,
}

/// Where the platform is heading
#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Destination(usize),
    Point(Vec3),
}

/// Arrival notice passed to listeners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    /// `None` when arriving at a point given to `move_to`
    pub index: Option<usize>,
    pub position: Vec3,
}

/// Result of one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElevatorStep {
    /// How far the platform moved; riders move with it
    pub displacement: Vec3,
    pub arrived: Option<Arrival>,
}

type ArrivalListener = Box<dyn FnMut(&Arrival)>;

pub struct Elevator {
    position: Vec3,
    destinations: Vec<Vec3>,
    move_speed: f32,
    startup_time: f32,
    activation: Activation,
    deactivation: Deactivation,
    half_extents: Vec3,

    moving: bool,
    target: Target,
    destination_index: usize,
    reversing: bool,
    startup_elapsed: f32,
    activators: BTreeSet<ColliderId>,
    riders: BTreeSet<ColliderId>,
    listeners: Vec<ArrivalListener>,
}

impl fmt::Debug for Elevator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Elevator")
            .field("position", &self.position)
            .field("moving", &self.moving)
            .field("target", &self.target)
            .field("destination_index", &self.destination_index)
            .field("reversing", &self.reversing)
            .field("activators", &self.activators)
            .field("riders", &self.riders)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Elevator {
    pub fn new(config: &ElevatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = config.destinations[0];

        Ok(Self {
            position: start,
            destinations: config.destinations.clone(),
            move_speed: config.move_speed,
            startup_time: config.startup_time,
            activation: config.activation,
            deactivation: config.deactivation,
            half_extents: config.half_extents,
            moving: config.activation == Activation::Automatic,
            target: Target::Destination(0),
            destination_index: 0,
            reversing: false,
            startup_elapsed: 0.0,
            activators: BTreeSet::new(),
            riders: BTreeSet::new(),
            listeners: Vec::new(),
        })
    }

    /// Register a callback for every arrival
    pub fn subscribe(&mut self, listener: impl FnMut(&Arrival) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn fixed_step(&mut self, dt: f32) -> ElevatorStep {
        if !self.moving {
            return ElevatorStep::default();
        }

        self.startup_elapsed += dt;
        let speed = if self.startup_time == 0.0 {
            self.move_speed
        } else {
            smooth_step(0.0, self.move_speed, self.startup_elapsed / self.startup_time)
        };

        let goal = self.target_position();
        let previous = self.position;
        self.position = move_towards(self.position, goal, speed * dt);

        let mut step = ElevatorStep {
            displacement: self.position - previous,
            arrived: None,
        };

        if self.position.distance_squared(goal) < ARRIVAL_SQR_MARGIN {
            step.arrived = Some(self.arrive());
        }
        step
    }

    fn arrive(&mut self) -> Arrival {
        let arrival = Arrival {
            index: match self.target {
                Target::Destination(index) => Some(index),
                Target::Point(_) => None,
            },
            position: self.target_position(),
        };
        log::debug!("Platform arrived at {:?} ({:?})", arrival.index, arrival.position);
        for listener in &mut self.listeners {
            listener(&arrival);
        }

        self.startup_elapsed = 0.0;

        match self.activation {
            Activation::Manual => {
                self.moving = false;
                return arrival;
            }
            Activation::Player | Activation::Everything => {
                self.moving = !self.activators.is_empty();
            }
            Activation::Automatic => {}
        }

        self.advance(false);
        arrival
    }

    fn qualifies(&self, other: &Collider) -> bool {
        match self.activation {
            Activation::Everything => true,
            Activation::Player => other.tag == Tag::Player,
            Activation::Automatic | Activation::Manual => false,
        }
    }

    pub fn on_trigger_enter(&mut self, other: &Collider) {
        if other.is_player() {
            self.riders.insert(other.id);
        }

        if self.qualifies(other) {
            self.moving = true;
            self.startup_elapsed = 0.0;
            self.activators.insert(other.id);

            if self.reversing {
                self.advance(false);
            }
        }
    }

    pub fn on_trigger_exit(&mut self, other: &Collider) {
        if other.is_player() {
            self.riders.remove(&other.id);
        }

        if self.qualifies(other) {
            self.activators.remove(&other.id);
            self.deactivate();
        }
    }

    fn deactivate(&mut self) {
        self.startup_elapsed = 0.0;

        match self.deactivation {
            Deactivation::Stop => self.moving = !self.activators.is_empty(),
            Deactivation::Continue => {}
            Deactivation::Return => {
                if self.activators.is_empty() {
                    self.advance(true);
                }
            }
        }
    }

    /// Send the platform somewhere outside its destination list
    pub fn move_to(&mut self, point: Vec3) {
        self.target = Target::Point(point);
        self.moving = true;
        self.startup_elapsed = 0.0;
    }

    fn advance(&mut self, reverse: bool) {
        self.reversing = reverse;
        let step = if reverse { -1 } else { 1 };
        self.destination_index =
            wrap_index(self.destination_index as isize + step, self.destinations.len());
        self.target = Target::Destination(self.destination_index);
    }

    fn target_position(&self) -> Vec3 {
        match self.target {
            Target::Destination(index) => self.destinations[index],
            Target::Point(point) => point,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn destination_index(&self) -> usize {
        self.destination_index
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_reversing(&self) -> bool {
        self.reversing
    }

    pub fn is_riding(&self, id: ColliderId) -> bool {
        self.riders.contains(&id)
    }

    pub fn riders(&self) -> impl Iterator<Item = ColliderId> + '_ {
        self.riders.iter().copied()
    }

    /// Solid platform surface
    pub fn platform(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    /// Zone just above the platform that detects riders
    pub fn trigger(&self) -> Aabb {
        let half = self.half_extents + Vec3::Y * TRIGGER_HEIGHT / 2.0;
        Aabb::new(self.position + Vec3::Y * TRIGGER_HEIGHT / 2.0, half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const DT: f32 = 0.02;

    fn config(activation: Activation, deactivation: Deactivation) -> ElevatorConfig {
        ElevatorConfig {
            destinations: vec![
                Vec3::ZERO,
                Vec3::new(0.0, 4.0, 0.0),
                Vec3::new(4.0, 4.0, 0.0),
            ],
            move_speed: 5.0,
            startup_time: 0.0,
            activation,
            deactivation,
            ..ElevatorConfig::default()
        }
    }

    /// Steps until the next arrival, giving up after a long while
    fn run_to_arrival(elevator: &mut Elevator) -> Option<Arrival> {
        (0..2000).find_map(|_| elevator.fixed_step(DT).arrived)
    }

    #[test]
    fn test_rejects_empty_destinations() {
        let config = ElevatorConfig {
            destinations: Vec::new(),
            ..ElevatorConfig::default()
        };
        assert!(matches!(Elevator::new(&config), Err(ConfigError::NoDestinations)));
    }

    #[test]
    fn test_automatic_moves_without_trigger() {
        let mut elevator = Elevator::new(&config(Activation::Automatic, Deactivation::Stop)).expect("valid");
        assert!(elevator.is_moving());

        // Already parked on the first stop
        let first = elevator.fixed_step(DT);
        assert_eq!(first.arrived.map(|a| a.index), Some(Some(0)));

        let step = elevator.fixed_step(DT);
        assert!(step.displacement.y > 0.0);
    }

    #[test]
    fn test_arrivals_cycle_through_destinations() {
        let mut elevator = Elevator::new(&config(Activation::Automatic, Deactivation::Stop)).expect("valid");
        // Starts on destination 0, so the first trip arrives right away
        let mut seen = Vec::new();
        for n in 1..=7 {
            let arrival = run_to_arrival(&mut elevator).expect("arrives");
            seen.push(arrival.index);
            assert_eq!(elevator.destination_index(), n % 3);
        }
        assert_eq!(
            seen,
            vec![Some(0), Some(1), Some(2), Some(0), Some(1), Some(2), Some(0)]
        );
    }

    #[test]
    fn test_player_mode_waits_for_player() {
        let mut elevator = Elevator::new(&config(Activation::Player, Deactivation::Stop)).expect("valid");
        assert_eq!(elevator.fixed_step(DT), ElevatorStep::default());

        // Crates don't count in player mode
        elevator.on_trigger_enter(&Collider::untagged(9));
        assert!(!elevator.is_moving());

        elevator.on_trigger_enter(&Collider::player(1));
        assert!(elevator.is_moving());
        assert!(elevator.is_riding(1));
    }

    #[test]
    fn test_return_heads_back_when_player_leaves() {
        let mut elevator = Elevator::new(&config(Activation::Player, Deactivation::Return)).expect("valid");
        let player = Collider::player(1);
        elevator.on_trigger_enter(&player);

        // Arrive at 0 then at 1, now heading to 2
        run_to_arrival(&mut elevator);
        run_to_arrival(&mut elevator);
        assert_eq!(elevator.destination_index(), 2);
        elevator.fixed_step(DT);

        elevator.on_trigger_exit(&player);
        assert!(elevator.is_reversing());
        assert_eq!(elevator.destination_index(), 1);
        assert!(!elevator.is_riding(1));

        let arrival = run_to_arrival(&mut elevator).expect("returns");
        assert_eq!(arrival.index, Some(1));
        // Nobody aboard, so it parks
        assert!(!elevator.is_moving());
    }

    #[test]
    fn test_reentering_goes_forward_again() {
        let mut elevator = Elevator::new(&config(Activation::Player, Deactivation::Return)).expect("valid");
        let player = Collider::player(1);
        elevator.on_trigger_enter(&player);
        run_to_arrival(&mut elevator);
        assert_eq!(elevator.destination_index(), 1);

        elevator.on_trigger_exit(&player);
        assert_eq!(elevator.destination_index(), 0);

        elevator.on_trigger_enter(&player);
        assert!(!elevator.is_reversing());
        assert_eq!(elevator.destination_index(), 1);
    }

    #[test]
    fn test_stop_and_continue() {
        let player = Collider::player(1);

        let mut stop = Elevator::new(&config(Activation::Player, Deactivation::Stop)).expect("valid");
        stop.on_trigger_enter(&player);
        stop.on_trigger_exit(&player);
        assert!(!stop.is_moving());

        let mut cont = Elevator::new(&config(Activation::Player, Deactivation::Continue)).expect("valid");
        cont.on_trigger_enter(&player);
        run_to_arrival(&mut cont);
        cont.on_trigger_exit(&player);
        assert!(cont.is_moving());
        let arrival = run_to_arrival(&mut cont).expect("finishes the trip");
        assert_eq!(arrival.index, Some(1));
        assert!(!cont.is_moving());
    }

    #[test]
    fn test_everything_counts_each_activator_once() {
        let mut elevator = Elevator::new(&config(Activation::Everything, Deactivation::Stop)).expect("valid");
        let crate_box = Collider::untagged(4);
        elevator.on_trigger_enter(&crate_box);
        elevator.on_trigger_enter(&crate_box);
        assert!(!elevator.is_riding(4));

        elevator.on_trigger_exit(&crate_box);
        assert!(!elevator.is_moving());
    }

    #[test]
    fn test_manual_move_to_point() {
        let mut elevator = Elevator::new(&config(Activation::Manual, Deactivation::Stop)).expect("valid");
        elevator.on_trigger_enter(&Collider::player(1));
        assert!(!elevator.is_moving());

        let point = Vec3::new(0.0, 0.0, 2.0);
        elevator.move_to(point);
        let arrival = run_to_arrival(&mut elevator).expect("arrives");
        assert_eq!(arrival.index, None);
        assert_eq!(arrival.position, point);
        assert!(!elevator.is_moving());
        // Manual arrivals never advance
        assert_eq!(elevator.destination_index(), 0);
    }

    #[test]
    fn test_startup_eases_in() {
        let config = ElevatorConfig {
            startup_time: 2.0,
            ..config(Activation::Automatic, Deactivation::Stop)
        };
        let mut elevator = Elevator::new(&config).expect("valid");
        run_to_arrival(&mut elevator);

        let first = elevator.fixed_step(DT).displacement.length();
        let second = elevator.fixed_step(DT).displacement.length();
        assert!(first < second);
        assert!(second < 5.0 * DT);
    }

    #[test]
    fn test_listeners_hear_arrivals() {
        let heard = Rc::new(RefCell::new(Vec::new()));
        let mut elevator = Elevator::new(&config(Activation::Automatic, Deactivation::Stop)).expect("valid");
        let sink = Rc::clone(&heard);
        elevator.subscribe(move |arrival| sink.borrow_mut().push(arrival.index));

        run_to_arrival(&mut elevator);
        run_to_arrival(&mut elevator);
        assert_eq!(*heard.borrow(), vec![Some(0), Some(1)]);
    }
}
