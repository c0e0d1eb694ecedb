//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers are stored resume-at times, checked once per tick
//! - Stable iteration order (by collider ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod clock;
pub mod countdown;
pub mod destroyable;
pub mod elevator;
pub mod events;
pub mod first_person;
pub mod flags;
pub mod fox;
pub mod ice;
pub mod look;
pub mod obstacle;
pub mod pickup;
pub mod run;
pub mod runner;
pub mod sandbox;
pub mod scoring;
pub mod spawner;
pub mod volume;

pub use body::{Body, FlatGround, ForceMode, GroundProbe};
pub use boundary::Boundary;
pub use clock::{Clock, Delay};
pub use countdown::Countdown;
pub use destroyable::Destroyable;
pub use elevator::{Activation, Arrival, Deactivation, Elevator, ElevatorStep};
pub use events::{CountdownCue, FoxAction, GameEvent, RunnerClip};
pub use first_person::{FirstPersonMovement, MoveInput, Slidable};
pub use flags::MovementState;
pub use fox::{Fox, NavAgent};
pub use ice::Ice;
pub use look::{Look, LookInput};
pub use obstacle::Obstacle;
pub use pickup::{PickerUpper, PickupHandler, PickupState, Snowball};
pub use run::{RunWorld, TickInput};
pub use runner::{JumpPhase, Runner, RunnerInput};
pub use sandbox::{Sandbox, SandboxInput, Target};
pub use scoring::{Coin, DistanceTicker, Scoreboard};
pub use spawner::{Segment, SegmentSpawner, sweep_expired};
pub use volume::{Aabb, Collider, ColliderId, Contact, ContactTracker, Tag};
