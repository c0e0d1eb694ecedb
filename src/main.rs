//! Endless Run - headless driver
//!
//! Plays a scripted runner session and a scripted sandbox session at a
//! 60 Hz frame rate, stepping the simulation at its fixed timestep.
//! Pass a settings JSON path as the first argument to override defaults.

use endless_run::audio::AudioManager;
use endless_run::consts::{MAX_SUBSTEPS, SIM_DT};
use endless_run::hud::{Hud, TextLabel};
use endless_run::sim::{GameEvent, LookInput, MoveInput, RunWorld, Sandbox, SandboxInput, TickInput};
use endless_run::{ConfigError, Settings};
use glam::Vec3;

const FRAME_DT: f32 = 1.0 / 60.0;
const RUN_SECONDS: f32 = 40.0;
const SANDBOX_SECONDS: f32 = 30.0;

/// Turns variable frame times into whole simulation steps
#[derive(Debug, Default)]
struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    /// Number of fixed steps owed for this frame
    fn substeps(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::DistanceChanged(_) => log::trace!("{:?}", event),
            _ => log::debug!("{:?}", event),
        }
    }
}

/// Lay out a few coins and obstacles along the first stretch of track
fn populate_track(world: &mut RunWorld) {
    for i in 1..40 {
        let z = i as f32 * 12.0;
        let lane = [-3.0, 0.0, 3.0][i % 3];
        world.add_coin(Vec3::new(lane, 1.0, z));
    }
    world.add_obstacle(Vec3::new(0.0, 0.5, 240.0), Vec3::new(4.5, 0.5, 0.5));
}

/// Weave between lanes once the countdown is over and hop now and then
fn runner_input(time: f32) -> TickInput {
    let phase = (time / 2.0) as u32 % 4;
    TickInput {
        left: phase == 1,
        right: phase == 3,
        jump: time > 4.0 && time % 5.0 < 0.1,
    }
}

fn run_runner(settings: &Settings) -> Result<(), ConfigError> {
    let mut world = RunWorld::new(settings)?;
    populate_track(&mut world);

    let mut hud = Hud::<TextLabel>::default();
    let mut audio = AudioManager::default();
    let mut frames = FrameClock::default();
    let mut time = 0.0;

    while time < RUN_SECONDS {
        time += FRAME_DT;
        let input = runner_input(time);
        for _ in 0..frames.substeps(FRAME_DT) {
            let events = world.tick(&input, SIM_DT);
            log_events(&events);
            audio.handle_events(&events);
        }
        hud.refresh(&world.score);

        if world.is_crashed() {
            log::info!("Crashed at z={:.1}", world.runner.position.z);
            break;
        }
    }

    log::info!(
        "Run over: coins {} distance {} segments live {}",
        hud.coins.text(),
        hud.end_distance.text(),
        world.segments.len()
    );
    Ok(())
}

/// Walk to the snowballs, throw one for the fox, then ride the elevator
fn sandbox_input(time: f32, previous: f32) -> SandboxInput {
    let crossed = |t: f32| previous < t && time >= t;
    let walking = time < 0.15 || (20.0..20.65).contains(&time);

    SandboxInput {
        movement: MoveInput {
            vertical: if walking { 1.0 } else { 0.0 },
            ..Default::default()
        },
        look: LookInput {
            click: crossed(0.2),
            ..Default::default()
        },
        release: crossed(0.5),
    }
}

fn run_sandbox(settings: &Settings) -> Result<(), ConfigError> {
    let mut sandbox = Sandbox::demo(settings)?;
    for (i, elevator) in sandbox.elevators.iter_mut().enumerate() {
        elevator.subscribe(move |arrival| log::info!("Elevator {} reached {:?}", i, arrival.position));
    }

    let mut frames = FrameClock::default();
    let mut time = 0.0;

    while time < SANDBOX_SECONDS {
        let previous = time;
        time += FRAME_DT;
        let mut input = sandbox_input(time, previous);
        for _ in 0..frames.substeps(FRAME_DT) {
            let events = sandbox.step(&input, SIM_DT);
            log_events(&events);

            // One-shot buttons only count for the first substep
            input.look.click = false;
            input.release = false;
        }
    }

    let player = sandbox.player.body.position;
    log::info!("Sandbox over: player at ({:.1}, {:.1}, {:.1})", player.x, player.y, player.z);
    for target in &sandbox.targets {
        log::info!("Target {} health {}", target.id, target.health.health());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Endless Run (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings: {}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    if let Err(e) = run_runner(&settings).and_then(|()| run_sandbox(&settings)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
