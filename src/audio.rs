//! Sound effects
//!
//! The simulation never plays sounds itself. Worlds emit `GameEvent`s and
//! the audio manager maps them to effects and hands those to a sink.

use crate::sim::events::{CountdownCue, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin picked up
    CoinCollected,
    /// Countdown number shown
    CountdownBeep,
    /// Countdown finished
    Go,
    /// Runner hit an obstacle
    CrashThud,
}

impl SoundEffect {
    /// Effect to play for an event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::CoinCollected { .. } => Some(Self::CoinCollected),
            GameEvent::Countdown(CountdownCue::Number(_)) => Some(Self::CountdownBeep),
            GameEvent::Countdown(CountdownCue::Go) => Some(Self::Go),
            GameEvent::Crashed { .. } => Some(Self::CrashThud),
            _ => None,
        }
    }
}

/// Whatever actually makes the noise
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Logs effects instead of playing them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::info!("Sound: {:?} at {:.2}", effect, volume);
    }
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<LogAudio> {
    fn default() -> Self {
        Self::new(LogAudio)
    }
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.7,
            sfx_volume: 0.8,
            muted: false,
        }
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Play the effects for one tick's events, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
