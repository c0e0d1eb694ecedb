//! Heads-up display
//!
//! The HUD pushes score text into whatever displays the host provides.

use crate::sim::scoring::Scoreboard;

/// A piece of on-screen text
pub trait TextDisplay {
    fn set_text(&mut self, text: &str);
}

/// Display that keeps its text in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLabel {
    text: String,
}

impl TextLabel {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl TextDisplay for TextLabel {
    fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
        }
    }
}

/// Coin count, running distance and the distance on the end screen
#[derive(Debug, Clone, Default)]
pub struct Hud<D: TextDisplay> {
    pub coins: D,
    pub distance: D,
    pub end_distance: D,
}

impl<D: TextDisplay> Hud<D> {
    pub fn new(coins: D, distance: D, end_distance: D) -> Self {
        Self {
            coins,
            distance,
            end_distance,
        }
    }

    /// Show the latest totals
    pub fn refresh(&mut self, score: &Scoreboard) {
        self.coins.set_text(&score.coins.to_string());

        let distance = score.distance.to_string();
        self.distance.set_text(&distance);
        self.end_distance.set_text(&distance);
    }
}
