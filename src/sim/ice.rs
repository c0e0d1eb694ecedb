//! Slippery surfaces

use serde::{Deserialize, Serialize};

use super::first_person::Slidable;
use super::volume::Aabb;

/// Puts whatever touches it into sliding and releases it on exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ice {
    pub volume: Aabb,
}

impl Ice {
    pub fn new(volume: Aabb) -> Self {
        Self { volume }
    }

    /// `other` is `None` when the touching object cannot slide
    pub fn on_collision_enter(&self, other: Option<&mut dyn Slidable>) {
        if let Some(slidable) = other {
            slidable.set_sliding(true);
        }
    }

    pub fn on_collision_exit(&self, other: Option<&mut dyn Slidable>) {
        if let Some(slidable) = other {
            slidable.set_sliding(false);
        }
    }
}
