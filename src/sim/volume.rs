//! Trigger volumes and contact tracking
//!
//! The host physics normally reports trigger enter/exit. For headless runs
//! the worlds derive those edges from axis-aligned box overlaps instead.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identity of anything that can touch a trigger
pub type ColliderId = u32;

/// Classification consulted by trigger handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    Player,
    Untagged,
}

/// The other party of a trigger or collision event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collider {
    pub id: ColliderId,
    pub tag: Tag,
}

impl Collider {
    pub fn player(id: ColliderId) -> Self {
        Self {
            id,
            tag: Tag::Player,
        }
    }

    pub fn untagged(id: ColliderId) -> Self {
        Self {
            id,
            tag: Tag::Untagged,
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.tag == Tag::Player
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Height of the top face
    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x <= reach.x && d.y <= reach.y && d.z <= reach.z
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y && d.z <= self.half_extents.z
    }

    /// Whether `point` lies within the box footprint on the XZ plane
    pub fn covers_xz(&self, point: Vec3) -> bool {
        (point.x - self.center.x).abs() <= self.half_extents.x
            && (point.z - self.center.z).abs() <= self.half_extents.z
    }
}

/// Enter/exit edge for one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Enter(Collider),
    Exit(Collider),
}

/// Remembers who was overlapping last tick so overlaps become edges
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    touching: BTreeMap<ColliderId, Collider>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's overlaps; returns enters and exits in id order
    pub fn update<'a>(&mut self, overlapping: impl IntoIterator<Item = &'a Collider>) -> Vec<Contact> {
        let now: BTreeMap<ColliderId, Collider> =
            overlapping.into_iter().map(|c| (c.id, *c)).collect();

        let mut contacts: Vec<Contact> = now
            .values()
            .filter(|c| !self.touching.contains_key(&c.id))
            .map(|c| Contact::Enter(*c))
            .collect();
        contacts.extend(
            self.touching
                .values()
                .filter(|c| !now.contains_key(&c.id))
                .map(|c| Contact::Exit(*c)),
        );

        self.touching = now;
        contacts.sort_by_key(|c| match c {
            Contact::Enter(c) | Contact::Exit(c) => c.id,
        });
        contacts
    }

    pub fn is_touching(&self, id: ColliderId) -> bool {
        self.touching.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.5, 0.0, 0.0), Vec3::splat(0.5));
        let c = Aabb::new(Vec3::new(3.0, 0.0, 0.0), Vec3::splat(0.5));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.contains_point(Vec3::new(0.5, -0.5, 0.9)));
        assert_eq!(a.top(), 1.0);
    }

    #[test]
    fn test_contact_edges() {
        let mut tracker = ContactTracker::new();
        let player = Collider::player(1);

        assert_eq!(tracker.update([&player]), vec![Contact::Enter(player)]);
        // Still overlapping: no new edge
        assert!(tracker.update([&player]).is_empty());
        assert!(tracker.is_touching(1));

        assert_eq!(tracker.update([]), vec![Contact::Exit(player)]);
        assert!(!tracker.is_touching(1));
    }
}
