//! The global set of currently blocking colliders.
//!
//! Doors add and remove their collider entity here as they close and open;
//! the movement resolver reads it every frame. Insertion order is kept so
//! collision checks are deterministic.

use bevy_ecs::prelude::{Entity, Resource};

#[derive(Resource, Debug, Clone, Default)]
pub struct ColliderSet {
    entries: Vec<Entity>,
}

impl ColliderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collider unless it is already present. Returns `true` if added.
    pub fn insert(&mut self, collider: Entity) -> bool {
        if self.contains(collider) {
            return false;
        }
        self.entries.push(collider);
        true
    }

    /// Remove a collider. Returns `true` if it was present.
    pub fn remove(&mut self, collider: Entity) -> bool {
        match self.entries.iter().position(|e| *e == collider) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, collider: Entity) -> bool {
        self.entries.contains(&collider)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
