//! Interactive object registry.
//!
//! Maps every [`Interactable`](crate::components::interactable::Interactable)
//! id to its entity and keeps registration order, which is the order the
//! pick list is reported in.

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegisterError {
    #[error("interactive object id `{0}` is already registered")]
    DuplicateId(String),
}

#[derive(Resource, Debug, Clone, Default)]
pub struct InteractiveRegistry {
    by_id: FxHashMap<String, Entity>,
    order: Vec<Entity>,
}

impl InteractiveRegistry {
    pub fn register(&mut self, id: &str, entity: Entity) -> Result<(), RegisterError> {
        if self.by_id.contains_key(id) {
            return Err(RegisterError::DuplicateId(id.to_string()));
        }
        self.by_id.insert(id.to_string(), entity);
        self.order.push(entity);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Entity> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Entities in registration order.
    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
        self.order.clear();
    }
}
