//! Entity storage with a coalescing change feed
//!
//! Observers do not get callbacks. Instead the collection accumulates
//! changes until [`EntityCollection::take_changes`] is called, folding them
//! so that each entity appears at most once:
//!
//! - added then removed before observation: reported as nothing
//! - added then mutated: reported as added
//! - mutated then removed: reported as removed

use std::collections::HashMap;

use thiserror::Error;

use crate::foundation::collections::{EntityId, SecondaryMap, SlotMap};
use super::entity::Entity;

/// Errors raised by entity collections
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Entity names must be unique within a collection
    #[error("An entity named '{0}' already exists")]
    DuplicateName(String),
}

/// Changes accumulated since the previous observation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Entities added
    pub added: Vec<EntityId>,
    /// Entities removed
    pub removed: Vec<EntityId>,
    /// Entities mutated but neither added nor removed
    pub changed: Vec<EntityId>,
}

impl ChangeSet {
    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Added,
    Changed,
}

/// Arena of entities keyed by [`EntityId`]
#[derive(Debug, Default)]
pub struct EntityCollection {
    entities: SlotMap<EntityId, Entity>,
    by_name: HashMap<String, EntityId>,
    pending: SecondaryMap<EntityId, Pending>,
    removed: Vec<EntityId>,
}

impl EntityCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity
    pub fn add(&mut self, entity: Entity) -> Result<EntityId, SceneError> {
        if self.by_name.contains_key(entity.name()) {
            return Err(SceneError::DuplicateName(entity.name().to_string()));
        }
        let name = entity.name().to_string();
        let id = self.entities.insert(entity);
        self.by_name.insert(name, id);
        self.pending.insert(id, Pending::Added);
        Ok(id)
    }

    /// Remove an entity, returning it
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        self.by_name.remove(entity.name());
        if self.pending.remove(id) != Some(Pending::Added) {
            self.removed.push(id);
        }
        Some(entity)
    }

    /// Look up an entity
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Look up an entity for mutation, recording it as changed
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let entity = self.entities.get_mut(id)?;
        if !self.pending.contains_key(id) {
            self.pending.insert(id, Pending::Changed);
        }
        Some(entity)
    }

    /// Look up an entity id by name
    pub fn id_by_name(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    /// Look up an entity by name
    pub fn get_by_name(&self, name: &str) -> Option<&Entity> {
        self.id_by_name(name).and_then(|id| self.get(id))
    }

    /// Whether the id refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate live entities
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    /// Whether changes are waiting to be observed
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty() || !self.removed.is_empty()
    }

    /// Drain the changes accumulated since the previous call
    pub fn take_changes(&mut self) -> ChangeSet {
        let mut changes = ChangeSet {
            removed: std::mem::take(&mut self.removed),
            ..ChangeSet::default()
        };
        for (id, pending) in self.pending.drain() {
            match pending {
                Pending::Added => changes.added.push(id),
                Pending::Changed => changes.changed.push(id),
            }
        }
        changes
    }
}
