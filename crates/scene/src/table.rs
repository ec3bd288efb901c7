//! Named entity table: the single owning wrapper around the arena.
//!
//! Every create/destroy path goes through this table, so the name index can
//! never dangle: a name is bound in the same call that fills a slot and
//! unbound in the same call that frees it. Unnamed entities never enter the
//! index; they are addressed by their synthesized display identifier only.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::arena::{Entity, EntityArena, EntityId};

/// Returned when a spawn would shadow an existing name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entity with name \"{0}\" already exists")]
pub struct NameTaken(pub String);

/// The live object store: entity arena plus name index.
#[derive(Debug, Default)]
pub struct NamedEntityTable {
    arena: EntityArena,
    names: BTreeMap<String, EntityId>,
}

impl NamedEntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities, named or not.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Spawn an entity, binding `name` when it is non-empty.
    ///
    /// An empty `name` leaves the entity unnamed; it is then reachable only
    /// through its handle.
    pub fn spawn(&mut self, entity: Entity, name: &str) -> Result<EntityId, NameTaken> {
        if !name.is_empty() && self.names.contains_key(name) {
            return Err(NameTaken(name.to_string()));
        }
        let id = self.arena.insert(entity);
        if !name.is_empty() {
            self.names.insert(name.to_string(), id);
        }
        Ok(id)
    }

    /// Destroy by handle, unbinding its name if it had one.
    pub fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.arena.remove(id)?;
        self.names.retain(|_, bound| *bound != id);
        Some(entity)
    }

    /// Destroy by name. Returns the freed handle, or `None` if the name is
    /// not bound.
    pub fn destroy_named(&mut self, name: &str) -> Option<EntityId> {
        let id = self.names.remove(name)?;
        self.arena.remove(id);
        Some(id)
    }

    /// Destroy every entity and reset the name index, returning the count
    /// destroyed.
    pub fn clear(&mut self) -> usize {
        self.names.clear();
        self.arena.clear()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.arena.get_mut(id)
    }

    /// Resolve a name to its handle.
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Resolve the name bound to a handle, if any.
    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, bound)| **bound == id)
            .map(|(name, _)| name.as_str())
    }

    /// Iterate live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.arena.iter()
    }
}
