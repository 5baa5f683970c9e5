//! Layer 4: The local collection
//!
//! In-memory ordered mirror of the server collection, keyed by identifier.
//! Every mutating operation recomputes the derived stats before returning
//! and bumps a version counter the memoized view keys on.

use super::entity::Entity;
use super::error::CoreError;
use super::fields::Fields;
use super::identity::{EntityId, TempId};
use super::stats::Stats;

/// Ordered collection of entities with derived stats.
///
/// Invariants:
/// - at most one entity per identifier (temp or real);
/// - `stats` always reflects the current entries;
/// - `version` strictly increases across successful mutations.
#[derive(Clone, Debug)]
pub struct Collection {
    entries: Vec<Entity>,
    done_field: String,
    stats: Stats,
    version: u64,
}

impl Collection {
    pub fn new(done_field: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            done_field: done_field.into(),
            stats: Stats::default(),
            version: 0,
        }
    }

    pub fn done_field(&self) -> &str {
        &self.done_field
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Entity] {
        &self.entries
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entries[i])
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index_of(id).is_some()
    }

    /// Wholesale replacement after a list fetch.
    pub fn replace_all(&mut self, entities: Vec<Entity>) -> Result<(), CoreError> {
        for (i, entity) in entities.iter().enumerate() {
            if entities[..i].iter().any(|e| e.id == entity.id) {
                return Err(CoreError::DuplicateId {
                    id: entity.id.as_str().to_string(),
                });
            }
        }
        self.entries = entities;
        self.touch();
        Ok(())
    }

    /// Append a placeholder entity awaiting its first create response.
    pub fn insert_optimistic(&mut self, entity: Entity) -> Result<(), CoreError> {
        if !entity.id.is_local() {
            return Err(CoreError::DuplicateId {
                id: entity.id.as_str().to_string(),
            });
        }
        self.insert_unique(entity)
    }

    /// Replace the placeholder with the confirmed entity, matched by temp id.
    pub fn reconcile(&mut self, temp_id: &TempId, confirmed: Entity) -> Result<(), CoreError> {
        let temp = EntityId::Local(temp_id.clone());
        let index = self.index_of(&temp).ok_or_else(|| CoreError::UnknownId {
            id: temp_id.as_str().to_string(),
        })?;
        // The confirmed id must not collide with any other entry.
        if self
            .entries
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && e.id == confirmed.id)
        {
            return Err(CoreError::DuplicateId {
                id: confirmed.id.as_str().to_string(),
            });
        }
        self.entries[index] = confirmed;
        self.touch();
        Ok(())
    }

    /// Remove the placeholder when reconciliation never arrives.
    pub fn rollback_insert(&mut self, temp_id: &TempId) -> Result<Entity, CoreError> {
        self.remove(&EntityId::Local(temp_id.clone()))
    }

    /// Overlay `patch` onto the entity, returning a clone of the entity as
    /// it was before the patch.
    pub fn patch(&mut self, id: &EntityId, patch: &Fields) -> Result<Entity, CoreError> {
        let index = self.require(id)?;
        let previous = self.entries[index].clone();
        self.entries[index].fields.apply(patch);
        self.touch();
        Ok(previous)
    }

    /// Undo a patch by restoring the captured pre-patch entity.
    pub fn rollback_patch(&mut self, id: &EntityId, previous: Entity) -> Result<(), CoreError> {
        let index = self.require(id)?;
        self.entries[index] = previous;
        self.touch();
        Ok(())
    }

    /// Replace the local copy with the server's confirmed representation.
    pub fn confirm(&mut self, id: &EntityId, server_copy: Entity) -> Result<(), CoreError> {
        let index = self.require(id)?;
        if self
            .entries
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && e.id == server_copy.id)
        {
            return Err(CoreError::DuplicateId {
                id: server_copy.id.as_str().to_string(),
            });
        }
        self.entries[index] = server_copy;
        self.touch();
        Ok(())
    }

    /// Optimistic deletion, returning the removed entity for a later restore.
    pub fn remove(&mut self, id: &EntityId) -> Result<Entity, CoreError> {
        let index = self.require(id)?;
        let removed = self.entries.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Undo a deletion. Presence and field values are restored exactly;
    /// position is not preserved (the entity is appended).
    pub fn restore(&mut self, entity: Entity) -> Result<(), CoreError> {
        self.insert_unique(entity)
    }

    fn insert_unique(&mut self, entity: Entity) -> Result<(), CoreError> {
        if self.contains(&entity.id) {
            return Err(CoreError::DuplicateId {
                id: entity.id.as_str().to_string(),
            });
        }
        self.entries.push(entity);
        self.touch();
        Ok(())
    }

    fn require(&self, id: &EntityId) -> Result<usize, CoreError> {
        self.index_of(id).ok_or_else(|| CoreError::UnknownId {
            id: id.as_str().to_string(),
        })
    }

    fn index_of(&self, id: &EntityId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    fn touch(&mut self) {
        self.stats = Stats::compute(self.entries.iter(), &self.done_field);
        self.version += 1;
    }
}
