//! The mutation engine.
//!
//! Each mutation walks one of two paths: Applied-Locally -> Confirmed, or
//! Applied-Locally -> Rolled-Back. Exactly one remote attempt; no automatic
//! retry. Mutations report a [`MutationOutcome`] instead of propagating an
//! error, so callers present the message without a failure path of their
//! own. Only list/stats fetches return `Result`.
//!
//! Mutations run their remote call to completion before the next one
//! applies, so two rapid toggles on the same entity cannot interleave;
//! against the server, last response still wins.

use crate::core::{
    Collection, Entity, EntityId, Fields, ListFilter, ResourceSpec, Stats, TempId,
};
use crate::remote::{RemoteError, RemoteResource};
use crate::Result;

/// Terminal state of one mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationOutcome {
    /// Local state matches the server. `entity` is the server's copy where
    /// the operation has one (deletes do not).
    Confirmed { entity: Option<Entity> },
    /// Local state was reverted to its pre-mutation value.
    RolledBack { message: String },
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Confirmed { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            MutationOutcome::Confirmed { .. } => None,
            MutationOutcome::RolledBack { message } => Some(message),
        }
    }

    pub fn entity(&self) -> Option<&Entity> {
        match self {
            MutationOutcome::Confirmed { entity } => entity.as_ref(),
            MutationOutcome::RolledBack { .. } => None,
        }
    }

    fn rolled_back(err: &RemoteError) -> Self {
        MutationOutcome::RolledBack {
            message: err.to_string(),
        }
    }
}

/// Owns the local collection and drives it against a remote resource.
pub struct Engine<R: RemoteResource> {
    collection: Collection,
    remote: R,
}

impl<R: RemoteResource> Engine<R> {
    pub fn new(spec: &ResourceSpec, remote: R) -> Self {
        Self {
            collection: Collection::new(spec.done_field()),
            remote,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn stats(&self) -> Stats {
        self.collection.stats()
    }

    /// Bulk fetch; replaces the whole local collection.
    pub fn refresh(&mut self, filter: &ListFilter) -> Result<usize> {
        let page = self.remote.list(filter)?;
        let count = page.items.len();
        self.collection.replace_all(page.items)?;
        tracing::debug!(count, "refreshed collection");
        Ok(count)
    }

    /// Server-side aggregate, for drift checks against local stats.
    pub fn remote_stats(&self) -> Result<Stats> {
        Ok(self.remote.stats()?)
    }

    /// Optimistic create: placeholder now, reconcile on the server's answer.
    pub fn create(&mut self, fields: Fields) -> MutationOutcome {
        let temp = TempId::generate();
        let placeholder = Entity::new(EntityId::Local(temp.clone()), fields.clone());
        if let Err(e) = self.collection.insert_optimistic(placeholder) {
            return MutationOutcome::RolledBack {
                message: e.to_string(),
            };
        }
        tracing::debug!(%temp, "applied optimistic create");

        match self.remote.create(&fields) {
            Ok(confirmed) => match self.collection.reconcile(&temp, confirmed.clone()) {
                Ok(()) => {
                    tracing::debug!(id = %confirmed.id, "create confirmed");
                    MutationOutcome::Confirmed {
                        entity: Some(confirmed),
                    }
                }
                Err(e) => {
                    // Server id collided with an existing entry; drop the
                    // placeholder rather than duplicate.
                    self.drop_placeholder(&temp);
                    tracing::warn!(%temp, "create reconcile failed: {e}");
                    MutationOutcome::RolledBack {
                        message: e.to_string(),
                    }
                }
            },
            Err(e) => {
                self.drop_placeholder(&temp);
                tracing::warn!(%temp, "create rolled back: {e}");
                MutationOutcome::rolled_back(&e)
            }
        }
    }

    /// Optimistic field update.
    pub fn update(&mut self, id: &EntityId, patch: &Fields) -> MutationOutcome {
        let previous = match self.collection.patch(id, patch) {
            Ok(previous) => previous,
            Err(e) => {
                return MutationOutcome::RolledBack {
                    message: e.to_string(),
                }
            }
        };
        tracing::debug!(%id, "applied optimistic update");

        match self.remote.update(id, patch) {
            Ok(server_copy) => self.confirm(id, server_copy, previous),
            Err(e) => {
                self.revert(id, previous);
                tracing::warn!(%id, "update rolled back: {e}");
                MutationOutcome::rolled_back(&e)
            }
        }
    }

    /// Toggle the completion flag: capture, flip locally, restore on failure.
    pub fn toggle(&mut self, id: &EntityId, done: bool) -> MutationOutcome {
        let mut patch = Fields::new();
        patch.set(
            self.collection.done_field().to_string(),
            serde_json::Value::Bool(done),
        );
        let previous = match self.collection.patch(id, &patch) {
            Ok(previous) => previous,
            Err(e) => {
                return MutationOutcome::RolledBack {
                    message: e.to_string(),
                }
            }
        };
        tracing::debug!(%id, done, "applied optimistic toggle");

        match self.remote.toggle(id, done) {
            Ok(server_copy) => self.confirm(id, server_copy, previous),
            Err(e) => {
                self.revert(id, previous);
                tracing::warn!(%id, "toggle rolled back: {e}");
                MutationOutcome::rolled_back(&e)
            }
        }
    }

    /// Optimistic delete: remove now, restore on failure.
    pub fn remove(&mut self, id: &EntityId) -> MutationOutcome {
        let removed = match self.collection.remove(id) {
            Ok(removed) => removed,
            Err(e) => {
                return MutationOutcome::RolledBack {
                    message: e.to_string(),
                }
            }
        };
        tracing::debug!(%id, "applied optimistic delete");

        match self.remote.delete(id) {
            Ok(()) => {
                tracing::debug!(%id, "delete confirmed");
                MutationOutcome::Confirmed { entity: None }
            }
            Err(e) => {
                if let Err(restore_err) = self.collection.restore(removed) {
                    // Unreachable in practice: nothing else inserts between
                    // remove and restore on this thread.
                    tracing::error!(%id, "delete restore failed: {restore_err}");
                }
                tracing::warn!(%id, "delete rolled back: {e}");
                MutationOutcome::rolled_back(&e)
            }
        }
    }

    fn confirm(&mut self, id: &EntityId, server_copy: Entity, previous: Entity) -> MutationOutcome {
        match self.collection.confirm(id, server_copy.clone()) {
            Ok(()) => {
                tracing::debug!(id = %server_copy.id, "mutation confirmed");
                MutationOutcome::Confirmed {
                    entity: Some(server_copy),
                }
            }
            // Server handed back an id colliding with another entry; keep
            // the collection consistent and report the refusal.
            Err(e) => {
                self.revert(id, previous);
                MutationOutcome::RolledBack {
                    message: e.to_string(),
                }
            }
        }
    }

    fn drop_placeholder(&mut self, temp: &TempId) {
        if let Err(e) = self.collection.rollback_insert(temp) {
            tracing::error!(%temp, "rollback failed: {e}");
        }
    }

    fn revert(&mut self, id: &EntityId, previous: Entity) {
        if let Err(e) = self.collection.rollback_patch(id, previous) {
            tracing::error!(%id, "rollback failed: {e}");
        }
    }
}
