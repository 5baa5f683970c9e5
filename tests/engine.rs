//! End-to-end engine scenarios against an in-memory fake remote.

use std::cell::{Cell, RefCell};

use serde_json::{json, Value};

use tidemark::{
    Engine, Entity, EntityId, Fields, ListFilter, MutationOutcome, Page, RemoteError,
    RemoteResource, ResourceSpec, Stats,
};

/// In-memory stand-in for the backend: holds server-side entities and can be
/// armed to fail the next call.
#[derive(Default)]
struct FakeRemote {
    entities: RefCell<Vec<Entity>>,
    fail_next: RefCell<Option<RemoteError>>,
    next_id: Cell<u64>,
    calls: Cell<usize>,
}

impl FakeRemote {
    fn with_entities(entities: Vec<Entity>) -> Self {
        Self {
            next_id: Cell::new(entities.len() as u64 + 1),
            entities: RefCell::new(entities),
            ..Self::default()
        }
    }

    fn fail_next(&self, err: RemoteError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    fn take_failure(&self) -> Result<(), RemoteError> {
        self.calls.set(self.calls.get() + 1);
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl RemoteResource for FakeRemote {
    fn list(&self, _filter: &ListFilter) -> Result<Page, RemoteError> {
        self.take_failure()?;
        let items = self.entities.borrow().clone();
        let total = items.len() as u64;
        let page_size = items.len() as u32;
        Ok(Page {
            items,
            total,
            page: 1,
            page_size,
        })
    }

    fn create(&self, fields: &Fields) -> Result<Entity, RemoteError> {
        self.take_failure()?;
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        let id = EntityId::parse(&format!("real-{n}")).expect("valid id");
        let entity = Entity::new(id, fields.clone());
        self.entities.borrow_mut().push(entity.clone());
        Ok(entity)
    }

    fn update(&self, id: &EntityId, patch: &Fields) -> Result<Entity, RemoteError> {
        self.take_failure()?;
        let mut entities = self.entities.borrow_mut();
        let entity = entities
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or(RemoteError::Api {
                status: 404,
                message: "not found".into(),
            })?;
        entity.fields.apply(patch);
        Ok(entity.clone())
    }

    fn toggle(&self, id: &EntityId, done: bool) -> Result<Entity, RemoteError> {
        let mut patch = Fields::new();
        patch.set("isDone", Value::Bool(done));
        self.update(id, &patch)
    }

    fn delete(&self, id: &EntityId) -> Result<(), RemoteError> {
        self.take_failure()?;
        let mut entities = self.entities.borrow_mut();
        let before = entities.len();
        entities.retain(|e| &e.id != id);
        if entities.len() == before {
            return Err(RemoteError::Api {
                status: 404,
                message: "not found".into(),
            });
        }
        Ok(())
    }

    fn stats(&self) -> Result<Stats, RemoteError> {
        self.take_failure()?;
        Ok(Stats::compute(self.entities.borrow().iter(), "isDone"))
    }
}

fn entity(id: &str, title: &str, done: bool) -> Entity {
    let mut fields = Fields::new();
    fields.set("title", json!(title));
    fields.set("isDone", json!(done));
    Entity::new(EntityId::parse(id).expect("valid id"), fields)
}

fn engine_with(entities: Vec<Entity>) -> Engine<FakeRemote> {
    let spec = ResourceSpec::parse("todos", "isDone").expect("spec");
    let mut engine = Engine::new(&spec, FakeRemote::with_entities(entities));
    engine.refresh(&ListFilter::all()).expect("refresh");
    engine
}

#[test]
fn refresh_populates_collection_and_stats() {
    let engine = engine_with(vec![
        entity("real-1", "A", false),
        entity("real-2", "B", true),
    ]);
    assert_eq!(engine.collection().len(), 2);
    assert_eq!(
        engine.stats(),
        Stats {
            total: 2,
            done: 1,
            not_done: 1
        }
    );
}

#[test]
fn refresh_failure_leaves_collection_untouched() {
    let mut engine = engine_with(vec![entity("real-1", "A", false)]);
    engine.remote().fail_next(RemoteError::Transport {
        message: "refused".into(),
    });
    assert!(engine.refresh(&ListFilter::all()).is_err());
    assert_eq!(engine.collection().len(), 1);
}

#[test]
fn toggle_success_applies_immediately() {
    let mut engine = engine_with(vec![entity("1", "A", false)]);
    let id = EntityId::parse("1").unwrap();

    let outcome = engine.toggle(&id, true);
    assert!(outcome.is_success());
    assert!(engine.collection().get(&id).unwrap().is_done("isDone"));
    assert_eq!(
        engine.stats(),
        Stats {
            total: 1,
            done: 1,
            not_done: 0
        }
    );
}

#[test]
fn toggle_failure_reverts_and_reports_server_message() {
    let mut engine = engine_with(vec![entity("1", "A", false)]);
    let id = EntityId::parse("1").unwrap();
    engine.remote().fail_next(RemoteError::Api {
        status: 422,
        message: "not allowed".into(),
    });

    let outcome = engine.toggle(&id, true);
    assert!(!outcome.is_success());
    assert!(outcome.message().unwrap().contains("not allowed"));
    assert!(!engine.collection().get(&id).unwrap().is_done("isDone"));
    assert_eq!(
        engine.stats(),
        Stats {
            total: 1,
            done: 0,
            not_done: 1
        }
    );
}

#[test]
fn create_replaces_placeholder_with_confirmed_entity() {
    let mut engine = engine_with(vec![]);
    let mut fields = Fields::new();
    fields.set("title", json!("A"));

    let outcome = engine.create(fields);
    let MutationOutcome::Confirmed { entity: Some(confirmed) } = &outcome else {
        panic!("expected confirmed create, got {outcome:?}");
    };
    assert_eq!(confirmed.id.as_str(), "real-1");

    // Exactly one entity, no temp id left behind.
    assert_eq!(engine.collection().len(), 1);
    let ids: Vec<&str> = engine
        .collection()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(ids, vec!["real-1"]);
    assert!(engine.collection().iter().all(|e| !e.id.is_local()));
}

#[test]
fn create_failure_removes_placeholder() {
    let mut engine = engine_with(vec![]);
    engine.remote().fail_next(RemoteError::Transport {
        message: "refused".into(),
    });
    let mut fields = Fields::new();
    fields.set("title", json!("A"));

    let outcome = engine.create(fields);
    assert!(!outcome.is_success());
    assert!(engine.collection().is_empty());
    assert_eq!(engine.stats(), Stats::default());
}

#[test]
fn update_failure_restores_exact_prior_state() {
    let mut engine = engine_with(vec![entity("real-1", "A", false)]);
    let id = EntityId::parse("real-1").unwrap();
    let before = engine.collection().get(&id).unwrap().clone();

    engine.remote().fail_next(RemoteError::Api {
        status: 400,
        message: "bad title".into(),
    });
    let mut patch = Fields::new();
    patch.set("title", json!("B"));
    patch.set("priority", json!(1));

    let outcome = engine.update(&id, &patch);
    assert!(!outcome.is_success());
    assert_eq!(engine.collection().get(&id).unwrap(), &before);
}

#[test]
fn update_success_takes_server_copy() {
    let mut engine = engine_with(vec![entity("real-1", "A", false)]);
    let id = EntityId::parse("real-1").unwrap();
    let mut patch = Fields::new();
    patch.set("title", json!("B"));

    let outcome = engine.update(&id, &patch);
    assert!(outcome.is_success());
    assert_eq!(
        engine.collection().get(&id).unwrap().fields.get("title"),
        Some(&json!("B"))
    );
}

#[test]
fn delete_failure_restores_entity() {
    let mut engine = engine_with(vec![
        entity("real-1", "A", false),
        entity("real-2", "B", true),
    ]);
    let id = EntityId::parse("real-1").unwrap();
    let before = engine.collection().get(&id).unwrap().clone();

    engine.remote().fail_next(RemoteError::Transport {
        message: "timed out".into(),
    });
    let outcome = engine.remove(&id);
    assert!(!outcome.is_success());

    // Presence and field values restored exactly; position may differ.
    assert_eq!(engine.collection().len(), 2);
    assert_eq!(engine.collection().get(&id).unwrap(), &before);
    assert_eq!(engine.stats().total, 2);
}

#[test]
fn delete_success_confirms_without_entity() {
    let mut engine = engine_with(vec![entity("real-1", "A", false)]);
    let id = EntityId::parse("real-1").unwrap();
    let outcome = engine.remove(&id);
    assert!(outcome.is_success());
    assert!(outcome.entity().is_none());
    assert!(engine.collection().is_empty());
}

#[test]
fn mutations_on_unknown_ids_fail_without_remote_call() {
    let mut engine = engine_with(vec![]);
    let calls_before = engine.remote().calls.get();
    let id = EntityId::parse("ghost").unwrap();

    assert!(!engine.toggle(&id, true).is_success());
    assert!(!engine.remove(&id).is_success());
    assert_eq!(engine.remote().calls.get(), calls_before);
}

#[test]
fn cancelled_mutation_rolls_back() {
    let mut engine = engine_with(vec![entity("real-1", "A", false)]);
    let id = EntityId::parse("real-1").unwrap();
    engine.remote().fail_next(RemoteError::Cancelled);

    let outcome = engine.toggle(&id, true);
    assert!(!outcome.is_success());
    assert!(!engine.collection().get(&id).unwrap().is_done("isDone"));
}

#[test]
fn stats_never_drift_from_full_recompute() {
    // Run a mixed mutation sequence, then compare incremental stats with a
    // clean recompute over the surviving entries.
    let mut engine = engine_with(vec![
        entity("real-1", "A", false),
        entity("real-2", "B", false),
        entity("real-3", "C", true),
    ]);
    let id1 = EntityId::parse("real-1").unwrap();
    let id2 = EntityId::parse("real-2").unwrap();

    assert!(engine.toggle(&id1, true).is_success());
    engine.remote().fail_next(RemoteError::Transport {
        message: "refused".into(),
    });
    assert!(!engine.toggle(&id2, true).is_success());
    assert!(engine.remove(&id2).is_success());
    let mut fields = Fields::new();
    fields.set("title", json!("D"));
    fields.set("isDone", json!(false));
    assert!(engine.create(fields).is_success());

    let recomputed = Stats::compute(engine.collection().iter(), "isDone");
    assert_eq!(engine.stats(), recomputed);
    assert_eq!(
        engine.stats(),
        Stats {
            total: 3,
            done: 2,
            not_done: 1
        }
    );
}

#[test]
fn local_stats_match_server_after_confirmed_mutations() {
    let mut engine = engine_with(vec![
        entity("real-1", "A", false),
        entity("real-2", "B", true),
    ]);
    let id = EntityId::parse("real-1").unwrap();
    assert!(engine.toggle(&id, true).is_success());

    let remote = engine.remote_stats().expect("remote stats");
    assert_eq!(engine.stats(), remote);
}
