//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use pv_designer::components::{ComponentKind, ObjectId, ObjectUpdate};
use pv_designer::scene::{InteractionMode, SceneGraph, SceneGraphStore};
use pv_designer::session::{
    PersistenceError, ProjectId, ProjectRepository, ProjectSnapshot, StaticAuth, User,
};

/// Ids of a small wired system built by [`wired_system`].
pub struct WiredSystem {
    pub panels: Vec<ObjectId>,
    pub inverter: ObjectId,
    pub battery: ObjectId,
}

/// Two default panels and a battery, each wired to one inverter.
pub fn wired_system(store: &mut SceneGraphStore) -> WiredSystem {
    let panels: Vec<_> = (0..2)
        .map(|i| {
            store
                .add_object(ComponentKind::SolarPanel, Some([i as f64 * 2.0, 0.25, 0.0]))
                .id()
                .clone()
        })
        .collect();
    let inverter = store
        .add_object(ComponentKind::Inverter, Some([5.0, 0.4, 0.0]))
        .id()
        .clone();
    let battery = store
        .add_object(ComponentKind::Battery, Some([5.0, 0.6, 2.0]))
        .id()
        .clone();

    store.set_mode(InteractionMode::Wire);
    for source in panels.iter().chain([&battery]) {
        store.start_wire_connection(source);
        store.complete_wire_connection(&inverter);
    }
    store.set_mode(InteractionMode::Select);

    WiredSystem {
        panels,
        inverter,
        battery,
    }
}

/// Sets a panel's rated wattage.
pub fn set_wattage(store: &mut SceneGraphStore, id: &ObjectId, watts: f64) {
    let update = ObjectUpdate::default().with_attribute("wattage", watts);
    assert!(store.update_object(id, &update).unwrap_or(false));
}

/// Id of the user returned by [`signed_in`].
pub const USER_ID: &str = "u-1";

/// A signed-in user.
pub fn signed_in() -> StaticAuth {
    StaticAuth::signed_in(User::new(USER_ID, "Robin"))
}

/// Asserts every structural invariant of a scene graph.
pub fn assert_graph_invariants(graph: &SceneGraph) {
    let mut ids: Vec<_> = graph.objects().map(|o| o.id().clone()).collect();
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count, "object ids must be unique");

    for (i, wire) in graph.wires().iter().enumerate() {
        assert_ne!(wire.from_id, wire.to_id, "self-loop wire {}", wire.id);
        assert!(graph.contains(&wire.from_id), "dangling wire {}", wire.id);
        assert!(graph.contains(&wire.to_id), "dangling wire {}", wire.id);
        for other in &graph.wires()[i + 1..] {
            assert!(
                !other.connects(&wire.from_id, &wire.to_id),
                "duplicate wire between {} and {}",
                wire.from_id,
                wire.to_id
            );
        }
    }

    if let Some(selected) = graph.selected_object_id() {
        assert!(graph.contains(selected), "selection points at a removed object");
    }
    if let Some(start) = graph.wire_start_id() {
        assert_eq!(graph.mode(), InteractionMode::Wire);
        assert!(graph.contains(start), "wire start points at a removed object");
    }
}

/// Repository whose writes always fail.
pub struct FailingRepository;

impl ProjectRepository for FailingRepository {
    fn create(
        &mut self,
        _: &str,
        _: &ProjectSnapshot,
    ) -> Result<ProjectSnapshot, PersistenceError> {
        Err(PersistenceError::Io(std::io::Error::other("disk full")))
    }

    fn update(
        &mut self,
        _: &str,
        _: &ProjectId,
        _: &ProjectSnapshot,
    ) -> Result<ProjectSnapshot, PersistenceError> {
        Err(PersistenceError::Io(std::io::Error::other("disk full")))
    }

    fn find(&self, _: &str, id: &ProjectId) -> Result<ProjectSnapshot, PersistenceError> {
        Err(PersistenceError::NotFound(id.clone()))
    }

    fn list(&self, _: &str) -> Result<Vec<ProjectSnapshot>, PersistenceError> {
        Ok(Vec::new())
    }

    fn delete(&mut self, _: &str, id: &ProjectId) -> Result<(), PersistenceError> {
        Err(PersistenceError::NotFound(id.clone()))
    }
}
