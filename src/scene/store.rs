//! The scene graph store: the single owner of the scene and its sizing result.
//!
//! Every mutating operation goes through [`SceneGraphStore::mutate`], which
//! bumps the revision counter and recomputes the [`CalculationResult`] before
//! returning. A caller therefore never observes a graph and a result that
//! disagree. Operations whose target is absent, or that would change nothing,
//! return early without touching the revision.

use log::debug;

use super::graph::SceneGraph;
use super::interaction::{InteractionMode, TransformMode};
use super::settings::{SettingsUpdate, SystemSettings};
use super::wire::{Wire, WireId, WireType};
use crate::calc::{CalculationResult, recompute};
use crate::components::{
    AttributeError, ComponentFactory, ComponentKind, ObjectId, ObjectUpdate, SceneObject,
    UnsupportedKindError, Vec3,
};

/// Owns a [`SceneGraph`], the project settings, and the current sizing result.
#[derive(Debug, Clone)]
pub struct SceneGraphStore {
    graph: SceneGraph,
    settings: SystemSettings,
    calculations: CalculationResult,
    factory: ComponentFactory,
    revision: u64,
}

impl Default for SceneGraphStore {
    fn default() -> Self {
        Self::new(SystemSettings::default())
    }
}

impl SceneGraphStore {
    /// Creates an empty store with a zeroed result.
    pub fn new(settings: SystemSettings) -> Self {
        Self {
            graph: SceneGraph::default(),
            calculations: CalculationResult::zeroed(settings.voltage),
            settings,
            factory: ComponentFactory,
            revision: 0,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The sizing result for the current graph.
    pub fn calculations(&self) -> &CalculationResult {
        &self.calculations
    }

    pub fn settings(&self) -> &SystemSettings {
        &self.settings
    }

    /// Monotonic counter bumped by every effective persisted change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Runs `edit` on the graph. If it reports a change (`Some`), the
    /// revision is bumped and the result recomputed before returning.
    fn mutate<T>(
        &mut self,
        op: &str,
        edit: impl FnOnce(&mut SceneGraph) -> Option<T>,
    ) -> Option<T> {
        let out = edit(&mut self.graph)?;
        self.commit(op);
        Some(out)
    }

    fn commit(&mut self, op: &str) {
        self.revision += 1;
        self.calculations = recompute(&self.graph, self.settings.voltage);
        debug!(
            "{op}: revision {} ({} objects, {} wires, {} warnings)",
            self.revision,
            self.graph.object_count(),
            self.graph.wires().len(),
            self.calculations.warnings.len()
        );
    }

    /// Creates an object of `kind` and appends it to the scene.
    ///
    /// # Arguments
    ///
    /// * `kind` - Component kind to place
    /// * `position` - Placement; the origin when `None`
    ///
    /// # Returns
    ///
    /// A copy of the placed object.
    pub fn add_object(&mut self, kind: ComponentKind, position: Option<Vec3>) -> SceneObject {
        let object = self.factory.create(kind, position);
        let placed = object.clone();
        // Fresh ids never clash, so the insert always takes effect.
        self.mutate("add_object", |g| g.insert_object(object).then_some(()));
        placed
    }

    /// Like [`Self::add_object`] but takes a serialized kind tag.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedKindError` for an unknown tag; the scene is unchanged.
    pub fn add_object_tagged(
        &mut self,
        tag: &str,
        position: Option<Vec3>,
    ) -> Result<SceneObject, UnsupportedKindError> {
        let kind = tag.parse::<ComponentKind>()?;
        Ok(self.add_object(kind, position))
    }

    /// Removes an object and every wire touching it. Absent ids are ignored.
    pub fn remove_object(&mut self, id: &ObjectId) -> Option<SceneObject> {
        self.mutate("remove_object", |g| {
            let (object, cascaded) = g.remove_object(id)?;
            if cascaded > 0 {
                debug!("remove_object: dropped {cascaded} wires attached to {id}");
            }
            Some(object)
        })
    }

    /// Shallow-merges `update` into the object `id`.
    ///
    /// Returns `Ok(false)` when the object is absent or the update is empty.
    ///
    /// # Errors
    ///
    /// Returns an `AttributeError` if the attribute patch does not fit the
    /// object's kind. The scene is left untouched in that case.
    pub fn update_object(
        &mut self,
        id: &ObjectId,
        update: &ObjectUpdate,
    ) -> Result<bool, AttributeError> {
        if update.is_empty() {
            return Ok(false);
        }
        let Some(current) = self.graph.object(id) else {
            return Ok(false);
        };
        let mut next = current.clone();
        next.apply(update)?;

        let changed = self.mutate("update_object", |g| {
            let slot = g.object_mut(id)?;
            *slot = next;
            Some(())
        });
        Ok(changed.is_some())
    }

    pub fn set_object_position(&mut self, id: &ObjectId, position: Vec3) -> bool {
        self.update_transform(id, ObjectUpdate::position(position))
    }

    pub fn set_object_rotation(&mut self, id: &ObjectId, rotation: Vec3) -> bool {
        self.update_transform(id, ObjectUpdate::rotation(rotation))
    }

    pub fn set_object_scale(&mut self, id: &ObjectId, scale: Vec3) -> bool {
        self.update_transform(id, ObjectUpdate::scale(scale))
    }

    // Transform-only updates carry no attribute patch and cannot fail.
    fn update_transform(&mut self, id: &ObjectId, update: ObjectUpdate) -> bool {
        self.update_object(id, &update).unwrap_or(false)
    }

    /// Selects `id`, or clears the selection for `None` or an unknown id.
    ///
    /// Selection is not electrically relevant: no recompute, no revision.
    pub fn select_object(&mut self, id: Option<&ObjectId>) {
        self.graph.select(id);
    }

    pub fn clear_selection(&mut self) {
        self.graph.select(None);
    }

    /// Switches interaction mode. Any pending wire endpoint is dropped.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.graph.set_mode(mode);
    }

    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.graph.set_transform_mode(mode);
    }

    /// Records `id` as the first endpoint of a new wire.
    ///
    /// Ignored (returns `false`) outside wire mode or for an unknown id.
    pub fn start_wire_connection(&mut self, id: &ObjectId) -> bool {
        let started = self.graph.set_wire_start(id);
        if !started {
            debug!("start_wire_connection: ignored for {id} in {:?} mode", self.graph.mode());
        }
        started
    }

    /// Finishes the wire started by [`Self::start_wire_connection`] at `id`.
    ///
    /// The pending endpoint is always cleared. Returns the new wire, or
    /// `None` when nothing was pending, `id` is the pending endpoint itself
    /// (a cancel), or the pair is already connected in either direction.
    pub fn complete_wire_connection(&mut self, id: &ObjectId) -> Option<Wire> {
        let start = self.graph.take_wire_start()?;
        if start == *id {
            debug!("complete_wire_connection: cancelled at {id}");
            return None;
        }
        self.mutate("complete_wire_connection", |g| {
            match g.add_wire(Wire::new(start, id.clone())) {
                Ok(wire) => Some(wire.clone()),
                Err(reason) => {
                    debug!("complete_wire_connection: no wire added, {reason}");
                    None
                }
            }
        })
    }

    /// Routes a click on object `id` through the interaction state machine.
    ///
    /// In select mode the object becomes selected. In wire mode the click
    /// either starts a wire or completes the pending one.
    pub fn click_object(&mut self, id: &ObjectId) -> Option<Wire> {
        match self.graph.mode() {
            InteractionMode::Select => {
                self.select_object(Some(id));
                None
            }
            InteractionMode::Wire if self.graph.wire_start_id().is_some() => {
                self.complete_wire_connection(id)
            }
            InteractionMode::Wire => {
                self.start_wire_connection(id);
                None
            }
        }
    }

    /// Click on empty space: clears the selection, and in wire mode also
    /// drops the pending endpoint.
    pub fn click_background(&mut self) {
        self.clear_selection();
        if self.graph.mode() == InteractionMode::Wire {
            self.graph.take_wire_start();
        }
    }

    /// Removes a wire. Absent ids are ignored.
    pub fn remove_wire(&mut self, id: &WireId) -> Option<Wire> {
        self.mutate("remove_wire", |g| g.remove_wire(id))
    }

    /// Changes the current type of wire `id`. Returns `false` if the wire is
    /// absent or already has that type.
    pub fn set_wire_type(&mut self, id: &WireId, wire_type: WireType) -> bool {
        self.mutate("set_wire_type", |g| {
            let wire = g.wire_mut(id).filter(|w| w.wire_type != wire_type)?;
            wire.wire_type = wire_type;
            Some(())
        })
        .is_some()
    }

    /// Shallow-merges `update` into the settings. A change recomputes so the
    /// reported system voltage follows the setting.
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> bool {
        if !self.settings.apply(update) {
            return false;
        }
        self.commit("update_settings");
        true
    }

    /// Swaps in a whole graph and settings, then recomputes.
    pub(crate) fn replace(&mut self, graph: SceneGraph, settings: SystemSettings) {
        self.graph = graph;
        self.settings = settings;
        self.commit("replace");
    }

    /// Empties the scene and shows a zeroed result.
    pub(crate) fn reset(&mut self, settings: SystemSettings) {
        self.graph = SceneGraph::default();
        self.calculations = CalculationResult::zeroed(settings.voltage);
        self.settings = settings;
        self.revision += 1;
    }

    /// Records a persisted change made outside the graph (project details).
    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }
}
