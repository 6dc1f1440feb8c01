//! The scene graph aggregate and its invariant-maintaining primitives.
//!
//! Invariants held at all times:
//! - object ids are unique (objects are keyed by id);
//! - every wire references two distinct objects present in the graph;
//! - no two wires join the same unordered pair;
//! - `selected_object_id` is `None` or a live object;
//! - `wire_start_id` is `None` unless the mode is [`InteractionMode::Wire`],
//!   and otherwise `None` or a live object.
//!
//! Mutators are crate-private: outside code edits the graph through
//! [`super::store::SceneGraphStore`], which recomputes after every change.

use indexmap::IndexMap;

use super::interaction::{InteractionMode, TransformMode};
use super::wire::{Wire, WireId};
use crate::components::{ComponentKind, ObjectId, SceneObject};

/// Why a wire cannot be added to the graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireRejection {
    #[error("object {0} cannot be wired to itself")]
    SelfLoop(ObjectId),
    #[error("wire endpoint {0} is not in the scene")]
    MissingEndpoint(ObjectId),
    #[error("objects {0} and {1} are already connected")]
    Duplicate(ObjectId, ObjectId),
    #[error("wire id {0} is already in use")]
    DuplicateId(WireId),
}

/// Placed objects (in insertion order), wires, and interaction state.
///
/// Equality is order-sensitive: two graphs holding the same objects in a
/// different display order are not equal.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    objects: IndexMap<ObjectId, SceneObject>,
    wires: Vec<Wire>,
    selected_object_id: Option<ObjectId>,
    mode: InteractionMode,
    wire_start_id: Option<ObjectId>,
    transform_mode: TransformMode,
}

impl PartialEq for SceneGraph {
    fn eq(&self, other: &Self) -> bool {
        self.objects.iter().eq(other.objects.iter())
            && self.wires == other.wires
            && self.selected_object_id == other.selected_object_id
            && self.mode == other.mode
            && self.wire_start_id == other.wire_start_id
            && self.transform_mode == other.transform_mode
    }
}

impl SceneGraph {
    /// Objects in display (insertion) order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    /// Objects of one kind, in display order.
    pub fn objects_of_kind(&self, kind: ComponentKind) -> impl Iterator<Item = &SceneObject> {
        self.objects().filter(move |o| o.kind() == kind)
    }

    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn wire(&self, id: &WireId) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == *id)
    }

    /// Wires with `id` as either endpoint.
    pub fn wires_touching<'a>(&'a self, id: &'a ObjectId) -> impl Iterator<Item = &'a Wire> {
        self.wires.iter().filter(move |w| w.touches(id))
    }

    /// The wire joining `a` and `b` in either direction, if any.
    pub fn wire_between(&self, a: &ObjectId, b: &ObjectId) -> Option<&Wire> {
        self.wires.iter().find(|w| w.connects(a, b))
    }

    pub fn selected_object_id(&self) -> Option<&ObjectId> {
        self.selected_object_id.as_ref()
    }

    /// The currently selected object, if any.
    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected_object_id.as_ref().and_then(|id| self.object(id))
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Pending first endpoint of a wire being drawn.
    pub fn wire_start_id(&self) -> Option<&ObjectId> {
        self.wire_start_id.as_ref()
    }

    pub fn transform_mode(&self) -> TransformMode {
        self.transform_mode
    }

    /// Inserts an object; returns `false` (and leaves the graph unchanged) on an id clash.
    pub(crate) fn insert_object(&mut self, object: SceneObject) -> bool {
        if self.objects.contains_key(object.id()) {
            return false;
        }
        self.objects.insert(object.id().clone(), object);
        true
    }

    pub(crate) fn object_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// Removes an object, every wire touching it, and any selection or
    /// pending wire endpoint pointing at it.
    ///
    /// Returns the removed object and the number of wires removed with it.
    pub(crate) fn remove_object(&mut self, id: &ObjectId) -> Option<(SceneObject, usize)> {
        let object = self.objects.shift_remove(id)?;

        let before = self.wires.len();
        self.wires.retain(|w| !w.touches(id));
        let cascaded = before - self.wires.len();

        if self.selected_object_id.as_ref() == Some(id) {
            self.selected_object_id = None;
        }
        if self.wire_start_id.as_ref() == Some(id) {
            self.wire_start_id = None;
        }
        Some((object, cascaded))
    }

    /// Adds `wire` after checking it against every wire invariant.
    pub(crate) fn add_wire(&mut self, wire: Wire) -> Result<&Wire, WireRejection> {
        if wire.from_id == wire.to_id {
            return Err(WireRejection::SelfLoop(wire.from_id));
        }
        for end in [&wire.from_id, &wire.to_id] {
            if !self.contains(end) {
                return Err(WireRejection::MissingEndpoint(end.clone()));
            }
        }
        if self.wire(&wire.id).is_some() {
            return Err(WireRejection::DuplicateId(wire.id));
        }
        if self.wire_between(&wire.from_id, &wire.to_id).is_some() {
            return Err(WireRejection::Duplicate(wire.from_id, wire.to_id));
        }

        self.wires.push(wire);
        Ok(&self.wires[self.wires.len() - 1])
    }

    pub(crate) fn wire_mut(&mut self, id: &WireId) -> Option<&mut Wire> {
        self.wires.iter_mut().find(|w| w.id == *id)
    }

    pub(crate) fn remove_wire(&mut self, id: &WireId) -> Option<Wire> {
        let index = self.wires.iter().position(|w| w.id == *id)?;
        Some(self.wires.remove(index))
    }

    /// Selects a live object, or clears the selection for `None` or an unknown id.
    pub(crate) fn select(&mut self, id: Option<&ObjectId>) {
        self.selected_object_id = id.filter(|id| self.contains(id)).cloned();
    }

    /// Switches mode and drops any pending wire endpoint.
    pub(crate) fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
        self.wire_start_id = None;
    }

    pub(crate) fn set_transform_mode(&mut self, mode: TransformMode) {
        self.transform_mode = mode;
    }

    /// Records the first wire endpoint. Ignored outside wire mode or for unknown ids.
    pub(crate) fn set_wire_start(&mut self, id: &ObjectId) -> bool {
        if self.mode != InteractionMode::Wire || !self.contains(id) {
            return false;
        }
        self.wire_start_id = Some(id.clone());
        true
    }

    pub(crate) fn take_wire_start(&mut self) -> Option<ObjectId> {
        self.wire_start_id.take()
    }
}
