//! Serializable project snapshots, the load/save boundary of a session.
//!
//! Attribute bags are untyped here and only become typed records when a
//! snapshot is turned back into a [`SceneGraph`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::persistence::ProjectId;
use crate::calc::CalculationResult;
use crate::components::object::{ORIGIN, UNIT_SCALE};
use crate::components::{
    AttributeError, AttributeMap, ComponentAttributes, ComponentKind, ObjectId, SceneObject,
    UnsupportedKindError, Vec3,
};
use crate::scene::{SceneGraph, SystemSettings, Wire, WireId, WireRejection};

/// Name used for snapshots that arrive without one.
pub const DEFAULT_PROJECT_NAME: &str = "Untitled Project";

/// A snapshot that cannot be turned into a consistent scene graph.
///
/// Loading is all-or-nothing: on any of these the session is left as it was.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("object id {0} appears more than once")]
    DuplicateObjectId(ObjectId),
    #[error("wire {wire_id} is invalid: {reason}")]
    InvalidWire {
        wire_id: WireId,
        #[source]
        reason: WireRejection,
    },
    #[error(transparent)]
    UnsupportedKind(#[from] UnsupportedKindError),
    #[error("object {object_id} has bad attributes: {source}")]
    Attributes {
        object_id: ObjectId,
        #[source]
        source: AttributeError,
    },
}

/// One placed object as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub id: ObjectId,
    /// Kind tag, e.g. `"solarPanel"`.
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "origin")]
    pub position: Vec3,
    #[serde(default = "origin")]
    pub rotation: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default, alias = "properties")]
    pub attributes: AttributeMap,
}

fn origin() -> Vec3 {
    ORIGIN
}

fn unit_scale() -> Vec3 {
    UNIT_SCALE
}

fn default_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

impl ComponentRecord {
    /// Encodes a placed object.
    ///
    /// # Errors
    ///
    /// Returns an `AttributeError` if the attributes cannot be encoded.
    pub fn from_object(object: &SceneObject) -> Result<Self, AttributeError> {
        Ok(Self {
            id: object.id().clone(),
            kind: object.kind().as_str().to_string(),
            name: object.name.clone(),
            position: object.position,
            rotation: object.rotation,
            scale: object.scale,
            attributes: object.attributes.to_map()?,
        })
    }

    /// Decodes the record into a typed object.
    ///
    /// # Errors
    ///
    /// Returns a `SnapshotError` for an unknown kind tag or attributes that
    /// do not fit the kind.
    pub fn to_object(&self) -> Result<SceneObject, SnapshotError> {
        let kind = self.kind.parse::<ComponentKind>()?;
        let attributes = ComponentAttributes::from_map(kind, self.attributes.clone()).map_err(
            |source| SnapshotError::Attributes {
                object_id: self.id.clone(),
                source,
            },
        )?;
        Ok(SceneObject::from_parts(
            self.id.clone(),
            self.name.clone(),
            self.position,
            self.rotation,
            self.scale,
            attributes,
        ))
    }
}

/// Serializable project state.
///
/// `calculations` is informational on input: loading always recomputes.
/// `exportedAt` is only set on exports, never on persisted records. The owner
/// and the created/updated stamps are set by repositories and are ignored
/// when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    /// Persistence id, assigned by the repository on first save.
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    #[serde(default)]
    pub wires: Vec<Wire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculations: Option<CalculationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SystemSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    /// Id of the user the stored record belongs to.
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ProjectSnapshot {
    fn default() -> Self {
        Self {
            id: None,
            name: default_name(),
            description: String::new(),
            components: Vec::new(),
            wires: Vec::new(),
            calculations: None,
            settings: None,
            exported_at: None,
            owner_id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl ProjectSnapshot {
    /// Encodes the objects and wires of `graph`, in display order.
    ///
    /// # Errors
    ///
    /// Returns a `SnapshotError` if an object's attributes cannot be encoded.
    pub fn capture_graph(&mut self, graph: &SceneGraph) -> Result<(), SnapshotError> {
        self.components = graph
            .objects()
            .map(|o| {
                ComponentRecord::from_object(o).map_err(|source| SnapshotError::Attributes {
                    object_id: o.id().clone(),
                    source,
                })
            })
            .collect::<Result<_, _>>()?;
        self.wires = graph.wires().to_vec();
        Ok(())
    }

    /// Rebuilds a scene graph, checking every graph invariant.
    ///
    /// The result has no selection, select mode, and no pending wire.
    ///
    /// # Errors
    ///
    /// Returns the first `SnapshotError` found; nothing is partially built.
    pub fn to_graph(&self) -> Result<SceneGraph, SnapshotError> {
        let mut graph = SceneGraph::default();
        for record in &self.components {
            if !graph.insert_object(record.to_object()?) {
                return Err(SnapshotError::DuplicateObjectId(record.id.clone()));
            }
        }
        for wire in &self.wires {
            graph
                .add_wire(wire.clone())
                .map_err(|reason| SnapshotError::InvalidWire {
                    wire_id: wire.id.clone(),
                    reason,
                })?;
        }
        Ok(graph)
    }
}
