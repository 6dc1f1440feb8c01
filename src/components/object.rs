//! Placed scene objects, their identifiers, and partial updates.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::attributes::{AttributeError, AttributeMap, ComponentAttributes};
use super::kind::ComponentKind;

/// Three-component real vector used for position, rotation, and scale.
pub type Vec3 = [f64; 3];

/// Origin, the position used when none is supplied.
pub const ORIGIN: Vec3 = [0.0, 0.0, 0.0];
/// Identity scale.
pub const UNIT_SCALE: Vec3 = [1.0, 1.0, 1.0];

/// Opaque identifier of a placed object. Generated once, never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One placed physical component.
///
/// The kind is carried by the attribute variant, so an object's kind and its
/// attribute record can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    id: ObjectId,
    /// Human label.
    pub name: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub attributes: ComponentAttributes,
}

impl SceneObject {
    /// Assembles an object from already-validated parts.
    pub fn from_parts(
        id: ObjectId,
        name: String,
        position: Vec3,
        rotation: Vec3,
        scale: Vec3,
        attributes: ComponentAttributes,
    ) -> Self {
        Self {
            id,
            name,
            position,
            rotation,
            scale,
            attributes,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.attributes.kind()
    }

    /// Applies a partial update in place.
    ///
    /// The attribute patch is resolved first; if it fails, nothing changes.
    ///
    /// # Errors
    ///
    /// Returns an `AttributeError` if the merged attributes do not fit this kind.
    pub fn apply(&mut self, update: &ObjectUpdate) -> Result<(), AttributeError> {
        let attributes = match &update.attributes {
            Some(patch) => Some(self.attributes.merged(patch)?),
            None => None,
        };

        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(rotation) = update.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = update.scale {
            self.scale = scale;
        }
        if let Some(attributes) = attributes {
            self.attributes = attributes;
        }
        Ok(())
    }
}

/// Fields to shallow-merge into an existing object. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectUpdate {
    pub name: Option<String>,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
    /// Merged key by key into the existing attributes, not replacing them.
    pub attributes: Option<AttributeMap>,
}

impl ObjectUpdate {
    pub fn position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn rotation(rotation: Vec3) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn scale(scale: Vec3) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    /// Sets the new display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds one attribute to the patch.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(AttributeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Returns `true` when applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.position.is_none()
            && self.rotation.is_none()
            && self.scale.is_none()
            && self.attributes.as_ref().is_none_or(AttributeMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> SceneObject {
        SceneObject::from_parts(
            ObjectId::from("p1"),
            "Solar Panel".to_string(),
            ORIGIN,
            ORIGIN,
            UNIT_SCALE,
            ComponentAttributes::defaults_for(ComponentKind::SolarPanel),
        )
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(ObjectId::generate(), ObjectId::generate());
    }

    #[test]
    fn apply_merges_only_given_fields() {
        let mut obj = panel();
        let update = ObjectUpdate::position([1.0, 2.0, 3.0]).with_attribute("wattage", 550.0);
        obj.apply(&update).unwrap();

        assert_eq!(obj.position, [1.0, 2.0, 3.0]);
        assert_eq!(obj.rotation, ORIGIN);
        assert_eq!(obj.name, "Solar Panel");
        assert_eq!(obj.attributes.panel_wattage(), Some(550.0));
    }

    #[test]
    fn failed_attribute_patch_leaves_object_untouched() {
        let mut obj = panel();
        let before = obj.clone();
        let update = ObjectUpdate::position([5.0, 5.0, 5.0])
            .with_name("Renamed")
            .with_attribute("voltage", "high");
        assert!(obj.apply(&update).is_err());
        assert_eq!(obj, before);
    }

    #[test]
    fn empty_update_detection() {
        assert!(ObjectUpdate::default().is_empty());
        let no_keys = ObjectUpdate {
            attributes: Some(AttributeMap::new()),
            ..ObjectUpdate::default()
        };
        assert!(no_keys.is_empty());
        assert!(!ObjectUpdate::scale(UNIT_SCALE).is_empty());
    }
}
