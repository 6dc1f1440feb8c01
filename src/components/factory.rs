//! Construction of new scene objects with per-kind defaults.

use super::attributes::ComponentAttributes;
use super::kind::{ComponentKind, UnsupportedKindError};
use super::object::{ORIGIN, ObjectId, SceneObject, UNIT_SCALE, Vec3};

/// Stateless factory producing fresh objects.
///
/// Creation only allocates an id; it never touches a scene graph.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentFactory;

impl ComponentFactory {
    /// Creates a new object of `kind`.
    ///
    /// # Arguments
    ///
    /// * `kind` - Component kind to create
    /// * `position` - Placement; defaults to the origin when `None`
    ///
    /// # Returns
    ///
    /// An object with a fresh id, zero rotation, unit scale, the kind's display
    /// name, and its own copy of the kind's default attributes.
    pub fn create(&self, kind: ComponentKind, position: Option<Vec3>) -> SceneObject {
        SceneObject::from_parts(
            ObjectId::generate(),
            kind.display_name().to_string(),
            position.unwrap_or(ORIGIN),
            ORIGIN,
            UNIT_SCALE,
            ComponentAttributes::defaults_for(kind),
        )
    }

    /// Creates a new object from a serialized kind tag such as `"solarPanel"`.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedKindError` if `tag` names no placeable kind.
    pub fn create_tagged(
        &self,
        tag: &str,
        position: Option<Vec3>,
    ) -> Result<SceneObject, UnsupportedKindError> {
        let kind = tag.parse::<ComponentKind>()?;
        Ok(self.create(kind, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::object::ObjectUpdate;

    #[test]
    fn create_applies_kind_defaults() {
        let obj = ComponentFactory.create(ComponentKind::Inverter, None);
        assert_eq!(obj.kind(), ComponentKind::Inverter);
        assert_eq!(obj.name, "Inverter");
        assert_eq!(obj.position, ORIGIN);
        assert_eq!(obj.rotation, ORIGIN);
        assert_eq!(obj.scale, UNIT_SCALE);
        assert_eq!(obj.attributes.inverter_capacity(), Some(5000.0));
    }

    #[test]
    fn create_uses_given_position() {
        let obj = ComponentFactory.create(ComponentKind::Roof, Some([1.5, 0.0, -2.0]));
        assert_eq!(obj.position, [1.5, 0.0, -2.0]);
    }

    #[test]
    fn instances_do_not_share_attributes() {
        let mut a = ComponentFactory.create(ComponentKind::SolarPanel, None);
        let b = ComponentFactory.create(ComponentKind::SolarPanel, None);
        a.apply(&ObjectUpdate::default().with_attribute("wattage", 100.0))
            .unwrap();

        assert_eq!(a.attributes.panel_wattage(), Some(100.0));
        assert_eq!(b.attributes.panel_wattage(), Some(400.0));
        let c = ComponentFactory.create(ComponentKind::SolarPanel, None);
        assert_eq!(c.attributes.panel_wattage(), Some(400.0));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn create_tagged_rejects_unknown_kind() {
        let err = ComponentFactory.create_tagged("wire", None).unwrap_err();
        assert_eq!(err.kind, "wire");
        let ok = ComponentFactory.create_tagged("battery", None).unwrap();
        assert_eq!(ok.kind(), ComponentKind::Battery);
    }
}
