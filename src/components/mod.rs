//! Placeable components: kinds, typed attributes, objects, and the factory.

/// Typed per-kind attribute records and their map form.
pub mod attributes;
pub mod factory;
/// Component kinds and tag parsing.
pub mod kind;
pub mod object;

pub use attributes::{AttributeError, AttributeMap, ComponentAttributes};
pub use factory::ComponentFactory;
pub use kind::{ComponentKind, UnsupportedKindError};
pub use object::{ObjectId, ObjectUpdate, SceneObject, Vec3};
