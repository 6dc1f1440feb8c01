//! Scene graph: placed objects, wires, interaction state, and the store that
//! keeps them consistent with the sizing result.

pub mod graph;
pub mod interaction;
pub mod settings;
pub mod store;
pub mod wire;

pub use graph::{SceneGraph, WireRejection};
pub use interaction::{InteractionMode, TransformMode};
pub use settings::{SettingsUpdate, SystemSettings};
pub use store::SceneGraphStore;
pub use wire::{Wire, WireId, WireType};
