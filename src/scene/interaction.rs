//! Interaction modes driven by the editor's input layer.

use serde::{Deserialize, Serialize};

/// What a click on an object means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Clicks pick objects for inspection and transform.
    #[default]
    Select,
    /// Clicks pick wire endpoints.
    Wire,
}

/// Which gizmo the renderer shows on the selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}
