//! Undirected electrical connections between two scene objects.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::components::ObjectId;

/// Opaque identifier of a wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(String);

impl WireId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WireId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current type carried by a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireType {
    #[default]
    Dc,
    Ac,
}

/// A connection between two distinct objects.
///
/// `from_id`/`to_id` record the drawing order only; `(A, B)` and `(B, A)`
/// are the same connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: WireId,
    #[serde(alias = "fromComponentId")]
    pub from_id: ObjectId,
    #[serde(alias = "toComponentId")]
    pub to_id: ObjectId,
    #[serde(default)]
    pub wire_type: WireType,
}

impl Wire {
    /// Creates a DC wire with a fresh id.
    pub fn new(from_id: ObjectId, to_id: ObjectId) -> Self {
        Self {
            id: WireId::generate(),
            from_id,
            to_id,
            wire_type: WireType::Dc,
        }
    }

    /// Returns `true` if either endpoint is `id`.
    pub fn touches(&self, id: &ObjectId) -> bool {
        self.from_id == *id || self.to_id == *id
    }

    /// Returns `true` if this wire joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &ObjectId, b: &ObjectId) -> bool {
        (self.from_id == *a && self.to_id == *b) || (self.from_id == *b && self.to_id == *a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connects_is_symmetric() {
        let (a, b, c) = (ObjectId::from("a"), ObjectId::from("b"), ObjectId::from("c"));
        let wire = Wire::new(a.clone(), b.clone());
        assert!(wire.connects(&a, &b));
        assert!(wire.connects(&b, &a));
        assert!(!wire.connects(&a, &c));
        assert!(wire.touches(&b));
        assert!(!wire.touches(&c));
    }

    #[test]
    fn serializes_with_contract_field_names() {
        let wire = Wire {
            id: WireId::from("w1"),
            from_id: ObjectId::from("a"),
            to_id: ObjectId::from("b"),
            wire_type: WireType::Ac,
        };
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "w1", "fromId": "a", "toId": "b", "wireType": "ac" })
        );
    }

    #[test]
    fn accepts_legacy_endpoint_names_and_defaults_to_dc() {
        let wire: Wire = serde_json::from_str(
            r#"{ "id": "w1", "fromComponentId": "a", "toComponentId": "b" }"#,
        )
        .unwrap();
        assert_eq!(wire.from_id, ObjectId::from("a"));
        assert_eq!(wire.wire_type, WireType::Dc);
    }
}
