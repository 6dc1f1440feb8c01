//! Supported component kinds and their tag parsing.

use std::fmt;
use std::str::FromStr;

/// The kinds of physical component that can be placed in a scene.
///
/// Wires are not a kind: connections live in the scene graph's wire set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    SolarPanel,
    Inverter,
    Battery,
    Roof,
    Wall,
}

/// A kind tag that does not name one of the five placeable components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported component kind \"{kind}\"")]
pub struct UnsupportedKindError {
    /// The tag as supplied by the caller.
    pub kind: String,
}

impl ComponentKind {
    /// All placeable kinds, in palette order.
    pub const ALL: [ComponentKind; 5] = [
        Self::SolarPanel,
        Self::Inverter,
        Self::Battery,
        Self::Roof,
        Self::Wall,
    ];

    /// Returns the serialized tag (`"solarPanel"`, `"inverter"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SolarPanel => "solarPanel",
            Self::Inverter => "inverter",
            Self::Battery => "battery",
            Self::Roof => "roof",
            Self::Wall => "wall",
        }
    }

    /// Returns the label given to freshly created objects of this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SolarPanel => "Solar Panel",
            Self::Inverter => "Inverter",
            Self::Battery => "Battery",
            Self::Roof => "Roof",
            Self::Wall => "Wall",
        }
    }
}

impl FromStr for ComponentKind {
    type Err = UnsupportedKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnsupportedKindError {
                kind: s.to_string(),
            })
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
