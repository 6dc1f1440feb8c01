//! Strongly-typed per-kind attribute records.
//!
//! Each kind carries its own record inside [`ComponentAttributes`]. The
//! untyped [`AttributeMap`] only exists at the serialization boundary and for
//! partial updates, which are shallow-merged into the record's map form and
//! decoded back so that a bad value never reaches the scene graph.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kind::ComponentKind;

/// Untyped attribute bag as it appears in snapshots and update patches.
pub type AttributeMap = serde_json::Map<String, Value>;

/// Rated wattage assumed for a panel whose `wattage` is absent (W).
pub const DEFAULT_PANEL_WATTAGE: f64 = 400.0;
/// Capacity assumed for an inverter whose `capacity` is absent (W).
pub const DEFAULT_INVERTER_CAPACITY: f64 = 5000.0;
/// Capacity assumed for a battery whose `capacity` is absent (Wh).
pub const DEFAULT_BATTERY_CAPACITY: f64 = 5000.0;

/// An attribute map that does not fit the typed record of its kind.
#[derive(Debug, thiserror::Error)]
pub enum AttributeError {
    #[error("invalid {kind} attributes: {source}")]
    Invalid {
        kind: ComponentKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} attributes did not encode to an object")]
    NotAnObject { kind: ComponentKind },
}

/// Solar panel ratings and footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelAttributes {
    /// Rated output (W). Absent means [`DEFAULT_PANEL_WATTAGE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wattage: Option<f64>,
    /// Nominal voltage (V).
    pub voltage: f64,
    /// Conversion efficiency (0.0 to 1.0).
    pub efficiency: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// User-defined keys with no typed counterpart, kept verbatim.
    #[serde(flatten)]
    pub extra: AttributeMap,
}

impl Default for PanelAttributes {
    fn default() -> Self {
        Self {
            wattage: Some(DEFAULT_PANEL_WATTAGE),
            voltage: 48.0,
            efficiency: 0.22,
            width: 2.0,
            height: 0.05,
            depth: 1.0,
            extra: AttributeMap::new(),
        }
    }
}

/// Inverter ratings and footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InverterAttributes {
    /// Continuous AC capacity (W). Absent means [`DEFAULT_INVERTER_CAPACITY`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    pub input_voltage: f64,
    pub output_voltage: f64,
    pub efficiency: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    #[serde(flatten)]
    pub extra: AttributeMap,
}

impl Default for InverterAttributes {
    fn default() -> Self {
        Self {
            capacity: Some(DEFAULT_INVERTER_CAPACITY),
            input_voltage: 48.0,
            output_voltage: 230.0,
            efficiency: 0.96,
            width: 0.5,
            height: 0.8,
            depth: 0.3,
            extra: AttributeMap::new(),
        }
    }
}

/// Battery ratings and footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatteryAttributes {
    /// Storage capacity (Wh). Absent means [`DEFAULT_BATTERY_CAPACITY`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    pub voltage: f64,
    /// Cell chemistry tag, stored under `type`.
    #[serde(rename = "type", alias = "chemistry")]
    pub chemistry: String,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    #[serde(flatten)]
    pub extra: AttributeMap,
}

impl Default for BatteryAttributes {
    fn default() -> Self {
        Self {
            capacity: Some(DEFAULT_BATTERY_CAPACITY),
            voltage: 48.0,
            chemistry: "LiFePO4".to_string(),
            width: 0.6,
            height: 1.2,
            depth: 0.25,
            extra: AttributeMap::new(),
        }
    }
}

/// Structural element appearance and footprint, shared by roofs and walls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureAttributes {
    /// CSS-style hex colour.
    pub color: String,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    #[serde(flatten)]
    pub extra: AttributeMap,
}

impl StructureAttributes {
    /// Default roof slab: brown, 10 x 0.2 x 10.
    pub fn roof() -> Self {
        Self {
            color: "#8b4513".to_string(),
            width: 10.0,
            height: 0.2,
            depth: 10.0,
            extra: AttributeMap::new(),
        }
    }

    /// Default wall: off-white, 4 x 3 x 0.2.
    pub fn wall() -> Self {
        Self {
            color: "#f5f5f5".to_string(),
            width: 4.0,
            height: 3.0,
            depth: 0.2,
            extra: AttributeMap::new(),
        }
    }
}

/// Kind-tagged attribute record; the variant is the object's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentAttributes {
    SolarPanel(PanelAttributes),
    Inverter(InverterAttributes),
    Battery(BatteryAttributes),
    Roof(StructureAttributes),
    Wall(StructureAttributes),
}

impl ComponentAttributes {
    /// Returns a fresh copy of the default attribute table for `kind`.
    pub fn defaults_for(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::SolarPanel => Self::SolarPanel(PanelAttributes::default()),
            ComponentKind::Inverter => Self::Inverter(InverterAttributes::default()),
            ComponentKind::Battery => Self::Battery(BatteryAttributes::default()),
            ComponentKind::Roof => Self::Roof(StructureAttributes::roof()),
            ComponentKind::Wall => Self::Wall(StructureAttributes::wall()),
        }
    }

    /// Returns the kind this record belongs to.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::SolarPanel(_) => ComponentKind::SolarPanel,
            Self::Inverter(_) => ComponentKind::Inverter,
            Self::Battery(_) => ComponentKind::Battery,
            Self::Roof(_) => ComponentKind::Roof,
            Self::Wall(_) => ComponentKind::Wall,
        }
    }

    /// Encodes the record as an untyped map for snapshots.
    ///
    /// # Errors
    ///
    /// Returns an `AttributeError` if a value cannot be represented in JSON.
    pub fn to_map(&self) -> Result<AttributeMap, AttributeError> {
        let kind = self.kind();
        let value = match self {
            Self::SolarPanel(a) => serde_json::to_value(a),
            Self::Inverter(a) => serde_json::to_value(a),
            Self::Battery(a) => serde_json::to_value(a),
            Self::Roof(a) | Self::Wall(a) => serde_json::to_value(a),
        }
        .map_err(|source| AttributeError::Invalid { kind, source })?;

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(AttributeError::NotAnObject { kind }),
        }
    }

    /// Decodes an untyped map into the typed record for `kind`.
    ///
    /// Keys missing from `map` take the kind's default, except the rated
    /// `wattage`/`capacity` fields which stay absent.
    ///
    /// # Errors
    ///
    /// Returns an `AttributeError` if a known key holds a value of the wrong type.
    pub fn from_map(kind: ComponentKind, map: AttributeMap) -> Result<Self, AttributeError> {
        match kind {
            ComponentKind::SolarPanel => decode(kind, map).map(Self::SolarPanel),
            ComponentKind::Inverter => decode(kind, map).map(Self::Inverter),
            ComponentKind::Battery => decode(kind, map).map(Self::Battery),
            ComponentKind::Roof => {
                decode_structure(kind, map, StructureAttributes::roof()).map(Self::Roof)
            }
            ComponentKind::Wall => {
                decode_structure(kind, map, StructureAttributes::wall()).map(Self::Wall)
            }
        }
    }

    /// Returns a copy with `patch` shallow-merged over the current values.
    ///
    /// # Errors
    ///
    /// Returns an `AttributeError` if the merged map no longer fits the record.
    pub fn merged(&self, patch: &AttributeMap) -> Result<Self, AttributeError> {
        let mut map = self.to_map()?;
        for (key, value) in patch {
            map.insert(key.clone(), value.clone());
        }
        Self::from_map(self.kind(), map)
    }

    /// Panel wattage with the absent-value default applied, if this is a panel.
    pub fn panel_wattage(&self) -> Option<f64> {
        match self {
            Self::SolarPanel(a) => Some(a.wattage.unwrap_or(DEFAULT_PANEL_WATTAGE)),
            _ => None,
        }
    }

    /// Inverter capacity with the absent-value default applied, if this is an inverter.
    pub fn inverter_capacity(&self) -> Option<f64> {
        match self {
            Self::Inverter(a) => Some(a.capacity.unwrap_or(DEFAULT_INVERTER_CAPACITY)),
            _ => None,
        }
    }

    /// Battery capacity with the absent-value default applied, if this is a battery.
    pub fn battery_capacity(&self) -> Option<f64> {
        match self {
            Self::Battery(a) => Some(a.capacity.unwrap_or(DEFAULT_BATTERY_CAPACITY)),
            _ => None,
        }
    }
}

fn decode<T: DeserializeOwned>(
    kind: ComponentKind,
    map: AttributeMap,
) -> Result<T, AttributeError> {
    serde_json::from_value(Value::Object(map))
        .map_err(|source| AttributeError::Invalid { kind, source })
}

// Roofs and walls share a record but not defaults, so missing keys are
// filled from the kind's own table before decoding.
fn decode_structure(
    kind: ComponentKind,
    map: AttributeMap,
    defaults: StructureAttributes,
) -> Result<StructureAttributes, AttributeError> {
    let mut base = match serde_json::to_value(defaults) {
        Ok(Value::Object(base)) => base,
        _ => return Err(AttributeError::NotAnObject { kind }),
    };
    base.extend(map);
    decode(kind, base)
}
