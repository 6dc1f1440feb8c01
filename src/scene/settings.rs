//! Editor and electrical settings persisted alongside a project.

use serde::{Deserialize, Serialize};

/// Project-wide settings.
///
/// Only `voltage` feeds the calculation engine; the rest are display flags
/// kept here so they persist with the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemSettings {
    /// Placement grid cell size (scene units).
    pub grid_size: f64,
    pub snap_enabled: bool,
    pub show_grid: bool,
    pub show_wires: bool,
    /// Configured DC system voltage (V), reported as `systemVoltage`.
    pub voltage: f64,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            grid_size: 0.5,
            snap_enabled: true,
            show_grid: true,
            show_wires: true,
            voltage: 48.0,
        }
    }
}

/// Partial settings change. `None` leaves a setting as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub grid_size: Option<f64>,
    pub snap_enabled: Option<bool>,
    pub show_grid: Option<bool>,
    pub show_wires: Option<bool>,
    pub voltage: Option<f64>,
}

impl SettingsUpdate {
    pub fn voltage(voltage: f64) -> Self {
        Self {
            voltage: Some(voltage),
            ..Self::default()
        }
    }
}

impl SystemSettings {
    /// Shallow-merges `update` and returns `true` if any value changed.
    pub fn apply(&mut self, update: &SettingsUpdate) -> bool {
        let before = self.clone();
        if let Some(v) = update.grid_size {
            self.grid_size = v;
        }
        if let Some(v) = update.snap_enabled {
            self.snap_enabled = v;
        }
        if let Some(v) = update.show_grid {
            self.show_grid = v;
        }
        if let Some(v) = update.show_wires {
            self.show_wires = v;
        }
        if let Some(v) = update.voltage {
            self.voltage = v;
        }
        *self != before
    }
}
