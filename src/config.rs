//! TOML-based designer configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::scene::SystemSettings;

/// Top-level designer configuration parsed from TOML.
///
/// Every field has a default, so an empty file is a valid configuration.
/// Load with [`DesignerConfig::from_toml_file`] or start from
/// [`DesignerConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignerConfig {
    /// Initial system settings for new projects.
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Project naming.
    #[serde(default)]
    pub project: ProjectConfig,
    /// Quick-add drop placement.
    #[serde(default)]
    pub placement: PlacementConfig,
}

/// System settings given to new projects.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    /// Placement grid cell size (must be > 0).
    pub grid_size: f64,
    pub snap_enabled: bool,
    pub show_grid: bool,
    pub show_wires: bool,
    /// System voltage (V, must be > 0).
    pub voltage: f64,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        let s = SystemSettings::default();
        Self {
            grid_size: s.grid_size,
            snap_enabled: s.snap_enabled,
            show_grid: s.show_grid,
            show_wires: s.show_wires,
            voltage: s.voltage,
        }
    }
}

impl SettingsConfig {
    /// Converts to the settings carried by a project.
    pub fn to_settings(&self) -> SystemSettings {
        SystemSettings {
            grid_size: self.grid_size,
            snap_enabled: self.snap_enabled,
            show_grid: self.show_grid,
            show_wires: self.show_wires,
            voltage: self.voltage,
        }
    }
}

/// Project naming.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Name given to new projects and to snapshots without one.
    pub default_name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_name: "Untitled Project".to_string(),
        }
    }
}

/// Random drop placement for quick-added components.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    /// Random seed for drop positions.
    pub seed: u64,
    /// Side length of the square drop area centred on the origin (must be >= 0).
    pub spread: f64,
    /// Height at which dropped components land.
    pub drop_height: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            spread: 4.0,
            drop_height: 0.5,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"settings.voltage"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl DesignerConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.settings;
        if s.voltage.is_nan() || s.voltage <= 0.0 {
            errors.push(ConfigError {
                field: "settings.voltage".into(),
                message: "must be > 0".into(),
            });
        }
        if s.grid_size.is_nan() || s.grid_size <= 0.0 {
            errors.push(ConfigError {
                field: "settings.grid_size".into(),
                message: "must be > 0".into(),
            });
        }

        if self.project.default_name.trim().is_empty() {
            errors.push(ConfigError {
                field: "project.default_name".into(),
                message: "must not be blank".into(),
            });
        }

        let p = &self.placement;
        if p.spread.is_nan() || p.spread < 0.0 {
            errors.push(ConfigError {
                field: "placement.spread".into(),
                message: "must be >= 0".into(),
            });
        }
        if !p.drop_height.is_finite() {
            errors.push(ConfigError {
                field: "placement.drop_height".into(),
                message: "must be finite".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let errors = DesignerConfig::default().validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = DesignerConfig::from_toml_str("").ok();
        assert_eq!(cfg.as_ref().map(|c| c.settings.voltage), Some(48.0));
        assert_eq!(
            cfg.as_ref().map(|c| c.project.default_name.as_str()),
            Some("Untitled Project")
        );
        assert_eq!(cfg.as_ref().map(|c| c.placement.seed), Some(42));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[settings]
grid_size = 0.25
snap_enabled = false
show_grid = true
show_wires = false
voltage = 24.0

[project]
default_name = "Garage Roof"

[placement]
seed = 7
spread = 2.0
drop_height = 1.0
"#;
        let cfg = DesignerConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "parse failed: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.settings.voltage), Some(24.0));
        assert_eq!(cfg.as_ref().map(|c| c.settings.snap_enabled), Some(false));
        assert_eq!(
            cfg.as_ref().map(|c| c.project.default_name.as_str()),
            Some("Garage Roof")
        );
        assert_eq!(cfg.as_ref().map(|c| c.placement.spread), Some(2.0));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[placement]
seed = 99
"#;
        let cfg = DesignerConfig::from_toml_str(toml).ok();
        // seed overridden
        assert_eq!(cfg.as_ref().map(|c| c.placement.seed), Some(99));
        // spread and settings kept default
        assert_eq!(cfg.as_ref().map(|c| c.placement.spread), Some(4.0));
        assert_eq!(cfg.as_ref().map(|c| c.settings.grid_size), Some(0.5));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[settings]
voltage = 48.0
bogus_field = true
"#;
        assert!(DesignerConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_bad_voltage() {
        let mut cfg = DesignerConfig::default();
        cfg.settings.voltage = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "settings.voltage"));
    }

    #[test]
    fn validation_catches_nan_grid() {
        let mut cfg = DesignerConfig::default();
        cfg.settings.grid_size = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "settings.grid_size"));
    }

    #[test]
    fn validation_catches_blank_name_and_negative_spread() {
        let mut cfg = DesignerConfig::default();
        cfg.project.default_name = "   ".to_string();
        cfg.placement.spread = -1.0;
        let fields: Vec<_> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"project.default_name".to_string()));
        assert!(fields.contains(&"placement.spread".to_string()));
    }

    #[test]
    fn settings_conversion_keeps_values() {
        let mut cfg = DesignerConfig::default();
        cfg.settings.voltage = 12.0;
        cfg.settings.show_grid = false;
        let s = cfg.settings.to_settings();
        assert_eq!(s.voltage, 12.0);
        assert!(!s.show_grid);
        assert_eq!(s.grid_size, 0.5);
    }
}
