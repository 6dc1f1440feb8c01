//! Derived electrical sizing metrics.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::warning::DesignWarning;

/// Month labels used by reports, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Sizing metrics and warnings for one state of the scene graph.
///
/// Always produced wholesale by [`super::engine::recompute`]; never edited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculationResult {
    /// Sum of panel ratings (W).
    pub total_panel_wattage: f64,
    pub total_panel_count: usize,
    /// Sum of inverter capacities (W).
    pub inverter_capacity: f64,
    /// Sum of battery capacities (Wh).
    pub battery_capacity: f64,
    /// Configured system voltage (V), passed through from settings.
    pub system_voltage: f64,
    /// Estimated daily energy (kWh), rounded to 2 decimals.
    pub estimated_daily_production: f64,
    /// Estimated energy per month (kWh), January first, each rounded to 2 decimals.
    pub monthly_production: Vec<f64>,
    /// Warning messages, in evaluation order.
    pub warnings: Vec<String>,
}

impl CalculationResult {
    /// The result shown for a brand-new project: all zero, no warnings.
    pub fn zeroed(system_voltage: f64) -> Self {
        Self {
            system_voltage,
            monthly_production: vec![0.0; 12],
            ..Self::default()
        }
    }

    /// Returns `true` if `warning` was raised.
    pub fn has_warning(&self, warning: DesignWarning) -> bool {
        self.warnings.iter().any(|w| w == warning.message())
    }

    /// Sum of the monthly estimates (kWh).
    pub fn annual_production(&self) -> f64 {
        self.monthly_production.iter().sum()
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- System Report ---")?;
        writeln!(f, "Panels:              {}", self.total_panel_count)?;
        writeln!(f, "Total wattage:       {:.0} W", self.total_panel_wattage)?;
        writeln!(f, "Inverter capacity:   {:.1} kW", self.inverter_capacity / 1000.0)?;
        writeln!(f, "Battery storage:     {:.1} kWh", self.battery_capacity / 1000.0)?;
        writeln!(f, "System voltage:      {} V", self.system_voltage)?;
        writeln!(
            f,
            "Daily production:    {:.2} kWh",
            self.estimated_daily_production
        )?;
        write!(f, "Monthly (kWh):      ")?;
        for (name, value) in MONTH_NAMES.iter().zip(&self.monthly_production) {
            write!(f, " {name}={value:.2}")?;
        }
        writeln!(f)?;
        if self.warnings.is_empty() {
            write!(f, "Warnings:            none")
        } else {
            write!(f, "Warnings:")?;
            for warning in &self.warnings {
                write!(f, "\n  - {warning}")?;
            }
            Ok(())
        }
    }
}
