//! Design warnings raised by the sizing engine.

use std::fmt;

/// A design problem detected in the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignWarning {
    /// Panel wattage exceeds inverter capacity by more than the allowed ratio.
    OversizedArray,
    /// Panels are placed but there is no inverter capacity.
    NoInverter,
    /// The system has no battery capacity.
    NoBatteryStorage,
}

impl DesignWarning {
    pub fn message(&self) -> &'static str {
        match self {
            Self::OversizedArray => {
                "Total panel wattage exceeds inverter capacity by more than 20%"
            }
            Self::NoInverter => "No inverter connected to the system",
            Self::NoBatteryStorage => "No battery storage in the system",
        }
    }
}

impl fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
