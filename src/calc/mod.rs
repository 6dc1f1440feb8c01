//! Electrical sizing: derived metrics and design warnings for a scene.

pub mod engine;
pub mod result;
pub mod warning;

pub use engine::recompute;
pub use result::{CalculationResult, MONTH_NAMES};
pub use warning::DesignWarning;
