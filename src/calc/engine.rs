//! Sizing engine: a pure function from scene graph to [`CalculationResult`].

use std::f64::consts::PI;

use super::result::CalculationResult;
use super::warning::DesignWarning;
use crate::components::ComponentKind;
use crate::scene::SceneGraph;

/// Fixed peak-sun-hours heuristic used for daily production.
pub const PEAK_SUN_HOURS: f64 = 5.0;
/// Days assumed per month for the monthly estimate.
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Panel-to-inverter ratio above which the array counts as oversized.
pub const MAX_DC_AC_RATIO: f64 = 1.2;

/// Seasonal multiplier for month index `month` (0 = January).
///
/// A sinusoid between 0.4 and 1.0 peaking in month 6.
pub fn seasonal_factor(month: usize) -> f64 {
    0.7 + 0.3 * ((month as f64 - 3.0) * PI / 6.0).sin()
}

/// Rounds to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derives all sizing metrics and warnings for `graph`.
///
/// Deterministic and side-effect free: the same graph and voltage always
/// give an identical result. Roofs and walls do not contribute.
///
/// # Arguments
///
/// * `graph` - Scene graph to size
/// * `system_voltage` - Configured system voltage, reported unchanged
pub fn recompute(graph: &SceneGraph, system_voltage: f64) -> CalculationResult {
    let mut total_panel_wattage = 0.0;
    let mut total_panel_count = 0_usize;
    let mut inverter_capacity = 0.0;
    let mut battery_capacity = 0.0;

    for object in graph.objects() {
        let attrs = &object.attributes;
        match object.kind() {
            ComponentKind::SolarPanel => {
                total_panel_count += 1;
                total_panel_wattage += attrs.panel_wattage().unwrap_or_default();
            }
            ComponentKind::Inverter => {
                inverter_capacity += attrs.inverter_capacity().unwrap_or_default();
            }
            ComponentKind::Battery => {
                battery_capacity += attrs.battery_capacity().unwrap_or_default();
            }
            ComponentKind::Roof | ComponentKind::Wall => {}
        }
    }

    let daily_kwh = total_panel_wattage * PEAK_SUN_HOURS / 1000.0;
    let monthly_production = (0..12)
        .map(|month| round2(daily_kwh * DAYS_PER_MONTH * seasonal_factor(month)))
        .collect();

    let mut warnings = Vec::new();
    if total_panel_count > 0
        && inverter_capacity > 0.0
        && total_panel_wattage > inverter_capacity * MAX_DC_AC_RATIO
    {
        warnings.push(DesignWarning::OversizedArray);
    }
    if total_panel_count > 0 && inverter_capacity == 0.0 {
        warnings.push(DesignWarning::NoInverter);
    }
    if battery_capacity == 0.0 {
        warnings.push(DesignWarning::NoBatteryStorage);
    }

    CalculationResult {
        total_panel_wattage,
        total_panel_count,
        inverter_capacity,
        battery_capacity,
        system_voltage,
        estimated_daily_production: round2(daily_kwh),
        monthly_production,
        warnings: warnings.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentFactory, ObjectUpdate};
    use approx::assert_relative_eq;

    fn graph(objects: &[(ComponentKind, Option<ObjectUpdate>)]) -> SceneGraph {
        let mut graph = SceneGraph::default();
        for (kind, update) in objects {
            let mut obj = ComponentFactory.create(*kind, None);
            if let Some(update) = update {
                obj.apply(update).unwrap();
            }
            graph.insert_object(obj);
        }
        graph
    }

    fn rated(kind: ComponentKind, key: &str, value: f64) -> (ComponentKind, Option<ObjectUpdate>) {
        (kind, Some(ObjectUpdate::default().with_attribute(key, value)))
    }

    #[test]
    fn empty_graph_only_warns_about_storage() {
        let r = recompute(&SceneGraph::default(), 48.0);
        assert_eq!(r.total_panel_wattage, 0.0);
        assert_eq!(r.total_panel_count, 0);
        assert_eq!(r.inverter_capacity, 0.0);
        assert_eq!(r.battery_capacity, 0.0);
        assert_eq!(r.estimated_daily_production, 0.0);
        assert_eq!(r.monthly_production, vec![0.0; 12]);
        assert_eq!(r.warnings, vec![DesignWarning::NoBatteryStorage.to_string()]);
    }

    #[test]
    fn single_default_panel() {
        let r = recompute(&graph(&[(ComponentKind::SolarPanel, None)]), 48.0);
        assert_eq!(r.total_panel_wattage, 400.0);
        assert_eq!(r.total_panel_count, 1);
        assert_eq!(r.inverter_capacity, 0.0);
        assert_eq!(r.battery_capacity, 0.0);
        assert_eq!(r.estimated_daily_production, 2.0);
        assert!(r.has_warning(DesignWarning::NoInverter));
        assert!(r.has_warning(DesignWarning::NoBatteryStorage));
        assert!(!r.has_warning(DesignWarning::OversizedArray));
    }

    #[test]
    fn oversized_array_detected() {
        let g = graph(&[
            rated(ComponentKind::SolarPanel, "wattage", 500.0),
            rated(ComponentKind::SolarPanel, "wattage", 500.0),
            rated(ComponentKind::Inverter, "capacity", 700.0),
        ]);
        let r = recompute(&g, 48.0);
        assert_eq!(r.total_panel_wattage, 1000.0);
        assert!(r.has_warning(DesignWarning::OversizedArray));
        assert!(!r.has_warning(DesignWarning::NoInverter));
    }

    #[test]
    fn ratio_exactly_at_limit_is_not_oversized() {
        let g = graph(&[
            rated(ComponentKind::SolarPanel, "wattage", 600.0),
            rated(ComponentKind::Inverter, "capacity", 500.0),
            (ComponentKind::Battery, None),
        ]);
        let r = recompute(&g, 48.0);
        assert!(r.warnings.is_empty(), "unexpected warnings: {:?}", r.warnings);
    }

    #[test]
    fn zero_capacity_inverter_counts_as_no_inverter() {
        let g = graph(&[
            (ComponentKind::SolarPanel, None),
            rated(ComponentKind::Inverter, "capacity", 0.0),
        ]);
        let r = recompute(&g, 48.0);
        assert_eq!(
            r.warnings,
            vec![
                DesignWarning::NoInverter.to_string(),
                DesignWarning::NoBatteryStorage.to_string(),
            ]
        );
        assert!(!r.has_warning(DesignWarning::OversizedArray));
    }

    #[test]
    fn absent_ratings_use_defaults() {
        let mut g = SceneGraph::default();
        for kind in [ComponentKind::SolarPanel, ComponentKind::Inverter, ComponentKind::Battery] {
            let mut obj = ComponentFactory.create(kind, None);
            let key = if kind == ComponentKind::SolarPanel { "wattage" } else { "capacity" };
            obj.apply(&ObjectUpdate::default().with_attribute(key, serde_json::Value::Null))
                .unwrap();
            g.insert_object(obj);
        }
        let r = recompute(&g, 48.0);
        assert_eq!(r.total_panel_wattage, 400.0);
        assert_eq!(r.inverter_capacity, 5000.0);
        assert_eq!(r.battery_capacity, 5000.0);
    }

    #[test]
    fn structures_are_ignored() {
        let g = graph(&[(ComponentKind::Roof, None), (ComponentKind::Wall, None)]);
        assert_eq!(recompute(&g, 48.0), recompute(&SceneGraph::default(), 48.0));
    }

    #[test]
    fn seasonal_curve_matches_reference_points() {
        assert_relative_eq!(seasonal_factor(0), 0.4, epsilon = 1e-12);
        assert_relative_eq!(seasonal_factor(3), 0.7, epsilon = 1e-12);
        assert_relative_eq!(seasonal_factor(6), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn monthly_values_for_ten_kwh_per_day() {
        // 2000 W of panels => 10 kWh/day
        let g = graph(&[rated(ComponentKind::SolarPanel, "wattage", 2000.0)]);
        let r = recompute(&g, 48.0);
        assert_eq!(r.estimated_daily_production, 10.0);
        assert_eq!(r.monthly_production.len(), 12);
        assert_eq!(r.monthly_production[0], 120.0);
        assert_eq!(r.monthly_production[3], 210.0);
        assert_eq!(r.monthly_production[6], 300.0);
    }

    #[test]
    fn production_is_rounded_to_cents() {
        let g = graph(&[rated(ComponentKind::SolarPanel, "wattage", 333.0)]);
        let r = recompute(&g, 48.0);
        assert_eq!(r.estimated_daily_production, 1.67);
        for v in &r.monthly_production {
            assert_relative_eq!(*v, round2(*v), epsilon = 1e-12);
        }
    }

    #[test]
    fn voltage_passes_through() {
        assert_eq!(recompute(&SceneGraph::default(), 24.0).system_voltage, 24.0);
    }

    #[test]
    fn recompute_is_deterministic() {
        let g = graph(&[
            (ComponentKind::SolarPanel, None),
            (ComponentKind::Inverter, None),
            (ComponentKind::Battery, None),
        ]);
        assert_eq!(recompute(&g, 48.0), recompute(&g, 48.0));
    }
}
