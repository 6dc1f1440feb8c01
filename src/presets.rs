//! Built-in demo projects.

use crate::components::{AttributeError, ComponentKind, ObjectId, ObjectUpdate, Vec3};
use crate::config::ConfigError;
use crate::scene::{InteractionMode, SceneGraphStore};
use crate::session::ProjectSnapshot;

/// Available preset names.
pub const PRESETS: &[&str] = &["empty", "residential", "oversized"];

/// Builds the named demo project.
///
/// # Errors
///
/// Returns a `ConfigError` if the preset name is unknown.
pub fn preset(name: &str) -> Result<ProjectSnapshot, ConfigError> {
    let (title, description, built) = match name {
        "empty" => ("Empty Project", "", Ok(SceneGraphStore::default())),
        "residential" => (
            "Residential Rooftop",
            "4 kW rooftop array with a 5 kW inverter and 5 kWh of storage",
            residential(),
        ),
        "oversized" => (
            "Oversized Array",
            "6 kW of panels on a 3 kW inverter, no storage",
            oversized(),
        ),
        _ => {
            return Err(ConfigError {
                field: "preset".to_string(),
                message: format!("unknown preset \"{name}\", available: {}", PRESETS.join(", ")),
            });
        }
    };
    let store = built.map_err(|e| ConfigError {
        field: "preset".to_string(),
        message: format!("preset \"{name}\" could not be built: {e}"),
    })?;

    let mut snapshot = ProjectSnapshot {
        name: title.to_string(),
        description: description.to_string(),
        settings: Some(store.settings().clone()),
        ..ProjectSnapshot::default()
    };
    snapshot
        .capture_graph(store.graph())
        .map_err(|e| ConfigError {
            field: "preset".to_string(),
            message: format!("preset \"{name}\" could not be encoded: {e}"),
        })?;
    Ok(snapshot)
}

fn residential() -> Result<SceneGraphStore, AttributeError> {
    let mut store = SceneGraphStore::default();
    store.add_object(ComponentKind::Roof, Some([0.0, 0.0, 0.0]));
    let panels = panel_rows(&mut store, 5, 2, 400.0)?;
    let inverter = store.add_object(ComponentKind::Inverter, Some([6.0, 0.4, 0.0]));
    let battery = store.add_object(ComponentKind::Battery, Some([6.0, 0.6, 2.0]));

    wire_all(&mut store, &panels, inverter.id());
    wire_all(&mut store, &[battery.id().clone()], inverter.id());
    Ok(store)
}

fn oversized() -> Result<SceneGraphStore, AttributeError> {
    let mut store = SceneGraphStore::default();
    store.add_object(ComponentKind::Roof, Some([0.0, 0.0, 0.0]));
    let panels = panel_rows(&mut store, 4, 3, 500.0)?;
    let inverter = store.add_object(ComponentKind::Inverter, Some([6.0, 0.4, 0.0]));
    let derate = ObjectUpdate::default()
        .with_name("Small Inverter")
        .with_attribute("capacity", 3000.0);
    store.update_object(inverter.id(), &derate)?;

    wire_all(&mut store, &panels, inverter.id());
    Ok(store)
}

// Lays panels out in a grid on top of the default roof.
fn panel_rows(
    store: &mut SceneGraphStore,
    per_row: usize,
    rows: usize,
    wattage: f64,
) -> Result<Vec<ObjectId>, AttributeError> {
    let mut ids = Vec::with_capacity(per_row * rows);
    for row in 0..rows {
        for col in 0..per_row {
            let position: Vec3 = [
                (col as f64 - (per_row as f64 - 1.0) / 2.0) * 2.0,
                0.25,
                (row as f64 - (rows as f64 - 1.0) / 2.0) * 1.5,
            ];
            let panel = store.add_object(ComponentKind::SolarPanel, Some(position));
            let rating = ObjectUpdate::default().with_attribute("wattage", wattage);
            store.update_object(panel.id(), &rating)?;
            ids.push(panel.id().clone());
        }
    }
    Ok(ids)
}

// Draws wires the way a user would: click the source, then the target.
fn wire_all(store: &mut SceneGraphStore, sources: &[ObjectId], target: &ObjectId) {
    store.set_mode(InteractionMode::Wire);
    for source in sources {
        store.click_object(source);
        store.click_object(target);
    }
    store.set_mode(InteractionMode::Select);
}
