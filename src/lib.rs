//! Photovoltaic installation designer core.
//!
//! A [`session::ProjectSession`] owns one [`scene::SceneGraphStore`], which
//! holds the placed components and wires and keeps the electrical sizing
//! result from [`calc::recompute`] in step with every edit.

/// Electrical sizing engine and its result types.
pub mod calc;
pub mod components;
pub mod config;
pub mod io;
pub mod placement;
pub mod presets;
/// Scene graph, wiring, interaction state, and the mutation store.
pub mod scene;
pub mod session;
