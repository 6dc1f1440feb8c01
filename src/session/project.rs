//! The project session: a named project wrapped around one scene store.
//!
//! Dirty tracking compares the store's revision with the revision of the
//! last successful save. A save captures the revision of its payload, so a
//! response that arrives after further edits leaves the session dirty.

use chrono::Utc;
use log::{debug, info};

use super::auth::AuthProvider;
use super::persistence::{PersistenceError, ProjectId, ProjectRepository};
use super::snapshot::{ProjectSnapshot, SnapshotError};
use crate::calc::CalculationResult;
use crate::components::{ComponentKind, SceneObject};
use crate::config::DesignerConfig;
use crate::placement::DropPlacer;
use crate::scene::{SceneGraph, SceneGraphStore, SystemSettings};

/// Failure of a session-level operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("user not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// A save whose payload has been captured but whose outcome is not yet known.
///
/// Produced by [`ProjectSession::begin_save`] and consumed by
/// [`ProjectSession::complete_save`]. Edits made in between are kept.
#[derive(Debug, Clone)]
pub struct PendingSave {
    owner: String,
    project_id: Option<ProjectId>,
    payload: ProjectSnapshot,
    revision: u64,
    generation: u64,
}

impl PendingSave {
    /// Id of the user the record is saved for.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Existing id to update, or `None` for a first save.
    pub fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }

    /// The snapshot to hand to the repository (no `exportedAt`).
    pub fn payload(&self) -> &ProjectSnapshot {
        &self.payload
    }
}

/// Project identity and dirty state around a [`SceneGraphStore`].
#[derive(Debug, Clone)]
pub struct ProjectSession {
    id: Option<ProjectId>,
    name: String,
    description: String,
    store: SceneGraphStore,
    clean_revision: u64,
    // Bumped whenever a different project is opened, so late save
    // responses for the old one are not applied to the new one.
    generation: u64,
    placer: DropPlacer,
    default_name: String,
    default_settings: SystemSettings,
}

impl Default for ProjectSession {
    fn default() -> Self {
        Self::new(&DesignerConfig::default())
    }
}

impl ProjectSession {
    /// Creates a session holding a new, empty project.
    pub fn new(config: &DesignerConfig) -> Self {
        let default_settings = config.settings.to_settings();
        let store = SceneGraphStore::new(default_settings.clone());
        Self {
            id: None,
            name: config.project.default_name.clone(),
            description: String::new(),
            clean_revision: store.revision(),
            store,
            generation: 0,
            placer: DropPlacer::from_config(&config.placement),
            default_name: config.project.default_name.clone(),
            default_settings,
        }
    }

    pub fn id(&self) -> Option<&ProjectId> {
        self.id.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// `true` when there are changes since the last successful save or load.
    pub fn is_dirty(&self) -> bool {
        self.store.revision() != self.clean_revision
    }

    pub fn store(&self) -> &SceneGraphStore {
        &self.store
    }

    /// Mutable access for scene edits; every edit marks the session dirty.
    pub fn store_mut(&mut self) -> &mut SceneGraphStore {
        &mut self.store
    }

    pub fn graph(&self) -> &SceneGraph {
        self.store.graph()
    }

    pub fn calculations(&self) -> &CalculationResult {
        self.store.calculations()
    }

    /// Renames the project and sets its description.
    pub fn set_details(&mut self, name: impl Into<String>, description: impl Into<String>) {
        let (name, description) = (name.into(), description.into());
        if name == self.name && description == self.description {
            return;
        }
        self.name = name;
        self.description = description;
        self.store.touch();
    }

    /// Adds a component at a random drop position near the origin.
    pub fn quick_add(&mut self, kind: ComponentKind) -> SceneObject {
        let position = self.placer.next_position();
        self.store.add_object(kind, Some(position))
    }

    /// Discards the current project and starts an empty, clean one.
    pub fn new_project(&mut self) {
        self.id = None;
        self.name.clone_from(&self.default_name);
        self.description.clear();
        self.store.reset(self.default_settings.clone());
        self.generation += 1;
        self.clean_revision = self.store.revision();
        info!("new project \"{}\"", self.name);
    }

    /// Replaces the whole project with `snapshot` and recomputes.
    ///
    /// Stored calculations in the snapshot are ignored. Missing settings
    /// fall back to the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns a `SnapshotError` if the snapshot breaks a graph invariant;
    /// the session is left unchanged.
    pub fn load_project(&mut self, snapshot: &ProjectSnapshot) -> Result<(), SnapshotError> {
        let graph = snapshot.to_graph()?;
        let settings = snapshot
            .settings
            .clone()
            .unwrap_or_else(|| self.default_settings.clone());

        self.store.replace(graph, settings);
        self.id.clone_from(&snapshot.id);
        self.name = if snapshot.name.trim().is_empty() {
            self.default_name.clone()
        } else {
            snapshot.name.clone()
        };
        self.description.clone_from(&snapshot.description);
        self.generation += 1;
        self.clean_revision = self.store.revision();
        info!(
            "loaded project \"{}\" ({} objects, {} wires)",
            self.name,
            self.graph().object_count(),
            self.graph().wires().len()
        );
        Ok(())
    }

    /// Fetches the signed-in user's project `id` from `repo` and loads it.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` when unauthenticated, or if the project
    /// cannot be found or loaded.
    pub fn open_project(
        &mut self,
        repo: &dyn ProjectRepository,
        auth: &dyn AuthProvider,
        id: &ProjectId,
    ) -> Result<(), SessionError> {
        let user = auth.current_user().ok_or(SessionError::NotAuthenticated)?;
        let snapshot = repo.find(&user.id, id)?;
        self.load_project(&snapshot)?;
        if self.id.is_none() {
            self.id = Some(id.clone());
        }
        Ok(())
    }

    /// Returns the current project as a timestamped snapshot.
    ///
    /// # Errors
    ///
    /// Returns a `SnapshotError` if an object's attributes cannot be encoded.
    pub fn export_scene(&self) -> Result<ProjectSnapshot, SnapshotError> {
        let mut snapshot = self.snapshot()?;
        snapshot.exported_at = Some(Utc::now());
        Ok(snapshot)
    }

    fn snapshot(&self) -> Result<ProjectSnapshot, SnapshotError> {
        let mut snapshot = ProjectSnapshot {
            name: self.name.clone(),
            description: self.description.clone(),
            calculations: Some(self.calculations().clone()),
            settings: Some(self.store.settings().clone()),
            ..ProjectSnapshot::default()
        };
        snapshot.capture_graph(self.graph())?;
        Ok(snapshot)
    }

    /// Captures the save payload for the current state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAuthenticated` when nobody is signed in;
    /// nothing is captured in that case.
    pub fn begin_save(&self, auth: &dyn AuthProvider) -> Result<PendingSave, SessionError> {
        let user = auth.current_user().ok_or(SessionError::NotAuthenticated)?;
        debug!("saving \"{}\" for {}", self.name, user.name);
        Ok(PendingSave {
            owner: user.id,
            project_id: self.id.clone(),
            payload: self.snapshot()?,
            revision: self.store.revision(),
            generation: self.generation,
        })
    }

    /// Applies the repository's answer to a pending save.
    ///
    /// On success the session adopts the returned id and is clean unless it
    /// was edited after the payload was captured. If another project has been
    /// opened since, only the id is reported. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns the repository's failure as `SessionError::Persistence`.
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        outcome: Result<ProjectSnapshot, PersistenceError>,
    ) -> Result<ProjectId, SessionError> {
        let saved = outcome?;
        let id = saved.id.or(pending.project_id).ok_or_else(|| {
            PersistenceError::Validation("repository returned no project id".to_string())
        })?;

        if pending.generation != self.generation {
            debug!("save of {id} finished after the project was replaced");
            return Ok(id);
        }
        self.id = Some(id.clone());
        self.clean_revision = self.clean_revision.max(pending.revision);
        info!("saved project \"{}\" as {id}", self.name);
        Ok(id)
    }

    /// Saves through `repo`: creates on first save, updates afterwards.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` when unauthenticated or when the repository
    /// fails; the session state is unchanged so a retry is safe.
    pub fn save(
        &mut self,
        repo: &mut dyn ProjectRepository,
        auth: &dyn AuthProvider,
    ) -> Result<ProjectId, SessionError> {
        let pending = self.begin_save(auth)?;
        let outcome = match pending.project_id() {
            Some(id) => repo.update(pending.owner(), id, pending.payload()),
            None => repo.create(pending.owner(), pending.payload()),
        };
        self.complete_save(pending, outcome)
    }

    /// Signs out and starts a fresh project.
    pub fn logout(&mut self, auth: &mut dyn AuthProvider) {
        auth.sign_out();
        self.new_project();
    }
}
