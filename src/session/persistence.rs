//! Project persistence collaborators.
//!
//! A session only sees the [`ProjectRepository`] trait. Two implementations
//! ship with the crate: an in-memory map for tests and embedding, and a
//! directory of JSON files, one per project.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snapshot::ProjectSnapshot;

/// Maximum project name length, in characters.
pub const MAX_NAME_LEN: usize = 100;
/// Maximum project description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Identifier assigned to a project by its repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Ids double as file names, so only plain tokens are usable.
    fn is_file_safe(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure reported by a repository.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("project {0} not found")]
    NotFound(ProjectId),
    #[error("invalid project record: {0}")]
    Validation(String),
    #[error("project storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("project record encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage for project snapshots, partitioned by owner.
///
/// Every call is scoped to `owner`: a record belonging to someone else is
/// reported as `NotFound`. `create` and `update` return the stored record
/// with its id, owner and timestamps set.
pub trait ProjectRepository {
    /// Stores a new project for `owner` under a fresh id.
    fn create(
        &mut self,
        owner: &str,
        snapshot: &ProjectSnapshot,
    ) -> Result<ProjectSnapshot, PersistenceError>;

    /// Replaces the project `id`, keeping its creation time.
    fn update(
        &mut self,
        owner: &str,
        id: &ProjectId,
        snapshot: &ProjectSnapshot,
    ) -> Result<ProjectSnapshot, PersistenceError>;

    /// Loads the project `id`.
    fn find(&self, owner: &str, id: &ProjectId) -> Result<ProjectSnapshot, PersistenceError>;

    /// The owner's projects, most recently created first.
    fn list(&self, owner: &str) -> Result<Vec<ProjectSnapshot>, PersistenceError>;

    /// Deletes the project `id`.
    fn delete(&mut self, owner: &str, id: &ProjectId) -> Result<(), PersistenceError>;

    /// The owner's projects whose name contains any word of `query`,
    /// ignoring case. A blank query matches nothing.
    fn search(&self, owner: &str, query: &str) -> Result<Vec<ProjectSnapshot>, PersistenceError> {
        Ok(self
            .list(owner)?
            .into_iter()
            .filter(|record| name_matches(&record.name, query))
            .collect())
    }
}

fn name_matches(name: &str, query: &str) -> bool {
    let name = name.to_lowercase();
    query
        .split_whitespace()
        .any(|term| name.contains(&term.to_lowercase()))
}

fn owned_by(record: &ProjectSnapshot, owner: &str) -> bool {
    record.owner_id.as_deref() == Some(owner)
}

// Stable, so records created in the same instant keep storage order.
fn newest_first(records: &mut [ProjectSnapshot]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Checks and normalizes a record before it is stored.
///
/// Name and description are trimmed. `exportedAt` is dropped since it is
/// never part of a persisted record. The record is stamped with `owner`,
/// `updatedAt = now` and `createdAt = created_at` (or `now` for a new one).
///
/// # Errors
///
/// Returns `PersistenceError::Validation` for a blank or over-long name, or
/// an over-long description.
pub fn prepare_record(
    id: ProjectId,
    owner: &str,
    snapshot: &ProjectSnapshot,
    created_at: Option<DateTime<Utc>>,
) -> Result<ProjectSnapshot, PersistenceError> {
    let name = snapshot.name.trim();
    if name.is_empty() {
        return Err(PersistenceError::Validation("name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(PersistenceError::Validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    let description = snapshot.description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(PersistenceError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }

    let now = Utc::now();
    Ok(ProjectSnapshot {
        id: Some(id),
        name: name.to_string(),
        description: description.to_string(),
        exported_at: None,
        owner_id: Some(owner.to_string()),
        created_at: Some(created_at.unwrap_or(now)),
        updated_at: Some(now),
        ..snapshot.clone()
    })
}

/// Repository backed by an ordered in-memory map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: IndexMap<ProjectId, ProjectSnapshot>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all owners.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn owned(&self, owner: &str, id: &ProjectId) -> Result<&ProjectSnapshot, PersistenceError> {
        self.records
            .get(id)
            .filter(|record| owned_by(record, owner))
            .ok_or_else(|| PersistenceError::NotFound(id.clone()))
    }
}

impl ProjectRepository for InMemoryRepository {
    fn create(
        &mut self,
        owner: &str,
        snapshot: &ProjectSnapshot,
    ) -> Result<ProjectSnapshot, PersistenceError> {
        let id = ProjectId::generate();
        let record = prepare_record(id.clone(), owner, snapshot, None)?;
        self.records.insert(id, record.clone());
        Ok(record)
    }

    fn update(
        &mut self,
        owner: &str,
        id: &ProjectId,
        snapshot: &ProjectSnapshot,
    ) -> Result<ProjectSnapshot, PersistenceError> {
        let created_at = self.owned(owner, id)?.created_at;
        let record = prepare_record(id.clone(), owner, snapshot, created_at)?;
        self.records.insert(id.clone(), record.clone());
        Ok(record)
    }

    fn find(&self, owner: &str, id: &ProjectId) -> Result<ProjectSnapshot, PersistenceError> {
        self.owned(owner, id).cloned()
    }

    fn list(&self, owner: &str) -> Result<Vec<ProjectSnapshot>, PersistenceError> {
        let mut records: Vec<_> = self
            .records
            .values()
            .filter(|record| owned_by(record, owner))
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    fn delete(&mut self, owner: &str, id: &ProjectId) -> Result<(), PersistenceError> {
        self.owned(owner, id)?;
        self.records.shift_remove(id);
        Ok(())
    }
}

/// Repository storing each project as `<root>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirRepository {
    root: PathBuf,
}

impl JsonDirRepository {
    /// Opens (and creates if needed) the directory `root`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!("project store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &ProjectId) -> Option<PathBuf> {
        id.is_file_safe()
            .then(|| self.root.join(format!("{id}.json")))
    }

    fn write(&self, path: &Path, record: &ProjectSnapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(record)?;
        fs::write(path, json)?;
        debug!("wrote {}", path.display());
        Ok(())
    }

    fn read(path: &Path) -> Result<ProjectSnapshot, PersistenceError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Path and contents of an existing record owned by `owner`.
    fn owned(
        &self,
        owner: &str,
        id: &ProjectId,
    ) -> Result<(PathBuf, ProjectSnapshot), PersistenceError> {
        let path = self
            .path_for(id)
            .filter(|p| p.is_file())
            .ok_or_else(|| PersistenceError::NotFound(id.clone()))?;
        let mut record = Self::read(&path)?;
        if !owned_by(&record, owner) {
            return Err(PersistenceError::NotFound(id.clone()));
        }
        record.id = Some(id.clone());
        Ok((path, record))
    }
}

impl ProjectRepository for JsonDirRepository {
    fn create(
        &mut self,
        owner: &str,
        snapshot: &ProjectSnapshot,
    ) -> Result<ProjectSnapshot, PersistenceError> {
        let id = ProjectId::generate();
        let record = prepare_record(id.clone(), owner, snapshot, None)?;
        let path = self
            .path_for(&id)
            .ok_or_else(|| PersistenceError::Validation(format!("unusable project id {id}")))?;
        self.write(&path, &record)?;
        Ok(record)
    }

    fn update(
        &mut self,
        owner: &str,
        id: &ProjectId,
        snapshot: &ProjectSnapshot,
    ) -> Result<ProjectSnapshot, PersistenceError> {
        let (path, existing) = self.owned(owner, id)?;
        let record = prepare_record(id.clone(), owner, snapshot, existing.created_at)?;
        self.write(&path, &record)?;
        Ok(record)
    }

    fn find(&self, owner: &str, id: &ProjectId) -> Result<ProjectSnapshot, PersistenceError> {
        self.owned(owner, id).map(|(_, record)| record)
    }

    fn list(&self, owner: &str) -> Result<Vec<ProjectSnapshot>, PersistenceError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut records = Vec::new();
        for path in &paths {
            let record = Self::read(path)?;
            if owned_by(&record, owner) {
                records.push(record);
            }
        }
        newest_first(&mut records);
        Ok(records)
    }

    fn delete(&mut self, owner: &str, id: &ProjectId) -> Result<(), PersistenceError> {
        let (path, _) = self.owned(owner, id)?;
        fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "alice";
    const BOB: &str = "bob";

    fn named(name: &str) -> ProjectSnapshot {
        ProjectSnapshot {
            name: name.to_string(),
            ..ProjectSnapshot::default()
        }
    }

    #[test]
    fn create_assigns_id_owner_and_stamps() {
        let mut repo = InMemoryRepository::new();
        let saved = repo.create(ALICE, &named("  Barn  ")).unwrap();
        assert!(saved.id.is_some());
        assert_eq!(saved.name, "Barn");
        assert_eq!(saved.owner_id.as_deref(), Some(ALICE));
        assert!(saved.created_at.is_some());
        assert_eq!(saved.created_at, saved.updated_at);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn validation_rules() {
        let mut repo = InMemoryRepository::new();
        assert!(matches!(repo.create(ALICE, &named("   ")), Err(PersistenceError::Validation(_))));
        assert!(matches!(
            repo.create(ALICE, &named(&"x".repeat(MAX_NAME_LEN + 1))),
            Err(PersistenceError::Validation(_))
        ));
        assert!(repo.create(ALICE, &named(&"x".repeat(MAX_NAME_LEN))).is_ok());

        let mut long_desc = named("ok");
        long_desc.description = "d".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(matches!(
            repo.create(ALICE, &long_desc),
            Err(PersistenceError::Validation(_))
        ));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn update_and_find_unknown_id() {
        let mut repo = InMemoryRepository::new();
        let ghost = ProjectId::from("ghost");
        assert!(matches!(repo.find(ALICE, &ghost), Err(PersistenceError::NotFound(_))));
        assert!(matches!(
            repo.update(ALICE, &ghost, &named("a")),
            Err(PersistenceError::NotFound(_))
        ));
        assert!(matches!(repo.delete(ALICE, &ghost), Err(PersistenceError::NotFound(_))));
    }

    #[test]
    fn update_replaces_record_and_keeps_creation_time() {
        let mut repo = InMemoryRepository::new();
        let first = repo.create(ALICE, &named("first")).unwrap();
        let id = first.id.clone().unwrap();
        let second = repo.update(ALICE, &id, &named("second")).unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);

        assert_eq!(repo.find(ALICE, &id).unwrap().name, "second");
        assert_eq!(repo.list(ALICE).unwrap().len(), 1);
        repo.delete(ALICE, &id).unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn records_are_scoped_to_their_owner() {
        let mut repo = InMemoryRepository::new();
        let id = repo.create(ALICE, &named("Shed")).unwrap().id.unwrap();
        repo.create(BOB, &named("Garage")).unwrap();

        assert!(matches!(repo.find(BOB, &id), Err(PersistenceError::NotFound(_))));
        assert!(matches!(
            repo.update(BOB, &id, &named("taken")),
            Err(PersistenceError::NotFound(_))
        ));
        assert!(matches!(repo.delete(BOB, &id), Err(PersistenceError::NotFound(_))));
        assert_eq!(repo.find(ALICE, &id).unwrap().name, "Shed");

        let names: Vec<_> = repo.list(BOB).unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Garage"]);
    }

    #[test]
    fn list_is_newest_first() {
        let mut repo = InMemoryRepository::new();
        let old = repo.create(ALICE, &named("old")).unwrap();
        let id = old.id.clone().unwrap();
        // Push the first record back in time so the order does not hinge on clock resolution.
        if let Some(record) = repo.records.get_mut(&id) {
            record.created_at = old.created_at.map(|t| t - chrono::Duration::hours(1));
        }
        repo.create(ALICE, &named("new")).unwrap();

        let names: Vec<_> = repo.list(ALICE).unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[test]
    fn search_matches_any_word_of_the_name() {
        let mut repo = InMemoryRepository::new();
        repo.create(ALICE, &named("Lake Cabin")).unwrap();
        repo.create(ALICE, &named("Barn roof")).unwrap();
        repo.create(BOB, &named("Cabin annex")).unwrap();

        let found: Vec<_> = repo
            .search(ALICE, "cabin shed")
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(found, vec!["Lake Cabin"]);
        assert!(repo.search(ALICE, "   ").unwrap().is_empty());
        assert_eq!(repo.search(BOB, "CABIN").unwrap().len(), 1);
    }

    #[test]
    fn exported_at_is_not_persisted() {
        let mut repo = InMemoryRepository::new();
        let mut snap = named("stamped");
        snap.exported_at = Some(Utc::now());
        assert_eq!(repo.create(ALICE, &snap).unwrap().exported_at, None);
    }

    #[test]
    fn file_store_scopes_by_owner() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = JsonDirRepository::open(dir.path()).unwrap();
        let first = repo.create(ALICE, &named("Porch")).unwrap();
        let id = first.id.clone().unwrap();
        repo.create(BOB, &named("Dock")).unwrap();

        assert!(matches!(repo.find(BOB, &id), Err(PersistenceError::NotFound(_))));
        assert_eq!(repo.list(ALICE).unwrap().len(), 1);

        let updated = repo.update(ALICE, &id, &named("Porch v2")).unwrap();
        assert_eq!(updated.created_at, first.created_at);
        assert_eq!(repo.find(ALICE, &id).unwrap().name, "Porch v2");

        assert!(matches!(repo.delete(BOB, &id), Err(PersistenceError::NotFound(_))));
        repo.delete(ALICE, &id).unwrap();
        assert!(repo.list(ALICE).unwrap().is_empty());
        assert_eq!(repo.list(BOB).unwrap().len(), 1);
    }

    #[test]
    fn path_ids_are_rejected_by_the_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonDirRepository::open(dir.path()).unwrap();
        let sneaky = ProjectId::from("../outside");
        assert!(matches!(repo.find(ALICE, &sneaky), Err(PersistenceError::NotFound(_))));
    }
}
