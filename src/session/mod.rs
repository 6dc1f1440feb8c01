//! Project sessions and their load/save collaborators.

pub mod auth;
pub mod persistence;
pub mod project;
pub mod snapshot;

pub use auth::{AuthProvider, StaticAuth, User};
pub use persistence::{
    InMemoryRepository, JsonDirRepository, PersistenceError, ProjectId, ProjectRepository,
};
pub use project::{PendingSave, ProjectSession, SessionError};
pub use snapshot::{ComponentRecord, ProjectSnapshot, SnapshotError};
