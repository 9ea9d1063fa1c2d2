//! Persistence boundary for dashboards.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use autosave::AutoCommit;
pub use memory::MemoryAdapter;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileAdapter;

use crate::dashboard::Dashboard;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Where dashboards are loaded from and committed to.
///
/// The editor treats commits as fire-and-forget: a failed commit is logged
/// and never reaches the editing surface.
pub trait ProjectAdapter {
    /// The stored dashboard, possibly in legacy form. `None` when nothing has
    /// been stored yet.
    fn initial_state(&self) -> StorageResult<Option<Dashboard>>;

    /// Persist the full dashboard state.
    fn commit(&self, dashboard: &Dashboard) -> StorageResult<()>;
}
