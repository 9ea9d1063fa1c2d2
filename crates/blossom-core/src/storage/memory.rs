//! In-memory project adapter.

use super::{ProjectAdapter, StorageError, StorageResult};
use crate::dashboard::Dashboard;
use std::sync::RwLock;

/// In-memory adapter for testing and ephemeral use.
///
/// Keeps the latest committed dashboard and counts commits.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    stored: RwLock<Option<Dashboard>>,
    commits: RwLock<usize>,
}

impl MemoryAdapter {
    /// Create an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an adapter that already holds a dashboard.
    pub fn with_dashboard(dashboard: Dashboard) -> Self {
        Self {
            stored: RwLock::new(Some(dashboard)),
            commits: RwLock::new(0),
        }
    }

    /// The most recently stored dashboard.
    pub fn stored(&self) -> Option<Dashboard> {
        self.stored.read().ok().and_then(|d| d.clone())
    }

    /// Number of successful commits.
    pub fn commit_count(&self) -> usize {
        self.commits.read().map(|c| *c).unwrap_or(0)
    }
}

impl ProjectAdapter for MemoryAdapter {
    fn initial_state(&self) -> StorageResult<Option<Dashboard>> {
        let stored = self
            .stored
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(stored.clone())
    }

    fn commit(&self, dashboard: &Dashboard) -> StorageResult<()> {
        let mut stored = self
            .stored
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        *stored = Some(dashboard.clone());
        let mut commits = self
            .commits
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        *commits += 1;
        Ok(())
    }
}
