//! File-based project adapter for native platforms.

use super::{ProjectAdapter, StorageError, StorageResult};
use crate::dashboard::Dashboard;
use crate::project::{export_project, import_project};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores one dashboard as a project document on disk.
pub struct FileAdapter {
    /// Directory holding project files.
    base_path: PathBuf,
    /// Project this adapter reads and writes.
    project_id: String,
}

impl FileAdapter {
    /// Create an adapter for `project_id` under `base_path`.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf, project_id: &str) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self {
            base_path,
            project_id: project_id.to_string(),
        })
    }

    /// Create an adapter in the default location.
    ///
    /// On Unix: `~/.local/share/blossom/projects/`
    /// On Windows: `%LOCALAPPDATA%\blossom\projects\`
    pub fn default_location(project_id: &str) -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("blossom").join("projects"), project_id)
    }

    /// Path of the project file.
    pub fn project_path(&self) -> PathBuf {
        // Sanitize ID to be safe for filenames
        let safe_id: String = self
            .project_id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Remove the project file.
    pub fn delete(&self) -> StorageResult<()> {
        let path = self.project_path();
        if !path.exists() {
            return Err(StorageError::NotFound(self.project_id.clone()));
        }
        fs::remove_file(&path).map_err(|e| {
            StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
        })
    }
}

impl ProjectAdapter for FileAdapter {
    fn initial_state(&self) -> StorageResult<Option<Dashboard>> {
        let path = self.project_path();
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| {
            StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let dashboard = import_project(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        // Files from before pages existed are rewritten once in page form.
        if is_legacy_document(&json) {
            log::info!("Rewriting legacy project file {}", path.display());
            self.commit(&dashboard)?;
        }
        Ok(Some(dashboard))
    }

    fn commit(&self, dashboard: &Dashboard) -> StorageResult<()> {
        let path = self.project_path();
        let json =
            export_project(dashboard).map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::write(&path, json).map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

/// A top-level `elements` list with no `pages`.
fn is_legacy_document(json: &str) -> bool {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(root)) => root.get("pages").is_none() && root.contains_key("elements"),
        _ => false,
    }
}
