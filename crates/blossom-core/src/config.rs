//! Editor configuration.

use crate::geometry::ZOOM_LEVELS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default auto-commit interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Maximum number of undo snapshots to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Offset applied to duplicated elements so the copy is visibly distinct.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Smallest width/height a resize gesture may produce.
pub const MIN_ELEMENT_SIZE: u32 = 20;

/// Largest image payload accepted for image elements (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Tunable constants for the canvas editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Auto-commit period in seconds.
    pub autosave_interval_secs: u64,
    /// Maximum number of history snapshots.
    pub history_capacity: usize,
    /// Offset applied to element copies.
    pub duplicate_offset: f64,
    /// Resize floor in pixels.
    pub min_element_size: u32,
    /// Initial zoom percent.
    pub default_zoom: u32,
    /// Upload limit for image elements.
    pub max_image_bytes: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            history_capacity: MAX_UNDO_HISTORY,
            duplicate_offset: DUPLICATE_OFFSET,
            min_element_size: MIN_ELEMENT_SIZE,
            default_zoom: 100,
            max_image_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autosave_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "autosaveIntervalSecs",
                reason: "must be positive".to_string(),
            });
        }
        if self.history_capacity < 2 {
            return Err(ConfigError::InvalidValue {
                field: "historyCapacity",
                reason: format!("must be at least 2, got {}", self.history_capacity),
            });
        }
        if !ZOOM_LEVELS.contains(&self.default_zoom) {
            return Err(ConfigError::InvalidValue {
                field: "defaultZoom",
                reason: format!("{} is not one of {:?}", self.default_zoom, ZOOM_LEVELS),
            });
        }
        if self.min_element_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "minElementSize",
                reason: "must be positive".to_string(),
            });
        }
        if !self.duplicate_offset.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "duplicateOffset",
                reason: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}
