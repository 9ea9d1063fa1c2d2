//! Map element configuration.

use serde::{Deserialize, Serialize};

/// How map points are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    #[default]
    Markers,
    Heatmap,
    Clusters,
}

/// Configuration for a map element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub mode: MapMode,
}
