//! Decorative shape configuration.

use serde::{Deserialize, Serialize};

/// Shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Line,
}

impl ShapeKind {
    /// Default (width, height) for a new shape of this kind.
    pub fn default_size(&self) -> (u32, u32) {
        match self {
            ShapeKind::Rectangle => (300, 200),
            ShapeKind::Circle => (200, 200),
            ShapeKind::Line => (300, 5),
        }
    }
}

/// Configuration for a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    pub shape: ShapeKind,
    pub fill: String,
    /// 0.0 = transparent, 1.0 = opaque.
    pub opacity: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Rectangle,
            fill: "#3b82f6".to_string(),
            opacity: 1.0,
        }
    }
}

impl ShapeConfig {
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }
}
