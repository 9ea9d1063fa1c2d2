//! Element definitions for dashboard pages.
//!
//! An [`Element`] is a positioned, typed visual unit. Its kind is fixed by
//! the variant of its [`ElementConfig`]; changing kind means deleting and
//! recreating the element.

mod chart;
mod image;
mod kpi;
mod map;
mod shape;
mod table;
mod text;

pub use chart::ChartConfig;
pub use image::{ImageConfig, ImageError, ImageFormat, ObjectFit};
pub use kpi::{Aggregation, KpiConfig};
pub use map::{MapConfig, MapMode};
pub use shape::{ShapeConfig, ShapeKind};
pub use table::{DEFAULT_ROWS_PER_PAGE, TableConfig};
pub use text::{TextAlign, TextConfig, TextPreset};

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Position used when a creation request does not specify one.
pub const DEFAULT_POSITION: Point = Point::new(50.0, 50.0);

/// Unique identifier for elements (unique within a page).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A type tag outside the closed set of element kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown element type: {0}")]
pub struct UnknownElementType(pub String);

/// The closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Chart,
    Table,
    Map,
    Text,
    Kpi,
    Shape,
    Image,
}

impl ElementKind {
    pub const ALL: [ElementKind; 7] = [
        ElementKind::Chart,
        ElementKind::Table,
        ElementKind::Map,
        ElementKind::Text,
        ElementKind::Kpi,
        ElementKind::Shape,
        ElementKind::Image,
    ];

    /// The wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Chart => "chart",
            ElementKind::Table => "table",
            ElementKind::Map => "map",
            ElementKind::Text => "text",
            ElementKind::Kpi => "kpi",
            ElementKind::Shape => "shape",
            ElementKind::Image => "image",
        }
    }

    /// Default (width, height) before any preset refinement.
    pub fn default_size(&self) -> (u32, u32) {
        match self {
            ElementKind::Chart | ElementKind::Table | ElementKind::Image => (400, 300),
            ElementKind::Map => (500, 400),
            ElementKind::Text => (400, TextPreset::Paragraph.height()),
            ElementKind::Kpi => (250, 200),
            ElementKind::Shape => ShapeKind::Rectangle.default_size(),
        }
    }

    /// Whether elements of this kind visualize dataset rows.
    pub fn uses_dataset(&self) -> bool {
        matches!(
            self,
            ElementKind::Chart | ElementKind::Table | ElementKind::Map | ElementKind::Kpi
        )
    }
}

impl FromStr for ElementKind {
    type Err = UnknownElementType;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| UnknownElementType(tag.to_string()))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific configuration; the variant is the element's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementConfig {
    Chart(ChartConfig),
    Table(TableConfig),
    Map(MapConfig),
    Text(TextConfig),
    Kpi(KpiConfig),
    Shape(ShapeConfig),
    Image(ImageConfig),
}

impl ElementConfig {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementConfig::Chart(_) => ElementKind::Chart,
            ElementConfig::Table(_) => ElementKind::Table,
            ElementConfig::Map(_) => ElementKind::Map,
            ElementConfig::Text(_) => ElementKind::Text,
            ElementConfig::Kpi(_) => ElementKind::Kpi,
            ElementConfig::Shape(_) => ElementKind::Shape,
            ElementConfig::Image(_) => ElementKind::Image,
        }
    }

    /// Default configuration for a kind.
    pub fn default_for(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Chart => ElementConfig::Chart(ChartConfig::default()),
            ElementKind::Table => ElementConfig::Table(TableConfig::default()),
            ElementKind::Map => ElementConfig::Map(MapConfig::default()),
            ElementKind::Text => ElementConfig::Text(TextConfig::default()),
            ElementKind::Kpi => ElementConfig::Kpi(KpiConfig::default()),
            ElementKind::Shape => ElementConfig::Shape(ShapeConfig::default()),
            ElementKind::Image => ElementConfig::Image(ImageConfig::default()),
        }
    }

    /// Decode the config object for a kind. Missing keys take defaults and
    /// unknown keys are ignored.
    pub fn from_value(kind: ElementKind, value: Value) -> Result<Self, serde_json::Error> {
        let value = if value.is_null() {
            Value::Object(Map::new())
        } else {
            value
        };
        Ok(match kind {
            ElementKind::Chart => ElementConfig::Chart(serde_json::from_value(value)?),
            ElementKind::Table => ElementConfig::Table(serde_json::from_value(value)?),
            ElementKind::Map => ElementConfig::Map(serde_json::from_value(value)?),
            ElementKind::Text => ElementConfig::Text(serde_json::from_value(value)?),
            ElementKind::Kpi => ElementConfig::Kpi(serde_json::from_value(value)?),
            ElementKind::Shape => ElementConfig::Shape(serde_json::from_value(value)?),
            ElementKind::Image => ElementConfig::Image(serde_json::from_value(value)?),
        })
    }

    /// Encode as a JSON object.
    pub fn to_value(&self) -> Value {
        let encoded = match self {
            ElementConfig::Chart(c) => serde_json::to_value(c),
            ElementConfig::Table(c) => serde_json::to_value(c),
            ElementConfig::Map(c) => serde_json::to_value(c),
            ElementConfig::Text(c) => serde_json::to_value(c),
            ElementConfig::Kpi(c) => serde_json::to_value(c),
            ElementConfig::Shape(c) => serde_json::to_value(c),
            ElementConfig::Image(c) => serde_json::to_value(c),
        };
        // Config structs contain only strings, numbers, bools and lists.
        encoded.unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Shallow-merge a field map into this config, keeping the variant.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self, ElementError> {
        let mut value = self.to_value();
        if let Value::Object(fields) = &mut value {
            for (key, field) in patch {
                // Palette payloads and older panels send the chart kind as `type`.
                let key = match (self, key.as_str()) {
                    (ElementConfig::Chart(_), "type") => "chartType",
                    _ => key.as_str(),
                };
                fields.insert(key.to_string(), field.clone());
            }
        }
        Self::from_value(self.kind(), value).map_err(|e| ElementError::InvalidConfig {
            kind: self.kind(),
            reason: e.to_string(),
        })
    }
}

/// Errors raised while decoding or patching elements.
#[derive(Debug, Error)]
pub enum ElementError {
    #[error(transparent)]
    UnknownType(#[from] UnknownElementType),
    #[error("Invalid {kind} config: {reason}")]
    InvalidConfig { kind: ElementKind, reason: String },
    #[error("Invalid geometry for element {id}: {reason}")]
    InvalidGeometry { id: ElementId, reason: String },
    #[error("Config kind {found} does not match element kind {expected}")]
    KindMismatch {
        expected: ElementKind,
        found: ElementKind,
    },
}

/// Partial geometry update; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl GeometryPatch {
    /// A patch that moves without resizing.
    pub fn position(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Default::default()
        }
    }

    /// A patch that sets the full box.
    pub fn rect(x: f64, y: f64, width: u32, height: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// A positioned, typed element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawElement", into = "RawElement")]
pub struct Element {
    pub id: ElementId,
    /// Top-left, canvas-space.
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
    /// Back-reference to an external dataset.
    pub dataset_id: Option<String>,
    pub config: ElementConfig,
}

impl Element {
    /// Create an element with a fresh id.
    pub fn new(config: ElementConfig, position: Point, width: u32, height: u32) -> Self {
        Self {
            id: ElementId::new(),
            x: position.x,
            y: position.y,
            width: width.max(1),
            height: height.max(1),
            dataset_id: None,
            config,
        }
    }

    pub fn with_dataset(mut self, dataset_id: impl Into<String>) -> Self {
        self.dataset_id = Some(dataset_id.into());
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.config.kind()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Bounding box in canvas-space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    /// Merge a geometry patch. Non-finite coordinates and zero sizes are ignored.
    pub fn apply_geometry(&mut self, patch: GeometryPatch) {
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            self.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            self.y = y;
        }
        if let Some(width) = patch.width.filter(|&w| w > 0) {
            self.width = width;
        }
        if let Some(height) = patch.height.filter(|&h| h > 0) {
            self.height = height;
        }
    }

    /// Replace the config with another of the same kind.
    pub fn replace_config(&mut self, config: ElementConfig) -> Result<(), ElementError> {
        if config.kind() != self.kind() {
            return Err(ElementError::KindMismatch {
                expected: self.kind(),
                found: config.kind(),
            });
        }
        self.config = config;
        Ok(())
    }

    /// Deep copy with a fresh id, shifted by `offset` on both axes.
    pub fn duplicate(&self, offset: f64) -> Self {
        let mut copy = self.clone();
        copy.regenerate_id();
        copy.x += offset;
        copy.y += offset;
        copy
    }

    /// Regenerate the element's ID. Used when copying across pages.
    pub fn regenerate_id(&mut self) {
        self.id = ElementId::new();
    }
}

/// Wire representation: `{id, type, x, y, width, height, datasetId?, config}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawElement {
    #[serde(default)]
    pub id: Option<ElementId>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub config: Value,
}

fn to_pixels(id: &ElementId, name: &str, value: f64) -> Result<u32, ElementError> {
    if !value.is_finite() || value < 1.0 || value > f64::from(u32::MAX) {
        return Err(ElementError::InvalidGeometry {
            id: id.clone(),
            reason: format!("{name} must be a positive number, got {value}"),
        });
    }
    // Sizes are whole pixels; `value` is range-checked above.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value.round() as u32)
}

impl TryFrom<RawElement> for Element {
    type Error = ElementError;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        let kind: ElementKind = raw.kind.parse()?;
        let id = raw.id.unwrap_or_default();
        let (default_width, default_height) = kind.default_size();

        let x = raw.x.unwrap_or(DEFAULT_POSITION.x);
        let y = raw.y.unwrap_or(DEFAULT_POSITION.y);
        if !x.is_finite() || !y.is_finite() {
            return Err(ElementError::InvalidGeometry {
                id,
                reason: "position must be finite".to_string(),
            });
        }
        let width = to_pixels(&id, "width", raw.width.unwrap_or(f64::from(default_width)))?;
        let height = to_pixels(&id, "height", raw.height.unwrap_or(f64::from(default_height)))?;

        let config = ElementConfig::from_value(kind, raw.config).map_err(|e| {
            ElementError::InvalidConfig {
                kind,
                reason: e.to_string(),
            }
        })?;

        Ok(Element {
            id,
            x,
            y,
            width,
            height,
            dataset_id: raw.dataset_id.filter(|d| !d.is_empty()),
            config,
        })
    }
}

impl From<Element> for RawElement {
    fn from(element: Element) -> Self {
        RawElement {
            kind: element.kind().as_str().to_string(),
            config: element.config.to_value(),
            id: Some(element.id),
            x: Some(element.x),
            y: Some(element.y),
            width: Some(f64::from(element.width)),
            height: Some(f64::from(element.height)),
            dataset_id: element.dataset_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kpi() -> Element {
        Element::new(
            ElementConfig::Kpi(KpiConfig::default()),
            Point::new(10.0, 20.0),
            250,
            200,
        )
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("chart".parse::<ElementKind>().unwrap(), ElementKind::Chart);
        assert_eq!(
            "gauge".parse::<ElementKind>(),
            Err(UnknownElementType("gauge".to_string()))
        );
    }

    #[test]
    fn test_wire_format() {
        let element = kpi().with_dataset("ds1");
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["type"], "kpi");
        assert_eq!(value["width"], 250.0);
        assert_eq!(value["datasetId"], "ds1");
        assert_eq!(value["config"]["label"], "KPI");

        let back: Element = serde_json::from_value(value).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_decode_legacy_element() {
        let value = json!({
            "id": "element_1700000000000",
            "type": "chart",
            "x": 120.5,
            "y": 40,
            "width": 400,
            "height": 300,
            "datasetId": "dataset_1",
            "config": {"chartId": "chart_1", "type": "pie", "title": "Share", "extra": true}
        });
        let element: Element = serde_json::from_value(value).unwrap();
        assert_eq!(element.id.as_str(), "element_1700000000000");
        assert_eq!(element.kind(), ElementKind::Chart);
        match &element.config {
            ElementConfig::Chart(c) => {
                assert_eq!(c.chart_type, "pie");
                assert_eq!(c.chart_id.as_deref(), Some("chart_1"));
            }
            other => panic!("Expected chart config, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_defaults_missing_geometry() {
        let element: Element = serde_json::from_value(json!({"type": "map"})).unwrap();
        assert_eq!((element.width, element.height), (500, 400));
        assert_eq!(element.position(), DEFAULT_POSITION);
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let raw: RawElement = serde_json::from_value(json!({"type": "video"})).unwrap();
        let result = Element::try_from(raw);
        assert!(matches!(result, Err(ElementError::UnknownType(_))));
    }

    #[test]
    fn test_decode_rejects_bad_size() {
        let raw: RawElement =
            serde_json::from_value(json!({"type": "text", "width": 0, "height": 10})).unwrap();
        assert!(matches!(
            Element::try_from(raw),
            Err(ElementError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_merge_config_keeps_other_fields() {
        let element = kpi();
        let mut patch = Map::new();
        patch.insert("value".to_string(), json!("42"));
        let merged = element.config.merged(&patch).unwrap();
        match merged {
            ElementConfig::Kpi(c) => {
                assert_eq!(c.value, "42");
                assert_eq!(c.label, "KPI");
            }
            other => panic!("Expected kpi config, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_chart_type_key() {
        let config = ElementConfig::Chart(ChartConfig::default());
        let patch = json!({"type": "pie", "title": "Share"});
        let merged = config.merged(patch.as_object().unwrap()).unwrap();
        match merged {
            ElementConfig::Chart(c) => {
                assert_eq!(c.chart_type, "pie");
                assert_eq!(c.title, "Share");
            }
            other => panic!("Expected chart config, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_config_rejects_wrong_type() {
        let element = kpi();
        let mut patch = Map::new();
        patch.insert("label".to_string(), json!(12));
        assert!(element.config.merged(&patch).is_err());
    }

    #[test]
    fn test_apply_geometry_ignores_invalid() {
        let mut element = kpi();
        element.apply_geometry(GeometryPatch {
            x: Some(f64::NAN),
            y: Some(5.0),
            width: Some(0),
            height: Some(90),
        });
        assert_eq!(element.x, 10.0);
        assert_eq!(element.y, 5.0);
        assert_eq!(element.width, 250);
        assert_eq!(element.height, 90);
    }

    #[test]
    fn test_duplicate() {
        let element = kpi();
        let copy = element.duplicate(20.0);
        assert_ne!(copy.id, element.id);
        assert_eq!(copy.position(), Point::new(30.0, 40.0));
        assert_eq!(copy.config, element.config);
    }

    #[test]
    fn test_replace_config_kind_mismatch() {
        let mut element = kpi();
        let result = element.replace_config(ElementConfig::Map(MapConfig::default()));
        assert!(matches!(result, Err(ElementError::KindMismatch { .. })));
    }
}
