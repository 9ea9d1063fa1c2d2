//! Element creation defaults and renderer contracts.
//!
//! The registry is a pure lookup table. It turns a creation request (palette
//! click or drag payload) into a complete [`Element`], and turns an existing
//! element into the request an external renderer needs.

use crate::dataset::{Dataset, DatasetCatalog};
use crate::elements::{
    ChartConfig, DEFAULT_POSITION, Element, ElementConfig, ElementKind, ImageConfig, ImageError,
    MapConfig, ShapeConfig, ShapeKind, TableConfig, TextConfig, TextPreset,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown element type: {0}")]
    UnknownElementType(String),
    #[error("Invalid element payload: {0}")]
    InvalidPayload(String),
    #[error("Image is {size} bytes, limit is {limit}")]
    ImageTooLarge { size: usize, limit: usize },
    #[error("Unsupported image format")]
    UnsupportedImage,
}

impl From<ImageError> for RegistryError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::TooLarge { size, limit } => RegistryError::ImageTooLarge { size, limit },
            ImageError::UnsupportedFormat => RegistryError::UnsupportedImage,
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// A request to create an element.
///
/// This is also the JSON drag payload set by palette items, so the type tag
/// stays a string until the registry resolves it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub dataset_id: Option<String>,
    /// Saved chart to copy settings from.
    pub chart_id: Option<String>,
    /// Text preset (heading, paragraph, list).
    pub preset: Option<TextPreset>,
    /// Shape variant.
    pub shape: Option<ShapeKind>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Extra config fields merged over the defaults.
    pub config: Option<Map<String, Value>>,
}

impl ElementSpec {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            ..Default::default()
        }
    }

    /// Parse a drag payload.
    pub fn from_json(payload: &str) -> RegistryResult<Self> {
        serde_json::from_str(payload).map_err(|e| RegistryError::InvalidPayload(e.to_string()))
    }

    pub fn with_dataset(mut self, dataset_id: impl Into<String>) -> Self {
        self.dataset_id = Some(dataset_id.into());
        self
    }

    pub fn with_chart(mut self, chart_id: impl Into<String>) -> Self {
        self.chart_id = Some(chart_id.into());
        self
    }

    pub fn with_preset(mut self, preset: TextPreset) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.x = Some(position.x);
        self.y = Some(position.y);
        self
    }

    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Resolve the type tag.
    pub fn element_kind(&self) -> RegistryResult<ElementKind> {
        self.kind
            .parse()
            .map_err(|_| RegistryError::UnknownElementType(self.kind.clone()))
    }
}

/// Everything a renderer needs for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest<'a> {
    pub kind: ElementKind,
    pub config: ElementConfig,
    pub width: u32,
    pub height: u32,
    /// Resolved dataset; `None` when the element has no reference or the
    /// reference is dangling. The renderer draws its own fallback.
    pub dataset: Option<&'a Dataset>,
}

/// Stateless element factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementRegistry;

impl ElementRegistry {
    /// Default size for a request, before explicit overrides.
    pub fn default_size(kind: ElementKind, spec: &ElementSpec) -> (u32, u32) {
        match kind {
            ElementKind::Text => (400, spec.preset.unwrap_or_default().height()),
            ElementKind::Shape => spec.shape.unwrap_or_default().default_size(),
            other => other.default_size(),
        }
    }

    fn default_config(
        kind: ElementKind,
        spec: &ElementSpec,
        dataset: Option<&Dataset>,
    ) -> ElementConfig {
        match kind {
            ElementKind::Chart => {
                // The palette puts the saved chart id inside `config`.
                let chart_id = spec.chart_id.clone().or_else(|| {
                    spec.config
                        .as_ref()
                        .and_then(|c| c.get("chartId"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                });
                let saved = chart_id
                    .as_deref()
                    .and_then(|id| dataset.and_then(|d| d.chart(id)));
                let mut config = saved
                    .map(|chart| chart.config.clone())
                    .unwrap_or_else(ChartConfig::default);
                config.chart_id = chart_id;
                ElementConfig::Chart(config)
            }
            ElementKind::Table => ElementConfig::Table(TableConfig {
                columns: dataset.map(Dataset::columns).unwrap_or_default(),
                ..Default::default()
            }),
            ElementKind::Map => {
                if dataset.is_some_and(|d| !d.has_map) {
                    log::debug!("Map element created for a dataset without coordinates");
                }
                ElementConfig::Map(MapConfig::default())
            }
            ElementKind::Text => {
                ElementConfig::Text(TextConfig::preset(spec.preset.unwrap_or_default()))
            }
            ElementKind::Shape => {
                ElementConfig::Shape(ShapeConfig::new(spec.shape.unwrap_or_default()))
            }
            ElementKind::Kpi | ElementKind::Image => ElementConfig::default_for(kind),
        }
    }

    /// Build a complete element with a fresh id.
    pub fn create<C: DatasetCatalog + ?Sized>(
        spec: &ElementSpec,
        catalog: &C,
    ) -> RegistryResult<Element> {
        let kind = spec.element_kind()?;
        let dataset = spec
            .dataset_id
            .as_deref()
            .filter(|_| kind.uses_dataset())
            .and_then(|id| catalog.dataset(id));

        let mut config = Self::default_config(kind, spec, dataset);
        if let Some(patch) = &spec.config {
            config = config
                .merged(patch)
                .map_err(|e| RegistryError::InvalidPayload(e.to_string()))?;
        }

        let (default_width, default_height) = Self::default_size(kind, spec);
        let width = spec.width.filter(|&w| w > 0).unwrap_or(default_width);
        let height = spec.height.filter(|&h| h > 0).unwrap_or(default_height);
        let position = Point::new(
            spec.x.filter(|v| v.is_finite()).unwrap_or(DEFAULT_POSITION.x),
            spec.y.filter(|v| v.is_finite()).unwrap_or(DEFAULT_POSITION.y),
        );

        let mut element = Element::new(config, position, width, height);
        if kind.uses_dataset() {
            element.dataset_id = spec.dataset_id.clone();
        }
        Ok(element)
    }

    /// Build an image element from an uploaded file.
    pub fn create_image(
        data: &[u8],
        file_name: &str,
        position: Point,
        max_bytes: usize,
    ) -> RegistryResult<Element> {
        let config = ImageConfig::from_bytes(data, file_name, max_bytes)?;
        let (width, height) = ElementKind::Image.default_size();
        Ok(Element::new(ElementConfig::Image(config), position, width, height))
    }

    /// Resolve what the renderer for `element` needs.
    pub fn render_request<'a, C: DatasetCatalog + ?Sized>(
        element: &Element,
        catalog: &'a C,
    ) -> RenderRequest<'a> {
        let dataset = element
            .dataset_id
            .as_deref()
            .and_then(|id| catalog.dataset(id));

        let config = match &element.config {
            ElementConfig::Chart(chart) => {
                let saved = chart
                    .chart_id
                    .as_deref()
                    .and_then(|id| dataset.and_then(|d| d.chart(id)));
                match saved {
                    Some(saved) => ElementConfig::Chart(chart.resolve_against(&saved.config)),
                    None => element.config.clone(),
                }
            }
            other => other.clone(),
        };

        RenderRequest {
            kind: element.kind(),
            config,
            width: element.width,
            height: element.height,
            dataset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SavedChart;
    use serde_json::json;

    fn sales() -> Vec<Dataset> {
        serde_json::from_value(json!([{
            "id": "sales",
            "data": [{"region": "north", "amount": 10, "city": "Oslo"}],
            "hasMap": false,
            "charts": [{
                "id": "c1",
                "title": "Revenue",
                "type": "line",
                "xField": "region",
                "yField": "amount"
            }]
        }]))
        .unwrap()
    }

    #[test]
    fn test_default_sizes() {
        let none: Vec<Dataset> = Vec::new();
        let cases = [
            (ElementSpec::new(ElementKind::Chart), (400, 300)),
            (ElementSpec::new(ElementKind::Table), (400, 300)),
            (ElementSpec::new(ElementKind::Map), (500, 400)),
            (ElementSpec::new(ElementKind::Kpi), (250, 200)),
            (ElementSpec::new(ElementKind::Image), (400, 300)),
            (ElementSpec::new(ElementKind::Text).with_preset(TextPreset::Heading), (400, 80)),
            (ElementSpec::new(ElementKind::Text).with_preset(TextPreset::List), (400, 150)),
            (ElementSpec::new(ElementKind::Shape).with_shape(ShapeKind::Line), (300, 5)),
            (ElementSpec::new(ElementKind::Shape).with_shape(ShapeKind::Circle), (200, 200)),
        ];
        for (spec, expected) in cases {
            let element = ElementRegistry::create(&spec, &none).unwrap();
            assert_eq!((element.width, element.height), expected, "{}", spec.kind);
            assert_eq!(element.position(), DEFAULT_POSITION);
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let spec = ElementSpec {
            kind: "video".to_string(),
            ..Default::default()
        };
        let result = ElementRegistry::create(&spec, &Vec::<Dataset>::new());
        assert!(matches!(result, Err(RegistryError::UnknownElementType(t)) if t == "video"));
    }

    #[test]
    fn test_table_columns_from_dataset() {
        let spec = ElementSpec::new(ElementKind::Table).with_dataset("sales");
        let element = ElementRegistry::create(&spec, &sales()).unwrap();
        assert_eq!(element.dataset_id.as_deref(), Some("sales"));
        match element.config {
            ElementConfig::Table(t) => {
                assert_eq!(t.columns, vec!["region", "amount", "city"]);
                assert_eq!(t.rows_per_page, 10);
            }
            other => panic!("Expected table config, got {other:?}"),
        }
    }

    #[test]
    fn test_chart_copies_saved_chart() {
        let spec = ElementSpec::new(ElementKind::Chart)
            .with_dataset("sales")
            .with_chart("c1");
        let element = ElementRegistry::create(&spec, &sales()).unwrap();
        match element.config {
            ElementConfig::Chart(c) => {
                assert_eq!(c.chart_id.as_deref(), Some("c1"));
                assert_eq!(c.chart_type, "line");
                assert_eq!(c.title, "Revenue");
            }
            other => panic!("Expected chart config, got {other:?}"),
        }
    }

    #[test]
    fn test_text_drops_dataset_reference() {
        let spec = ElementSpec::new(ElementKind::Text).with_dataset("sales");
        let element = ElementRegistry::create(&spec, &sales()).unwrap();
        assert!(element.dataset_id.is_none());
    }

    #[test]
    fn test_drag_payload_with_config_overrides() {
        let spec = ElementSpec::from_json(
            r#"{"type": "kpi", "config": {"label": "Orders", "value": "128"}, "width": 300}"#,
        )
        .unwrap();
        let element = ElementRegistry::create(&spec, &Vec::<Dataset>::new()).unwrap();
        assert_eq!(element.width, 300);
        assert_eq!(element.height, 200);
        match element.config {
            ElementConfig::Kpi(k) => {
                assert_eq!(k.label, "Orders");
                assert_eq!(k.value, "128");
            }
            other => panic!("Expected kpi config, got {other:?}"),
        }
    }

    #[test]
    fn test_palette_chart_payload() {
        let spec = ElementSpec::from_json(
            r#"{"type": "chart", "datasetId": "sales", "config": {
                "chartId": "c1", "title": "Q3", "type": "pie", "xField": "city", "yField": "amount"
            }}"#,
        )
        .unwrap();
        let element = ElementRegistry::create(&spec, &sales()).unwrap();
        assert_eq!(element.dataset_id.as_deref(), Some("sales"));
        match element.config {
            ElementConfig::Chart(c) => {
                assert_eq!(c.chart_id.as_deref(), Some("c1"));
                assert_eq!(c.title, "Q3");
                assert_eq!(c.chart_type, "pie");
                assert_eq!(c.x_field, "city");
            }
            other => panic!("Expected chart config, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_payload() {
        assert!(matches!(
            ElementSpec::from_json("not json"),
            Err(RegistryError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_render_request_resolves_saved_chart() {
        let datasets = sales();
        let mut element = ElementRegistry::create(
            &ElementSpec::new(ElementKind::Chart)
                .with_dataset("sales")
                .with_chart("c1"),
            &datasets,
        )
        .unwrap();
        if let ElementConfig::Chart(c) = &mut element.config {
            c.title = "Custom".to_string();
            c.chart_type = "bar".to_string();
        }

        let request = ElementRegistry::render_request(&element, &datasets);
        assert_eq!(request.kind, ElementKind::Chart);
        assert_eq!(request.dataset.map(|d| d.id.as_str()), Some("sales"));
        match request.config {
            ElementConfig::Chart(c) => {
                assert_eq!(c.title, "Custom");
                assert_eq!(c.chart_type, "line");
                assert_eq!(c.x_field, "region");
                assert_eq!(c.y_field, "amount");
            }
            other => panic!("Expected chart config, got {other:?}"),
        }
    }

    #[test]
    fn test_render_request_dangling_dataset() {
        let mut datasets = sales();
        datasets[0].charts.push(SavedChart {
            id: "c2".to_string(),
            config: ChartConfig::default(),
        });
        let element = ElementRegistry::create(
            &ElementSpec::new(ElementKind::Map).with_dataset("deleted"),
            &datasets,
        )
        .unwrap();
        let request = ElementRegistry::render_request(&element, &datasets);
        assert!(request.dataset.is_none());
        assert_eq!((request.width, request.height), (500, 400));
    }

    #[test]
    fn test_create_image() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0, 0, 0, 0];
        let element =
            ElementRegistry::create_image(&png, "logo.png", Point::new(10.0, 10.0), 1024).unwrap();
        assert_eq!(element.kind(), ElementKind::Image);

        let result = ElementRegistry::create_image(&png, "logo.png", Point::ZERO, 2);
        assert!(matches!(result, Err(RegistryError::ImageTooLarge { size: 8, limit: 2 })));
    }
}
