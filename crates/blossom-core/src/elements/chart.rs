//! Chart element configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a chart element.
///
/// When `chart_id` names a chart saved on the bound dataset, that chart's
/// settings are used for rendering and `title` (if non-empty) overrides its title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_id: Option<String>,
    pub title: String,
    /// Chart kind (bar, line, pie...). Older documents store this as `type`.
    #[serde(alias = "type")]
    pub chart_type: String,
    pub x_field: String,
    pub y_field: String,
    pub show_grid: bool,
    pub show_legend: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_id: None,
            title: String::new(),
            chart_type: "bar".to_string(),
            x_field: String::new(),
            y_field: String::new(),
            show_grid: true,
            show_legend: false,
        }
    }
}

impl ChartConfig {
    /// Overlay this element's settings on a saved chart.
    pub fn resolve_against(&self, saved: &ChartConfig) -> ChartConfig {
        let mut resolved = saved.clone();
        resolved.chart_id = self.chart_id.clone();
        if !self.title.is_empty() {
            resolved.title = self.title.clone();
        }
        resolved.show_grid = self.show_grid;
        resolved.show_legend = self.show_legend;
        resolved
    }
}
