//! KPI card configuration.

use serde::{Deserialize, Serialize};

/// Aggregation applied to a KPI's bound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    Avg,
    Max,
    Min,
    Count,
}

/// Configuration for a KPI card.
///
/// A KPI either shows a manual `value` or, with a dataset bound, an
/// aggregate over `field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KpiConfig {
    pub label: String,
    pub value: String,
    pub icon: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "function", skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            label: "KPI".to_string(),
            value: "0".to_string(),
            icon: "📈".to_string(),
            color: "#3b82f6".to_string(),
            field: None,
            aggregation: None,
        }
    }
}

impl KpiConfig {
    /// Whether the card computes its value from a dataset field.
    pub fn is_computed(&self) -> bool {
        self.field.is_some()
    }
}
