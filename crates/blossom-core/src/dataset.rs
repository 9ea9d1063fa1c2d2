//! Read-only view of datasets produced by the ingestion layer.
//!
//! The editor never mutates datasets. It reads column shape, saved charts and
//! the `hasMap` flag to fill creation defaults and to resolve render requests.

use crate::elements::ChartConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One row, keyed by column name.
pub type Row = Map<String, Value>;

/// Inferred semantics of a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldType {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
}

/// A chart the user saved against a dataset.
///
/// Stored flat: `{id, title, type, xField, yField}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedChart {
    pub id: String,
    #[serde(flatten)]
    pub config: ChartConfig,
}

/// A tabular dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub data: Vec<Row>,
    pub data_types: HashMap<String, FieldType>,
    pub has_map: bool,
    pub charts: Vec<SavedChart>,
}

impl Dataset {
    /// Column names of the first row, in row order.
    pub fn columns(&self) -> Vec<String> {
        self.data
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn chart(&self, chart_id: &str) -> Option<&SavedChart> {
        self.charts.iter().find(|c| c.id == chart_id)
    }
}

/// Lookup of datasets by id.
pub trait DatasetCatalog {
    fn dataset(&self, id: &str) -> Option<&Dataset>;
}

impl DatasetCatalog for [Dataset] {
    fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.iter().find(|d| d.id == id)
    }
}

impl DatasetCatalog for Vec<Dataset> {
    fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.as_slice().dataset(id)
    }
}

impl DatasetCatalog for HashMap<String, Dataset> {
    fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.get(id)
    }
}
