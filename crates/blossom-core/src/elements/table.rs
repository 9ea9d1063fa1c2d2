//! Table element configuration.

use serde::{Deserialize, Serialize};

/// Default rows shown per table page.
pub const DEFAULT_ROWS_PER_PAGE: u32 = 10;

/// Configuration for a table element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Visible columns, in display order.
    pub columns: Vec<String>,
    pub rows_per_page: u32,
    pub striped: bool,
    pub show_header: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            striped: true,
            show_header: true,
        }
    }
}
