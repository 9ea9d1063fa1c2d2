//! Pages and the dashboard aggregate.

use crate::elements::Element;
use crate::geometry::CanvasFormat;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of the page produced by legacy migration.
pub const LEGACY_PAGE_ID: &str = "page_1";

/// Default name for the page at a 0-based position.
pub fn default_page_name(index: usize) -> String {
    format!("Page {}", index + 1)
}

/// A named canvas. Element order is z-order, last on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub id: PageId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Page {
    /// Create an empty page.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PageId::new(),
            name: name.into(),
            elements: Vec::new(),
        }
    }

    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    /// Deep copy with a fresh page id and fresh element ids.
    pub fn duplicate(&self) -> Self {
        Self {
            id: PageId::new(),
            name: format!("{} (copy)", self.name),
            elements: self
                .elements
                .iter()
                .map(|element| {
                    let mut copy = element.clone();
                    copy.regenerate_id();
                    copy
                })
                .collect(),
        }
    }
}

/// Page background and padding. Read-only to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub background: String,
    pub padding: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            padding: 20,
        }
    }
}

/// A multi-page dashboard.
///
/// Older dashboards stored a flat `elements` list instead of `pages`; call
/// [`Dashboard::migrate_legacy`] before editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub canvas_format: CanvasFormat,
    #[serde(default)]
    pub settings: CanvasSettings,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub current_page_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Element>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new("Untitled dashboard", CanvasFormat::default())
    }
}

impl Dashboard {
    /// Create a dashboard with one empty page.
    pub fn new(name: impl Into<String>, canvas_format: CanvasFormat) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            canvas_format,
            settings: CanvasSettings::default(),
            pages: vec![Page::new(default_page_name(0))],
            current_page_index: 0,
            elements: None,
        }
    }

    /// Build a legacy dashboard holding a flat element list.
    pub fn legacy(elements: Vec<Element>) -> Self {
        Self {
            pages: Vec::new(),
            elements: Some(elements),
            ..Self::default()
        }
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> Size {
        self.canvas_format.dimensions()
    }

    pub fn is_legacy(&self) -> bool {
        self.pages.is_empty() && self.elements.is_some()
    }

    /// Move a legacy element list into a single page.
    ///
    /// Returns true if anything changed. Running it again is a no-op.
    pub fn migrate_legacy(&mut self) -> bool {
        if !self.is_legacy() {
            return false;
        }
        let elements = self.elements.take().unwrap_or_default();
        log::info!("Migrating legacy dashboard ({} elements) to pages", elements.len());
        // Fixed id so migrating two copies of one dashboard gives equal results.
        self.pages = vec![Page {
            id: PageId::from(LEGACY_PAGE_ID),
            name: default_page_name(0),
            elements,
        }];
        self.current_page_index = 0;
        true
    }

    /// Make the dashboard editable: migrate, add a page if there are none,
    /// and clamp the current index.
    pub fn normalize(&mut self) {
        self.migrate_legacy();
        if self.pages.is_empty() {
            self.pages.push(Page::new(default_page_name(0)));
        }
        self.current_page_index = self.current_page_index.min(self.pages.len() - 1);
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current_page_index)
    }
}
