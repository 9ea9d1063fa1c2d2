//! Versioned project documents.
//!
//! A project document is the JSON file a dashboard is exported to and imported
//! from. Import validates the whole document before returning anything, so a
//! failed import never yields a partial dashboard.

use crate::dashboard::{CanvasSettings, Dashboard, Page, PageId, default_page_name};
use crate::elements::{Element, ElementError, ElementId, RawElement};
use crate::geometry::CanvasFormat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Version written into exported documents.
pub const PROJECT_VERSION: &str = "1.0.0";

/// Import errors. The in-memory state is untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("Invalid project JSON: {0}")]
    InvalidJson(String),
    #[error("Project file has no version")]
    MissingVersion,
    #[error("Project file has no pages or elements")]
    MissingPages,
    #[error("Project file has no pages")]
    EmptyPages,
    #[error("Page {page}: unknown element type \"{kind}\"")]
    UnknownElementType { page: usize, kind: String },
    #[error("Page {page}, element {index}: {reason}")]
    InvalidElement {
        page: usize,
        index: usize,
        reason: String,
    },
    #[error("Page {page}: duplicate element id {id}")]
    DuplicateElementId { page: usize, id: ElementId },
    #[error("Page {page}: {reason}")]
    InvalidGeometry { page: usize, reason: String },
}

/// Result type for import.
pub type ImportResult<T> = Result<T, ImportError>;

/// The exported form of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub version: String,
    /// Export time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub id: String,
    pub name: String,
    pub canvas_format: CanvasFormat,
    pub settings: CanvasSettings,
    pub current_page_index: usize,
    pub pages: Vec<Page>,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

impl ProjectDocument {
    /// Snapshot a dashboard for export. Legacy content is migrated first.
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        let mut dashboard = dashboard.clone();
        dashboard.normalize();
        Self {
            version: PROJECT_VERSION.to_string(),
            timestamp: now_millis(),
            id: dashboard.id,
            name: dashboard.name,
            canvas_format: dashboard.canvas_format,
            settings: dashboard.settings,
            current_page_index: dashboard.current_page_index,
            pages: dashboard.pages,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a document.
    pub fn from_json(json: &str) -> ImportResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
        let Value::Object(root) = value else {
            return Err(ImportError::InvalidJson("expected a JSON object".to_string()));
        };

        let version = match root.get("version") {
            Some(Value::String(v)) if !v.trim().is_empty() => v.clone(),
            _ => return Err(ImportError::MissingVersion),
        };
        if version != PROJECT_VERSION {
            log::debug!("Importing project version {version}");
        }

        let pages = match (root.get("pages"), root.get("elements")) {
            (Some(Value::Array(pages)), _) => {
                if pages.is_empty() {
                    return Err(ImportError::EmptyPages);
                }
                decode_pages(pages)?
            }
            (None, Some(Value::Array(elements))) => {
                let elements = decode_elements(0, elements)?;
                let mut legacy = Dashboard::legacy(elements);
                legacy.migrate_legacy();
                legacy.pages
            }
            _ => return Err(ImportError::MissingPages),
        };

        let current_page_index = root
            .get("currentPageIndex")
            .and_then(Value::as_u64)
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(0)
            .min(pages.len() - 1);

        Ok(Self {
            version,
            timestamp: root.get("timestamp").and_then(Value::as_u64).unwrap_or(0),
            id: string_field(&root, "id").unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: string_field(&root, "name").unwrap_or_else(|| "Imported dashboard".to_string()),
            canvas_format: string_field(&root, "canvasFormat")
                .map(CanvasFormat::from)
                .unwrap_or_default(),
            settings: root
                .get("settings")
                .cloned()
                .and_then(|s| serde_json::from_value(s).ok())
                .unwrap_or_default(),
            current_page_index,
            pages,
        })
    }

    pub fn into_dashboard(self) -> Dashboard {
        Dashboard {
            id: self.id,
            name: self.name,
            canvas_format: self.canvas_format,
            settings: self.settings,
            pages: self.pages,
            current_page_index: self.current_page_index,
            elements: None,
        }
    }
}

fn string_field(root: &Map<String, Value>, key: &str) -> Option<String> {
    root.get(key).and_then(Value::as_str).map(str::to_string)
}

fn decode_pages(pages: &[Value]) -> ImportResult<Vec<Page>> {
    let mut seen = HashSet::new();
    pages
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let Value::Object(page) = value else {
                return Err(ImportError::InvalidElement {
                    page: index,
                    index: 0,
                    reason: "page is not an object".to_string(),
                });
            };
            let elements = match page.get("elements") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(elements)) => decode_elements(index, elements)?,
                Some(_) => {
                    return Err(ImportError::InvalidElement {
                        page: index,
                        index: 0,
                        reason: "elements is not a list".to_string(),
                    });
                }
            };

            let mut id = string_field(page, "id")
                .map(|id| PageId::from(id.as_str()))
                .unwrap_or_default();
            if !seen.insert(id.clone()) {
                log::warn!("Duplicate page id {id} on import, assigning a new one");
                id = PageId::new();
                seen.insert(id.clone());
            }

            Ok(Page {
                id,
                name: string_field(page, "name").unwrap_or_else(|| default_page_name(index)),
                elements,
            })
        })
        .collect()
}

fn decode_elements(page: usize, values: &[Value]) -> ImportResult<Vec<Element>> {
    let mut ids = HashSet::new();
    let mut elements = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        let raw: RawElement =
            serde_json::from_value(value.clone()).map_err(|e| ImportError::InvalidElement {
                page,
                index,
                reason: e.to_string(),
            })?;
        let element = Element::try_from(raw).map_err(|e| match e {
            ElementError::UnknownType(unknown) => ImportError::UnknownElementType {
                page,
                kind: unknown.0,
            },
            invalid @ ElementError::InvalidGeometry { .. } => ImportError::InvalidGeometry {
                page,
                reason: invalid.to_string(),
            },
            other => ImportError::InvalidElement {
                page,
                index,
                reason: other.to_string(),
            },
        })?;
        if !ids.insert(element.id.clone()) {
            return Err(ImportError::DuplicateElementId {
                page,
                id: element.id,
            });
        }
        elements.push(element);
    }
    Ok(elements)
}

/// Export a dashboard as project JSON.
pub fn export_project(dashboard: &Dashboard) -> Result<String, serde_json::Error> {
    let document = ProjectDocument::from_dashboard(dashboard);
    log::info!(
        "Exporting project {} ({} pages)",
        document.id,
        document.pages.len()
    );
    document.to_json()
}

/// Import project JSON as a dashboard ready for editing.
pub fn import_project(json: &str) -> ImportResult<Dashboard> {
    let document = ProjectDocument::from_json(json).inspect_err(|e| {
        log::warn!("Project import rejected: {e}");
    })?;
    log::info!(
        "Imported project {} ({} pages)",
        document.id,
        document.pages.len()
    );
    Ok(document.into_dashboard())
}
