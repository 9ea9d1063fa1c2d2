//! Blossom Core Library
//!
//! Data model and editing engine for Blossom dashboards: typed elements on
//! fixed-size pages, undo history, page management and project import/export.

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod editor;
pub mod elements;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod input;
pub mod pages;
pub mod project;
pub mod registry;
pub mod session;
pub mod storage;

pub use config::{ConfigError, EditorConfig};
pub use dashboard::{CanvasSettings, Dashboard, Page, PageId};
pub use dataset::{Dataset, DatasetCatalog};
pub use editor::{CanvasEditor, EditorEvent, ExportError, Mode, PropertyDraft};
pub use elements::{Element, ElementConfig, ElementError, ElementId, ElementKind, GeometryPatch};
pub use geometry::{CanvasFormat, ZOOM_LEVELS, Zoom, clamp_placement, pointer_to_canvas};
pub use gesture::{Corner, Edge, Gesture, HandleKind};
pub use history::HistoryStack;
pub use input::{Focus, KeyPress, Modifiers, Shortcut};
pub use pages::{PageError, PageStore};
pub use project::{ImportError, ProjectDocument, export_project, import_project};
pub use registry::{ElementRegistry, ElementSpec, RegistryError, RenderRequest};
pub use session::DashboardSession;
pub use storage::{AutoCommit, MemoryAdapter, ProjectAdapter, StorageError};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileAdapter;
