//! Scoped export.
//!
//! Exporting hides the grid and the selection while an external rasterizer
//! runs. The previous state comes back on every exit path, including a failed
//! or panicking rasterizer.

use super::CanvasEditor;
use crate::elements::ElementId;
use std::fmt::Display;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export failed: {0}")]
    Rasterize(String),
}

/// Result type for export.
pub type ExportResult<T> = Result<T, ExportError>;

/// Holds the editor in its exporting state until dropped.
struct ExportGuard<'a> {
    editor: &'a mut CanvasEditor,
    selection: Option<ElementId>,
    show_grid: bool,
}

impl<'a> ExportGuard<'a> {
    fn acquire(editor: &'a mut CanvasEditor) -> Self {
        editor.cancel_gesture();
        editor.commit_pending();
        let selection = editor.selected.take();
        let show_grid = editor.show_grid;
        editor.show_grid = false;
        editor.exporting = true;
        Self {
            editor,
            selection,
            show_grid,
        }
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.editor.exporting = false;
        self.editor.show_grid = self.show_grid;
        self.editor.selected = self
            .selection
            .take()
            .filter(|id| self.editor.index_of(id).is_some());
    }
}

impl CanvasEditor {
    /// Run `rasterize` against a clean canvas.
    ///
    /// The rasterizer sees no selection and no grid. Mutations are suspended
    /// while it runs.
    pub fn export_snapshot<T, E, F>(&mut self, rasterize: F) -> ExportResult<T>
    where
        E: Display,
        F: FnOnce(&CanvasEditor) -> Result<T, E>,
    {
        log::info!("Exporting page ({} elements)", self.elements.len());
        let guard = ExportGuard::acquire(self);
        let result = rasterize(&*guard.editor);
        drop(guard);
        result.map_err(|e| {
            log::warn!("Export failed: {e}");
            ExportError::Rasterize(e.to_string())
        })
    }
}
