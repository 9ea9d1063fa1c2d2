//! Page collection lifecycle.
//!
//! [`PageStore`] owns the ordered pages and the one [`CanvasEditor`] bound to
//! the current page. The store always holds at least one page. Switching pages
//! rebinds the editor with a fresh history.

use crate::config::EditorConfig;
use crate::dashboard::{Dashboard, Page, PageId, default_page_name};
use crate::editor::CanvasEditor;
use kurbo::Size;
use thiserror::Error;

/// Rejected page operations. State is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("Cannot delete the last remaining page")]
    LastPage,
    #[error("Page index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid page order: {0}")]
    InvalidOrder(String),
}

/// Result type for page operations.
pub type PageResult<T> = Result<T, PageError>;

/// Ordered pages plus the editor for the current one.
#[derive(Debug, Clone)]
pub struct PageStore {
    pages: Vec<Page>,
    current: usize,
    editor: CanvasEditor,
    dirty: bool,
}

impl PageStore {
    /// Create a store. An empty page list gets one default page and the index
    /// is clamped into range.
    pub fn new(
        mut pages: Vec<Page>,
        current_page_index: usize,
        canvas: Size,
        config: &EditorConfig,
    ) -> Self {
        if pages.is_empty() {
            pages.push(Page::new(default_page_name(0)));
        }
        let current = current_page_index.min(pages.len() - 1);
        let editor = CanvasEditor::new(pages[current].elements.clone(), canvas, config);
        Self {
            pages,
            current,
            editor,
            dirty: false,
        }
    }

    /// Build a store from a dashboard, migrating legacy content first.
    pub fn from_dashboard(dashboard: &Dashboard, config: &EditorConfig) -> Self {
        let mut dashboard = dashboard.clone();
        dashboard.normalize();
        Self::new(
            dashboard.pages,
            dashboard.current_page_index,
            dashboard.canvas_format.dimensions(),
            config,
        )
    }

    /// Pages as of the last committed edit.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Pages including uncommitted live edits on the current page.
    pub fn snapshot_pages(&self) -> Vec<Page> {
        let mut pages = self.pages.clone();
        pages[self.current].elements = self.editor.elements().to_vec();
        pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false; the store never runs out of pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    pub fn editor(&self) -> &CanvasEditor {
        &self.editor
    }

    /// Run an editor operation, syncing the current page if it committed.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut CanvasEditor) -> R) -> R {
        let before = self.editor.revision();
        let result = f(&mut self.editor);
        if self.editor.revision() != before {
            self.sync_current();
            self.dirty = true;
        }
        result
    }

    /// Whether pages changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn sync_current(&mut self) {
        self.pages[self.current].elements = self.editor.elements().to_vec();
    }

    fn check_index(&self, index: usize) -> PageResult<()> {
        if index < self.pages.len() {
            Ok(())
        } else {
            Err(PageError::IndexOutOfRange {
                index,
                len: self.pages.len(),
            })
        }
    }

    /// Point the editor at `index` with a fresh history.
    fn switch_to(&mut self, index: usize) {
        self.editor.commit_pending();
        self.sync_current();
        self.current = index;
        self.editor.reset(self.pages[index].elements.clone());
        log::debug!("Switched to page {} ({})", index, self.pages[index].id);
    }

    /// Append an empty page and make it current. Returns its index.
    pub fn add_page(&mut self) -> usize {
        let index = self.pages.len();
        self.pages.push(Page::new(default_page_name(index)));
        self.switch_to(index);
        self.dirty = true;
        log::info!("Added page {}", index + 1);
        index
    }

    /// Remove a page. The last remaining page cannot be deleted.
    ///
    /// Deleting the current page moves to `min(index, len - 1)`. Deleting
    /// another page keeps the current page current.
    pub fn delete_page(&mut self, index: usize) -> PageResult<()> {
        if self.pages.len() <= 1 {
            log::warn!("Refusing to delete the last page");
            return Err(PageError::LastPage);
        }
        self.check_index(index)?;
        self.editor.commit_pending();
        self.sync_current();

        let removed = self.pages.remove(index);
        log::info!("Deleted page {} ({})", removed.name, removed.id);
        if index == self.current {
            let next = index.min(self.pages.len() - 1);
            self.current = next;
            self.editor.reset(self.pages[next].elements.clone());
        } else if index < self.current {
            self.current -= 1;
        }
        self.dirty = true;
        Ok(())
    }

    /// Copy a page with fresh ids right after it and make the copy current.
    pub fn duplicate_page(&mut self, index: usize) -> PageResult<usize> {
        self.check_index(index)?;
        self.editor.commit_pending();
        self.sync_current();

        let copy = self.pages[index].duplicate();
        log::info!("Duplicated page {} as {}", self.pages[index].id, copy.id);
        self.pages.insert(index + 1, copy);
        if self.current > index {
            self.current += 1;
        }
        self.switch_to(index + 1);
        self.dirty = true;
        Ok(index + 1)
    }

    /// Reorder pages. `order` must be a permutation of the current page ids.
    ///
    /// The current page stays current; its index follows it.
    pub fn reorder_pages(&mut self, order: &[PageId]) -> PageResult<()> {
        if order.len() != self.pages.len() {
            return Err(PageError::InvalidOrder(format!(
                "expected {} pages, got {}",
                self.pages.len(),
                order.len()
            )));
        }
        let mut reordered = Vec::with_capacity(order.len());
        let mut remaining: Vec<Option<Page>> = self.pages.iter().cloned().map(Some).collect();
        for id in order {
            let slot = remaining
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|p| &p.id == id))
                .ok_or_else(|| PageError::InvalidOrder(format!("unknown or repeated page {id}")))?;
            reordered.extend(slot.take());
        }

        self.editor.commit_pending();
        let current_id = self.pages[self.current].id.clone();
        self.pages = reordered;
        self.current = self
            .pages
            .iter()
            .position(|p| p.id == current_id)
            .unwrap_or(0);
        self.sync_current();
        self.dirty = true;
        log::info!("Reordered pages, current page now at {}", self.current);
        Ok(())
    }

    /// Move one page from `from` to `to`.
    pub fn move_page(&mut self, from: usize, to: usize) -> PageResult<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let mut order: Vec<PageId> = self.pages.iter().map(|p| p.id.clone()).collect();
        let moved = order.remove(from);
        order.insert(to, moved);
        self.reorder_pages(&order)
    }

    /// Rename a page. A blank name falls back to the default name.
    pub fn rename_page(&mut self, index: usize, name: &str) -> PageResult<()> {
        self.check_index(index)?;
        let name = name.trim();
        self.pages[index].name = if name.is_empty() {
            default_page_name(index)
        } else {
            name.to_string()
        };
        self.dirty = true;
        Ok(())
    }

    /// Switch to another page. Selecting the current page only clears the
    /// selection.
    pub fn set_current_page(&mut self, index: usize) -> PageResult<()> {
        self.check_index(index)?;
        if index == self.current {
            self.editor.select_element(None);
        } else {
            self.switch_to(index);
            self.dirty = true;
        }
        Ok(())
    }

    /// Write pages and the current index back into a dashboard.
    pub fn write_to(&self, dashboard: &mut Dashboard) {
        dashboard.pages = self.snapshot_pages();
        dashboard.current_page_index = self.current;
        dashboard.elements = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::elements::{ElementId, ElementKind, GeometryPatch};
    use crate::registry::ElementSpec;
    use kurbo::Point;

    fn store() -> PageStore {
        PageStore::new(Vec::new(), 0, Size::new(1920.0, 1080.0), &EditorConfig::default())
    }

    fn add(store: &mut PageStore, kind: ElementKind) -> ElementId {
        store
            .edit(|editor| editor.add_element(&ElementSpec::new(kind), &Vec::<Dataset>::new()))
            .unwrap()
    }

    fn ids(store: &PageStore) -> Vec<PageId> {
        store.pages().iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_starts_with_one_page() {
        let store = store();
        assert_eq!(store.len(), 1);
        assert_eq!(store.current_page().name, "Page 1");
    }

    #[test]
    fn test_edit_syncs_committed_elements() {
        let mut store = store();
        add(&mut store, ElementKind::Kpi);
        assert_eq!(store.current_page().elements.len(), 1);
        assert!(store.take_dirty());
        assert!(!store.take_dirty());
    }

    #[test]
    fn test_live_edits_only_in_snapshot() {
        let mut store = store();
        let id = add(&mut store, ElementKind::Kpi);
        store.take_dirty();
        store.edit(|editor| {
            editor.update_element_geometry(&id, GeometryPatch::position(Point::new(500.0, 5.0)))
        });
        assert!(!store.take_dirty());
        assert_eq!(store.current_page().elements[0].x, 50.0);
        assert_eq!(store.snapshot_pages()[0].elements[0].x, 500.0);
    }

    #[test]
    fn test_add_page() {
        let mut store = store();
        add(&mut store, ElementKind::Kpi);
        assert_eq!(store.add_page(), 1);
        assert_eq!(store.current_index(), 1);
        assert_eq!(store.current_page().name, "Page 2");
        assert!(store.editor().elements().is_empty());
        assert!(!store.editor().can_undo());
        assert_eq!(store.pages()[0].elements.len(), 1);
    }

    #[test]
    fn test_delete_last_page_rejected() {
        let mut store = store();
        for index in [0, 1, 99] {
            assert_eq!(store.delete_page(index), Err(PageError::LastPage));
            assert_eq!(store.len(), 1);
        }
    }

    #[test]
    fn test_delete_current_page() {
        let mut store = store();
        store.add_page();
        store.add_page();
        let last = store.pages()[2].id.clone();
        store.delete_page(2).unwrap();
        assert_eq!(store.current_index(), 1);
        assert!(store.pages().iter().all(|p| p.id != last));

        assert_eq!(
            store.delete_page(5),
            Err(PageError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_delete_earlier_page_keeps_current() {
        let mut store = store();
        store.add_page();
        store.add_page();
        let current = store.current_page().id.clone();
        store.delete_page(0).unwrap();
        assert_eq!(store.current_page().id, current);
        assert_eq!(store.current_index(), 1);
    }

    #[test]
    fn test_duplicate_page() {
        let mut store = store();
        add(&mut store, ElementKind::Kpi);
        add(&mut store, ElementKind::Text);
        assert_eq!(store.duplicate_page(0), Ok(1));

        let (source, copy) = (&store.pages()[0], &store.pages()[1]);
        assert_ne!(source.id, copy.id);
        assert_eq!(copy.name, "Page 1 (copy)");
        assert_eq!(copy.elements.len(), 2);
        for element in &copy.elements {
            assert!(source.elements.iter().all(|e| e.id != element.id));
        }
        assert_eq!(store.current_index(), 1);
    }

    #[test]
    fn test_reorder_identity_follows() {
        let mut store = store();
        store.add_page();
        store.add_page();
        store.set_current_page(0).unwrap();
        let current = store.current_page().id.clone();

        let mut order = ids(&store);
        order.reverse();
        store.reorder_pages(&order).unwrap();
        assert_eq!(ids(&store), order);
        assert_eq!(store.current_page().id, current);
        assert_eq!(store.current_index(), 2);
    }

    #[test]
    fn test_reorder_rejects_non_permutation() {
        let mut store = store();
        store.add_page();
        let before = ids(&store);

        let twice = vec![before[0].clone(), before[0].clone()];
        assert!(matches!(store.reorder_pages(&twice), Err(PageError::InvalidOrder(_))));
        assert!(matches!(
            store.reorder_pages(&before[..1]),
            Err(PageError::InvalidOrder(_))
        ));
        assert_eq!(ids(&store), before);
    }

    #[test]
    fn test_move_page_keeps_current() {
        let mut store = store();
        store.add_page();
        store.add_page();
        let current = store.current_page().id.clone();
        store.move_page(2, 0).unwrap();
        assert_eq!(store.current_index(), 0);
        assert_eq!(store.current_page().id, current);
    }

    #[test]
    fn test_move_keeps_editor_history() {
        let mut store = store();
        store.add_page();
        add(&mut store, ElementKind::Kpi);
        store.move_page(1, 0).unwrap();
        assert!(store.editor().can_undo());
        assert_eq!(store.current_page().elements.len(), 1);
    }

    #[test]
    fn test_rename_page() {
        let mut store = store();
        store.rename_page(0, "  Summary ").unwrap();
        assert_eq!(store.current_page().name, "Summary");
        store.rename_page(0, "").unwrap();
        assert_eq!(store.current_page().name, "Page 1");
        assert!(store.rename_page(3, "x").is_err());
    }

    #[test]
    fn test_switching_pages_keeps_content() {
        let mut store = store();
        add(&mut store, ElementKind::Kpi);
        store.add_page();
        add(&mut store, ElementKind::Shape);
        add(&mut store, ElementKind::Shape);

        store.set_current_page(0).unwrap();
        assert_eq!(store.editor().elements().len(), 1);
        assert!(store.editor().selected_id().is_none());
        assert!(!store.editor().can_undo());
        store.set_current_page(1).unwrap();
        assert_eq!(store.editor().elements().len(), 2);
        assert!(store.set_current_page(2).is_err());
    }

    #[test]
    fn test_from_legacy_dashboard() {
        let mut store = store();
        add(&mut store, ElementKind::Kpi);
        let elements = store.current_page().elements.clone();

        let dashboard = Dashboard::legacy(elements.clone());
        let migrated = PageStore::from_dashboard(&dashboard, &EditorConfig::default());
        assert_eq!(migrated.len(), 1);
        assert_eq!(migrated.editor().elements(), &elements[..]);
    }
}
