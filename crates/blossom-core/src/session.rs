//! An open dashboard: adapter, pages, editor and the auto-commit schedule.
//!
//! [`DashboardSession`] is the only place that talks to a [`ProjectAdapter`].
//! Every committed mutation is forwarded right away, the auto-commit schedule
//! flushes live state periodically, and adapter failures are logged rather than
//! surfaced to the editing surface.

use crate::config::EditorConfig;
use crate::dashboard::{Dashboard, PageId};
use crate::editor::{CanvasEditor, EditorEvent};
use crate::pages::{PageResult, PageStore};
use crate::project::{self, ImportResult};
use crate::storage::{AutoCommit, ProjectAdapter};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Editing session for one dashboard.
pub struct DashboardSession<A: ProjectAdapter> {
    adapter: A,
    /// Metadata plus pages as of the last forward to the adapter.
    dashboard: Dashboard,
    store: PageStore,
    autosave: AutoCommit,
    config: EditorConfig,
    /// Editor notifications not consumed by the session.
    events: Vec<EditorEvent>,
}

impl<A: ProjectAdapter> DashboardSession<A> {
    /// Open the adapter's dashboard, or a new one when nothing is stored.
    ///
    /// Legacy content is migrated and the migrated form is committed back.
    pub fn open(adapter: A, config: EditorConfig) -> Self {
        Self::open_at(adapter, config, Instant::now())
    }

    /// [`DashboardSession::open`] with an explicit start time for the schedule.
    pub fn open_at(adapter: A, config: EditorConfig, now: Instant) -> Self {
        let (mut dashboard, write_back) = match adapter.initial_state() {
            Ok(Some(dashboard)) => {
                let needs_migration = dashboard.is_legacy() || dashboard.pages.is_empty();
                (dashboard, needs_migration)
            }
            Ok(None) => {
                log::info!("No stored dashboard, starting a new one");
                (Dashboard::default(), true)
            }
            Err(e) => {
                // Don't write over whatever the adapter failed to read.
                log::error!("Failed to load dashboard: {e}");
                (Dashboard::default(), false)
            }
        };
        dashboard.normalize();

        let store = PageStore::from_dashboard(&dashboard, &config);
        let mut autosave = AutoCommit::new(config.autosave_interval_secs);
        autosave.start(now);

        let mut session = Self {
            adapter,
            dashboard,
            store,
            autosave,
            config,
            events: Vec::new(),
        };
        if write_back {
            session.persist();
        }
        session
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn pages(&self) -> &PageStore {
        &self.store
    }

    pub fn editor(&self) -> &CanvasEditor {
        self.store.editor()
    }

    pub fn is_open(&self) -> bool {
        self.autosave.is_running()
    }

    /// The dashboard including live edits on the current page.
    pub fn snapshot(&self) -> Dashboard {
        let mut dashboard = self.dashboard.clone();
        self.store.write_to(&mut dashboard);
        dashboard
    }

    /// Take editor notifications meant for the UI.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run an editor operation and forward the result if it committed.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut CanvasEditor) -> R) -> R {
        let result = self.store.edit(f);
        self.after_change();
        result
    }

    /// Persist now. Bound to the Save shortcut; never touches history.
    pub fn save(&mut self) {
        self.edit(CanvasEditor::save);
    }

    pub fn add_page(&mut self) -> usize {
        let index = self.store.add_page();
        self.after_change();
        index
    }

    pub fn delete_page(&mut self, index: usize) -> PageResult<()> {
        self.store.delete_page(index)?;
        self.after_change();
        Ok(())
    }

    pub fn duplicate_page(&mut self, index: usize) -> PageResult<usize> {
        let copy = self.store.duplicate_page(index)?;
        self.after_change();
        Ok(copy)
    }

    pub fn reorder_pages(&mut self, order: &[PageId]) -> PageResult<()> {
        self.store.reorder_pages(order)?;
        self.after_change();
        Ok(())
    }

    pub fn move_page(&mut self, from: usize, to: usize) -> PageResult<()> {
        self.store.move_page(from, to)?;
        self.after_change();
        Ok(())
    }

    pub fn rename_page(&mut self, index: usize, name: &str) -> PageResult<()> {
        self.store.rename_page(index, name)?;
        self.after_change();
        Ok(())
    }

    pub fn set_current_page(&mut self, index: usize) -> PageResult<()> {
        self.store.set_current_page(index)?;
        self.after_change();
        Ok(())
    }

    /// Drive the auto-commit schedule. Returns true if state was forwarded.
    ///
    /// A due flush of an empty page is skipped but still starts a new period.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.autosave.is_due(now) {
            return false;
        }
        self.autosave.mark_flushed(now);
        if self.store.editor().elements().is_empty() {
            log::debug!("Auto-commit skipped, page is empty");
            return false;
        }
        log::debug!("Auto-commit");
        self.persist();
        true
    }

    /// Export the dashboard as project JSON.
    pub fn export_project(&self) -> Result<String, serde_json::Error> {
        project::export_project(&self.snapshot())
    }

    /// Replace the open dashboard with an imported one.
    ///
    /// Nothing changes when the document is rejected.
    pub fn import_project(&mut self, json: &str) -> ImportResult<()> {
        let mut dashboard = project::import_project(json)?;
        dashboard.normalize();
        self.store = PageStore::from_dashboard(&dashboard, &self.config);
        self.dashboard = dashboard;
        self.events.push(EditorEvent::SelectionChanged(None));
        self.persist();
        Ok(())
    }

    /// Flush outstanding edits and stop the schedule.
    pub fn close(&mut self) {
        if !self.autosave.is_running() {
            return;
        }
        self.store.edit(CanvasEditor::commit_pending);
        if self.store.take_dirty() {
            self.persist();
        }
        self.autosave.cancel();
        log::info!("Closed dashboard {}", self.dashboard.id);
    }

    fn after_change(&mut self) {
        let mut save_requested = false;
        for event in self.store.edit(CanvasEditor::drain_events) {
            match event {
                EditorEvent::SaveRequested => save_requested = true,
                other => self.events.push(other),
            }
        }
        if self.store.take_dirty() || save_requested {
            self.persist();
        }
    }

    /// Forward the full state to the adapter. Failures are logged only.
    fn persist(&mut self) {
        self.store.write_to(&mut self.dashboard);
        match self.adapter.commit(&self.dashboard) {
            Ok(()) => log::info!(
                "Committed dashboard {} ({} pages)",
                self.dashboard.id,
                self.dashboard.pages.len()
            ),
            Err(e) => log::error!("Failed to commit dashboard {}: {e}", self.dashboard.id),
        }
    }
}

impl<A: ProjectAdapter> Drop for DashboardSession<A> {
    fn drop(&mut self) {
        self.autosave.cancel();
    }
}
