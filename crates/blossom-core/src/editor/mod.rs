//! The live editing surface for one page.
//!
//! [`CanvasEditor`] exclusively owns the element list of the open page. All
//! changes go through its operations: discrete actions commit to history at
//! once, continuous ones (gesture moves, panel edits) apply live and commit on
//! [`CanvasEditor::commit_pending`].
//!
//! Operations on an id that no longer exists are silent no-ops.

mod draft;
mod export;

pub use draft::PropertyDraft;
pub use export::{ExportError, ExportResult};

use crate::config::EditorConfig;
use crate::dataset::DatasetCatalog;
use crate::elements::{Element, ElementConfig, ElementId, GeometryPatch};
use crate::geometry::{Zoom, clamp_placement, pointer_to_canvas};
use crate::gesture::{Gesture, HandleKind};
use crate::history::HistoryStack;
use crate::input::{Focus, KeyPress, Shortcut};
use crate::registry::{ElementRegistry, ElementSpec};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Edit,
    /// Read-only; only mode toggle, zoom and save remain active.
    Preview,
}

/// Notifications for collaborators outside the core.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The properties panel should show this element (or nothing).
    SelectionChanged(Option<Element>),
    /// State should be forwarded to the project adapter now.
    SaveRequested,
}

/// Editing state for the current page.
#[derive(Debug, Clone)]
pub struct CanvasEditor {
    config: EditorConfig,
    canvas: Size,
    mode: Mode,
    elements: Vec<Element>,
    selected: Option<ElementId>,
    history: HistoryStack,
    zoom: Zoom,
    show_grid: bool,
    exporting: bool,
    pending_commit: bool,
    gesture: Option<Gesture>,
    events: Vec<EditorEvent>,
    revision: u64,
}

impl CanvasEditor {
    /// Create an editor for a page of size `canvas`.
    pub fn new(elements: Vec<Element>, canvas: Size, config: &EditorConfig) -> Self {
        Self {
            history: HistoryStack::new(&elements, config.history_capacity),
            config: config.clone(),
            canvas,
            mode: Mode::Edit,
            elements,
            selected: None,
            zoom: Zoom::snap(config.default_zoom),
            show_grid: true,
            exporting: false,
            pending_commit: false,
            gesture: None,
            events: Vec::new(),
            revision: 0,
        }
    }

    /// Rebind to another page's elements with a fresh history.
    ///
    /// Zoom, mode and grid visibility carry over.
    pub fn reset(&mut self, elements: Vec<Element>) {
        self.gesture = None;
        self.pending_commit = false;
        self.history = HistoryStack::new(&elements, self.config.history_capacity);
        self.elements = elements;
        self.set_selection(None);
        self.revision += 1;
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.as_ref().and_then(|id| self.element(id))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Whether an export is rasterizing the canvas right now.
    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.can_mutate() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.can_mutate() && self.history.can_redo()
    }

    /// Whether live edits are waiting for [`Self::commit_pending`].
    pub fn has_pending_commit(&self) -> bool {
        self.pending_commit
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    /// Counter bumped whenever the committed element list changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    pub fn set_canvas_size(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Take queued notifications.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn can_mutate(&self) -> bool {
        self.mode == Mode::Edit && !self.exporting
    }

    fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    fn set_selection(&mut self, id: Option<ElementId>) {
        if self.selected == id {
            return;
        }
        self.selected = id;
        let selected = self.selected_element().cloned();
        self.events.push(EditorEvent::SelectionChanged(selected));
    }

    /// Drop a dangling selection, or refresh the panel with new values.
    fn reconcile_selection(&mut self) {
        if self.selected.is_none() {
            return;
        }
        match self.selected_element().cloned() {
            Some(element) => self
                .events
                .push(EditorEvent::SelectionChanged(Some(element))),
            None => self.set_selection(None),
        }
    }

    fn commit(&mut self) {
        self.history.commit(&self.elements);
        self.pending_commit = false;
        self.revision += 1;
    }

    /// Commit live edits as one history entry.
    ///
    /// Returns false when nothing was pending or the live list already matches
    /// the current snapshot.
    pub fn commit_pending(&mut self) -> bool {
        if !self.pending_commit {
            return false;
        }
        self.pending_commit = false;
        if self.elements.as_slice() == self.history.current() {
            return false;
        }
        self.commit();
        true
    }

    /// Select an element, or deselect with `None`. Unknown ids are ignored.
    pub fn select_element(&mut self, id: Option<&ElementId>) -> bool {
        if !self.can_mutate() {
            return false;
        }
        match id {
            Some(id) if self.index_of(id).is_none() => false,
            _ => {
                self.set_selection(id.cloned());
                true
            }
        }
    }

    /// Create an element from `spec`, append it, commit and select it.
    pub fn add_element<C: DatasetCatalog + ?Sized>(
        &mut self,
        spec: &ElementSpec,
        catalog: &C,
    ) -> Option<ElementId> {
        if !self.can_mutate() {
            return None;
        }
        match ElementRegistry::create(spec, catalog) {
            Ok(element) => self.insert_element(element),
            Err(e) => {
                log::warn!("Rejected element creation: {e}");
                None
            }
        }
    }

    /// Append a fully built element, commit and select it.
    pub fn insert_element(&mut self, mut element: Element) -> Option<ElementId> {
        if !self.can_mutate() {
            return None;
        }
        self.commit_pending();
        while self.index_of(&element.id).is_some() {
            element.regenerate_id();
        }
        let id = element.id.clone();
        log::debug!("Adding {} element {id}", element.kind());
        self.elements.push(element);
        self.commit();
        self.set_selection(Some(id.clone()));
        Some(id)
    }

    /// Create an element at a screen-space drop point.
    ///
    /// The pointer is converted to canvas-space and the box is clamped inside
    /// the canvas.
    pub fn handle_drop<C: DatasetCatalog + ?Sized>(
        &mut self,
        pointer: Point,
        canvas_rect: Rect,
        spec: &ElementSpec,
        catalog: &C,
    ) -> Option<ElementId> {
        if !self.can_mutate() {
            return None;
        }
        let mut element = match ElementRegistry::create(spec, catalog) {
            Ok(element) => element,
            Err(e) => {
                log::warn!("Rejected drop: {e}");
                return None;
            }
        };
        let position = clamp_placement(
            self.to_canvas_point(pointer, canvas_rect),
            element.size(),
            self.canvas,
        );
        element.apply_geometry(GeometryPatch::position(position));
        self.insert_element(element)
    }

    /// Like [`Self::handle_drop`] for a raw JSON drag payload.
    pub fn handle_drop_payload<C: DatasetCatalog + ?Sized>(
        &mut self,
        pointer: Point,
        canvas_rect: Rect,
        payload: &str,
        catalog: &C,
    ) -> Option<ElementId> {
        match ElementSpec::from_json(payload) {
            Ok(spec) => self.handle_drop(pointer, canvas_rect, &spec, catalog),
            Err(e) => {
                log::warn!("Rejected drop: {e}");
                None
            }
        }
    }

    /// Merge geometry into an element live; commit later.
    pub fn update_element_geometry(&mut self, id: &ElementId, patch: GeometryPatch) -> bool {
        if !self.can_mutate() {
            return false;
        }
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.elements[idx].apply_geometry(patch);
        self.pending_commit = true;
        true
    }

    /// Shallow-merge config fields into an element live; commit later.
    pub fn update_element_config(&mut self, id: &ElementId, patch: &Map<String, Value>) -> bool {
        if !self.can_mutate() {
            return false;
        }
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        match self.elements[idx].config.merged(patch) {
            Ok(config) => {
                self.elements[idx].config = config;
                self.pending_commit = true;
                true
            }
            Err(e) => {
                log::warn!("Rejected config update for {id}: {e}");
                false
            }
        }
    }

    /// Replace an element's config with another of the same kind; commit later.
    pub fn set_element_config(&mut self, id: &ElementId, config: ElementConfig) -> bool {
        if !self.can_mutate() {
            return false;
        }
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        match self.elements[idx].replace_config(config) {
            Ok(()) => {
                self.pending_commit = true;
                true
            }
            Err(e) => {
                log::warn!("Rejected config update for {id}: {e}");
                false
            }
        }
    }

    /// Point an element at another dataset (or none); commit later.
    pub fn set_element_dataset(&mut self, id: &ElementId, dataset_id: Option<String>) -> bool {
        if !self.can_mutate() {
            return false;
        }
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.elements[idx].dataset_id = dataset_id;
        self.pending_commit = true;
        true
    }

    /// Remove an element and commit.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        if !self.can_mutate() {
            return false;
        }
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if self.gesture.as_ref().is_some_and(|g| &g.element_id == id) {
            self.gesture = None;
        }
        self.commit_pending();
        let removed = self.elements.remove(idx);
        log::debug!("Deleted {} element {}", removed.kind(), removed.id);
        self.commit();
        if self.selected.as_ref() == Some(id) {
            self.set_selection(None);
        }
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected.clone() {
            Some(id) => self.delete_element(&id),
            None => false,
        }
    }

    /// Copy an element with a fresh id, offset it, commit and select the copy.
    pub fn duplicate_element(&mut self, id: &ElementId) -> Option<ElementId> {
        if !self.can_mutate() {
            return None;
        }
        let idx = self.index_of(id)?;
        let copy = self.elements[idx].duplicate(self.config.duplicate_offset);
        self.insert_element(copy)
    }

    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        let id = self.selected.clone()?;
        self.duplicate_element(&id)
    }

    /// Step back one history entry.
    pub fn undo(&mut self) -> bool {
        if !self.can_mutate() {
            return false;
        }
        self.cancel_gesture();
        self.commit_pending();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.elements = snapshot.to_vec();
        self.revision += 1;
        self.reconcile_selection();
        true
    }

    /// Step forward one history entry.
    pub fn redo(&mut self) -> bool {
        if !self.can_mutate() {
            return false;
        }
        self.cancel_gesture();
        self.commit_pending();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.elements = snapshot.to_vec();
        self.revision += 1;
        self.reconcile_selection();
        true
    }

    /// Start dragging (`handle == None`) or resizing an element.
    ///
    /// `point` is canvas-space; see [`Self::to_canvas_point`].
    pub fn begin_gesture(
        &mut self,
        id: &ElementId,
        handle: Option<HandleKind>,
        point: Point,
    ) -> bool {
        if !self.can_mutate() {
            return false;
        }
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.commit_pending();
        self.gesture = Some(Gesture::new(&self.elements[idx], handle, point));
        self.set_selection(Some(id.clone()));
        log::debug!(
            "Gesture start on {id} ({})",
            if handle.is_some() { "resize" } else { "move" }
        );
        true
    }

    /// Apply live geometry for the latest pointer position.
    pub fn update_gesture(&mut self, point: Point) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        gesture.current_point = point;
        let patch = gesture.geometry(self.canvas, self.config.min_element_size);
        let id = gesture.element_id.clone();
        self.update_element_geometry(&id, patch)
    }

    /// Finish the gesture and commit its final geometry as one entry.
    pub fn end_gesture(&mut self, point: Point) -> bool {
        if self.gesture.is_none() {
            return false;
        }
        self.update_gesture(point);
        self.gesture = None;
        let committed = self.commit_pending();
        log::debug!("Gesture end (committed: {committed})");
        committed
    }

    /// Abandon the gesture and restore the element's starting geometry.
    pub fn cancel_gesture(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        if let Some(idx) = self.index_of(&gesture.element_id) {
            let original = gesture.original;
            self.elements[idx].apply_geometry(GeometryPatch::rect(
                original.x,
                original.y,
                original.width,
                original.height,
            ));
        }
    }

    /// Convert a screen-space pointer to canvas-space at the current zoom.
    pub fn to_canvas_point(&self, pointer: Point, canvas_rect: Rect) -> Point {
        pointer_to_canvas(pointer, canvas_rect, self.zoom)
    }

    /// Set zoom, snapped to the nearest allowed level.
    pub fn set_zoom(&mut self, percent: u32) -> Zoom {
        self.zoom = Zoom::snap(percent);
        self.zoom
    }

    pub fn zoom_in(&mut self) -> Zoom {
        self.zoom = self.zoom.zoomed_in();
        self.zoom
    }

    pub fn zoom_out(&mut self) -> Zoom {
        self.zoom = self.zoom.zoomed_out();
        self.zoom
    }

    /// Switch mode. Any transition clears the selection.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.cancel_gesture();
        self.commit_pending();
        self.mode = mode;
        self.set_selection(None);
        log::debug!("Mode changed to {mode:?}");
    }

    pub fn toggle_mode(&mut self) -> Mode {
        let next = match self.mode {
            Mode::Edit => Mode::Preview,
            Mode::Preview => Mode::Edit,
        };
        self.set_mode(next);
        self.mode
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.show_grid = visible;
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.show_grid
    }

    /// Ask for the current state to be persisted now. Not a history action.
    pub fn save(&mut self) {
        self.commit_pending();
        log::info!("Save requested ({} elements)", self.elements.len());
        self.events.push(EditorEvent::SaveRequested);
    }

    /// Run the shortcut bound to `press`, if any. Returns the action taken.
    pub fn handle_key(&mut self, press: &KeyPress, focus: Focus) -> Option<Shortcut> {
        let shortcut = Shortcut::resolve(press, focus)?;
        if shortcut.is_mutation() && !self.can_mutate() {
            return None;
        }
        let handled = match shortcut {
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
            Shortcut::Delete => self.delete_selected(),
            Shortcut::Duplicate => self.duplicate_selected().is_some(),
            Shortcut::Save => {
                self.save();
                true
            }
        };
        handled.then_some(shortcut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::elements::ElementKind;
    use crate::input::Modifiers;
    use serde_json::json;

    const CANVAS: Size = Size::new(1920.0, 1080.0);

    fn editor() -> CanvasEditor {
        CanvasEditor::new(Vec::new(), CANVAS, &EditorConfig::default())
    }

    fn add(editor: &mut CanvasEditor, kind: ElementKind) -> ElementId {
        editor
            .add_element(&ElementSpec::new(kind), &Vec::<Dataset>::new())
            .unwrap()
    }

    #[test]
    fn test_add_selects_and_commits() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Kpi);
        assert_eq!(editor.elements().len(), 1);
        assert_eq!(editor.selected_id(), Some(&id));
        assert_eq!(editor.history().len(), 2);

        let events = editor.drain_events();
        assert!(matches!(&events[..], [EditorEvent::SelectionChanged(Some(e))] if e.id == id));
        assert!(editor.drain_events().is_empty());
    }

    #[test]
    fn test_add_unknown_type_is_rejected() {
        let mut editor = editor();
        let spec = ElementSpec {
            kind: "video".to_string(),
            ..Default::default()
        };
        assert!(editor.add_element(&spec, &Vec::<Dataset>::new()).is_none());
        assert!(editor.elements().is_empty());
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut editor = editor();
        add(&mut editor, ElementKind::Text);
        let ghost = ElementId::from("ghost");
        assert!(!editor.select_element(Some(&ghost)));
        assert!(!editor.delete_element(&ghost));
        assert!(editor.duplicate_element(&ghost).is_none());
        assert!(!editor.update_element_geometry(&ghost, GeometryPatch::default()));
        assert_eq!(editor.elements().len(), 1);
    }

    #[test]
    fn test_geometry_update_is_deferred() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Kpi);
        for x in 0..10 {
            let patch = GeometryPatch::position(Point::new(f64::from(x), 0.0));
            editor.update_element_geometry(&id, patch);
        }
        assert_eq!(editor.history().len(), 2);
        assert!(editor.has_pending_commit());

        assert!(editor.commit_pending());
        assert_eq!(editor.history().len(), 3);
        assert!(!editor.commit_pending());
    }

    #[test]
    fn test_config_merge() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Kpi);
        let patch = json!({"label": "Revenue"});
        assert!(editor.update_element_config(&id, patch.as_object().unwrap()));
        match &editor.element(&id).unwrap().config {
            ElementConfig::Kpi(k) => {
                assert_eq!(k.label, "Revenue");
                assert_eq!(k.value, "0");
            }
            other => panic!("Expected kpi config, got {other:?}"),
        }
    }

    #[test]
    fn test_config_merge_chart_type() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Chart);
        let patch = json!({"type": "pie", "xField": "region"});
        assert!(editor.update_element_config(&id, patch.as_object().unwrap()));
        match &editor.element(&id).unwrap().config {
            ElementConfig::Chart(c) => {
                assert_eq!(c.chart_type, "pie");
                assert_eq!(c.x_field, "region");
            }
            other => panic!("Expected chart config, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Shape);
        assert!(editor.delete_element(&id));
        assert!(editor.selected_id().is_none());
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_duplicate_offsets_and_selects() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Shape);
        let copy = editor.duplicate_element(&id).unwrap();
        assert_ne!(copy, id);
        assert_eq!(editor.selected_id(), Some(&copy));
        let original = editor.element(&id).unwrap().position();
        let dup = editor.element(&copy).unwrap().position();
        assert_eq!(dup, Point::new(original.x + 20.0, original.y + 20.0));
    }

    #[test]
    fn test_undo_folds_pending_edits() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Kpi);
        editor.update_element_geometry(&id, GeometryPatch::position(Point::new(300.0, 300.0)));
        assert!(editor.undo());
        assert_eq!(editor.element(&id).unwrap().position(), Point::new(50.0, 50.0));
        assert!(editor.redo());
        assert_eq!(editor.element(&id).unwrap().position(), Point::new(300.0, 300.0));
    }

    #[test]
    fn test_drag_commits_once() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Kpi);
        let before = editor.history().len();

        assert!(editor.begin_gesture(&id, None, Point::new(60.0, 60.0)));
        for step in 1..=50 {
            editor.update_gesture(Point::new(60.0 + f64::from(step), 60.0));
        }
        assert_eq!(editor.history().len(), before);
        assert!(editor.end_gesture(Point::new(160.0, 60.0)));
        assert_eq!(editor.history().len(), before + 1);
        assert_eq!(editor.element(&id).unwrap().position(), Point::new(150.0, 50.0));
    }

    #[test]
    fn test_undo_cancels_gesture() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Kpi);
        editor.begin_gesture(&id, None, Point::ZERO);
        editor.update_gesture(Point::new(100.0, 100.0));

        assert!(editor.undo());
        assert!(editor.gesture().is_none());
        assert!(editor.elements().is_empty());
        assert!(editor.redo());
        assert_eq!(editor.element(&id).unwrap().position(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_drop_converts_and_clamps() {
        let mut editor = editor();
        editor.set_zoom(50);
        let canvas_rect = Rect::new(100.0, 100.0, 1060.0, 640.0);
        let id = editor
            .handle_drop_payload(
                Point::new(150.0, 125.0),
                canvas_rect,
                r#"{"type": "chart"}"#,
                &Vec::<Dataset>::new(),
            )
            .unwrap();
        assert_eq!(editor.element(&id).unwrap().position(), Point::new(100.0, 50.0));

        assert!(
            editor
                .handle_drop_payload(Point::ZERO, canvas_rect, "{", &Vec::<Dataset>::new())
                .is_none()
        );
    }

    #[test]
    fn test_drop_palette_chart_payload() {
        let mut editor = editor();
        let catalog: Vec<Dataset> = serde_json::from_value(json!([{
            "id": "sales",
            "name": "Sales",
            "data": [{"region": "north", "amount": 10}],
            "charts": [{
                "id": "c1", "title": "Revenue", "type": "line",
                "xField": "region", "yField": "amount"
            }]
        }]))
        .unwrap();
        let payload = r#"{"type":"chart","datasetId":"sales",
            "config":{"chartId":"c1","title":"Revenue","type":"bar",
            "xField":"region","yField":"amount"}}"#;
        let id = editor
            .handle_drop_payload(
                Point::new(10.0, 10.0),
                Rect::new(0.0, 0.0, 1920.0, 1080.0),
                payload,
                &catalog,
            )
            .unwrap();
        let element = editor.element(&id).unwrap();
        assert_eq!(element.dataset_id.as_deref(), Some("sales"));
        match &element.config {
            ElementConfig::Chart(c) => {
                assert_eq!(c.chart_id.as_deref(), Some("c1"));
                assert_eq!(c.chart_type, "bar");
                assert_eq!(c.y_field, "amount");
            }
            other => panic!("Expected chart config, got {other:?}"),
        }
    }

    #[test]
    fn test_preview_blocks_mutation() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Kpi);
        editor.set_mode(Mode::Preview);
        assert!(editor.selected_id().is_none());

        let text = ElementSpec::new(ElementKind::Text);
        assert!(editor.add_element(&text, &Vec::<Dataset>::new()).is_none());
        assert!(!editor.delete_element(&id));
        assert!(!editor.undo());
        assert!(!editor.begin_gesture(&id, None, Point::ZERO));
        assert_eq!(editor.set_zoom(125).percent(), 125);

        let undo = KeyPress::new("z", Modifiers::CTRL);
        assert_eq!(editor.handle_key(&undo, Focus::Canvas), None);
        let save = KeyPress::new("s", Modifiers::CTRL);
        assert_eq!(editor.handle_key(&save, Focus::Canvas), Some(Shortcut::Save));
        assert_eq!(editor.elements().len(), 1);
    }

    #[test]
    fn test_mode_toggle_clears_selection() {
        let mut editor = editor();
        add(&mut editor, ElementKind::Kpi);
        editor.drain_events();
        assert_eq!(editor.toggle_mode(), Mode::Preview);
        assert_eq!(editor.drain_events(), vec![EditorEvent::SelectionChanged(None)]);
        assert_eq!(editor.toggle_mode(), Mode::Edit);
        assert!(editor.selected_id().is_none());
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Shape);

        let dup = KeyPress::new("d", Modifiers::CTRL);
        assert_eq!(editor.handle_key(&dup, Focus::Canvas), Some(Shortcut::Duplicate));
        assert_eq!(editor.elements().len(), 2);

        let delete = KeyPress::new("Delete", Modifiers::NONE);
        assert_eq!(editor.handle_key(&delete, Focus::TextInput), None);
        assert_eq!(editor.handle_key(&delete, Focus::Canvas), Some(Shortcut::Delete));
        assert_eq!(editor.elements().len(), 1);
        assert_eq!(editor.elements()[0].id, id);

        let save = KeyPress::new("s", Modifiers::CTRL);
        editor.drain_events();
        assert_eq!(editor.handle_key(&save, Focus::TextInput), Some(Shortcut::Save));
        assert_eq!(editor.drain_events(), vec![EditorEvent::SaveRequested]);
    }

    #[test]
    fn test_zoom_does_not_touch_geometry() {
        let mut editor = editor();
        let id = add(&mut editor, ElementKind::Kpi);
        let before = editor.element(&id).unwrap().clone();
        editor.zoom_in();
        editor.zoom_in();
        editor.zoom_out();
        assert_eq!(editor.zoom().percent(), 125);
        assert_eq!(editor.element(&id).unwrap(), &before);
    }
}
