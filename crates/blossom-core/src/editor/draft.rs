//! Two-phase property edits.
//!
//! A [`PropertyDraft`] holds edits from the properties panel while a field has
//! focus. Keystrokes only touch the draft; [`CanvasEditor::apply_draft`] writes
//! the changed fields back and commits them as a single history entry.

use super::CanvasEditor;
use crate::elements::{Element, ElementConfig, ElementError, ElementId, GeometryPatch};
use serde_json::{Map, Value};

/// Pending edits for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDraft {
    original: Element,
    working: Element,
}

impl PropertyDraft {
    pub fn new(element: &Element) -> Self {
        Self {
            original: element.clone(),
            working: element.clone(),
        }
    }

    pub fn element_id(&self) -> &ElementId {
        &self.original.id
    }

    /// The element as it would look after apply.
    pub fn element(&self) -> &Element {
        &self.working
    }

    pub fn set_geometry(&mut self, patch: GeometryPatch) {
        self.working.apply_geometry(patch);
    }

    /// Set one config field. The value must fit the element's config type.
    pub fn set_field(&mut self, key: &str, value: Value) -> Result<(), ElementError> {
        let mut patch = Map::new();
        patch.insert(key.to_string(), value);
        self.working.config = self.working.config.merged(&patch)?;
        Ok(())
    }

    pub fn set_config(&mut self, config: ElementConfig) -> Result<(), ElementError> {
        self.working.replace_config(config)
    }

    pub fn set_dataset(&mut self, dataset_id: Option<String>) {
        self.working.dataset_id = dataset_id;
    }

    pub fn is_dirty(&self) -> bool {
        self.working != self.original
    }

    /// Throw away all edits.
    pub fn discard(&mut self) {
        self.working = self.original.clone();
    }

    fn geometry_changes(&self) -> GeometryPatch {
        let (o, w) = (&self.original, &self.working);
        GeometryPatch {
            x: (o.x != w.x).then_some(w.x),
            y: (o.y != w.y).then_some(w.y),
            width: (o.width != w.width).then_some(w.width),
            height: (o.height != w.height).then_some(w.height),
        }
    }

    /// Config fields whose value differs from the original.
    fn config_changes(&self) -> Map<String, Value> {
        let original = self.original.config.to_value();
        match self.working.config.to_value() {
            Value::Object(fields) => fields
                .into_iter()
                .filter(|(key, value)| original.get(key) != Some(value))
                .collect(),
            _ => Map::new(),
        }
    }
}

impl CanvasEditor {
    /// Start a draft for an element.
    pub fn begin_draft(&self, id: &ElementId) -> Option<PropertyDraft> {
        self.element(id).map(PropertyDraft::new)
    }

    /// Write the draft's changed fields back and commit once.
    ///
    /// Only fields edited in the draft are written, so a move that happened
    /// while the panel was open is kept. The draft is rebased on success.
    pub fn apply_draft(&mut self, draft: &mut PropertyDraft) -> bool {
        if !self.can_mutate() || !draft.is_dirty() {
            return false;
        }
        let Some(idx) = self.index_of(draft.element_id()) else {
            return false;
        };
        self.commit_pending();

        let config_changes = draft.config_changes();
        let config = if config_changes.is_empty() {
            None
        } else {
            match self.elements[idx].config.merged(&config_changes) {
                Ok(config) => Some(config),
                Err(e) => {
                    log::warn!("Rejected draft for {}: {e}", draft.element_id());
                    return false;
                }
            }
        };

        let element = &mut self.elements[idx];
        element.apply_geometry(draft.geometry_changes());
        if let Some(config) = config {
            element.config = config;
        }
        if draft.original.dataset_id != draft.working.dataset_id {
            element.dataset_id = draft.working.dataset_id.clone();
        }
        *draft = PropertyDraft::new(element);

        self.pending_commit = true;
        let committed = self.commit_pending();
        self.reconcile_selection();
        committed
    }
}
