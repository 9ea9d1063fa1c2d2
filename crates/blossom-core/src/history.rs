//! Linear undo/redo over whole-page snapshots.

use crate::config::MAX_UNDO_HISTORY;
use crate::elements::Element;

/// An immutable copy of one page's element list.
pub type Snapshot = Vec<Element>;

/// Bounded linear history with a cursor.
///
/// `entries[cursor]` mirrors the live element list. Entries before the cursor
/// are undo targets, entries after it are redo targets. The stack is never
/// empty.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<Snapshot>,
    cursor: usize,
    capacity: usize,
}

impl HistoryStack {
    /// Seed a history with the starting element list.
    pub fn new(initial: &[Element], capacity: usize) -> Self {
        Self {
            entries: vec![initial.to_vec()],
            cursor: 0,
            capacity: capacity.max(2),
        }
    }

    /// Push a copy of `elements`, discarding any redo targets.
    pub fn commit(&mut self, elements: &[Element]) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(elements.to_vec());

        // Limit history size
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        log::debug!(
            "History commit: {} elements, {}/{} entries",
            elements.len(),
            self.entries.len(),
            self.capacity
        );
    }

    /// Step back. Returns `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&[Element]> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        log::debug!("Undo to entry {}", self.cursor);
        Some(&self.entries[self.cursor])
    }

    /// Step forward. Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&[Element]> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        log::debug!("Redo to entry {}", self.cursor);
        Some(&self.entries[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &[Element] {
        &self.entries[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(&[], MAX_UNDO_HISTORY)
    }
}
