//! Keyboard shortcut decoding.

use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key press with modifiers. `key` uses DOM key names ("z", "Delete").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// Which kind of control holds keyboard focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Focus {
    #[default]
    Canvas,
    /// A text field; native text editing wins over element shortcuts.
    TextInput,
}

/// Editor actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shortcut {
    Undo,
    Redo,
    Delete,
    Duplicate,
    Save,
}

impl Shortcut {
    /// Decode a key press, ignoring focus.
    pub fn from_key(press: &KeyPress) -> Option<Self> {
        let m = press.modifiers;
        let key = press.key.to_lowercase();
        match key.as_str() {
            "z" if m.command() && m.shift => Some(Shortcut::Redo),
            "z" if m.command() => Some(Shortcut::Undo),
            "y" if m.command() => Some(Shortcut::Redo),
            "d" if m.command() => Some(Shortcut::Duplicate),
            "s" if m.command() => Some(Shortcut::Save),
            "delete" if !m.command() => Some(Shortcut::Delete),
            _ => None,
        }
    }

    /// Decode a key press, dropping element shortcuts while a text field has focus.
    pub fn resolve(press: &KeyPress, focus: Focus) -> Option<Self> {
        let shortcut = Self::from_key(press)?;
        match focus {
            Focus::Canvas => Some(shortcut),
            Focus::TextInput => shortcut.allowed_in_text_input().then_some(shortcut),
        }
    }

    pub fn allowed_in_text_input(&self) -> bool {
        matches!(self, Shortcut::Save)
    }

    /// Whether the action changes the page.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Shortcut::Save)
    }
}
