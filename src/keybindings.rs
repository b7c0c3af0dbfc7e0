//! Customizable keybindings for the editor and viewer.
//!
//! The host translates its native key events into [`KeyCode`] and passes them
//! to [`Editor::key_down`](crate::editor::Editor::key_down) /
//! [`Editor::key_up`](crate::editor::Editor::key_up) together with the current
//! [`Modifiers`].

use serde::{Deserialize, Serialize};

/// A key as seen by the core. Letters are compared case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A printable character key (letters, digits, punctuation).
    Char(char),
    Delete,
    Backspace,
    Enter,
    Escape,
}

impl KeyCode {
    /// Same key with letters folded to lowercase.
    pub fn normalized(self) -> Self {
        match self {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

/// Modifier state sampled with each input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift held: snaps rotation to the configured step.
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true };
}

/// Keyboard-triggered editor actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Held to rotate the selected feature.
    Rotate,
    Duplicate,
    Delete,
    ResetView,
    FinishDraw,
    CancelDraw,
}

impl EditorAction {
    /// Get the display name for this action.
    pub fn name(&self) -> &'static str {
        match self {
            EditorAction::Rotate => "Rotate (hold)",
            EditorAction::Duplicate => "Duplicate",
            EditorAction::Delete => "Delete",
            EditorAction::ResetView => "Reset view",
            EditorAction::FinishDraw => "Finish polygon",
            EditorAction::CancelDraw => "Cancel polygon",
        }
    }

    pub fn all() -> &'static [EditorAction] {
        &[
            EditorAction::Rotate,
            EditorAction::Duplicate,
            EditorAction::Delete,
            EditorAction::ResetView,
            EditorAction::FinishDraw,
            EditorAction::CancelDraw,
        ]
    }
}

/// Keybinding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub rotate: KeyCode,
    pub duplicate: KeyCode,
    pub delete: KeyCode,
    pub reset_view: KeyCode,
    #[serde(default = "default_finish_draw")]
    pub finish_draw: KeyCode,
    #[serde(default = "default_cancel_draw")]
    pub cancel_draw: KeyCode,
}

fn default_finish_draw() -> KeyCode {
    KeyCode::Enter
}

fn default_cancel_draw() -> KeyCode {
    KeyCode::Escape
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            rotate: KeyCode::Char('r'),
            duplicate: KeyCode::Char('d'),
            delete: KeyCode::Delete,
            reset_view: KeyCode::Char('0'),
            finish_draw: default_finish_draw(),
            cancel_draw: default_cancel_draw(),
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action bound to a key press, if any.
    pub fn action_for_key(&self, key: KeyCode) -> Option<EditorAction> {
        let key = key.normalized();
        EditorAction::all()
            .iter()
            .copied()
            .find(|action| self.key_for_action(*action).normalized() == key)
    }

    /// Get the key bound to an action.
    pub fn key_for_action(&self, action: EditorAction) -> KeyCode {
        match action {
            EditorAction::Rotate => self.rotate,
            EditorAction::Duplicate => self.duplicate,
            EditorAction::Delete => self.delete,
            EditorAction::ResetView => self.reset_view,
            EditorAction::FinishDraw => self.finish_draw,
            EditorAction::CancelDraw => self.cancel_draw,
        }
    }

    /// Rebind an action.
    pub fn set_key(&mut self, action: EditorAction, key: KeyCode) {
        let slot = match action {
            EditorAction::Rotate => &mut self.rotate,
            EditorAction::Duplicate => &mut self.duplicate,
            EditorAction::Delete => &mut self.delete,
            EditorAction::ResetView => &mut self.reset_view,
            EditorAction::FinishDraw => &mut self.finish_draw,
            EditorAction::CancelDraw => &mut self.cancel_draw,
        };
        *slot = key;
    }

    /// Check if a key is already used by another action.
    pub fn key_conflict(&self, key: KeyCode, exclude: Option<EditorAction>) -> Option<EditorAction> {
        let key = key.normalized();
        EditorAction::all()
            .iter()
            .copied()
            .filter(|action| Some(*action) != exclude)
            .find(|action| self.key_for_action(*action).normalized() == key)
    }
}

/// Convert a KeyCode to a display string.
pub fn key_to_string(key: KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Escape => "Esc".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let kb = KeyBindings::default();
        assert_eq!(kb.action_for_key(KeyCode::Char('r')), Some(EditorAction::Rotate));
        assert_eq!(kb.action_for_key(KeyCode::Char('D')), Some(EditorAction::Duplicate));
        assert_eq!(kb.action_for_key(KeyCode::Delete), Some(EditorAction::Delete));
        assert_eq!(kb.action_for_key(KeyCode::Char('0')), Some(EditorAction::ResetView));
        assert_eq!(kb.action_for_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_rebind_and_conflict() {
        let mut kb = KeyBindings::default();
        kb.set_key(EditorAction::Rotate, KeyCode::Char('t'));
        assert_eq!(kb.action_for_key(KeyCode::Char('T')), Some(EditorAction::Rotate));
        assert_eq!(kb.action_for_key(KeyCode::Char('r')), None);

        assert_eq!(
            kb.key_conflict(KeyCode::Char('d'), Some(EditorAction::Rotate)),
            Some(EditorAction::Duplicate)
        );
        assert_eq!(kb.key_conflict(KeyCode::Char('d'), Some(EditorAction::Duplicate)), None);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(key_to_string(KeyCode::Char('r')), "R");
        assert_eq!(key_to_string(KeyCode::Escape), "Esc");
    }

    #[test]
    fn test_serde_roundtrip_fills_missing_slots() {
        let json = r#"{"rotate":{"Char":"q"},"duplicate":{"Char":"d"},"delete":"Delete","reset_view":{"Char":"0"}}"#;
        let kb: KeyBindings = serde_json::from_str(json).unwrap();
        assert_eq!(kb.rotate, KeyCode::Char('q'));
        assert_eq!(kb.finish_draw, KeyCode::Enter);
        assert_eq!(kb.cancel_draw, KeyCode::Escape);
    }
}
