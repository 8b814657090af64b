//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so every host binds the same keys.

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Remove every selected node and edge.
    Delete,
    ZoomIn,
    ZoomOut,
    /// Scale back to 1 and translation back to the origin.
    ResetView,
    /// Abort the gesture in flight and clear the selection.
    Cancel,
}

/// Resolves key events into shortcut actions.
///
/// `ctrl` and `meta` are interchangeable so ⌘ works on macOS and Ctrl
/// elsewhere.
pub struct ShortcutMap;

impl ShortcutMap {
    /// `key` is the `KeyboardEvent.key` value (e.g. `"="`, `"Delete"`).
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.command() {
            return match key {
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}
