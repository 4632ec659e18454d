//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so the browser bridge and native tests
//! share one table.
//!
//! - `1`–`5` switch mode (Draw, Write, Erase, Move, Select)
//! - ⌘Z undo, ⌘⇧Z / ⌘Y redo
//! - ⌘= / ⌘- zoom step
//! - Escape clears the selection

use ink_core::Mode;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Mode switching ──
    SetMode(Mode),

    // ── Edit ──
    Undo,
    Redo,

    // ── View ──
    ZoomIn,
    ZoomOut,

    // ── UI ──
    Deselect,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Escape"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                // ⇧= reports "+" on most layouts
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        // ── Single keys (no modifiers) ──
        if key == "Escape" {
            return Some(ShortcutAction::Deselect);
        }
        Mode::ALL
            .into_iter()
            .find(|m| m.shortcut() == key)
            .map(ShortcutAction::SetMode)
    }
}
