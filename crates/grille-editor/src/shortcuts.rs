//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. On macOS
//! `meta` is ⌘; elsewhere `ctrl` serves the same role.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tools ──
    ToggleEraser,
    ToggleSelection,
    PlaceForce,

    // ── Edit ──
    Undo,
    Redo,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ToggleGrid,

    // ── File ──
    New,
    Open,
    Save,
    SaveAs,
    Export,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key`-style value (e.g. `"z"`, `"+"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        if alt {
            return None;
        }
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "s" | "S" => Some(ShortcutAction::SaveAs),
                // Shift+= arrives as "+" on most layouts
                "+" => Some(ShortcutAction::ZoomIn),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetZoom),
                "n" | "N" => Some(ShortcutAction::New),
                "o" | "O" => Some(ShortcutAction::Open),
                "s" | "S" => Some(ShortcutAction::Save),
                "e" | "E" => Some(ShortcutAction::Export),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        match key {
            "e" | "E" => Some(ShortcutAction::ToggleEraser),
            "s" | "S" => Some(ShortcutAction::ToggleSelection),
            "f" | "F" => Some(ShortcutAction::PlaceForce),
            "g" | "G" => Some(ShortcutAction::ToggleGrid),
            _ => None,
        }
    }
}
