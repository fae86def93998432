//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the browser bridge and native hosts resolve keys the same way.

use seat_core::model::ObjectType;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Placement tools ──
    ArmTool(ObjectType),

    // ── Edit ──
    /// Disarm the tool and clear the selection.
    Cancel,
    Delete,
    /// Remove every object (⌘Delete).
    ClearAll,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘, elsewhere `ctrl` plays the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"s"`, `"Delete"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        _shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd {
            return match key {
                "Delete" | "Backspace" => Some(ShortcutAction::ClearAll),
                _ => None,
            };
        }

        match key {
            "s" | "S" => Some(ShortcutAction::ArmTool(ObjectType::Seat)),
            "r" | "R" => Some(ShortcutAction::ArmTool(ObjectType::TableRound)),
            "t" | "T" => Some(ShortcutAction::ArmTool(ObjectType::TableRect)),
            "g" | "G" => Some(ShortcutAction::ArmTool(ObjectType::Stage)),
            "p" | "P" => Some(ShortcutAction::ArmTool(ObjectType::Plant)),
            "Escape" => Some(ShortcutAction::Cancel),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "+" | "=" => Some(ShortcutAction::ZoomIn),
            "-" => Some(ShortcutAction::ZoomOut),
            "0" => Some(ShortcutAction::ZoomReset),
            _ => None,
        }
    }
}
