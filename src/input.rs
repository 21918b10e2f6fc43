//! Input primitives: mouse buttons, modifier keys, keyboard keys, and the
//! persistent UI state shared between the engine and the renderer.
//!
//! The interaction controllers (`image_control`, `logo_control`,
//! `text_control`) consume these types; the keyboard helpers centralize the
//! key-name matching so every controller interprets shortcuts identically.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Windows/Linux or Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser
/// (e.g. `"Delete"`, `"ArrowLeft"`, `"+"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether the base image is in edit mode (drag/scale enabled,
    /// letterbox fit suspended).
    pub edit_mode: bool,
    /// The cursor hint most recently pushed to the host.
    pub cursor: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self { edit_mode: false, cursor: "default".to_owned() }
    }
}

/// Per-axis unit delta for the arrow keys, screen-down positive.
#[must_use]
pub fn arrow_delta(key: &Key) -> Option<(f64, f64)> {
    match key.as_str() {
        "ArrowLeft" => Some((-1.0, 0.0)),
        "ArrowRight" => Some((1.0, 0.0)),
        "ArrowUp" => Some((0.0, -1.0)),
        "ArrowDown" => Some((0.0, 1.0)),
        _ => None,
    }
}

/// True for the grow keys: `+` and its unshifted `=`.
#[must_use]
pub fn is_grow_key(key: &Key) -> bool {
    matches!(key.as_str(), "+" | "=")
}

/// True for the shrink keys: `-` and its shifted `_`.
#[must_use]
pub fn is_shrink_key(key: &Key) -> bool {
    matches!(key.as_str(), "-" | "_")
}

/// True for `Delete` and `Backspace`.
#[must_use]
pub fn is_delete_key(key: &Key) -> bool {
    matches!(key.as_str(), "Delete" | "Backspace")
}

/// True for the rotate shortcut: `R` with Ctrl or Cmd held.
#[must_use]
pub fn is_rotate_chord(key: &Key, modifiers: Modifiers) -> bool {
    modifiers.command() && matches!(key.as_str(), "r" | "R")
}
