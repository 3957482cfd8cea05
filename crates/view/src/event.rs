//! Input event vocabulary
//!
//! The host toolkit translates its native events into these types before
//! handing them to the view.

use url::Url;

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

/// Keyboard modifier state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Ctrl key is held
    pub ctrl: bool,
    /// Alt key is held
    pub alt: bool,
    /// Shift key is held
    pub shift: bool,
}

impl Modifiers {
    /// Check that no modifier is held
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift)
    }
}

/// Keys the view reacts to; everything else arrives as `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Other(u32),
}

/// Payload of a drag-and-drop event
#[derive(Debug, Clone, Default)]
pub struct DropPayload {
    /// URLs carried by the drop, in source order
    pub urls: Vec<Url>,
    /// Plain text carried by the drop
    pub text: Option<String>,
}

impl DropPayload {
    /// Check whether the payload carries any URL
    pub fn has_urls(&self) -> bool {
        !self.urls.is_empty()
    }
}
