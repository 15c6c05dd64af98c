//! Input contract consumed by the viewer.
//!
//! The host translates raw window events into these types once per frame:
//! the pointer is sampled as a position plus button level and press edge,
//! and keys arrive as discrete [`KeyInput`] edges.
//!
//! # Main Types
//!
//! - [`PointerState`]: pointer position and primary-button state for a frame.
//! - [`Modifiers`]: keyboard modifiers (Shift, Control, Alt, Super).
//! - [`Key`] / [`KeyInput`]: a key edge together with the held modifiers.

use bitflags::bitflags;
use kurbo::Point;
use std::fmt::Display;

/// Pointer state sampled for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Position in node coordinates.
    pub position: Point,
    /// Primary button is currently held.
    pub button_down: bool,
    /// Primary button went down this frame.
    pub button_just_pressed: bool,
}

impl PointerState {
    /// Pointer hovering at `(x, y)` with the button up.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button_down: false,
            button_just_pressed: false,
        }
    }

    /// Pointer at `(x, y)` with the button going down this frame.
    pub fn pressed(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button_down: true,
            button_just_pressed: true,
        }
    }

    /// Pointer at `(x, y)` with the button held since an earlier frame.
    pub fn held(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button_down: true,
            button_just_pressed: false,
        }
    }
}

bitflags! {
    pub struct Modifiers: u8 {
        const SHIFT   = 0b0001;
        const CONTROL = 0b0010;
        const ALT     = 0b0100;
        const SUPER   = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Modifiers::empty()
    }
}

impl Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if self.contains(Modifiers::SHIFT) {
            parts.push("Shift");
        }
        if self.contains(Modifiers::CONTROL) {
            parts.push("Control");
        }
        if self.contains(Modifiers::ALT) {
            parts.push("Alt");
        }
        if self.contains(Modifiers::SUPER) {
            parts.push("Super");
        }

        if parts.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", parts.join("+"))
        }
    }
}

/// A discrete key edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Typed text (one or more characters).
    Text(String),
    Backspace,
    Enter,
    Left,
    Right,
    Tab,
    Escape,
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Text(t) => write!(f, "{t:?}"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Enter => write!(f, "Enter"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Tab => write!(f, "Tab"),
            Key::Escape => write!(f, "Escape"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Typed text with no modifiers held.
    pub fn text(s: impl Into<String>) -> Self {
        Self::new(Key::Text(s.into()), Modifiers::empty())
    }

    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    pub fn super_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SUPER)
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::new(key, Modifiers::empty())
    }
}
