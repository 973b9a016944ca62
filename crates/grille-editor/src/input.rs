//! Input abstraction layer.
//!
//! The host normalizes its mouse and keyboard events into `InputEvent`s in
//! view coordinates before handing them to the controller.

use grille_core::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
    },

    /// Pointer moved, with or without a button held.
    PointerMove { x: f64, y: f64 },

    PointerUp {
        x: f64,
        y: f64,
        button: PointerButton,
    },

    /// Mouse wheel. Positive `delta` zooms in.
    Wheel { delta: f64 },

    Key {
        key: String,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    pub fn down(x: f64, y: f64, button: PointerButton) -> Self {
        Self::PointerDown { x, y, button }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn up(x: f64, y: f64, button: PointerButton) -> Self {
        Self::PointerUp { x, y, button }
    }

    pub fn key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.into(),
            modifiers,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}
