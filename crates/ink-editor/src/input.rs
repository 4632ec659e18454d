//! Input abstraction layer.
//!
//! Normalizes pointer, wheel, touch, and keyboard events into a unified
//! `InputEvent` enum consumed by the controller. Coordinates are client
//! (viewport) pixels; mapping to canvas space happens in the controller.

use kurbo::Point;
use smallvec::SmallVec;

/// Keyboard modifier state at the time of an event.
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

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
}

/// Bit of `PointerEvent.buttons` for the primary button.
pub const PRIMARY_BUTTON: u16 = 1;

/// Up to two active touch positions; pinch only looks at the first two.
pub type Touches = SmallVec<[Point; 2]>;

/// A normalized input event from any device.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, pen contact, single-finger touch).
    PointerDown {
        x: f64,
        y: f64,
        /// Pressure from 0.0 (none) to 1.0 (max).
        pressure: f64,
        modifiers: Modifiers,
    },

    /// Pointer moved. `buttons` is the `PointerEvent.buttons` bitmask.
    PointerMove {
        x: f64,
        y: f64,
        pressure: f64,
        buttons: u16,
        modifiers: Modifiers,
    },

    /// Pointer released.
    PointerUp { x: f64, y: f64 },

    /// Mouse wheel or trackpad scroll. `x`/`y` is the cursor position.
    Wheel {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        modifiers: Modifiers,
    },

    TouchStart { touches: Touches },
    TouchMove { touches: Touches },
    TouchEnd,

    /// Keyboard shortcut.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, pressure: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            pressure,
            modifiers: Modifiers::NONE,
        }
    }

    /// Move with the primary button held.
    pub fn pointer_drag(x: f64, y: f64, pressure: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            pressure,
            buttons: PRIMARY_BUTTON,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }
}

/// Distance and centroid of the first two touches, if there are two.
pub fn pinch_geometry(touches: &[Point]) -> Option<(f64, Point)> {
    match touches {
        [a, b, ..] => Some((a.distance(*b), a.midpoint(*b))),
        _ => None,
    }
}
