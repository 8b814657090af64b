//! Input abstraction layer.
//!
//! Normalizes host pointer and wheel events into a unified `InputEvent`
//! consumed by the gesture state machine. Coordinates are screen pixels
//! relative to the canvas' top-left corner.

use kurbo::Point;

/// Keyboard modifier state sampled with each event.
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

    /// Ctrl on most platforms, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64, modifiers: Modifiers },
    PointerMove { x: f64, y: f64, modifiers: Modifiers },
    PointerUp { x: f64, y: f64, modifiers: Modifiers },
    /// Pointer left the canvas; any gesture in flight is cancelled.
    PointerLeave,
    /// Scroll wheel. Negative `delta_y` scrolls up (zoom in), positive zooms
    /// out. A zero `delta_y` (pure horizontal scroll) is ignored rather than
    /// treated as a zoom in.
    Wheel { x: f64, y: f64, delta_y: f64 },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        Self::Wheel { x, y, delta_y }
    }

    /// Same event with `modifiers` attached. No-op for events without them.
    pub fn with_modifiers(mut self, mods: Modifiers) -> Self {
        if let Self::PointerDown { modifiers, .. }
        | Self::PointerMove { modifiers, .. }
        | Self::PointerUp { modifiers, .. } = &mut self
        {
            *modifiers = mods;
        }
        self
    }

    /// Screen position, if this event has one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Wheel { x, y, .. } => Some(Point::new(*x, *y)),
            Self::PointerLeave => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. } => *modifiers,
            _ => Modifiers::NONE,
        }
    }
}
