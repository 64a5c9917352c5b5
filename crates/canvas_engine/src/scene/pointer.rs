//! Live pointer state shared by every object in a scene
//!
//! Window events write into [`PointerState`]; objects read it once per frame
//! during their event update. Wheel input accumulates here until the renderer
//! takes a per-frame snapshot.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

bitflags! {
    /// Set of mouse buttons currently held
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        /// Primary button
        const LEFT = 1;
        /// Secondary button
        const RIGHT = 1 << 1;
        /// Wheel button
        const MIDDLE = 1 << 2;
    }
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

impl MouseButton {
    /// The flag this button occupies in [`MouseButtons`]
    pub const fn flag(self) -> MouseButtons {
        match self {
            Self::Left => MouseButtons::LEFT,
            Self::Right => MouseButtons::RIGHT,
            Self::Middle => MouseButtons::MIDDLE,
        }
    }
}

/// Accumulated scroll input
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount
    pub delta_x: f64,
    /// Vertical scroll amount
    pub delta_y: f64,
}

/// Copy of the pointer as seen by one event firing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSnapshot {
    /// Screen-space x
    pub x: f64,
    /// Screen-space y
    pub y: f64,
    /// Buttons held
    pub buttons: MouseButtons,
    /// Wheel input delivered this frame
    pub wheel: Option<WheelDelta>,
    /// Whether the pointer is over the window
    pub in_window: bool,
}

/// Screen-space pointer state
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    x: f64,
    y: f64,
    buttons: MouseButtons,
    press_generation: u64,
    pending_wheel: Option<WheelDelta>,
    in_window: bool,
}

impl PointerState {
    /// Create a pointer outside the window with no buttons held
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer moved to a screen position inside the window
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.in_window = true;
    }

    /// Pointer entered or left the window
    pub fn set_in_window(&mut self, in_window: bool) {
        self.in_window = in_window;
    }

    /// A button went down
    ///
    /// Every transition from released to pressed starts a new press
    /// generation; objects use it to fire `mouseDown` once per press.
    pub fn press(&mut self, button: MouseButton) {
        if !self.buttons.contains(button.flag()) {
            self.press_generation += 1;
        }
        self.buttons.insert(button.flag());
    }

    /// A button went up
    pub fn release(&mut self, button: MouseButton) {
        self.buttons.remove(button.flag());
    }

    /// Release every button
    pub fn reset_buttons(&mut self) {
        self.buttons = MouseButtons::empty();
    }

    /// Accumulate scroll input until the next frame snapshot
    pub fn scroll(&mut self, delta_x: f64, delta_y: f64) {
        let wheel = self.pending_wheel.get_or_insert_with(WheelDelta::default);
        wheel.delta_x += delta_x;
        wheel.delta_y += delta_y;
    }

    /// Take the accumulated scroll input, leaving none pending
    pub fn take_wheel(&mut self) -> Option<WheelDelta> {
        self.pending_wheel.take()
    }

    /// Scroll input waiting for the next frame
    pub const fn pending_wheel(&self) -> Option<WheelDelta> {
        self.pending_wheel
    }

    /// Screen-space position
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Buttons currently held
    pub const fn buttons(&self) -> MouseButtons {
        self.buttons
    }

    /// Whether any button is held
    pub const fn is_pressed(&self) -> bool {
        !self.buttons.is_empty()
    }

    /// Number of discrete presses seen so far
    pub const fn press_generation(&self) -> u64 {
        self.press_generation
    }

    /// Whether the pointer is over the window
    pub const fn in_window(&self) -> bool {
        self.in_window
    }

    /// Snapshot for an event payload, carrying this frame's wheel input
    pub const fn snapshot(&self, wheel: Option<WheelDelta>) -> PointerSnapshot {
        PointerSnapshot {
            x: self.x,
            y: self.y,
            buttons: self.buttons,
            wheel,
            in_window: self.in_window,
        }
    }
}
