//! Per-object pointer events
//!
//! Objects own an [`EventRegistry`] holding at most one regular callback and
//! at most one one-shot callback per [`ObjectEvent`]. The [`InteractionState`]
//! turns successive pointer samples into the events to fire.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::foundation::ids::ObjectId;
use crate::foundation::math::Vec2;

use super::pointer::PointerSnapshot;

/// Events a render object can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectEvent {
    /// Pointer moved onto the object
    MouseEnter,
    /// Pointer left the object
    MouseOut,
    /// A press started over the object
    MouseDown,
    /// The press that started over the object ended over it
    MouseUp,
    /// Fired right after `MouseUp`
    Click,
    /// Wheel input arrived while the pointer was over the object
    MouseWheel,
    /// Dragging started
    DragStart,
    /// The object moved with the pointer
    Drag,
    /// Dragging ended
    DragEnd,
    /// The object was visible during this frame's update
    Render,
}

impl ObjectEvent {
    /// Every event kind
    pub const ALL: [Self; 10] = [
        Self::MouseEnter,
        Self::MouseOut,
        Self::MouseDown,
        Self::MouseUp,
        Self::Click,
        Self::MouseWheel,
        Self::DragStart,
        Self::Drag,
        Self::DragEnd,
        Self::Render,
    ];

    /// Event name as used by listeners
    pub const fn name(self) -> &'static str {
        match self {
            Self::MouseEnter => "mouseEnter",
            Self::MouseOut => "mouseOut",
            Self::MouseDown => "mouseDown",
            Self::MouseUp => "mouseUp",
            Self::Click => "click",
            Self::MouseWheel => "mouseWheel",
            Self::DragStart => "dragStart",
            Self::Drag => "drag",
            Self::DragEnd => "dragEnd",
            Self::Render => "render",
        }
    }
}

impl fmt::Display for ObjectEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectEvent {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|event| event.name() == name)
            .ok_or_else(|| format!("unknown event '{name}'"))
    }
}

/// What a callback receives
#[derive(Debug, Clone, PartialEq)]
pub struct EventPayload {
    /// Which event fired
    pub event: ObjectEvent,
    /// Object that fired it
    pub target: ObjectId,
    /// Camera-corrected pointer position; absent for `Render`
    pub mouse_position: Option<Vec2>,
    /// Raw pointer state; absent for `Render`
    pub mouse: Option<PointerSnapshot>,
    /// Frame timestamp in milliseconds
    pub timestamp: f64,
}

/// Event callback
pub type EventCallback = Box<dyn FnMut(&EventPayload)>;

/// Callbacks registered on one object
#[derive(Default)]
pub struct EventRegistry {
    handlers: HashMap<ObjectEvent, EventCallback>,
    once: HashMap<ObjectEvent, EventCallback>,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("once", &self.once.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EventRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the callback for `event`, replacing any previous one
    pub fn on(&mut self, event: ObjectEvent, callback: impl FnMut(&EventPayload) + 'static) {
        self.handlers.insert(event, Box::new(callback));
    }

    /// Register a callback that runs on the next firing of `event` only
    pub fn once(&mut self, event: ObjectEvent, callback: impl FnMut(&EventPayload) + 'static) {
        self.once.insert(event, Box::new(callback));
    }

    /// Remove the regular callback for `event`
    pub fn off(&mut self, event: ObjectEvent) -> bool {
        self.handlers.remove(&event).is_some()
    }

    /// Whether anything listens to `event`
    pub fn has_listener(&self, event: ObjectEvent) -> bool {
        self.handlers.contains_key(&event) || self.once.contains_key(&event)
    }

    /// Run the callbacks for `payload.event`; returns how many ran
    pub fn fire(&mut self, payload: &EventPayload) -> usize {
        let mut ran = 0;
        if let Some(handler) = self.handlers.get_mut(&payload.event) {
            handler(payload);
            ran += 1;
        }
        if let Some(mut handler) = self.once.remove(&payload.event) {
            handler(payload);
            ran += 1;
        }
        ran
    }
}

/// Pointer facts an object needs for one event step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSample {
    /// Pointer is over the window and inside the object's bounds
    pub inside: bool,
    /// Any button is held
    pub pressed: bool,
    /// Current press generation
    pub press_generation: u64,
    /// Wheel input arrived this frame
    pub wheel: bool,
}

/// Hover and press state of one object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// Pointer is currently over the object
    pub has_entered: bool,
    /// Pointer left since it last entered
    pub has_left: bool,
    /// The last press ended in a click
    pub has_clicked: bool,
    /// A press that started over the object is held
    pub is_down: bool,
    /// The last press has been released
    pub is_up: bool,
    last_press: u64,
    synced: bool,
}

impl InteractionState {
    /// Advance the state machine; returns the events to fire, in order
    pub fn step(&mut self, sample: PointerSample) -> Vec<ObjectEvent> {
        let mut fired = Vec::new();

        // presses made before the first sample belong to nobody
        if !self.synced {
            self.synced = true;
            if !sample.pressed {
                self.last_press = sample.press_generation;
            }
        }

        if sample.inside && !self.has_entered {
            self.has_entered = true;
            self.has_left = false;
            fired.push(ObjectEvent::MouseEnter);
        }

        if sample.pressed && sample.press_generation != self.last_press {
            // A press is seen once; one that starts outside never counts
            self.last_press = sample.press_generation;
            if sample.inside && !self.is_down {
                self.is_down = true;
                self.is_up = false;
                self.has_clicked = false;
                fired.push(ObjectEvent::MouseDown);
            }
        } else if !sample.pressed && sample.press_generation != self.last_press {
            // pressed and released between two samples
            self.last_press = sample.press_generation;
            if sample.inside && !self.is_down {
                self.is_up = true;
                self.has_clicked = true;
                fired.extend([ObjectEvent::MouseDown, ObjectEvent::MouseUp, ObjectEvent::Click]);
            }
        }

        if sample.inside && sample.wheel {
            fired.push(ObjectEvent::MouseWheel);
        }

        if !sample.inside && self.has_entered {
            self.has_left = true;
            self.has_entered = false;
            fired.push(ObjectEvent::MouseOut);
        }

        if self.is_down && !sample.pressed {
            self.is_down = false;
            self.is_up = true;
            if sample.inside {
                self.has_clicked = true;
                fired.push(ObjectEvent::MouseUp);
                fired.push(ObjectEvent::Click);
            }
        }

        fired
    }
}
