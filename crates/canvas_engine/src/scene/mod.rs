//! Scene objects and the pointer that drives them
//!
//! ## Architecture
//!
//! ```text
//! Scene (size + pointer)
//!      ↓
//! RenderObject (ObjectCore: transform, bounds, style, events, tweens)
//!      ↓
//! Renderer (registry, culling, draw/update)
//! ```
//!
//! Concrete shapes implement [`RenderObject`] and keep an [`ObjectCore`] for
//! everything the engine needs to know about them.

pub mod bounds;
pub mod drag;
pub mod events;
pub mod object;
pub mod pointer;
pub mod scene_state;
pub mod style;

pub use bounds::{Bounds, Extent};
pub use drag::{DragAxis, DragOptions};
pub use events::{EventPayload, EventRegistry, InteractionState, ObjectEvent};
pub use object::{AnimatedField, DrawOutcome, ObjectCore, RenderObject, SpriteAnimation, UpdateContext};
pub use pointer::{MouseButton, MouseButtons, PointerSnapshot, PointerState, WheelDelta};
pub use scene_state::Scene;
pub use style::{StyleBag, StyleGroups, StyleValue};

/// Errors raised by render object operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The operation needs a field this object's bounds do not have
    #[error("cannot {op}: {kind} object has no {field}")]
    MissingField {
        /// Operation that was attempted
        op: &'static str,
        /// Field it needed
        field: &'static str,
        /// Bounds kind of the object
        kind: &'static str,
    },

    /// A style group with this name already exists
    #[error("style group '{0}' already exists")]
    StyleGroupExists(String),

    /// No style group with this name exists
    #[error("style group '{0}' does not exist")]
    StyleGroupMissing(String),

    /// `enable_dragging` was called before `configure_dragging`
    #[error("dragging must be configured before it is enabled")]
    DraggingNotConfigured,

    /// No easing curve has this name
    #[error("unknown easing '{0}'")]
    UnknownEasing(String),

    /// Failure reported by a concrete object's draw or update
    #[error("{0}")]
    Failed(String),
}
