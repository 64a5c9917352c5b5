//! Animation support: easing curves and frame-driven tweens

pub mod easing;
pub mod tween;

pub use easing::Easing;
pub use tween::{AnimationSpec, TweenHandle, TweenScheduler, TweenStatus};
