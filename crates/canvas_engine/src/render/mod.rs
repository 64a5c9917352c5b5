//! # Rendering System
//!
//! Turns the object registry into frames on a [`DrawingSurface`].
//!
//! ## Architecture
//!
//! - **Renderer**: registry owner and per-frame pass
//! - **Camera**: pan and zoom applied before drawing, focus animations
//! - **Culling**: margin-expanded view band test
//! - **Surface**: the drawing context trait and a recording implementation

pub mod camera;
pub mod culling;
pub mod renderer;
pub mod surface;

pub use camera::{Camera, Scaling};
pub use culling::ViewBand;
pub use renderer::{RenderError, RenderMetrics, Renderer};
pub use surface::{DrawCommand, DrawingSurface, RecordingSurface};
