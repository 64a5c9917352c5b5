//! # Canvas Engine
//!
//! A 2D scene-graph engine for interactive canvas applications.
//!
//! ## Features
//!
//! - **Render objects**: position, bounds, styles and per-object pointer events
//! - **Camera**: pan, zoom and animated focus on objects
//! - **Culling**: only objects near the view are drawn and updated
//! - **Looper**: frame scheduling with normalized delta time
//! - **Tweens**: eased property animation driven by frame time
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canvas_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         // Add objects to engine.renderer
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, frame: &FrameInfo) -> Result<(), AppError> {
//!         // Scene logic
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let surface = RecordingSurface::new(config.scene.width, config.scene.height);
//!     let mut host = RealtimeFrameHost::new(60.0).with_frame_limit(600);
//!     Engine::run(config, &mut MyApp, &mut host, Box::new(surface))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;
pub mod foundation;

pub mod animation;
pub mod looper;
pub mod render;
pub mod scene;

mod application;
mod engine;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use application::{AppError, AppEvent, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{AnimationSpec, Easing, TweenHandle, TweenStatus},
        core::config::{ApplicationConfig, CameraConfig, Config, LooperConfig, RendererConfig, SceneConfig},
        foundation::{
            ids::{IdAllocator, ObjectId},
            math::{Affine, Vec2},
        },
        looper::{FrameHost, FrameInfo, Looper, RealtimeFrameHost, SimulatedFrameHost},
        render::{Camera, DrawingSurface, RecordingSurface, RenderError, Renderer, Scaling},
        scene::{
            Bounds, DragAxis, DragOptions, DrawOutcome, EventPayload, MouseButton, ObjectCore, ObjectError,
            ObjectEvent, RenderObject, Scene, UpdateContext,
        },
        AppError, AppEvent, Application, Engine, EngineError,
    };
}
