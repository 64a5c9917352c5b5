//! # Core Engine Module
//!
//! Shared abstractions used throughout the engine.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for the scene, camera, renderer and looper
//! - **Foundation**: Low-level utilities (math, ids, time, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    CameraConfig,
    Config,
    ConfigError,
    ConfigFormat,
    EngineConfig,
    LooperConfig,
    RendererConfig,
    SceneConfig,
};
