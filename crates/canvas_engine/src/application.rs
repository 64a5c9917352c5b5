//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use crate::looper::FrameInfo;
use crate::render::RenderError;
use crate::scene::{MouseButton, ObjectError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a scene with the engine.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Use this to add the
    /// initial objects and configure the camera.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called after every rendered frame.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `frame` - Timing and render metrics of the frame just drawn
    fn update(&mut self, engine: &mut Engine, frame: &FrameInfo) -> Result<(), AppError>;

    /// Handle application events
    ///
    /// Called when the application receives window or pointer input.
    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        // Default implementation forwards to engine
        Ok(engine.handle_event(event)?)
    }

    /// Cleanup the application
    ///
    /// Called when the application is shutting down.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Registry or frame error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Object operation error
    #[error("Object error: {0}")]
    Object(#[from] ObjectError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Application events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// Window was resized
    WindowResized {
        /// New window width
        width: f64,
        /// New window height
        height: f64,
    },

    /// Window close requested
    WindowCloseRequested,

    /// Pointer entered the window
    CursorEntered,

    /// Pointer left the window
    CursorLeft,

    /// Mouse button event
    MouseButton {
        /// The mouse button that was pressed/released
        button: MouseButton,
        /// Whether the button was pressed (true) or released (false)
        pressed: bool,
    },

    /// Mouse movement
    MouseMoved {
        /// New X coordinate
        x: f64,
        /// New Y coordinate
        y: f64,
    },

    /// Mouse wheel
    MouseWheel {
        /// Horizontal scroll delta
        delta_x: f64,
        /// Vertical scroll delta
        delta_y: f64,
    },
}
