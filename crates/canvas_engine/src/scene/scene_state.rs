//! Scene: logical drawing area plus the pointer that acts on it

use crate::core::config::SceneConfig;
use crate::foundation::math::Vec2;
use crate::render::camera::Camera;

use super::pointer::PointerState;

/// Logical drawing area and its live pointer
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    background: String,
    pointer: PointerState,
}

impl Scene {
    /// Create a new scene of the given logical size
    pub fn new(width: f64, height: f64) -> Self {
        Self::from_config(&SceneConfig::new(width, height))
    }

    /// Create a scene from configuration
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            background: config.background.clone(),
            pointer: PointerState::new(),
        }
    }

    /// Logical width
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Logical height
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Logical size as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Change the logical size
    ///
    /// The camera viewport is not touched; it owns its own size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Background color used by `paint_scene`
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Set the background color
    pub fn set_background(&mut self, color: impl Into<String>) {
        self.background = color.into();
    }

    /// Pointer state
    pub const fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Mutable pointer state, for feeding window input
    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    /// Pointer position corrected by the camera, in world space
    pub fn fixed_mouse_position(&self, camera: &Camera) -> Vec2 {
        camera.screen_to_world(self.pointer.position())
    }
}
