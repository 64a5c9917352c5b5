//! # Unified Configuration System
//!
//! All configuration structures for the engine live here. Each subsystem gets
//! its own section so applications can load a single file and hand the pieces
//! to the scene, camera, renderer and looper.
//!
//! ## Example (TOML)
//!
//! ```toml
//! [engine]
//! log_level = "debug"
//! debug_mode = true
//!
//! [scene]
//! width = 1280.0
//! height = 720.0
//! background = "#101018"
//!
//! [camera]
//! x = 0.0
//! y = 0.0
//! scale = 1.0
//! off_screen_rendering = false
//!
//! [renderer]
//! visibility_margin = 30.0
//!
//! [looper]
//! perfect_frame_rate = 60.0
//! frame_rate_window_ms = 1000.0
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// Margin, in world units before scale division, added around the camera view
/// when deciding whether an object is visible.
pub const DEFAULT_VISIBILITY_MARGIN: f64 = 30.0;

/// Reference frame rate that delta time is normalized against
pub const DEFAULT_PERFECT_FRAME_RATE: f64 = 60.0;

/// Width of the rolling window used to estimate the frame rate
pub const DEFAULT_FRAME_RATE_WINDOW_MS: f64 = 1000.0;

/// # Engine Configuration
///
/// Core engine behavior: logging and debug features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    #[must_use]
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
///
/// Logical size of the drawing area and the color used by `paint_scene`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Logical width in pixels
    pub width: f64,
    /// Logical height in pixels
    pub height: f64,
    /// Background fill color
    pub background: String,
}

impl SceneConfig {
    /// Create a scene configuration of the given size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: "#000000".to_string(),
        }
    }

    /// Set the background color
    #[must_use]
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// # Camera Configuration
///
/// Initial placement and zoom of the camera. Its viewport size follows the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial horizontal translation
    pub x: f64,
    /// Initial vertical translation
    pub y: f64,
    /// Initial uniform zoom
    pub scale: f64,
    /// Disable visibility culling entirely
    pub off_screen_rendering: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            off_screen_rendering: false,
        }
    }
}

/// # Renderer Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Culling margin around the camera view
    pub visibility_margin: f64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            visibility_margin: DEFAULT_VISIBILITY_MARGIN,
        }
    }
}

/// # Looper Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LooperConfig {
    /// Frame rate at which delta time equals 1.0
    pub perfect_frame_rate: f64,
    /// Rolling window used for the frame rate estimate
    pub frame_rate_window_ms: f64,
}

impl Default for LooperConfig {
    fn default() -> Self {
        Self {
            perfect_frame_rate: DEFAULT_PERFECT_FRAME_RATE,
            frame_rate_window_ms: DEFAULT_FRAME_RATE_WINDOW_MS,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
/// This is the main configuration structure applications should use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Scene configuration
    pub scene: SceneConfig,
    /// Camera configuration
    pub camera: CameraConfig,
    /// Renderer configuration
    pub renderer: RendererConfig,
    /// Frame loop configuration
    pub looper: LooperConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(self.scene.width > 0.0 && self.scene.height > 0.0) {
            return invalid("scene width and height must be positive");
        }
        if !(self.camera.scale > 0.0) {
            return invalid("camera scale must be positive");
        }
        if !(self.renderer.visibility_margin >= 0.0) {
            return invalid("visibility margin cannot be negative");
        }
        if !(self.looper.perfect_frame_rate > 0.0) {
            return invalid("perfect frame rate must be positive");
        }
        if !(self.looper.frame_rate_window_ms > 0.0) {
            return invalid("frame rate window must be positive");
        }
        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.renderer.visibility_margin, 30.0);
        assert_eq!(config.looper.perfect_frame_rate, 60.0);
    }

    #[test]
    fn test_rejects_zero_frame_rate() {
        let mut config = ApplicationConfig::default();
        config.looper.perfect_frame_rate = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_nan_scale() {
        let mut config = ApplicationConfig::default();
        config.camera.scale = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ApplicationConfig = toml::from_str(
            r#"
            [scene]
            width = 640.0
            height = 480.0

            [looper]
            perfect_frame_rate = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(config.scene.width, 640.0);
        assert_eq!(config.scene.background, "#000000");
        assert_eq!(config.looper.perfect_frame_rate, 30.0);
        assert_eq!(config.looper.frame_rate_window_ms, 1000.0);
        assert_eq!(config.renderer.visibility_margin, 30.0);
    }

    #[test]
    fn test_ron_roundtrip_through_file() {
        let dir = std::env::temp_dir().join(format!("canvas_engine_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("app.ron");

        let mut config = ApplicationConfig::default();
        config.engine = config.engine.with_log_level("trace");
        config.camera.off_screen_rendering = true;
        config.save_to_file(&path).unwrap();

        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = ApplicationConfig::default().save_to_file("settings.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
