//! Core engine implementation

use crate::{
    application::{AppEvent, Application},
    config::ConfigError,
    core::config::ApplicationConfig,
    foundation::ids::IdAllocator,
    foundation::logging::{debug, info},
    looper::{FrameHost, FrameInfo, LoopError, Looper, Stage},
    render::{DrawingSurface, RenderError, Renderer},
};
use thiserror::Error;

/// Main engine struct
///
/// The engine owns the renderer, the looper and the drawing surface, and
/// routes host input into the scene's pointer state.
pub struct Engine {
    /// Object registry, scene and camera
    pub renderer: Renderer,

    /// Frame scheduler
    pub looper: Looper,

    /// Surface frames are drawn on
    surface: Box<dyn DrawingSurface>,

    /// Configuration the engine was built from
    config: ApplicationConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("renderer", &self.renderer)
            .field("looper", &self.looper)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create a new engine instance
    ///
    /// The renderer starts with a camera built from the configuration.
    pub fn new(config: ApplicationConfig, surface: Box<dyn DrawingSurface>) -> Result<Self, EngineError> {
        info!("Initializing engine...");
        config.validate()?;
        if surface.width() <= 0.0 || surface.height() <= 0.0 {
            return Err(EngineError::InitializationFailed(format!(
                "Drawing surface has no area ({}x{})",
                surface.width(),
                surface.height()
            )));
        }

        if config.engine.debug_mode {
            debug!("Engine configuration: {:?}", config);
        }

        let renderer = Renderer::from_config(&config, IdAllocator::new());
        let looper = Looper::from_config(&config.looper);

        Ok(Self {
            renderer,
            looper,
            surface,
            config,
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// Frames come from `host`; the loop ends when the host runs dry, the
    /// application quits or a frame fails.
    pub fn run<T: Application>(
        config: ApplicationConfig,
        app: &mut T,
        host: &mut dyn FrameHost,
        surface: Box<dyn DrawingSurface>,
    ) -> Result<(), EngineError> {
        let mut engine = Self::new(config, surface)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        info!("Starting main loop...");

        let result = engine.main_loop(app, host);

        engine.looper.stop(host);
        app.cleanup(&mut engine);

        info!("Engine shutdown complete");
        result
    }

    fn main_loop<T: Application>(&mut self, app: &mut T, host: &mut dyn FrameHost) -> Result<(), EngineError> {
        let mut frame = self.trigger(host)?;
        while self.running {
            if let Some(info) = frame {
                app.update(self, &info)
                    .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;
            }
            if !self.running {
                break;
            }
            let Some(now) = host.next_frame() else {
                debug!("Frame host has no more frames");
                break;
            };
            frame = self.tick(host, now)?;
        }
        Ok(())
    }

    /// Start the looper and render the first frame
    pub fn trigger(&mut self, host: &mut dyn FrameHost) -> Result<Option<FrameInfo>, EngineError> {
        let mut stage = Stage {
            renderer: &mut self.renderer,
            surface: self.surface.as_mut(),
        };
        Ok(self.looper.trigger(host, Some(&mut stage))?)
    }

    /// Render one frame at host time `now`
    pub fn tick(&mut self, host: &mut dyn FrameHost, now: f64) -> Result<Option<FrameInfo>, EngineError> {
        let mut stage = Stage {
            renderer: &mut self.renderer,
            surface: self.surface.as_mut(),
        };
        Ok(self.looper.tick(host, now, Some(&mut stage))?)
    }

    /// Handle an application event
    pub fn handle_event(&mut self, event: AppEvent) -> Result<(), EngineError> {
        let scene = self.renderer.scene_mut();
        match event {
            AppEvent::WindowResized { width, height } => {
                scene.resize(width, height);
            }
            AppEvent::WindowCloseRequested => {
                self.running = false;
            }
            AppEvent::CursorEntered => {
                scene.pointer_mut().set_in_window(true);
            }
            AppEvent::CursorLeft => {
                let pointer = scene.pointer_mut();
                pointer.set_in_window(false);
                pointer.reset_buttons();
            }
            AppEvent::MouseButton { button, pressed } => {
                if pressed {
                    scene.pointer_mut().press(button);
                } else {
                    scene.pointer_mut().release(button);
                }
            }
            AppEvent::MouseMoved { x, y } => {
                scene.pointer_mut().move_to(x, y);
            }
            AppEvent::MouseWheel { delta_x, delta_y } => {
                scene.pointer_mut().scroll(delta_x, delta_y);
            }
        }

        Ok(())
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop keeps going
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Configuration the engine was built from
    pub const fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Get the renderer
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Get mutable access to the renderer
    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Get the looper
    pub const fn looper(&self) -> &Looper {
        &self.looper
    }

    /// Get mutable access to the looper
    pub fn looper_mut(&mut self) -> &mut Looper {
        &mut self.looper
    }

    /// Get the drawing surface
    pub fn surface(&self) -> &dyn DrawingSurface {
        self.surface.as_ref()
    }

    /// Get mutable access to the drawing surface
    pub fn surface_mut(&mut self) -> &mut dyn DrawingSurface {
        self.surface.as_mut()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Frame scheduling error, including failed frames
    #[error("Loop error: {0}")]
    Loop(#[from] LoopError),

    /// Rendering error outside the looper
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}
