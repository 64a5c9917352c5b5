//! Scatter demo application
//!
//! Fills a world larger than the viewport with random shapes, adds a toggle
//! and a draggable panel, then replays a scripted pointer session against
//! them. Frames are drawn onto a recording surface; pass `--realtime` to pace
//! them with the wall clock and a `.toml`/`.ron` path to override the config.

mod widgets;

use std::cell::Cell;
use std::rc::Rc;

use canvas_engine::foundation::logging;
use canvas_engine::prelude::*;
use canvas_engine::scene::StyleBag;
use rand::Rng;
use thiserror::Error;

use widgets::{Circle, Rectangle, Toggle};

const WORLD_WIDTH: f64 = 3000.0;
const WORLD_HEIGHT: f64 = 2000.0;
const SHAPE_COUNT: usize = 400;
const DEMO_FRAMES: u64 = 240;

const PALETTE: [&str; 5] = ["#e63946", "#f1c40f", "#2a9d8f", "#457b9d", "#9b5de5"];

#[derive(Error, Debug)]
enum DemoError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Config error: {0}")]
    Config(#[from] canvas_engine::core::ConfigError),

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

struct DemoApp {
    script: Vec<(usize, AppEvent)>,
    frames: usize,
    toggle: Option<ObjectId>,
    toggle_state: Option<Rc<Cell<bool>>>,
    panel: Option<ObjectId>,
}

impl DemoApp {
    fn new() -> Self {
        Self {
            script: Vec::new(),
            frames: 0,
            toggle: None,
            toggle_state: None,
            panel: None,
        }
    }

    fn scatter(renderer: &mut Renderer) -> Result<(), AppError> {
        let mut rng = rand::thread_rng();
        for i in 0..SHAPE_COUNT {
            let x = rng.gen_range(0.0..WORLD_WIDTH);
            let y = rng.gen_range(0.0..WORLD_HEIGHT);
            let color = PALETTE[rng.gen_range(0..PALETTE.len())];
            let id = if i % 2 == 0 {
                let size = rng.gen_range(10.0..60.0);
                renderer.add_object(Rectangle::new(renderer.ids(), x, y, size, size, color))?
            } else {
                let radius = rng.gen_range(5.0..30.0);
                renderer.add_object(Circle::new(renderer.ids(), x, y, radius, color))?
            };

            if let Some(object) = renderer.get_mut(id) {
                let core = object.core_mut();
                core.rotation = rng.gen_range(0.0..360.0);
                core.create_style_group("hover", StyleBag::new().with("stroke", "#ffffff").with("lineWidth", 2.0))?;
                core.create_style_group("rest", StyleBag::new().with("lineWidth", 0.0))?;
            }
        }
        log::info!("Scattered {} shapes over {}x{}", SHAPE_COUNT, WORLD_WIDTH, WORLD_HEIGHT);
        Ok(())
    }

    fn add_panel(renderer: &mut Renderer) -> Result<ObjectId, AppError> {
        let mut panel = Rectangle::new(renderer.ids(), 200.0, 150.0, 160.0, 90.0, "#264653");
        let core = panel.core_mut();
        core.style.set("stroke", "#e9c46a");
        core.configure_dragging(DragOptions::new(DragAxis::Both).with_bounds(
            Vec2::new(0.0, 0.0),
            Vec2::new(WORLD_WIDTH - 160.0, WORLD_HEIGHT - 90.0),
        ));
        core.enable_dragging()?;
        core.events.on(ObjectEvent::DragEnd, |payload| {
            if let Some(position) = payload.mouse_position {
                log::info!("Panel dropped near ({:.0}, {:.0})", position.x, position.y);
            }
        });
        Ok(renderer.add_object(panel)?)
    }

    /// Swap style groups on visible shapes as the pointer enters and leaves
    fn highlight_hovered(renderer: &mut Renderer) -> Result<(), AppError> {
        for id in renderer.visible_ids().to_vec() {
            let Some(object) = renderer.get_mut(id) else {
                continue;
            };
            let core = object.core_mut();
            let interaction = *core.interaction();
            if interaction.has_entered && core.style.number("lineWidth") != Some(2.0) {
                core.use_style_group("hover")?;
            } else if interaction.has_left && core.style.number("lineWidth") == Some(2.0) {
                core.use_style_group("rest")?;
            }
        }
        Ok(())
    }

    fn pointer_script() -> Vec<(usize, AppEvent)> {
        let mut script = vec![(1, AppEvent::CursorEntered)];
        // hover the panel, drag it to the right, drop it
        script.push((10, AppEvent::MouseMoved { x: 250.0, y: 190.0 }));
        script.push((20, AppEvent::MouseButton { button: MouseButton::Left, pressed: true }));
        for step in 0..20_u32 {
            let x = 250.0 + f64::from(step) * 10.0;
            script.push((21 + step as usize, AppEvent::MouseMoved { x, y: 190.0 }));
        }
        script.push((45, AppEvent::MouseButton { button: MouseButton::Left, pressed: false }));
        script.push((60, AppEvent::MouseWheel { delta_x: 0.0, delta_y: -120.0 }));
        script.push((200, AppEvent::CursorLeft));
        script
    }
}

impl Application for DemoApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Initializing scatter demo...");
        let renderer = engine.renderer_mut();
        Self::scatter(renderer)?;
        self.panel = Some(Self::add_panel(renderer)?);

        let toggle = Toggle::new(renderer.ids(), 420.0, 320.0);
        self.toggle_state = Some(toggle.state());
        self.toggle = Some(renderer.add_object(toggle)?);

        // focus puts the toggle in the middle of the scene; click it there
        // once the animation has settled
        let toggle_screen = renderer.scene().size() / 2.0;
        self.script = Self::pointer_script();
        self.script.push((120, AppEvent::MouseMoved { x: toggle_screen.x, y: toggle_screen.y }));
        self.script.push((121, AppEvent::MouseButton { button: MouseButton::Left, pressed: true }));
        self.script.push((123, AppEvent::MouseButton { button: MouseButton::Left, pressed: false }));
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, frame: &FrameInfo) -> Result<(), AppError> {
        self.frames += 1;
        let due: Vec<AppEvent> = self
            .script
            .iter()
            .filter(|(at, _)| *at == self.frames)
            .map(|(_, event)| *event)
            .collect();
        for event in due {
            self.handle_event(engine, event)?;
        }

        Self::highlight_hovered(engine.renderer_mut())?;

        if self.frames == 90 {
            if let Some(toggle) = self.toggle {
                let animation = AnimationSpec::named(400.0, "easeInOutCubic")?;
                engine
                    .renderer_mut()
                    .focus_camera(toggle, Some(Scaling::Uniform(1.0)), Vec2::zeros(), Some(animation))?;
            }
        }

        if self.frames % 60 == 0 {
            if let Some(metrics) = frame.metrics {
                log::info!(
                    "Frame {}: {} fps, delta {:.2}, {} visible objects in {:.3}ms",
                    self.frames,
                    frame.frame_rate,
                    frame.delta_time,
                    metrics.rendered_amount_of_objects,
                    metrics.duration
                );
            }
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let renderer = engine.renderer();
        if let Some(panel) = self.panel.and_then(|id| renderer.get(id)) {
            let core = panel.core();
            log::info!("Panel finished at ({:.0}, {:.0})", core.x, core.y);
        }
        if let Some(state) = &self.toggle_state {
            log::info!("Toggle ended {}", if state.get() { "on" } else { "off" });
        }
        log::info!(
            "Scatter demo cleanup: {} objects, {} frames",
            renderer.len(),
            engine.looper().frame_count()
        );
    }
}

fn load_config(args: &[String]) -> Result<ApplicationConfig, DemoError> {
    match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(path) => Ok(ApplicationConfig::load_from_file(path)?),
        None => Ok(ApplicationConfig::default()),
    }
}

fn main() -> Result<(), DemoError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(&args)?;
    logging::init_with_level(&config.engine.log_level)?;
    log::info!("Starting Canvas Scatter Demo");
    let surface = Box::new(RecordingSurface::new(config.scene.width, config.scene.height));
    let mut app = DemoApp::new();

    let result = if args.iter().any(|arg| arg == "--realtime") {
        let mut host = RealtimeFrameHost::new(config.looper.perfect_frame_rate).with_frame_limit(DEMO_FRAMES);
        Engine::run(config, &mut app, &mut host, surface)
    } else {
        let mut host = SimulatedFrameHost::at_rate(config.looper.perfect_frame_rate).with_frame_limit(DEMO_FRAMES);
        Engine::run(config, &mut app, &mut host, surface)
    };

    match result {
        Ok(()) => {
            log::info!("Scatter demo finished successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Application error: {:?}", e);
            Err(e.into())
        }
    }
}
