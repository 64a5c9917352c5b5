//! Engine lifecycle tests with a scripted application

use crate::application::{AppError, AppEvent, Application};
use crate::core::config::ApplicationConfig;
use crate::engine::{Engine, EngineError};
use crate::foundation::ids::ObjectId;
use crate::looper::{FrameInfo, LoopError, SimulatedFrameHost};
use crate::render::{RecordingSurface, RenderError};
use crate::scene::{Bounds, MouseButton, ObjectEvent, RenderObject};
use crate::test_support::Probe;

use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct ScriptedApp {
    quit_after: Option<usize>,
    drop_camera: bool,
    script: Vec<(usize, AppEvent)>,
    frames: Vec<FrameInfo>,
    probe: Option<ObjectId>,
    clicks: Rc<Cell<usize>>,
    initialized: bool,
    cleaned_up: bool,
}

impl Application for ScriptedApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        self.initialized = true;
        let renderer = engine.renderer_mut();
        let mut probe = Probe::new(renderer.ids(), 100.0, 100.0, Bounds::rect(50.0, 50.0));
        let clicks = Rc::clone(&self.clicks);
        probe
            .core_mut()
            .events
            .on(ObjectEvent::Click, move |_| clicks.set(clicks.get() + 1));
        self.probe = Some(renderer.add_object(probe)?);
        if self.drop_camera {
            renderer.take_camera();
        }
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, frame: &FrameInfo) -> Result<(), AppError> {
        self.frames.push(*frame);
        let index = self.frames.len();
        let due: Vec<AppEvent> = self
            .script
            .iter()
            .filter(|(at, _)| *at == index)
            .map(|(_, event)| *event)
            .collect();
        for event in due {
            self.handle_event(engine, event)?;
        }
        if self.quit_after == Some(index) {
            engine.quit();
        }
        Ok(())
    }

    fn cleanup(&mut self, _engine: &mut Engine) {
        self.cleaned_up = true;
    }
}

fn surface() -> Box<RecordingSurface> {
    Box::new(RecordingSurface::new(1280.0, 720.0))
}

#[test]
fn test_run_until_host_runs_dry() {
    let mut app = ScriptedApp::default();
    let mut host = SimulatedFrameHost::at_rate(60.0).with_frame_limit(5);
    Engine::run(ApplicationConfig::default(), &mut app, &mut host, surface()).unwrap();

    assert!(app.initialized);
    assert!(app.cleaned_up);
    assert!(app.probe.is_some());
    assert_eq!(app.frames.len(), 6);
    assert_eq!(app.frames[0].delta_time, 0.0);
    assert_eq!(app.frames[5].metrics.map(|m| m.rendered_amount_of_objects), Some(1));
    assert!(!host.has_pending_frame());
}

#[test]
fn test_quit_stops_the_loop() {
    let mut app = ScriptedApp {
        quit_after: Some(3),
        ..ScriptedApp::default()
    };
    let mut host = SimulatedFrameHost::at_rate(60.0).with_frame_limit(100);
    Engine::run(ApplicationConfig::default(), &mut app, &mut host, surface()).unwrap();
    assert_eq!(app.frames.len(), 3);
    assert!(app.cleaned_up);
}

#[test]
fn test_close_request_stops_the_loop() {
    let mut app = ScriptedApp {
        script: vec![(2, AppEvent::WindowCloseRequested)],
        ..ScriptedApp::default()
    };
    let mut host = SimulatedFrameHost::at_rate(60.0).with_frame_limit(100);
    Engine::run(ApplicationConfig::default(), &mut app, &mut host, surface()).unwrap();
    assert_eq!(app.frames.len(), 2);
}

#[test]
fn test_scripted_click() {
    let mut app = ScriptedApp {
        script: vec![
            (1, AppEvent::MouseMoved { x: 110.0, y: 110.0 }),
            (2, AppEvent::MouseButton { button: MouseButton::Left, pressed: true }),
            (3, AppEvent::MouseButton { button: MouseButton::Left, pressed: false }),
        ],
        ..ScriptedApp::default()
    };
    let mut host = SimulatedFrameHost::at_rate(60.0).with_frame_limit(5);
    Engine::run(ApplicationConfig::default(), &mut app, &mut host, surface()).unwrap();
    assert_eq!(app.clicks.get(), 1);
}

#[test]
fn test_missing_camera_fails_the_run() {
    let mut app = ScriptedApp {
        drop_camera: true,
        ..ScriptedApp::default()
    };
    let mut host = SimulatedFrameHost::at_rate(60.0).with_frame_limit(5);
    let err = Engine::run(ApplicationConfig::default(), &mut app, &mut host, surface()).unwrap_err();
    assert!(matches!(err, EngineError::Loop(LoopError::Render(RenderError::NoCamera))));
    assert!(app.frames.is_empty());
    assert!(app.cleaned_up);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = ApplicationConfig::default();
    config.looper.perfect_frame_rate = 0.0;
    let err = Engine::new(config, surface()).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn test_surface_without_area_is_rejected() {
    let err = Engine::new(ApplicationConfig::default(), Box::new(RecordingSurface::new(0.0, 720.0))).unwrap_err();
    assert!(matches!(err, EngineError::InitializationFailed(_)));
}

#[test]
fn test_pointer_events_reach_scene() {
    let mut engine = Engine::new(ApplicationConfig::default(), surface()).unwrap();

    engine.handle_event(AppEvent::MouseMoved { x: 12.0, y: 34.0 }).unwrap();
    engine
        .handle_event(AppEvent::MouseButton { button: MouseButton::Right, pressed: true })
        .unwrap();
    engine.handle_event(AppEvent::MouseWheel { delta_x: 1.0, delta_y: -2.0 }).unwrap();

    let pointer = engine.renderer().scene().pointer();
    assert_eq!((pointer.position().x, pointer.position().y), (12.0, 34.0));
    assert!(pointer.in_window());
    assert!(pointer.is_pressed());
    assert_eq!(pointer.pending_wheel().map(|wheel| wheel.delta_y), Some(-2.0));

    engine.handle_event(AppEvent::CursorLeft).unwrap();
    let pointer = engine.renderer().scene().pointer();
    assert!(!pointer.in_window());
    assert!(!pointer.is_pressed());
}

#[test]
fn test_resize_changes_scene_only() {
    let mut engine = Engine::new(ApplicationConfig::default(), surface()).unwrap();
    engine
        .handle_event(AppEvent::WindowResized { width: 640.0, height: 480.0 })
        .unwrap();
    assert_eq!(engine.renderer().scene().width(), 640.0);
    assert_eq!(engine.renderer().scene().height(), 480.0);
    assert_eq!(engine.renderer().camera().map(|camera| camera.width), Some(1280.0));
}
