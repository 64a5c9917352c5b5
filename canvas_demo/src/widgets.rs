//! Demo shapes built on the engine's render objects

use std::any::Any;
use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;

use canvas_engine::foundation::ids::IdAllocator;
use canvas_engine::prelude::*;
use canvas_engine::scene::StyleBag;

fn paint(surface: &mut dyn DrawingSurface, style: &StyleBag) {
    if let Some(alpha) = style.number("alpha") {
        surface.set_global_alpha(alpha);
    }
    if let Some(fill) = style.text("fill") {
        surface.set_fill_style(fill);
        surface.fill();
    }
    let line_width = style.number("lineWidth").unwrap_or(1.0);
    if let Some(stroke) = style.text("stroke").filter(|_| line_width > 0.0) {
        surface.set_stroke_style(stroke);
        surface.set_line_width(line_width);
        surface.stroke();
    }
}

/// Filled, optionally stroked rectangle
#[derive(Debug)]
pub struct Rectangle {
    core: ObjectCore,
}

impl Rectangle {
    pub fn new(ids: &IdAllocator, x: f64, y: f64, width: f64, height: f64, fill: &str) -> Self {
        let style = StyleBag::new().with("fill", fill);
        Self {
            core: ObjectCore::new(ids, x, y, Bounds::rect(width, height)).with_style(style),
        }
    }
}

impl RenderObject for Rectangle {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        &mut self.core
    }

    fn draw(&mut self, surface: &mut dyn DrawingSurface) -> Result<DrawOutcome, ObjectError> {
        let Some((width, height)) = self.core.size() else {
            return Ok(DrawOutcome::Skipped);
        };
        surface.save();
        surface.transform(&self.core.local_transform());
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(width, 0.0);
        surface.line_to(width, height);
        surface.line_to(0.0, height);
        surface.close_path();
        paint(surface, &self.core.style);
        surface.restore();
        Ok(DrawOutcome::Drawn)
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), ObjectError> {
        self.core.update_events(ctx);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Circle centered on its position
#[derive(Debug)]
pub struct Circle {
    core: ObjectCore,
}

impl Circle {
    pub fn new(ids: &IdAllocator, x: f64, y: f64, radius: f64, fill: &str) -> Self {
        let style = StyleBag::new().with("fill", fill);
        Self {
            core: ObjectCore::new(ids, x, y, Bounds::circle(radius)).with_style(style),
        }
    }
}

impl RenderObject for Circle {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        &mut self.core
    }

    fn draw(&mut self, surface: &mut dyn DrawingSurface) -> Result<DrawOutcome, ObjectError> {
        let Some(radius) = self.core.bounds.radius() else {
            return Ok(DrawOutcome::Skipped);
        };
        surface.save();
        surface.transform(&self.core.local_transform());
        surface.begin_path();
        surface.arc(0.0, 0.0, radius, 0.0, TAU);
        paint(surface, &self.core.style);
        surface.restore();
        Ok(DrawOutcome::Drawn)
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), ObjectError> {
        self.core.update_events(ctx);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Switch made of a track and a knob
///
/// The track is this object; the knob is added as a child when the
/// renderer adopts the toggle. Clicking the track flips the state.
#[derive(Debug)]
pub struct Toggle {
    track: Rectangle,
    on: Rc<Cell<bool>>,
}

impl Toggle {
    const WIDTH: f64 = 60.0;
    const HEIGHT: f64 = 30.0;

    pub fn new(ids: &IdAllocator, x: f64, y: f64) -> Self {
        let mut track = Rectangle::new(ids, x, y, Self::WIDTH, Self::HEIGHT, "#555555");
        let on = Rc::new(Cell::new(false));
        let state = Rc::clone(&on);
        track.core.events.on(ObjectEvent::Click, move |payload| {
            state.set(!state.get());
            log::info!("Toggle {} switched {}", payload.target, if state.get() { "on" } else { "off" });
        });
        Self { track, on }
    }

    /// Shared switch state
    pub fn state(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.on)
    }
}

impl RenderObject for Toggle {
    fn core(&self) -> &ObjectCore {
        self.track.core()
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        self.track.core_mut()
    }

    fn draw(&mut self, surface: &mut dyn DrawingSurface) -> Result<DrawOutcome, ObjectError> {
        let fill = if self.on.get() { "#3cb371" } else { "#555555" };
        self.track.core.style.set("fill", fill);
        self.track.draw(surface)
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), ObjectError> {
        self.track.update(ctx)
    }

    fn on_add(&mut self, ids: &IdAllocator) -> Vec<Box<dyn RenderObject>> {
        let radius = Self::HEIGHT / 2.0 - 3.0;
        let (x, y) = (self.track.core.x, self.track.core.y);
        let knob = Knob {
            circle: Circle::new(ids, x + Self::HEIGHT / 2.0, y + Self::HEIGHT / 2.0, radius, "#f0f0f0"),
            rest_x: x + Self::HEIGHT / 2.0,
            travel: Self::WIDTH - Self::HEIGHT,
            on: Rc::clone(&self.on),
            shown: false,
        };
        vec![Box::new(knob)]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Toggle knob; slides to follow the switch state
#[derive(Debug)]
struct Knob {
    circle: Circle,
    rest_x: f64,
    travel: f64,
    on: Rc<Cell<bool>>,
    shown: bool,
}

impl RenderObject for Knob {
    fn core(&self) -> &ObjectCore {
        self.circle.core()
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        self.circle.core_mut()
    }

    fn draw(&mut self, surface: &mut dyn DrawingSurface) -> Result<DrawOutcome, ObjectError> {
        self.circle.draw(surface)
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), ObjectError> {
        let on = self.on.get();
        if on != self.shown {
            self.shown = on;
            let target = if on { self.rest_x + self.travel } else { self.rest_x };
            let spec = AnimationSpec::named(200.0, "easeOutBack")?;
            self.circle.core.animate_x_position(target, spec);
        }
        self.circle.update(ctx)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
