//! Shared fixtures for unit tests

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use crate::foundation::ids::IdAllocator;
use crate::render::DrawingSurface;
use crate::scene::{Bounds, DrawOutcome, ObjectCore, ObjectError, RenderObject, SpriteAnimation, UpdateContext};

/// Rectangle-ish object that counts its calls
#[derive(Debug)]
pub struct Probe {
    core: ObjectCore,
    pub draws: usize,
    pub updates: usize,
    pub fail_draw: bool,
    spawn: usize,
}

impl Probe {
    pub fn new(ids: &IdAllocator, x: f64, y: f64, bounds: Bounds) -> Self {
        Self {
            core: ObjectCore::new(ids, x, y, bounds),
            draws: 0,
            updates: 0,
            fail_draw: false,
            spawn: 0,
        }
    }

    /// Add `count` child probes when adopted
    pub fn spawning(mut self, count: usize) -> Self {
        self.spawn = count;
        self
    }
}

impl RenderObject for Probe {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        &mut self.core
    }

    fn draw(&mut self, surface: &mut dyn DrawingSurface) -> Result<DrawOutcome, ObjectError> {
        self.draws += 1;
        if self.fail_draw {
            return Err(ObjectError::Failed("probe refused to draw".to_string()));
        }
        let (width, height) = self.core.size().unwrap_or((1.0, 1.0));
        surface.fill_rect(self.core.x, self.core.y, width, height);
        Ok(DrawOutcome::Drawn)
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), ObjectError> {
        self.updates += 1;
        self.core.update_events(ctx);
        Ok(())
    }

    fn on_add(&mut self, ids: &IdAllocator) -> Vec<Box<dyn RenderObject>> {
        (0..self.spawn)
            .map(|i| {
                let offset = (i + 1) as f64 * 20.0;
                Box::new(Self::new(ids, self.core.x + offset, self.core.y, Bounds::rect(10.0, 10.0)))
                    as Box<dyn RenderObject>
            })
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Sprite animation that sums the delta time it receives
#[derive(Debug, Clone, Default)]
pub struct CountingSprite {
    elapsed: Rc<Cell<f64>>,
}

impl CountingSprite {
    /// Shared view of the accumulated delta
    pub fn elapsed(&self) -> Rc<Cell<f64>> {
        Rc::clone(&self.elapsed)
    }
}

impl SpriteAnimation for CountingSprite {
    fn update(&mut self, delta_time: f64) {
        self.elapsed.set(self.elapsed.get() + delta_time);
    }
}
