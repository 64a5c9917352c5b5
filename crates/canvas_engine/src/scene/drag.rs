//! Pointer dragging for render objects

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

use super::events::ObjectEvent;

/// Axes a dragged object may move along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragAxis {
    /// Free movement
    #[default]
    Both,
    /// Only x changes
    Horizontal,
    /// Only y changes
    Vertical,
}

/// How an object drags
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragOptions {
    /// Movement constraint
    pub axis: DragAxis,
    /// Smallest allowed position
    pub min: Option<Vec2>,
    /// Largest allowed position
    pub max: Option<Vec2>,
}

impl DragOptions {
    /// Create options for the given axis, unclamped
    pub const fn new(axis: DragAxis) -> Self {
        Self {
            axis,
            min: None,
            max: None,
        }
    }

    /// Clamp the dragged position to `[min, max]`
    #[must_use]
    pub fn with_bounds(mut self, min: Vec2, max: Vec2) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    fn constrain(&self, current: Vec2, target: Vec2) -> Vec2 {
        let mut next = match self.axis {
            DragAxis::Both => target,
            DragAxis::Horizontal => Vec2::new(target.x, current.y),
            DragAxis::Vertical => Vec2::new(current.x, target.y),
        };
        if let Some(min) = self.min {
            next = next.sup(&min);
        }
        if let Some(max) = self.max {
            next = next.inf(&max);
        }
        next
    }
}

/// Result of one drag step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragStep {
    /// Where the object should move to
    pub position: Option<Vec2>,
    /// Drag events to fire
    pub events: Vec<ObjectEvent>,
}

/// Dragging configuration and progress of one object
#[derive(Debug, Clone, Default)]
pub(crate) struct DragState {
    options: Option<DragOptions>,
    enabled: bool,
    grab_offset: Option<Vec2>,
}

impl DragState {
    pub(crate) fn configure(&mut self, options: DragOptions) {
        self.options = Some(options);
    }

    pub(crate) const fn is_configured(&self) -> bool {
        self.options.is_some()
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.grab_offset = None;
        }
    }

    pub(crate) const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) const fn is_dragging(&self) -> bool {
        self.grab_offset.is_some()
    }

    /// Follow the pointer given this frame's interaction events
    pub(crate) fn step(&mut self, fired: &[ObjectEvent], pressed: bool, pointer: Vec2, position: Vec2) -> DragStep {
        let mut step = DragStep::default();
        let Some(options) = self.options.filter(|_| self.enabled) else {
            return step;
        };

        match self.grab_offset {
            None if pressed && fired.contains(&ObjectEvent::MouseDown) => {
                self.grab_offset = Some(pointer - position);
                step.events.push(ObjectEvent::DragStart);
            }
            None => {}
            Some(grab) if pressed => {
                let next = options.constrain(position, pointer - grab);
                if next != position {
                    step.position = Some(next);
                    step.events.push(ObjectEvent::Drag);
                }
            }
            Some(_) => {
                self.grab_offset = None;
                step.events.push(ObjectEvent::DragEnd);
            }
        }

        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn enabled(options: DragOptions) -> DragState {
        let mut state = DragState::default();
        state.configure(options);
        state.set_enabled(true);
        state
    }

    #[test]
    fn test_full_drag_cycle() {
        let mut drag = enabled(DragOptions::default());
        let origin = Vec2::new(10.0, 10.0);

        let start = drag.step(&[ObjectEvent::MouseDown], true, Vec2::new(15.0, 12.0), origin);
        assert_eq!(start.events, vec![ObjectEvent::DragStart]);
        assert!(drag.is_dragging());

        let moved = drag.step(&[], true, Vec2::new(25.0, 32.0), origin);
        assert_eq!(moved.events, vec![ObjectEvent::Drag]);
        assert_relative_eq!(moved.position.unwrap(), Vec2::new(20.0, 30.0));

        let end = drag.step(&[], false, Vec2::new(25.0, 32.0), Vec2::new(20.0, 30.0));
        assert_eq!(end.events, vec![ObjectEvent::DragEnd]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_horizontal_axis_with_clamp() {
        let options = DragOptions::new(DragAxis::Horizontal)
            .with_bounds(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        let mut drag = enabled(options);
        let origin = Vec2::new(50.0, 50.0);

        drag.step(&[ObjectEvent::MouseDown], true, origin, origin);
        let moved = drag.step(&[], true, Vec2::new(500.0, 80.0), origin);
        assert_relative_eq!(moved.position.unwrap(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_disabled_drag_does_nothing() {
        let mut drag = DragState::default();
        drag.configure(DragOptions::default());
        let step = drag.step(&[ObjectEvent::MouseDown], true, Vec2::zeros(), Vec2::zeros());
        assert_eq!(step, DragStep::default());
    }

    #[test]
    fn test_still_pointer_fires_no_drag() {
        let mut drag = enabled(DragOptions::default());
        let origin = Vec2::new(1.0, 1.0);
        drag.step(&[ObjectEvent::MouseDown], true, origin, origin);
        assert!(drag.step(&[], true, origin, origin).events.is_empty());
    }
}
