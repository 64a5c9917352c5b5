//! Drawing surface abstraction
//!
//! This module defines the 2D drawing context that render objects draw on
//! and the renderer applies the camera to. It mirrors the immediate-mode
//! canvas model: a current transform, a save/restore stack, styles and
//! path primitives.
//!
//! [`RecordingSurface`] implements the trait by recording every call, for
//! headless runs and tests.

use crate::foundation::math::Affine;

/// 2D immediate-mode drawing context
pub trait DrawingSurface {
    /// Push the current state
    fn save(&mut self);

    /// Pop the last pushed state; ignored when nothing was pushed
    fn restore(&mut self);

    /// Prepend a translation to the current transform
    fn translate(&mut self, x: f64, y: f64);

    /// Prepend a scale to the current transform
    fn scale(&mut self, x: f64, y: f64);

    /// Prepend a rotation (radians) to the current transform
    fn rotate(&mut self, radians: f64);

    /// Multiply the current transform by `matrix`
    fn transform(&mut self, matrix: &Affine);

    /// Replace the current transform
    fn set_transform(&mut self, matrix: &Affine);

    /// Set the fill color
    fn set_fill_style(&mut self, style: &str);

    /// Set the stroke color
    fn set_stroke_style(&mut self, style: &str);

    /// Set the stroke width
    fn set_line_width(&mut self, width: f64);

    /// Set the opacity applied to everything drawn
    fn set_global_alpha(&mut self, alpha: f64);

    /// Clear a rectangle to transparent
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill a rectangle
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Outline a rectangle
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Start a new path
    fn begin_path(&mut self);

    /// Move the pen without drawing
    fn move_to(&mut self, x: f64, y: f64);

    /// Add a line to the path
    fn line_to(&mut self, x: f64, y: f64);

    /// Add an arc to the path
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);

    /// Close the current path
    fn close_path(&mut self);

    /// Fill the current path
    fn fill(&mut self);

    /// Stroke the current path
    fn stroke(&mut self);

    /// Draw text at a position
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Surface width in pixels
    fn width(&self) -> f64;

    /// Surface height in pixels
    fn height(&self) -> f64;
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Scale { x: f64, y: f64 },
    Rotate { radians: f64 },
    Transform(Affine),
    SetTransform(Affine),
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    GlobalAlpha(f64),
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    StrokeRect { x: f64, y: f64, width: f64, height: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64 },
    ClosePath,
    Fill,
    Stroke,
    FillText { text: String, x: f64, y: f64 },
}

/// Surface that records calls and tracks the current transform
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    transform: Affine,
    stack: Vec<Affine>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create a new recording surface of the given size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Calls recorded so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded calls, leaving the log empty
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Current transform
    pub const fn current_transform(&self) -> Affine {
        self.transform
    }

    /// Number of unmatched `save` calls
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Change the surface size
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn push_transform(&mut self, matrix: Affine) {
        self.transform = self.transform.multiply(&matrix);
    }
}

impl DrawingSurface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.transform);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.push_transform(Affine::translation(x, y));
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.push_transform(Affine::scaling(x, y));
        self.commands.push(DrawCommand::Scale { x, y });
    }

    fn rotate(&mut self, radians: f64) {
        self.push_transform(Affine::rotation(radians));
        self.commands.push(DrawCommand::Rotate { radians });
    }

    fn transform(&mut self, matrix: &Affine) {
        self.push_transform(*matrix);
        self.commands.push(DrawCommand::Transform(*matrix));
    }

    fn set_transform(&mut self, matrix: &Affine) {
        self.transform = *matrix;
        self.commands.push(DrawCommand::SetTransform(*matrix));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::FillStyle(style.to_string()));
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::StrokeStyle(style.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::FillRect { x, y, width, height });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::StrokeRect { x, y, width, height });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;

    #[test]
    fn test_transforms_accumulate_like_a_canvas() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.translate(10.0, 20.0);
        surface.scale(2.0, 2.0);
        let p = surface.current_transform().transform_point(Vec2::new(1.0, 1.0));
        assert_relative_eq!(p, Vec2::new(12.0, 22.0));
    }

    #[test]
    fn test_restore_pops_transform() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.save();
        surface.translate(5.0, 5.0);
        assert_eq!(surface.save_depth(), 1);
        surface.restore();
        assert_eq!(surface.current_transform(), Affine::IDENTITY);
        assert_eq!(surface.save_depth(), 0);

        // unmatched restore is harmless
        surface.restore();
        assert_eq!(surface.current_transform(), Affine::IDENTITY);
    }

    #[test]
    fn test_take_commands_empties_log() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0);
        let taken = surface.take_commands();
        assert_eq!(taken, vec![DrawCommand::FillRect { x: 0.0, y: 0.0, width: 1.0, height: 1.0 }]);
        assert!(surface.commands().is_empty());
    }
}
