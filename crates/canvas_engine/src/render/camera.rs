//! # 2D Camera
//!
//! The camera is the viewport transform the renderer applies before drawing:
//! a translation followed by a per-axis scale.
//!
//! ## Coordinate System
//!
//! Screen and world space are both y-down. A world point `w` lands on screen at
//! `w * scale + (x, y)`, so the camera "position" is the negative of the world
//! offset: increasing `x` shifts content to the right.
//!
//! ## Design Principles
//! - **No cached state**: the renderer reads the public fields fresh each frame
//! - **Frame-driven animation**: focus and zoom transitions are tweens advanced
//!   with the frame timestamp

use crate::animation::{AnimationSpec, TweenHandle, TweenScheduler};
use crate::core::config::CameraConfig;
use crate::foundation::logging::{debug, warn};
use crate::foundation::math::{Affine, Vec2};
use crate::scene::{ObjectCore, Scene};

/// Requested camera zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scaling {
    /// Same zoom on both axes
    Uniform(f64),
    /// Independent zoom per axis
    Axes(Vec2),
}

impl Scaling {
    /// Zoom as a per-axis vector
    pub fn to_vec(self) -> Vec2 {
        match self {
            Self::Uniform(scale) => Vec2::new(scale, scale),
            Self::Axes(scale) => scale,
        }
    }

    /// Zoom as a vector, or `None` unless both axes are finite and positive
    pub fn checked(self) -> Option<Vec2> {
        let scale = self.to_vec();
        (scale.x.is_finite() && scale.y.is_finite() && scale.x > 0.0 && scale.y > 0.0).then_some(scale)
    }
}

impl From<f64> for Scaling {
    fn from(scale: f64) -> Self {
        Self::Uniform(scale)
    }
}

impl From<Vec2> for Scaling {
    fn from(scale: Vec2) -> Self {
        Self::Axes(scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CameraField {
    X,
    Y,
    ScaleX,
    ScaleY,
}

/// Viewport transform owned by a renderer
#[derive(Debug)]
pub struct Camera {
    /// Horizontal translation applied before rendering
    pub x: f64,
    /// Vertical translation applied before rendering
    pub y: f64,
    /// Horizontal zoom
    pub scale_x: f64,
    /// Vertical zoom
    pub scale_y: f64,
    /// Logical viewport width
    pub width: f64,
    /// Logical viewport height
    pub height: f64,
    /// Draw every object regardless of position
    pub off_screen_rendering: bool,
    tweens: TweenScheduler<CameraField>,
}

impl Camera {
    /// Create a new camera at the origin with unit zoom
    ///
    /// # Arguments
    /// * `width` - Logical viewport width
    /// * `height` - Logical viewport height
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            width,
            height,
            off_screen_rendering: false,
            tweens: TweenScheduler::new(),
        }
    }

    /// Create a camera sized to the scene
    pub fn for_scene(scene: &Scene) -> Self {
        Self::new(scene.width(), scene.height())
    }

    /// Create a camera sized to the scene from configuration
    pub fn from_config(config: &CameraConfig, scene: &Scene) -> Self {
        let mut camera = Self::for_scene(scene);
        camera.x = config.x;
        camera.y = config.y;
        camera.scale_x = config.scale;
        camera.scale_y = config.scale;
        camera.off_screen_rendering = config.off_screen_rendering;
        camera
    }

    /// Current zoom as a vector
    pub fn scale_vec(&self) -> Vec2 {
        Vec2::new(self.scale_x, self.scale_y)
    }

    /// Current translation as a vector
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Set the zoom immediately
    ///
    /// Any running zoom animation is cancelled. A zero, negative or
    /// non-finite zoom is rejected and the current one kept.
    pub fn scale(&mut self, scaling: impl Into<Scaling>) {
        let scaling = scaling.into();
        let Some(scale) = scaling.checked() else {
            warn!("Ignoring invalid camera scale {:?}", scaling);
            return;
        };
        self.tweens.cancel_field(CameraField::ScaleX);
        self.tweens.cancel_field(CameraField::ScaleY);
        self.scale_x = scale.x;
        self.scale_y = scale.y;
    }

    /// Map a screen point into world space
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new((screen.x - self.x) / self.scale_x, (screen.y - self.y) / self.scale_y)
    }

    /// Map a world point onto the screen
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x * self.scale_x + self.x, world.y * self.scale_y + self.y)
    }

    /// The transform applied to the surface: translate, then scale
    pub fn view_transform(&self) -> Affine {
        Affine::translation(self.x, self.y).multiply(&Affine::scaling(self.scale_x, self.scale_y))
    }

    /// Camera position that puts `center` in the middle of a `viewport`
    ///
    /// # Arguments
    /// * `center` - World point to center on
    /// * `viewport` - Logical size of the area to center within
    /// * `scale` - Zoom the camera will have
    /// * `offset` - Extra screen-space shift
    pub fn centering_position(center: Vec2, viewport: Vec2, scale: Vec2, offset: Vec2) -> Vec2 {
        viewport / 2.0 - center.component_mul(&scale) + offset
    }

    /// Center the camera on an object
    ///
    /// Uses the object's own center (rectangles are offset by half their size;
    /// other shapes use their origin) and the requested zoom, or the current
    /// zoom when `scaling` is `None`.
    ///
    /// # Arguments
    /// * `target` - Object to focus on
    /// * `viewport` - Logical scene size
    /// * `scaling` - Zoom to end up with
    /// * `offset` - Extra screen-space shift applied after centering
    /// * `animation` - Transition instead of snapping
    ///
    /// # Returns
    /// The animation handle when `animation` was given
    pub fn focus(
        &mut self,
        target: &ObjectCore,
        viewport: Vec2,
        scaling: Option<Scaling>,
        offset: Vec2,
        animation: Option<AnimationSpec>,
    ) -> Option<TweenHandle> {
        let current_scale = self.scale_vec();
        let scale = match scaling {
            Some(requested) => requested.checked().unwrap_or_else(|| {
                warn!("Ignoring invalid focus scale {:?}", requested);
                current_scale
            }),
            None => current_scale,
        };
        let position = Self::centering_position(target.center_point(), viewport, scale, offset);
        debug!("Camera focus on {} -> ({:.1}, {:.1})", target.id(), position.x, position.y);

        let Some(spec) = animation else {
            self.tweens.cancel_all();
            self.x = position.x;
            self.y = position.y;
            self.scale_x = scale.x;
            self.scale_y = scale.y;
            return None;
        };

        let mut fields = vec![
            (CameraField::X, self.x, position.x),
            (CameraField::Y, self.y, position.y),
        ];
        if scale != current_scale {
            fields.push((CameraField::ScaleX, current_scale.x, scale.x));
            fields.push((CameraField::ScaleY, current_scale.y, scale.y));
        }
        Some(self.tweens.start_group(&fields, spec))
    }

    /// Animate the zoom
    ///
    /// An invalid zoom starts nothing; the returned handle is already finished.
    pub fn animate_scale(&mut self, scaling: impl Into<Scaling>, spec: AnimationSpec) -> TweenHandle {
        let scaling = scaling.into();
        let Some(to) = scaling.checked() else {
            warn!("Ignoring invalid camera scale {:?}", scaling);
            return self.tweens.start_group(&[], spec);
        };
        self.tweens.start_group(
            &[
                (CameraField::ScaleX, self.scale_x, to.x),
                (CameraField::ScaleY, self.scale_y, to.y),
            ],
            spec,
        )
    }

    /// Whether any camera animation is running
    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Write the animated values for frame time `now`
    pub fn advance_animations(&mut self, now: f64) {
        for (field, value) in self.tweens.advance(now) {
            match field {
                CameraField::X => self.x = value,
                CameraField::Y => self.y = value,
                CameraField::ScaleX => self.scale_x = value,
                CameraField::ScaleY => self.scale_y = value,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Easing, TweenStatus};
    use crate::foundation::ids::IdAllocator;
    use crate::scene::Bounds;
    use approx::assert_relative_eq;

    #[test]
    fn test_screen_world_roundtrip() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.x = 30.0;
        camera.y = -10.0;
        camera.scale(Vec2::new(2.0, 0.5));

        let world = Vec2::new(12.5, -40.0);
        let screen = camera.world_to_screen(world);
        assert_relative_eq!(camera.screen_to_world(screen), world);
        assert_relative_eq!(camera.view_transform().transform_point(world), screen);
    }

    #[test]
    fn test_focus_centers_rectangle() {
        let ids = IdAllocator::new();
        let target = ObjectCore::new(&ids, 100.0, 100.0, Bounds::rect(50.0, 50.0));
        let mut camera = Camera::new(800.0, 600.0);

        let handle = camera.focus(&target, Vec2::new(800.0, 600.0), None, Vec2::zeros(), None);
        assert!(handle.is_none());
        // center (125, 125) ends up at (400, 300)
        assert_relative_eq!(camera.position(), Vec2::new(275.0, 175.0));
        assert_relative_eq!(camera.world_to_screen(Vec2::new(125.0, 125.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_focus_uses_origin_for_circles_and_requested_scale() {
        let ids = IdAllocator::new();
        let target = ObjectCore::new(&ids, 100.0, 50.0, Bounds::circle(20.0));
        let mut camera = Camera::new(800.0, 600.0);

        camera.focus(&target, Vec2::new(800.0, 600.0), Some(Scaling::Uniform(2.0)), Vec2::new(10.0, 0.0), None);
        assert_relative_eq!(camera.scale_vec(), Vec2::new(2.0, 2.0));
        assert_relative_eq!(camera.position(), Vec2::new(210.0, 200.0));
    }

    #[test]
    fn test_animated_focus() {
        let ids = IdAllocator::new();
        let target = ObjectCore::new(&ids, 0.0, 0.0, Bounds::Point);
        let mut camera = Camera::new(200.0, 100.0);

        let handle = camera
            .focus(
                &target,
                Vec2::new(200.0, 100.0),
                Some(Scaling::Uniform(3.0)),
                Vec2::zeros(),
                Some(AnimationSpec::new(100.0, Easing::Linear)),
            )
            .unwrap();
        assert_relative_eq!(camera.position(), Vec2::zeros());

        camera.advance_animations(0.0);
        camera.advance_animations(50.0);
        assert_relative_eq!(camera.position(), Vec2::new(50.0, 25.0));
        assert_relative_eq!(camera.scale_x, 2.0);

        camera.advance_animations(100.0);
        assert_relative_eq!(camera.position(), Vec2::new(100.0, 50.0));
        assert_relative_eq!(camera.scale_vec(), Vec2::new(3.0, 3.0));
        assert_eq!(handle.status(), TweenStatus::Finished);
        assert!(!camera.is_animating());
    }

    #[test]
    fn test_immediate_scale_cancels_zoom_animation() {
        let mut camera = Camera::new(100.0, 100.0);
        let handle = camera.animate_scale(4.0, AnimationSpec::new(100.0, Easing::Linear));
        camera.scale(0.5);
        assert_eq!(handle.status(), TweenStatus::Cancelled);
        camera.advance_animations(50.0);
        assert_relative_eq!(camera.scale_vec(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let mut camera = Camera::new(100.0, 100.0);
        camera.scale(2.0);
        camera.scale(0.0);
        camera.scale(Vec2::new(1.0, -1.0));
        camera.scale(f64::NAN);
        assert_relative_eq!(camera.scale_vec(), Vec2::new(2.0, 2.0));

        let handle = camera.animate_scale(0.0, AnimationSpec::new(100.0, Easing::Linear));
        assert_eq!(handle.status(), TweenStatus::Finished);
        assert!(!camera.is_animating());

        let ids = IdAllocator::new();
        let target = ObjectCore::new(&ids, 0.0, 0.0, Bounds::Point);
        camera.focus(&target, Vec2::new(100.0, 100.0), Some(Scaling::Uniform(-3.0)), Vec2::zeros(), None);
        assert_relative_eq!(camera.scale_vec(), Vec2::new(2.0, 2.0));
        assert_relative_eq!(camera.position(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_from_config() {
        let scene = Scene::new(640.0, 480.0);
        let config = CameraConfig {
            x: 5.0,
            y: 6.0,
            scale: 1.5,
            off_screen_rendering: true,
        };
        let camera = Camera::from_config(&config, &scene);
        assert_eq!(camera.width, 640.0);
        assert_eq!(camera.scale_y, 1.5);
        assert!(camera.off_screen_rendering);
    }
}
