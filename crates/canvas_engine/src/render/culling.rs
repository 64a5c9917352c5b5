//! Visibility culling against the camera view
//!
//! The view band is the world-space rectangle the camera shows, grown by a
//! margin so objects crossing the viewport edge do not pop in and out. The
//! margin is given in screen units and divided by the zoom on each axis.

use crate::scene::Extent;

use super::camera::Camera;

pub use crate::core::config::DEFAULT_VISIBILITY_MARGIN;

/// Margin-expanded world-space view of a camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBand {
    /// Left edge
    pub left: f64,
    /// Right edge
    pub right: f64,
    /// Top edge
    pub top: f64,
    /// Bottom edge
    pub bottom: f64,
}

impl ViewBand {
    /// Compute the band for a camera and margin
    pub fn from_camera(camera: &Camera, margin: f64) -> Self {
        let left = -camera.x / camera.scale_x;
        let top = -camera.y / camera.scale_y;
        let margin_x = margin / camera.scale_x;
        let margin_y = margin / camera.scale_y;

        Self {
            left: left - margin_x,
            right: left + camera.width / camera.scale_x + margin_x,
            top: top - margin_y,
            bottom: top + camera.height / camera.scale_y + margin_y,
        }
    }

    /// Whether an extent overlaps the band; touching edges count
    pub fn intersects(&self, extent: &Extent) -> bool {
        extent.max.x >= self.left
            && extent.min.x <= self.right
            && extent.max.y >= self.top
            && extent.min.y <= self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::scene::Bounds;

    fn visible(camera: &Camera, x: f64, y: f64, bounds: &Bounds) -> bool {
        ViewBand::from_camera(camera, DEFAULT_VISIBILITY_MARGIN).intersects(&bounds.extent(Vec2::new(x, y)))
    }

    #[test]
    fn test_margin_boundary_left() {
        let camera = Camera::new(800.0, 600.0);
        let bounds = Bounds::rect(50.0, 50.0);
        assert!(visible(&camera, -80.0, 100.0, &bounds));
        assert!(!visible(&camera, -81.0, 100.0, &bounds));
    }

    #[test]
    fn test_margin_boundary_right_and_bottom() {
        let camera = Camera::new(800.0, 600.0);
        let bounds = Bounds::rect(50.0, 50.0);
        assert!(visible(&camera, 830.0, 100.0, &bounds));
        assert!(!visible(&camera, 831.0, 100.0, &bounds));
        assert!(visible(&camera, 100.0, 630.0, &bounds));
        assert!(!visible(&camera, 100.0, 631.0, &bounds));
    }

    #[test]
    fn test_margin_shrinks_with_zoom() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.scale(2.0);
        // view is [0, 400] x [0, 300] in world space, margin 15
        let band = ViewBand::from_camera(&camera, DEFAULT_VISIBILITY_MARGIN);
        assert_eq!(band.left, -15.0);
        assert_eq!(band.right, 415.0);
        assert_eq!(band.bottom, 315.0);
    }

    #[test]
    fn test_panned_camera() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.x = -1000.0;
        let bounds = Bounds::rect(10.0, 10.0);
        assert!(!visible(&camera, 100.0, 100.0, &bounds));
        assert!(visible(&camera, 1100.0, 100.0, &bounds));
    }

    #[test]
    fn test_radial_uses_radius_on_both_sides() {
        let camera = Camera::new(800.0, 600.0);
        let bounds = Bounds::circle(20.0);
        assert!(visible(&camera, -50.0, 100.0, &bounds));
        assert!(!visible(&camera, -51.0, 100.0, &bounds));
    }
}
