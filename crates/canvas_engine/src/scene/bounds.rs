//! Bounding shapes and hit testing
//!
//! Every render object carries exactly one [`Bounds`] kind. The kind decides
//! how the object is hit tested, how it is culled and which size operations
//! it supports.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// Bounding shape of a render object, relative to its `(x, y)` origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bounds {
    /// Rectangle extending right and down from the origin
    AxisAligned {
        /// Horizontal size
        width: f64,
        /// Vertical size
        height: f64,
    },
    /// Circle centered on the origin
    Radial {
        /// Circle radius
        radius: f64,
    },
    /// Polyline; points are offsets from the origin
    Segments {
        /// Vertices of the polyline
        points: Vec<Vec2>,
    },
    /// No extent at all
    Point,
}

/// World-space bounding box used for culling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Bounds {
    /// Rectangle bounds
    pub const fn rect(width: f64, height: f64) -> Self {
        Self::AxisAligned { width, height }
    }

    /// Circle bounds
    pub const fn circle(radius: f64) -> Self {
        Self::Radial { radius }
    }

    /// Short name of the shape kind, used in error messages
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AxisAligned { .. } => "axis-aligned",
            Self::Radial { .. } => "radial",
            Self::Segments { .. } => "segments",
            Self::Point => "point",
        }
    }

    /// `(width, height)` for axis-aligned bounds
    pub const fn size(&self) -> Option<(f64, f64)> {
        match *self {
            Self::AxisAligned { width, height } => Some((width, height)),
            _ => None,
        }
    }

    /// Radius for radial bounds
    pub const fn radius(&self) -> Option<f64> {
        match *self {
            Self::Radial { radius } => Some(radius),
            _ => None,
        }
    }

    /// Hit test a world-space point against the shape placed at `origin`
    ///
    /// Rectangles include their edges; circles include their rim.
    /// Segments and points are never hit.
    pub fn contains(&self, origin: Vec2, point: Vec2) -> bool {
        match *self {
            Self::AxisAligned { width, height } => point_in_rect(point, origin, width, height),
            Self::Radial { radius } => point_in_circle(point, origin, radius),
            Self::Segments { .. } | Self::Point => false,
        }
    }

    /// Center of the shape placed at `origin`
    ///
    /// Only rectangles are offset from their origin.
    pub fn center(&self, origin: Vec2) -> Vec2 {
        match *self {
            Self::AxisAligned { width, height } => origin + Vec2::new(width / 2.0, height / 2.0),
            _ => origin,
        }
    }

    /// World-space bounding box of the shape placed at `origin`
    pub fn extent(&self, origin: Vec2) -> Extent {
        match self {
            Self::AxisAligned { width, height } => Extent {
                min: origin,
                max: origin + Vec2::new(*width, *height),
            },
            Self::Radial { radius } => Extent {
                min: origin - Vec2::new(*radius, *radius),
                max: origin + Vec2::new(*radius, *radius),
            },
            Self::Segments { points } => {
                let mut extent = Extent { min: origin, max: origin };
                for point in points {
                    let p = origin + point;
                    extent.min = extent.min.inf(&p);
                    extent.max = extent.max.sup(&p);
                }
                extent
            }
            Self::Point => Extent { min: origin, max: origin },
        }
    }
}

/// Check if a point is inside a rectangle whose top-left corner is `corner`
pub fn point_in_rect(point: Vec2, corner: Vec2, width: f64, height: f64) -> bool {
    point.x >= corner.x
        && point.x <= corner.x + width
        && point.y >= corner.y
        && point.y <= corner.y + height
}

/// Check if a point is inside a circle
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f64) -> bool {
    (point - center).norm() <= radius
}
