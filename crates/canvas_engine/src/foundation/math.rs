//! Math utilities and types
//!
//! Provides the 2D vector and affine types shared by the camera, hit testing
//! and drawing surfaces. Everything here is pure; nothing holds state.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f64>;

/// 3x3 matrix type (homogeneous 2D transforms)
pub type Mat3 = Matrix3<f64>;

/// 2D affine transform in canvas notation
///
/// Stores the six values `[a, b, c, d, e, f]` accepted by a 2D drawing
/// context, mapping `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    /// Horizontal scaling
    pub a: f64,
    /// Vertical skewing
    pub b: f64,
    /// Horizontal skewing
    pub c: f64,
    /// Vertical scaling
    pub d: f64,
    /// Horizontal translation
    pub e: f64,
    /// Vertical translation
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    /// The identity transform
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Create a transform from its six canvas values
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create a transform from `[a, b, c, d, e, f]`
    pub const fn from_array(values: [f64; 6]) -> Self {
        Self::new(values[0], values[1], values[2], values[3], values[4], values[5])
    }

    /// The six canvas values `[a, b, c, d, e, f]`
    pub const fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Pure translation
    pub const fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Pure scaling
    pub const fn scaling(x: f64, y: f64) -> Self {
        Self::new(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Pure rotation (radians, clockwise in a y-down space)
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Homogeneous matrix form
    pub fn to_matrix(&self) -> Mat3 {
        Mat3::new(
            self.a, self.c, self.e,
            self.b, self.d, self.f,
            0.0, 0.0, 1.0,
        )
    }

    /// Read the affine part of a homogeneous matrix
    pub fn from_matrix(matrix: &Mat3) -> Self {
        Self::new(
            matrix[(0, 0)],
            matrix[(1, 0)],
            matrix[(0, 1)],
            matrix[(1, 1)],
            matrix[(0, 2)],
            matrix[(1, 2)],
        )
    }

    /// `self * other`: `other` is applied first, then `self`
    ///
    /// This matches how a drawing context accumulates `transform()` calls.
    pub fn multiply(&self, other: &Self) -> Self {
        Self::from_matrix(&(self.to_matrix() * other.to_matrix()))
    }

    /// Inverse transform, if the matrix is invertible
    pub fn inverse(&self) -> Option<Self> {
        self.to_matrix().try_inverse().map(|m| Self::from_matrix(&m))
    }

    /// Map a point through this transform
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }
}

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians.to_degrees()
    }

    /// Linear interpolation
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }
}
