//! Math utilities and types
//!
//! Globe positions are kept in double precision (display coordinates on a
//! unit sphere lose too much detail in `f32`), while extents and offsets that
//! end up in vertex buffers are single precision.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Point3, Vector2, Vector3};

/// 2D vector type for screen/ground extents
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Double precision 3D point for globe display coordinates
pub type Point3d = Point3<f64>;

/// Linear RGBA color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Create a color from its four channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale the alpha channel by `opacity` (clamped to `[0, 1]`)
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let scaled = f32::from(self.a) * opacity.clamp(0.0, 1.0);
        // Clamped above, so the cast cannot truncate out of range
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let a = scaled.round() as u8;
        Self { a, ..self }
    }

    /// Channels as an array, suitable for vertex data
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Check that every component of a point is finite
pub fn is_finite_point(point: &Point3d) -> bool {
    point.coords.iter().all(|c| c.is_finite())
}

/// Check that an extent is finite and strictly positive on both axes
pub fn is_positive_extent(extent: &Vec2) -> bool {
    extent.iter().all(|c| c.is_finite() && *c > 0.0)
}
