//! Billboard descriptions
//!
//! A [`Billboard`] says where one marker goes and what it looks like. A
//! [`BillboardInfo`] carries the parameters shared by every billboard added
//! in the same batch.

use super::error::{BillboardError, BillboardResult};
use crate::foundation::ids::{ShaderId, TextureId};
use crate::foundation::math::{is_finite_point, is_positive_extent, Color, Point3d, Vec2};
use serde::{Deserialize, Serialize};

/// How a billboard is aligned when drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BillboardOrientation {
    /// Always faces the viewer
    #[default]
    Eye,
    /// Lies flat against the globe surface, rotating only about the local up axis
    Ground,
}

/// One screen- or ground-aligned marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billboard {
    /// Center in display coordinates
    pub center: Point3d,
    /// Width and height in display units
    pub size: Vec2,
    /// Image drawn on the quad, or a flat color quad when `None`
    pub texture: Option<TextureId>,
    /// Overrides the batch orientation when set
    pub orientation: Option<BillboardOrientation>,
    /// Rotation about the facing axis in radians
    pub rotation: f32,
    /// Tint multiplied with the texture
    pub color: Color,
    /// Whether the billboard takes part in selection
    pub selectable: bool,
}

impl Billboard {
    /// Create an untextured, eye-facing billboard
    pub fn new(center: Point3d, size: Vec2) -> Self {
        Self {
            center,
            size,
            texture: None,
            orientation: None,
            rotation: 0.0,
            color: Color::WHITE,
            selectable: false,
        }
    }

    /// Set the texture (builder pattern)
    #[must_use]
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set an orientation that overrides the batch default (builder pattern)
    #[must_use]
    pub fn with_orientation(mut self, orientation: BillboardOrientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Set the rotation in radians (builder pattern)
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the tint color (builder pattern)
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Mark the billboard selectable (builder pattern)
    #[must_use]
    pub fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }

    /// Orientation after applying the batch default
    pub fn resolved_orientation(&self, info: &BillboardInfo) -> BillboardOrientation {
        self.orientation.unwrap_or(info.orientation)
    }

    /// Check the billboard is well formed
    pub fn validate(&self) -> BillboardResult<()> {
        if !is_finite_point(&self.center) {
            return Err(BillboardError::InvalidInput(format!(
                "billboard center is not finite: {:?}",
                self.center
            )));
        }
        if !is_positive_extent(&self.size) {
            return Err(BillboardError::InvalidInput(format!(
                "billboard size must be finite and positive: {:?}",
                self.size
            )));
        }
        if !self.rotation.is_finite() {
            return Err(BillboardError::InvalidInput("billboard rotation is not finite".into()));
        }
        Ok(())
    }
}

/// Fade timing in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FadeParams {
    /// Time to fade in after being added
    pub fade_in: f32,
    /// Time to fade out before being removed
    pub fade_out: f32,
}

/// Viewer height band in which a batch is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityRange {
    /// Lowest viewer height at which the batch is visible
    pub min_height: f64,
    /// Highest viewer height at which the batch is visible
    pub max_height: f64,
}

impl VisibilityRange {
    /// Whether a viewer at `height` sees the batch
    pub fn contains(&self, height: f64) -> bool {
        height >= self.min_height && height <= self.max_height
    }
}

impl Default for VisibilityRange {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: f64::MAX,
        }
    }
}

/// Rendering parameters shared by a batch of billboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillboardInfo {
    /// Shader to draw with; overrides the handle passed to `add_billboards`
    pub shader: Option<ShaderId>,
    /// Higher priorities draw later
    pub draw_priority: i32,
    /// Default orientation for billboards that do not set their own
    pub orientation: BillboardOrientation,
    /// Opacity multiplier in `[0, 1]`
    pub opacity: f32,
    /// Fade timing
    pub fade: FadeParams,
    /// Viewer height band
    pub visibility: VisibilityRange,
    /// Test against the depth buffer
    pub z_buffer_read: bool,
    /// Write to the depth buffer
    pub z_buffer_write: bool,
    /// Whether the batch starts out enabled
    pub enable: bool,
}

impl Default for BillboardInfo {
    fn default() -> Self {
        Self {
            shader: None,
            draw_priority: 0,
            orientation: BillboardOrientation::Eye,
            opacity: 1.0,
            fade: FadeParams::default(),
            visibility: VisibilityRange::default(),
            z_buffer_read: true,
            z_buffer_write: false,
            enable: true,
        }
    }
}

impl BillboardInfo {
    /// Check the shared parameters are well formed
    pub fn validate(&self) -> BillboardResult<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(BillboardError::InvalidInput(format!(
                "opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        let fade_ok = |t: f32| t.is_finite() && t >= 0.0;
        if !fade_ok(self.fade.fade_in) || !fade_ok(self.fade.fade_out) {
            return Err(BillboardError::InvalidInput(format!(
                "fade times must be finite and non-negative: {:?}",
                self.fade
            )));
        }
        let range = &self.visibility;
        if range.min_height.is_nan() || range.max_height.is_nan() || range.min_height > range.max_height {
            return Err(BillboardError::InvalidInput(format!(
                "visibility range is inverted or NaN: {range:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billboard_validation() {
        let good = Billboard::new(Point3d::new(0.0, 0.0, 1.0), Vec2::new(0.1, 0.1));
        assert!(good.validate().is_ok());

        let mut bad = good.clone();
        bad.center.x = f64::INFINITY;
        assert!(matches!(bad.validate(), Err(BillboardError::InvalidInput(_))));

        let bad = Billboard::new(Point3d::origin(), Vec2::new(-1.0, 1.0));
        assert!(matches!(bad.validate(), Err(BillboardError::InvalidInput(_))));

        let bad = good.with_rotation(f32::NAN);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_info_validation() {
        assert!(BillboardInfo::default().validate().is_ok());

        let info = BillboardInfo { opacity: 1.5, ..Default::default() };
        assert!(info.validate().is_err());

        let info = BillboardInfo {
            fade: FadeParams { fade_in: -1.0, fade_out: 0.0 },
            ..Default::default()
        };
        assert!(info.validate().is_err());

        let info = BillboardInfo {
            visibility: VisibilityRange { min_height: 2.0, max_height: 1.0 },
            ..Default::default()
        };
        assert!(info.validate().is_err());
    }

    #[test]
    fn test_orientation_override() {
        let info = BillboardInfo { orientation: BillboardOrientation::Ground, ..Default::default() };
        let inherits = Billboard::new(Point3d::origin(), Vec2::new(1.0, 1.0));
        let overrides = inherits.clone().with_orientation(BillboardOrientation::Eye);

        assert_eq!(inherits.resolved_orientation(&info), BillboardOrientation::Ground);
        assert_eq!(overrides.resolved_orientation(&info), BillboardOrientation::Eye);
    }

    #[test]
    fn test_visibility_range() {
        let range = VisibilityRange { min_height: 0.1, max_height: 2.0 };
        assert!(range.contains(1.0));
        assert!(!range.contains(0.05));
        assert!(VisibilityRange::default().contains(1.0e9));
    }
}
