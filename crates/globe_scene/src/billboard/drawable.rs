//! Renderer-ready billboard geometry
//!
//! Each billboard becomes one quad. The quad origin stays in double precision
//! and the corners are stored as single precision offsets from it, so markers
//! on a globe-sized scene do not jitter.
//!
//! - **Eye** billboards carry offsets in the view plane (`z == 0`); the vertex
//!   shader expands them toward the camera.
//! - **Ground** billboards carry offsets already laid out in the local tangent
//!   plane (east/north) at the billboard center.

use super::types::{Billboard, BillboardInfo, BillboardOrientation, FadeParams, VisibilityRange};
use crate::foundation::ids::{BillboardId, TextureId};
use crate::foundation::math::{Point3d, Vector3};
use bytemuck::{Pod, Zeroable};

/// Index list for one quad, two counter-clockwise triangles
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Texture coordinates in corner order: bottom-left, bottom-right, top-right, top-left
const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Unit corner positions in the same order as [`QUAD_TEX_COORDS`]
const QUAD_CORNERS: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];

/// Vertex layout consumed by the billboard shaders
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BillboardVertex {
    /// Corner offset from the drawable origin
    pub offset: [f32; 3],
    /// Texture coordinates
    pub tex_coord: [f32; 2],
    /// Tint with batch opacity already applied
    pub color: [u8; 4],
}

/// Geometry and draw state for a single billboard
#[derive(Debug, Clone, PartialEq)]
pub struct BillboardDrawable {
    /// Billboard this drawable was built from
    pub id: BillboardId,
    /// Quad center in display coordinates
    pub origin: Point3d,
    /// Resolved orientation
    pub orientation: BillboardOrientation,
    /// Image drawn on the quad
    pub texture: Option<TextureId>,
    /// Quad corners
    pub vertices: [BillboardVertex; 4],
    /// Draw ordering
    pub draw_priority: i32,
    /// Depth test
    pub z_buffer_read: bool,
    /// Depth write
    pub z_buffer_write: bool,
    /// Fade timing
    pub fade: FadeParams,
    /// Viewer height band
    pub visibility: VisibilityRange,
    /// Takes part in selection
    pub selectable: bool,
}

impl BillboardDrawable {
    /// Build the drawable for `billboard` using the shared batch parameters
    pub fn build(id: BillboardId, billboard: &Billboard, info: &BillboardInfo) -> Self {
        let orientation = billboard.resolved_orientation(info);
        let color = billboard.color.with_opacity(info.opacity).to_array();
        let (sin, cos) = billboard.rotation.sin_cos();

        // Axes the 2D corner offsets are laid out along
        let (right, up) = match orientation {
            BillboardOrientation::Eye => (Vector3::x(), Vector3::y()),
            BillboardOrientation::Ground => tangent_frame(&billboard.center),
        };

        let vertices = std::array::from_fn(|i| {
            let [cx, cy] = QUAD_CORNERS[i];
            let x = cx * billboard.size.x;
            let y = cy * billboard.size.y;
            let rx = x * cos - y * sin;
            let ry = x * sin + y * cos;
            let offset = right * rx + up * ry;
            BillboardVertex {
                offset: [offset.x, offset.y, offset.z],
                tex_coord: QUAD_TEX_COORDS[i],
                color,
            }
        });

        Self {
            id,
            origin: billboard.center,
            orientation,
            texture: billboard.texture,
            vertices,
            draw_priority: info.draw_priority,
            z_buffer_read: info.z_buffer_read,
            z_buffer_write: info.z_buffer_write,
            fade: info.fade,
            visibility: info.visibility,
            selectable: billboard.selectable,
        }
    }

    /// Vertex data as raw bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index list for this drawable's quad
    pub const fn indices(&self) -> &'static [u16; 6] {
        &QUAD_INDICES
    }
}

/// East/north unit vectors of the plane tangent to the globe at `center`
///
/// The up vector is the normalized center. At the poles east is undefined, so
/// the x axis stands in for it.
fn tangent_frame(center: &Point3d) -> (Vector3<f32>, Vector3<f32>) {
    let up = center.coords.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
    let east = Vector3::z()
        .cross(&up)
        .try_normalize(1.0e-9)
        .unwrap_or_else(Vector3::x);
    let north = up.cross(&east);
    (east.cast::<f32>(), north.cast::<f32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Color, Vec2};
    use approx::assert_relative_eq;

    fn billboard() -> Billboard {
        Billboard::new(Point3d::new(1.0, 0.0, 0.0), Vec2::new(2.0, 1.0))
    }

    #[test]
    fn test_eye_quad_layout() {
        let drawable = BillboardDrawable::build(BillboardId(1), &billboard(), &BillboardInfo::default());

        assert_eq!(drawable.orientation, BillboardOrientation::Eye);
        assert_eq!(drawable.vertices[0].offset, [-1.0, -0.5, 0.0]);
        assert_eq!(drawable.vertices[2].offset, [1.0, 0.5, 0.0]);
        assert_eq!(drawable.vertices[0].tex_coord, [0.0, 0.0]);
        assert_eq!(drawable.vertices[2].tex_coord, [1.0, 1.0]);
        assert_eq!(drawable.indices(), &QUAD_INDICES);
    }

    #[test]
    fn test_rotation_turns_corners() {
        let rotated = billboard().with_rotation(std::f32::consts::FRAC_PI_2);
        let drawable = BillboardDrawable::build(BillboardId(1), &rotated, &BillboardInfo::default());

        // Bottom-right (1, -0.5) rotated a quarter turn lands on (0.5, 1)
        let offset = drawable.vertices[1].offset;
        assert_relative_eq!(offset[0], 0.5, epsilon = 1.0e-6);
        assert_relative_eq!(offset[1], 1.0, epsilon = 1.0e-6);
    }

    #[test]
    fn test_ground_quad_lies_in_tangent_plane() {
        let ground = billboard().with_orientation(BillboardOrientation::Ground);
        let drawable = BillboardDrawable::build(BillboardId(1), &ground, &BillboardInfo::default());

        // Center is on the +x axis, so the tangent plane is x == 0
        for vertex in &drawable.vertices {
            assert_relative_eq!(vertex.offset[0], 0.0, epsilon = 1.0e-6);
        }
        // East at (1, 0, 0) is +y, north is +z
        assert_relative_eq!(drawable.vertices[2].offset[1], 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(drawable.vertices[2].offset[2], 0.5, epsilon = 1.0e-6);
    }

    #[test]
    fn test_ground_quad_at_pole() {
        let mut pole = billboard().with_orientation(BillboardOrientation::Ground);
        pole.center = Point3d::new(0.0, 0.0, 1.0);
        let drawable = BillboardDrawable::build(BillboardId(1), &pole, &BillboardInfo::default());

        for vertex in &drawable.vertices {
            assert!(vertex.offset.iter().all(|c| c.is_finite()));
            assert_relative_eq!(vertex.offset[2], 0.0, epsilon = 1.0e-6);
        }
    }

    #[test]
    fn test_opacity_and_info_carried() {
        let info = BillboardInfo { opacity: 0.5, draw_priority: 9, ..Default::default() };
        let tinted = billboard().with_color(Color::rgba(255, 0, 0, 255)).selectable();
        let drawable = BillboardDrawable::build(BillboardId(3), &tinted, &info);

        assert_eq!(drawable.vertices[0].color, [255, 0, 0, 128]);
        assert_eq!(drawable.draw_priority, 9);
        assert!(drawable.selectable);
        assert_eq!(drawable.vertex_bytes().len(), 4 * std::mem::size_of::<BillboardVertex>());
    }
}
