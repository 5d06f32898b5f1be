//! Live renderable objects held by the scene

use crate::billboard::BillboardDrawable;
use crate::foundation::ids::{ObjectId, ShaderId};

/// One renderable object after its add record has been applied
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Scene identifier
    pub id: ObjectId,
    /// Shader the object draws with
    pub shader: ShaderId,
    /// Whether the renderer should draw it
    pub enabled: bool,
    /// Geometry and draw state
    pub drawable: BillboardDrawable,
}

impl SceneObject {
    /// Draw ordering key: priority first, then id for stability
    pub const fn sort_key(&self) -> (i32, u64) {
        (self.drawable.draw_priority, self.id.raw())
    }

    /// Whether the object should be drawn for a viewer at `height`
    pub fn is_visible_at(&self, height: f64) -> bool {
        self.enabled && self.drawable.visibility.contains(height)
    }
}
