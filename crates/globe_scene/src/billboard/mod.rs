//! Billboard subsystem
//!
//! Billboards are screen- or ground-aligned markers placed at a position on
//! the globe. [`BillboardManager`] stages their creation, visibility and
//! removal as change records; the scene applies them at a frame boundary.

mod drawable;
mod error;
mod manager;
mod types;

pub use drawable::{BillboardDrawable, BillboardVertex, QUAD_INDICES};
pub use error::{BillboardError, BillboardResult};
pub use manager::{BillboardBatch, BillboardManager, BillboardState};
pub use types::{Billboard, BillboardInfo, BillboardOrientation, FadeParams, VisibilityRange};
