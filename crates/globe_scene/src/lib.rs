//! # Globe Scene
//!
//! Billboard lifecycle management and change-set batching for a 3D globe/map
//! renderer.
//!
//! ## Features
//!
//! - **Billboards**: eye-facing and ground-facing markers with shared batch parameters
//! - **Change Sets**: ordered, frame-aligned scene mutations
//! - **Scene Registry**: identifier → object map mutated only by applying change sets
//! - **Configuration**: TOML and RON config files
//!
//! ## Quick Start
//!
//! ```rust
//! use globe_scene::prelude::*;
//!
//! let mut scene = Scene::new();
//! let shader = scene.register_shader(ShaderProgram::new("billboard", "vert.spv", "frag.spv"));
//! let mut manager = BillboardManager::new(&scene);
//!
//! let mut changes = ChangeSet::new();
//! let marker = Billboard::new(Point3d::new(0.0, 0.0, 1.0), Vec2::new(0.01, 0.01));
//! let batch = manager
//!     .add_billboards(&[marker], &BillboardInfo::default(), shader, &mut changes)
//!     .expect("shader is registered");
//!
//! // Later, at the frame boundary
//! scene.apply_changes(&mut changes);
//! assert_eq!(scene.object_count(), 1);
//!
//! manager.remove_billboards(&[batch.id], &mut changes);
//! scene.apply_changes(&mut changes);
//! assert_eq!(scene.object_count(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod billboard;

#[cfg(test)]
mod tests;

pub use billboard::{BillboardError, BillboardManager};
pub use config::{ConfigError, EngineConfig};
pub use scene::{ChangeSet, Scene};

/// Run process-wide setup and install the default logger
///
/// Both steps run at most once; later calls return immediately.
pub fn init() {
    foundation::logging::init();
    foundation::runtime::ensure_initialized();
}

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        billboard::{
            Billboard, BillboardBatch, BillboardError, BillboardInfo, BillboardManager,
            BillboardOrientation, BillboardState, FadeParams, VisibilityRange,
        },
        config::{BillboardConfig, Config, EngineConfig, SceneConfig},
        foundation::{
            ids::{BatchId, BillboardId, ObjectId, ShaderId, TextureId},
            math::{Color, Point3d, Vec2},
        },
        scene::{ApplyReport, ChangeRecord, ChangeRequest, ChangeSet, Scene, ShaderProgram},
    };
}
