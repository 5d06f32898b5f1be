//! Scene management
//!
//! ```text
//! BillboardManager ──append──► ChangeSet ──apply_changes──► Scene
//! ```
//!
//! - [`ChangeSet`]: ordered, append-only log of pending mutations
//! - [`Scene`]: identifier → object registry, mutated only by applying change sets
//! - [`ShaderRegistry`]: shader handle lookup shared with managers

mod change_set;
mod scene_graph;
mod scene_object;
mod shader_registry;

pub use change_set::{ChangeRecord, ChangeRequest, ChangeSet};
pub use scene_graph::{ApplyReport, Scene};
pub use scene_object::SceneObject;
pub use shader_registry::{
    SceneError, ShaderProgram, ShaderRegistry, SharedShaderRegistry, WeakShaderRegistry,
};
