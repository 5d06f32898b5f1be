//! Billboard manager errors

use crate::foundation::ids::ShaderId;

/// Errors reported by [`BillboardManager::add_billboards`](super::BillboardManager::add_billboards)
///
/// Every variant is raised before any state changes, so a failed call leaves
/// the manager and the change set exactly as they were.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BillboardError {
    /// The batch was empty or a billboard/info failed validation
    #[error("Invalid billboard input: {0}")]
    InvalidInput(String),

    /// The shader handle is not registered with the scene
    #[error("Unknown shader: {0}")]
    UnknownShader(ShaderId),

    /// The scene the manager was bound to has been torn down
    #[error("Scene has been released")]
    SceneReleased,
}

/// Result alias for billboard operations
pub type BillboardResult<T> = Result<T, BillboardError>;
