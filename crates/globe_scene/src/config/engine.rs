//! Scene and billboard configuration

use super::Config;
use crate::billboard::BillboardInfo;
use serde::{Deserialize, Serialize};

/// Scene behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene clock value at construction (seconds)
    pub start_time: f64,
    /// Log at warn level when applied records name ids the scene does not hold
    pub warn_on_missing_ids: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            warn_on_missing_ids: false,
        }
    }
}

/// Billboard manager behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillboardConfig {
    /// Largest batch accepted by one `add_billboards` call, 0 for no limit
    pub max_batch_size: usize,
    /// Info used by callers that have no batch-specific parameters
    pub default_info: BillboardInfo,
}

impl Default for BillboardConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 0,
            default_info: BillboardInfo::default(),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scene settings
    pub scene: SceneConfig,
    /// Billboard manager settings
    pub billboards: BillboardConfig,
}

impl Config for EngineConfig {}
