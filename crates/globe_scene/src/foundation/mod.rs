//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types for globe-space positions and screen-space extents
//! - Identifier allocation
//! - Collections used by the scene registry
//! - Logging and process-wide runtime initialization

pub mod math;
pub mod ids;
pub mod collections;
pub mod logging;
pub mod runtime;
