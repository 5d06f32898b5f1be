//! Shader program registry
//!
//! The scene owns the registry; billboard managers only look handles up.
//! Programs themselves are compiled by the renderer, so an entry here is just
//! the handle plus where the program came from.

use crate::foundation::ids::{reserve_identity, ShaderId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Description of a compiled shader program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderProgram {
    /// Name used in logs and lookups
    pub name: String,
    /// Path to the vertex shader SPIR-V file
    pub vertex_shader_path: String,
    /// Path to the fragment shader SPIR-V file
    pub fragment_shader_path: String,
}

impl ShaderProgram {
    /// Create a new shader program description
    pub fn new(
        name: impl Into<String>,
        vertex_path: impl Into<String>,
        fragment_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }
}

/// Errors raised while registering shaders
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The empty identity cannot name a shader
    #[error("Shader id 0 is reserved")]
    InvalidShaderId,

    /// Another program already uses this handle
    #[error("Shader already registered: {0}")]
    DuplicateShader(ShaderId),
}

/// Handle → program lookup table
#[derive(Debug, Default)]
pub struct ShaderRegistry {
    programs: HashMap<ShaderId, ShaderProgram>,
}

impl ShaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a program under a freshly allocated handle
    pub fn add(&mut self, program: ShaderProgram) -> ShaderId {
        let mut id = ShaderId::allocate();
        while self.programs.contains_key(&id) {
            id = ShaderId::allocate();
        }
        self.programs.insert(id, program);
        id
    }

    /// Register a program under a handle chosen by the caller
    pub fn insert(&mut self, id: ShaderId, program: ShaderProgram) -> Result<(), SceneError> {
        if id.is_empty() {
            return Err(SceneError::InvalidShaderId);
        }
        if self.programs.contains_key(&id) {
            return Err(SceneError::DuplicateShader(id));
        }
        reserve_identity(id.raw());
        self.programs.insert(id, program);
        Ok(())
    }

    /// Drop a program
    pub fn remove(&mut self, id: ShaderId) -> Option<ShaderProgram> {
        self.programs.remove(&id)
    }

    /// Look a program up
    pub fn get(&self, id: ShaderId) -> Option<&ShaderProgram> {
        self.programs.get(&id)
    }

    /// Whether `id` names a registered program
    pub fn contains(&self, id: ShaderId) -> bool {
        self.programs.contains_key(&id)
    }

    /// Find a program handle by name
    pub fn find_by_name(&self, name: &str) -> Option<ShaderId> {
        self.programs
            .iter()
            .find(|(_, program)| program.name == name)
            .map(|(id, _)| *id)
    }

    /// Number of registered programs
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether no programs are registered
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

/// Registry shared between a scene and the managers bound to it
#[derive(Debug, Clone, Default)]
pub struct SharedShaderRegistry(Arc<RwLock<ShaderRegistry>>);

impl SharedShaderRegistry {
    /// Read access. The registry holds plain data, so a poisoned lock is still usable.
    pub fn read(&self) -> RwLockReadGuard<'_, ShaderRegistry> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access
    pub fn write(&self) -> RwLockWriteGuard<'_, ShaderRegistry> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Non-owning reference that stops resolving once the scene is gone
    pub fn downgrade(&self) -> WeakShaderRegistry {
        WeakShaderRegistry(Arc::downgrade(&self.0))
    }
}

/// Non-owning reference to a scene's shader registry
#[derive(Debug, Clone)]
pub struct WeakShaderRegistry(std::sync::Weak<RwLock<ShaderRegistry>>);

impl WeakShaderRegistry {
    /// `None` once the owning scene has been dropped
    pub fn upgrade(&self) -> Option<SharedShaderRegistry> {
        self.0.upgrade().map(SharedShaderRegistry)
    }
}
