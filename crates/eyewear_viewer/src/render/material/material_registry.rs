//! Material registry
//!
//! Owns every live material instance. Meshes only hold [`MaterialId`]s.
//! Disposed ids are queued until the renderer drains them and releases the
//! matching GPU resources.

use slotmap::SlotMap;

use crate::render::shader::{HostPipeline, ShaderError};

use super::material::{Material, MaterialId};

/// Central owner of material instances
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: SlotMap<MaterialId, Material>,
    disposed: Vec<MaterialId>,
}

impl MaterialRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a material
    pub fn register(&mut self, material: Material) -> MaterialId {
        let label = material.label().to_string();
        let id = self.materials.insert(material);
        log::trace!("Registered material '{}' as {:?}", label, id);
        id
    }

    /// Get a material
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Get a material mutably
    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Whether `id` refers to a live material
    pub fn contains(&self, id: MaterialId) -> bool {
        self.materials.contains_key(id)
    }

    /// Drop a material and queue its id for GPU release
    pub fn dispose(&mut self, id: MaterialId) -> Option<Material> {
        let material = self.materials.remove(id)?;
        log::trace!("Disposed material '{}' ({:?})", material.label(), id);
        self.disposed.push(id);
        Some(material)
    }

    /// Ids disposed since the last drain
    pub fn drain_disposed(&mut self) -> Vec<MaterialId> {
        std::mem::take(&mut self.disposed)
    }

    /// Run every pending compile hook
    ///
    /// Returns the number of programs compiled and the augmentation errors
    /// hit on the way; failing materials still get the base program.
    pub fn compile_all(&mut self, host: &HostPipeline) -> (usize, Vec<(MaterialId, ShaderError)>) {
        let mut compiled = 0;
        let mut errors = Vec::new();
        for (id, material) in self.materials.iter_mut() {
            match material.compile(host) {
                Ok(true) => compiled += 1,
                Ok(false) => {}
                Err(e) => {
                    compiled += 1;
                    errors.push((id, e));
                }
            }
        }
        (compiled, errors)
    }

    /// Iterate over `(id, material)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter()
    }

    /// Number of live materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether no material is registered
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
