//! Binding presets to a loaded model
//!
//! One traversal per model load assigns role materials, collects lens
//! materials and captures camera anchors. Preset switches run the same
//! traversal again, reconfiguring the existing lens materials in place and
//! rebuilding every other role material.

use std::collections::HashMap;

use crate::camera::CameraAnchor;
use crate::foundation::math::Vec3;
use crate::presets::Preset;
use crate::render::material::{
    build_fake_interior_material, build_frame_material, build_lens_back_material, build_lens_material,
    build_logo_material, build_overlay_material, configure_lens_material, FramePart, MaterialBuildError,
};
use crate::render::{Material, MaterialId, MaterialRegistry, TextureCache};

use super::classifier::{Classifier, MeshRole};
use super::bounds::Aabb;
use super::scene_graph::{CameraNode, NodeKind, SceneGraph};

/// Result of binding a model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelBinding {
    /// Lens materials in traversal order
    pub lens_materials: Vec<MaterialId>,
    /// Camera anchors by node name
    pub anchors: HashMap<String, CameraAnchor>,
    /// Center of the model's bounds
    pub look_at_target: Vec3,
    /// Every other material the binding created
    pub role_materials: Vec<MaterialId>,
}

impl ModelBinding {
    /// Every material owned by this binding
    pub fn all_materials(&self) -> impl Iterator<Item = MaterialId> + '_ {
        self.lens_materials.iter().chain(self.role_materials.iter()).copied()
    }
}

/// Assigns materials to meshes by role
#[derive(Debug, Clone, Default)]
pub struct SceneBinder {
    classifier: Classifier,
}

impl SceneBinder {
    /// Create a binder using a custom classifier
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Classifier in use
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Bind a freshly loaded model
    ///
    /// Materials, lens collection, model bounds and camera anchors all come
    /// from a single pass over the scene.
    pub fn bind_model(
        &self,
        scene: &mut SceneGraph,
        preset: &Preset,
        materials: &mut MaterialRegistry,
        textures: &mut TextureCache,
    ) -> ModelBinding {
        let mut binding = ModelBinding::default();
        let mut cameras = Vec::new();
        let mut bounds: Option<Aabb> = None;
        self.assign(scene, preset, materials, textures, &mut binding, Some((&mut cameras, &mut bounds)));

        binding.look_at_target = bounds.map(|b| b.center()).unwrap_or_else(Vec3::zeros);
        for (name, camera) in cameras {
            let anchor = CameraAnchor::from_node(&name, &camera, binding.look_at_target);
            binding.anchors.insert(name, anchor);
        }

        log::info!(
            "Bound preset '{}': {} lens materials, {} role materials, {} anchors",
            preset.name,
            binding.lens_materials.len(),
            binding.role_materials.len(),
            binding.anchors.len()
        );
        binding
    }

    /// Re-apply a preset to an already bound model
    ///
    /// Role materials of the previous preset are disposed first. Lens
    /// materials survive and are reconfigured. Anchors are untouched.
    pub fn rebind_preset(
        &self,
        scene: &mut SceneGraph,
        preset: &Preset,
        binding: &mut ModelBinding,
        materials: &mut MaterialRegistry,
        textures: &mut TextureCache,
    ) {
        for id in binding.role_materials.drain(..) {
            materials.dispose(id);
        }
        self.assign(scene, preset, materials, textures, binding, None);
        log::info!(
            "Re-bound preset '{}': {} lens materials, {} role materials",
            preset.name,
            binding.lens_materials.len(),
            binding.role_materials.len()
        );
    }

    fn assign(
        &self,
        scene: &mut SceneGraph,
        preset: &Preset,
        materials: &mut MaterialRegistry,
        textures: &mut TextureCache,
        binding: &mut ModelBinding,
        mut capture: Option<(&mut Vec<(String, CameraNode)>, &mut Option<Aabb>)>,
    ) {
        let previous_lenses = std::mem::take(&mut binding.lens_materials);
        let mut shared: HashMap<MeshRole, Option<MaterialId>> = HashMap::new();

        for node in scene.nodes_mut() {
            let mesh = match &mut node.kind {
                NodeKind::Mesh(mesh) => mesh,
                NodeKind::Camera(camera) => {
                    if let Some((cameras, _)) = capture.as_mut() {
                        cameras.push((node.name.clone(), camera.clone()));
                    }
                    continue;
                }
                NodeKind::Group => continue,
            };
            if let Some((_, bounds)) = capture.as_mut() {
                **bounds = Some(bounds.map_or(mesh.bounds, |b| b.union(&mesh.bounds)));
            }
            let Some(role) = self
                .classifier
                .classify(&node.name, mesh.source_material_name.as_deref())
            else {
                continue;
            };

            if role == MeshRole::Lens {
                let id = match mesh.material.filter(|id| previous_lenses.contains(id)) {
                    Some(id) => {
                        if let Some(material) = materials.get_mut(id) {
                            configure_lens_material(material, &preset.lens, textures);
                        }
                        id
                    }
                    None => materials.register(build_lens_material(&preset.lens, textures)),
                };
                mesh.material = Some(id);
                binding.lens_materials.push(id);
                log::debug!("'{}' -> lens {:?}", node.name, id);
                continue;
            }

            let id = *shared.entry(role).or_insert_with(|| {
                let material = match build_role_material(role, preset, textures) {
                    Ok(material) => material,
                    Err(e) => {
                        log::warn!("No {role:?} material for preset '{}': {e}", preset.name);
                        return None;
                    }
                };
                let id = materials.register(material);
                binding.role_materials.push(id);
                Some(id)
            });
            mesh.material = id;
            log::debug!("'{}' -> {:?} {:?}", node.name, role, id);
        }

        for id in previous_lenses {
            if !binding.lens_materials.contains(&id) {
                materials.dispose(id);
            }
        }
    }
}

fn build_role_material(role: MeshRole, preset: &Preset, textures: &mut TextureCache) -> Result<Material, MaterialBuildError> {
    match role {
        MeshRole::FrameUp => Ok(build_frame_material(&preset.frame, FramePart::Up)),
        MeshRole::FrameDown => Ok(build_frame_material(&preset.frame, FramePart::Down)),
        MeshRole::Arm => Ok(build_frame_material(&preset.frame, FramePart::Arm)),
        MeshRole::ArmOverlay => Ok(build_overlay_material(&preset.frame, &preset.arms_overlay, textures)),
        MeshRole::Lens => Ok(build_lens_material(&preset.lens, textures)),
        MeshRole::LensBack => preset
            .lens
            .back
            .as_ref()
            .map(build_lens_back_material)
            .ok_or(MaterialBuildError::ConfigMissingField { field: "lens.back" }),
        MeshRole::Logo => {
            let logo = preset
                .logo
                .as_ref()
                .ok_or(MaterialBuildError::ConfigMissingField { field: "logo" })?;
            build_logo_material(logo, textures)
        }
        MeshRole::FakeInterior => {
            let fake = preset
                .fake_interior
                .as_ref()
                .ok_or(MaterialBuildError::ConfigMissingField { field: "fake_interior" })?;
            build_fake_interior_material(fake, textures)
        }
    }
}
