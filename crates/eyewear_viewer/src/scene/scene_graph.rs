//! Loaded model as seen by the viewer
//!
//! The asset collaborator flattens the imported hierarchy into world-space
//! nodes. Only names, mesh bounds, source material names and camera poses
//! matter here; geometry stays with the renderer.

use crate::foundation::math::{Quat, Vec3};
use crate::render::MaterialId;

use super::bounds::Aabb;

/// Mesh payload
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    /// Name of the material the mesh was authored with
    pub source_material_name: Option<String>,
    /// World-space bounds
    pub bounds: Aabb,
    /// Assigned viewer material; `None` renders the source material
    pub material: Option<MaterialId>,
}

/// Camera payload
#[derive(Debug, Clone, PartialEq)]
pub struct CameraNode {
    /// World-space position
    pub position: Vec3,
    /// World-space orientation
    pub orientation: Quat,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

/// What a node carries
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Renderable mesh
    Mesh(MeshNode),
    /// Authored camera viewpoint
    Camera(CameraNode),
    /// Transform-only node
    Group,
}

/// A named node
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Node name from the asset
    pub name: String,
    /// Payload
    pub kind: NodeKind,
}

impl SceneNode {
    /// Mesh payload, if any
    pub fn mesh(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Camera payload, if any
    pub fn camera(&self) -> Option<&CameraNode> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}

/// Flat list of world-space nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh rendering its source material
    pub fn add_mesh(&mut self, name: impl Into<String>, source_material_name: Option<&str>, bounds: Aabb) -> usize {
        self.push(name.into(), NodeKind::Mesh(MeshNode {
            source_material_name: source_material_name.map(str::to_string),
            bounds,
            material: None,
        }))
    }

    /// Add a camera
    pub fn add_camera(&mut self, name: impl Into<String>, position: Vec3, orientation: Quat, fov_degrees: f32) -> usize {
        self.push(name.into(), NodeKind::Camera(CameraNode {
            position,
            orientation,
            fov_degrees,
        }))
    }

    /// Add a transform-only node
    pub fn add_group(&mut self, name: impl Into<String>) -> usize {
        self.push(name.into(), NodeKind::Group)
    }

    fn push(&mut self, name: String, kind: NodeKind) -> usize {
        self.nodes.push(SceneNode { name, kind });
        self.nodes.len() - 1
    }

    /// All nodes in traversal order
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// All nodes, mutably
    pub fn nodes_mut(&mut self) -> &mut [SceneNode] {
        &mut self.nodes
    }

    /// First node with exactly this name
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Material assigned to the named mesh
    pub fn material_of(&self, name: &str) -> Option<MaterialId> {
        self.find(name)?.mesh()?.material
    }

    /// Enclosing bounds of every mesh
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::enclosing(self.nodes.iter().filter_map(|node| node.mesh().map(|mesh| &mesh.bounds)))
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_ignore_cameras() {
        let mut scene = SceneGraph::new();
        scene.add_mesh("frame_up", None, Aabb::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)));
        scene.add_camera("Cam_Front", Vec3::new(0.0, 0.0, 50.0), Quat::identity(), 40.0);
        scene.add_group("Root");

        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.center(), Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(scene.len(), 3);
        assert!(scene.find("Cam_Front").unwrap().camera().is_some());
        assert!(scene.material_of("frame_up").is_none());
    }
}
