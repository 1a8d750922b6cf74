//! Authored camera viewpoints

use crate::foundation::math::{Quat, Vec3};
use crate::scene::CameraNode;

/// A named viewpoint captured from the model's camera nodes
#[derive(Debug, Clone, PartialEq)]
pub struct CameraAnchor {
    /// Camera node name
    pub name: String,
    /// World-space position
    pub position: Vec3,
    /// World-space orientation
    pub orientation: Quat,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Model center every anchor looks at
    pub look_at_target: Vec3,
}

impl CameraAnchor {
    /// Capture an anchor from a camera node
    pub fn from_node(name: &str, node: &CameraNode, look_at_target: Vec3) -> Self {
        Self {
            name: name.to_string(),
            position: node.position,
            orientation: node.orientation,
            fov_degrees: node.fov_degrees,
            look_at_target,
        }
    }
}
