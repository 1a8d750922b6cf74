//! Viewer camera
//!
//! Position and orientation are stored directly so transitions can slerp
//! between authored poses. The look-at target is what orbit control pivots
//! around while free roaming.

use crate::foundation::math::{utils, Quat, Vec3};

/// Perspective camera driven by anchors and orbit control
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera orientation; the camera looks down its local -Z axis
    pub orientation: Quat,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Orbit pivot in world space
    pub target: Vec3,
    /// Up vector used when aiming at the target (typically [0, 1, 0])
    pub up: Vec3,
    /// Whether user orbit input may move the camera
    pub orbit_enabled: bool,
}

impl Camera {
    /// Create a camera at `position` looking down -Z
    pub fn new(position: Vec3, fov_degrees: f32) -> Self {
        Self {
            position,
            orientation: Quat::identity(),
            fov_degrees,
            target: Vec3::zeros(),
            up: Vec3::y(),
            orbit_enabled: false,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Set the orbit pivot and aim the camera at it
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        self.orientation = utils::look_rotation(&self.position, &target, &self.up);
    }

    /// Unit view direction in world space
    pub fn forward(&self) -> Vec3 {
        self.orientation * -Vec3::z()
    }

    /// Vertical field of view in radians
    pub fn fov_radians(&self) -> f32 {
        utils::deg_to_rad(self.fov_degrees)
    }
}
