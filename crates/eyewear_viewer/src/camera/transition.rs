//! Camera anchor transitions
//!
//! Switching to a fixed anchor eases the camera from wherever it is to the
//! anchor pose. Switching to the free anchor snaps there and hands the camera
//! to orbit control.

use crate::foundation::math::{utils, Quat, Vec3};

use super::anchor::CameraAnchor;
use super::camera::Camera;

/// An in-flight move between two poses
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Clock time the move started at
    pub start_time: f32,
    /// Length of the move in seconds
    pub duration: f32,
    /// Starting position
    pub from_position: Vec3,
    /// Target position
    pub to_position: Vec3,
    /// Starting orientation
    pub from_orientation: Quat,
    /// Target orientation
    pub to_orientation: Quat,
}

impl Transition {
    /// Linear progress in [0, 1] at clock time `now`
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    /// Eased pose at linear progress `t`
    pub fn sample(&self, t: f32) -> (Vec3, Quat) {
        let e = utils::ease(t);
        (
            utils::lerp_vec3(&self.from_position, &self.to_position, e),
            utils::slerp(&self.from_orientation, &self.to_orientation, e),
        )
    }
}

/// Transition state machine
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TransitionState {
    /// Camera is at rest or orbiting
    #[default]
    Idle,
    /// Camera is easing towards an anchor
    Transitioning(Transition),
}

/// Moves a [`Camera`] between anchors
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTransition {
    state: TransitionState,
    duration: f32,
}

impl CameraTransition {
    /// Create an idle controller whose moves last `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self {
            state: TransitionState::Idle,
            duration,
        }
    }

    /// Current state
    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    /// Whether a move is in flight
    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, TransitionState::Transitioning(_))
    }

    /// Stop any move, leaving the camera where it is
    pub fn cancel(&mut self) {
        if self.is_transitioning() {
            log::debug!("Camera transition cancelled");
        }
        self.state = TransitionState::Idle;
    }

    /// Snap to a free-roam anchor
    ///
    /// Cancels any move, places the camera at the anchor looking at the
    /// anchor's target and enables orbit control. The field of view is kept.
    pub fn snap_to(&mut self, camera: &mut Camera, anchor: &CameraAnchor) {
        self.state = TransitionState::Idle;
        camera.set_position(anchor.position);
        camera.look_at(anchor.look_at_target);
        camera.orbit_enabled = true;
        log::debug!("Camera snapped to free anchor '{}'", anchor.name);
    }

    /// Start easing towards a fixed anchor from the camera's current pose
    ///
    /// Orbit control is disabled and the anchor's field of view applies at
    /// once. Calling this mid-flight restarts from the interpolated pose.
    pub fn start(&mut self, camera: &mut Camera, anchor: &CameraAnchor, now: f32) {
        camera.orbit_enabled = false;
        camera.fov_degrees = anchor.fov_degrees;
        camera.target = anchor.look_at_target;

        self.state = TransitionState::Transitioning(Transition {
            start_time: now,
            duration: self.duration,
            from_position: camera.position,
            to_position: anchor.position,
            from_orientation: camera.orientation,
            to_orientation: anchor.orientation,
        });
        log::debug!("Camera moving to '{}' over {:.2}s", anchor.name, self.duration);
    }

    /// Advance the move to clock time `now`
    pub fn update(&mut self, camera: &mut Camera, now: f32) {
        let TransitionState::Transitioning(transition) = &self.state else {
            return;
        };

        let t = transition.progress(now);
        let (position, orientation) = transition.sample(t);
        camera.position = position;
        camera.orientation = orientation;
        log::trace!("Camera transition t={:.3}", t);

        if t >= 1.0 {
            camera.position = transition.to_position;
            camera.orientation = transition.to_orientation;
            self.state = TransitionState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn anchor(position: Vec3, fov: f32) -> CameraAnchor {
        CameraAnchor {
            name: "Cam_Side".to_string(),
            position,
            orientation: utils::look_rotation(&position, &Vec3::zeros(), &Vec3::y()),
            fov_degrees: fov,
            look_at_target: Vec3::zeros(),
        }
    }

    fn camera() -> Camera {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), 80.0);
        camera.look_at(Vec3::zeros());
        camera
    }

    #[test]
    fn test_endpoints_are_exact() {
        let mut camera = camera();
        let start = camera.clone();
        let side = anchor(Vec3::new(10.0, 2.0, 0.0), 35.0);
        let mut transition = CameraTransition::new(0.8);

        transition.start(&mut camera, &side, 5.0);
        assert!(!camera.orbit_enabled);
        assert_eq!(camera.fov_degrees, 35.0);

        transition.update(&mut camera, 5.0);
        assert_eq!(camera.position, start.position);
        assert_relative_eq!(camera.orientation, start.orientation, epsilon = 1e-6);

        transition.update(&mut camera, 5.8);
        assert_eq!(camera.position, side.position);
        assert_eq!(camera.orientation, side.orientation);
        assert!(!transition.is_transitioning());
    }

    #[test]
    fn test_intermediate_orientations_are_unit() {
        let mut camera = camera();
        let side = anchor(Vec3::new(-3.0, 4.0, -8.0), 35.0);
        let mut transition = CameraTransition::new(0.8);
        transition.start(&mut camera, &side, 0.0);

        for step in 1..8 {
            transition.update(&mut camera, step as f32 * 0.1);
            assert_relative_eq!(camera.orientation.quaternion().norm(), 1.0, epsilon = 1e-5);
        }
        assert!(transition.is_transitioning());
    }

    #[test]
    fn test_midflight_switch_starts_from_current_pose() {
        let mut camera = camera();
        let side = anchor(Vec3::new(10.0, 0.0, 0.0), 35.0);
        let top = anchor(Vec3::new(0.0, 10.0, 0.1), 50.0);
        let mut transition = CameraTransition::new(0.8);

        transition.start(&mut camera, &side, 0.0);
        transition.update(&mut camera, 0.4);
        let midway = camera.clone();

        transition.start(&mut camera, &top, 0.4);
        transition.update(&mut camera, 0.4);
        assert_eq!(camera.position, midway.position);
        assert_relative_eq!(camera.orientation, midway.orientation, epsilon = 1e-6);

        match transition.state() {
            TransitionState::Transitioning(t) => assert_eq!(t.from_position, midway.position),
            TransitionState::Idle => panic!("expected a transition"),
        }
    }

    #[test]
    fn test_snap_cancels_transition() {
        let mut camera = camera();
        let side = anchor(Vec3::new(10.0, 0.0, 0.0), 35.0);
        let free = CameraAnchor {
            name: "Cam_Free".to_string(),
            ..anchor(Vec3::new(0.0, 3.0, 12.0), 60.0)
        };
        let mut transition = CameraTransition::new(0.8);

        transition.start(&mut camera, &side, 0.0);
        transition.update(&mut camera, 0.2);
        transition.snap_to(&mut camera, &free);

        assert!(!transition.is_transitioning());
        assert!(camera.orbit_enabled);
        assert_eq!(camera.position, free.position);
        assert_eq!(camera.fov_degrees, 35.0);
        assert_relative_eq!(camera.forward(), -free.position.normalize(), epsilon = 1e-5);

        transition.update(&mut camera, 0.6);
        assert_eq!(camera.position, free.position);
    }

    #[test]
    fn test_cancel_leaves_camera_in_place() {
        let mut camera = camera();
        let mut transition = CameraTransition::new(0.8);
        transition.start(&mut camera, &anchor(Vec3::new(10.0, 2.0, 0.0), 35.0), 0.0);
        transition.update(&mut camera, 0.4);
        let held = camera.position;

        transition.cancel();
        transition.update(&mut camera, 2.0);
        assert_eq!(transition.state(), &TransitionState::Idle);
        assert_eq!(camera.position, held);
    }
}
