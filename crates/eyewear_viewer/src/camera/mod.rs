//! Camera, anchors and anchor transitions

pub mod anchor;
#[allow(clippy::module_inception)]
pub mod camera;
pub mod transition;

pub use anchor::CameraAnchor;
pub use camera::Camera;
pub use transition::{CameraTransition, Transition, TransitionState};
