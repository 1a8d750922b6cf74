//! Math utilities and types
//!
//! Provides the vector/rotation aliases used by the viewer together with the
//! easing and interpolation helpers shared by both animation state machines.

pub use nalgebra::{Vector3, UnitQuaternion};

/// 3D vector type (positions, directions and RGB colors)
pub type Vec3 = Vector3<f32>;

/// Unit quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Designer-authored RGB triple
///
/// Components are nominally in [0, 1] but may exceed 1.0 for emissive-style
/// boosting, so they are never clamped.
pub type Rgb = [f32; 3];

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Rec. 601 luma weights used by the chroma boost
    pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];
}

/// Math utility functions
pub mod utils {
    use super::{constants, Quat, Rgb, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    ///
    /// Written as `a * (1 - t) + b * t` so that `t == 1` lands exactly on `b`.
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a * (1.0 - t) + b * t
    }

    /// Component-wise linear interpolation, exact at both endpoints
    pub fn lerp_vec3(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
        a * (1.0 - t) + b * t
    }

    /// Cubic smoothstep ease `3t² - 2t³` with `t` clamped to [0, 1]
    pub fn ease(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }

    /// GLSL-style `smoothstep(edge0, edge1, x)`
    pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
        ease((x - edge0) / (edge1 - edge0))
    }

    /// Spherical interpolation that always returns a unit rotation
    ///
    /// Falls back to normalised linear interpolation when the two rotations
    /// are (anti)parallel and slerp is undefined.
    pub fn slerp(from: &Quat, to: &Quat, t: f32) -> Quat {
        from.try_slerp(to, t, 1.0e-6)
            .unwrap_or_else(|| from.nlerp(to, t))
    }

    /// Orientation of a camera at `eye` looking at `target`
    ///
    /// Cameras look down their local -Z axis, so the local +Z axis is aimed
    /// from the target back at the eye.
    pub fn look_rotation(eye: &Vec3, target: &Vec3, up: &Vec3) -> Quat {
        let back = eye - target;
        if back.norm_squared() <= f32::EPSILON {
            return Quat::identity();
        }
        Quat::face_towards(&back, up)
    }

    /// Convert a designer RGB triple into a vector
    pub fn rgb(color: Rgb) -> Vec3 {
        Vec3::new(color[0], color[1], color[2])
    }

    /// Rec. 601 luma of a color
    pub fn luma(color: &Vec3) -> f32 {
        color.dot(&Vec3::from(constants::LUMA_WEIGHTS))
    }

    /// Scale the chroma of a color while keeping its luma
    ///
    /// `boosted = luma + (color - luma) * amount`; an amount of 1.0 is the
    /// identity and 0.0 fully desaturates.
    pub fn chroma_boost(color: &Vec3, amount: f32) -> Vec3 {
        let l = luma(color);
        let grey = Vec3::repeat(l);
        grey + (color - grey) * amount
    }
}
