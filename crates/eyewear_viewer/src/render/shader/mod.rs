//! Shader augmentation
//!
//! Materials are compiled against a host program (see [`HostPipeline`]) and
//! augmented by inserting source patches right after well-known include
//! markers. Augmentation is a pure string transform, so a host program that
//! lacks a marker is detected up front and the material keeps the plain host
//! program instead of failing to render.

pub mod fresnel;
pub mod markers;
pub mod overlay;
pub mod pipeline;
pub mod program;

pub use fresnel::{inject_fresnel, remove_fresnel, FresnelParams, FresnelPatchState, FresnelUniformBlock, FRESNEL_UNIFORMS};
pub use markers::{inject, ShaderError, ShaderMarker};
pub use overlay::{inject_overlay_mask, OverlayMaskState};
pub use pipeline::HostPipeline;
pub use program::{ShaderProgram, ShaderSource, ShaderStage, UniformHandle, UniformTable, UniformValue};
