//! Render-facing resources
//!
//! The viewer never draws anything itself. It prepares materials, shader
//! programs and texture handles that the external renderer consumes after
//! each [`crate::session::ViewerSession::advance`].

pub mod material;
pub mod shader;
pub mod texture;

pub use material::{
    Material, MaterialAppearance, MaterialBuilder, MaterialId, MaterialKind, MaterialParams,
    MaterialRegistry, PhysicalParams, RenderFlags,
};
pub use shader::{
    HostPipeline, ShaderError, ShaderMarker, ShaderProgram, ShaderSource, ShaderStage,
    UniformHandle, UniformTable, UniformValue,
};
pub use texture::{
    ColorSpace, DeferredTextureLoader, ImageTextureLoader, TextureCache, TextureError,
    TextureHandle, TextureInfo, TextureLoader,
};
