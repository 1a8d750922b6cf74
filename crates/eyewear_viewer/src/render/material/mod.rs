//! Materials
//!
//! Material instances, the registry that owns them and the builders that
//! derive them from presets.

#[allow(clippy::module_inception)]
pub mod material;
pub mod material_builder;
pub mod material_registry;

pub use material::{
    Material, MaterialAppearance, MaterialId, MaterialKind, MaterialParams, PhysicalParams, RenderFlags,
};
pub use material_builder::{
    build_fake_interior_material, build_frame_material, build_lens_back_material, build_lens_material,
    build_logo_material, build_overlay_material, configure_lens_material, FramePart, MaterialBuildError,
    MaterialBuilder, FAKE_INTERIOR_NAME, LOGO_RENDER_ORDER,
};
pub use material_registry::MaterialRegistry;
