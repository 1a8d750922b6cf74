//! Material construction
//!
//! [`MaterialBuilder`] is the fluent API for creating materials. The
//! `build_*` functions below turn preset sections into the materials the
//! scene binder assigns by role.

use thiserror::Error;

use crate::foundation::math::{utils, Rgb, Vec3};
use crate::presets::{
    ArmsOverlayConfig, FakeInteriorConfig, FrameConfig, LensBackConfig, LensConfig, LogoConfig,
    DEFAULT_FRAME_OPACITY, DEFAULT_OVERLAY_TRANSPARENT_OPACITY,
};
use crate::render::shader::{inject_fresnel, inject_overlay_mask, remove_fresnel, FresnelParams};
use crate::render::texture::{ColorSpace, TextureCache, TextureError, TextureHandle};

use super::material::{Material, MaterialKind, RenderFlags};

/// Name given to fake interior materials
pub const FAKE_INTERIOR_NAME: &str = "fake";
/// Draw order of the logo decal
pub const LOGO_RENDER_ORDER: i32 = 10;

/// Reasons a preset section produced no material
#[derive(Error, Debug)]
pub enum MaterialBuildError {
    /// An optional preset field the feature needs is absent
    #[error("preset field '{field}' is not set")]
    ConfigMissingField {
        /// Dotted path of the field
        field: &'static str,
    },
    /// A referenced texture failed to load
    #[error(transparent)]
    AssetLoadFailure(#[from] TextureError),
}

/// Which frame mesh a frame material is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePart {
    /// Upper rim
    Up,
    /// Lower rim
    Down,
    /// Untextured arm
    Arm,
}

/// Builder for creating materials programmatically
///
/// # Examples
/// ```
/// use eyewear_viewer::render::{MaterialBuilder, MaterialKind};
///
/// let tinted = MaterialBuilder::new(MaterialKind::Physical)
///     .color_rgb([0.5, 0.0, 0.3])
///     .roughness(0.1)
///     .opacity(0.9)
///     .transparent(true)
///     .depth_write(false)
///     .build();
/// assert!(tinted.is_transparent());
/// ```
#[derive(Debug, Clone)]
pub struct MaterialBuilder {
    material: Material,
}

impl MaterialBuilder {
    /// Start from the defaults of the given shading model
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            material: Material::new(kind),
        }
    }

    /// Set the material name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.material.name = Some(name.into());
        self
    }

    /// Set the diffuse color
    pub fn color(mut self, color: Vec3) -> Self {
        self.material.params.color = color;
        self
    }

    /// Set the diffuse color from a preset triple, unclamped
    pub fn color_rgb(self, color: Rgb) -> Self {
        self.color(utils::rgb(color))
    }

    /// Set the opacity
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.material.params.opacity = opacity;
        self
    }

    /// Set the roughness
    pub fn roughness(mut self, roughness: f32) -> Self {
        self.material.params.roughness = roughness;
        self
    }

    /// Set the metalness
    pub fn metalness(mut self, metalness: f32) -> Self {
        self.material.params.metalness = metalness;
        self
    }

    /// Set the environment map intensity
    pub fn env_map_intensity(mut self, intensity: f32) -> Self {
        self.material.params.env_map_intensity = intensity;
        self
    }

    /// Set the emissive strength
    pub fn emissive_intensity(mut self, intensity: f32) -> Self {
        self.material.params.emissive_intensity = intensity;
        self
    }

    /// Add a clear-coat layer
    pub fn clearcoat(mut self, strength: f32, roughness: f32) -> Self {
        self.material.params.physical.clearcoat = strength;
        self.material.params.physical.clearcoat_roughness = roughness;
        self
    }

    /// Set the transmission
    pub fn transmission(mut self, transmission: f32) -> Self {
        self.material.params.physical.transmission = transmission;
        self
    }

    /// Set the index of refraction
    pub fn ior(mut self, ior: f32) -> Self {
        self.material.params.physical.ior = ior;
        self
    }

    /// Set the reflectivity
    pub fn reflectivity(mut self, reflectivity: f32) -> Self {
        self.material.params.physical.reflectivity = reflectivity;
        self
    }

    /// Toggle alpha blending
    pub fn transparent(self, enabled: bool) -> Self {
        self.flag(RenderFlags::TRANSPARENT, enabled)
    }

    /// Toggle depth writes
    pub fn depth_write(self, enabled: bool) -> Self {
        self.flag(RenderFlags::DEPTH_WRITE, enabled)
    }

    /// Toggle depth testing
    pub fn depth_test(self, enabled: bool) -> Self {
        self.flag(RenderFlags::DEPTH_TEST, enabled)
    }

    /// Toggle tone mapping
    pub fn tone_mapped(self, enabled: bool) -> Self {
        self.flag(RenderFlags::TONE_MAPPED, enabled)
    }

    /// Set the draw order
    pub fn render_order(mut self, order: i32) -> Self {
        self.material.render_order = order;
        self
    }

    /// Set the color texture
    pub fn map(mut self, texture: Option<TextureHandle>) -> Self {
        self.material.map = texture;
        self
    }

    /// Set the alpha texture
    pub fn alpha_map(mut self, texture: Option<TextureHandle>) -> Self {
        self.material.alpha_map = texture;
        self
    }

    /// Build the material
    pub fn build(self) -> Material {
        self.material
    }

    fn flag(mut self, flag: RenderFlags, enabled: bool) -> Self {
        self.material.flags.set(flag, enabled);
        self
    }
}

/// Frame material for one frame part
///
/// The opaque frame is a standard material. A transparent frame becomes a
/// clear-coated physical material that never writes depth.
pub fn build_frame_material(frame: &FrameConfig, part: FramePart) -> Material {
    let color = match part {
        FramePart::Up => frame.up_color(),
        FramePart::Down => frame.down_color(),
        FramePart::Arm => frame.base_color,
    };

    let builder = if frame.transparent {
        MaterialBuilder::new(MaterialKind::Physical)
            .metalness(0.0)
            .transparent(true)
            .opacity(frame.opacity.unwrap_or(DEFAULT_FRAME_OPACITY))
            .depth_write(false)
            .env_map_intensity(3.5)
            .clearcoat(1.0, frame.roughness)
            .reflectivity(frame.reflectivity())
    } else {
        MaterialBuilder::new(MaterialKind::Standard).metalness(frame.metalness)
    };

    builder
        .name(format!("frame_{part:?}").to_lowercase())
        .color_rgb(color)
        .roughness(frame.roughness)
        .build()
}

/// Arm overlay (temple text) material
///
/// Colored like the lower rim. The overlay mask is attached when its
/// texture loads; otherwise the overlay renders as a plain arm.
pub fn build_overlay_material(frame: &FrameConfig, overlay: &ArmsOverlayConfig, textures: &mut TextureCache) -> Material {
    let builder = if frame.transparent {
        MaterialBuilder::new(MaterialKind::Physical)
            .metalness(frame.metalness)
            .transparent(true)
            .opacity(frame.opacity.unwrap_or(DEFAULT_OVERLAY_TRANSPARENT_OPACITY))
            .depth_write(false)
            .env_map_intensity(5.2)
            .clearcoat(5.0, frame.roughness)
    } else {
        MaterialBuilder::new(MaterialKind::Standard)
            .metalness(frame.metalness)
            .transparent(overlay.transparent)
            .opacity(overlay.opacity())
            .depth_write(!overlay.transparent)
            .env_map_intensity(2.2)
    };

    let mut material = builder
        .name("arm_overlay")
        .color_rgb(frame.down_color())
        .roughness(frame.roughness)
        .build();

    match overlay_texture(overlay, textures) {
        Ok(texture) => inject_overlay_mask(&mut material, texture, utils::rgb(overlay.tint_color)),
        Err(e) => log::warn!("Arm overlay mask skipped: {e}"),
    }
    material
}

fn overlay_texture(overlay: &ArmsOverlayConfig, textures: &mut TextureCache) -> Result<TextureHandle, MaterialBuildError> {
    let path = overlay
        .texture_path
        .as_deref()
        .ok_or(MaterialBuildError::ConfigMissingField { field: "arms_overlay.texture_path" })?;
    Ok(textures.load(path, ColorSpace::Srgb)?)
}

/// Tinted lens material
pub fn build_lens_material(lens: &LensConfig, textures: &mut TextureCache) -> Material {
    let mut material = MaterialBuilder::new(MaterialKind::Physical)
        .name("glass")
        .transparent(true)
        .transmission(0.0)
        .reflectivity(1.0)
        .depth_write(false)
        .depth_test(true)
        .env_map_intensity(0.0)
        .clearcoat(1.0, 0.01)
        .build();
    configure_lens_material(&mut material, lens, textures);
    material
}

/// Apply the preset-dependent lens values to an existing lens material
///
/// Keeps the material's compiled program: Fresnel values are written into
/// the bound uniforms, only turning Fresnel on or off recompiles.
pub fn configure_lens_material(material: &mut Material, lens: &LensConfig, textures: &mut TextureCache) {
    material.params.color = utils::rgb(lens.color);
    material.params.opacity = lens.opacity;
    material.params.roughness = lens.roughness;
    material.params.metalness = lens.metalness();
    material.params.physical.ior = lens.ior();

    let color_space = if lens.gradient_map_path.is_some() {
        ColorSpace::Srgb
    } else {
        ColorSpace::Linear
    };
    material.alpha_map = textures.load_optional(lens.alpha_map_path(), color_space, "lens alpha map");

    match FresnelParams::from_lens(lens) {
        Some(params) => inject_fresnel(material, params),
        None => remove_fresnel(material),
    }
}

/// Inner lens backing layer
pub fn build_lens_back_material(back: &LensBackConfig) -> Material {
    let opaque = back.opacity >= 1.0;
    MaterialBuilder::new(MaterialKind::Physical)
        .name("glass_back")
        .color_rgb(back.color)
        .opacity(back.opacity)
        .roughness(0.2)
        .metalness(0.0)
        .transparent(!opaque)
        .depth_write(opaque)
        .build()
}

/// Unlit logo decal drawn on top of everything
pub fn build_logo_material(logo: &LogoConfig, textures: &mut TextureCache) -> Result<Material, MaterialBuildError> {
    let path = logo
        .texture_path
        .as_deref()
        .ok_or(MaterialBuildError::ConfigMissingField { field: "logo.texture_path" })?;
    let texture = textures.load(path, ColorSpace::Srgb)?;

    Ok(MaterialBuilder::new(MaterialKind::Basic)
        .name("logo")
        .map(Some(texture))
        .opacity(1.0)
        .emissive_intensity(logo.emissive_intensity)
        .transparent(true)
        .depth_write(false)
        .depth_test(false)
        .tone_mapped(false)
        .render_order(LOGO_RENDER_ORDER)
        .build())
}

/// Baked interior shown through the lenses
pub fn build_fake_interior_material(fake: &FakeInteriorConfig, textures: &mut TextureCache) -> Result<Material, MaterialBuildError> {
    let path = fake
        .texture_path
        .as_deref()
        .ok_or(MaterialBuildError::ConfigMissingField { field: "fake_interior.texture_path" })?;
    let texture = textures.load(path, ColorSpace::Srgb)?;

    Ok(MaterialBuilder::new(MaterialKind::Standard)
        .name(FAKE_INTERIOR_NAME)
        .map(Some(texture))
        .metalness(0.0)
        .roughness(1.0)
        .build())
}
