//! Material instances
//!
//! A material is a bag of parameters the host renderer maps onto its own
//! standard, physical or unlit shading model, plus the optional shader
//! augmentations applied by its compile hook.

use bitflags::bitflags;

use crate::foundation::math::Vec3;
use crate::render::shader::fresnel::{apply_fresnel, FresnelParams, FresnelPatchState};
use crate::render::shader::overlay::{apply_overlay, OverlayMaskState};
use crate::render::shader::{HostPipeline, ShaderError, ShaderProgram};
use crate::render::texture::TextureHandle;

slotmap::new_key_type! {
    /// Non-owning reference from a mesh to a registered material
    pub struct MaterialId;
}

/// Shading model requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Metal/roughness lit material
    Standard,
    /// Standard plus clear-coat, transmission, IOR and reflectivity
    Physical,
    /// Unlit textured material
    Basic,
}

bitflags! {
    /// Fixed-function state for drawing a material
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u8 {
        /// Alpha blended, drawn in the transparent pass
        const TRANSPARENT = 1 << 0;
        /// Writes depth
        const DEPTH_WRITE = 1 << 1;
        /// Tests against depth
        const DEPTH_TEST = 1 << 2;
        /// Goes through the host's tone mapping
        const TONE_MAPPED = 1 << 3;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        RenderFlags::DEPTH_WRITE | RenderFlags::DEPTH_TEST | RenderFlags::TONE_MAPPED
    }
}

/// Parameters only the physical model reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    /// Clear-coat layer strength
    pub clearcoat: f32,
    /// Clear-coat layer roughness
    pub clearcoat_roughness: f32,
    /// Physically based transmission
    pub transmission: f32,
    /// Index of refraction
    pub ior: f32,
    /// Specular reflectivity at normal incidence
    pub reflectivity: f32,
}

impl Default for PhysicalParams {
    fn default() -> Self {
        Self {
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            transmission: 0.0,
            ior: 1.5,
            reflectivity: 0.5,
        }
    }
}

/// Scalar and color parameters of a material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    /// Diffuse color
    pub color: Vec3,
    /// Opacity, only honored when transparent
    pub opacity: f32,
    /// Surface roughness
    pub roughness: f32,
    /// Metalness
    pub metalness: f32,
    /// Environment map contribution
    pub env_map_intensity: f32,
    /// Emissive strength
    pub emissive_intensity: f32,
    /// Physical model parameters
    pub physical: PhysicalParams,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 1.0, 1.0),
            opacity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            env_map_intensity: 1.0,
            emissive_intensity: 0.0,
            physical: PhysicalParams::default(),
        }
    }
}

/// Everything observable about a material except its compile state
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialAppearance {
    /// Material name
    pub name: Option<String>,
    /// Shading model
    pub kind: MaterialKind,
    /// Parameters
    pub params: MaterialParams,
    /// Render state
    pub flags: RenderFlags,
    /// Draw order
    pub render_order: i32,
    /// Color texture
    pub map: Option<TextureHandle>,
    /// Alpha texture
    pub alpha_map: Option<TextureHandle>,
    /// Rim parameters
    pub fresnel: Option<FresnelParams>,
    /// Overlay texture and tint
    pub overlay: Option<(TextureHandle, Vec3)>,
}

/// Runtime material instance
#[derive(Debug, Clone)]
pub struct Material {
    /// Optional name, also matched by the scene classifier
    pub name: Option<String>,
    /// Shading model
    pub kind: MaterialKind,
    /// Parameters
    pub params: MaterialParams,
    /// Render state
    pub flags: RenderFlags,
    /// Draw order, higher draws later
    pub render_order: i32,
    /// Color texture
    pub map: Option<TextureHandle>,
    /// Alpha texture
    pub alpha_map: Option<TextureHandle>,
    pub(crate) fresnel: Option<FresnelPatchState>,
    pub(crate) overlay: Option<OverlayMaskState>,
    pub(crate) program: Option<ShaderProgram>,
    compile_count: u32,
}

impl Material {
    /// Create a material with default parameters
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            name: None,
            kind,
            params: MaterialParams::default(),
            flags: RenderFlags::default(),
            render_order: 0,
            map: None,
            alpha_map: None,
            fresnel: None,
            overlay: None,
            program: None,
            compile_count: 0,
        }
    }

    /// Name for log messages
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// Diffuse color
    pub fn color(&self) -> Vec3 {
        self.params.color
    }

    /// Opacity
    pub fn opacity(&self) -> f32 {
        self.params.opacity
    }

    /// Whether the material is alpha blended
    pub fn is_transparent(&self) -> bool {
        self.flags.contains(RenderFlags::TRANSPARENT)
    }

    /// Attached rim state
    pub fn fresnel(&self) -> Option<&FresnelPatchState> {
        self.fresnel.as_ref()
    }

    /// Attached overlay state
    pub fn overlay(&self) -> Option<&OverlayMaskState> {
        self.overlay.as_ref()
    }

    /// Compiled program, `None` until the next compile
    pub fn program(&self) -> Option<&ShaderProgram> {
        self.program.as_ref()
    }

    /// Whether the compile hook has to run before drawing
    pub fn needs_compile(&self) -> bool {
        self.program.is_none()
    }

    /// How many times the compile hook ran
    pub fn compile_count(&self) -> u32 {
        self.compile_count
    }

    /// Snapshot for equality checks
    pub fn appearance(&self) -> MaterialAppearance {
        MaterialAppearance {
            name: self.name.clone(),
            kind: self.kind,
            params: self.params,
            flags: self.flags,
            render_order: self.render_order,
            map: self.map,
            alpha_map: self.alpha_map,
            fresnel: self.fresnel.as_ref().map(|state| state.params),
            overlay: self.overlay.as_ref().map(|state| (state.texture, state.tint)),
        }
    }

    /// Drop the compiled program so the augmentation set is rebuilt
    pub(crate) fn invalidate_program(&mut self) {
        if self.program.take().is_some() {
            log::trace!("Program of '{}' invalidated", self.label());
        }
        if let Some(state) = self.fresnel.as_mut() {
            state.handles = None;
        }
        if let Some(state) = self.overlay.as_mut() {
            state.unbind();
        }
    }

    /// Run the compile hook against `host` if the program is stale
    ///
    /// Returns whether a compile happened. When an augmentation cannot be
    /// applied the error is logged and returned, and the material keeps the
    /// plain host program so it still renders.
    pub fn compile(&mut self, host: &HostPipeline) -> Result<bool, ShaderError> {
        if self.program.is_some() {
            return Ok(false);
        }

        let mut program = ShaderProgram::from_source(host.source.clone());
        let result = self.augment(&mut program);
        self.compile_count += 1;

        match result {
            Ok(()) => {
                log::debug!(
                    "Compiled '{}' on '{}' ({} augmentation uniforms)",
                    self.label(),
                    host.name,
                    program.uniforms.len()
                );
                self.program = Some(program);
                Ok(true)
            }
            Err(e) => {
                log::error!("Material '{}' on pipeline '{}': {}; using the base program", self.label(), host.name, e);
                self.invalidate_program();
                self.program = Some(ShaderProgram::from_source(host.source.clone()));
                Err(e)
            }
        }
    }

    fn augment(&mut self, program: &mut ShaderProgram) -> Result<(), ShaderError> {
        if let Some(state) = self.fresnel.as_mut() {
            apply_fresnel(program, state)?;
        }
        if let Some(state) = self.overlay.as_mut() {
            apply_overlay(program, state)?;
        }
        Ok(())
    }
}
