//! Printed overlay mask for the temple text
//!
//! The overlay texture's alpha channel selects where the diffuse color is
//! replaced by a flat tint. The mask samples the mesh's first UV set through
//! its own varying so the host's UV transforms do not apply to it.

use crate::foundation::math::Vec3;
use crate::render::material::Material;
use crate::render::texture::TextureHandle;

use super::markers::{ShaderError, ShaderMarker};
use super::program::{ShaderProgram, ShaderStage, UniformHandle, UniformValue};

const OVERLAY_VARYING: &str = "varying vec2 vOverlayUv;";

const OVERLAY_UV_ASSIGN: &str = "    vOverlayUv = uv;";

const OVERLAY_DECLARATIONS: &str = "\
uniform sampler2D overlayMap;
uniform vec3 overlayTint;
varying vec2 vOverlayUv;";

const OVERLAY_MIX: &str = "\
    float overlayMask = texture2D(overlayMap, vOverlayUv).a;
    diffuseColor.rgb = mix(diffuseColor.rgb, overlayTint, overlayMask);";

/// Overlay state attached to a material
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMaskState {
    /// Mask texture
    pub texture: TextureHandle,
    /// Color mixed in where the mask is set
    pub tint: Vec3,
    tint_handle: Option<UniformHandle>,
}

impl OverlayMaskState {
    /// Whether the tint lives in a compiled program
    pub fn is_bound(&self) -> bool {
        self.tint_handle.is_some()
    }

    pub(crate) fn unbind(&mut self) {
        self.tint_handle = None;
    }
}

/// Attach the overlay mask, or retint an attached one
///
/// A different texture requires a recompile; a tint change alone is written
/// into the compiled uniform when bound.
pub fn inject_overlay_mask(material: &mut Material, overlay_texture: TextureHandle, tint_color: Vec3) {
    if let Some(state) = material.overlay.as_mut() {
        if state.texture == overlay_texture {
            state.tint = tint_color;
            if let (Some(handle), Some(program)) = (state.tint_handle, material.program.as_mut()) {
                program.uniforms.set(handle, UniformValue::Vec3(tint_color));
            }
            return;
        }
    }

    log::debug!("Attaching overlay mask to '{}'", material.label());
    material.overlay = Some(OverlayMaskState {
        texture: overlay_texture,
        tint: tint_color,
        tint_handle: None,
    });
    material.invalidate_program();
}

/// Compile-hook step: thread the UV varying through and mix in the tint
pub(crate) fn apply_overlay(program: &mut ShaderProgram, state: &mut OverlayMaskState) -> Result<(), ShaderError> {
    let source = &mut program.source;
    source.inject(ShaderStage::Vertex, ShaderMarker::UvParsVertex, OVERLAY_VARYING)?;
    source.inject(ShaderStage::Vertex, ShaderMarker::UvVertex, OVERLAY_UV_ASSIGN)?;
    source.inject(ShaderStage::Fragment, ShaderMarker::Common, OVERLAY_DECLARATIONS)?;
    source.inject(ShaderStage::Fragment, ShaderMarker::ColorFragment, OVERLAY_MIX)?;

    program
        .uniforms
        .register("overlayMap", UniformValue::Texture(Some(state.texture)));
    state.tint_handle = Some(program.uniforms.register("overlayTint", UniformValue::Vec3(state.tint)));
    program.augmented = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::material::{MaterialBuilder, MaterialKind};
    use crate::render::shader::HostPipeline;
    use crate::render::texture::{ColorSpace, DeferredTextureLoader, TextureCache};

    fn overlay_texture() -> TextureHandle {
        let mut cache = TextureCache::new(Box::new(DeferredTextureLoader));
        cache.load("textures/temples.png", ColorSpace::Srgb).unwrap()
    }

    #[test]
    fn test_overlay_patches_both_stages() {
        let host = HostPipeline::standard();
        let texture = overlay_texture();
        let mut material = MaterialBuilder::new(MaterialKind::Standard).build();
        inject_overlay_mask(&mut material, texture, Vec3::new(0.2, 0.2, 0.2));
        material.compile(&host).unwrap();

        let program = material.program().unwrap();
        let vertex = &program.source.vertex;
        assert!(vertex.find("varying vec2 vOverlayUv;").unwrap() < vertex.find("void main()").unwrap());
        assert!(vertex.find("vOverlayUv = uv;").unwrap() > vertex.find("#include <uv_vertex>").unwrap());

        let fragment = &program.source.fragment;
        assert!(fragment.find("overlayMask").unwrap() > fragment.find("#include <color_fragment>").unwrap());
        assert_eq!(program.uniforms.value("overlayMap"), Some(&UniformValue::Texture(Some(texture))));
        assert!(material.overlay().unwrap().is_bound());
    }

    #[test]
    fn test_retint_writes_uniform() {
        let host = HostPipeline::standard();
        let texture = overlay_texture();
        let mut material = MaterialBuilder::new(MaterialKind::Standard).build();
        inject_overlay_mask(&mut material, texture, Vec3::new(0.2, 0.2, 0.2));
        material.compile(&host).unwrap();

        inject_overlay_mask(&mut material, texture, Vec3::new(1.0, 0.84, 0.0));
        assert_eq!(material.compile_count(), 1);
        assert_eq!(
            material.program().unwrap().uniforms.value("overlayTint"),
            Some(&UniformValue::Vec3(Vec3::new(1.0, 0.84, 0.0)))
        );
    }
}
