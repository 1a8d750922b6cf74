//! Fresnel rim term and base chroma boost for lens materials
//!
//! The term is added to the indirect specular light after the host has
//! finished its own light accumulation, so it composes with whatever
//! lighting model the host uses:
//!
//! ```text
//! boosted  = luma(diffuse) + (diffuse - luma(diffuse)) * baseChromaBoost
//! specular = specular * boosted
//! f        = (1 - dot(normal, viewDir))^0.5
//! blended  = mix(colorFront, mix(colorMid, colorEdge, smoothstep(0.6, 0.98, f)),
//!                smoothstep(0.1, 0.35, f))
//! specular += chromaBoost(blended) * f^1.5 * fresnelIntensity
//! ```

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{utils, Vec3};
use crate::presets::LensConfig;
use crate::render::material::Material;

use super::markers::{ShaderError, ShaderMarker};
use super::program::{ShaderProgram, ShaderStage, UniformHandle, UniformTable, UniformValue};

/// Uniform names registered by the rim term
pub const FRESNEL_UNIFORMS: [&str; 6] = [
    "fresnelIntensity",
    "chromaBoost",
    "baseChromaBoost",
    "colorFront",
    "colorMid",
    "colorEdge",
];

const FRESNEL_DECLARATIONS: &str = "\
uniform float fresnelIntensity;
uniform float chromaBoost;
uniform float baseChromaBoost;
uniform vec3 colorFront;
uniform vec3 colorMid;
uniform vec3 colorEdge;";

const FRESNEL_TERM: &str = "\
    float baseLuma = dot(diffuseColor.rgb, vec3(0.299, 0.587, 0.114));
    vec3 boostedBase = vec3(baseLuma) + (diffuseColor.rgb - vec3(baseLuma)) * baseChromaBoost;
    diffuseColor.rgb = boostedBase;
    reflectedLight.indirectSpecular *= boostedBase;

    float rimFacing = pow(max(1.0 - dot(normalize(geometryNormal), normalize(geometryViewDir)), 0.0), 0.5);
    float frontMix = smoothstep(0.1, 0.35, rimFacing);
    float edgeMix = smoothstep(0.6, 0.98, rimFacing);
    vec3 rimColor = mix(colorFront, mix(colorMid, colorEdge, edgeMix), frontMix);
    float rimLuma = dot(rimColor, vec3(0.299, 0.587, 0.114));
    rimColor = vec3(rimLuma) + (rimColor - vec3(rimLuma)) * chromaBoost;
    reflectedLight.indirectSpecular += rimColor * pow(rimFacing, 1.5) * fresnelIntensity;";

/// Values driving the rim term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FresnelParams {
    /// Strength of the additive rim term
    pub intensity: f32,
    /// Chroma boost of the blended rim color
    pub chroma_boost: f32,
    /// Chroma boost of the diffuse base
    pub base_chroma_boost: f32,
    /// Color when facing the surface
    pub color_front: Vec3,
    /// Color at mid angles
    pub color_mid: Vec3,
    /// Color at grazing angles
    pub color_edge: Vec3,
}

impl FresnelParams {
    /// Resolve the rim parameters of a lens, `None` when Fresnel is disabled
    pub fn from_lens(lens: &LensConfig) -> Option<Self> {
        let fresnel = lens.enabled_fresnel()?;
        Some(Self {
            intensity: fresnel.intensity(),
            chroma_boost: fresnel.chroma_boost(),
            base_chroma_boost: lens.base_chroma_boost(),
            color_front: utils::rgb(fresnel.color_front),
            color_mid: utils::rgb(fresnel.color_mid),
            color_edge: utils::rgb(fresnel.color_edge),
        })
    }

    /// Rim factor `f` for a unit normal and a unit direction towards the viewer
    pub fn facing(normal: &Vec3, view_dir: &Vec3) -> f32 {
        (1.0 - normal.dot(view_dir)).max(0.0).sqrt()
    }

    /// Chroma-boosted rim color at rim factor `f`
    pub fn rim_color(&self, f: f32) -> Vec3 {
        let front_mix = utils::smoothstep(0.1, 0.35, f);
        let edge_mix = utils::smoothstep(0.6, 0.98, f);
        let outer = utils::lerp_vec3(&self.color_mid, &self.color_edge, edge_mix);
        let blended = utils::lerp_vec3(&self.color_front, &outer, front_mix);
        utils::chroma_boost(&blended, self.chroma_boost)
    }

    /// Light added to the indirect specular at rim factor `f`
    pub fn rim_contribution(&self, f: f32) -> Vec3 {
        self.rim_color(f) * f.powf(1.5) * self.intensity
    }

    /// Diffuse base after the base chroma boost
    pub fn boosted_base(&self, diffuse: &Vec3) -> Vec3 {
        utils::chroma_boost(diffuse, self.base_chroma_boost)
    }

    /// Pack into the std140 uniform block layout
    pub fn uniform_block(&self) -> FresnelUniformBlock {
        FresnelUniformBlock {
            color_front_intensity: [self.color_front.x, self.color_front.y, self.color_front.z, self.intensity],
            color_mid_chroma: [self.color_mid.x, self.color_mid.y, self.color_mid.z, self.chroma_boost],
            color_edge_base_chroma: [
                self.color_edge.x,
                self.color_edge.y,
                self.color_edge.z,
                self.base_chroma_boost,
            ],
        }
    }
}

/// GPU layout of the rim uniforms for hosts that bind a uniform buffer
///
/// Each scalar rides in the `w` component of a color so the block stays
/// three tightly packed `vec4`s.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FresnelUniformBlock {
    /// `colorFront.rgb`, `fresnelIntensity`
    pub color_front_intensity: [f32; 4],
    /// `colorMid.rgb`, `chromaBoost`
    pub color_mid_chroma: [f32; 4],
    /// `colorEdge.rgb`, `baseChromaBoost`
    pub color_edge_base_chroma: [f32; 4],
}

impl FresnelUniformBlock {
    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Handles of the six rim uniforms inside a compiled program
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FresnelHandles {
    intensity: UniformHandle,
    chroma_boost: UniformHandle,
    base_chroma_boost: UniformHandle,
    color_front: UniformHandle,
    color_mid: UniformHandle,
    color_edge: UniformHandle,
}

impl FresnelHandles {
    fn register(table: &mut UniformTable, params: &FresnelParams) -> Self {
        let [intensity, chroma_boost, base_chroma_boost, color_front, color_mid, color_edge] = FRESNEL_UNIFORMS;
        Self {
            intensity: table.register(intensity, UniformValue::Float(params.intensity)),
            chroma_boost: table.register(chroma_boost, UniformValue::Float(params.chroma_boost)),
            base_chroma_boost: table.register(base_chroma_boost, UniformValue::Float(params.base_chroma_boost)),
            color_front: table.register(color_front, UniformValue::Vec3(params.color_front)),
            color_mid: table.register(color_mid, UniformValue::Vec3(params.color_mid)),
            color_edge: table.register(color_edge, UniformValue::Vec3(params.color_edge)),
        }
    }

    fn write(&self, table: &mut UniformTable, params: &FresnelParams) {
        table.set(self.intensity, UniformValue::Float(params.intensity));
        table.set(self.chroma_boost, UniformValue::Float(params.chroma_boost));
        table.set(self.base_chroma_boost, UniformValue::Float(params.base_chroma_boost));
        table.set(self.color_front, UniformValue::Vec3(params.color_front));
        table.set(self.color_mid, UniformValue::Vec3(params.color_mid));
        table.set(self.color_edge, UniformValue::Vec3(params.color_edge));
    }
}

/// Rim state attached to a material
#[derive(Debug, Clone, PartialEq)]
pub struct FresnelPatchState {
    /// Current parameters, pending until the first compile
    pub params: FresnelParams,
    pub(crate) handles: Option<FresnelHandles>,
}

impl FresnelPatchState {
    fn new(params: FresnelParams) -> Self {
        Self { params, handles: None }
    }

    /// Whether the uniforms live in a compiled program
    pub fn is_bound(&self) -> bool {
        self.handles.is_some()
    }
}

/// Attach or update the rim term of `material`
///
/// The first call attaches the patch and marks the material for
/// compilation. Later calls only change values: written straight into the
/// compiled uniforms when bound, otherwise into the pending parameters.
pub fn inject_fresnel(material: &mut Material, params: FresnelParams) {
    if let Some(state) = material.fresnel.as_mut() {
        state.params = params;
        if let (Some(handles), Some(program)) = (state.handles, material.program.as_mut()) {
            handles.write(&mut program.uniforms, &state.params);
            log::trace!("Updated fresnel uniforms of '{}' in place", material.label());
        }
        return;
    }

    log::debug!("Attaching fresnel rim to '{}'", material.label());
    material.fresnel = Some(FresnelPatchState::new(params));
    material.invalidate_program();
}

/// Detach the rim term, recompiling only if it was attached
pub fn remove_fresnel(material: &mut Material) {
    if material.fresnel.take().is_some() {
        log::debug!("Removing fresnel rim from '{}'", material.label());
        material.invalidate_program();
    }
}

/// Compile-hook step: patch the fragment stage and bind the uniforms
pub(crate) fn apply_fresnel(program: &mut ShaderProgram, state: &mut FresnelPatchState) -> Result<(), ShaderError> {
    program
        .source
        .inject(ShaderStage::Fragment, ShaderMarker::Common, FRESNEL_DECLARATIONS)?;
    program
        .source
        .inject(ShaderStage::Fragment, ShaderMarker::LightsFragmentEnd, FRESNEL_TERM)?;
    state.handles = Some(FresnelHandles::register(&mut program.uniforms, &state.params));
    program.augmented = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::material::{MaterialBuilder, MaterialKind};
    use crate::render::shader::{HostPipeline, ShaderSource};
    use approx::assert_relative_eq;

    fn params() -> FresnelParams {
        FresnelParams {
            intensity: 2.7,
            chroma_boost: 2.0,
            base_chroma_boost: 1.0,
            color_front: Vec3::new(0.5, 0.0, 0.3),
            color_mid: Vec3::new(0.8, 0.0, 0.0),
            color_edge: Vec3::new(0.5, 0.5, 0.1),
        }
    }

    fn lens() -> Material {
        MaterialBuilder::new(MaterialKind::Physical).name("glass").build()
    }

    #[test]
    fn test_rim_color_regions() {
        let p = FresnelParams { chroma_boost: 1.0, ..params() };
        assert_relative_eq!(p.rim_color(0.0), p.color_front, epsilon = 1e-6);
        assert_relative_eq!(p.rim_color(0.5), p.color_mid, epsilon = 1e-6);
        assert_relative_eq!(p.rim_color(1.0), p.color_edge, epsilon = 1e-6);
        assert_eq!(p.rim_contribution(0.0), Vec3::zeros());
        assert_relative_eq!(p.rim_contribution(1.0), p.color_edge * 2.7, epsilon = 1e-6);
    }

    #[test]
    fn test_facing_factor() {
        let normal = Vec3::z();
        assert_eq!(FresnelParams::facing(&normal, &Vec3::z()), 0.0);
        assert_relative_eq!(FresnelParams::facing(&normal, &Vec3::x()), 1.0);
        assert_relative_eq!(FresnelParams::facing(&normal, &(-Vec3::z())), 2.0f32.sqrt());
    }

    #[test]
    fn test_uniform_block_layout() {
        let block = params().uniform_block();
        assert_eq!(std::mem::size_of::<FresnelUniformBlock>(), 48);
        assert_eq!(block.as_bytes().len(), 48);
        assert_eq!(block.color_front_intensity[3], 2.7);
        assert_eq!(block.color_mid_chroma[3], 2.0);
        assert_eq!(block.color_edge_base_chroma, [0.5, 0.5, 0.1, 1.0]);
    }

    #[test]
    fn test_compile_binds_all_uniforms() {
        let host = HostPipeline::standard();
        let mut material = lens();
        inject_fresnel(&mut material, params());
        assert!(!material.fresnel().unwrap().is_bound());

        assert!(material.compile(&host).unwrap());
        let program = material.program().unwrap();
        assert!(program.augmented);
        for name in FRESNEL_UNIFORMS {
            assert!(program.uniforms.find(name).is_some(), "{name}");
            assert!(program.source.fragment.contains(&format!("uniform float {name};"))
                || program.source.fragment.contains(&format!("uniform vec3 {name};")));
        }
        let term = program.source.fragment.find("rimFacing").unwrap();
        let lights_end = program.source.fragment.find("#include <lights_fragment_end>").unwrap();
        assert!(term > lights_end);
        assert!(material.fresnel().unwrap().is_bound());
    }

    #[test]
    fn test_reinjection_updates_in_place() {
        let host = HostPipeline::standard();
        let mut material = lens();
        inject_fresnel(&mut material, params());
        material.compile(&host).unwrap();
        let source_before = material.program().unwrap().source.clone();

        let updated = FresnelParams { intensity: 1.5, color_edge: Vec3::new(0.0, 0.2, 0.8), ..params() };
        inject_fresnel(&mut material, updated);

        assert_eq!(material.compile_count(), 1);
        assert!(!material.compile(&host).unwrap());
        let program = material.program().unwrap();
        assert_eq!(program.source, source_before);
        assert_eq!(program.uniforms.value("fresnelIntensity"), Some(&UniformValue::Float(1.5)));
        assert_eq!(
            program.uniforms.value("colorEdge"),
            Some(&UniformValue::Vec3(Vec3::new(0.0, 0.2, 0.8)))
        );
    }

    #[test]
    fn test_reinjection_before_compile_mutates_pending() {
        let mut material = lens();
        inject_fresnel(&mut material, params());
        inject_fresnel(&mut material, FresnelParams { intensity: 4.0, ..params() });
        assert!(material.program().is_none());
        assert_eq!(material.fresnel().unwrap().params.intensity, 4.0);
    }

    #[test]
    fn test_incompatible_host_falls_back_to_base() {
        let host = HostPipeline::new("unlit", ShaderSource::new("#include <common>", "#include <common>\nvoid main() {}"));
        let mut material = lens();
        inject_fresnel(&mut material, params());

        let result = material.compile(&host);
        assert!(matches!(result, Err(ShaderError::PipelineIncompatible { .. })));
        let program = material.program().unwrap();
        assert!(!program.augmented);
        assert_eq!(program.source, host.source);
        assert!(program.uniforms.is_empty());
        assert!(!material.fresnel().unwrap().is_bound());

        // Updates still land in the pending parameters
        inject_fresnel(&mut material, FresnelParams { intensity: 0.5, ..params() });
        assert_eq!(material.fresnel().unwrap().params.intensity, 0.5);
    }

    #[test]
    fn test_remove_fresnel_invalidates_once() {
        let host = HostPipeline::standard();
        let mut material = lens();
        inject_fresnel(&mut material, params());
        material.compile(&host).unwrap();
        remove_fresnel(&mut material);
        assert!(material.program().is_none());
        material.compile(&host).unwrap();
        assert!(!material.program().unwrap().augmented);
        remove_fresnel(&mut material);
        assert!(material.program().is_some());
    }
}
