//! Host program contract
//!
//! The external renderer owns the real standard-material program. Patches
//! only rely on the markers in [`ShaderMarker`] and on these host symbols:
//!
//! * vertex: `uv`, `vUv`, `normal`, `modelViewMatrix`, `projectionMatrix`
//! * fragment: `diffuseColor` (vec4, final after the colour marker),
//!   `reflectedLight.indirectSpecular` (vec3, final after the lights-end
//!   marker), `geometryNormal` and `geometryViewDir` (view space, unit)

use super::markers::{ShaderError, ShaderMarker};
use super::program::ShaderSource;

const STANDARD_VERTEX: &str = r#"#include <common>
#include <uv_pars_vertex>
varying vec3 vNormal;
varying vec3 vViewPosition;

void main() {
#include <uv_vertex>
    vNormal = normalize(normalMatrix * normal);
    vec4 mvPosition = modelViewMatrix * vec4(position, 1.0);
    vViewPosition = -mvPosition.xyz;
    gl_Position = projectionMatrix * mvPosition;
}
"#;

const STANDARD_FRAGMENT: &str = r#"uniform vec3 diffuse;
uniform float opacity;
uniform float roughness;
uniform float metalness;
varying vec3 vNormal;
varying vec3 vViewPosition;
#include <common>
#include <lights_pars_begin>

void main() {
    vec4 diffuseColor = vec4(diffuse, opacity);
    ReflectedLight reflectedLight = ReflectedLight(vec3(0.0), vec3(0.0), vec3(0.0), vec3(0.0));
#include <color_fragment>
    vec3 geometryNormal = normalize(vNormal);
    vec3 geometryViewDir = normalize(vViewPosition);
#include <lights_fragment_begin>
#include <lights_fragment_end>
    vec3 outgoingLight = reflectedLight.directDiffuse + reflectedLight.indirectDiffuse
        + reflectedLight.directSpecular + reflectedLight.indirectSpecular;
    gl_FragColor = vec4(outgoingLight, diffuseColor.a);
}
"#;

/// The host's standard-material program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPipeline {
    /// Pipeline name for logs
    pub name: String,
    /// Unaugmented source every material starts from
    pub source: ShaderSource,
}

impl HostPipeline {
    /// Wrap a host-provided program
    pub fn new(name: impl Into<String>, source: ShaderSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    /// Reference program exposing every marker
    pub fn standard() -> Self {
        Self::new("standard", ShaderSource::new(STANDARD_VERTEX, STANDARD_FRAGMENT))
    }

    /// Whether every stage that should carry `marker` does
    pub fn supports(&self, marker: ShaderMarker) -> bool {
        marker
            .stages()
            .iter()
            .all(|stage| self.source.stage(*stage).contains(marker.token()))
    }

    /// Check the whole marker set
    pub fn validate(&self) -> Result<(), ShaderError> {
        match ShaderMarker::ALL.iter().find(|marker| !self.supports(**marker)) {
            Some(marker) => Err(ShaderError::PipelineIncompatible { marker: marker.token() }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pipeline_has_every_marker() {
        let host = HostPipeline::standard();
        assert!(host.validate().is_ok());
        for marker in ShaderMarker::ALL {
            assert!(host.supports(marker), "{marker:?}");
        }
    }

    #[test]
    fn test_stripped_pipeline_is_reported() {
        let host = HostPipeline::new(
            "unlit",
            ShaderSource::new("#include <common>\n#include <uv_pars_vertex>\n#include <uv_vertex>", "#include <common>"),
        );
        assert!(host.supports(ShaderMarker::UvVertex));
        assert!(!host.supports(ShaderMarker::ColorFragment));
        assert_eq!(
            host.validate(),
            Err(ShaderError::PipelineIncompatible { marker: "#include <color_fragment>" })
        );
    }
}
