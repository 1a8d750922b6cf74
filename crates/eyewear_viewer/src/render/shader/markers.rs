//! Include markers of the host program and the injection primitive

use thiserror::Error;

use super::program::ShaderStage;

/// Insertion points a host program must expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderMarker {
    /// Shared declarations, present in both stages
    Common,
    /// Vertex-stage UV attribute and varying declarations
    UvParsVertex,
    /// Vertex-stage UV assignment inside `main`
    UvVertex,
    /// Fragment-stage point where `diffuseColor` is final
    ColorFragment,
    /// Fragment-stage point where light accumulation has finished
    LightsFragmentEnd,
}

impl ShaderMarker {
    /// Every marker, in the order they appear in a program
    pub const ALL: [ShaderMarker; 5] = [
        ShaderMarker::Common,
        ShaderMarker::UvParsVertex,
        ShaderMarker::UvVertex,
        ShaderMarker::ColorFragment,
        ShaderMarker::LightsFragmentEnd,
    ];

    /// Literal text of the marker in the host source
    pub const fn token(self) -> &'static str {
        match self {
            ShaderMarker::Common => "#include <common>",
            ShaderMarker::UvParsVertex => "#include <uv_pars_vertex>",
            ShaderMarker::UvVertex => "#include <uv_vertex>",
            ShaderMarker::ColorFragment => "#include <color_fragment>",
            ShaderMarker::LightsFragmentEnd => "#include <lights_fragment_end>",
        }
    }

    /// Stages whose source must contain the marker
    pub fn stages(self) -> &'static [ShaderStage] {
        match self {
            ShaderMarker::Common => &[ShaderStage::Vertex, ShaderStage::Fragment],
            ShaderMarker::UvParsVertex | ShaderMarker::UvVertex => &[ShaderStage::Vertex],
            ShaderMarker::ColorFragment | ShaderMarker::LightsFragmentEnd => &[ShaderStage::Fragment],
        }
    }
}

/// Shader augmentation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The host program does not contain a required marker
    #[error("host pipeline is incompatible: no `{marker}` marker")]
    PipelineIncompatible {
        /// Missing marker text
        marker: &'static str,
    },
}

/// Insert `patch` on the line after the first occurrence of `marker`
///
/// The marker itself is kept, so the host still expands it. Later patches
/// for the same marker land above earlier ones, matching the textual
/// replacement hosts usually perform.
pub fn inject(base: &str, marker: ShaderMarker, patch: &str) -> Result<String, ShaderError> {
    let token = marker.token();
    let Some(start) = base.find(token) else {
        return Err(ShaderError::PipelineIncompatible { marker: token });
    };
    let split = start + token.len();

    let mut patched = String::with_capacity(base.len() + patch.len() + 1);
    patched.push_str(&base[..split]);
    patched.push('\n');
    patched.push_str(patch.trim_end_matches('\n'));
    patched.push_str(&base[split..]);
    Ok(patched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_after_marker() {
        let base = "a\n#include <common>\nb\n";
        let patched = inject(base, ShaderMarker::Common, "uniform float x;").unwrap();
        assert_eq!(patched, "a\n#include <common>\nuniform float x;\nb\n");
    }

    #[test]
    fn test_inject_only_first_occurrence() {
        let base = "#include <common>\n#include <common>";
        let patched = inject(base, ShaderMarker::Common, "X").unwrap();
        assert_eq!(patched.matches('X').count(), 1);
        assert!(patched.starts_with("#include <common>\nX\n"));
    }

    #[test]
    fn test_missing_marker_is_incompatible() {
        let result = inject("void main() {}", ShaderMarker::LightsFragmentEnd, "X");
        assert_eq!(
            result,
            Err(ShaderError::PipelineIncompatible {
                marker: "#include <lights_fragment_end>",
            })
        );
    }

    #[test]
    fn test_marker_tokens_are_distinct() {
        for (i, a) in ShaderMarker::ALL.iter().enumerate() {
            for b in &ShaderMarker::ALL[i + 1..] {
                assert!(!a.token().contains(b.token()));
            }
        }
    }
}
