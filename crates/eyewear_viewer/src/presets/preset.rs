//! Preset data model
//!
//! Field names follow the designer documents (`snake_case` in RON/TOML).
//! Optional fields fall back to the product defaults through the accessor
//! methods, never by mutating the preset.

use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::config::{load_document, ConfigError};
use crate::foundation::math::Rgb;

/// Fallback frame opacity for the coated transparent variant
pub const DEFAULT_FRAME_OPACITY: f32 = 0.8;
/// Fallback arm overlay opacity when the frame is transparent
pub const DEFAULT_OVERLAY_TRANSPARENT_OPACITY: f32 = 0.6;
/// Fallback arm overlay opacity for an opaque frame
pub const DEFAULT_OVERLAY_OPACITY: f32 = 1.0;
/// Fallback frame reflectivity
pub const DEFAULT_REFLECTIVITY: f32 = 1.0;
/// Fallback lens index of refraction
pub const DEFAULT_LENS_IOR: f32 = 1.45;
/// Fallback Fresnel rim intensity
pub const DEFAULT_FRESNEL_INTENSITY: f32 = 2.0;
/// Fallback Fresnel chroma boost
pub const DEFAULT_FRESNEL_CHROMA_BOOST: f32 = 0.8;
/// Fallback base chroma boost (identity)
pub const DEFAULT_BASE_CHROMA_BOOST: f32 = 1.0;

/// Frame (front rims and untextured arms) parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Base color shared by every frame part without its own color
    pub base_color: Rgb,
    /// Upper rim color, falls back to `base_color`
    #[serde(default)]
    pub up_color: Option<Rgb>,
    /// Lower rim (and arm overlay) color, falls back to `base_color`
    #[serde(default)]
    pub down_color: Option<Rgb>,
    /// Surface roughness
    pub roughness: f32,
    /// Metalness
    pub metalness: f32,
    /// Use the coated transparent variant
    #[serde(default)]
    pub transparent: bool,
    /// Opacity of the transparent variant
    #[serde(default)]
    pub opacity: Option<f32>,
    /// Reflectivity of the transparent variant
    #[serde(default)]
    pub reflectivity: Option<f32>,
}

impl FrameConfig {
    /// Resolved upper rim color
    pub fn up_color(&self) -> Rgb {
        self.up_color.unwrap_or(self.base_color)
    }

    /// Resolved lower rim color
    pub fn down_color(&self) -> Rgb {
        self.down_color.unwrap_or(self.base_color)
    }

    /// Resolved reflectivity
    pub fn reflectivity(&self) -> f32 {
        self.reflectivity.unwrap_or(DEFAULT_REFLECTIVITY)
    }
}

/// Printed arm overlay (temple text) parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmsOverlayConfig {
    /// Overlay texture whose alpha channel masks the tint
    #[serde(default)]
    pub texture_path: Option<String>,
    /// Color blended in where the overlay mask is set
    pub tint_color: Rgb,
    /// Whether the overlay blends over the arm
    #[serde(default)]
    pub transparent: bool,
    /// Overlay opacity for an opaque frame
    #[serde(default)]
    pub opacity: Option<f32>,
}

impl ArmsOverlayConfig {
    /// Resolved opacity for an opaque frame
    pub fn opacity(&self) -> f32 {
        self.opacity.unwrap_or(DEFAULT_OVERLAY_OPACITY)
    }
}

/// Fresnel rim-lighting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FresnelConfig {
    /// Whether the rim term is injected at all
    pub enabled: bool,
    /// Strength of the additive rim term
    #[serde(default)]
    pub intensity: Option<f32>,
    /// Chroma boost applied to the blended rim color
    #[serde(default)]
    pub chroma_boost: Option<f32>,
    /// Color seen when facing the lens
    pub color_front: Rgb,
    /// Color at mid angles
    pub color_mid: Rgb,
    /// Color at grazing angles
    pub color_edge: Rgb,
}

impl FresnelConfig {
    /// Resolved rim intensity
    pub fn intensity(&self) -> f32 {
        self.intensity.unwrap_or(DEFAULT_FRESNEL_INTENSITY)
    }

    /// Resolved rim chroma boost
    pub fn chroma_boost(&self) -> f32 {
        self.chroma_boost.unwrap_or(DEFAULT_FRESNEL_CHROMA_BOOST)
    }
}

/// Inner lens layer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensBackConfig {
    /// Backing color
    pub color: Rgb,
    /// Backing opacity; below 1.0 the layer blends
    pub opacity: f32,
}

/// Lens parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensConfig {
    /// Tint color
    pub color: Rgb,
    /// Surface roughness
    pub roughness: f32,
    /// Metalness
    #[serde(default)]
    pub metalness: Option<f32>,
    /// Tint opacity
    pub opacity: f32,
    /// Index of refraction
    #[serde(default)]
    pub ior: Option<f32>,
    /// Fresnel rim term
    #[serde(default)]
    pub fresnel: Option<FresnelConfig>,
    /// Chroma boost applied to the diffuse base
    #[serde(default)]
    pub base_chroma_boost: Option<f32>,
    /// Inner backing layer
    #[serde(default)]
    pub back: Option<LensBackConfig>,
    /// Run the glass-tint animation for this preset
    #[serde(default)]
    pub animate: Option<bool>,
    /// Anchor on which the animation is allowed to run
    #[serde(default)]
    pub animate_on_anchor: Option<String>,
    /// Alpha map modulating the lens opacity
    #[serde(default)]
    pub opacity_map_path: Option<String>,
    /// Gradient alpha map; takes precedence over `opacity_map_path`
    #[serde(default)]
    pub gradient_map_path: Option<String>,
}

impl LensConfig {
    /// Resolved metalness
    pub fn metalness(&self) -> f32 {
        self.metalness.unwrap_or(0.0)
    }

    /// Resolved index of refraction
    pub fn ior(&self) -> f32 {
        self.ior.unwrap_or(DEFAULT_LENS_IOR)
    }

    /// Resolved base chroma boost
    pub fn base_chroma_boost(&self) -> f32 {
        self.base_chroma_boost.unwrap_or(DEFAULT_BASE_CHROMA_BOOST)
    }

    /// Fresnel configuration, only when it is enabled
    pub fn enabled_fresnel(&self) -> Option<&FresnelConfig> {
        self.fresnel.as_ref().filter(|fresnel| fresnel.enabled)
    }

    /// Whether the glass animation is requested
    pub fn animates(&self) -> bool {
        self.animate == Some(true)
    }

    /// Alpha map in effect: the gradient map wins over the opacity map
    pub fn alpha_map_path(&self) -> Option<&str> {
        self.gradient_map_path
            .as_deref()
            .or(self.opacity_map_path.as_deref())
    }
}

/// Fake interior (blurred inside of the frame) parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeInteriorConfig {
    /// Interior texture
    #[serde(default)]
    pub texture_path: Option<String>,
}

/// Logo decal parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoConfig {
    /// Logo texture
    #[serde(default)]
    pub texture_path: Option<String>,
    /// Emissive strength carried onto the logo material
    #[serde(default)]
    pub emissive_intensity: f32,
}

/// A complete skin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name, also the registry key
    pub name: String,
    /// Model asset this skin targets
    #[serde(default)]
    pub model_path: Option<String>,
    /// Frame parameters
    pub frame: FrameConfig,
    /// Arm overlay parameters
    pub arms_overlay: ArmsOverlayConfig,
    /// Lens parameters
    pub lens: LensConfig,
    /// Fake interior parameters
    #[serde(default)]
    pub fake_interior: Option<FakeInteriorConfig>,
    /// Logo parameters
    #[serde(default)]
    pub logo: Option<LogoConfig>,
    /// Anchor the camera moves to when the model loads
    pub start_anchor_name: String,
    /// Anchor that hands the camera to free orbiting
    pub free_anchor_name: String,
}

impl Preset {
    /// Load a preset from a `.ron` or `.toml` file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_document(path)
    }

    /// Anchor on which the glass animation runs, if the preset animates
    pub fn reveal_anchor(&self) -> Option<&str> {
        if self.lens.animates() {
            self.lens.animate_on_anchor.as_deref()
        } else {
            None
        }
    }

    /// Out-of-range values worth telling the designer about
    ///
    /// Presets are never rejected for these: boosted values are sometimes
    /// intentional, so the caller only logs them.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.name.trim().is_empty() {
            warnings.push("preset has an empty name".to_string());
        }

        let mut check_opacity = |what: &str, value: Option<f32>| {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    warnings.push(format!("{what} opacity {value} is outside [0, 1]"));
                }
            }
        };
        check_opacity("frame", self.frame.opacity);
        check_opacity("arm overlay", self.arms_overlay.opacity);
        check_opacity("lens", Some(self.lens.opacity));
        check_opacity("lens back", self.lens.back.as_ref().map(|back| back.opacity));

        if self.lens.animates() && self.lens.animate_on_anchor.is_none() {
            warnings.push("lens animation is enabled without an anchor to run on".to_string());
        }
        warnings
    }
}
