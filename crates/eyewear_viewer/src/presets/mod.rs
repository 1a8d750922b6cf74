//! Preset registry
//!
//! Designer-authored skins: frame, arm overlay, lens, logo and fake-interior
//! parameters applied to the loaded model as a whole. Presets are plain data;
//! the material builder turns them into live materials.

pub mod preset;
pub mod registry;

pub use preset::{
    Preset, FrameConfig, ArmsOverlayConfig, LensConfig, FresnelConfig,
    LensBackConfig, FakeInteriorConfig, LogoConfig,
    DEFAULT_FRAME_OPACITY, DEFAULT_OVERLAY_TRANSPARENT_OPACITY, DEFAULT_OVERLAY_OPACITY,
    DEFAULT_REFLECTIVITY, DEFAULT_LENS_IOR, DEFAULT_FRESNEL_INTENSITY,
    DEFAULT_FRESNEL_CHROMA_BOOST, DEFAULT_BASE_CHROMA_BOOST,
};
pub use registry::PresetRegistry;
