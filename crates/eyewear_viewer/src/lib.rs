//! # Eyewear Viewer
//!
//! Material, shader and animation core for an interactive eyewear product
//! viewer. A loaded model is bound to a named preset (a "skin") that decides
//! frame, lens, logo and overlay materials; the camera eases between authored
//! anchors and the lenses can run a looping tint reveal.
//!
//! ## Features
//!
//! - **Presets**: four built-in skins, more from `.ron`/`.toml` files
//! - **Shader Injection**: Fresnel rim, chroma boost and overlay masks patched
//!   into the host pipeline's shaders at fixed markers
//! - **Scene Binding**: data-driven mesh classification by node and material name
//! - **Camera Anchors**: eased transitions and a free-roam snap
//! - **Glass Animation**: tinted to clear and back, gated on one anchor
//!
//! ## Quick Start
//!
//! ```rust
//! use eyewear_viewer::prelude::*;
//!
//! let presets = PresetRegistry::builtin().unwrap();
//! let preset = presets.first().unwrap();
//!
//! let mut scene = SceneGraph::new();
//! scene.add_mesh("frame_up", Some("Frame"), Aabb::from_center_extents(Vec3::zeros(), Vec3::repeat(1.0)));
//! scene.add_camera(&preset.start_anchor_name, Vec3::new(0.0, 0.0, 5.0), Quat::identity(), 30.0);
//!
//! let mut session = ViewerSession::new(ViewerSettings::default(), Box::new(DeferredTextureLoader));
//! session.load_model(scene, preset).unwrap();
//! session.advance(1.0 / 60.0, 1.0 / 60.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared settings
pub mod core;

pub mod foundation;
pub mod config;
pub mod presets;
pub mod render;
pub mod scene;
pub mod camera;
pub mod animation;
pub mod session;

pub use session::{SessionError, ViewerSession};

/// Common imports for viewer users
pub mod prelude {
    pub use crate::{
        SessionError, ViewerSession,
        animation::{GlassAnimator, GlassPhase},
        camera::{Camera, CameraAnchor, CameraTransition, TransitionState},
        config::{Config, ConfigError},
        core::{AnimationSettings, CameraSettings, ViewerSettings},
        foundation::{
            math::{Quat, Vec3},
            time::Timer,
        },
        presets::{Preset, PresetRegistry},
        render::{
            DeferredTextureLoader, HostPipeline, ImageTextureLoader, Material, MaterialId, MaterialRegistry,
            TextureCache,
        },
        scene::{Aabb, MeshRole, SceneGraph},
    };
}
