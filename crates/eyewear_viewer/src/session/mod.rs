//! # Viewer Session
//!
//! Owns everything one viewer instance needs between frames: the bound
//! model, its materials and textures, the camera with its transition
//! controller and the glass animation. Nothing here is global, so two
//! sessions never observe each other.
//!
//! The frame loop drives a session with [`ViewerSession::advance`] and the
//! UI with [`ViewerSession::apply_preset`] and [`ViewerSession::switch_to`].
//! The host renderer calls [`ViewerSession::compile_materials`] before
//! drawing and releases GPU resources for [`ViewerSession::drain_disposed`].

use thiserror::Error;

use crate::animation::GlassAnimator;
use crate::camera::{Camera, CameraTransition};
use crate::core::ViewerSettings;
use crate::foundation::math::Vec3;
use crate::presets::Preset;
use crate::render::texture::TextureLoader;
use crate::render::{HostPipeline, MaterialId, MaterialRegistry, TextureCache};
use crate::scene::{ModelBinding, SceneBinder, SceneGraph};

#[cfg(test)]
mod tests;

/// Session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The requested anchor is not a camera node of the loaded model
    #[error("camera anchor '{0}' not found in the loaded model")]
    AnchorNotFound(String),

    /// A preset or camera operation ran before any model was loaded
    #[error("no model loaded")]
    NoModelLoaded,
}

/// Model bound to the current preset
struct LoadedModel {
    scene: SceneGraph,
    binding: ModelBinding,
}

/// One interactive viewer
pub struct ViewerSession {
    settings: ViewerSettings,
    textures: TextureCache,
    materials: MaterialRegistry,
    binder: SceneBinder,
    model: Option<LoadedModel>,
    preset: Option<Preset>,
    camera: Camera,
    transition: CameraTransition,
    glass: GlassAnimator,
    active_anchor: Option<String>,
    clock: f32,
}

impl ViewerSession {
    /// Create an empty session
    pub fn new(settings: ViewerSettings, loader: Box<dyn TextureLoader>) -> Self {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), settings.camera.initial_fov_degrees);
        let transition = CameraTransition::new(settings.camera.transition_duration);
        let glass = GlassAnimator::new(settings.animation.clone());
        Self {
            settings,
            textures: TextureCache::new(loader),
            materials: MaterialRegistry::new(),
            binder: SceneBinder::default(),
            model: None,
            preset: None,
            camera,
            transition,
            glass,
            active_anchor: None,
            clock: 0.0,
        }
    }

    /// Replace the mesh classifier used for subsequent loads
    pub fn with_binder(mut self, binder: SceneBinder) -> Self {
        self.binder = binder;
        self
    }

    /// Bind a freshly loaded model to `preset`
    ///
    /// Materials of a previously loaded model are disposed and any move
    /// towards one of its anchors stops. The camera then moves to the
    /// preset's start anchor; a model without that anchor keeps the current
    /// camera pose.
    pub fn load_model(&mut self, mut scene: SceneGraph, preset: &Preset) -> Result<(), SessionError> {
        if let Some(previous) = self.model.take() {
            for id in previous.binding.all_materials() {
                self.materials.dispose(id);
            }
        }

        let binding = self
            .binder
            .bind_model(&mut scene, preset, &mut self.materials, &mut self.textures);
        self.glass.rebase(&binding.lens_materials, &self.materials);
        self.model = Some(LoadedModel { scene, binding });
        self.preset = Some(preset.clone());
        self.transition.cancel();
        self.active_anchor = None;
        log::info!("Model loaded with preset '{}'", preset.name);

        match self.switch_to(&preset.start_anchor_name) {
            Err(SessionError::AnchorNotFound(name)) => {
                log::warn!("Start anchor '{name}' is missing, keeping the current camera");
                Ok(())
            }
            other => other,
        }
    }

    /// Switch the loaded model to another preset
    ///
    /// Lens materials are reconfigured in place, every other role material
    /// is rebuilt. A running glass animation starts over from the new tint.
    pub fn apply_preset(&mut self, preset: &Preset) -> Result<(), SessionError> {
        let model = self.model.as_mut().ok_or(SessionError::NoModelLoaded)?;

        self.binder.rebind_preset(
            &mut model.scene,
            preset,
            &mut model.binding,
            &mut self.materials,
            &mut self.textures,
        );
        self.glass.rebase(&model.binding.lens_materials, &self.materials);
        self.preset = Some(preset.clone());
        log::info!("Preset switched to '{}'", preset.name);
        Ok(())
    }

    /// Move the camera to the anchor called `name`
    ///
    /// The preset's free-roam anchor snaps and hands control to the orbit
    /// controls; any other anchor starts a timed transition from the current
    /// pose. An unknown name changes nothing.
    pub fn switch_to(&mut self, name: &str) -> Result<(), SessionError> {
        let model = self.model.as_ref().ok_or(SessionError::NoModelLoaded)?;
        let anchor = model
            .binding
            .anchors
            .get(name)
            .ok_or_else(|| SessionError::AnchorNotFound(name.to_string()))?;

        let is_free = self.preset.as_ref().is_some_and(|p| p.free_anchor_name == name);
        if is_free {
            self.transition.snap_to(&mut self.camera, anchor);
        } else {
            self.transition.start(&mut self.camera, anchor, self.clock);
        }
        self.active_anchor = Some(name.to_string());
        log::info!("Camera switched to '{name}'");
        Ok(())
    }

    /// Advance one frame
    ///
    /// `elapsed_time` is the session clock the camera transition runs on,
    /// `delta_time` the step the glass animation integrates.
    pub fn advance(&mut self, delta_time: f32, elapsed_time: f32) {
        self.clock = elapsed_time;
        self.transition.update(&mut self.camera, elapsed_time);
        let gate_open = self.glass_gate_open();
        self.glass.update(gate_open, delta_time, &mut self.materials);
    }

    /// Compile every material with pending shader changes
    ///
    /// Returns how many programs were (re)built. Incompatible pipelines are
    /// logged and leave the affected materials on their base program.
    pub fn compile_materials(&mut self, host: &HostPipeline) -> usize {
        let (compiled, errors) = self.materials.compile_all(host);
        for (id, e) in errors {
            log::error!("Material {id:?} uses its base program: {e}");
        }
        if compiled > 0 {
            log::debug!("Compiled {compiled} material programs for '{}'", host.name);
        }
        compiled
    }

    /// Take the materials released since the last call
    pub fn drain_disposed(&mut self) -> Vec<MaterialId> {
        self.materials.drain_disposed()
    }

    fn glass_gate_open(&self) -> bool {
        let Some(model) = &self.model else {
            return false;
        };
        let Some(reveal) = self.preset.as_ref().and_then(Preset::reveal_anchor) else {
            return false;
        };
        !model.binding.lens_materials.is_empty() && self.active_anchor.as_deref() == Some(reveal)
    }

    /// Session settings
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// Current camera pose
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera transition controller
    pub fn transition(&self) -> &CameraTransition {
        &self.transition
    }

    /// Glass animation state
    pub fn glass(&self) -> &GlassAnimator {
        &self.glass
    }

    /// Material registry
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Texture cache
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// Loaded scene, if any
    pub fn scene(&self) -> Option<&SceneGraph> {
        self.model.as_ref().map(|model| &model.scene)
    }

    /// Binding of the loaded scene, if any
    pub fn binding(&self) -> Option<&ModelBinding> {
        self.model.as_ref().map(|model| &model.binding)
    }

    /// Preset currently applied
    pub fn preset(&self) -> Option<&Preset> {
        self.preset.as_ref()
    }

    /// Anchor the camera last switched to
    pub fn active_anchor(&self) -> Option<&str> {
        self.active_anchor.as_deref()
    }

    /// Session clock as of the last [`advance`](Self::advance)
    pub fn clock(&self) -> f32 {
        self.clock
    }
}
