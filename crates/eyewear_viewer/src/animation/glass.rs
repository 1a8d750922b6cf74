//! Looping glass-tint reveal
//!
//! While its gate is open the lenses cycle tinted → clear → tinted:
//!
//! ```text
//! WaitTinted --dwell--> ToClear --fade--> WaitClear --dwell--> ToTinted --fade--> WaitTinted
//! ```
//!
//! Each lens' original color and opacity are snapshotted when the lenses
//! are (re)configured and never modified by the animation. Closing the gate
//! restores the snapshot exactly.

use crate::core::AnimationSettings;
use crate::foundation::math::{utils, Vec3};
use crate::render::{MaterialId, MaterialRegistry};

/// Animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlassPhase {
    /// Holding the original tint
    #[default]
    WaitTinted,
    /// Fading to clear
    ToClear,
    /// Holding clear
    WaitClear,
    /// Fading back to the original tint
    ToTinted,
}

/// Original appearance of one lens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensSnapshot {
    /// Lens material
    pub material: MaterialId,
    /// Original color
    pub color: Vec3,
    /// Original opacity
    pub opacity: f32,
}

/// Glass animation state machine
#[derive(Debug, Clone)]
pub struct GlassAnimator {
    settings: AnimationSettings,
    phase: GlassPhase,
    elapsed_in_phase: f32,
    snapshots: Vec<LensSnapshot>,
    was_animating: bool,
}

impl GlassAnimator {
    /// Create an idle animator
    pub fn new(settings: AnimationSettings) -> Self {
        Self {
            settings,
            phase: GlassPhase::WaitTinted,
            elapsed_in_phase: 0.0,
            snapshots: Vec::new(),
            was_animating: false,
        }
    }

    /// Current phase
    pub fn phase(&self) -> GlassPhase {
        self.phase
    }

    /// Seconds spent in the current phase
    pub fn elapsed_in_phase(&self) -> f32 {
        self.elapsed_in_phase
    }

    /// Whether the last update ran the animation
    pub fn is_animating(&self) -> bool {
        self.was_animating
    }

    /// Snapshotted lenses
    pub fn snapshots(&self) -> &[LensSnapshot] {
        &self.snapshots
    }

    /// Take new snapshots from the lenses' current values and restart
    ///
    /// Called after the lenses were (re)configured, so whatever the previous
    /// cycle left behind has already been overwritten.
    pub fn rebase(&mut self, lenses: &[MaterialId], materials: &MaterialRegistry) {
        self.snapshots = lenses
            .iter()
            .filter_map(|id| {
                materials.get(*id).map(|material| LensSnapshot {
                    material: *id,
                    color: material.color(),
                    opacity: material.opacity(),
                })
            })
            .collect();
        self.phase = GlassPhase::WaitTinted;
        self.elapsed_in_phase = 0.0;
        self.was_animating = false;
        log::debug!("Glass animation rebased on {} lenses", self.snapshots.len());
    }

    /// Restore every lens to its snapshot and return to `WaitTinted`
    pub fn reset(&mut self, materials: &mut MaterialRegistry) {
        for snapshot in &self.snapshots {
            if let Some(material) = materials.get_mut(snapshot.material) {
                material.params.color = snapshot.color;
                material.params.opacity = snapshot.opacity;
            }
        }
        self.phase = GlassPhase::WaitTinted;
        self.elapsed_in_phase = 0.0;
        self.was_animating = false;
    }

    /// Advance by `delta_time` seconds with the gate open or closed
    ///
    /// A closed gate restores the lenses once, on the frame the gate closes.
    pub fn update(&mut self, gate_open: bool, delta_time: f32, materials: &mut MaterialRegistry) {
        if !gate_open || self.snapshots.is_empty() {
            if self.was_animating {
                log::debug!("Glass animation gate closed, restoring lenses");
                self.reset(materials);
            }
            return;
        }

        self.was_animating = true;
        self.elapsed_in_phase += delta_time;

        match self.phase {
            GlassPhase::WaitTinted => {
                if self.elapsed_in_phase > self.settings.dwell_tinted {
                    self.enter(GlassPhase::ToClear);
                }
            }
            GlassPhase::ToClear => {
                let t = self.fade_progress();
                self.blend(materials, |snapshot| (snapshot.color, snapshot.opacity), |_| (Vec3::repeat(1.0), 0.0), t);
                if t >= 1.0 {
                    self.enter(GlassPhase::WaitClear);
                }
            }
            GlassPhase::WaitClear => {
                if self.elapsed_in_phase > self.settings.dwell_clear {
                    self.enter(GlassPhase::ToTinted);
                }
            }
            GlassPhase::ToTinted => {
                let t = self.fade_progress();
                self.blend(materials, |_| (Vec3::repeat(1.0), 0.0), |snapshot| (snapshot.color, snapshot.opacity), t);
                if t >= 1.0 {
                    self.enter(GlassPhase::WaitTinted);
                }
            }
        }
    }

    fn enter(&mut self, phase: GlassPhase) {
        log::trace!("Glass animation {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.elapsed_in_phase = 0.0;
    }

    fn fade_progress(&self) -> f32 {
        (self.elapsed_in_phase / self.settings.fade_duration).min(1.0)
    }

    fn blend(
        &self,
        materials: &mut MaterialRegistry,
        from: impl Fn(&LensSnapshot) -> (Vec3, f32),
        to: impl Fn(&LensSnapshot) -> (Vec3, f32),
        t: f32,
    ) {
        let e = utils::ease(t);
        for snapshot in &self.snapshots {
            let Some(material) = materials.get_mut(snapshot.material) else {
                continue;
            };
            let (from_color, from_opacity) = from(snapshot);
            let (to_color, to_opacity) = to(snapshot);
            material.params.color = utils::lerp_vec3(&from_color, &to_color, e);
            material.params.opacity = utils::lerp(from_opacity, to_opacity, e);
        }
    }
}
