//! Per-frame material animation

pub mod glass;

pub use glass::{GlassAnimator, GlassPhase, LensSnapshot};
