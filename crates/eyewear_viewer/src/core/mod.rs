//! # Core Viewer Module
//!
//! Shared settings that every subsystem of the viewer reads.

pub mod config;

pub use config::{
    ViewerSettings,
    AnimationSettings,
    CameraSettings,
};
pub use crate::config::{Config, ConfigError};
