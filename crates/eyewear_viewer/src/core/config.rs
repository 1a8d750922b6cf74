//! # Viewer Configuration
//!
//! Runtime settings for the viewer session: logging, camera transition and
//! glass animation timings. Presets are *not* settings; they live in
//! [`crate::presets`] and describe the look, not the behaviour.
//!
//! Settings load from `.ron` or `.toml` through the [`Config`] trait and
//! default to the product's shipped constants.

use serde::{Serialize, Deserialize};

use crate::config::Config;

/// # Camera Settings
///
/// Camera viewpoint transition and projection defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Duration of a timed anchor-to-anchor transition, in seconds
    pub transition_duration: f32,
    /// Vertical field of view used before any anchor is applied, in degrees
    pub initial_fov_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            transition_duration: 0.8,
            initial_fov_degrees: 80.0,
        }
    }
}

/// # Animation Settings
///
/// Phase timings for the looping glass-tint animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Time the lenses hold their tinted color before clearing, in seconds
    pub dwell_tinted: f32,
    /// Time the lenses stay cleared before re-tinting, in seconds
    pub dwell_clear: f32,
    /// Duration of each fade (tinted to clear and back), in seconds
    pub fade_duration: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            dwell_tinted: 1.0,
            dwell_clear: 1.0,
            fade_duration: 1.5,
        }
    }
}

impl AnimationSettings {
    /// Validate the timings
    pub fn validate(&self) -> Result<(), String> {
        if self.fade_duration <= 0.0 {
            return Err("Glass fade duration must be positive".to_string());
        }
        if self.dwell_tinted < 0.0 || self.dwell_clear < 0.0 {
            return Err("Glass dwell times cannot be negative".to_string());
        }
        Ok(())
    }
}

/// # Viewer Settings
///
/// Top-level configuration for a viewer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
    /// Camera transition settings
    pub camera: CameraSettings,
    /// Glass animation settings
    pub animation: AnimationSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            camera: CameraSettings::default(),
            animation: AnimationSettings::default(),
        }
    }
}

impl ViewerSettings {
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the camera transition duration
    pub fn with_transition_duration(mut self, seconds: f32) -> Self {
        self.camera.transition_duration = seconds;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.camera.transition_duration <= 0.0 {
            return Err("Camera transition duration must be positive".to_string());
        }
        if !(1.0..179.0).contains(&self.camera.initial_fov_degrees) {
            return Err(format!(
                "Initial field of view {} is outside (1, 179) degrees",
                self.camera.initial_fov_degrees
            ));
        }
        self.animation.validate()
    }
}

impl Config for ViewerSettings {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_str, ConfigFormat};

    #[test]
    fn test_defaults_match_product_constants() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.camera.transition_duration, 0.8);
        assert_eq!(settings.animation.dwell_tinted, 1.0);
        assert_eq!(settings.animation.dwell_clear, 1.0);
        assert_eq!(settings.animation.fade_duration, 1.5);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: ViewerSettings = parse_str(
            "log_level = \"debug\"\n[animation]\nfade_duration = 2.0\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.animation.fade_duration, 2.0);
        assert_eq!(settings.animation.dwell_clear, 1.0);
        assert_eq!(settings.camera, CameraSettings::default());
    }

    #[test]
    fn test_validation_rejects_zero_durations() {
        assert!(ViewerSettings::default().with_transition_duration(0.0).validate().is_err());

        let mut settings = ViewerSettings::default();
        settings.animation.fade_duration = 0.0;
        assert!(settings.validate().is_err());
    }
}
