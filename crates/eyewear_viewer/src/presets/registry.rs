//! Named preset storage
//!
//! Keeps presets in insertion order so a UI can list them the way the
//! designer shipped them.

use std::path::Path;

use super::Preset;
use crate::config::{parse_str, ConfigError, ConfigFormat};

/// Skins shipped with the viewer, embedded at compile time
const BUILTIN_PRESETS: [(&str, &str); 4] = [
    ("black_prizm_road.ron", include_str!("../../presets/black_prizm_road.ron")),
    ("white_prizm_sapphire.ron", include_str!("../../presets/white_prizm_sapphire.ron")),
    ("black_prizm_24k.ron", include_str!("../../presets/black_prizm_24k.ron")),
    ("white_prizm_black.ron", include_str!("../../presets/white_prizm_black.ron")),
];

/// Registry of named presets
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: Vec<Preset>,
}

impl PresetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the shipped skins
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for (file, source) in BUILTIN_PRESETS {
            let preset: Preset = parse_str(source, ConfigFormat::Ron)
                .map_err(|e| ConfigError::Parse(format!("{file}: {e}")))?;
            registry.insert(preset);
        }
        Ok(registry)
    }

    /// Add a preset, replacing any preset with the same name
    pub fn insert(&mut self, preset: Preset) {
        for warning in preset.warnings() {
            log::warn!("Preset '{}': {}", preset.name, warning);
        }

        if let Some(existing) = self.presets.iter_mut().find(|p| p.name == preset.name) {
            log::debug!("Replacing preset '{}'", preset.name);
            *existing = preset;
        } else {
            log::debug!("Registered preset '{}'", preset.name);
            self.presets.push(preset);
        }
    }

    /// Load a preset file and register it
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&Preset, ConfigError> {
        let preset = Preset::load_from_file(path)?;
        let name = preset.name.clone();
        self.insert(preset);
        // Just inserted, so the lookup cannot miss
        self.get(&name)
            .ok_or_else(|| ConfigError::Parse(format!("preset '{name}' vanished after insert")))
    }

    /// Look up a preset by name
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// First registered preset, the viewer's default skin
    pub fn first(&self) -> Option<&Preset> {
        self.presets.first()
    }

    /// Preset names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    /// Iterate presets in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    /// Number of registered presets
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
