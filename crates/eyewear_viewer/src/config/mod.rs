//! Configuration system
//!
//! Shared RON/TOML document loading used by viewer settings and by preset
//! files. Parsing happens here; what the documents mean is up to the caller.

use std::path::Path;

pub use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;

/// Document formats understood by the configuration loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Rusty Object Notation (`.ron`)
    Ron,
    /// TOML (`.toml`)
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Ok(Self::Ron),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse a document that is already in memory
pub fn parse_str<T: DeserializeOwned>(contents: &str, format: ConfigFormat) -> Result<T, ConfigError> {
    match format {
        ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
    }
}

/// Serialize a value into a pretty-printed document
pub fn to_string<T: Serialize>(value: &T, format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string())),
        ConfigFormat::Toml => toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string())),
    }
}

/// Read and parse a document, choosing the format from the extension
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    log::debug!("Loaded {:?} document from {}", format, path.display());
    parse_str(&contents, format)
}

/// Configuration trait
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_document(path)
    }

    /// Load configuration from file, falling back to defaults when it is absent
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = to_string(self, ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
