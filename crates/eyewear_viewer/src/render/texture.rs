//! Texture requests for the material system
//!
//! Decoding and GPU upload belong to the asset collaborator behind the
//! [`TextureLoader`] trait. The viewer only keeps path-keyed handles so that
//! several materials (and several preset switches) share one texture.

use std::collections::HashMap;
use std::path::PathBuf;

use slotmap::SlotMap;
use thiserror::Error;

slotmap::new_key_type! {
    /// Handle for a loaded texture
    pub struct TextureHandle;
}

/// How texel values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Color textures (logos, overlays, interiors)
    Srgb,
    /// Data textures (alpha and opacity maps)
    Linear,
}

/// Information about a loaded texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    /// Path the texture was requested with
    pub path: String,
    /// Texel interpretation
    pub color_space: ColorSpace,
    /// Width in pixels, 0 when unknown until upload
    pub width: u32,
    /// Height in pixels, 0 when unknown until upload
    pub height: u32,
    /// Whether the source carries an alpha channel
    pub has_alpha: bool,
    /// Flip rows on upload; glTF UVs expect `false`
    pub flip_y: bool,
}

/// Texture loading errors
#[derive(Error, Debug)]
pub enum TextureError {
    /// The file could not be read or decoded
    #[error("failed to load texture '{path}': {reason}")]
    LoadFailed {
        /// Requested path
        path: String,
        /// Underlying cause
        reason: String,
    },
}

/// Asset collaborator that turns a path into texture data
pub trait TextureLoader {
    /// Load the texture at `path`
    fn load(&mut self, path: &str, color_space: ColorSpace) -> Result<TextureInfo, TextureError>;
}

/// Loader that records requests and leaves decoding to the renderer
///
/// Used when the host renderer streams textures itself and only needs the
/// viewer to tell it which paths are referenced.
#[derive(Debug, Default)]
pub struct DeferredTextureLoader;

impl TextureLoader for DeferredTextureLoader {
    fn load(&mut self, path: &str, color_space: ColorSpace) -> Result<TextureInfo, TextureError> {
        Ok(TextureInfo {
            path: path.to_string(),
            color_space,
            width: 0,
            height: 0,
            has_alpha: true,
            flip_y: false,
        })
    }
}

/// Loader decoding image files from disk with the `image` crate
#[derive(Debug, Clone)]
pub struct ImageTextureLoader {
    root: PathBuf,
}

impl ImageTextureLoader {
    /// Create a loader resolving paths against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load(&mut self, path: &str, color_space: ColorSpace) -> Result<TextureInfo, TextureError> {
        let full_path = self.root.join(path);
        let image = image::open(&full_path).map_err(|e| TextureError::LoadFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        log::debug!(
            "Decoded texture {} ({}x{}, {:?})",
            full_path.display(),
            image.width(),
            image.height(),
            image.color()
        );

        Ok(TextureInfo {
            path: path.to_string(),
            color_space,
            width: image.width(),
            height: image.height(),
            has_alpha: image.color().has_alpha(),
            flip_y: false,
        })
    }
}

/// Path-keyed texture cache in front of a [`TextureLoader`]
pub struct TextureCache {
    loader: Box<dyn TextureLoader>,
    textures: SlotMap<TextureHandle, TextureInfo>,
    by_path: HashMap<(String, ColorSpace), TextureHandle>,
}

impl TextureCache {
    /// Create a cache over the given loader
    pub fn new(loader: Box<dyn TextureLoader>) -> Self {
        Self {
            loader,
            textures: SlotMap::with_key(),
            by_path: HashMap::new(),
        }
    }

    /// Return the cached handle for `path`, loading it on first request
    pub fn load(&mut self, path: &str, color_space: ColorSpace) -> Result<TextureHandle, TextureError> {
        let key = (path.to_string(), color_space);
        if let Some(handle) = self.by_path.get(&key) {
            return Ok(*handle);
        }

        let info = self.loader.load(path, color_space)?;
        let handle = self.textures.insert(info);
        self.by_path.insert(key, handle);
        log::debug!("Loaded texture '{}' as {:?}", path, handle);
        Ok(handle)
    }

    /// Load an optional texture, degrading to `None` on any failure
    ///
    /// A missing path means the preset does not use the feature; a failed
    /// load is reported and the feature is skipped.
    pub fn load_optional(&mut self, path: Option<&str>, color_space: ColorSpace, feature: &str) -> Option<TextureHandle> {
        let Some(path) = path else {
            log::debug!("No texture configured for {feature}, skipping it");
            return None;
        };
        match self.load(path, color_space) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("{e}; {feature} will render without it");
                None
            }
        }
    }

    /// Get texture info
    pub fn get(&self, handle: TextureHandle) -> Option<&TextureInfo> {
        self.textures.get(handle)
    }

    /// Number of cached textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Loader that fails for every path containing `missing`
    pub(crate) struct FlakyLoader;

    impl TextureLoader for FlakyLoader {
        fn load(&mut self, path: &str, color_space: ColorSpace) -> Result<TextureInfo, TextureError> {
            if path.contains("missing") {
                return Err(TextureError::LoadFailed {
                    path: path.to_string(),
                    reason: "not found".to_string(),
                });
            }
            DeferredTextureLoader.load(path, color_space)
        }
    }

    #[test]
    fn test_cache_shares_handles_per_path() {
        let mut cache = TextureCache::new(Box::new(DeferredTextureLoader));
        let a = cache.load("textures/logo.png", ColorSpace::Srgb).unwrap();
        let b = cache.load("textures/logo.png", ColorSpace::Srgb).unwrap();
        let c = cache.load("textures/logo.png", ColorSpace::Linear).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(a).unwrap().path, "textures/logo.png");
    }

    #[test]
    fn test_optional_load_degrades() {
        let mut cache = TextureCache::new(Box::new(FlakyLoader));
        assert!(cache.load_optional(None, ColorSpace::Srgb, "logo").is_none());
        assert!(cache.load_optional(Some("missing.png"), ColorSpace::Srgb, "logo").is_none());
        assert!(cache.load_optional(Some("logo.png"), ColorSpace::Srgb, "logo").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_image_loader_reports_missing_file() {
        let mut loader = ImageTextureLoader::new(std::env::temp_dir());
        let result = loader.load("eyewear_viewer_no_such_texture.png", ColorSpace::Srgb);
        assert!(matches!(result, Err(TextureError::LoadFailed { .. })));
    }
}
