//! Compiled programs and their uniform tables

use crate::foundation::math::Vec3;
use crate::render::texture::TextureHandle;

use super::markers::{inject, ShaderError, ShaderMarker};

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
}

/// Vertex and fragment source pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Vertex stage source
    pub vertex: String,
    /// Fragment stage source
    pub fragment: String,
}

impl ShaderSource {
    /// Create a source pair
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Source of one stage
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }

    /// Patch one stage in place
    ///
    /// On error the source is left untouched.
    pub fn inject(&mut self, stage: ShaderStage, marker: ShaderMarker, patch: &str) -> Result<(), ShaderError> {
        let target = match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        };
        let patched = inject(target.as_str(), marker, patch)?;
        *target = patched;
        Ok(())
    }
}

/// Value bound to a uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `float`
    Float(f32),
    /// `vec3`
    Vec3(Vec3),
    /// `sampler2D`; `None` samples the host's default texture
    Texture(Option<TextureHandle>),
}

/// Index of a uniform inside a [`UniformTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformHandle(usize);

/// Named uniforms of a compiled program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformTable {
    entries: Vec<(String, UniformValue)>,
}

impl UniformTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a uniform, or overwrite the value of an existing one
    pub fn register(&mut self, name: &str, value: UniformValue) -> UniformHandle {
        if let Some(handle) = self.find(name) {
            self.entries[handle.0].1 = value;
            return handle;
        }
        self.entries.push((name.to_string(), value));
        UniformHandle(self.entries.len() - 1)
    }

    /// Write a uniform through its handle
    pub fn set(&mut self, handle: UniformHandle, value: UniformValue) {
        if let Some(entry) = self.entries.get_mut(handle.0) {
            entry.1 = value;
        }
    }

    /// Read a uniform through its handle
    pub fn get(&self, handle: UniformHandle) -> Option<&UniformValue> {
        self.entries.get(handle.0).map(|(_, value)| value)
    }

    /// Look up a handle by name
    pub fn find(&self, name: &str) -> Option<UniformHandle> {
        self.entries
            .iter()
            .position(|(entry, _)| entry == name)
            .map(UniformHandle)
    }

    /// Read a uniform by name
    pub fn value(&self, name: &str) -> Option<&UniformValue> {
        self.find(name).and_then(|handle| self.get(handle))
    }

    /// Iterate over `(name, value)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of uniforms
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A material's program after its compile hook ran
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    /// Final source handed to the host compiler
    pub source: ShaderSource,
    /// Uniforms added by augmentation
    pub uniforms: UniformTable,
    /// Whether any augmentation was applied
    pub augmented: bool,
}

impl ShaderProgram {
    /// Unaugmented program
    pub fn from_source(source: ShaderSource) -> Self {
        Self {
            source,
            uniforms: UniformTable::new(),
            augmented: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_reuses_existing_handle() {
        let mut table = UniformTable::new();
        let a = table.register("fresnelIntensity", UniformValue::Float(2.0));
        let b = table.register("chromaBoost", UniformValue::Float(0.8));
        let again = table.register("fresnelIntensity", UniformValue::Float(3.0));

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value("fresnelIntensity"), Some(&UniformValue::Float(3.0)));
    }

    #[test]
    fn test_set_through_handle() {
        let mut table = UniformTable::new();
        let handle = table.register("colorEdge", UniformValue::Vec3(Vec3::zeros()));
        table.set(handle, UniformValue::Vec3(Vec3::new(0.5, 0.5, 0.1)));
        assert_eq!(table.get(handle), Some(&UniformValue::Vec3(Vec3::new(0.5, 0.5, 0.1))));
        assert!(table.find("missing").is_none());
    }

    #[test]
    fn test_failed_stage_inject_leaves_source() {
        let mut source = ShaderSource::new("#include <common>", "void main() {}");
        let before = source.clone();
        assert!(source
            .inject(ShaderStage::Fragment, ShaderMarker::ColorFragment, "x")
            .is_err());
        assert_eq!(source, before);
        source
            .inject(ShaderStage::Vertex, ShaderMarker::Common, "varying vec2 vUv2;")
            .unwrap();
        assert!(source.stage(ShaderStage::Vertex).contains("vUv2"));
    }
}
