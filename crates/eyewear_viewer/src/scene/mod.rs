//! Scene access for the viewer
//!
//! A flat world-space view of the loaded model, the mesh role classifier and
//! the binder that applies presets to it.

pub mod binder;
pub mod bounds;
pub mod classifier;
pub mod scene_graph;

pub use binder::{ModelBinding, SceneBinder};
pub use bounds::Aabb;
pub use classifier::{ClassifierRule, Classifier, MatchField, MeshRole, Pattern, DEFAULT_RULES};
pub use scene_graph::{CameraNode, MeshNode, NodeKind, SceneGraph, SceneNode};
