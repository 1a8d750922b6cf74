//! Axis-aligned bounds

use crate::foundation::math::Vec3;

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Enclosing box of a set of boxes, `None` when empty
    pub fn enclosing<'a>(boxes: impl IntoIterator<Item = &'a Aabb>) -> Option<Aabb> {
        boxes.into_iter().fold(None, |acc: Option<Aabb>, b| {
            Some(match acc {
                Some(acc) => acc.union(b),
                None => *b,
            })
        })
    }
}
