//! Collider shape descriptors (stored in MODEL SPACE)
//!
//! A [`ShapeDescriptor`] is a snapshot of one collider taken from the host
//! collision system for the duration of one frame.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::foundation::math::{Mat4, Point3, Transform, Vec3};
use crate::render::primitives::Mesh;

/// Opaque, collision-system-assigned identity of one heightfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeightfieldId(pub u64);

impl fmt::Display for HeightfieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "heightfield#{}", self.0)
    }
}

bitflags! {
    /// Collider state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColliderFlags: u8 {
        /// Collider participates in collision
        const ENABLED = 1 << 0;
        /// Collider is a trigger volume (no physical response)
        const TRIGGER = 1 << 1;
    }
}

impl Default for ColliderFlags {
    fn default() -> Self {
        Self::ENABLED
    }
}

/// Principal axis of a capsule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapsuleAxis {
    /// Along local X
    X,
    /// Along local Y
    #[default]
    Y,
    /// Along local Z
    Z,
}

impl CapsuleAxis {
    /// Map a host direction index (0 = X, 1 = Y, 2 = Z); anything else is Y
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => Self::X,
            2 => Self::Z,
            _ => Self::Y,
        }
    }
}

/// Footprint of a heightfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightfieldBounds {
    /// World position of the heightfield's local origin
    pub origin: Vec3,
    /// Extent along X, maximum height along Y, extent along Z
    pub size: Vec3,
}

/// Geometric classification of a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Authored triangle mesh
    Mesh,
    /// Oriented box
    Box,
    /// Sphere
    Sphere,
    /// Capsule
    Capsule,
    /// Terrain heightfield
    Heightfield,
}

/// Collider shape parameters
///
/// New kinds may appear; the visualizer skips the ones it cannot draw.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ColliderShape {
    /// Authored mesh, drawn as-is
    Mesh {
        /// Collision mesh in model space
        mesh: Arc<Mesh>,
        /// Whether the host treats the mesh as its convex hull
        convex: bool,
    },
    /// Box
    Box {
        /// Half size along each local axis
        half_extents: Vec3,
        /// Local center offset
        center: Vec3,
    },
    /// Sphere around the collider origin
    Sphere {
        /// Radius in model units
        radius: f32,
    },
    /// Capsule, visualized as a capped cylinder
    Capsule {
        /// Radius in model units
        radius: f32,
        /// Full height along the principal axis
        height: f32,
        /// Principal axis
        axis: CapsuleAxis,
        /// Local center offset
        center: Vec3,
    },
    /// Terrain heightfield
    Heightfield {
        /// Stable identity, used as the cache key
        id: HeightfieldId,
        /// Footprint and origin
        bounds: HeightfieldBounds,
    },
}

impl ColliderShape {
    /// Shape kind
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Mesh { .. } => ShapeKind::Mesh,
            Self::Box { .. } => ShapeKind::Box,
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Capsule { .. } => ShapeKind::Capsule,
            Self::Heightfield { .. } => ShapeKind::Heightfield,
        }
    }

    /// Local-space bounding sphere as `(center, radius)`
    pub fn local_bounding_sphere(&self) -> (Vec3, f32) {
        match self {
            Self::Mesh { mesh, .. } => {
                let bounds = mesh.bounds();
                (bounds.center(), bounds.extents().norm())
            }
            Self::Box { half_extents, center } => (*center, half_extents.norm()),
            Self::Sphere { radius } => (Vec3::zeros(), *radius),
            Self::Capsule { radius, height, center, .. } => (*center, height * 0.5 + radius),
            Self::Heightfield { bounds, .. } => (bounds.size * 0.5, bounds.size.norm() * 0.5),
        }
    }
}

/// Snapshot of one collider for one frame
#[derive(Debug, Clone)]
pub struct ShapeDescriptor {
    /// Shape parameters in model space
    pub shape: ColliderShape,
    /// Collider local-to-world matrix
    pub local_to_world: Mat4,
    /// Enabled / trigger state
    pub flags: ColliderFlags,
    /// Display name for the label overlay
    pub name: Arc<str>,
}

impl ShapeDescriptor {
    /// Enabled, non-trigger collider with the given transform
    pub fn new(shape: ColliderShape, transform: &Transform) -> Self {
        Self {
            shape,
            local_to_world: transform.to_matrix(),
            flags: ColliderFlags::default(),
            name: Arc::from(""),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Arc::from(name);
        self
    }

    /// Mark as trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.flags.insert(ColliderFlags::TRIGGER);
        self
    }

    /// Mark as disabled
    pub fn disabled(mut self) -> Self {
        self.flags.remove(ColliderFlags::ENABLED);
        self
    }

    /// Shape kind
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Whether the collider is enabled
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(ColliderFlags::ENABLED)
    }

    /// Whether the collider is a trigger volume
    pub fn is_trigger(&self) -> bool {
        self.flags.contains(ColliderFlags::TRIGGER)
    }

    /// Decomposed world transform (lossy scale)
    pub fn world_transform(&self) -> Transform {
        Transform::from_matrix(&self.local_to_world)
    }

    /// World position of the collider origin
    pub fn world_position(&self) -> Vec3 {
        self.local_to_world.transform_point(&Point3::origin()).coords
    }

    /// Conservative world-space bounding sphere as `(center, radius)`
    pub fn world_bounding_sphere(&self) -> (Vec3, f32) {
        let (local_center, local_radius) = self.shape.local_bounding_sphere();
        let scale = self.world_transform().scale;
        let max_scale = scale.x.max(scale.y).max(scale.z);
        let center = self.local_to_world.transform_point(&Point3::from(local_center)).coords;
        (center, local_radius * max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_flags() {
        let shape = ShapeDescriptor::new(ColliderShape::Sphere { radius: 1.0 }, &Transform::identity());
        assert!(shape.is_enabled());
        assert!(!shape.is_trigger());

        let trigger = shape.clone().as_trigger().disabled();
        assert!(trigger.is_trigger());
        assert!(!trigger.is_enabled());
    }

    #[test]
    fn test_capsule_axis_from_index() {
        assert_eq!(CapsuleAxis::from_index(0), CapsuleAxis::X);
        assert_eq!(CapsuleAxis::from_index(1), CapsuleAxis::Y);
        assert_eq!(CapsuleAxis::from_index(2), CapsuleAxis::Z);
        assert_eq!(CapsuleAxis::from_index(9), CapsuleAxis::Y);
    }

    #[test]
    fn test_world_bounding_sphere_scales_and_offsets() {
        let transform = Transform::from_position(Vec3::new(10.0, 0.0, 0.0))
            .with_scale(Vec3::new(1.0, 2.0, 1.0));
        let shape = ShapeDescriptor::new(
            ColliderShape::Box {
                half_extents: Vec3::new(3.0, 4.0, 0.0),
                center: Vec3::new(0.0, 1.0, 0.0),
            },
            &transform,
        );

        let (center, radius) = shape.world_bounding_sphere();
        assert_relative_eq!(center, Vec3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(radius, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_kind_matches_shape() {
        let shape = ColliderShape::Heightfield {
            id: HeightfieldId(3),
            bounds: HeightfieldBounds {
                origin: Vec3::zeros(),
                size: Vec3::new(10.0, 2.0, 10.0),
            },
        };
        assert_eq!(shape.kind(), ShapeKind::Heightfield);
        assert_eq!(HeightfieldId(3).to_string(), "heightfield#3");
    }
}
