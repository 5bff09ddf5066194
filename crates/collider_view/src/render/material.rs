//! Wireframe debug materials
//!
//! One translucent material per collider kind. Colors are fixed; the alpha
//! channel is a single global value shared by all six.

use crate::config::clamp_alpha;
use crate::foundation::math::Vec4;

/// Which collider a material is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Authored triangle meshes
    Mesh,
    /// Convex hull meshes
    ConvexHull,
    /// Box colliders
    Box,
    /// Sphere colliders
    Sphere,
    /// Heightfield terrain
    Heightfield,
    /// Capsule colliders
    Capsule,
}

impl MaterialKind {
    /// All kinds, in storage order
    pub const ALL: [Self; 6] = [
        Self::Mesh,
        Self::ConvexHull,
        Self::Box,
        Self::Sphere,
        Self::Heightfield,
        Self::Capsule,
    ];

    /// Opaque base color (alpha 1)
    pub fn base_color(self) -> Vec4 {
        match self {
            Self::Mesh => Vec4::new(0.0, 1.0, 0.0, 1.0),
            Self::ConvexHull => Vec4::new(0.5, 0.0, 0.5, 1.0),
            Self::Box => Vec4::new(0.0, 0.0, 1.0, 1.0),
            Self::Sphere => Vec4::new(0.2, 0.2, 0.8, 1.0),
            Self::Heightfield => Vec4::new(1.0, 0.0, 0.0, 1.0),
            Self::Capsule => Vec4::new(0.5, 0.6, 0.2, 1.0),
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Mesh => 0,
            Self::ConvexHull => 1,
            Self::Box => 2,
            Self::Sphere => 3,
            Self::Heightfield => 4,
            Self::Capsule => 5,
        }
    }
}

/// A translucent wireframe material
#[derive(Debug, Clone, PartialEq)]
pub struct DebugMaterial {
    /// Collider kind this material colors
    pub kind: MaterialKind,
    /// RGBA color; alpha is the global overlay alpha
    pub color: Vec4,
    /// Shader asset the host renders this material with
    pub shader: String,
}

impl DebugMaterial {
    /// Alpha channel
    pub fn alpha(&self) -> f32 {
        self.color.w
    }
}

/// The six shape materials
#[derive(Debug, Clone)]
pub struct MaterialSet {
    materials: [DebugMaterial; 6],
    alpha: f32,
}

impl MaterialSet {
    /// Create all six materials for `shader` with the given alpha
    pub fn new(shader: &str, alpha: f32) -> Self {
        let materials = MaterialKind::ALL.map(|kind| DebugMaterial {
            kind,
            color: kind.base_color(),
            shader: shader.to_string(),
        });
        let mut set = Self { materials, alpha: 1.0 };
        set.set_alpha(alpha);
        set
    }

    /// Material for one collider kind
    pub fn get(&self, kind: MaterialKind) -> &DebugMaterial {
        &self.materials[kind.slot()]
    }

    /// Current global alpha
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Apply a new global alpha to every material, clamped to `[0.01, 1.0]`
    pub fn set_alpha(&mut self, alpha: f32) {
        let alpha = clamp_alpha(alpha);
        self.alpha = alpha;
        for material in &mut self.materials {
            material.color.w = alpha;
        }
    }
}
