//! Collider shape snapshots
//!
//! # Module Organization
//!
//! - [`shape`] - Shape kinds, parameters and the per-frame [`ShapeDescriptor`]
//!
//! Shapes are stored in model space together with the collider's
//! local-to-world matrix; the visualizer decides per kind how much of that
//! transform is baked into vertices and how much is submitted to the renderer.

pub mod shape;

// Re-export commonly used types
pub use shape::{
    CapsuleAxis, ColliderFlags, ColliderShape, HeightfieldBounds, HeightfieldId, ShapeDescriptor, ShapeKind,
};
