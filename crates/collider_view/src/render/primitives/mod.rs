//! Core primitive types for rendering
//!
//! This module contains the mesh container shared by every debug draw and
//! the generator for the canonical unit meshes the visualizer adapts.

pub mod mesh;
pub mod generator;

// Re-export commonly used types
pub use mesh::{IndexBuffer, IndexFormat, Mesh};
pub use generator::{CanonicalMeshes, PrimitiveGenerator, PrimitiveKind, PrimitiveSettings};
