//! Renderer-facing half of the visualizer
//!
//! Meshes, materials and the submission seam to the host renderer. Nothing
//! here owns GPU state.

pub mod primitives;
pub mod material;
pub mod draw_queue;
pub mod release_queue;

pub use draw_queue::{DebugRenderer, DrawCommand, DrawQueue, DrawSubmission, MeshSource};
pub use material::{DebugMaterial, MaterialKind, MaterialSet};
pub use primitives::{IndexBuffer, IndexFormat, Mesh};
pub use release_queue::{MeshKey, MeshPool};
