//! Debug draw submission
//!
//! The visualizer never talks to a graphics API. Every mesh it wants on
//! screen goes through [`DebugRenderer::draw`] as a [`DrawSubmission`]; the
//! host forwards it to its own renderer. [`DrawQueue`] is a recording
//! renderer that keeps an owned [`DrawCommand`] per submission.

use crate::foundation::math::{Aabb, Mat4, Vec4};
use crate::physics::collision::HeightfieldId;
use crate::spatial::EntityHandle;

use super::material::{DebugMaterial, MaterialKind};
use super::primitives::Mesh;
use super::release_queue::MeshKey;

/// Owner of the mesh behind a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshSource {
    /// Per-frame adapted mesh held by the release queue
    Ephemeral(MeshKey),
    /// Cached heightfield mesh, stable across frames
    Heightfield(HeightfieldId),
    /// Collider's own authored mesh
    Authored(EntityHandle),
}

/// One fire-and-forget draw request
#[derive(Debug, Clone, Copy)]
pub struct DrawSubmission<'a> {
    /// Who owns `mesh`
    pub source: MeshSource,
    /// Geometry in model space
    pub mesh: &'a Mesh,
    /// Model-to-world matrix
    pub transform: Mat4,
    /// Material to draw with
    pub material: &'a DebugMaterial,
    /// Render layer
    pub layer: u32,
}

/// Host-side sink for debug draws
pub trait DebugRenderer {
    /// Draw `submission` this frame
    fn draw(&mut self, submission: DrawSubmission<'_>);
}

impl<R: DebugRenderer + ?Sized> DebugRenderer for &mut R {
    fn draw(&mut self, submission: DrawSubmission<'_>) {
        (**self).draw(submission);
    }
}

/// Owned record of one submission
#[derive(Debug, Clone)]
pub struct DrawCommand {
    /// Who owned the mesh
    pub source: MeshSource,
    /// Model-to-world matrix
    pub transform_matrix: Mat4,
    /// Material kind drawn with
    pub material: MaterialKind,
    /// Material color including alpha
    pub color: Vec4,
    /// Render layer
    pub layer: u32,
    /// Mesh vertex count
    pub vertex_count: usize,
    /// Mesh triangle count
    pub triangle_count: usize,
    /// Mesh bounds mapped through `transform_matrix`
    pub world_bounds: Aabb,
}

impl DrawCommand {
    /// Record a submission
    pub fn from_submission(submission: &DrawSubmission<'_>) -> Self {
        Self {
            source: submission.source,
            transform_matrix: submission.transform,
            material: submission.material.kind,
            color: submission.material.color,
            layer: submission.layer,
            vertex_count: submission.mesh.vertex_count(),
            triangle_count: submission.mesh.triangle_count(),
            world_bounds: submission.mesh.bounds().transformed(&submission.transform),
        }
    }
}

/// Recording renderer
#[derive(Debug, Default)]
pub struct DrawQueue {
    commands: Vec<DrawCommand>,
}

impl DrawQueue {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every recorded command
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Commands in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands drawn with one material
    pub fn count_material(&self, kind: MaterialKind) -> usize {
        self.commands.iter().filter(|c| c.material == kind).count()
    }

    /// Run `draw_func` over every command in submission order
    pub fn execute<F>(&self, mut draw_func: F)
    where
        F: FnMut(&DrawCommand),
    {
        for command in &self.commands {
            draw_func(command);
        }
    }
}

impl DebugRenderer for DrawQueue {
    fn draw(&mut self, submission: DrawSubmission<'_>) {
        self.commands.push(DrawCommand::from_submission(&submission));
    }
}
