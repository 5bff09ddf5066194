//! Mesh representation for debug geometry
//!
//! A [`Mesh`] is a backend-agnostic container: vertex positions, optional
//! per-vertex normals, a triangle index list and cached bounds. The host
//! renderer uploads it however it likes; [`IndexBuffer::as_bytes`] exposes
//! the index data in its native width.
//!
//! Canonical templates are only ever handed out by shared reference. All
//! per-instance variation happens on copies made with [`Mesh::copy_from`],
//! which reuses the destination's allocations.

use crate::foundation::math::{Aabb, Vec3};

/// Width of one index in an [`IndexBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// 16-bit indices (up to 65536 vertices)
    U16,
    /// 32-bit indices
    U32,
}

/// Triangle index list stored at its native width
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    /// 16-bit indices
    U16(Vec<u16>),
    /// 32-bit indices
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Pick the narrowest format able to address `vertex_count` vertices
    ///
    /// Falls back to 32-bit storage if any index does not fit in 16 bits.
    pub fn for_vertex_count(indices: Vec<u32>, vertex_count: usize) -> Self {
        if vertex_count > usize::from(u16::MAX) + 1 {
            return Self::U32(indices);
        }

        let narrow: Result<Vec<u16>, _> = indices.iter().map(|&i| u16::try_from(i)).collect();
        match narrow {
            Ok(narrow) => Self::U16(narrow),
            Err(_) => Self::U32(indices),
        }
    }

    /// Index width
    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::U16,
            Self::U32(_) => IndexFormat::U32,
        }
    }

    /// Number of indices
    pub fn len(&self) -> usize {
        match self {
            Self::U16(indices) => indices.len(),
            Self::U32(indices) => indices.len(),
        }
    }

    /// Whether the buffer holds no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at position `i`, widened to `usize`
    pub fn get(&self, i: usize) -> Option<usize> {
        match self {
            Self::U16(indices) => indices.get(i).map(|&v| usize::from(v)),
            Self::U32(indices) => indices.get(i).map(|&v| v as usize),
        }
    }

    /// Iterate over all indices, widened to `usize`
    pub fn iter(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            Self::U16(indices) => Box::new(indices.iter().map(|&v| usize::from(v))),
            Self::U32(indices) => Box::new(indices.iter().map(|&v| v as usize)),
        }
    }

    /// Raw bytes in native width, ready for an index buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(indices) => bytemuck::cast_slice(indices),
            Self::U32(indices) => bytemuck::cast_slice(indices),
        }
    }

    /// Reverse the whole list in place, flipping every triangle's winding
    pub fn reverse(&mut self) {
        match self {
            Self::U16(indices) => indices.reverse(),
            Self::U32(indices) => indices.reverse(),
        }
    }

    /// Copy another buffer's contents, keeping this buffer's allocation
    /// when the formats agree
    fn copy_from(&mut self, other: &Self) {
        match (self, other) {
            (Self::U16(dst), Self::U16(src)) => dst.clone_from(src),
            (Self::U32(dst), Self::U32(src)) => dst.clone_from(src),
            (dst, src) => *dst = src.clone(),
        }
    }
}

/// Debug mesh: positions, optional normals, indices and cached bounds
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Option<Vec<Vec3>>,
    indices: IndexBuffer,
    bounds: Aabb,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new(Vec::new(), IndexBuffer::U16(Vec::new()))
    }
}

impl Mesh {
    /// Create a mesh; bounds are computed from the positions
    pub fn new(positions: Vec<Vec3>, indices: IndexBuffer) -> Self {
        let bounds = Aabb::from_points(&positions).unwrap_or(Aabb::new(Vec3::zeros(), Vec3::zeros()));
        Self {
            positions,
            normals: None,
            indices,
            bounds,
        }
    }

    /// Attach explicit per-vertex normals
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Mutable vertex positions; call [`Mesh::recalculate_bounds`] afterwards
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// Per-vertex normals, if present
    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    /// Triangle index list
    pub fn indices(&self) -> &IndexBuffer {
        &self.indices
    }

    /// Index width
    pub fn index_format(&self) -> IndexFormat {
        self.indices.format()
    }

    /// Bounds as of the last recalculation
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as vertex index triples
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (0..self.triangle_count()).filter_map(move |t| {
            Some([
                self.indices.get(t * 3)?,
                self.indices.get(t * 3 + 1)?,
                self.indices.get(t * 3 + 2)?,
            ])
        })
    }

    /// Unnormalized geometric normal `(b - a) x (c - a)` of one triangle
    pub fn face_normal(&self, [a, b, c]: [usize; 3]) -> Vec3 {
        let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
        (pb - pa).cross(&(pc - pa))
    }

    /// Whether both meshes share vertex count, index width and index list
    pub fn same_topology(&self, other: &Mesh) -> bool {
        self.vertex_count() == other.vertex_count() && self.indices == other.indices
    }

    /// Become a copy of `source`, reusing this mesh's buffers
    pub fn copy_from(&mut self, source: &Mesh) {
        self.positions.clone_from(&source.positions);
        self.normals.clone_from(&source.normals);
        self.indices.copy_from(&source.indices);
        self.bounds = source.bounds;
    }

    /// Recompute bounds from the current positions
    pub fn recalculate_bounds(&mut self) {
        if let Some(bounds) = Aabb::from_points(&self.positions) {
            self.bounds = bounds;
        }
    }

    /// Recompute smooth normals from topology
    ///
    /// Face normals are accumulated area-weighted per vertex and normalized.
    /// Vertices touched only by degenerate triangles get a zero normal.
    pub fn recalculate_normals(&mut self) {
        let mut normals = self.normals.take().unwrap_or_default();
        normals.clear();
        normals.resize(self.positions.len(), Vec3::zeros());

        for triangle in self.triangles() {
            let face = self.face_normal(triangle);
            for vertex in triangle {
                normals[vertex] += face;
            }
        }
        for normal in &mut normals {
            *normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);
        }

        self.normals = Some(normals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            IndexBuffer::for_vertex_count(vec![0, 1, 2, 0, 2, 3], 4),
        )
    }

    #[test]
    fn test_index_format_selection() {
        let small = IndexBuffer::for_vertex_count(vec![0, 1, 2], 3);
        assert_eq!(small.format(), IndexFormat::U16);

        let large = IndexBuffer::for_vertex_count(vec![0, 1, 70_000], 70_001);
        assert_eq!(large.format(), IndexFormat::U32);
    }

    #[test]
    fn test_index_bytes_match_width() {
        let small = IndexBuffer::U16(vec![0, 1, 2]);
        let large = IndexBuffer::U32(vec![0, 1, 2]);

        assert_eq!(small.as_bytes().len(), 6);
        assert_eq!(large.as_bytes().len(), 12);
    }

    #[test]
    fn test_reverse_flips_winding() {
        let mut mesh = quad();
        let before: Vec<Vec3> = mesh.triangles().map(|t| mesh.face_normal(t)).collect();
        mesh.indices.reverse();
        let after: Vec<Vec3> = mesh.triangles().map(|t| mesh.face_normal(t)).collect();

        assert!(before.iter().all(|n| n.y > 0.0));
        assert!(after.iter().all(|n| n.y < 0.0));
    }

    #[test]
    fn test_recalculate_normals_flat_quad() {
        let mut mesh = quad();
        mesh.recalculate_normals();

        for normal in mesh.normals().unwrap() {
            assert_relative_eq!(*normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_bounds_follow_positions() {
        let mut mesh = quad();
        for position in mesh.positions_mut() {
            *position *= 3.0;
        }
        mesh.recalculate_bounds();

        assert_eq!(mesh.bounds().max, Vec3::new(3.0, 0.0, 3.0));
    }

    #[test]
    fn test_copy_from_reuses_topology() {
        let source = quad();
        let mut copy = Mesh::default();
        copy.copy_from(&source);

        assert_eq!(copy, source);
        assert!(copy.same_topology(&source));
    }
}
