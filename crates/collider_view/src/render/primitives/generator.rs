//! Canonical primitive mesh generation
//!
//! Builds the four unit templates every collider visualization starts from:
//!
//! - **Plane**: `Nx × Nz` grid over the unit square on XZ, facing +Y
//! - **Box**: 8-vertex cube with corners at ±0.5
//! - **Sphere**: UV-sphere of radius 1
//! - **Cylinder**: capped cylinder of radius 1 and height 1 along Y
//!
//! Every builder winds triangles so that `(b - a) x (c - a)` points out of
//! the surface. Generation is deterministic and infallible.

use std::cell::OnceCell;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants, Vec3};
use super::mesh::{IndexBuffer, Mesh};

/// Canonical primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Subdivided unit plane (heightfields)
    Plane,
    /// Unit box (box colliders)
    Box,
    /// Unit sphere (sphere colliders)
    Sphere,
    /// Unit capped cylinder (capsule colliders)
    Cylinder,
}

/// Fixed resolutions the canonical meshes are built with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimitiveSettings {
    /// Plane vertex count along X
    pub plane_vertices_x: u32,
    /// Plane vertex count along Z
    pub plane_vertices_z: u32,
    /// Sphere samples in inclination and azimuth
    pub sphere_resolution: u32,
    /// Cylinder ring segments
    pub cylinder_segments: u32,
}

impl Default for PrimitiveSettings {
    fn default() -> Self {
        Self {
            plane_vertices_x: 1000,
            plane_vertices_z: 1000,
            sphere_resolution: 10,
            cylinder_segments: 10,
        }
    }
}

/// Borrowed view of all four canonical meshes
#[derive(Debug, Clone, Copy)]
pub struct CanonicalMeshes<'a> {
    /// Subdivided plane
    pub plane: &'a Mesh,
    /// Unit box
    pub cube: &'a Mesh,
    /// Unit sphere
    pub sphere: &'a Mesh,
    /// Unit cylinder
    pub cylinder: &'a Mesh,
}

/// Owner of the canonical meshes
///
/// Each template is built at most once, on first request, and is immutable
/// afterwards. Only shared references are handed out.
#[derive(Debug, Default)]
pub struct PrimitiveGenerator {
    settings: PrimitiveSettings,
    plane: OnceCell<Mesh>,
    cube: OnceCell<Mesh>,
    sphere: OnceCell<Mesh>,
    cylinder: OnceCell<Mesh>,
}

impl PrimitiveGenerator {
    /// Create a generator; nothing is built until requested
    pub fn new(settings: PrimitiveSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Settings the templates are built with
    pub fn settings(&self) -> &PrimitiveSettings {
        &self.settings
    }

    /// Build any missing template and return all four
    pub fn generate(&self) -> CanonicalMeshes<'_> {
        CanonicalMeshes {
            plane: self.get(PrimitiveKind::Plane),
            cube: self.get(PrimitiveKind::Box),
            sphere: self.get(PrimitiveKind::Sphere),
            cylinder: self.get(PrimitiveKind::Cylinder),
        }
    }

    /// One template, built on first request
    pub fn get(&self, kind: PrimitiveKind) -> &Mesh {
        let (cell, build): (&OnceCell<Mesh>, fn(&PrimitiveSettings) -> Mesh) = match kind {
            PrimitiveKind::Plane => (&self.plane, |s| build_plane(s.plane_vertices_x, s.plane_vertices_z)),
            PrimitiveKind::Box => (&self.cube, |_| build_box()),
            PrimitiveKind::Sphere => (&self.sphere, |s| build_sphere(s.sphere_resolution)),
            PrimitiveKind::Cylinder => (&self.cylinder, |s| build_cylinder(s.cylinder_segments)),
        };

        cell.get_or_init(|| {
            let mesh = build(&self.settings);
            debug!(
                "Generated canonical {:?} mesh: {} vertices, {} triangles",
                kind,
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            mesh
        })
    }

    /// Whether a template has been built yet
    pub fn is_generated(&self, kind: PrimitiveKind) -> bool {
        match kind {
            PrimitiveKind::Plane => self.plane.get().is_some(),
            PrimitiveKind::Box => self.cube.get().is_some(),
            PrimitiveKind::Sphere => self.sphere.get().is_some(),
            PrimitiveKind::Cylinder => self.cylinder.get().is_some(),
        }
    }
}

/// Subdivided plane over `[0,1] x [0,1]` on XZ at `y = 0`
///
/// Always uses 32-bit indices: the default 1000×1000 grid has far more
/// points than 16 bits can address. Counts below 2 are raised to 2.
pub fn build_plane(vertices_x: u32, vertices_z: u32) -> Mesh {
    let nx = vertices_x.max(2);
    let nz = vertices_z.max(2);

    let mut positions = Vec::with_capacity(nx as usize * nz as usize);
    for z in 0..nz {
        for x in 0..nx {
            let tx = x as f32 / (nx - 1) as f32;
            let tz = z as f32 / (nz - 1) as f32;
            positions.push(Vec3::new(tx, 0.0, tz));
        }
    }

    let mut indices = Vec::with_capacity((nx as usize - 1) * (nz as usize - 1) * 6);
    for z in 0..nz - 1 {
        for x in 0..nx - 1 {
            let quad = z * nx + x;

            indices.extend_from_slice(&[quad, quad + nx, quad + nx + 1]);
            indices.extend_from_slice(&[quad, quad + nx + 1, quad + 1]);
        }
    }

    Mesh::new(positions, IndexBuffer::U32(indices))
}

/// Unit cube centered at the origin, 12 outward-wound triangles
pub fn build_box() -> Mesh {
    let positions = vec![
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(-0.5, 0.5, 0.5),
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(-0.5, -0.5, 0.5),
    ];

    let indices = vec![
        // -Z
        0, 2, 1, 0, 3, 2,
        // +Y
        2, 3, 4, 2, 4, 5,
        // +X
        1, 2, 5, 1, 5, 6,
        // -X
        0, 7, 4, 0, 4, 3,
        // +Z
        5, 4, 7, 5, 7, 6,
        // -Y
        0, 6, 7, 0, 1, 6,
    ];

    let vertex_count = positions.len();
    let mut mesh = Mesh::new(positions, IndexBuffer::for_vertex_count(indices, vertex_count));
    mesh.recalculate_normals();
    mesh
}

/// UV-sphere of radius 1 with `(resolution + 1)²` vertices
///
/// Vertex `(i, j)` sits at inclination `i / resolution · π` and azimuth
/// `j / resolution · 2π`. The straightforward quad split winds inward, so
/// the finished index list is reversed once.
pub fn build_sphere(resolution: u32) -> Mesh {
    let res = resolution.max(3);
    let row = res + 1;

    let mut positions = Vec::with_capacity(row as usize * row as usize);
    for i in 0..=res {
        for j in 0..=res {
            let u = j as f32 / res as f32;
            let v = i as f32 / res as f32;
            let inclination = v * constants::PI;
            let azimuth = u * constants::TAU;
            positions.push(Vec3::new(
                inclination.sin() * azimuth.cos(),
                inclination.sin() * azimuth.sin(),
                inclination.cos(),
            ));
        }
    }

    let mut indices = Vec::with_capacity(res as usize * res as usize * 6);
    for i in 0..res {
        for j in 0..res {
            let current = i * row + j;
            let below = (i + 1) * row + j;

            indices.extend_from_slice(&[current, current + 1, below]);
            indices.extend_from_slice(&[current + 1, below + 1, below]);
        }
    }

    let normals = positions
        .iter()
        .map(|p| p.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::z))
        .collect();

    let vertex_count = positions.len();
    let mut index_buffer = IndexBuffer::for_vertex_count(indices, vertex_count);
    index_buffer.reverse();

    Mesh::new(positions, index_buffer).with_normals(normals)
}

/// Capped cylinder of radius 1 and height 1, centered at the origin
///
/// Vertex layout for `n` segments:
/// - `[0, n)` lower ring
/// - `[n, 2n)` upper ring
/// - `2n` lower cap apex, `2n + 1` upper cap apex
pub fn build_cylinder(segments: u32) -> Mesh {
    let n = segments.max(3);
    let half_height = 0.5;
    let increment = constants::TAU / n as f32;

    let mut positions = Vec::with_capacity(n as usize * 2 + 2);
    for y in [-half_height, half_height] {
        for k in 0..n {
            let theta = k as f32 * increment;
            positions.push(Vec3::new(theta.cos(), y, theta.sin()));
        }
    }
    positions.push(Vec3::new(0.0, -half_height, 0.0));
    positions.push(Vec3::new(0.0, half_height, 0.0));

    let lower_apex = n * 2;
    let upper_apex = n * 2 + 1;

    let mut indices = Vec::with_capacity(n as usize * 12);
    for k in 0..n {
        let next = (k + 1) % n;

        // Side quad
        indices.extend_from_slice(&[k, k + n, next]);
        indices.extend_from_slice(&[k + n, next + n, next]);

        // Caps
        indices.extend_from_slice(&[next, lower_apex, k]);
        indices.extend_from_slice(&[k + n, upper_apex, next + n]);
    }

    let vertex_count = positions.len();
    let mut mesh = Mesh::new(positions, IndexBuffer::for_vertex_count(indices, vertex_count));
    mesh.recalculate_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::primitives::IndexFormat;
    use approx::assert_relative_eq;

    fn small_settings() -> PrimitiveSettings {
        PrimitiveSettings {
            plane_vertices_x: 8,
            plane_vertices_z: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_plane_counts_for_several_resolutions() {
        for n in [2_u32, 3, 10, 33] {
            let plane = build_plane(n, n);
            let n = n as usize;
            assert_eq!(plane.vertex_count(), n * n);
            assert_eq!(plane.triangle_count(), 2 * (n - 1) * (n - 1));
        }
    }

    #[test]
    fn test_plane_faces_up() {
        let plane = build_plane(6, 4);
        for triangle in plane.triangles() {
            let normal = plane.face_normal(triangle);
            assert!(normal.y > 0.0, "triangle {:?} faces {:?}", triangle, normal);
            assert_relative_eq!(normal.x, 0.0);
            assert_relative_eq!(normal.z, 0.0);
        }
    }

    #[test]
    fn test_plane_spans_unit_square_with_wide_indices() {
        let plane = build_plane(5, 5);
        assert_eq!(plane.index_format(), IndexFormat::U32);
        assert_eq!(plane.bounds().min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(plane.bounds().max, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_box_winding_is_outward() {
        let cube = build_box();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);

        for triangle in cube.triangles() {
            let centroid = (cube.positions()[triangle[0]]
                + cube.positions()[triangle[1]]
                + cube.positions()[triangle[2]])
                / 3.0;
            assert!(cube.face_normal(triangle).dot(&centroid) > 0.0, "triangle {:?}", triangle);
        }
    }

    #[test]
    fn test_box_normals_point_away_from_center() {
        let cube = build_box();
        let normals = cube.normals().unwrap();
        for (position, normal) in cube.positions().iter().zip(normals) {
            assert!(position.dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_sphere_vertices_on_unit_sphere() {
        let sphere = build_sphere(10);
        assert_eq!(sphere.vertex_count(), 121);
        assert_eq!(sphere.triangle_count(), 200);

        for position in sphere.positions() {
            assert_relative_eq!(position.norm(), 1.0, epsilon = 1e-5);
        }
        for (position, normal) in sphere.positions().iter().zip(sphere.normals().unwrap()) {
            assert_relative_eq!(*position, *normal, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sphere_winding_is_outward() {
        let sphere = build_sphere(10);
        let mut checked = 0;
        for triangle in sphere.triangles() {
            let normal = sphere.face_normal(triangle);
            // Pole rows collapse to zero-area triangles
            if normal.norm() < 1e-6 {
                continue;
            }
            let centroid = (sphere.positions()[triangle[0]]
                + sphere.positions()[triangle[1]]
                + sphere.positions()[triangle[2]])
                / 3.0;
            assert!(normal.dot(&centroid) > 0.0, "triangle {:?} faces inward", triangle);
            checked += 1;
        }
        assert!(checked > 100);
    }

    #[test]
    fn test_cylinder_layout() {
        let cylinder = build_cylinder(12);
        assert_eq!(cylinder.vertex_count(), 26);
        assert_eq!(cylinder.triangle_count(), 48);

        assert_relative_eq!(cylinder.bounds().min, Vec3::new(-1.0, -0.5, -1.0), epsilon = 1e-5);
        assert_relative_eq!(cylinder.bounds().max, Vec3::new(1.0, 0.5, 1.0), epsilon = 1e-5);
        assert_eq!(cylinder.positions()[24], Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(cylinder.positions()[25], Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_cylinder_bounds_follow_sampled_ring() {
        // 36 degree steps never reach z = -1
        let cylinder = build_cylinder(10);
        let ring_z = (0..10).map(|k| (k as f32 * constants::TAU / 10.0).sin());
        let (min_z, max_z) = ring_z.fold((f32::MAX, f32::MIN), |(lo, hi), z| (lo.min(z), hi.max(z)));

        assert_relative_eq!(cylinder.bounds().min.z, min_z, epsilon = 1e-5);
        assert_relative_eq!(cylinder.bounds().max.z, max_z, epsilon = 1e-5);
        assert!(cylinder.bounds().min.z > -0.96);
    }

    #[test]
    fn test_cylinder_side_winding_faces_away_from_axis() {
        let cylinder = build_cylinder(10);
        let apexes = [20, 21];

        for triangle in cylinder.triangles() {
            if triangle.iter().any(|v| apexes.contains(v)) {
                continue;
            }
            let centroid = (cylinder.positions()[triangle[0]]
                + cylinder.positions()[triangle[1]]
                + cylinder.positions()[triangle[2]])
                / 3.0;
            let radial = Vec3::new(centroid.x, 0.0, centroid.z);
            assert!(cylinder.face_normal(triangle).dot(&radial) > 0.0, "side triangle {:?}", triangle);
        }
    }

    #[test]
    fn test_cylinder_caps_face_outward() {
        let cylinder = build_cylinder(7);
        let (lower_apex, upper_apex) = (14, 15);

        for triangle in cylinder.triangles() {
            let normal = cylinder.face_normal(triangle);
            if triangle.contains(&lower_apex) {
                assert!(normal.y < 0.0);
            } else if triangle.contains(&upper_apex) {
                assert!(normal.y > 0.0);
            }
        }
    }

    #[test]
    fn test_generate_is_idempotent() {
        let generator = PrimitiveGenerator::new(small_settings());
        assert!(!generator.is_generated(PrimitiveKind::Sphere));

        let first = generator.generate();
        let first_plane = first.plane as *const Mesh;
        assert!(generator.is_generated(PrimitiveKind::Plane));
        assert!(generator.is_generated(PrimitiveKind::Cylinder));

        let second = generator.generate();
        assert!(std::ptr::eq(first_plane, second.plane));
        assert_eq!(second.plane.vertex_count(), 64);
    }

    #[test]
    fn test_get_builds_only_requested_kind() {
        let generator = PrimitiveGenerator::new(small_settings());
        let cube = generator.get(PrimitiveKind::Box);

        assert_eq!(cube.vertex_count(), 8);
        assert!(generator.is_generated(PrimitiveKind::Box));
        assert!(!generator.is_generated(PrimitiveKind::Plane));
    }
}
