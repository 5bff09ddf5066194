//! Per-instance mesh adaptation
//!
//! Copies a canonical template and moves its vertices so the copy matches
//! one collider. Topology is never touched: the adapted mesh has the same
//! vertex count, index width and index list as its template.

use crate::foundation::math::{constants::HALF_PI, Mat4, Point3, Quat, Transform, Vec3};
use crate::physics::collision::{CapsuleAxis, ColliderShape, ShapeDescriptor};
use crate::render::primitives::{Mesh, PrimitiveKind};

/// An adapted copy together with the transform it must be drawn with
#[derive(Debug, Clone)]
pub struct AdaptedMesh {
    /// Adapted copy of the template
    pub mesh: Mesh,
    /// Transform to submit the copy with
    pub transform: Mat4,
}

/// Template a shape is adapted from; `None` for shapes drawn without one
pub fn template_for(shape: &ColliderShape) -> Option<PrimitiveKind> {
    match shape {
        ColliderShape::Box { .. } => Some(PrimitiveKind::Box),
        ColliderShape::Sphere { .. } => Some(PrimitiveKind::Sphere),
        ColliderShape::Capsule { .. } => Some(PrimitiveKind::Cylinder),
        ColliderShape::Mesh { .. } | ColliderShape::Heightfield { .. } => None,
    }
}

/// Adapt `template` to `shape` into a fresh mesh
pub fn adapt(template: &Mesh, shape: &ShapeDescriptor) -> Option<AdaptedMesh> {
    let mut mesh = Mesh::default();
    let transform = adapt_into(template, shape, &mut mesh)?;
    Some(AdaptedMesh { mesh, transform })
}

/// Adapt `template` to `shape`, reusing `target`'s buffers
///
/// Returns the submission transform, or `None` (leaving `target` untouched)
/// when the shape is not built from a template.
pub fn adapt_into(template: &Mesh, shape: &ShapeDescriptor, target: &mut Mesh) -> Option<Mat4> {
    let transform = match &shape.shape {
        ColliderShape::Box { half_extents, center } => {
            let world = shape.world_transform();
            let scale = (half_extents * 2.0).component_mul(&world.scale);

            target.copy_from(template);
            for position in target.positions_mut() {
                *position = position.component_mul(&scale);
            }

            // Scale is baked into the vertices, so the draw carries none
            let world_center = shape
                .local_to_world
                .transform_point(&Point3::from(*center))
                .coords;
            Transform::from_position_rotation(world_center, world.rotation).to_matrix()
        }
        ColliderShape::Sphere { radius } => {
            target.copy_from(template);
            for position in target.positions_mut() {
                *position *= *radius;
            }
            shape.local_to_world
        }
        ColliderShape::Capsule { radius, height, axis, center } => {
            let scale = Vec3::new(*radius, *height, *radius);
            let rotation = capsule_rotation(*axis);

            target.copy_from(template);
            for position in target.positions_mut() {
                *position = rotation * position.component_mul(&scale) + center;
            }
            shape.local_to_world
        }
        ColliderShape::Mesh { .. } | ColliderShape::Heightfield { .. } => return None,
    };

    target.recalculate_bounds();
    // Uniform scaling leaves the sphere's analytic normals valid
    let keeps_normals = matches!(shape.shape, ColliderShape::Sphere { .. });
    if template.normals().is_some() && !keeps_normals {
        target.recalculate_normals();
    }
    Some(transform)
}

/// Rotation taking the cylinder's Y axis onto the capsule axis
fn capsule_rotation(axis: CapsuleAxis) -> Quat {
    match axis {
        CapsuleAxis::X => Quat::from_axis_angle(&Vec3::z_axis(), HALF_PI),
        CapsuleAxis::Y => Quat::identity(),
        CapsuleAxis::Z => Quat::from_axis_angle(&Vec3::x_axis(), HALF_PI),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::primitives::generator::{build_box, build_cylinder, build_sphere};
    use approx::assert_relative_eq;

    fn capsule(axis: CapsuleAxis) -> ShapeDescriptor {
        ShapeDescriptor::new(
            ColliderShape::Capsule {
                radius: 0.5,
                height: 3.0,
                axis,
                center: Vec3::zeros(),
            },
            &Transform::identity(),
        )
    }

    #[test]
    fn test_adapt_preserves_topology() {
        let shapes = [
            (
                build_box(),
                ColliderShape::Box {
                    half_extents: Vec3::new(0.0, 7.0, -2.0),
                    center: Vec3::new(1.0, 1.0, 1.0),
                },
            ),
            (build_sphere(6), ColliderShape::Sphere { radius: -3.0 }),
            (
                build_cylinder(8),
                ColliderShape::Capsule {
                    radius: 2.0,
                    height: 0.0,
                    axis: CapsuleAxis::Z,
                    center: Vec3::zeros(),
                },
            ),
        ];

        for (template, shape) in shapes {
            let shape = ShapeDescriptor::new(shape, &Transform::identity());
            let adapted = adapt(&template, &shape).unwrap();
            assert!(adapted.mesh.same_topology(&template));
            assert_eq!(adapted.mesh.triangle_count(), template.triangle_count());
        }
    }

    #[test]
    fn test_capsule_extent_follows_axis() {
        let template = build_cylinder(16);

        for (axis, long) in [(CapsuleAxis::X, 0), (CapsuleAxis::Y, 1), (CapsuleAxis::Z, 2)] {
            let adapted = adapt(&template, &capsule(axis)).unwrap();
            let size = adapted.mesh.bounds().size();

            for dim in 0..3 {
                let expected = if dim == long { 3.0 } else { 1.0 };
                assert_relative_eq!(size[dim], expected, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_capsule_center_offset() {
        let mut shape = capsule(CapsuleAxis::Y);
        if let ColliderShape::Capsule { center, .. } = &mut shape.shape {
            *center = Vec3::new(0.0, 2.0, 0.0);
        }

        let adapted = adapt(&build_cylinder(8), &shape).unwrap();
        assert_relative_eq!(adapted.mesh.bounds().center(), Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_box_bakes_world_scale() {
        let transform = Transform::from_position(Vec3::new(5.0, 0.0, 0.0)).with_scale(Vec3::new(2.0, 1.0, 1.0));
        let shape = ShapeDescriptor::new(
            ColliderShape::Box {
                half_extents: Vec3::new(1.0, 1.0, 1.0),
                center: Vec3::new(0.5, 0.0, 0.0),
            },
            &transform,
        );

        let adapted = adapt(&build_box(), &shape).unwrap();
        assert_relative_eq!(adapted.mesh.bounds().size(), Vec3::new(4.0, 2.0, 2.0), epsilon = 1e-5);

        let world = adapted.mesh.bounds().transformed(&adapted.transform);
        assert_relative_eq!(world.center(), Vec3::new(6.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_keeps_full_transform() {
        let transform = Transform::from_position(Vec3::new(0.0, 4.0, 0.0)).with_scale(Vec3::new(2.0, 2.0, 2.0));
        let shape = ShapeDescriptor::new(ColliderShape::Sphere { radius: 1.5 }, &transform);

        let adapted = adapt(&build_sphere(8), &shape).unwrap();
        assert_relative_eq!(adapted.transform, transform.to_matrix(), epsilon = 1e-6);
        assert_relative_eq!(adapted.mesh.bounds().max.y, 1.5, epsilon = 1e-5);
        assert!(adapted.mesh.normals().is_some());
    }

    #[test]
    fn test_sphere_keeps_analytic_normals() {
        let template = build_sphere(8);
        let shape = ShapeDescriptor::new(ColliderShape::Sphere { radius: 2.5 }, &Transform::identity());

        let adapted = adapt(&template, &shape).unwrap();
        assert_eq!(adapted.mesh.normals(), template.normals());
        for normal in adapted.mesh.normals().unwrap() {
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_adapt_into_reuses_target() {
        let template = build_box();
        let shape = ShapeDescriptor::new(ColliderShape::Sphere { radius: 2.0 }, &Transform::identity());
        let mut target = build_box();
        target.positions_mut()[0] = Vec3::new(100.0, 100.0, 100.0);

        assert!(adapt_into(&template, &shape, &mut target).is_some());
        assert_relative_eq!(target.bounds().max, Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-6);
    }
}
