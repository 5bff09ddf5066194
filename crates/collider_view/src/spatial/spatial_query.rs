//! Abstract collision-world interface consumed by the visualizer
//!
//! The visualizer needs three things from the host each frame: which
//! colliders overlap a sphere around the observer, a shape snapshot for each
//! of them, and terrain height samples while it builds heightfield meshes.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

use crate::foundation::math::{Vec2, Vec3};
use crate::physics::collision::{HeightfieldId, ShapeDescriptor};

/// Opaque handle of a collidable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u32);

impl EntityHandle {
    /// Get the raw ID
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Host collision system as seen by the visualizer
pub trait CollisionWorld {
    /// Append every collider overlapping the sphere to `out`
    ///
    /// `out` is cleared by the caller; implementations only push.
    fn query_sphere_into(&self, center: Vec3, radius: f32, out: &mut Vec<EntityHandle>);

    /// Shape snapshot of one entity, `None` if it has no collider
    fn shape(&self, entity: EntityHandle) -> Option<ShapeDescriptor>;

    /// Terrain height at a world XZ position, relative to the heightfield origin
    fn sample_height(&self, heightfield: HeightfieldId, world_xz: Vec2) -> f32;
}

type HeightFn = Box<dyn Fn(Vec2) -> f32>;

/// In-memory collision world with linear overlap queries
#[derive(Default)]
pub struct ColliderRegistry {
    colliders: BTreeMap<EntityHandle, ShapeDescriptor>,
    heights: HashMap<HeightfieldId, HeightFn>,
    next_id: u32,
    height_samples: Cell<usize>,
}

impl ColliderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collider and return its handle
    pub fn insert(&mut self, shape: ShapeDescriptor) -> EntityHandle {
        let handle = EntityHandle(self.next_id);
        self.next_id += 1;
        self.colliders.insert(handle, shape);
        handle
    }

    /// Remove a collider, returning its last snapshot
    pub fn remove(&mut self, entity: EntityHandle) -> Option<ShapeDescriptor> {
        self.colliders.remove(&entity)
    }

    /// Mutable access to a registered collider
    pub fn get_mut(&mut self, entity: EntityHandle) -> Option<&mut ShapeDescriptor> {
        self.colliders.get_mut(&entity)
    }

    /// Install the height function backing a heightfield
    pub fn set_height_fn(&mut self, heightfield: HeightfieldId, height: impl Fn(Vec2) -> f32 + 'static) {
        self.heights.insert(heightfield, Box::new(height));
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether no colliders are registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Total height samples served so far
    pub fn height_samples(&self) -> usize {
        self.height_samples.get()
    }
}

impl CollisionWorld for ColliderRegistry {
    fn query_sphere_into(&self, center: Vec3, radius: f32, out: &mut Vec<EntityHandle>) {
        out.extend(self.colliders.iter().filter_map(|(&handle, shape)| {
            let (shape_center, shape_radius) = shape.world_bounding_sphere();
            let reach = radius + shape_radius;
            ((shape_center - center).norm_squared() <= reach * reach).then_some(handle)
        }));
    }

    fn shape(&self, entity: EntityHandle) -> Option<ShapeDescriptor> {
        self.colliders.get(&entity).cloned()
    }

    fn sample_height(&self, heightfield: HeightfieldId, world_xz: Vec2) -> f32 {
        self.height_samples.set(self.height_samples.get() + 1);
        self.heights.get(&heightfield).map_or(0.0, |height| height(world_xz))
    }
}
