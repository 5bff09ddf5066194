//! Collision-specific debug visualization
//!
//! Once per rendered frame the visualizer asks the collision world for
//! everything near the observer, turns each collider into a mesh that
//! matches its shape and hands that mesh to the renderer for one frame.
//!
//! Shapes are drawn in one of three ways:
//! - authored meshes go straight to the renderer,
//! - heightfields go through the [`HeightfieldCache`],
//! - boxes, spheres and capsules are adapted from a canonical template into
//!   a pooled mesh that is released a fixed delay later.

use std::sync::Arc;

use log::{debug, trace};

use crate::config::VisualizerConfig;
use crate::foundation::math::Vec3;
use crate::physics::collision::{ColliderShape, ShapeDescriptor};
use crate::render::draw_queue::{DebugRenderer, DrawSubmission, MeshSource};
use crate::render::material::{MaterialKind, MaterialSet};
use crate::render::primitives::{PrimitiveGenerator, PrimitiveKind};
use crate::render::release_queue::MeshPool;
use crate::spatial::{CollisionWorld, EntityHandle};

use super::adapter::{adapt_into, template_for};
use super::heightfield_cache::HeightfieldCache;

/// Name label for the text overlay
#[derive(Debug, Clone, PartialEq)]
pub struct NameLabel {
    /// Collider display name
    pub name: Arc<str>,
    /// Collider origin in world space
    pub world_position: Vec3,
}

/// What one poll did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Entities returned by the overlap query
    pub queried: usize,
    /// Draw submissions made
    pub drawn: usize,
    /// Entities skipped as disabled or by the trigger filter
    pub filtered: usize,
    /// Adapted meshes still awaiting release after this poll
    pub live_meshes: usize,
    /// Heightfield meshes built during this poll
    pub heightfield_builds: usize,
}

/// Collision-specific debug visualizer
///
/// Holds only what must persist between frames: canonical templates, the
/// heightfield cache, the release pool and scratch buffers. Everything the
/// user can change lives in the [`VisualizerConfig`] passed to
/// [`CollisionVisualizer::poll`].
#[derive(Debug)]
pub struct CollisionVisualizer {
    primitives: PrimitiveGenerator,
    materials: MaterialSet,
    heightfields: HeightfieldCache,
    pool: MeshPool,
    nearby: Vec<EntityHandle>,
    labels: Vec<NameLabel>,
    last_stats: FrameStats,
}

impl CollisionVisualizer {
    /// Create a visualizer from a config
    ///
    /// Reads the mesh resolutions, shader, alpha and cache capacity.
    pub fn new(config: &VisualizerConfig) -> Self {
        let heightfields = match config.heightfield_cache_capacity {
            Some(capacity) => HeightfieldCache::with_capacity(capacity),
            None => HeightfieldCache::new(),
        };

        Self {
            primitives: PrimitiveGenerator::new(config.primitives.clone()),
            materials: MaterialSet::new(&config.shader, config.alpha),
            heightfields,
            pool: MeshPool::new(),
            nearby: Vec::new(),
            labels: Vec::new(),
            last_stats: FrameStats::default(),
        }
    }

    /// Visualize one frame
    ///
    /// `now` is the frame time in seconds, used to schedule and release
    /// adapted meshes.
    pub fn poll<W, R>(
        &mut self,
        observer: Vec3,
        config: &VisualizerConfig,
        world: &W,
        renderer: &mut R,
        now: f32,
    ) -> FrameStats
    where
        W: CollisionWorld + ?Sized,
        R: DebugRenderer + ?Sized,
    {
        self.pool.release_expired(now);
        self.labels.clear();

        let mut stats = FrameStats::default();
        if !config.visible {
            stats.live_meshes = self.pool.live_count();
            self.last_stats = stats;
            return stats;
        }

        self.materials.set_alpha(config.alpha);

        let mut nearby = std::mem::take(&mut self.nearby);
        nearby.clear();
        world.query_sphere_into(observer, config.query_radius, &mut nearby);
        stats.queried = nearby.len();

        let misses_before = self.heightfields.stats().misses;

        for &entity in &nearby {
            let Some(shape) = world.shape(entity) else {
                debug!("Entity {} has no collider, skipping", entity.id());
                continue;
            };
            // Every overlapping collider gets a label, filtered or not
            if config.show_names {
                self.labels.push(NameLabel {
                    name: Arc::clone(&shape.name),
                    world_position: shape.world_position(),
                });
            }
            if !shape.is_enabled() || !config.trigger_filter.admits(shape.is_trigger()) {
                stats.filtered += 1;
                continue;
            }

            if self.draw_shape(entity, &shape, config, world, renderer, now) {
                stats.drawn += 1;
            }
        }

        self.nearby = nearby;

        stats.heightfield_builds = self.heightfields.stats().misses - misses_before;
        stats.live_meshes = self.pool.live_count();
        trace!("Collision debug frame: {:?}", stats);

        self.last_stats = stats;
        stats
    }

    fn draw_shape<W, R>(
        &mut self,
        entity: EntityHandle,
        shape: &ShapeDescriptor,
        config: &VisualizerConfig,
        world: &W,
        renderer: &mut R,
        now: f32,
    ) -> bool
    where
        W: CollisionWorld + ?Sized,
        R: DebugRenderer + ?Sized,
    {
        let layer = config.render_layer;

        match &shape.shape {
            ColliderShape::Mesh { mesh, convex } => {
                let kind = if *convex { MaterialKind::ConvexHull } else { MaterialKind::Mesh };
                renderer.draw(DrawSubmission {
                    source: MeshSource::Authored(entity),
                    mesh,
                    transform: shape.local_to_world,
                    material: self.materials.get(kind),
                    layer,
                });
                true
            }
            ColliderShape::Heightfield { id, bounds } => {
                let id = *id;
                let plane = self.primitives.get(PrimitiveKind::Plane);
                let mesh = self.heightfields.get_or_build(
                    id,
                    bounds,
                    |world_xz| world.sample_height(id, world_xz),
                    plane,
                );
                renderer.draw(DrawSubmission {
                    source: MeshSource::Heightfield(id),
                    mesh,
                    transform: shape.local_to_world,
                    material: self.materials.get(MaterialKind::Heightfield),
                    layer,
                });
                true
            }
            ColliderShape::Box { .. } | ColliderShape::Sphere { .. } | ColliderShape::Capsule { .. } => {
                let (Some(template), Some(kind)) = (template_for(&shape.shape), material_for(&shape.shape)) else {
                    return false;
                };

                let mut mesh = self.pool.recycle();
                let Some(transform) = adapt_into(self.primitives.get(template), shape, &mut mesh) else {
                    return false;
                };

                let key = self.pool.insert(mesh, now + config.mesh_release_delay);
                let Some(mesh) = self.pool.get(key) else {
                    return false;
                };
                renderer.draw(DrawSubmission {
                    source: MeshSource::Ephemeral(key),
                    mesh,
                    transform,
                    material: self.materials.get(kind),
                    layer,
                });
                true
            }
        }
    }

    /// Name labels recorded by the last poll
    pub fn labels(&self) -> &[NameLabel] {
        &self.labels
    }

    /// Statistics of the last poll
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Canonical templates
    pub fn primitives(&self) -> &PrimitiveGenerator {
        &self.primitives
    }

    /// Shape materials with the current alpha
    pub fn materials(&self) -> &MaterialSet {
        &self.materials
    }

    /// Cached heightfield meshes
    pub fn heightfields(&self) -> &HeightfieldCache {
        &self.heightfields
    }

    /// Mutable heightfield cache, for invalidation after terrain edits
    pub fn heightfields_mut(&mut self) -> &mut HeightfieldCache {
        &mut self.heightfields
    }

    /// Adapted meshes awaiting release
    pub fn pool(&self) -> &MeshPool {
        &self.pool
    }

    /// Drop all adapted and cached meshes
    pub fn clear(&mut self) {
        self.pool.clear();
        self.heightfields.clear();
        self.labels.clear();
    }
}

/// Material of an adapted primitive shape
fn material_for(shape: &ColliderShape) -> Option<MaterialKind> {
    match shape {
        ColliderShape::Box { .. } => Some(MaterialKind::Box),
        ColliderShape::Sphere { .. } => Some(MaterialKind::Sphere),
        ColliderShape::Capsule { .. } => Some(MaterialKind::Capsule),
        ColliderShape::Mesh { .. } | ColliderShape::Heightfield { .. } => None,
    }
}
