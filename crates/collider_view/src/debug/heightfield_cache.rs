//! Heightfield mesh cache
//!
//! Building a heightfield mesh samples the terrain at every vertex of the
//! subdivided plane, which is far too slow to repeat per frame. Meshes are
//! built once per heightfield identity and reused until evicted or
//! invalidated.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, info};

use crate::foundation::math::Vec2;
use crate::physics::collision::{HeightfieldBounds, HeightfieldId};
use crate::render::primitives::Mesh;

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: usize,
    /// Lookups that built a mesh
    pub misses: usize,
    /// Meshes dropped to stay within capacity
    pub evictions: usize,
}

#[derive(Debug)]
struct CacheEntry {
    mesh: Mesh,
    last_used: u64,
}

/// Heightfield meshes keyed by stable identity
#[derive(Debug, Default)]
pub struct HeightfieldCache {
    entries: HashMap<HeightfieldId, CacheEntry>,
    capacity: Option<usize>,
    clock: u64,
    stats: CacheStats,
}

impl HeightfieldCache {
    /// Cache that never evicts
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `capacity` meshes, evicting the least recently
    /// used one when full. A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    /// Cached mesh for `id`, building it from `plane` on a miss
    ///
    /// `sampler` receives world XZ positions and is only called on a miss.
    pub fn get_or_build(
        &mut self,
        id: HeightfieldId,
        bounds: &HeightfieldBounds,
        sampler: impl FnMut(Vec2) -> f32,
        plane: &Mesh,
    ) -> &Mesh {
        self.clock += 1;
        let now = self.clock;

        if !self.entries.contains_key(&id) && self.is_full() {
            self.evict_least_recent();
        }

        match self.entries.entry(id) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                let entry = entry.into_mut();
                entry.last_used = now;
                &entry.mesh
            }
            Entry::Vacant(slot) => {
                self.stats.misses += 1;
                let mesh = build_heightfield_mesh(bounds, sampler, plane);
                info!(
                    "Built {} mesh: {} vertices, {} triangles",
                    id,
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
                &slot.insert(CacheEntry { mesh, last_used: now }).mesh
            }
        }
    }

    /// Cached mesh for `id` without touching recency or counters
    pub fn get(&self, id: HeightfieldId) -> Option<&Mesh> {
        self.entries.get(&id).map(|entry| &entry.mesh)
    }

    /// Whether a mesh for `id` is cached
    pub fn contains(&self, id: HeightfieldId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Drop the mesh for `id` so the next request rebuilds it
    pub fn invalidate(&mut self, id: HeightfieldId) -> bool {
        let removed = self.entries.remove(&id).is_some();
        if removed {
            debug!("Invalidated cached {} mesh", id);
        }
        removed
    }

    /// Drop every cached mesh
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached meshes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Eviction bound, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Hit, miss and eviction counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn is_full(&self) -> bool {
        self.capacity.is_some_and(|capacity| self.entries.len() >= capacity)
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(&id, _)| id);

        if let Some(id) = oldest {
            self.entries.remove(&id);
            self.stats.evictions += 1;
            debug!("Evicted cached {} mesh", id);
        }
    }
}

/// Fit the unit plane to a heightfield footprint and sample its heights
///
/// Positions stay relative to the heightfield origin; the draw carries the
/// collider's own transform.
pub fn build_heightfield_mesh(
    bounds: &HeightfieldBounds,
    mut sampler: impl FnMut(Vec2) -> f32,
    plane: &Mesh,
) -> Mesh {
    let mut mesh = Mesh::default();
    mesh.copy_from(plane);

    for position in mesh.positions_mut() {
        let local = position.component_mul(&bounds.size);
        let world = bounds.origin + local;
        *position = local;
        position.y = sampler(Vec2::new(world.x, world.z));
    }

    mesh.recalculate_bounds();
    mesh.recalculate_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::primitives::generator::build_plane;
    use approx::assert_relative_eq;

    fn bounds() -> HeightfieldBounds {
        HeightfieldBounds {
            origin: Vec3::new(100.0, 0.0, 50.0),
            size: Vec3::new(20.0, 5.0, 10.0),
        }
    }

    #[test]
    fn test_second_lookup_is_identical_and_does_not_sample() {
        let plane = build_plane(6, 6);
        let mut cache = HeightfieldCache::new();
        let mut samples = 0;

        let first = cache
            .get_or_build(HeightfieldId(1), &bounds(), |xz| {
                samples += 1;
                xz.x * 0.01
            }, &plane)
            .clone();
        assert_eq!(samples, 36);

        let second = cache.get_or_build(HeightfieldId(1), &bounds(), |_| {
            samples += 1;
            0.0
        }, &plane);
        assert_eq!(samples, 36);
        assert_eq!(first.positions(), second.positions());
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, evictions: 0 });
    }

    #[test]
    fn test_samples_in_world_space() {
        let plane = build_plane(3, 3);
        let mut seen = Vec::new();
        let mesh = build_heightfield_mesh(&bounds(), |xz| {
            seen.push(xz);
            2.0
        }, &plane);

        assert_eq!(seen.first(), Some(&Vec2::new(100.0, 50.0)));
        assert_eq!(seen.last(), Some(&Vec2::new(120.0, 60.0)));
        assert_relative_eq!(mesh.bounds().min, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(mesh.bounds().max, Vec3::new(20.0, 2.0, 10.0), epsilon = 1e-5);
        assert!(mesh.same_topology(&plane));
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let plane = build_plane(2, 2);
        let mut cache = HeightfieldCache::with_capacity(2);

        cache.get_or_build(HeightfieldId(1), &bounds(), |_| 0.0, &plane);
        cache.get_or_build(HeightfieldId(2), &bounds(), |_| 0.0, &plane);
        cache.get_or_build(HeightfieldId(1), &bounds(), |_| 0.0, &plane);
        cache.get_or_build(HeightfieldId(3), &bounds(), |_| 0.0, &plane);

        assert!(cache.contains(HeightfieldId(1)));
        assert!(!cache.contains(HeightfieldId(2)));
        assert!(cache.contains(HeightfieldId(3)));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let plane = build_plane(2, 2);
        let mut cache = HeightfieldCache::new();

        cache.get_or_build(HeightfieldId(4), &bounds(), |_| 1.0, &plane);
        assert!(cache.invalidate(HeightfieldId(4)));
        assert!(!cache.invalidate(HeightfieldId(4)));

        let rebuilt = cache.get_or_build(HeightfieldId(4), &bounds(), |_| 3.0, &plane);
        assert_relative_eq!(rebuilt.bounds().max.y, 3.0);
        assert_eq!(cache.stats().misses, 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
