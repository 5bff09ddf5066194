//! Deferred release of ephemeral meshes
//!
//! Adapted meshes are submitted once and must outlive that frame's draw
//! call. The pool owns them until their expiry time passes, then moves their
//! buffers to a free list so the next adaptation can reuse the allocation.

use std::collections::VecDeque;

use log::trace;
use slotmap::{new_key_type, SlotMap};

use super::primitives::Mesh;

new_key_type! {
    /// Handle of one live ephemeral mesh
    pub struct MeshKey;
}

/// Recycled buffers kept around by default
pub const DEFAULT_FREE_LIMIT: usize = 256;

/// Owner of ephemeral meshes awaiting release
#[derive(Debug)]
pub struct MeshPool {
    live: SlotMap<MeshKey, Mesh>,
    expiries: VecDeque<(MeshKey, f32)>,
    free: Vec<Mesh>,
    free_limit: usize,
}

impl Default for MeshPool {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::with_free_limit(DEFAULT_FREE_LIMIT)
    }

    /// Create a pool keeping at most `free_limit` recycled buffers
    pub fn with_free_limit(free_limit: usize) -> Self {
        Self {
            live: SlotMap::with_key(),
            expiries: VecDeque::new(),
            free: Vec::new(),
            free_limit,
        }
    }

    /// Take a recycled mesh to adapt into, or a fresh empty one
    pub fn recycle(&mut self) -> Mesh {
        self.free.pop().unwrap_or_default()
    }

    /// Take ownership of a mesh until `expires_at`
    pub fn insert(&mut self, mesh: Mesh, expires_at: f32) -> MeshKey {
        let key = self.live.insert(mesh);
        self.expiries.push_back((key, expires_at));
        key
    }

    /// A live mesh
    pub fn get(&self, key: MeshKey) -> Option<&Mesh> {
        self.live.get(key)
    }

    /// Release every mesh whose expiry is at or before `now`
    ///
    /// Returns the number of meshes released.
    pub fn release_expired(&mut self, now: f32) -> usize {
        let before = self.live.len();
        let (live, free, free_limit) = (&mut self.live, &mut self.free, self.free_limit);

        self.expiries.retain(|&(key, expires_at)| {
            if expires_at > now {
                return true;
            }
            if let Some(mesh) = live.remove(key) {
                if free.len() < free_limit {
                    free.push(mesh);
                }
            }
            false
        });

        let released = before - self.live.len();
        if released > 0 {
            trace!("Released {} ephemeral meshes ({} still live)", released, self.live.len());
        }
        released
    }

    /// Number of meshes awaiting release
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of recycled buffers ready for reuse
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Drop every mesh immediately, live and recycled
    pub fn clear(&mut self) {
        self.live.clear();
        self.expiries.clear();
        self.free.clear();
    }
}
