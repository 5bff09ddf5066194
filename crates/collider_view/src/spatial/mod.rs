//! Spatial queries against the host collision world
//!
//! [`CollisionWorld`] is the seam between the visualizer and whatever owns
//! the colliders. [`ColliderRegistry`] is a brute-force in-memory
//! implementation for headless hosts and tests.

mod spatial_query;

pub use spatial_query::{ColliderRegistry, CollisionWorld, EntityHandle};
