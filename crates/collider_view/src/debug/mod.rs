//! Debug visualization of collision volumes
//!
//! [`CollisionVisualizer`] is the per-frame driver; [`DebugSession`] wraps it
//! with the configuration and input handling a host application needs.

pub mod adapter;
pub mod collision_debug;
pub mod heightfield_cache;
pub mod session;

#[cfg(test)]
mod tests;

pub use adapter::{adapt, adapt_into, AdaptedMesh};
pub use collision_debug::{CollisionVisualizer, FrameStats, NameLabel};
pub use heightfield_cache::{CacheStats, HeightfieldCache};
pub use session::{DebugInput, DebugSession};
