//! # Collider View
//!
//! Live wireframe visualization of collision volumes for debugging.
//!
//! Every frame the visualizer queries the host's collision world around an
//! observer, builds or reuses a mesh matching each nearby collider's shape
//! and hands it to the host renderer with a translucent per-kind material.
//!
//! ## Features
//!
//! - **Canonical Meshes**: plane, box, UV-sphere and capped cylinder built once
//! - **Shape Adaptation**: boxes, spheres and capsules fitted per instance
//! - **Heightfield Cache**: terrain meshes sampled once per heightfield
//! - **Deferred Release**: pooled per-frame meshes with buffer recycling
//! - **Configuration**: TOML and RON config files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collider_view::prelude::*;
//!
//! let mut registry = ColliderRegistry::new();
//! registry.insert(ShapeDescriptor::new(
//!     ColliderShape::Sphere { radius: 1.0 },
//!     &Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
//! ));
//!
//! let mut session = DebugSession::new(VisualizerConfig::default());
//! let mut queue = DrawQueue::new();
//! let mut clock = FrameClock::new();
//!
//! clock.advance(1.0 / 60.0);
//! session.update(Some(Vec3::zeros()), &registry, &mut queue, clock.now());
//! assert_eq!(queue.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod render;
pub mod physics;
pub mod spatial;
pub mod debug;

/// Common imports for visualizer users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, TriggerFilter, VisualizerConfig},
        debug::{CollisionVisualizer, DebugInput, DebugSession, FrameStats, NameLabel},
        foundation::{
            math::{Aabb, Mat4, Quat, Transform, Vec2, Vec3, Vec4},
            time::FrameClock,
        },
        physics::{CapsuleAxis, ColliderShape, HeightfieldBounds, HeightfieldId, ShapeDescriptor},
        render::{DebugRenderer, DrawQueue, DrawSubmission, MaterialKind, Mesh, MeshSource},
        spatial::{ColliderRegistry, CollisionWorld, EntityHandle},
    };
}
