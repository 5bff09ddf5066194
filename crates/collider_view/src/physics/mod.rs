//! Physics-side data the visualizer reads
//!
//! The visualizer never simulates anything. It only consumes read-only
//! snapshots of collider shapes provided by the host collision system.

pub mod collision;

pub use collision::{
    CapsuleAxis, ColliderFlags, ColliderShape, HeightfieldBounds, HeightfieldId, ShapeDescriptor, ShapeKind,
};
