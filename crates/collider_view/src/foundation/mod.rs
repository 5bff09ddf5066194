//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and bounding volumes
//! - Frame time management
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
