//! Core types shared by the pod interior crates.
//!
//! This crate provides the foundational types used across the workspace:
//! - Local transforms and typed identities
//! - Frame phase ordering
//! - An in-memory scene hierarchy for headless hosts

pub mod ids;
pub mod scene;
pub mod time;
pub mod transform;

pub use ids::*;
pub use scene::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3, Vec4};
pub use hecs::Entity;
