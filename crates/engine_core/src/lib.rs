//! Core engine types and utilities for Breach.
//!
//! This crate provides the foundational types used across all gameplay systems:
//! - Transform and orientation helpers
//! - Time management and per-entity scheduled events
//! - Common component types for the enemy roster

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
