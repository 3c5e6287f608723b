//! Wall collision and hit-scan queries for Breach.

pub mod collision;
pub mod raycast;

pub use collision::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;
