//! Level Construction
//!
//! Builds a fresh ECS world for one level: the maze, the placement layout,
//! and the spawned agents.

pub mod level;

pub use level::{build_level, level_seed};
