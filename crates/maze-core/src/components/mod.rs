//! ECS Components and Resources
//!
//! Per-agent components and the shared per-level resources.

pub mod agent;
pub mod world;

pub use agent::{Heading, LookDir, MotionState, Position, Pursuer, WanderState, Wanderer};
pub use world::{LevelLayout, LevelSpec, PlayerState, StorySignals, TickEvents, WorldClock};
