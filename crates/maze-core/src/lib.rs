//! Maze Pursuit Simulation Core
//!
//! Headless game core for a seeded maze-horror run: a perfect maze, one
//! adaptive pursuer, ambient wanderers, and a smoothed tension scalar. The
//! host owns rendering and the player; this crate owns everything that
//! happens between `step` calls.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod collision;
pub mod components;
pub mod config;
pub mod maze;
pub mod output;
pub mod path;
pub mod setup;
pub mod simulation;
pub mod systems;
pub mod tension;

pub use components::*;
pub use config::{SimConfig, DEFAULT_TUNING_PATH};
pub use maze::{Cell, CellCoord, Direction, MazeError, MazeGrid};
pub use output::{RunTrace, TickReport};
pub use path::{next_step, path_distance};
pub use setup::{build_level, level_seed};
pub use simulation::{PlayerUpdate, Simulation};
pub use tension::{smoothstep_falloff, TensionState, ThreatObservation};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
