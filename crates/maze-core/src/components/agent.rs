//! Agent Components
//!
//! Continuous-space state for the pursuer and the wanderers. An agent's
//! occupied cell is always derived from its position, never stored, so the
//! two cannot drift apart.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::maze::{CellCoord, MazeGrid};

/// Marker component for the adaptive antagonist; its path goal is always
/// the player's current cell
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Pursuer;

/// Marker component for ambient agents that path to random cells
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Wanderer;

/// Continuous position on the ground plane (x east, z south)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// The center of a maze cell in world units
    pub fn at_cell_center(cell: CellCoord, cell_size: f32) -> Self {
        Self {
            x: cell.x as f32 * cell_size + cell_size / 2.0,
            z: cell.y as f32 * cell_size + cell_size / 2.0,
        }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    /// The maze cell containing this position, clamped onto the grid.
    ///
    /// Positions can momentarily sit outside the grid (the collision pass
    /// pulls them back); the clamp keeps path queries well-defined anyway.
    pub fn cell(&self, grid: &MazeGrid, cell_size: f32) -> CellCoord {
        let x = ((self.x / cell_size).floor() as i64).clamp(0, grid.width() as i64 - 1);
        let y = ((self.z / cell_size).floor() as i64).clamp(0, grid.height() as i64 - 1);
        CellCoord::new(x as usize, y as usize)
    }
}

/// Facing around the vertical axis, radians; 0 looks toward negative z
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub yaw: f32,
}

impl Heading {
    /// Yaw that faces `from` toward `to`
    pub fn toward(from: Position, to: Position) -> Self {
        Self {
            yaw: (to.x - from.x).atan2(to.z - from.z),
        }
    }
}

/// A unit direction on the ground plane (the player's forward look)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookDir {
    pub x: f32,
    pub z: f32,
}

impl LookDir {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Normalize, falling back to "looking north" for degenerate input
    pub fn normalized(self) -> Self {
        let len = self.x.hypot(self.z);
        if len > f32::EPSILON {
            Self {
                x: self.x / len,
                z: self.z / len,
            }
        } else {
            Self { x: 0.0, z: -1.0 }
        }
    }

    /// Dot product with the unit vector from `from` to `to`; zero when the
    /// segment is degenerate
    pub fn alignment(self, from: Position, to: Position) -> f32 {
        let dx = to.x - from.x;
        let dz = to.z - from.z;
        let len = dx.hypot(dz);
        if len > f32::EPSILON {
            (self.x * dx + self.z * dz) / len
        } else {
            0.0
        }
    }
}

impl Default for LookDir {
    fn default() -> Self {
        Self { x: 0.0, z: -1.0 }
    }
}

/// Steering state shared by the pursuer and every wanderer.
///
/// `goal` is the far destination cell; `step` is the single next cell the
/// pathfinder last returned, re-queried when `repath_timer` runs out.
#[derive(Component, Debug, Clone, Copy)]
pub struct MotionState {
    /// Destination cell (the player's cell for the pursuer, a random cell
    /// for wanderers)
    pub goal: CellCoord,
    /// Next cell to move toward, from the last path query
    pub step: CellCoord,
    /// Seconds until the next path query; starts at zero so agents path on
    /// their first tick
    pub repath_timer: f32,
    /// Speed before narrative and tension modifiers, world units per second
    pub base_speed: f32,
}

impl MotionState {
    pub fn new(cell: CellCoord, base_speed: f32) -> Self {
        Self {
            goal: cell,
            step: cell,
            repath_timer: 0.0,
            base_speed,
        }
    }
}

/// Wanderer-only retarget clock; picks a fresh random goal cell when it
/// runs out, and freezes while the player is inside the stare radius
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct WanderState {
    pub retarget_timer: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_cell_center_round_trip() {
        let mut rng = SmallRng::seed_from_u64(8);
        let grid = MazeGrid::generate(6, 4, &mut rng).unwrap();
        for y in 0..4 {
            for x in 0..6 {
                let cell = CellCoord::new(x, y);
                let pos = Position::at_cell_center(cell, 3.2);
                assert_eq!(pos.cell(&grid, 3.2), cell);
            }
        }
    }

    #[test]
    fn test_cell_clamps_outside_positions() {
        let mut rng = SmallRng::seed_from_u64(8);
        let grid = MazeGrid::generate(5, 5, &mut rng).unwrap();
        let outside = Position::new(-2.0, 100.0);
        assert_eq!(outside.cell(&grid, 3.2), CellCoord::new(0, 4));
    }

    #[test]
    fn test_look_normalization_handles_zero() {
        let zero = LookDir::new(0.0, 0.0).normalized();
        assert!((zero.x.hypot(zero.z) - 1.0).abs() < 1e-6);

        let long = LookDir::new(3.0, -4.0).normalized();
        assert!((long.x.hypot(long.z) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_alignment_is_cosine() {
        let look = LookDir::new(0.0, 1.0);
        let from = Position::new(0.0, 0.0);
        // Directly along the look vector
        assert!((look.alignment(from, Position::new(0.0, 5.0)) - 1.0).abs() < 1e-6);
        // Behind
        assert!((look.alignment(from, Position::new(0.0, -5.0)) + 1.0).abs() < 1e-6);
        // Degenerate segment
        assert_eq!(look.alignment(from, from), 0.0);
    }
}
