//! Collision Resolution
//!
//! Per-cell axis clamping against the wall flags of the containing cell.
//! Correct only because walls are axis-aligned and coincident with the grid,
//! and because callers integrate less than one cell of travel per tick.

use crate::components::agent::Position;
use crate::maze::MazeGrid;

/// Clamp a continuous position against the walls of its containing cell.
///
/// Positions outside the grid entirely are clamped to the world bounds
/// minus `radius`; otherwise each present wall pushes the position back
/// across its boundary by `radius` where it has crossed.
pub fn resolve_collision(pos: &mut Position, grid: &MazeGrid, cell_size: f32, radius: f32) {
    let gx = (pos.x / cell_size).floor();
    let gz = (pos.z / cell_size).floor();
    let width = grid.width() as f32 * cell_size;
    let height = grid.height() as f32 * cell_size;

    if gx < 0.0 || gz < 0.0 || gx >= grid.width() as f32 || gz >= grid.height() as f32 {
        pos.x = pos.x.clamp(radius, width - radius);
        pos.z = pos.z.clamp(radius, height - radius);
        return;
    }

    let cx = gx as usize;
    let cz = gz as usize;
    // In bounds by the check above
    let Ok(cell) = grid.cell(cx, cz) else {
        return;
    };

    let min_x = cx as f32 * cell_size;
    let min_z = cz as f32 * cell_size;
    let max_x = min_x + cell_size;
    let max_z = min_z + cell_size;

    if cell.west && pos.x < min_x + radius {
        pos.x = min_x + radius;
    }
    if cell.east && pos.x > max_x - radius {
        pos.x = max_x - radius;
    }
    if cell.north && pos.z < min_z + radius {
        pos.z = min_z + radius;
    }
    if cell.south && pos.z > max_z - radius {
        pos.z = max_z - radius;
    }
}
