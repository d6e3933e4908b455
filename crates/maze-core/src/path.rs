//! Path Finding
//!
//! Breadth-first next-step queries over the maze wall graph. The pursuer and
//! every wanderer share these functions; agents re-query on a fixed cadence
//! rather than every tick, so a query must be cheap but not free.

use std::collections::VecDeque;

use crate::maze::{CellCoord, MazeGrid};

/// The single next cell on the shortest path from `from` toward `to`.
///
/// Expands neighbors in the fixed N,E,S,W order so the frontier, and any
/// tie-break, is reproducible for a fixed maze. The search exits early once
/// `to` is dequeued; because the maze is a tree, the early exit cannot
/// change the result.
///
/// If `to` equals `from`, or is out of bounds, or is unreachable (which the
/// spanning-tree invariant should rule out), returns `from` unchanged - the
/// caller holds position for the tick instead of crashing.
pub fn next_step(grid: &MazeGrid, from: CellCoord, to: CellCoord) -> CellCoord {
    if from == to {
        return from;
    }
    if !grid.contains(from.x, from.y) || !grid.contains(to.x, to.y) {
        tracing::warn!(?from, ?to, "path query off the grid; holding position");
        return from;
    }

    let start = grid.index_of(from);
    let goal = grid.index_of(to);

    // Predecessor per visited cell; usize::MAX marks unvisited
    let mut prev = vec![usize::MAX; grid.cell_count()];
    let mut queue = VecDeque::new();
    prev[start] = start;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        let current_idx = grid.index_of(current);
        if current_idx == goal {
            break;
        }
        for next in grid.open_neighbors(current).into_iter().flatten() {
            let idx = grid.index_of(next);
            if prev[idx] == usize::MAX {
                prev[idx] = current_idx;
                queue.push_back(next);
            }
        }
    }

    if prev[goal] == usize::MAX {
        tracing::warn!(?from, ?to, "goal unreachable; holding position");
        return from;
    }

    // Walk predecessor links back until the node whose predecessor is `from`
    let mut cursor = goal;
    while prev[cursor] != start {
        cursor = prev[cursor];
    }
    CellCoord::new(cursor % grid.width(), cursor / grid.width())
}

/// Shortest-path length between two cells, or `None` when unreachable.
/// Used by placement code and tests; per-tick motion only needs `next_step`.
pub fn path_distance(grid: &MazeGrid, from: CellCoord, to: CellCoord) -> Option<u32> {
    if !grid.contains(from.x, from.y) || !grid.contains(to.x, to.y) {
        return None;
    }
    if from == to {
        return Some(0);
    }

    let goal = grid.index_of(to);
    let mut dist = vec![-1i32; grid.cell_count()];
    let mut queue = VecDeque::new();
    dist[grid.index_of(from)] = 0;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        let idx = grid.index_of(current);
        if idx == goal {
            return Some(dist[idx] as u32);
        }
        for next in grid.open_neighbors(current).into_iter().flatten() {
            let next_idx = grid.index_of(next);
            if dist[next_idx] == -1 {
                dist[next_idx] = dist[idx] + 1;
                queue.push_back(next);
            }
        }
    }

    None
}
