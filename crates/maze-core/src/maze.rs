//! Maze Grid
//!
//! Perfect-maze generation and queries over the wall graph. Every level owns
//! one `MazeGrid`, generated once from a deterministic seed and read-only
//! afterwards; the pursuer, the wanderers, and collision resolution all
//! query the same grid each tick.

use std::collections::VecDeque;

use bevy_ecs::prelude::*;
use rand::Rng;
use thiserror::Error;

/// Errors from maze construction and cell queries.
///
/// Both variants are contract violations on the caller's side; per-tick code
/// never produces them because it derives cells from clamped positions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("cell ({x}, {y}) is out of bounds for a {width}x{height} maze")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// One of the four cardinal wall directions.
///
/// North is toward negative y; y grows southward, matching the row-major
/// cell layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

/// Fixed expansion order for every neighbor walk in this crate. BFS results
/// (and therefore placement tie-breaks) are only reproducible because this
/// order never changes.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// The direction faced by the matching wall of the adjacent cell
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Integer grid coordinates of one maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
}

impl CellCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// One grid unit with four wall flags (true = wall present)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Cell {
    fn sealed() -> Self {
        Self {
            north: true,
            east: true,
            south: true,
            west: true,
        }
    }

    /// Is there a wall on the given side?
    pub fn has_wall(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    fn open(&mut self, dir: Direction) {
        match dir {
            Direction::North => self.north = false,
            Direction::East => self.east = false,
            Direction::South => self.south = false,
            Direction::West => self.west = false,
        }
    }
}

/// A generated perfect maze: the wall graph forms a spanning tree over all
/// cells, so exactly one simple path connects any two cells.
///
/// Immutable after generation; shared read-only by every agent query within
/// a tick.
#[derive(Resource, Debug, Clone)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl MazeGrid {
    /// Carve a perfect maze with iterative randomized depth-first search.
    ///
    /// Starts from a random cell, repeatedly knocks the wall toward a random
    /// unvisited neighbor of the stack top, and backtracks when none remain.
    /// A given RNG state always reproduces an identical maze.
    pub fn generate(
        width: usize,
        height: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }

        let mut grid = Self {
            width,
            height,
            cells: vec![Cell::sealed(); width * height],
        };

        // Visited flags live only for the duration of the carve
        let mut visited = vec![false; width * height];
        let mut stack: Vec<CellCoord> = Vec::with_capacity(width * height);

        let start = CellCoord::new(rng.gen_range(0..width), rng.gen_range(0..height));
        visited[grid.index_of(start)] = true;
        stack.push(start);

        while let Some(&current) = stack.last() {
            let mut options: [Option<Direction>; 4] = [None; 4];
            let mut option_count = 0;
            for dir in DIRECTIONS {
                if let Some(next) = grid.neighbor_coord(current, dir) {
                    if !visited[grid.index_of(next)] {
                        options[option_count] = Some(dir);
                        option_count += 1;
                    }
                }
            }

            if option_count == 0 {
                stack.pop();
                continue;
            }

            let dir = options[rng.gen_range(0..option_count)]
                .unwrap_or(Direction::North);
            let next = grid
                .neighbor_coord(current, dir)
                .unwrap_or(current);

            let current_idx = grid.index_of(current);
            let next_idx = grid.index_of(next);
            grid.cells[current_idx].open(dir);
            grid.cells[next_idx].open(dir.opposite());

            visited[next_idx] = true;
            stack.push(next);
        }

        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Does the grid contain these coordinates?
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Look up a cell, failing explicitly on out-of-bounds coordinates
    pub fn cell(&self, x: usize, y: usize) -> Result<&Cell, MazeError> {
        if !self.contains(x, y) {
            return Err(MazeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(&self.cells[y * self.width + x])
    }

    /// Row-major index of a coordinate known to be in bounds
    pub(crate) fn index_of(&self, coord: CellCoord) -> usize {
        coord.y * self.width + coord.x
    }

    /// The adjacent coordinate in `dir`, if it stays on the grid
    fn neighbor_coord(&self, coord: CellCoord, dir: Direction) -> Option<CellCoord> {
        let (dx, dy) = dir.delta();
        let x = coord.x.checked_add_signed(dx)?;
        let y = coord.y.checked_add_signed(dy)?;
        if x < self.width && y < self.height {
            Some(CellCoord::new(x, y))
        } else {
            None
        }
    }

    /// Neighbors reachable through open walls, in fixed N,E,S,W order.
    /// `None` where a wall or the grid edge blocks the way.
    pub fn open_neighbors(&self, coord: CellCoord) -> [Option<CellCoord>; 4] {
        let cell = self.cells[self.index_of(coord)];
        let mut out = [None; 4];
        for (slot, dir) in out.iter_mut().zip(DIRECTIONS) {
            if !cell.has_wall(dir) {
                *slot = self.neighbor_coord(coord, dir);
            }
        }
        out
    }

    /// Full BFS from the given cell, returning the deepest reachable cell
    /// and its depth. Ties break to the first cell discovered in BFS order,
    /// which placement code relies on for reproducible exits and spawns.
    pub fn farthest_from(&self, x: usize, y: usize) -> Result<(CellCoord, u32), MazeError> {
        if !self.contains(x, y) {
            return Err(MazeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let start = CellCoord::new(x, y);
        let mut dist = vec![-1i32; self.cell_count()];
        let mut queue = VecDeque::new();
        dist[self.index_of(start)] = 0;
        queue.push_back(start);

        let mut best = start;
        let mut best_depth = 0u32;

        while let Some(current) = queue.pop_front() {
            let depth = dist[self.index_of(current)] as u32;
            if depth > best_depth {
                best_depth = depth;
                best = current;
            }

            for next in self.open_neighbors(current).into_iter().flatten() {
                let idx = self.index_of(next);
                if dist[idx] == -1 {
                    dist[idx] = depth as i32 + 1;
                    queue.push_back(next);
                }
            }
        }

        Ok((best, best_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn maze(width: usize, height: usize, seed: u64) -> MazeGrid {
        let mut rng = SmallRng::seed_from_u64(seed);
        MazeGrid::generate(width, height, &mut rng).expect("valid dimensions")
    }

    /// Count of open (wall-absent) edges, each counted once
    fn open_edge_count(grid: &MazeGrid) -> usize {
        let mut count = 0;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let cell = grid.cell(x, y).unwrap();
                if !cell.east {
                    count += 1;
                }
                if !cell.south {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            MazeGrid::generate(0, 5, &mut rng),
            Err(MazeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            MazeGrid::generate(5, 0, &mut rng),
            Err(MazeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_queries_fail_explicitly() {
        let grid = maze(4, 4, 7);
        assert!(matches!(
            grid.cell(4, 0),
            Err(MazeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.farthest_from(0, 4),
            Err(MazeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_spanning_tree_invariant() {
        // Connected and acyclic across a spread of sizes and seeds:
        // BFS reaches every cell and open edges number exactly w*h - 1.
        for (w, h, seed) in [(1, 1, 3), (5, 1, 9), (1, 8, 11), (10, 10, 42), (16, 12, 1234)] {
            let grid = maze(w, h, seed);
            assert_eq!(open_edge_count(&grid), w * h - 1, "{}x{} seed {}", w, h, seed);

            let mut seen = vec![false; grid.cell_count()];
            let mut queue = VecDeque::from([CellCoord::new(0, 0)]);
            seen[0] = true;
            let mut reached = 1;
            while let Some(c) = queue.pop_front() {
                for n in grid.open_neighbors(c).into_iter().flatten() {
                    let idx = grid.index_of(n);
                    if !seen[idx] {
                        seen[idx] = true;
                        reached += 1;
                        queue.push_back(n);
                    }
                }
            }
            assert_eq!(reached, w * h, "all cells reachable from (0,0)");
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = maze(12, 12, 99);
        let b = maze(12, 12, 99);
        for y in 0..12 {
            for x in 0..12 {
                assert_eq!(a.cell(x, y).unwrap(), b.cell(x, y).unwrap());
            }
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = maze(10, 10, 1);
        let b = maze(10, 10, 2);
        let same = (0..10)
            .flat_map(|y| (0..10).map(move |x| (x, y)))
            .all(|(x, y)| a.cell(x, y).unwrap() == b.cell(x, y).unwrap());
        assert!(!same, "distinct seeds should carve distinct mazes");
    }

    #[test]
    fn test_farthest_matches_brute_force() {
        let grid = maze(9, 7, 314);

        // Brute-force eccentricity: max BFS depth over all cells
        let (far, depth) = grid.farthest_from(0, 0).unwrap();
        let mut dist = vec![-1i32; grid.cell_count()];
        let mut queue = VecDeque::from([CellCoord::new(0, 0)]);
        dist[0] = 0;
        let mut max_depth = 0;
        while let Some(c) = queue.pop_front() {
            let d = dist[grid.index_of(c)];
            max_depth = max_depth.max(d);
            for n in grid.open_neighbors(c).into_iter().flatten() {
                let idx = grid.index_of(n);
                if dist[idx] == -1 {
                    dist[idx] = d + 1;
                    queue.push_back(n);
                }
            }
        }
        assert_eq!(depth as i32, max_depth);
        assert_eq!(dist[grid.index_of(far)], max_depth);
    }

    #[test]
    fn test_farthest_on_single_cell() {
        let grid = maze(1, 1, 5);
        let (far, depth) = grid.farthest_from(0, 0).unwrap();
        assert_eq!(far, CellCoord::new(0, 0));
        assert_eq!(depth, 0);
    }
}
