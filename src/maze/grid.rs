//! Maze Wall Grid and Generation
//!
//! Each cell carries a 2-bit code: bit 0 is the south (bottom) wall, bit 1
//! the east (right) wall, 1 meaning wall and 0 an open passage. The north
//! and west sides of a cell belong to its neighbours; the grid's outer
//! boundary is never stored and never opened.
//!
//! Generation is a randomized iterative depth-first walk with explicit
//! backtracking. The opened walls always form a spanning tree over the
//! cells: connected, exactly `w * h - 1` open edges, no cycles, a unique
//! path between any two cells.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;

/// South (bottom) wall bit.
pub const WALL_SOUTH: u8 = 0b01;

/// East (right) wall bit.
pub const WALL_EAST: u8 = 0b10;

/// Maze errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// Grids need at least one cell.
    #[error("maze dimensions must be at least 1x1, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// A cardinal unit move.
///
/// Y grows southward, matching canvas row order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// -y
    North,
    /// +y
    South,
    /// +x
    East,
    /// -x
    West,
}

impl Direction {
    /// All four moves, in the order generation enumerates them.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit step as (dx, dy).
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Neighbour of (x, y) in this direction, `None` if it leaves a
    /// `width` x `height` grid.
    pub fn step(self, x: u32, y: u32, width: u32, height: u32) -> Option<(u32, u32)> {
        let (dx, dy) = self.delta();
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx >= 0 && ny >= 0 && (nx as u32) < width && (ny as u32) < height {
            Some((nx as u32, ny as u32))
        } else {
            None
        }
    }
}

/// Immutable wall grid produced by [`MazeGrid::generate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
    start: (u32, u32),
}

impl MazeGrid {
    /// Carve a maze over a `width` x `height` grid.
    ///
    /// Randomized iterative depth-first search: a path stack holds the
    /// current walk, an archive holds cells with no candidates left. Each
    /// round enumerates the in-bounds neighbour moves of the stack top,
    /// discards targets already on the stack or archived, and either
    /// backtracks (no candidate) or opens the one separating wall and
    /// walks on. The walk starts at a uniformly random cell and ends when
    /// the stack empties, at which point every cell has been archived.
    pub fn generate(
        width: u32,
        height: u32,
        rng: &mut DeterministicRng,
    ) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }

        let len = width as usize * height as usize;
        let mut cells = vec![WALL_SOUTH | WALL_EAST; len];
        let mut on_stack = vec![false; len];
        let mut archived = vec![false; len];

        let start = (rng.next_int(width), rng.next_int(height));
        let mut stack = vec![start];
        on_stack[cell_index(width, start.0, start.1)] = true;

        while let Some(&(cx, cy)) = stack.last() {
            let mut candidates: Vec<(u32, u32, Direction)> = Vec::with_capacity(4);
            for dir in Direction::ALL {
                if let Some((nx, ny)) = dir.step(cx, cy, width, height) {
                    let idx = cell_index(width, nx, ny);
                    if !on_stack[idx] && !archived[idx] {
                        candidates.push((nx, ny, dir));
                    }
                }
            }

            match rng.choose(&candidates) {
                None => {
                    // Exhausted: retire the walk's top cell to the archive
                    stack.pop();
                    let idx = cell_index(width, cx, cy);
                    on_stack[idx] = false;
                    archived[idx] = true;
                }
                Some(&(nx, ny, dir)) => {
                    // Open the one wall between current and target. The
                    // wall lives on whichever of the two cells owns it.
                    match dir {
                        Direction::South => cells[cell_index(width, cx, cy)] &= !WALL_SOUTH,
                        Direction::North => cells[cell_index(width, nx, ny)] &= !WALL_SOUTH,
                        Direction::East => cells[cell_index(width, cx, cy)] &= !WALL_EAST,
                        Direction::West => cells[cell_index(width, nx, ny)] &= !WALL_EAST,
                    }
                    stack.push((nx, ny));
                    on_stack[cell_index(width, nx, ny)] = true;
                }
            }
        }

        Ok(Self {
            width,
            height,
            cells,
            start,
        })
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell the generation walk started from.
    #[inline]
    pub fn start(&self) -> (u32, u32) {
        self.start
    }

    /// Goal cell: the far corner.
    #[inline]
    pub fn goal(&self) -> (u32, u32) {
        (self.width - 1, self.height - 1)
    }

    /// Raw 2-bit wall code of a cell, `None` outside the grid.
    /// Read-only view for renderers.
    #[inline]
    pub fn cell(&self, x: u32, y: u32) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.cells[cell_index(self.width, x, y)])
        } else {
            None
        }
    }

    /// Whether the south wall of (x, y) is present.
    /// Everything outside the grid counts as wall.
    #[inline]
    pub fn wall_south(&self, x: u32, y: u32) -> bool {
        self.cell(x, y).map_or(true, |c| c & WALL_SOUTH != 0)
    }

    /// Whether the east wall of (x, y) is present.
    /// Everything outside the grid counts as wall.
    #[inline]
    pub fn wall_east(&self, x: u32, y: u32) -> bool {
        self.cell(x, y).map_or(true, |c| c & WALL_EAST != 0)
    }

    /// Whether a move from (x, y) is legal: the separating wall must be
    /// open and the target must stay on the grid. Moves west and north
    /// check the neighbour's wall, since that cell owns it.
    pub fn can_move(&self, x: u32, y: u32, dir: Direction) -> bool {
        match dir.step(x, y, self.width, self.height) {
            None => false,
            Some((nx, ny)) => match dir {
                Direction::East => !self.wall_east(x, y),
                Direction::South => !self.wall_south(x, y),
                Direction::West => !self.wall_east(nx, ny),
                Direction::North => !self.wall_south(nx, ny),
            },
        }
    }

    /// Number of opened interior walls. A spanning tree has exactly
    /// `width * height - 1`.
    pub fn open_edge_count(&self) -> usize {
        let mut count = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                if x + 1 < self.width && !self.wall_east(x, y) {
                    count += 1;
                }
                if y + 1 < self.height && !self.wall_south(x, y) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Test-only constructor with hand-built walls.
    #[cfg(test)]
    pub(crate) fn from_parts(width: u32, height: u32, cells: Vec<u8>, start: (u32, u32)) -> Self {
        assert_eq!(cells.len(), width as usize * height as usize);
        Self {
            width,
            height,
            cells,
            start,
        }
    }
}

#[inline]
fn cell_index(width: u32, x: u32, y: u32) -> usize {
    x as usize + width as usize * y as usize
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Cells reachable from (0, 0) through open walls.
    fn reachable_count(grid: &MazeGrid) -> usize {
        let len = grid.width() as usize * grid.height() as usize;
        let mut seen = vec![false; len];
        let mut frontier = vec![(0u32, 0u32)];
        seen[0] = true;
        let mut count = 1;

        while let Some((x, y)) = frontier.pop() {
            for dir in Direction::ALL {
                if grid.can_move(x, y, dir) {
                    if let Some((nx, ny)) = dir.step(x, y, grid.width(), grid.height()) {
                        let idx = nx as usize + grid.width() as usize * ny as usize;
                        if !seen[idx] {
                            seen[idx] = true;
                            count += 1;
                            frontier.push((nx, ny));
                        }
                    }
                }
            }
        }
        count
    }

    #[test]
    fn test_spanning_tree_property() {
        // Connected + exactly n-1 open edges implies acyclic, so these
        // two checks cover the whole invariant.
        for (w, h) in [(1, 1), (2, 2), (3, 3), (20, 20), (3, 5), (35, 35)] {
            let mut rng = DeterministicRng::new(w as u64 * 1000 + h as u64);
            let grid = MazeGrid::generate(w, h, &mut rng).unwrap();
            let n = w as usize * h as usize;

            assert_eq!(grid.open_edge_count(), n - 1, "{w}x{h}: wrong edge count");
            assert_eq!(reachable_count(&grid), n, "{w}x{h}: not connected");
        }
    }

    #[test]
    fn test_one_by_one_has_no_open_walls() {
        let mut rng = DeterministicRng::new(7);
        let grid = MazeGrid::generate(1, 1, &mut rng).unwrap();

        assert_eq!(grid.cell(0, 0), Some(WALL_SOUTH | WALL_EAST));
        assert_eq!(grid.open_edge_count(), 0);
        assert_eq!(grid.start(), (0, 0));
        assert_eq!(grid.goal(), (0, 0));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut rng1 = DeterministicRng::new(2024);
        let mut rng2 = DeterministicRng::new(2024);

        let grid1 = MazeGrid::generate(15, 11, &mut rng1).unwrap();
        let grid2 = MazeGrid::generate(15, 11, &mut rng2).unwrap();
        assert_eq!(grid1, grid2);

        let mut rng3 = DeterministicRng::new(2025);
        let grid3 = MazeGrid::generate(15, 11, &mut rng3).unwrap();
        assert_ne!(grid1, grid3);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut rng = DeterministicRng::new(1);
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
    fn test_boundary_moves_always_illegal() {
        let mut rng = DeterministicRng::new(3);
        let grid = MazeGrid::generate(4, 4, &mut rng).unwrap();

        for x in 0..4 {
            assert!(!grid.can_move(x, 0, Direction::North));
            assert!(!grid.can_move(x, 3, Direction::South));
        }
        for y in 0..4 {
            assert!(!grid.can_move(0, y, Direction::West));
            assert!(!grid.can_move(3, y, Direction::East));
        }
    }

    #[test]
    fn test_can_move_matches_wall_bits() {
        // 2x1 grid, wall between the cells open
        let grid = MazeGrid::from_parts(2, 1, vec![WALL_SOUTH, WALL_SOUTH | WALL_EAST], (0, 0));
        assert!(grid.can_move(0, 0, Direction::East));
        assert!(grid.can_move(1, 0, Direction::West));

        // Same grid with the wall closed
        let grid = MazeGrid::from_parts(
            2,
            1,
            vec![WALL_SOUTH | WALL_EAST, WALL_SOUTH | WALL_EAST],
            (0, 0),
        );
        assert!(!grid.can_move(0, 0, Direction::East));
        assert!(!grid.can_move(1, 0, Direction::West));
    }

    #[test]
    fn test_direction_step() {
        assert_eq!(Direction::East.step(0, 0, 2, 2), Some((1, 0)));
        assert_eq!(Direction::South.step(0, 0, 2, 2), Some((0, 1)));
        assert_eq!(Direction::North.step(0, 0, 2, 2), None);
        assert_eq!(Direction::West.step(0, 0, 2, 2), None);
        assert_eq!(Direction::East.step(1, 0, 2, 2), None);
    }
}
