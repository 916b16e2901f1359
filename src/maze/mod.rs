//! Maze Engine
//!
//! Spanning-tree maze generation over a wall grid, plus the navigator
//! that validates and animates movement through it.
//!
//! - `grid`: 2-bit wall encoding, randomized depth-first generation,
//!   movement legality
//! - `navigator`: move queue, glide animation, goal detection

pub mod grid;
pub mod navigator;

// Re-export key types
pub use grid::{MazeGrid, MazeError, Direction, WALL_SOUTH, WALL_EAST};
pub use navigator::{MazeNavigator, NavTick, GLIDE_STEP};
