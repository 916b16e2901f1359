//! Maze Navigator
//!
//! Owns the wall grid plus the player: a target cell, a continuous visual
//! position gliding toward it, a move counter, and a FIFO queue of pending
//! directional inputs. The queue is only consumed once the glide has
//! caught up with the target cell, which throttles input to the animation
//! rate without dropping keystrokes.

use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, FIXED_ONE};
use crate::core::vec2::FixedVec2;
use super::grid::{Direction, MazeGrid};

/// Glide speed: a quarter cell per tick, so one cell takes four ticks
/// and the visual position lands on cell centers exactly.
pub const GLIDE_STEP: Fixed = FIXED_ONE / 4;

/// Outcome of one navigator tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavTick {
    /// A queued move was consumed and was legal.
    pub stepped: bool,
    /// The target cell is the goal cell.
    pub solved: bool,
}

/// Player state over an immutable wall grid.
///
/// Created together with its grid when a maze session starts and dropped
/// with it when the session ends.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MazeNavigator {
    grid: MazeGrid,
    cell: (u32, u32),
    visual: FixedVec2,
    moves: u32,
    queue: VecDeque<Direction>,
}

impl MazeNavigator {
    /// Start a session at the grid's generation start cell.
    pub fn new(grid: MazeGrid) -> Self {
        let cell = grid.start();
        Self {
            visual: FixedVec2::from_ints(cell.0 as i32, cell.1 as i32),
            cell,
            grid,
            moves: 0,
            queue: VecDeque::new(),
        }
    }

    /// Queue a directional input. Unbounded FIFO.
    pub fn enqueue(&mut self, direction: Direction) {
        self.queue.push_back(direction);
    }

    /// Advance one tick.
    ///
    /// Mid-transit: glide one step toward the target, leave the queue
    /// alone. At the target with inputs pending: pop the front move and
    /// check it against the walls. Illegal moves are discarded silently -
    /// no retarget, no counter change. Legal moves retarget the neighbour
    /// cell and bump the move counter.
    pub fn tick(&mut self) -> NavTick {
        if self.in_transit() {
            self.visual = self.visual.step_toward(self.target_position(), GLIDE_STEP);
            return NavTick {
                stepped: false,
                solved: self.is_solved(),
            };
        }

        let mut stepped = false;
        if let Some(dir) = self.queue.pop_front() {
            if self.grid.can_move(self.cell.0, self.cell.1, dir) {
                if let Some(next) =
                    dir.step(self.cell.0, self.cell.1, self.grid.width(), self.grid.height())
                {
                    self.cell = next;
                    self.moves += 1;
                    stepped = true;
                }
            }
        }

        NavTick {
            stepped,
            solved: self.is_solved(),
        }
    }

    /// Whether the target cell is the goal cell (the far corner).
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.cell == self.grid.goal()
    }

    /// Whether the visual position is still gliding toward the target.
    #[inline]
    pub fn in_transit(&self) -> bool {
        self.visual != self.target_position()
    }

    /// Current target cell.
    #[inline]
    pub fn cell(&self) -> (u32, u32) {
        self.cell
    }

    /// Continuous visual position, in cell units. Renderers center the
    /// camera here.
    #[inline]
    pub fn visual(&self) -> FixedVec2 {
        self.visual
    }

    /// Legal moves taken so far.
    #[inline]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Pending queued inputs.
    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The wall grid, read-only for renderers.
    #[inline]
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    #[inline]
    fn target_position(&self) -> FixedVec2 {
        FixedVec2::from_ints(self.cell.0 as i32, self.cell.1 as i32)
    }
}

// =============================================================================
// TESTS
// =============================================================================
