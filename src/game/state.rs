//! Engine State
//!
//! Everything a session owns: the persistent canvas accumulator, the
//! current mode, the seeded RNG, and best-score bookkeeping. The canvas
//! is a plain field passed explicitly to codecs and the serializer -
//! never shared, never global - so each tick's single XOR is the only
//! mutation it ever sees.

use serde::{Serialize, Deserialize};

use crate::core::canvas::PackedCanvas;
use crate::core::rng::DeterministicRng;
use crate::{CANVAS_WIDTH, CANVAS_HEIGHT};
use super::mode::Mode;

/// Lines drawn by the opening shuffle before the title appears.
pub const SHUFFLE_TARGET: u32 = 600;

/// Lines drawn by a player-requested re-shuffle.
pub const RESHUFFLE_TARGET: u32 = 500;

/// Maze session grid size in cells.
pub const MAZE_SIZE: (u32, u32) = (35, 35);

/// Complete engine state for one visual session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// The persistent bit accumulator, XOR-mutated once per tick.
    pub canvas: PackedCanvas,

    /// Current mode and its state.
    pub mode: Mode,

    /// Session RNG (shuffle lines, maze layout).
    pub rng: DeterministicRng,

    /// Ticks elapsed this session.
    pub tick: u64,

    /// Fewest moves any maze has been solved in, if any.
    best_score: Option<u32>,
}

impl GameState {
    /// Start a session: blank canvas, opening shuffle.
    pub fn new(seed: u64) -> Self {
        Self {
            canvas: PackedCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            mode: Mode::Shuffle {
                drawn: 0,
                target: SHUFFLE_TARGET,
            },
            rng: DeterministicRng::new(seed),
            tick: 0,
            best_score: None,
        }
    }

    /// Seed the best score from the external persistence collaborator.
    pub fn with_best_score(mut self, best_score: Option<u32>) -> Self {
        self.best_score = best_score;
        self
    }

    /// Current best score (fewest solve moves), a plain integer for the
    /// persistence collaborator.
    #[inline]
    pub fn best_score(&self) -> Option<u32> {
        self.best_score
    }

    /// Record a solve; returns true if it beat the previous best.
    pub fn record_solve(&mut self, moves: u32) -> bool {
        match self.best_score {
            Some(best) if best <= moves => false,
            _ => {
                self.best_score = Some(moves);
                true
            }
        }
    }

    /// Wipe the accumulator (visual session reset).
    pub fn reset_canvas(&mut self) {
        self.canvas.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
