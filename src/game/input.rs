//! Input Frames
//!
//! The external input collector hands the engine at most one command per
//! logical tick. Mapping keys to commands is the integration's business;
//! the engine only sees the result.

use serde::{Serialize, Deserialize};

use crate::maze::grid::Direction;

/// A single player command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Queue a maze move.
    Move(Direction),
    /// Start a maze session.
    Play,
    /// Restart the line shuffle.
    Shuffle,
    /// Show the help marquee.
    Help,
    /// Show the explanation crawl.
    Credits,
    /// Back to the title marquee.
    Menu,
}

/// Input state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// The command issued this tick, if any.
    pub command: Option<Command>,
}

impl InputFrame {
    /// A frame with no input.
    pub const fn idle() -> Self {
        Self { command: None }
    }

    /// A frame carrying one command.
    pub const fn with_command(command: Command) -> Self {
        Self {
            command: Some(command),
        }
    }

    /// Check if this is an idle frame.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.command.is_none()
    }
}

// =============================================================================
// TESTS
// =============================================================================
