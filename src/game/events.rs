//! Game Events
//!
//! Milestones a tick can produce, for the surrounding loop to log,
//! persist, or react to. The engine itself never consumes them.

use serde::{Serialize, Deserialize};

/// Event data generated during a tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The engine switched modes.
    ModeChanged {
        /// Name of the mode left.
        from: String,
        /// Name of the mode entered.
        to: String,
    },

    /// The maze goal cell was reached.
    MazeSolved {
        /// Legal moves it took.
        moves: u32,
    },

    /// The solve beat the previous best score.
    NewBestScore {
        /// The new best move count.
        moves: u32,
    },
}
