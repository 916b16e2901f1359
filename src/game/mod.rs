//! Game Logic Module
//!
//! The tick-driven engine on top of the canvas, codec and maze layers.
//!
//! ## Module Structure
//!
//! - `input`: one command per tick from the external input collector
//! - `mode`: tagged-variant mode state (shuffle / marquee / crawl / maze)
//! - `state`: the session-owned canvas, RNG and best score
//! - `tick`: the per-tick pipeline (input, one delta, XOR, serialize)
//! - `events`: milestones for the surrounding loop

pub mod input;
pub mod mode;
pub mod state;
pub mod tick;
pub mod events;

// Re-export key types
pub use input::{Command, InputFrame};
pub use mode::{Mode, TextScroll};
pub use state::GameState;
pub use tick::{tick, splash, GameError, TickResult};
pub use events::GameEvent;
