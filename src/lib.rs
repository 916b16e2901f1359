//! # Xorcade Engine
//!
//! Deterministic core of a monochrome XOR-canvas game: every tick one
//! shape is drawn, converted to a bit mask, and XORed into a persistent
//! 200x150 accumulator that is then serialized for an external renderer.
//! A secondary mode generates and navigates a procedurally built maze.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       XORCADE ENGINE                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── canvas.rs   - Packed bit accumulator + serializer       │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  └── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │                                                              │
//! │  codec/          - Image to canvas-delta encoders            │
//! │  ├── image.rs    - Raw pixel buffers, parity contract        │
//! │  ├── scalar.rs   - Per-pixel color-equality encoder          │
//! │  └── compute.rs  - Parity kernel over a compute device       │
//! │                                                              │
//! │  maze/           - Maze engine                               │
//! │  ├── grid.rs     - 2-bit walls, spanning-tree generation     │
//! │  └── navigator.rs- Move queue, glide, goal detection         │
//! │                                                              │
//! │  draw/           - Drawing collaborator seam                 │
//! │  └── painter.rs  - Painter trait + software reference        │
//! │                                                              │
//! │  game/           - Tick-driven engine                        │
//! │  ├── mode.rs     - Shuffle / marquee / crawl / maze          │
//! │  ├── state.rs    - Session state, best score                 │
//! │  └── tick.rs     - Input, one delta, XOR, serialize          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The whole engine is deterministic: no floating point in tick logic,
//! all randomness from the seeded Xorshift128+ RNG, the compute codec's
//! output defined bit-for-bit by its kernel contract. Given the same
//! seed and input sequence, every serialized frame is identical on any
//! platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod codec;
pub mod maze;
pub mod draw;
pub mod game;

// Re-export commonly used types
pub use core::canvas::{PackedCanvas, CanvasError};
pub use core::rng::{DeterministicRng, derive_session_seed};
pub use codec::{MaskEncoder, ScalarCodec, ComputeCodec, SoftwareDevice, Image, CodecError};
pub use draw::{Painter, SoftwarePainter};
pub use maze::{MazeGrid, MazeNavigator, Direction};
pub use game::{GameState, InputFrame, Command, GameEvent, GameError, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logical tick rate (Hz)
pub const TICK_RATE: u32 = 30;

/// Canvas width in pixels
pub const CANVAS_WIDTH: u32 = 200;

/// Canvas height in pixels
pub const CANVAS_HEIGHT: u32 = 150;

/// Serialized frame length: ceil(200 * 150 / 32) words
pub const FRAME_WORDS: usize = 938;
