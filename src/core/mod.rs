//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform
//! determinism. They carry no game rules of their own: the packed canvas,
//! fixed-point math, and the seeded RNG are consumed by the codec, maze,
//! and game layers above.

pub mod canvas;
pub mod fixed;
pub mod vec2;
pub mod rng;

// Re-export core types
pub use canvas::{PackedCanvas, CanvasError, WORD_BITS};
pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use vec2::FixedVec2;
pub use rng::{DeterministicRng, derive_session_seed};
