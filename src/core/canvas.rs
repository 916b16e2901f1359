//! Packed Bit Canvas
//!
//! The persistent monochrome accumulator behind every rendered frame. One
//! bit per pixel, stored as a fixed-length array of 32-bit words with
//! explicit `word = index / 32`, `offset = index % 32` addressing, so the
//! frame-level boolean algebra (XOR a drawn shape in, AND/OR for masking,
//! complement for inversion) is a per-word loop instead of a per-pixel one.
//!
//! Bit index = `x + width * y` (row-major, x fastest). The serialized form
//! is the word array itself: least-significant word first, the final word's
//! unused high bits always zero.
//!
//! ## Invariant
//!
//! No bit outside `width * height` is ever set. Every mutating operation
//! preserves this, including `complement`, so `serialize` never has to
//! re-mask.

use serde::{Serialize, Deserialize};

/// Bits per serialized word.
pub const WORD_BITS: usize = 32;

/// Canvas errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    /// Pixel coordinate outside the canvas.
    #[error("pixel ({x}, {y}) outside {width}x{height} canvas")]
    OutOfRange {
        /// Requested x coordinate.
        x: u32,
        /// Requested y coordinate.
        y: u32,
        /// Canvas width.
        width: u32,
        /// Canvas height.
        height: u32,
    },

    /// Two canvases of different shapes were combined.
    #[error("canvas shapes differ: {width}x{height} vs {other_width}x{other_height}")]
    DimensionMismatch {
        /// Width of the left-hand canvas.
        width: u32,
        /// Height of the left-hand canvas.
        height: u32,
        /// Width of the right-hand canvas.
        other_width: u32,
        /// Height of the right-hand canvas.
        other_height: u32,
    },

    /// A word buffer of the wrong length was supplied.
    #[error("expected {expected} words, got {got}")]
    WordCountMismatch {
        /// Required word count for the shape.
        expected: usize,
        /// Supplied word count.
        got: usize,
    },
}

/// Bit-per-pixel monochrome canvas stored as one packed accumulator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedCanvas {
    width: u32,
    height: u32,
    words: Vec<u32>,
}

impl PackedCanvas {
    /// Create a canvas with all bits zero.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            words: vec![0; word_count(width, height)],
        }
    }

    /// Reassemble a canvas from its serialized word sequence.
    ///
    /// Fails if the word count does not match the shape. Padding bits in
    /// the final word are cleared to uphold the canvas invariant.
    pub fn from_words(width: u32, height: u32, mut words: Vec<u32>) -> Result<Self, CanvasError> {
        let expected = word_count(width, height);
        if words.len() != expected {
            return Err(CanvasError::WordCountMismatch {
                expected,
                got: words.len(),
            });
        }
        mask_tail(width, height, &mut words);
        Ok(Self { width, height, words })
    }

    /// Canvas width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of 32-bit words in the serialized form: ceil(W*H / 32).
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Read one bit.
    pub fn get(&self, x: u32, y: u32) -> Result<bool, CanvasError> {
        let idx = self.bit_index(x, y)?;
        Ok((self.words[idx / WORD_BITS] >> (idx % WORD_BITS)) & 1 == 1)
    }

    /// Write exactly one bit.
    pub fn set(&mut self, x: u32, y: u32, value: bool) -> Result<(), CanvasError> {
        let idx = self.bit_index(x, y)?;
        let mask = 1u32 << (idx % WORD_BITS);
        if value {
            self.words[idx / WORD_BITS] |= mask;
        } else {
            self.words[idx / WORD_BITS] &= !mask;
        }
        Ok(())
    }

    /// XOR another canvas into this one.
    ///
    /// This is the engine's sole drawing primitive: applying the same delta
    /// twice restores the prior image.
    pub fn invert_mask(&mut self, other: &PackedCanvas) -> Result<(), CanvasError> {
        self.check_shape(other)?;
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word ^= other_word;
        }
        Ok(())
    }

    /// AND another canvas into this one.
    pub fn intersect_mask(&mut self, other: &PackedCanvas) -> Result<(), CanvasError> {
        self.check_shape(other)?;
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word &= other_word;
        }
        Ok(())
    }

    /// OR another canvas into this one.
    pub fn union_mask(&mut self, other: &PackedCanvas) -> Result<(), CanvasError> {
        self.check_shape(other)?;
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word |= other_word;
        }
        Ok(())
    }

    /// Flip every bit (XOR with all-ones over W*H bits). Involution.
    pub fn complement(&mut self) {
        for word in &mut self.words {
            *word = !*word;
        }
        mask_tail(self.width, self.height, &mut self.words);
    }

    /// Reset every bit to zero (session restart).
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Number of set bits (lit pixels).
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Serialize to the fixed-layout word sequence.
    ///
    /// word[i] holds bits [32*i, 32*i + 32) of the canvas, least-significant
    /// word first; the final word's unused high bits are zero.
    pub fn serialize(&self) -> Vec<u32> {
        self.words.clone()
    }

    /// Serialized words without copying.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    #[inline]
    fn bit_index(&self, x: u32, y: u32) -> Result<usize, CanvasError> {
        if x >= self.width || y >= self.height {
            return Err(CanvasError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(x as usize + self.width as usize * y as usize)
    }

    fn check_shape(&self, other: &PackedCanvas) -> Result<(), CanvasError> {
        if self.width != other.width || self.height != other.height {
            return Err(CanvasError::DimensionMismatch {
                width: self.width,
                height: self.height,
                other_width: other.width,
                other_height: other.height,
            });
        }
        Ok(())
    }
}

/// Words needed for a W*H-bit canvas.
#[inline]
pub fn word_count(width: u32, height: u32) -> usize {
    (width as usize * height as usize).div_ceil(WORD_BITS)
}

/// Clear the unused high bits of the final word.
fn mask_tail(width: u32, height: u32, words: &mut [u32]) {
    let used = (width as usize * height as usize) % WORD_BITS;
    if used != 0 {
        if let Some(last) = words.last_mut() {
            *last &= (1u32 << used) - 1;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
