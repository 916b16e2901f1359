//! Scalar Mask Codec
//!
//! The no-device encoder: walks every pixel once and sets the matching
//! canvas bit where the raw value equals the reference on-color. O(W*H)
//! per image, which is fine at 200x150 for one-shot images and still
//! tolerable per tick where no compute device exists.

use crate::core::canvas::{PackedCanvas, WORD_BITS, word_count};
use super::{CodecError, Image, MaskEncoder, check_shape};

/// Per-pixel equality encoder.
#[derive(Clone, Debug)]
pub struct ScalarCodec {
    width: u32,
    height: u32,
    on_color: u32,
}

impl ScalarCodec {
    /// Create a codec for a fixed canvas shape.
    ///
    /// `on_color` is the exact raw pixel value treated as lit; every
    /// other value is unlit.
    pub fn new(width: u32, height: u32, on_color: u32) -> Self {
        Self {
            width,
            height,
            on_color,
        }
    }
}

impl MaskEncoder for ScalarCodec {
    fn shape(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn encode(&mut self, image: &Image) -> Result<PackedCanvas, CodecError> {
        check_shape(self.width, self.height, image)?;

        let mut words = vec![0u32; word_count(self.width, self.height)];
        for (idx, pixel) in image.pixels().iter().enumerate() {
            if *pixel == self.on_color {
                words[idx / WORD_BITS] |= 1 << (idx % WORD_BITS);
            }
        }

        Ok(PackedCanvas::from_words(self.width, self.height, words)?)
    }
}

// =============================================================================
// TESTS
// =============================================================================
