//! Mask Codecs
//!
//! Converts raw pixel images into packed canvas deltas. Two encoders live
//! behind the one [`MaskEncoder`] contract:
//!
//! - [`ScalarCodec`]: per-pixel equality against a reference on-color.
//!   No device needed; right for small one-shot images.
//! - [`ComputeCodec`]: parity extraction on a compute device, one work
//!   item per pixel. Same output, better throughput for per-tick frames.
//!
//! Given equivalent inputs (true color equality vs. pixel parity for the
//! same logical image) the two produce bit-identical deltas, so an
//! integration may drop device dispatch entirely without losing
//! correctness, only speed.

pub mod image;
pub mod scalar;
pub mod compute;

// Re-export key types
pub use image::{Image, PIXEL_ON, PIXEL_OFF};
pub use scalar::ScalarCodec;
pub use compute::{ComputeCodec, ComputeDevice, SoftwareDevice, DeviceError};

use crate::core::canvas::{PackedCanvas, CanvasError};

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The image shape does not match the codec's canvas shape.
    #[error("image is {image_width}x{image_height}, codec expects {width}x{height}")]
    DimensionMismatch {
        /// Codec canvas width.
        width: u32,
        /// Codec canvas height.
        height: u32,
        /// Supplied image width.
        image_width: u32,
        /// Supplied image height.
        image_height: u32,
    },

    /// Canvas reassembly failed.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// The compute device failed; the tick's delta is lost.
    #[error("device dispatch failed: {0}")]
    Device(#[from] DeviceError),
}

/// An image-to-delta encoder.
///
/// Implementations are interchangeable: the engine only ever sees this
/// trait, never a concrete codec.
pub trait MaskEncoder {
    /// The canvas shape this encoder produces deltas for.
    fn shape(&self) -> (u32, u32);

    /// Encode an image into a canvas delta.
    ///
    /// Fails with [`CodecError::DimensionMismatch`] if the image shape
    /// differs from [`MaskEncoder::shape`].
    fn encode(&mut self, image: &Image) -> Result<PackedCanvas, CodecError>;
}

/// Shared shape guard for both codecs.
fn check_shape(width: u32, height: u32, image: &Image) -> Result<(), CodecError> {
    if image.width() != width || image.height() != height {
        return Err(CodecError::DimensionMismatch {
            width,
            height,
            image_width: image.width(),
            image_height: image.height(),
        });
    }
    Ok(())
}
