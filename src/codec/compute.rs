//! Compute-Dispatch Mask Codec
//!
//! The accelerated encoder. The device runs one work item per pixel over a
//! W x H x 1 grid; each item reads bit 0 of its raw pixel and atomically
//! ORs that bit into the packed output word. The kernel itself is an
//! external, versioned artifact (see `shaders/parity_pack.comp`) loaded at
//! startup and handed to the device - this crate never compiles it.
//!
//! Buffers are allocated once at codec construction and reused every tick:
//! upload pixels, zero the output, dispatch, download, reassemble. The
//! round trip is synchronous within the tick; a device failure loses that
//! tick's delta and nothing else.

use std::collections::BTreeMap;

use crate::core::canvas::{PackedCanvas, WORD_BITS, word_count};
use super::{CodecError, Image, MaskEncoder, check_shape};

/// Storage slot the pixel buffer is bound to.
pub const INPUT_SLOT: u32 = 0;

/// Storage slot the packed output buffer is bound to.
pub const OUTPUT_SLOT: u32 = 1;

/// Opaque handle to a device-resident buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// Opaque handle to a loaded compute kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelHandle(pub u32);

/// Compute device errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// Handle does not name a live buffer.
    #[error("unknown buffer handle {0}")]
    UnknownBuffer(u32),

    /// Handle does not name a loaded kernel.
    #[error("unknown kernel handle {0}")]
    UnknownKernel(u32),

    /// Transfer size does not match the buffer allocation.
    #[error("buffer holds {expected} words, transfer wants {got}")]
    SizeMismatch {
        /// Allocated word count.
        expected: usize,
        /// Requested word count.
        got: usize,
    },

    /// Dispatch ran with nothing bound to a required storage slot.
    #[error("no buffer bound to storage slot {0}")]
    UnboundSlot(u32),

    /// Kernel source was rejected.
    #[error("kernel rejected: {0}")]
    BadKernel(String),

    /// The device went away mid-session.
    #[error("device lost: {0}")]
    Lost(String),
}

/// The external compute collaborator.
///
/// Models the minimal protocol the codec needs: allocate, upload, bind,
/// dispatch, download. A GPU integration implements this over its API of
/// choice; [`SoftwareDevice`] implements it on the CPU so correctness
/// never depends on hardware.
///
/// # Kernel contract
///
/// A dispatch over `(gx, gy, 1)` runs one invocation per `(x, y)` with
/// `x < gx`, `y < gy`. Each invocation reads word `x + gx * y` of the
/// buffer in [`INPUT_SLOT`], takes its least-significant bit, and ORs it
/// into bit `idx % 32` of word `idx / 32` in [`OUTPUT_SLOT`]. The output
/// buffer is never cleared by the device; callers zero it between frames.
pub trait ComputeDevice {
    /// Allocate a zero-filled buffer of `words` 32-bit words.
    fn create_buffer(&mut self, words: usize) -> Result<BufferHandle, DeviceError>;

    /// Load a compute kernel from its source artifact.
    fn load_kernel(&mut self, source: &str) -> Result<KernelHandle, DeviceError>;

    /// Bind a buffer to a storage slot for subsequent dispatches.
    fn bind_storage(&mut self, slot: u32, buffer: BufferHandle) -> Result<(), DeviceError>;

    /// Copy words into a buffer. Lengths must match the allocation.
    fn upload(&mut self, buffer: BufferHandle, data: &[u32]) -> Result<(), DeviceError>;

    /// Run a kernel over a grid. Synchronous: returns after completion.
    fn dispatch(&mut self, kernel: KernelHandle, grid: (u32, u32, u32)) -> Result<(), DeviceError>;

    /// Copy a buffer back out. Lengths must match the allocation.
    fn download(&mut self, buffer: BufferHandle, out: &mut [u32]) -> Result<(), DeviceError>;
}

// =============================================================================
// COMPUTE CODEC
// =============================================================================

/// Parity-extraction encoder over a compute device.
///
/// Output bit = least-significant bit of the corresponding raw pixel.
/// Painters uphold the parity contract documented on [`super::image`].
pub struct ComputeCodec<D: ComputeDevice> {
    device: D,
    width: u32,
    height: u32,
    kernel: KernelHandle,
    pixel_buffer: BufferHandle,
    packed_buffer: BufferHandle,
    // Reused every tick to zero the output buffer before dispatch
    zeros: Vec<u32>,
}

impl<D: ComputeDevice> ComputeCodec<D> {
    /// Set up buffers and kernel for a fixed canvas shape.
    pub fn new(
        mut device: D,
        width: u32,
        height: u32,
        kernel_source: &str,
    ) -> Result<Self, CodecError> {
        let pixel_words = width as usize * height as usize;
        let packed_words = word_count(width, height);

        let pixel_buffer = device.create_buffer(pixel_words)?;
        let packed_buffer = device.create_buffer(packed_words)?;
        let kernel = device.load_kernel(kernel_source)?;
        device.bind_storage(INPUT_SLOT, pixel_buffer)?;
        device.bind_storage(OUTPUT_SLOT, packed_buffer)?;

        Ok(Self {
            device,
            width,
            height,
            kernel,
            pixel_buffer,
            packed_buffer,
            zeros: vec![0; packed_words],
        })
    }

    /// The wrapped device, for integrations that share it.
    pub fn device(&self) -> &D {
        &self.device
    }
}

impl<D: ComputeDevice> MaskEncoder for ComputeCodec<D> {
    fn shape(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn encode(&mut self, image: &Image) -> Result<PackedCanvas, CodecError> {
        check_shape(self.width, self.height, image)?;

        self.device.upload(self.pixel_buffer, image.pixels())?;
        self.device.upload(self.packed_buffer, &self.zeros)?;
        self.device.dispatch(self.kernel, (self.width, self.height, 1))?;

        let mut words = vec![0u32; self.zeros.len()];
        self.device.download(self.packed_buffer, &mut words)?;

        Ok(PackedCanvas::from_words(self.width, self.height, words)?)
    }
}

// =============================================================================
// SOFTWARE DEVICE
// =============================================================================

/// CPU reference implementation of [`ComputeDevice`].
///
/// Executes the parity kernel contract directly, one (x, y) at a time.
/// Kernel sources are accepted but not compiled; the handle only proves
/// the artifact was loaded.
#[derive(Debug, Default)]
pub struct SoftwareDevice {
    buffers: Vec<Vec<u32>>,
    kernels: Vec<String>,
    slots: BTreeMap<u32, usize>,
}

impl SoftwareDevice {
    /// Create a device with no buffers or kernels.
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer_index(&self, handle: BufferHandle) -> Result<usize, DeviceError> {
        let idx = handle.0 as usize;
        if idx < self.buffers.len() {
            Ok(idx)
        } else {
            Err(DeviceError::UnknownBuffer(handle.0))
        }
    }

    fn bound_buffer(&self, slot: u32) -> Result<usize, DeviceError> {
        self.slots
            .get(&slot)
            .copied()
            .ok_or(DeviceError::UnboundSlot(slot))
    }
}

impl ComputeDevice for SoftwareDevice {
    fn create_buffer(&mut self, words: usize) -> Result<BufferHandle, DeviceError> {
        self.buffers.push(vec![0; words]);
        Ok(BufferHandle(self.buffers.len() as u32 - 1))
    }

    fn load_kernel(&mut self, source: &str) -> Result<KernelHandle, DeviceError> {
        if source.trim().is_empty() {
            return Err(DeviceError::BadKernel("empty source".into()));
        }
        self.kernels.push(source.to_owned());
        Ok(KernelHandle(self.kernels.len() as u32 - 1))
    }

    fn bind_storage(&mut self, slot: u32, buffer: BufferHandle) -> Result<(), DeviceError> {
        let idx = self.buffer_index(buffer)?;
        self.slots.insert(slot, idx);
        Ok(())
    }

    fn upload(&mut self, buffer: BufferHandle, data: &[u32]) -> Result<(), DeviceError> {
        let idx = self.buffer_index(buffer)?;
        let target = &mut self.buffers[idx];
        if target.len() != data.len() {
            return Err(DeviceError::SizeMismatch {
                expected: target.len(),
                got: data.len(),
            });
        }
        target.copy_from_slice(data);
        Ok(())
    }

    fn dispatch(&mut self, kernel: KernelHandle, grid: (u32, u32, u32)) -> Result<(), DeviceError> {
        if kernel.0 as usize >= self.kernels.len() {
            return Err(DeviceError::UnknownKernel(kernel.0));
        }
        let input_idx = self.bound_buffer(INPUT_SLOT)?;
        let output_idx = self.bound_buffer(OUTPUT_SLOT)?;

        let (gx, gy, _gz) = grid;
        let pixel_count = gx as usize * gy as usize;
        if self.buffers[input_idx].len() < pixel_count {
            return Err(DeviceError::SizeMismatch {
                expected: pixel_count,
                got: self.buffers[input_idx].len(),
            });
        }
        if self.buffers[output_idx].len() < pixel_count.div_ceil(WORD_BITS) {
            return Err(DeviceError::SizeMismatch {
                expected: pixel_count.div_ceil(WORD_BITS),
                got: self.buffers[output_idx].len(),
            });
        }

        // Copy the input aside: slot bindings may alias
        let input = self.buffers[input_idx].clone();
        let output = &mut self.buffers[output_idx];

        for y in 0..gy {
            for x in 0..gx {
                let idx = x as usize + gx as usize * y as usize;
                let bit = input[idx] & 1;
                output[idx / WORD_BITS] |= bit << (idx % WORD_BITS);
            }
        }

        Ok(())
    }

    fn download(&mut self, buffer: BufferHandle, out: &mut [u32]) -> Result<(), DeviceError> {
        let idx = self.buffer_index(buffer)?;
        let source = &self.buffers[idx];
        if source.len() != out.len() {
            return Err(DeviceError::SizeMismatch {
                expected: source.len(),
                got: out.len(),
            });
        }
        out.copy_from_slice(source);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{PIXEL_ON, PIXEL_OFF, ScalarCodec};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    const KERNEL: &str = "void main() { /* parity pack */ }";

    fn checkerboard(width: u32, height: u32) -> Image {
        let mut img = Image::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if (x + y) % 2 == 0 {
                    img.put(x as i32, y as i32, PIXEL_ON);
                }
            }
        }
        img
    }

    #[test]
    fn test_compute_extracts_parity() {
        let device = SoftwareDevice::new();
        let mut codec = ComputeCodec::new(device, 4, 1, KERNEL).unwrap();

        let mut img = Image::new(4, 1);
        img.put(0, 0, 3); // odd: lit
        img.put(1, 0, 2); // even: unlit
        img.put(2, 0, PIXEL_ON);
        img.put(3, 0, PIXEL_OFF);

        let delta = codec.encode(&img).unwrap();
        assert_eq!(delta.serialize(), vec![0b0101]);
    }

    #[test]
    fn test_compute_rejects_wrong_shape() {
        let device = SoftwareDevice::new();
        let mut codec = ComputeCodec::new(device, 8, 4, KERNEL).unwrap();

        let img = Image::new(4, 8);
        assert!(matches!(
            codec.encode(&img),
            Err(CodecError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_compute_output_cleared_between_frames() {
        let device = SoftwareDevice::new();
        let mut codec = ComputeCodec::new(device, 8, 4, KERNEL).unwrap();

        let mut first = Image::new(8, 4);
        first.put(0, 0, PIXEL_ON);
        let delta = codec.encode(&first).unwrap();
        assert_eq!(delta.count_ones(), 1);

        // A frame with nothing lit must not inherit the previous frame
        let blank = Image::new(8, 4);
        let delta = codec.encode(&blank).unwrap();
        assert_eq!(delta.count_ones(), 0);
    }

    #[test]
    fn test_scalar_and_compute_agree_on_checkerboard() {
        // Scenario: both codecs' "on" encodings coincide at PIXEL_ON
        let img = checkerboard(200, 150);

        let mut scalar = ScalarCodec::new(200, 150, PIXEL_ON);
        let device = SoftwareDevice::new();
        let mut compute = ComputeCodec::new(device, 200, 150, KERNEL).unwrap();

        let scalar_delta = scalar.encode(&img).unwrap();
        let compute_delta = compute.encode(&img).unwrap();

        assert_eq!(scalar_delta, compute_delta);
        assert_eq!(scalar_delta.count_ones(), 200 * 150 / 2);
    }

    #[test]
    fn test_scalar_and_compute_agree_on_noise() {
        let mut rng = StdRng::seed_from_u64(9001);
        let mut img = Image::new(64, 48);
        for y in 0..48 {
            for x in 0..64 {
                if rng.gen_bool(0.5) {
                    img.put(x, y, PIXEL_ON);
                }
            }
        }

        let mut scalar = ScalarCodec::new(64, 48, PIXEL_ON);
        let device = SoftwareDevice::new();
        let mut compute = ComputeCodec::new(device, 64, 48, KERNEL).unwrap();

        assert_eq!(scalar.encode(&img).unwrap(), compute.encode(&img).unwrap());
    }

    #[test]
    fn test_device_rejects_empty_kernel() {
        let mut device = SoftwareDevice::new();
        assert!(matches!(
            device.load_kernel("  \n"),
            Err(DeviceError::BadKernel(_))
        ));
    }

    #[test]
    fn test_device_rejects_unknown_handles() {
        let mut device = SoftwareDevice::new();
        assert!(matches!(
            device.upload(BufferHandle(5), &[0]),
            Err(DeviceError::UnknownBuffer(5))
        ));

        let kernel = device.load_kernel(KERNEL).unwrap();
        assert!(matches!(
            device.dispatch(KernelHandle(kernel.0 + 1), (1, 1, 1)),
            Err(DeviceError::UnknownKernel(_))
        ));
    }

    #[test]
    fn test_device_rejects_unbound_slots() {
        let mut device = SoftwareDevice::new();
        let kernel = device.load_kernel(KERNEL).unwrap();
        assert!(matches!(
            device.dispatch(kernel, (4, 1, 1)),
            Err(DeviceError::UnboundSlot(INPUT_SLOT))
        ));
    }

    #[test]
    fn test_device_rejects_size_mismatch() {
        let mut device = SoftwareDevice::new();
        let buffer = device.create_buffer(4).unwrap();
        assert!(matches!(
            device.upload(buffer, &[0; 5]),
            Err(DeviceError::SizeMismatch { expected: 4, got: 5 })
        ));

        let mut out = [0u32; 3];
        assert!(matches!(
            device.download(buffer, &mut out),
            Err(DeviceError::SizeMismatch { expected: 4, got: 3 })
        ));
    }
}
