use bytes::Bytes;

use crate::error::{FrameError, Result};

/// Bytes per pixel for the fixed RGBA8 pixel format.
pub const BYTES_PER_PIXEL: usize = 4;

/// Per-side upper bound on frame dimensions. Anything larger is treated as
/// a corrupt header rather than a real frame.
pub const MAX_DIMENSION: u32 = 16_384;

/// Returns the exact RGBA8 buffer length for a `width` x `height` frame,
/// or `None` if the product overflows.
///
/// Useful for sizing a copy buffer before the first frame arrives.
pub fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// Dimensions advertised to a poller before it commits a copy buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
}

/// A single decoded video frame.
///
/// Frames are immutable once constructed: the pixel buffer is a
/// reference-counted [`Bytes`], so cloning a frame shares the buffer without
/// copying and nothing downstream can mutate it. `timestamp_us` carries the
/// producer's capture/decode clock in microseconds and is non-decreasing
/// within one source.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    timestamp_us: u64,
    data: Bytes,
}

impl VideoFrame {
    /// Creates a frame, validating dimensions and buffer length.
    ///
    /// The buffer must be exactly `width * height * 4` bytes of RGBA8 data.
    pub fn new(width: u32, height: u32, timestamp_us: u64, data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroDimension { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(FrameError::DimensionTooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }
        // In range: bounded dimensions keep the product well under usize::MAX.
        let expected = (width as usize) * (height as usize) * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(FrameError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            timestamp_us,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Producer timestamp in microseconds.
    pub fn timestamp_us(&self) -> u64 {
        self.timestamp_us
    }

    /// The RGBA8 pixel buffer, always `width * height * 4` bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Length of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// The poll-surface projection of this frame.
    pub fn info(&self) -> FrameInfo {
        FrameInfo {
            width: self.width,
            height: self.height,
        }
    }
}
