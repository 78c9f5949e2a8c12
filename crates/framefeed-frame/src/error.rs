/// Errors that can occur while constructing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Width or height is zero.
    #[error("frame dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    /// Width or height exceeds the per-side sanity bound.
    #[error("frame dimension too large ({width}x{height}, max {max} per side)")]
    DimensionTooLarge { width: u32, height: u32, max: u32 },

    /// The pixel buffer length does not match `width * height * 4`.
    #[error("pixel buffer length mismatch (expected {expected} bytes, got {actual})")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
