//! Immutable video frame values and the bounded hand-off queue.
//!
//! This is the data layer of framefeed. A [`VideoFrame`] is a fixed-format
//! RGBA8 pixel buffer with dimensions and a capture timestamp, validated at
//! construction and immutable afterwards. A [`FrameQueue`] is the bounded
//! FIFO that carries frames from a producer thread to a polling consumer.
//!
//! Nothing in this crate locks; synchronization belongs to whoever owns the
//! queue.

pub mod error;
pub mod frame;
pub mod queue;

pub use error::{FrameError, Result};
pub use frame::{rgba_len, FrameInfo, VideoFrame, BYTES_PER_PIXEL, MAX_DIMENSION};
pub use queue::{FrameQueue, PushOutcome, QueueStats, DEFAULT_QUEUE_CAPACITY};
