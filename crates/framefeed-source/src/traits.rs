use framefeed_frame::VideoFrame;

use crate::config::StreamConfig;
use crate::error::Result;
use crate::stop::StopSignal;

/// A connected upstream producing decoded frames.
///
/// `next_frame` may block while waiting on the upstream. Implementations
/// must watch `stop` during every blocking wait and return promptly once it
/// is raised; returning `SourceError::Interrupted` is the conventional exit
/// from an interrupted wait. `Ok(None)` means the stream ended cleanly and
/// no further frames will ever arrive.
///
/// Frames must carry non-decreasing `timestamp_us` values.
pub trait FrameSource: Send {
    fn next_frame(&mut self, stop: &StopSignal) -> Result<Option<VideoFrame>>;
}

/// Establishes upstream connections on behalf of session workers.
///
/// `connect` may block (name resolution, handshakes, simulated delays) but
/// must honor `stop` the same way sources do. One connector instance is
/// shared by every session a registry creates, hence `Send + Sync`.
pub trait SourceConnector: Send + Sync {
    fn connect(&self, config: &StreamConfig, stop: &StopSignal) -> Result<Box<dyn FrameSource>>;
}
