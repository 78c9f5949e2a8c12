use std::time::Duration;

/// Target latency used when the caller does not specify one.
pub const DEFAULT_TARGET_LATENCY: Duration = Duration::from_millis(500);

/// Describes the stream a session should attach to.
///
/// The endpoint URL and stream path are opaque to the pipeline; only the
/// connector interprets them. `target_latency` tells the source how much
/// buffering to aim for upstream; it is a hint, not a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    pub endpoint: String,
    pub stream: String,
    pub target_latency: Duration,
}

impl StreamConfig {
    pub fn new(endpoint: impl Into<String>, stream: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            stream: stream.into(),
            target_latency: DEFAULT_TARGET_LATENCY,
        }
    }

    pub fn with_target_latency(mut self, latency: Duration) -> Self {
        self.target_latency = latency;
        self
    }
}
