/// Errors reported by sources and connectors.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Establishing the upstream connection failed.
    #[error("connect to {endpoint} failed: {reason}")]
    Connect { endpoint: String, reason: String },

    /// A received frame could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// An I/O error occurred while talking to the upstream.
    #[error("source I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking wait was cut short by the stop signal. Not a fault;
    /// the worker treats it as a clean exit during teardown.
    #[error("interrupted by stop signal")]
    Interrupted,
}

impl SourceError {
    /// True when the error means teardown is already in progress.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, SourceError::Interrupted)
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
