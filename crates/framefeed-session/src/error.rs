/// Errors from session construction.
///
/// Connection failures are not construction errors; they surface later
/// through the session's status.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The worker thread could not be spawned.
    #[error("failed to spawn session worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
