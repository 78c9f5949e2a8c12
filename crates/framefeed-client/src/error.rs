use framefeed_session::SessionError;

/// Errors surfaced by registry operations.
///
/// Unknown or stale handles are not errors: façade calls report them as
/// "not found" results (`false`, `None`, or the sentinel status code).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Constructing the session failed before anything was registered.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The slot table is out of indexes.
    #[error("registry slot table exhausted")]
    RegistryFull,
}

pub type Result<T> = std::result::Result<T, ClientError>;
