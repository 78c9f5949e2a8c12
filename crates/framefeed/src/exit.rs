use std::fmt;
use std::io;

use framefeed_client::ClientError;
use framefeed_session::{SessionError, SessionErrorKind};

// Exit code table shared by every subcommand.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const STREAM_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::Session(SessionError::WorkerSpawn(source)) => io_error(context, source),
        ClientError::RegistryFull => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

/// Exit code for a session that ended in the given terminal error.
pub fn stream_error(context: &str, kind: SessionErrorKind) -> CliError {
    let code = match kind {
        SessionErrorKind::ConnectFailed => FAILURE,
        SessionErrorKind::StreamEnded => FAILURE,
        SessionErrorKind::DecodeFailed => DATA_INVALID,
        SessionErrorKind::TransportFailed => STREAM_ERROR,
    };
    CliError::new(code, format!("{context}: {kind}"))
}
