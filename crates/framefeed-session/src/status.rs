use framefeed_source::SourceError;

use std::fmt;

/// Kind of terminal session failure.
///
/// Each kind has a stable negative code for hosts consuming status through
/// the integer projection. `-1` is not used here; the registry reserves it
/// for "no such handle".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    /// The upstream connection could not be established.
    ConnectFailed,
    /// The upstream ended the stream; no further frames will ever arrive.
    StreamEnded,
    /// A received frame could not be decoded.
    DecodeFailed,
    /// The upstream transport failed mid-stream.
    TransportFailed,
}

impl SessionErrorKind {
    pub fn code(self) -> i32 {
        match self {
            SessionErrorKind::ConnectFailed => -2,
            SessionErrorKind::StreamEnded => -3,
            SessionErrorKind::DecodeFailed => -4,
            SessionErrorKind::TransportFailed => -5,
        }
    }

    /// The terminal status a given source failure produces.
    ///
    /// `Interrupted` never reaches status; workers treat it as a clean
    /// exit. It is folded into the transport arm to keep the match total.
    pub fn from_source(err: &SourceError) -> Self {
        match err {
            SourceError::Connect { .. } => SessionErrorKind::ConnectFailed,
            SourceError::Decode(_) => SessionErrorKind::DecodeFailed,
            SourceError::Io(_) | SourceError::Interrupted => SessionErrorKind::TransportFailed,
        }
    }
}

impl fmt::Display for SessionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionErrorKind::ConnectFailed => "connect failed",
            SessionErrorKind::StreamEnded => "stream ended",
            SessionErrorKind::DecodeFailed => "decode failed",
            SessionErrorKind::TransportFailed => "transport failed",
        };
        write!(f, "{name}")
    }
}

/// Connection lifecycle of one session.
///
/// ```text
/// Disconnected --> Connecting --> Connected
///       |              |              |
///       +--------------+-------+------+
///                              v
///                         Error(kind)    terminal
/// ```
///
/// Status only moves forward. `Error` is reachable from every state and
/// nothing leaves it: a session that has failed stays failed, and recovery
/// means the caller destroys it and creates a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error(SessionErrorKind),
}

impl ConnectionStatus {
    /// Integer projection for foreign callers: `0` disconnected,
    /// `1` connecting, `2` connected, negative error codes.
    pub fn code(self) -> i32 {
        match self {
            ConnectionStatus::Disconnected => 0,
            ConnectionStatus::Connecting => 1,
            ConnectionStatus::Connected => 2,
            ConnectionStatus::Error(kind) => kind.code(),
        }
    }

    /// True while the session can still make progress.
    pub fn is_live(self) -> bool {
        !matches!(self, ConnectionStatus::Error(_))
    }

    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// Whether moving to `next` is a legal forward step: the single-step
    /// connect progression, or failing into `Error` from any live state.
    pub fn can_advance_to(self, next: ConnectionStatus) -> bool {
        use ConnectionStatus::*;
        match (self, next) {
            (Error(_), _) => false,
            (_, Error(_)) => true,
            (Disconnected, Connecting) => true,
            (Connecting, Connected) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Error(kind) => write!(f, "error: {kind}"),
        }
    }
}
