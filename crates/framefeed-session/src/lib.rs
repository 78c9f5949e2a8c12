//! Per-client delivery session.
//!
//! A [`Session`] owns one worker thread. The worker connects to the
//! upstream through a `SourceConnector`, then pulls frames into a bounded
//! queue. Pollers drain the queue through non-blocking calls: `update`
//! moves the oldest queued frame into the current-frame slot, `frame_info`
//! advertises its dimensions, and `copy_frame_data` hands the pixels over
//! exactly once.
//!
//! One lock per session covers status, queue, and slot; it is never held
//! across a blocking operation.

pub mod error;
pub mod session;
pub mod status;
mod worker;

pub use error::{Result, SessionError};
pub use session::{Session, SessionStats};
pub use status::{ConnectionStatus, SessionErrorKind};
