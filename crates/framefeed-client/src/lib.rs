//! Handle-based session registry and polling façade.
//!
//! A [`ClientRegistry`] owns every live [`Session`] and hands out opaque
//! [`ClientHandle`]s in their place. Every consumer operation (advancing
//! the current frame, reading its dimensions, copying its pixels, checking
//! the connection) goes through the registry with a handle; no references,
//! callbacks, or locks ever cross to the caller.
//!
//! Handles are generation-tagged slot indexes: destroying a session
//! retires its handle value forever, so a stale handle held by a slow
//! caller degrades into well-defined "not found" results instead of
//! touching a recycled slot.
//!
//! [`Session`]: framefeed_session::Session

pub mod error;
pub mod handle;
pub mod registry;

pub use error::{ClientError, Result};
pub use handle::ClientHandle;
pub use registry::{ClientRegistry, STATUS_UNKNOWN_HANDLE};
