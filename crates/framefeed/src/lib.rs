//! Polling-first video frame delivery for render loops.
//!
//! framefeed turns a push-style stream source into a poll-style client: a
//! worker thread per session pulls frames into a bounded queue, and the
//! consumer drains it one frame per tick from its own loop, through opaque
//! integer-like handles.
//!
//! # Crate Structure
//!
//! - [`frame`] — Immutable RGBA frames and the bounded hand-off queue
//! - [`source`] — Stream configuration, connector traits, pattern source
//! - [`session`] — Worker-thread sessions with polling state (behind `client` feature)
//! - [`client`] — Handle-based session registry (behind `client` feature)

/// Re-export frame types.
pub mod frame {
    pub use framefeed_frame::*;
}

/// Re-export source types.
pub mod source {
    pub use framefeed_source::*;
}

/// Re-export session types (requires `client` feature).
#[cfg(feature = "client")]
pub mod session {
    pub use framefeed_session::*;
}

/// Re-export client registry types (requires `client` feature).
#[cfg(feature = "client")]
pub mod client {
    pub use framefeed_client::*;
}
