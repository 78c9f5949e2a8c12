//! Upstream frame source abstraction.
//!
//! A session worker does two things with the upstream: connect once, then
//! pull frames until told to stop. This crate defines that seam as two
//! traits ([`SourceConnector`] and [`FrameSource`]), the configuration
//! handed to `connect`, and the [`StopSignal`] every blocking wait must
//! honor so teardown stays prompt.
//!
//! Two implementations ship in-tree: [`PatternConnector`] produces a
//! deterministic animated test pattern (no network involved), and
//! [`RetryConnector`] wraps any connector with a bounded backoff policy.

pub mod config;
pub mod error;
pub mod pattern;
pub mod retry;
pub mod stop;
pub mod traits;

pub use config::{StreamConfig, DEFAULT_TARGET_LATENCY};
pub use error::{Result, SourceError};
pub use pattern::{PatternConnector, PatternSource, PatternSpec};
pub use retry::{RetryConnector, RetryPolicy};
pub use stop::StopSignal;
pub use traits::{FrameSource, SourceConnector};
