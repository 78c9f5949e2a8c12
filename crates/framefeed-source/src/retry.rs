use tracing::{debug, warn};

use std::time::Duration;

use crate::config::StreamConfig;
use crate::error::{Result, SourceError};
use crate::stop::StopSignal;
use crate::traits::{FrameSource, SourceConnector};

/// Bounded exponential backoff for connect attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total connect attempts, including the first. Clamped to at least 1.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry` (zero-based): doubles each time,
    /// capped at `max_backoff`.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.min(16);
        (self.initial_backoff * factor).min(self.max_backoff)
    }
}

/// Wraps a connector with bounded connect retries.
///
/// Sessions themselves never reconnect: a failed connect is terminal for
/// the session, and callers opt into recovery by layering this decorator
/// over their connector. Backoff waits park on the stop signal, so a
/// destroy racing a backoff returns immediately.
#[derive(Debug, Clone)]
pub struct RetryConnector<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: SourceConnector> RetryConnector<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<C: SourceConnector> SourceConnector for RetryConnector<C> {
    fn connect(&self, config: &StreamConfig, stop: &StopSignal) -> Result<Box<dyn FrameSource>> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut failed = 0u32;
        loop {
            match self.inner.connect(config, stop) {
                Ok(source) => {
                    if failed > 0 {
                        debug!(
                            endpoint = %config.endpoint,
                            attempts = failed + 1,
                            "connect succeeded after retries"
                        );
                    }
                    return Ok(source);
                }
                Err(err) if err.is_interrupted() => return Err(err),
                Err(err) => {
                    failed += 1;
                    if failed >= max_attempts {
                        return Err(err);
                    }
                    let backoff = self.policy.backoff_for(failed - 1);
                    warn!(
                        endpoint = %config.endpoint,
                        attempt = failed,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "connect attempt failed, backing off"
                    );
                    if stop.wait_timeout(backoff) {
                        return Err(SourceError::Interrupted);
                    }
                }
            }
        }
    }
}
