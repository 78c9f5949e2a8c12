use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One-way latch that interrupts blocking waits during teardown.
///
/// Workers and sources park on the latch instead of sleeping so that a
/// destroy on another thread can wake them immediately. Once raised it
/// stays raised. Clones share the latch.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    raised: Mutex<bool>,
    waiters: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal and wakes every parked waiter. Idempotent.
    pub fn raise(&self) {
        let mut raised = self.lock_raised();
        *raised = true;
        self.inner.waiters.notify_all();
    }

    /// True once the signal has been raised.
    pub fn is_raised(&self) -> bool {
        *self.lock_raised()
    }

    /// Parks for up to `timeout` or until the signal is raised, whichever
    /// comes first. Returns whether the signal was raised.
    ///
    /// This is the pacing sleep for sources: an inter-frame wait ends the
    /// instant teardown starts instead of running out its timer.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let raised = self.lock_raised();
        let (raised, _timed_out) = self
            .inner
            .waiters
            .wait_timeout_while(raised, timeout, |raised| !*raised)
            .unwrap_or_else(PoisonError::into_inner);
        *raised
    }

    fn lock_raised(&self) -> MutexGuard<'_, bool> {
        // A thread that panicked while holding the latch must not wedge
        // teardown for everyone else.
        self.inner
            .raised
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
