use framefeed_frame::{FrameInfo, FrameQueue, PushOutcome, QueueStats, VideoFrame};
use framefeed_source::{SourceConnector, StopSignal, StreamConfig};
use tracing::warn;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::error::Result;
use crate::status::ConnectionStatus;
use crate::worker;

/// Point-in-time counters for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub status: ConnectionStatus,
    /// Frames currently queued and not yet popped by `update`.
    pub depth: usize,
    pub queue: QueueStats,
}

/// State shared between the worker thread and pollers. One lock covers
/// status, queue, and the current-frame slot so every observation is
/// coherent; nothing holds it across a blocking operation.
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<State>,
}

#[derive(Debug)]
pub(crate) struct State {
    pub(crate) status: ConnectionStatus,
    pub(crate) queue: FrameQueue,
    pub(crate) current: Option<VideoFrame>,
    pub(crate) unread: bool,
}

impl Shared {
    pub(crate) fn new(queue_capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                status: ConnectionStatus::Disconnected,
                queue: FrameQueue::new(queue_capacity),
                current: None,
                unread: false,
            }),
        }
    }

    /// Locks the state. Poisoning is swallowed: a worker that panicked
    /// mid-push must not take every poller down with it.
    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the status machine forward. Illegal moves, in particular any
    /// attempt to leave `Error`, are ignored.
    pub(crate) fn advance_status(&self, next: ConnectionStatus) -> bool {
        let mut state = self.state();
        if state.status.can_advance_to(next) {
            state.status = next;
            true
        } else {
            false
        }
    }

    pub(crate) fn offer_frame(&self, frame: VideoFrame) -> PushOutcome {
        self.state().queue.push(frame)
    }
}

/// One client's delivery pipeline: a dedicated worker thread feeding a
/// bounded queue that a poller drains.
///
/// Every method is callable from any thread. Polling methods never block
/// beyond the short state lock; only [`Session::shutdown`] waits, for the
/// worker join.
#[derive(Debug)]
pub struct Session {
    shared: Arc<Shared>,
    stop: StopSignal,
    worker: Mutex<Option<JoinHandle<()>>>,
    config: StreamConfig,
}

impl Session {
    /// Spawns the worker thread and returns the running session.
    ///
    /// The worker owns the connect attempt: connection failures surface
    /// later through [`Session::status`], never here. Construction fails
    /// only when the thread itself cannot be spawned.
    pub fn spawn(
        config: StreamConfig,
        connector: Arc<dyn SourceConnector>,
        queue_capacity: usize,
    ) -> Result<Self> {
        let shared = Arc::new(Shared::new(queue_capacity));
        let stop = StopSignal::new();

        let worker_shared = Arc::clone(&shared);
        let worker_stop = stop.clone();
        let worker_config = config.clone();
        let handle = thread::Builder::new()
            .name(format!("framefeed-{}", config.stream))
            .spawn(move || worker::run(worker_shared, worker_stop, connector, worker_config))?;

        Ok(Self {
            shared,
            stop,
            worker: Mutex::new(Some(handle)),
            config,
        })
    }

    /// Pops the oldest queued frame into the current-frame slot and marks
    /// it unread. At most one frame moves per call; an empty queue leaves
    /// the slot and its unread mark alone.
    ///
    /// The return value is liveness: true until the session has hit its
    /// terminal error.
    pub fn update(&self) -> bool {
        let mut state = self.shared.state();
        if let Some(frame) = state.queue.pop() {
            state.current = Some(frame);
            state.unread = true;
        }
        state.status.is_live()
    }

    /// Dimensions of the unread frame in the slot, if one is waiting.
    pub fn frame_info(&self) -> Option<FrameInfo> {
        let state = self.shared.state();
        if state.unread {
            state.current.as_ref().map(VideoFrame::info)
        } else {
            None
        }
    }

    /// Copies the unread frame's pixels into `buf` and marks the frame
    /// read.
    ///
    /// The copy happens only when an unread frame is present and `buf` is
    /// at least `width * height * 4` bytes long; exactly that many bytes
    /// are written. On every other outcome `buf` is untouched. A second
    /// call without a fresh `update` returns false.
    pub fn copy_frame_data(&self, buf: &mut [u8]) -> bool {
        let mut state = self.shared.state();
        if !state.unread {
            return false;
        }
        let Some(frame) = state.current.as_ref() else {
            return false;
        };
        let len = frame.byte_len();
        if buf.len() < len {
            return false;
        }
        buf[..len].copy_from_slice(frame.data());
        state.unread = false;
        true
    }

    pub fn status(&self) -> ConnectionStatus {
        self.shared.state().status
    }

    pub fn stats(&self) -> SessionStats {
        let state = self.shared.state();
        SessionStats {
            status: state.status,
            depth: state.queue.len(),
            queue: state.queue.stats(),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Raises the stop signal and joins the worker. Idempotent; `Drop`
    /// calls it too, so an unjoined worker never outlives its session.
    pub fn shutdown(&self) {
        self.stop.raise();
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!(stream = %self.config.stream, "session worker panicked before join");
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
