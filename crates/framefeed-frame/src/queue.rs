use std::collections::VecDeque;

use crate::frame::VideoFrame;

/// Queue depth used when the owner does not configure one. Five frames is
/// roughly 80 ms of backlog at 60 fps, enough to ride out consumer jitter
/// without letting delivery drift far behind the producer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 5;

/// Outcome of a [`FrameQueue::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The frame was accepted and queued.
    Queued,
    /// The queue was full; the incoming frame was discarded.
    DroppedNewest,
}

/// Lifetime counters for one queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Frames accepted by `push`.
    pub pushed: u64,
    /// Frames handed to the consumer by `pop`.
    pub popped: u64,
    /// Frames discarded because the queue was full.
    pub dropped: u64,
}

/// Bounded FIFO hand-off buffer between a producer and a polling consumer.
///
/// Overflow policy is drop-newest: once `capacity` frames are queued,
/// further pushes discard the incoming frame and leave the queue untouched.
/// Accepted frames are never evicted, so the consumer always drains the
/// oldest contiguous run of frames in production order. When the consumer
/// stalls, delivery goes stale rather than skipping ahead; the stall is
/// visible in [`QueueStats::dropped`].
///
/// The queue is not internally synchronized. Exactly one session owns it
/// and guards it with the session lock.
#[derive(Debug)]
pub struct FrameQueue {
    frames: VecDeque<VideoFrame>,
    capacity: usize,
    stats: QueueStats,
}

impl FrameQueue {
    /// Creates a queue holding at most `capacity` frames. A capacity of
    /// zero is clamped to one so the queue can always make progress.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
            stats: QueueStats::default(),
        }
    }

    /// Appends `frame` unless the queue is full.
    pub fn push(&mut self, frame: VideoFrame) -> PushOutcome {
        if self.frames.len() >= self.capacity {
            self.stats.dropped = self.stats.dropped.saturating_add(1);
            return PushOutcome::DroppedNewest;
        }
        self.frames.push_back(frame);
        self.stats.pushed = self.stats.pushed.saturating_add(1);
        PushOutcome::Queued
    }

    /// Removes and returns the oldest queued frame.
    pub fn pop(&mut self) -> Option<VideoFrame> {
        let frame = self.frames.pop_front();
        if frame.is_some() {
            self.stats.popped = self.stats.popped.saturating_add(1);
        }
        frame
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}
