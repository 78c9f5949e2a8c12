use bytes::{BufMut, BytesMut};
use framefeed_frame::{VideoFrame, BYTES_PER_PIXEL};
use tracing::debug;

use std::time::Duration;

use crate::config::StreamConfig;
use crate::error::{Result, SourceError};
use crate::stop::StopSignal;
use crate::traits::{FrameSource, SourceConnector};

/// Shape of the synthetic stream a [`PatternConnector`] produces.
#[derive(Debug, Clone)]
pub struct PatternSpec {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Simulated connection establishment time.
    pub connect_delay: Duration,
    /// Stop after this many frames and report end of stream. `None` runs
    /// until interrupted.
    pub frame_limit: Option<u64>,
}

impl Default for PatternSpec {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 60,
            connect_delay: Duration::from_millis(500),
            frame_limit: None,
        }
    }
}

impl PatternSpec {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Microseconds between frames, rounded to the nearest whole step.
    /// 60 fps comes out at 16 667 us.
    fn interval_us(&self) -> u64 {
        let fps = u64::from(self.fps.max(1));
        (1_000_000 + fps / 2) / fps
    }
}

/// Connector producing a deterministic animated gradient instead of
/// touching any network.
///
/// This is the stand-in producer for development, diagnostics, and tests:
/// it honors the full source contract (connect delay, pacing, stop
/// interruption, optional end of stream) with pixel content that can be
/// predicted exactly.
#[derive(Debug, Clone, Default)]
pub struct PatternConnector {
    spec: PatternSpec,
}

impl PatternConnector {
    pub fn new(spec: PatternSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &PatternSpec {
        &self.spec
    }
}

impl SourceConnector for PatternConnector {
    fn connect(&self, config: &StreamConfig, stop: &StopSignal) -> Result<Box<dyn FrameSource>> {
        debug!(
            endpoint = %config.endpoint,
            stream = %config.stream,
            delay_ms = self.spec.connect_delay.as_millis() as u64,
            "pattern connector simulating connection establishment"
        );
        if stop.wait_timeout(self.spec.connect_delay) {
            return Err(SourceError::Interrupted);
        }
        Ok(Box::new(PatternSource::new(self.spec.clone())))
    }
}

/// A connected pattern stream. See [`PatternConnector`].
#[derive(Debug)]
pub struct PatternSource {
    spec: PatternSpec,
    interval_us: u64,
    next_index: u64,
}

impl PatternSource {
    pub fn new(spec: PatternSpec) -> Self {
        let interval_us = spec.interval_us();
        Self {
            spec,
            interval_us,
            next_index: 0,
        }
    }

    /// Builds frame `n` of the gradient: per pixel,
    /// `r = (x + n) % 255`, `g = (y + 2n) % 255`, `b = (x + y + 3n) % 255`,
    /// alpha opaque. Timestamps advance by the frame interval.
    fn generate(&self, n: u64) -> Result<VideoFrame> {
        let width = self.spec.width;
        let height = self.spec.height;
        let mut buf = BytesMut::with_capacity(
            (width as usize).saturating_mul(height as usize) * BYTES_PER_PIXEL,
        );
        for y in 0..u64::from(height) {
            for x in 0..u64::from(width) {
                buf.put_u8(((x + n) % 255) as u8);
                buf.put_u8(((y + 2 * n) % 255) as u8);
                buf.put_u8(((x + y + 3 * n) % 255) as u8);
                buf.put_u8(0xFF);
            }
        }
        VideoFrame::new(width, height, n * self.interval_us, buf.freeze())
            .map_err(|err| SourceError::Decode(err.to_string()))
    }
}

impl FrameSource for PatternSource {
    fn next_frame(&mut self, stop: &StopSignal) -> Result<Option<VideoFrame>> {
        if let Some(limit) = self.spec.frame_limit {
            if self.next_index >= limit {
                return Ok(None);
            }
        }
        // The first frame is immediate; later ones wait out the interval.
        if self.next_index > 0 && stop.wait_timeout(Duration::from_micros(self.interval_us)) {
            return Err(SourceError::Interrupted);
        }
        let frame = self.generate(self.next_index)?;
        self.next_index += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_spec() -> PatternSpec {
        // High fps keeps inter-frame waits negligible in tests.
        PatternSpec::default()
            .with_resolution(16, 8)
            .with_fps(10_000)
            .with_connect_delay(Duration::ZERO)
    }

    fn pixel(frame: &VideoFrame, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * frame.width() + x) as usize) * BYTES_PER_PIXEL;
        frame.data()[idx..idx + 4]
            .try_into()
            .expect("pixel slice should be four bytes")
    }

    #[test]
    fn test_gradient_pixels_are_deterministic() {
        let mut source = PatternSource::new(fast_spec());
        let stop = StopSignal::new();

        let frame0 = source
            .next_frame(&stop)
            .expect("frame 0 should generate")
            .expect("stream should not end");
        assert_eq!(pixel(&frame0, 10, 5), [10, 5, 15, 0xFF]);

        let frame1 = source
            .next_frame(&stop)
            .expect("frame 1 should generate")
            .expect("stream should not end");
        assert_eq!(pixel(&frame1, 10, 5), [11, 7, 18, 0xFF]);
    }

    #[test]
    fn test_timestamps_advance_by_interval() {
        let spec = fast_spec().with_fps(60);
        let interval = spec.interval_us();
        assert_eq!(interval, 16_667);

        // Pace manually through generate to keep the test sleep-free.
        let source = PatternSource::new(spec);
        let ts: Vec<u64> = (0..3)
            .map(|n| {
                source
                    .generate(n)
                    .expect("frame should generate")
                    .timestamp_us()
            })
            .collect();
        assert_eq!(ts, vec![0, 16_667, 33_334]);
    }

    #[test]
    fn test_frame_limit_reports_end_of_stream() {
        let mut source = PatternSource::new(fast_spec().with_frame_limit(2));
        let stop = StopSignal::new();
        assert!(source
            .next_frame(&stop)
            .expect("frame 0 should generate")
            .is_some());
        assert!(source
            .next_frame(&stop)
            .expect("frame 1 should generate")
            .is_some());
        assert!(source
            .next_frame(&stop)
            .expect("end of stream is not an error")
            .is_none());
        assert!(source
            .next_frame(&stop)
            .expect("end of stream should be stable")
            .is_none());
    }

    #[test]
    fn test_connect_interrupted_by_raised_stop() {
        let connector = PatternConnector::new(
            PatternSpec::default().with_connect_delay(Duration::from_secs(60)),
        );
        let stop = StopSignal::new();
        stop.raise();

        let config = StreamConfig::new("https://relay.example", "desktop");
        let err = connector
            .connect(&config, &stop)
            .err()
            .expect("connect should be interrupted");
        assert!(err.is_interrupted());
    }

    #[test]
    fn test_pacing_wait_interrupted_by_raised_stop() {
        let mut source = PatternSource::new(fast_spec().with_fps(1));
        let stop = StopSignal::new();
        assert!(source
            .next_frame(&stop)
            .expect("first frame is immediate")
            .is_some());

        stop.raise();
        let err = source
            .next_frame(&stop)
            .err()
            .expect("paced frame should be interrupted");
        assert!(err.is_interrupted());
    }

    #[test]
    fn test_malformed_spec_surfaces_as_decode_error() {
        let mut source = PatternSource::new(fast_spec().with_resolution(0, 8));
        let stop = StopSignal::new();
        let err = source
            .next_frame(&stop)
            .err()
            .expect("zero-width frames should not generate");
        assert!(matches!(err, SourceError::Decode(_)));
    }
}
