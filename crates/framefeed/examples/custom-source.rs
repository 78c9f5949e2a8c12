//! Plugging a custom frame source into the registry.
//!
//! Implements a solid-color source behind the connector seam and polls it
//! the same way a real stream would be polled.
//!
//! Run with:
//!   cargo run --example custom-source

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use framefeed::client::ClientRegistry;
use framefeed::frame::VideoFrame;
use framefeed::source::{
    FrameSource, Result as SourceResult, SourceConnector, SourceError, StopSignal, StreamConfig,
};

/// Emits solid-color frames, cycling through a tiny palette.
struct SolidSource {
    width: u32,
    height: u32,
    emitted: u64,
    count: u64,
}

impl FrameSource for SolidSource {
    fn next_frame(&mut self, stop: &StopSignal) -> SourceResult<Option<VideoFrame>> {
        if self.emitted >= self.count {
            return Ok(None);
        }
        if self.emitted > 0 && stop.wait_timeout(Duration::from_millis(33)) {
            return Err(SourceError::Interrupted);
        }

        let palette = [
            [0xE8, 0x4A, 0x5F, 0xFF],
            [0x4A, 0x90, 0xE8, 0xFF],
            [0x50, 0xC8, 0x78, 0xFF],
        ];
        let color = palette[(self.emitted % 3) as usize];
        let pixels: Vec<u8> = color
            .iter()
            .copied()
            .cycle()
            .take((self.width as usize) * (self.height as usize) * 4)
            .collect();

        let frame = VideoFrame::new(self.width, self.height, self.emitted * 33_000, pixels)
            .map_err(|err| SourceError::Decode(err.to_string()))?;
        self.emitted += 1;
        Ok(Some(frame))
    }
}

struct SolidConnector;

impl SourceConnector for SolidConnector {
    fn connect(
        &self,
        _config: &StreamConfig,
        _stop: &StopSignal,
    ) -> SourceResult<Box<dyn FrameSource>> {
        Ok(Box::new(SolidSource {
            width: 320,
            height: 240,
            emitted: 0,
            count: 6,
        }))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ClientRegistry::new(Arc::new(SolidConnector));
    let handle = registry.create(StreamConfig::new("custom://palette", "solid"))?;

    let mut buf = vec![0u8; 320 * 240 * 4];
    let mut delivered = 0u32;
    while delivered < 6 {
        registry.update(handle);
        if registry.copy_frame_data(handle, &mut buf) {
            delivered += 1;
            eprintln!(
                "Frame {delivered}: first pixel #{:02X}{:02X}{:02X}",
                buf[0], buf[1], buf[2]
            );
        } else {
            thread::sleep(Duration::from_millis(5));
        }
    }

    registry.destroy(handle);
    Ok(())
}
