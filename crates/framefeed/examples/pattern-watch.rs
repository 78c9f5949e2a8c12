//! Minimal polling loop — create a session, drain ten frames, destroy.
//!
//! Run with:
//!   cargo run --example pattern-watch

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use framefeed::client::ClientRegistry;
use framefeed::frame::rgba_len;
use framefeed::source::{PatternConnector, PatternSpec, StreamConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let connector = PatternConnector::new(
        PatternSpec::default()
            .with_connect_delay(Duration::from_millis(100))
            .with_frame_limit(10),
    );
    let registry = ClientRegistry::new(Arc::new(connector));
    let handle = registry.create(StreamConfig::new("https://localhost:4443", "desktop"))?;
    eprintln!("Session created, handle {handle}");

    let mut buf = Vec::new();
    let mut delivered = 0u32;
    loop {
        let live = registry.update(handle);
        if let Some(info) = registry.frame_info(handle) {
            let len = rgba_len(info.width, info.height).unwrap_or(0);
            buf.resize(len, 0);
            if registry.copy_frame_data(handle, &mut buf) {
                delivered += 1;
                eprintln!(
                    "Frame {delivered}: {}x{} ({} bytes)",
                    info.width,
                    info.height,
                    buf.len()
                );
            }
        } else if !live {
            break;
        } else {
            thread::sleep(Duration::from_millis(16));
        }
    }

    eprintln!("Stream over, final status {}", registry.status_code(handle));
    registry.destroy(handle);
    Ok(())
}
