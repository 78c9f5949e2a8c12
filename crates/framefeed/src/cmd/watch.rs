use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use framefeed_client::ClientRegistry;
use framefeed_frame::rgba_len;
use framefeed_session::{ConnectionStatus, SessionErrorKind};
use framefeed_source::{PatternConnector, PatternSpec, RetryConnector, RetryPolicy, StreamConfig};

use crate::cmd::WatchArgs;
use crate::exit::{client_error, stream_error, CliError, CliResult, SUCCESS};
use crate::output::{
    print_tick, print_watch_report, status_label, OutputFormat, TickReport, WatchReport,
};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let mut spec = PatternSpec::default()
        .with_resolution(args.width, args.height)
        .with_fps(args.fps);
    if let Some(limit) = args.frames {
        spec = spec.with_frame_limit(limit);
    }

    let mut registry = ClientRegistry::new(Arc::new(RetryConnector::new(
        PatternConnector::new(spec),
        RetryPolicy::default(),
    )));
    if let Some(capacity) = args.queue_capacity {
        registry = registry.with_queue_capacity(capacity);
    }

    let handle = registry
        .create(
            StreamConfig::new(&args.endpoint, &args.stream)
                .with_target_latency(Duration::from_millis(args.latency_ms)),
        )
        .map_err(|err| client_error("create failed", err))?;
    tracing::info!(
        handle = %handle,
        endpoint = %args.endpoint,
        stream = %args.stream,
        "session created"
    );

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let started = Instant::now();
    let tick = Duration::from_millis(args.tick_ms);
    let mut buf = Vec::new();
    let mut delivered = 0u64;

    while running.load(Ordering::SeqCst) {
        let live = registry.update(handle);

        let mut got_frame = false;
        if let Some(info) = registry.frame_info(handle) {
            let len = rgba_len(info.width, info.height).unwrap_or(0);
            if buf.len() < len {
                buf.resize(len, 0);
            }
            if registry.copy_frame_data(handle, &mut buf) {
                delivered += 1;
                got_frame = true;
                let depth = registry
                    .session_stats(handle)
                    .map(|s| s.depth)
                    .unwrap_or(0);
                print_tick(
                    &TickReport {
                        schema_id: "https://schemas.framefeed.dev/cli/v1/frame-tick.schema.json",
                        frame: delivered,
                        width: info.width,
                        height: info.height,
                        bytes: len,
                        queue_depth: depth,
                        status: status_label(registry.connection_status(handle)),
                    },
                    &buf[..len],
                    format,
                );
            }
        }

        if let Some(limit) = args.frames {
            if delivered >= limit {
                break;
            }
        }
        if !live && !got_frame {
            break;
        }
        // A dead session with frames still queued is drained without
        // pacing; everything else waits out the tick.
        if live || !got_frame {
            thread::sleep(tick);
        }
    }

    let status = registry.connection_status(handle);
    let status_code = registry.status_code(handle);
    let stats = registry.session_stats(handle);
    registry.destroy(handle);

    print_watch_report(
        &WatchReport {
            schema_id: "https://schemas.framefeed.dev/cli/v1/watch-report.schema.json",
            endpoint: args.endpoint,
            stream: args.stream,
            frames_delivered: delivered,
            frames_dropped: stats.map(|s| s.queue.dropped).unwrap_or(0),
            elapsed_ms: started.elapsed().as_millis() as u64,
            status: status_label(status),
            status_code,
        },
        format,
    );

    match status {
        Some(ConnectionStatus::Error(kind)) if kind != SessionErrorKind::StreamEnded => {
            Err(stream_error("stream failed", kind))
        }
        _ => Ok(SUCCESS),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
