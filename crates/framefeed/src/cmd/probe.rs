use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use framefeed_client::ClientRegistry;
use framefeed_session::ConnectionStatus;
use framefeed_source::{PatternConnector, RetryConnector, RetryPolicy, StreamConfig};
use serde::Serialize;

use crate::cmd::ProbeArgs;
use crate::exit::{client_error, stream_error, CliError, CliResult, SUCCESS, TIMEOUT, USAGE};
use crate::output::{status_label, OutputFormat};

#[derive(Serialize)]
struct ProbeOutput {
    schema_id: &'static str,
    endpoint: String,
    stream: String,
    status: String,
    status_code: i32,
    width: u32,
    height: u32,
    first_frame_ms: f64,
    queue_depth: usize,
    connected: bool,
}

pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_timeout(&args.timeout)?;

    let registry = ClientRegistry::new(Arc::new(RetryConnector::new(
        PatternConnector::default(),
        RetryPolicy::default(),
    )));
    let started = Instant::now();
    let handle = registry
        .create(
            StreamConfig::new(&args.endpoint, &args.stream)
                .with_target_latency(Duration::from_millis(args.latency_ms)),
        )
        .map_err(|err| client_error("create failed", err))?;

    // Connect phase first, then the first frame, both on one deadline.
    loop {
        match registry.connection_status(handle) {
            Some(ConnectionStatus::Connected) => break,
            Some(ConnectionStatus::Error(kind)) => {
                registry.destroy(handle);
                return Err(stream_error("probe failed", kind));
            }
            _ => {}
        }
        if started.elapsed() >= timeout {
            registry.destroy(handle);
            return Err(CliError::new(
                TIMEOUT,
                format!("no connection after {timeout:?}"),
            ));
        }
        thread::sleep(Duration::from_millis(10));
    }

    let (info, first_frame) = loop {
        registry.update(handle);
        if let Some(info) = registry.frame_info(handle) {
            break (info, started.elapsed());
        }
        if let Some(ConnectionStatus::Error(kind)) = registry.connection_status(handle) {
            registry.destroy(handle);
            return Err(stream_error("stream failed before the first frame", kind));
        }
        if started.elapsed() >= timeout {
            registry.destroy(handle);
            return Err(CliError::new(TIMEOUT, format!("no frame after {timeout:?}")));
        }
        thread::sleep(Duration::from_millis(5));
    };

    let status = registry.connection_status(handle);
    let status_code = registry.status_code(handle);
    let queue_depth = registry
        .session_stats(handle)
        .map(|s| s.depth)
        .unwrap_or(0);
    registry.destroy(handle);

    let out = ProbeOutput {
        schema_id: "https://schemas.framefeed.dev/cli/v1/probe-report.schema.json",
        endpoint: args.endpoint,
        stream: args.stream,
        status: status_label(status),
        status_code,
        width: info.width,
        height: info.height,
        first_frame_ms: (first_frame.as_secs_f64() * 1000.0 * 100.0).round() / 100.0,
        queue_depth,
        connected: true,
    };

    print_probe(&out, format);
    Ok(SUCCESS)
}

fn print_probe(out: &ProbeOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Stream probe:");
            println!("  Endpoint:     {}", out.endpoint);
            println!("  Stream:       {}", out.stream);
            println!("  Status:       {} ({})", out.status, out.status_code);
            println!(
                "  First frame:  {}x{} after {:.2}ms",
                out.width, out.height, out.first_frame_ms
            );
            println!("  Queue depth:  {}", out.queue_depth);
        }
        OutputFormat::Raw => {
            println!("{}", out.status_code);
        }
    }
}

fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported timeout unit: {unit}"),
        )),
    }
}
