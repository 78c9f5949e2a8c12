use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use framefeed_session::ConnectionStatus;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One delivered frame, as reported by `watch`.
#[derive(Serialize)]
pub struct TickReport {
    pub schema_id: &'static str,
    pub frame: u64,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub queue_depth: usize,
    pub status: String,
}

/// Summary printed once `watch` stops polling.
#[derive(Serialize)]
pub struct WatchReport {
    pub schema_id: &'static str,
    pub endpoint: String,
    pub stream: String,
    pub frames_delivered: u64,
    pub frames_dropped: u64,
    pub elapsed_ms: u64,
    pub status: String,
    pub status_code: i32,
}

pub fn print_tick(tick: &TickReport, pixels: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(tick).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FRAME", "SIZE", "BYTES", "QUEUE", "STATUS"])
                .add_row(vec![
                    tick.frame.to_string(),
                    format!("{}x{}", tick.width, tick.height),
                    tick.bytes.to_string(),
                    tick.queue_depth.to_string(),
                    tick.status.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame={} size={}x{} bytes={} queue={} status={}",
                tick.frame, tick.width, tick.height, tick.bytes, tick.queue_depth, tick.status
            );
        }
        OutputFormat::Raw => {
            print_raw(pixels);
        }
    }
}

pub fn print_watch_report(report: &WatchReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("watch summary\n");
            println!("  Stream:     {} ({})", report.stream, report.endpoint);
            println!(
                "  Delivered:  {} frames in {} ms",
                report.frames_delivered, report.elapsed_ms
            );
            println!("  Dropped:    {}", report.frames_dropped);
            println!("  Status:     {} ({})", report.status, report.status_code);
        }
        // Raw keeps stdout a pure pixel stream.
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn status_label(status: Option<ConnectionStatus>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => "not found".to_string(),
    }
}
