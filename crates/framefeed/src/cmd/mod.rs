use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod doctor;
pub mod envinfo;
pub mod probe;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll a stream and print every delivered frame.
    Watch(WatchArgs),
    /// Connect, wait for the first frame, and report stream metadata.
    Probe(ProbeArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Probe(args) => probe::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Relay endpoint URL.
    #[arg(long, default_value = "https://localhost:4443")]
    pub endpoint: String,
    /// Stream path under the endpoint.
    #[arg(long, short = 's', default_value = "desktop")]
    pub stream: String,
    /// Target end-to-end latency hint in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub latency_ms: u64,
    /// Stream width in pixels.
    #[arg(long, default_value_t = 640)]
    pub width: u32,
    /// Stream height in pixels.
    #[arg(long, default_value_t = 480)]
    pub height: u32,
    /// Frame rate of the generated stream.
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
    /// Stop after this many frames.
    #[arg(long)]
    pub frames: Option<u64>,
    /// Poll interval in milliseconds.
    #[arg(long, default_value_t = 16)]
    pub tick_ms: u64,
    /// Per-session frame queue capacity.
    #[arg(long, env = "FRAMEFEED_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Relay endpoint URL.
    #[arg(long, default_value = "https://localhost:4443")]
    pub endpoint: String,
    /// Stream path under the endpoint.
    #[arg(long, short = 's', default_value = "desktop")]
    pub stream: String,
    /// Target end-to-end latency hint in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub latency_ms: u64,
    /// Give up after this long (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}
