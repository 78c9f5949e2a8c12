mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "framefeed", version, about = "Polling frame delivery CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "FRAMEFEED_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_watch_defaults() {
        let cli = Cli::try_parse_from(["framefeed", "watch"]).expect("watch should parse");

        let Command::Watch(args) = cli.command else {
            panic!("expected the watch command");
        };
        assert_eq!(args.endpoint, "https://localhost:4443");
        assert_eq!(args.stream, "desktop");
        assert_eq!(args.latency_ms, 500);
        assert_eq!((args.width, args.height), (640, 480));
        assert_eq!(args.fps, 60);
    }

    #[test]
    fn parses_probe_subcommand() {
        let cli = Cli::try_parse_from(["framefeed", "probe", "--timeout", "3s"])
            .expect("probe args should parse");
        assert!(matches!(cli.command, Command::Probe(_)));
    }

    #[test]
    fn rejects_unknown_output_format() {
        let err = Cli::try_parse_from(["framefeed", "--format", "yaml", "doctor"])
            .expect_err("unknown format should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
