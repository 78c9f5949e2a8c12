use std::sync::Arc;
use std::time::Duration;

use framefeed_frame::rgba_len;
use framefeed_session::Session;
use framefeed_source::{PatternConnector, PatternSpec, SourceConnector, StopSignal, StreamConfig};
use serde::Serialize;

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = vec![
        worker_thread_check(),
        pattern_frame_check(),
        queue_capacity_env_check(),
        compiled_features_check(),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput {
        schema_id: "https://schemas.framefeed.dev/cli/v1/doctor-report.schema.json",
        checks,
        overall,
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn worker_thread_check() -> CheckResult {
    let spec = PatternSpec::default()
        .with_resolution(8, 8)
        .with_fps(10_000)
        .with_connect_delay(Duration::ZERO)
        .with_frame_limit(1);
    match Session::spawn(
        StreamConfig::new("https://localhost:4443", "doctor"),
        Arc::new(PatternConnector::new(spec)),
        1,
    ) {
        Ok(session) => {
            session.shutdown();
            CheckResult {
                name: "worker_threads".to_string(),
                status: CheckStatus::Pass,
                detail: "session worker spawned and joined".to_string(),
            }
        }
        Err(err) => CheckResult {
            name: "worker_threads".to_string(),
            status: CheckStatus::Fail,
            detail: format!("session spawn failed: {err}"),
        },
    }
}

fn pattern_frame_check() -> CheckResult {
    let connector =
        PatternConnector::new(PatternSpec::default().with_connect_delay(Duration::ZERO));
    let stop = StopSignal::new();
    let config = StreamConfig::new("https://localhost:4443", "doctor");

    let result = connector
        .connect(&config, &stop)
        .and_then(|mut source| source.next_frame(&stop));
    match result {
        Ok(Some(frame)) if Some(frame.byte_len()) == rgba_len(frame.width(), frame.height()) => {
            CheckResult {
                name: "pattern_frames".to_string(),
                status: CheckStatus::Pass,
                detail: format!("{}x{} RGBA frame generated", frame.width(), frame.height()),
            }
        }
        Ok(Some(frame)) => CheckResult {
            name: "pattern_frames".to_string(),
            status: CheckStatus::Fail,
            detail: format!(
                "frame byte length {} does not match its dimensions",
                frame.byte_len()
            ),
        },
        Ok(None) => CheckResult {
            name: "pattern_frames".to_string(),
            status: CheckStatus::Fail,
            detail: "pattern stream ended before producing a frame".to_string(),
        },
        Err(err) => CheckResult {
            name: "pattern_frames".to_string(),
            status: CheckStatus::Fail,
            detail: format!("pattern source failed: {err}"),
        },
    }
}

fn queue_capacity_env_check() -> CheckResult {
    let value = match std::env::var("FRAMEFEED_QUEUE_CAPACITY") {
        Ok(value) => value,
        Err(_) => {
            return CheckResult {
                name: "queue_capacity_env".to_string(),
                status: CheckStatus::Skip,
                detail: "FRAMEFEED_QUEUE_CAPACITY not set".to_string(),
            }
        }
    };

    match value.parse::<usize>() {
        Ok(0) => CheckResult {
            name: "queue_capacity_env".to_string(),
            status: CheckStatus::Warn,
            detail: "capacity 0 is clamped to 1 at runtime".to_string(),
        },
        Ok(capacity) => CheckResult {
            name: "queue_capacity_env".to_string(),
            status: CheckStatus::Pass,
            detail: format!("queue capacity override {capacity}"),
        },
        Err(_) => CheckResult {
            name: "queue_capacity_env".to_string(),
            status: CheckStatus::Fail,
            detail: format!("not an integer: {value}"),
        },
    }
}

fn compiled_features_check() -> CheckResult {
    let mut features = Vec::new();
    if cfg!(feature = "client") {
        features.push("client");
    }
    if cfg!(feature = "cli") {
        features.push("cli");
    }

    CheckResult {
        name: "compiled_features".to_string(),
        status: CheckStatus::Info,
        detail: features.join(", "),
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("framefeed doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<22} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_and_pattern_checks_pass_locally() {
        assert!(matches!(worker_thread_check().status, CheckStatus::Pass));
        assert!(matches!(pattern_frame_check().status, CheckStatus::Pass));
    }

    #[test]
    fn doctor_output_has_overall_status() {
        let checks = vec![CheckResult {
            name: "x".to_string(),
            status: CheckStatus::Pass,
            detail: "ok".to_string(),
        }];
        let output = DoctorOutput {
            schema_id: "x",
            checks,
            overall: "pass",
        };
        let json = serde_json::to_string(&output).expect("doctor output should serialize");
        assert!(json.contains("\"overall\":\"pass\""));
    }
}
