#![cfg(feature = "cli")]

use std::process::Command;

#[test]
fn watch_delivers_the_requested_frames_and_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_framefeed"))
        .arg("--log-level")
        .arg("error")
        .arg("--format")
        .arg("json")
        .arg("watch")
        .arg("--frames")
        .arg("3")
        .arg("--tick-ms")
        .arg("1")
        .arg("--fps")
        .arg("1000")
        .arg("--width")
        .arg("32")
        .arg("--height")
        .arg("16")
        .output()
        .expect("watch should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let ticks: Vec<&str> = stdout
        .lines()
        .filter(|line| line.contains("frame-tick.schema.json"))
        .collect();
    assert_eq!(ticks.len(), 3, "stdout: {stdout}");

    let first: serde_json::Value = serde_json::from_str(ticks[0]).expect("tick should be json");
    assert_eq!(first.get("width").and_then(|v| v.as_u64()), Some(32));
    assert_eq!(first.get("height").and_then(|v| v.as_u64()), Some(16));
    assert_eq!(
        first.get("bytes").and_then(|v| v.as_u64()),
        Some(32 * 16 * 4)
    );
    assert!(stdout.contains("watch-report.schema.json"));
}

#[test]
fn probe_reports_first_frame_dimensions() {
    let output = Command::new(env!("CARGO_BIN_EXE_framefeed"))
        .arg("--log-level")
        .arg("error")
        .arg("--format")
        .arg("json")
        .arg("probe")
        .arg("--timeout")
        .arg("10s")
        .output()
        .expect("probe should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("probe-report.schema.json"));

    let payload: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("probe should emit json");
    assert_eq!(payload.get("width").and_then(|v| v.as_u64()), Some(640));
    assert_eq!(payload.get("height").and_then(|v| v.as_u64()), Some(480));
    assert_eq!(payload.get("status_code").and_then(|v| v.as_i64()), Some(2));
}

#[test]
fn probe_times_out_with_124() {
    let output = Command::new(env!("CARGO_BIN_EXE_framefeed"))
        .arg("probe")
        .arg("--timeout")
        .arg("1ms")
        .output()
        .expect("probe should run");

    assert_eq!(output.status.code(), Some(124));
}

#[test]
fn probe_rejects_bad_timeout_with_64() {
    let output = Command::new(env!("CARGO_BIN_EXE_framefeed"))
        .arg("probe")
        .arg("--timeout")
        .arg("soon")
        .output()
        .expect("probe should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn doctor_passes_on_clean_env() {
    let output = Command::new(env!("CARGO_BIN_EXE_framefeed"))
        .arg("--format")
        .arg("json")
        .arg("doctor")
        .output()
        .expect("doctor should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("doctor-report.schema.json"));
}

#[test]
fn envinfo_reports_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_framefeed"))
        .arg("--format")
        .arg("json")
        .arg("envinfo")
        .output()
        .expect("envinfo should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("envinfo.schema.json"));
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("envinfo should emit json");
    assert_eq!(
        payload.get("version").and_then(|v| v.as_str()),
        Some(env!("CARGO_PKG_VERSION"))
    );
}
