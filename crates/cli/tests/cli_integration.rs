// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::process::Command;

fn get_simuart_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_simuart"))
}

#[test]
fn test_cli_json_summary() {
    let output = Command::new(get_simuart_bin())
        .args(["--model", "echo", "--max-ticks", "1000", "--no-trace", "--json"])
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {}", stdout);

    assert!(
        stdout.contains("Terminal opened at /dev/"),
        "PTY path not reported. Stdout: {}",
        stdout
    );

    let last_json = stdout
        .lines()
        .rfind(|l| l.starts_with('{') && l.contains("\"status\""))
        .expect("Summary JSON not found");
    let json: serde_json::Value = serde_json::from_str(last_json).expect("Failed to parse JSON");
    assert_eq!(json["status"], "stopped");
    assert_eq!(json["ticks"], 1000);
    assert_eq!(json["clock_toggles"], 1000);
    assert_eq!(json["model"], "echo");
}

#[test]
fn test_cli_vcd_generation() {
    let dir = tempfile::tempdir().unwrap();
    let vcd_path = dir.path().join("logs").join("dump.vcd");

    let output = Command::new(get_simuart_bin())
        .args(["--max-ticks", "200", "--vcd"])
        .arg(&vcd_path)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let content = std::fs::read_to_string(&vcd_path).unwrap();
    assert!(content.contains("$enddefinitions"));
    assert!(content.contains("source_valid"));
    assert!(content.lines().any(|l| l == "#200"));
}

#[test]
fn test_cli_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("run.yaml");
    std::fs::write(
        &config_path,
        "max_ticks: 64\nmodel: console\ntrace:\n  enabled: false\n",
    )
    .unwrap();

    let output = Command::new(get_simuart_bin())
        .arg("--config")
        .arg(&config_path)
        .arg("--json")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_line = stdout
        .lines()
        .rfind(|l| l.starts_with('{'))
        .expect("Summary JSON not found");
    let json: serde_json::Value = serde_json::from_str(json_line).unwrap();
    assert_eq!(json["ticks"], 64);
    assert_eq!(json["model"], "console");
    assert_eq!(json["model_state"]["booted"], true);
}

#[test]
fn test_cli_missing_config_exit_code() {
    let output = Command::new(get_simuart_bin())
        .args(["--config", "/nonexistent/simuart.yaml"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_bad_trace_path_fails_before_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();

    let output = Command::new(get_simuart_bin())
        .args(["--max-ticks", "10", "--vcd"])
        .arg(blocker.join("dump.vcd"))
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(3));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        !stdout.contains("Terminal opened at"),
        "peer path advertised before trace failed: {}",
        stdout
    );
}
