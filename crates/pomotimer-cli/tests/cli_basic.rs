//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory and
//! verify its output.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn cli(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pomotimer"));
    cmd.env("POMOTIMER_CONFIG_DIR", config_dir.path())
        .env_remove("POMOTIMER_LOG");
    cmd
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &TempDir, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = cli(config_dir)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    // Commands that never read stdin may already have exited.
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(config_dir: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(config_dir, args, "");
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_simulate_first_tick() {
    let dir = TempDir::new().unwrap();
    let stdout = run_ok(&dir, &["timer", "simulate", "toggle tick"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["type"], "StateSnapshot");
    assert_eq!(json["display"], "24:59");
    assert_eq!(json["state"]["mode"], "work");
    assert_eq!(json["state"]["is_running"], true);
    assert_eq!(json["primary_label"], "Pause");
}

#[test]
fn test_simulate_work_session_ends_in_break() {
    let dir = TempDir::new().unwrap();
    let stdout = run_ok(&dir, &["timer", "simulate", "--clock", "toggle tick*1501"]);
    assert_eq!(stdout.trim(), "05:00");
}

#[test]
fn test_simulate_pause_freezes_clock() {
    let dir = TempDir::new().unwrap();
    let stdout = run_ok(&dir, &["timer", "simulate", "--clock", "toggle,tick*9,pause,tick*100"]);
    assert_eq!(stdout.trim(), "24:51");
}

#[test]
fn test_simulate_events() {
    let dir = TempDir::new().unwrap();
    let stdout = run_ok(&dir, &["timer", "simulate", "--events", "toggle tick reset"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let types: Vec<_> = json["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types, vec!["TimerStarted", "Ticked", "TimerReset"]);
    assert_eq!(json["final_state"]["minutes"], 25);
}

#[test]
fn test_simulate_rejects_bad_script() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["timer", "simulate", "toggle fly"], "");
    assert_ne!(code, 0);
    assert!(stderr.contains("fly"), "stderr: {stderr}");
}

#[test]
fn test_run_renders_controls() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(&dir, &["timer", "run"], "s\nr\nq\n");
    assert_eq!(code, 0, "run failed: {stderr}");

    let lines: Vec<&str> = stdout.lines().skip(1).collect();
    assert_eq!(lines[0], "WORK  25:00  [Start] [Reset]");
    assert!(lines[1].ends_with("[Pause] [Reset]"), "got {lines:?}");
    assert_eq!(lines.last().copied(), Some("WORK  25:00  [Start] [Reset]"));
}

#[test]
fn test_run_respects_ui_config() {
    let dir = TempDir::new().unwrap();
    run_ok(&dir, &["config", "set", "ui.show_controls", "false"]);
    run_ok(&dir, &["config", "set", "ui.show_mode", "false"]);

    let (stdout, _, code) = run_cli(&dir, &["timer", "run"], "q\n");
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().nth(1), Some("25:00"));
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_ok(&dir, &["config", "get", "keys.toggle"]).trim(), "s");

    run_ok(&dir, &["config", "set", "keys.toggle", "go"]);
    assert_eq!(run_ok(&dir, &["config", "get", "keys.toggle"]).trim(), "go");

    run_ok(&dir, &["config", "reset"]);
    assert_eq!(run_ok(&dir, &["config", "get", "keys.toggle"]).trim(), "s");
}

#[test]
fn test_config_path_is_inside_override_dir() {
    let dir = TempDir::new().unwrap();
    let stdout = run_ok(&dir, &["config", "path"]);
    assert!(stdout.trim().ends_with("config.toml"));
    assert!(stdout.contains(dir.path().to_str().unwrap()));
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["config", "set", "work.minutes", "50"], "");
    assert_ne!(code, 0);
    assert!(stderr.contains("work.minutes"));
}

fn config_dir_is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().next().is_none()
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    let stdout = run_ok(&dir, &["completions", "bash"]);
    assert!(stdout.contains("pomotimer"));
    assert!(config_dir_is_empty(&dir));
}

#[test]
fn test_simulate_does_not_touch_config() {
    let dir = TempDir::new().unwrap();
    run_ok(&dir, &["timer", "simulate", "toggle tick"]);
    assert!(config_dir_is_empty(&dir));
}

#[test]
fn test_run_warns_on_broken_config_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "ui = [").unwrap();

    let (stdout, stderr, code) = run_cli(&dir, &["timer", "run"], "q\n");
    assert_eq!(code, 0, "run failed: {stderr}");
    assert!(stderr.contains("using default configuration"), "stderr: {stderr}");
    assert_eq!(stdout.lines().nth(1), Some("WORK  25:00  [Start] [Reset]"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "ui = [");
}

#[test]
fn test_config_rejects_colliding_key() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["config", "set", "keys.toggle", "q"], "");
    assert_ne!(code, 0);
    assert!(stderr.contains("keys.toggle"), "stderr: {stderr}");
    assert_eq!(run_ok(&dir, &["config", "get", "keys.toggle"]).trim(), "s");
}
