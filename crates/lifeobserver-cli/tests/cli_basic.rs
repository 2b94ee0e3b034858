//! Basic CLI E2E tests.
//!
//! Commands run through `cargo run` against a throwaway HOME so the
//! tests never touch the real data directory.

use std::path::PathBuf;
use std::process::Command;

fn scratch_home(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lifeobserver-cli-test-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn run_cli(home: &PathBuf, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "lifeobserver-cli", "--quiet", "--"])
        .args(args)
        .env("HOME", home)
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn help_lists_every_area() {
    let home = scratch_home("help");
    let (stdout, _, code) = run_cli(&home, &["--help"]);
    assert_eq!(code, 0);
    for area in ["mood", "habit", "task", "punch", "stats", "chat", "data", "config"] {
        assert!(stdout.contains(area), "missing '{area}' in help output");
    }
}

#[test]
fn task_add_then_list_round_trip() {
    let home = scratch_home("task");
    let (stdout, stderr, code) = run_cli(
        &home,
        &["task", "add", "write weekly report", "--quadrant", "A", "--time", "10:00 AM"],
    );
    assert_eq!(code, 0, "task add failed: {stderr}");
    assert!(stdout.contains("Scheduled task"));

    let (stdout, _, code) = run_cli(&home, &["task", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("write weekly report"));

    let (stdout, _, code) = run_cli(&home, &["task", "score"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("0 / 4 points"));
}

#[test]
fn habit_check_in_is_guarded_per_day() {
    let home = scratch_home("habit");
    let (stdout, _, code) = run_cli(&home, &["habit", "add", "drink water"]);
    assert_eq!(code, 0);
    let id = stdout
        .split("(id ")
        .nth(1)
        .and_then(|s| s.split(')').next())
        .expect("habit id in output")
        .to_string();

    let (stdout, _, code) = run_cli(&home, &["habit", "check-in", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Checked in"));

    let (stdout, _, code) = run_cli(&home, &["habit", "check-in", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("already checked in today"));
}

#[test]
fn punch_cycle_keeps_audit_trail() {
    let home = scratch_home("punch");
    let (_, _, code) = run_cli(&home, &["punch", "in"]);
    assert_eq!(code, 0);

    // A second clock-in is logged but rejected by the state machine.
    let (stdout, _, code) = run_cli(&home, &["punch", "in"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("state unchanged"));

    let (stdout, _, code) = run_cli(&home, &["punch", "out"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("clock out"));

    let (stdout, _, code) = run_cli(&home, &["punch", "records"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.matches("clock in").count(), 2);
    assert_eq!(stdout.matches("clock out").count(), 1);
}

#[test]
fn config_get_and_set_round_trip() {
    let home = scratch_home("config");
    let (stdout, _, code) = run_cli(&home, &["config", "get", "attendance.work_hours"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "8");

    let (_, _, code) = run_cli(&home, &["config", "set", "attendance.work_hours", "6"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(&home, &["config", "get", "attendance.work_hours"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "6");
}

#[test]
fn export_writes_a_backup_file() {
    let home = scratch_home("export");
    run_cli(&home, &["habit", "add", "stretch"]);

    let out = home.join("backup.json");
    let out_str = out.to_string_lossy().to_string();
    let (_, stderr, code) = run_cli(&home, &["data", "export", "--out", &out_str]);
    assert_eq!(code, 0, "export failed: {stderr}");

    let backup: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(backup["habits"].as_array().unwrap().len(), 1);
    assert!(backup.get("tasks").is_some());
}
