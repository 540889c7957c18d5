//! Integration tests for the `dt` CLI.
//!
//! Each test creates a temp data directory, runs `dt` as a subprocess,
//! and verifies stdout and/or the store file.

use std::fs;
use std::path::Path;
use std::process::Command;

const DAY: &str = "2024-01-01";

/// Create a data directory with desktop notifications switched off.
fn create_data_dir(root: &Path) {
    fs::write(root.join("config.toml"), "[reminders]\ndesktop = false\n").unwrap();
}

/// Run `dt` against the given data directory, returning (stdout, stderr, success).
fn run_dt(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_dt"))
        .arg("-C")
        .arg(dir)
        .args(args)
        .env_remove("DAILY_TODO_DIR")
        .output()
        .expect("failed to run dt");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `dt` expecting success, return stdout.
fn run_dt_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dt(dir, args);
    if !success {
        panic!(
            "dt {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Add a task on `DAY` and return its id.
fn add(dir: &Path, text: &str, time: &str) -> String {
    run_dt_ok(dir, &["add", text, "--time", time, "-d", DAY])
        .trim()
        .to_string()
}

fn store_json(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("dailyTodos.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_empty_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());

    let out = run_dt_ok(tmp.path(), &["list", "-d", DAY]);
    assert!(out.contains("2024-01-01 Mon (0/0 done)"));
    assert!(out.contains("(no tasks)"));
}

#[test]
fn test_add_then_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());

    let id = add(tmp.path(), "Buy milk", "9:05");
    assert!(id.parse::<i64>().is_ok());

    let out = run_dt_ok(tmp.path(), &["list", "-d", DAY]);
    assert!(out.contains(&format!("[ ] {} 09:05 Buy milk", id)));

    let store = store_json(tmp.path());
    let task = &store[DAY][0];
    assert_eq!(task["text"], "Buy milk");
    assert_eq!(task["time"], "09:05");
    assert_eq!(task["completed"], false);
    assert_eq!(task["notified"], false);
}

#[test]
fn test_list_filters_and_search() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());

    let milk = add(tmp.path(), "Buy milk", "");
    add(tmp.path(), "Walk the dog", "");
    run_dt_ok(tmp.path(), &["toggle", &milk, "-d", DAY]);

    let out = run_dt_ok(tmp.path(), &["list", "-d", DAY, "--filter", "active"]);
    assert!(out.contains("Walk the dog"));
    assert!(!out.contains("Buy milk"));

    let out = run_dt_ok(tmp.path(), &["list", "-d", DAY, "-f", "completed"]);
    assert!(out.contains("[x]"));
    assert!(out.contains("Buy milk"));

    let out = run_dt_ok(tmp.path(), &["list", "-d", DAY, "--search", "DOG"]);
    assert!(out.contains("Walk the dog"));
    assert!(!out.contains("Buy milk"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());
    add(tmp.path(), "Buy milk", "");

    let out = run_dt_ok(tmp.path(), &["--json", "list", "-d", DAY]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["date"], DAY);
    let tasks = parsed["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["text"], "Buy milk");
    assert!(tasks[0].get("time").is_none());
}

#[test]
fn test_dates_and_history() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());

    add(tmp.path(), "a", "");
    add(tmp.path(), "b", "");
    run_dt_ok(tmp.path(), &["add", "c", "-d", "2024-01-03"]);

    let out = run_dt_ok(tmp.path(), &["dates"]);
    assert!(out.contains("2024-01-01 (2)"));
    assert!(out.contains("2024-01-03 (1)"));

    let out = run_dt_ok(tmp.path(), &["--json", "history"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let days = parsed.as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2024-01-03");
    assert_eq!(days[1]["date"], DAY);

    let out = run_dt_ok(tmp.path(), &["history", "--limit", "1"]);
    assert!(out.contains("2024-01-03"));
    assert!(!out.contains("2024-01-01"));
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_toggle_twice_restores() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());
    let id = add(tmp.path(), "Buy milk", "");

    let out = run_dt_ok(tmp.path(), &["toggle", &id, "-d", DAY]);
    assert_eq!(out.trim(), format!("toggled {}", id));
    assert_eq!(store_json(tmp.path())[DAY][0]["completed"], true);

    run_dt_ok(tmp.path(), &["toggle", &id, "-d", DAY]);
    assert_eq!(store_json(tmp.path())[DAY][0]["completed"], false);
}

#[test]
fn test_edit_and_delete() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());
    let id = add(tmp.path(), "Buy milk", "");

    run_dt_ok(tmp.path(), &["edit", &id, "Buy oat milk", "-d", DAY]);
    assert_eq!(store_json(tmp.path())[DAY][0]["text"], "Buy oat milk");

    let out = run_dt_ok(tmp.path(), &["--json", "delete", &id, "-d", DAY]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["changed"], true);

    // Emptied dates stay in the store unless pruning is configured
    let store = store_json(tmp.path());
    assert_eq!(store[DAY].as_array().unwrap().len(), 0);
}

#[test]
fn test_unknown_id_is_not_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());
    add(tmp.path(), "Buy milk", "");

    let out = run_dt_ok(tmp.path(), &["toggle", "12345", "-d", DAY]);
    assert_eq!(out.trim(), "no task 12345 on 2024-01-01");
    assert_eq!(store_json(tmp.path())[DAY][0]["completed"], false);
}

#[test]
fn test_add_rejects_empty_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());

    let (_, stderr, success) = run_dt(tmp.path(), &["add", "   ", "-d", DAY]);
    assert!(!success);
    assert!(stderr.contains("task text cannot be empty"));
    assert!(!tmp.path().join("dailyTodos.json").exists());
}

#[test]
fn test_add_rejects_bad_time() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());

    let (_, stderr, success) = run_dt(tmp.path(), &["add", "x", "--time", "25:00"]);
    assert!(!success);
    assert!(stderr.contains("expected HH:MM"));
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

#[test]
fn test_remind_fires_once() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path());
    let id = add(tmp.path(), "Standup", "09:00");
    add(tmp.path(), "Lunch", "12:00");

    let args = ["--json", "remind", "--at", "2024-01-01 09:00", "--quiet"];
    let out = run_dt_ok(tmp.path(), &args);
    let fired: serde_json::Value = serde_json::from_str(&out).unwrap();
    let fired = fired.as_array().unwrap();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0]["text"], "Standup");
    assert_eq!(fired[0]["id"].to_string(), id);

    let store = store_json(tmp.path());
    assert_eq!(store[DAY][0]["notified"], true);
    assert_eq!(store[DAY][1]["notified"], false);

    // Already notified: a second scan in the same minute fires nothing
    let out = run_dt_ok(tmp.path(), &args);
    let fired: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(fired.as_array().unwrap().is_empty());
}

#[test]
fn test_init_writes_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().join("fresh");

    let out = run_dt_ok(&dir, &["init"]);
    assert!(out.contains("Initialized daily-todo"));
    assert!(dir.join("config.toml").exists());
    assert!(dir.join("dailyTodos.json").exists());

    let out = run_dt_ok(&dir, &["init"]);
    assert!(out.contains("kept existing config.toml"));
}
