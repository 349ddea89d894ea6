#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn harness(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("harness").unwrap();
    cmd.current_dir(dir.path())
        .env("CLAUDE_WORKING_DIRECTORY", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn init_harness(dir: &TempDir) {
    std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
    std::fs::write(dir.path().join(".claude/.claude-harness-initialized"), "").unwrap();
}

fn write_features(dir: &TempDir, json: &str) {
    std::fs::write(dir.path().join("claude-features.json"), json).unwrap();
}

fn write_config(dir: &TempDir, yaml: &str) {
    std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
    std::fs::write(dir.path().join(".claude/harness-config.yaml"), yaml).unwrap();
}

fn hook_json(dir: &TempDir, event: &str, stdin: &str) -> serde_json::Value {
    let out = harness(dir)
        .args(["hook", event])
        .write_stdin(stdin)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).unwrap()
}

const EDIT: &str = r#"{"tool_name": "Write", "tool_input": {"file_path": "src/main.rs"}}"#;

const LOGIN_FAILING: &str = r#"{"features": [
    {"id": 1, "name": "Login", "description": "Email + password login", "status": "failing"},
    {"id": 2, "name": "Signup", "status": "passing"}
]}"#;

// ---------------------------------------------------------------------------
// harness hook pre-tool-use
// ---------------------------------------------------------------------------

#[test]
fn pre_tool_use_uninitialized_allows() {
    let dir = TempDir::new().unwrap();
    write_features(&dir, LOGIN_FAILING);
    harness(&dir)
        .args(["hook", "pre-tool-use"])
        .write_stdin(EDIT)
        .assert()
        .success()
        .stdout("{}\n");
}

#[test]
fn pre_tool_use_strict_denies_without_wip() {
    let dir = TempDir::new().unwrap();
    init_harness(&dir);
    write_features(&dir, LOGIN_FAILING);
    write_config(&dir, "strictness: strict\n");

    let v = hook_json(&dir, "pre-tool-use", EDIT);
    assert_eq!(v["hookSpecificOutput"]["permissionDecision"], "deny");
    let msg = v["systemMessage"].as_str().unwrap();
    assert!(msg.contains("  1. Login"));
    assert!(msg.contains("[Strict mode: Operation blocked until a feature is started]"));
}

#[test]
fn pre_tool_use_standard_warns() {
    let dir = TempDir::new().unwrap();
    init_harness(&dir);
    write_features(&dir, LOGIN_FAILING);

    let v = hook_json(&dir, "pre-tool-use", EDIT);
    assert!(v.get("hookSpecificOutput").is_none());
    assert!(v["systemMessage"]
        .as_str()
        .unwrap()
        .starts_with("[Harness] No feature currently in progress."));
}

#[test]
fn pre_tool_use_wip_allows_in_strict() {
    let dir = TempDir::new().unwrap();
    init_harness(&dir);
    write_config(&dir, "strictness: strict\n");
    write_features(
        &dir,
        r#"{"features": [{"id": 1, "name": "Login", "status": "failing"},
                         {"id": 2, "name": "Signup", "status": "in_progress"}]}"#,
    );
    harness(&dir)
        .args(["hook", "pre-tool-use"])
        .write_stdin(EDIT)
        .assert()
        .success()
        .stdout("{}\n");
}

#[test]
fn pre_tool_use_ignores_read_tools() {
    let dir = TempDir::new().unwrap();
    init_harness(&dir);
    write_config(&dir, "strictness: strict\n");
    write_features(&dir, LOGIN_FAILING);
    harness(&dir)
        .args(["hook", "pre-tool-use"])
        .write_stdin(r#"{"tool_name": "Read", "tool_input": {}}"#)
        .assert()
        .success()
        .stdout("{}\n");
}

#[test]
fn hooks_survive_garbage_input() {
    let dir = TempDir::new().unwrap();
    init_harness(&dir);
    for event in ["pre-tool-use", "stop"] {
        harness(&dir)
            .args(["hook", event])
            .write_stdin("this is not json")
            .assert()
            .success()
            .stdout("{}\n");
    }
}

// ---------------------------------------------------------------------------
// harness hook session-start
// ---------------------------------------------------------------------------

#[test]
fn session_start_uninitialized_onboards() {
    let dir = TempDir::new().unwrap();
    let v = hook_json(&dir, "session-start", "{}");
    assert!(v["systemMessage"]
        .as_str()
        .unwrap()
        .contains("Run `/harness:init`"));
}

#[test]
fn session_start_reports_features_and_mode() {
    let dir = TempDir::new().unwrap();
    init_harness(&dir);
    write_features(&dir, LOGIN_FAILING);
    std::fs::write(dir.path().join("claude-progress.txt"), "Session 1: scaffolded app\n").unwrap();

    let v = hook_json(&dir, "session-start", "{}");
    let msg = v["systemMessage"].as_str().unwrap();
    assert!(msg.starts_with("=== AGENT HARNESS SESSION STARTUP ==="));
    assert!(msg.contains("--- PROGRESS LOG ---\nSession 1: scaffolded app"));
    assert!(msg.contains("Total: 2 | Passing: 1 | Failing: 1"));
    assert!(msg.contains("  [TODO] Login: Email + password login"));
    assert!(msg.contains("Mode: standard"));
    assert!(msg.contains("/harness:feature start <id>"));
}

#[cfg(unix)]
#[test]
fn session_start_runs_init_script() {
    let dir = TempDir::new().unwrap();
    init_harness(&dir);
    std::fs::write(dir.path().join("init.sh"), "echo booted\n").unwrap();

    let v = hook_json(&dir, "session-start", "{}");
    let msg = v["systemMessage"].as_str().unwrap();
    assert!(msg.contains("--- INIT SCRIPT ---\ninit.sh completed (exit code 0)"));
    assert!(msg.contains("booted"));
}

// ---------------------------------------------------------------------------
// harness hook stop
// ---------------------------------------------------------------------------

#[test]
fn stop_outside_repo_is_quiet() {
    let dir = TempDir::new().unwrap();
    init_harness(&dir);
    harness(&dir)
        .args(["hook", "stop"])
        .write_stdin(r#"{"stopReason": "end_turn"}"#)
        .assert()
        .success()
        .stdout("{}\n");
}

// ---------------------------------------------------------------------------
// harness status / config
// ---------------------------------------------------------------------------

#[test]
fn status_json_reports_tally() {
    let dir = TempDir::new().unwrap();
    init_harness(&dir);
    write_features(&dir, LOGIN_FAILING);

    let out = harness(&dir)
        .args(["status", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["initialized"], true);
    assert_eq!(v["strictness"], "standard");
    assert_eq!(v["features"]["total"], 2);
    assert_eq!(v["features"]["next_items"][0]["id"], "1");
    assert!(v["current"].is_null());
}

#[test]
fn status_text_without_checklist() {
    let dir = TempDir::new().unwrap();
    harness(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not initialized"))
        .stdout(predicate::str::contains("No claude-features.json yet."));
}

#[test]
fn config_show_defaults() {
    let dir = TempDir::new().unwrap();
    harness(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: built-in defaults"))
        .stdout(predicate::str::contains("strictness:                  standard"));
}

#[test]
fn config_validate_flags_unknown_keys() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "strictness: strict\nfeature_enforcment: true\n");
    harness(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: unknown key 'feature_enforcment'"));
}

#[test]
fn config_validate_fails_on_parse_error() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "strictness: paranoid\n");
    harness(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is invalid"));
}
