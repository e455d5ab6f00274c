//! Integration tests for the `tl` CLI.
//!
//! Each test gets a temp directory holding the store and an isolated config
//! home, runs `tl` as a subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use pretty_assertions::assert_eq;

/// Get the path to the built `tl` binary.
fn tl_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tl");
    path
}

fn store_path(dir: &Path) -> PathBuf {
    dir.join("data/store.json")
}

fn config_path(dir: &Path) -> PathBuf {
    dir.join("config/ticklist/config.toml")
}

fn tl_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(tl_bin());
    cmd.args(args)
        .arg("--store")
        .arg(store_path(dir))
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("XDG_DATA_HOME", dir.join("xdg-data"));
    cmd
}

/// Run `tl` against the temp store, returning (stdout, stderr, success).
fn run_tl(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = tl_command(dir, args).output().expect("failed to run tl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tl` expecting success, return stdout.
fn run_tl_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tl(dir, args);
    if !success {
        panic!(
            "tl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `tl` with `input` on stdin
fn run_tl_stdin(dir: &Path, args: &[&str], input: &str) -> (String, String, bool) {
    let mut child = tl_command(dir, args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run tl");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// The raw task list value stored under `key`
fn stored_value(dir: &Path, key: &str) -> Option<String> {
    let content = fs::read_to_string(store_path(dir)).ok()?;
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content).unwrap();
    map.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

fn seed(dir: &Path, texts: &[&str]) {
    for text in texts {
        run_tl_ok(dir, &["add", text]);
    }
}

// ---------------------------------------------------------------------------
// Adding and listing
// ---------------------------------------------------------------------------

#[test]
fn test_add_prints_id_and_persists() {
    let tmp = tempfile::TempDir::new().unwrap();

    assert_eq!(run_tl_ok(tmp.path(), &["add", "buy", "milk"]), "1\n");
    assert_eq!(run_tl_ok(tmp.path(), &["add", "walk dog"]), "2\n");

    assert_eq!(
        stored_value(tmp.path(), "tasks").as_deref(),
        Some(r#"[{"text":"buy milk","completed":false},{"text":"walk dog","completed":false}]"#)
    );
}

#[test]
fn test_add_blank_is_a_no_op() {
    let tmp = tempfile::TempDir::new().unwrap();

    let (stdout, stderr, success) = run_tl(tmp.path(), &["add", "   "]);
    assert!(success);
    assert_eq!(stdout, "");
    assert!(stderr.contains("warning:"));
    assert!(!store_path(tmp.path()).exists());
}

#[test]
fn test_list_all() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["buy milk", "walk dog"]);

    let out = run_tl_ok(tmp.path(), &["list"]);
    assert_eq!(out, "[ ] 1  buy milk\n[ ] 2  walk dog\n");
}

#[test]
fn test_list_empty_prints_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(run_tl_ok(tmp.path(), &["list"]), "");
}

#[test]
fn test_list_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["a", "b", "c"]);
    run_tl_ok(tmp.path(), &["done", "2"]);

    let complete = run_tl_ok(tmp.path(), &["list", "--filter", "complete"]);
    assert_eq!(complete, "[x] 2  b\n");

    let incomplete = run_tl_ok(tmp.path(), &["list", "--filter", "incomplete"]);
    assert_eq!(incomplete, "[ ] 1  a\n[ ] 3  c\n");
}

#[test]
fn test_list_rejects_unknown_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, _, success) = run_tl(tmp.path(), &["list", "--filter", "someday"]);
    assert!(!success);
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["buy milk", "walk dog"]);
    run_tl_ok(tmp.path(), &["toggle", "2"]);

    let out = run_tl_ok(tmp.path(), &["list", "--json", "--filter", "complete"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["filter"], "complete");
    let tasks = parsed["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], 2);
    assert_eq!(tasks[0]["text"], "walk dog");
    assert_eq!(tasks[0]["completed"], true);
}

#[test]
fn test_add_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tl_ok(tmp.path(), &["add", "--json", "buy milk"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["id"], 1);
    assert_eq!(parsed["text"], "buy milk");
    assert_eq!(parsed["completed"], false);
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[test]
fn test_toggle_twice_restores() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["buy milk"]);
    let before = stored_value(tmp.path(), "tasks");

    assert_eq!(run_tl_ok(tmp.path(), &["toggle", "1"]), "[x] 1  buy milk\n");
    assert_eq!(run_tl_ok(tmp.path(), &["toggle", "1"]), "[ ] 1  buy milk\n");
    assert_eq!(stored_value(tmp.path(), "tasks"), before);
}

#[test]
fn test_done_and_undo_are_idempotent() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["buy milk"]);

    run_tl_ok(tmp.path(), &["done", "1"]);
    let (stdout, stderr, success) = run_tl(tmp.path(), &["done", "1"]);
    assert!(success);
    assert_eq!(stdout, "[x] 1  buy milk\n");
    assert!(stderr.contains("already done"));

    run_tl_ok(tmp.path(), &["undo", "1"]);
    assert_eq!(
        stored_value(tmp.path(), "tasks").as_deref(),
        Some(r#"[{"text":"buy milk","completed":false}]"#)
    );
}

#[test]
fn test_unknown_id_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["buy milk"]);

    for cmd in ["toggle", "done", "undo", "rm"] {
        let (_, stderr, success) = run_tl(tmp.path(), &[cmd, "9"]);
        assert!(!success, "{} should fail", cmd);
        assert_eq!(stderr.trim(), "error: task 9 not found");
    }
    let (_, stderr, success) = run_tl(tmp.path(), &["edit", "9", "new text"]);
    assert!(!success);
    assert_eq!(stderr.trim(), "error: task 9 not found");

    assert_eq!(run_tl_ok(tmp.path(), &["list"]), "[ ] 1  buy milk\n");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn test_rm_removes_only_that_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["a", "b", "c"]);

    let out = run_tl_ok(tmp.path(), &["rm", "2"]);
    assert_eq!(out, "Deleted [ ] 2  b\n");
    assert_eq!(
        stored_value(tmp.path(), "tasks").as_deref(),
        Some(r#"[{"text":"a","completed":false},{"text":"c","completed":false}]"#)
    );
}

#[test]
fn test_rm_goes_to_recovery_log() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["walk dog"]);
    run_tl_ok(tmp.path(), &["rm", "1"]);

    let out = run_tl_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("[delete] task 1 deleted"));
    assert!(out.contains("| walk dog"));
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[test]
fn test_edit_with_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["walk dog"]);

    assert_eq!(
        run_tl_ok(tmp.path(), &["edit", "1", "walk", "the", "dog"]),
        "[ ] 1  walk the dog\n"
    );
}

#[test]
fn test_edit_prompts_on_stdin() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["walk dog"]);

    let (stdout, stderr, success) = run_tl_stdin(tmp.path(), &["edit", "1"], "walk the cat\n");
    assert!(success, "stderr: {}", stderr);
    assert!(stderr.contains("walk dog"));
    assert_eq!(stdout, "[ ] 1  walk the cat\n");
}

#[test]
fn test_edit_blank_changes_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["walk dog"]);

    let (stdout, stderr, success) = run_tl_stdin(tmp.path(), &["edit", "1"], "   \n");
    assert!(success);
    assert!(stderr.contains("not changed"));
    assert_eq!(stdout, "[ ] 1  walk dog\n");

    let (_, _, success) = run_tl_stdin(tmp.path(), &["edit", "1"], "");
    assert!(success);
    assert_eq!(run_tl_ok(tmp.path(), &["list"]), "[ ] 1  walk dog\n");
}

// ---------------------------------------------------------------------------
// Store and config
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_store_reads_empty_and_is_recoverable() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = store_path(tmp.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{\"tasks\": [not json").unwrap();

    assert_eq!(run_tl_ok(tmp.path(), &["list"]), "");

    let out = run_tl_ok(tmp.path(), &["recovery", "--json"]);
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(entries[0]["category"], "parser");
    assert_eq!(entries[0]["body"], "{\"tasks\": [not json");

    run_tl_ok(tmp.path(), &["add", "fresh start"]);
    assert_eq!(run_tl_ok(tmp.path(), &["list"]), "[ ] 1  fresh start\n");
}

#[test]
fn test_malformed_task_list_value_reads_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = store_path(tmp.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, r#"{"tasks": "oops", "theme": "dark"}"#).unwrap();

    assert_eq!(run_tl_ok(tmp.path(), &["list"]), "");
    run_tl_ok(tmp.path(), &["add", "a"]);

    // Unrelated keys in the store survive
    assert_eq!(stored_value(tmp.path(), "theme").as_deref(), Some("dark"));
}

#[test]
fn test_config_key_and_store_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let custom_store = tmp.path().join("elsewhere.json");
    let cfg = config_path(tmp.path());
    fs::create_dir_all(cfg.parent().unwrap()).unwrap();
    fs::write(
        &cfg,
        format!(
            "[storage]\nfile = {:?}\nkey = \"todo\"\n",
            custom_store.display().to_string()
        ),
    )
    .unwrap();

    // No --store: the config's file wins over the XDG default
    let output = Command::new(tl_bin())
        .args(["add", "buy milk"])
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .env("XDG_DATA_HOME", tmp.path().join("xdg-data"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let content = fs::read_to_string(&custom_store).unwrap();
    let map: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(map["todo"], r#"[{"text":"buy milk","completed":false}]"#);
    assert!(!tmp.path().join("xdg-data").exists());
}

#[test]
fn test_default_store_is_under_xdg_data_home() {
    let tmp = tempfile::TempDir::new().unwrap();
    let output = Command::new(tl_bin())
        .args(["add", "buy milk"])
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .env("XDG_DATA_HOME", tmp.path().join("xdg-data"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(tmp.path().join("xdg-data/ticklist/store.json").exists());
}

#[test]
fn test_malformed_config_is_fatal() {
    let tmp = tempfile::TempDir::new().unwrap();
    let cfg = config_path(tmp.path());
    fs::create_dir_all(cfg.parent().unwrap()).unwrap();
    fs::write(&cfg, "[ui\nconfirm_delete = ").unwrap();

    let (_, stderr, success) = run_tl(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.starts_with("error: could not parse"));
}

#[test]
fn test_init_writes_config_once() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_tl_ok(tmp.path(), &["init"]);
    assert!(out.starts_with("Wrote "));
    assert!(config_path(tmp.path()).exists());

    let (_, stderr, success) = run_tl(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));

    run_tl_ok(tmp.path(), &["init", "--force"]);
    // The template itself is a valid config
    run_tl_ok(tmp.path(), &["list"]);
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[test]
fn test_recovery_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(run_tl_ok(tmp.path(), &["recovery"]), "Recovery log is empty\n");
}

#[test]
fn test_recovery_limit_and_prune() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["a", "b", "c"]);
    run_tl_ok(tmp.path(), &["rm", "1"]);
    run_tl_ok(tmp.path(), &["rm", "1"]);

    let out = run_tl_ok(tmp.path(), &["recovery", "--json", "--limit", "1"]);
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    // Most recent first: after the first rm, ids were reassigned on reload
    assert_eq!(entries[0]["body"], "b");

    // Fresh entries survive an age-based prune
    assert_eq!(
        run_tl_ok(tmp.path(), &["recovery", "prune"]),
        "Pruned 0 recovery entries\n"
    );
    assert_eq!(
        run_tl_ok(tmp.path(), &["recovery", "prune", "--all"]),
        "Pruned 2 recovery entries\n"
    );
    assert_eq!(run_tl_ok(tmp.path(), &["recovery"]), "Recovery log is empty\n");
}

#[test]
fn test_prune_rejects_out_of_range_days() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["a"]);
    run_tl_ok(tmp.path(), &["rm", "1"]);

    let (_, stderr, success) = run_tl(tmp.path(), &["recovery", "prune", "--days", "1000000000"]);
    assert!(!success);
    assert!(stderr.contains("--days 1000000000 is out of range"), "{}", stderr);
    assert!(!stderr.contains("panicked"), "{}", stderr);

    let (_, _, success) = run_tl(tmp.path(), &["recovery", "prune", "--days", "-3"]);
    assert!(!success);
    let (_, _, success) = run_tl(tmp.path(), &["recovery", "prune", "--days", "3", "--all"]);
    assert!(!success);

    // Nothing was pruned by the rejected calls
    let out = run_tl_ok(tmp.path(), &["recovery", "--json"]);
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[test]
fn test_list_short_f_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), &["a", "b"]);
    run_tl_ok(tmp.path(), &["done", "2"]);
    assert_eq!(run_tl_ok(tmp.path(), &["list", "-f", "complete"]), "[x] 2  b\n");
}
