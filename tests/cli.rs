//! Integration tests driving the prayerq binary against a fixture log.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Path to the shared fixture log
fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("prayers.json")
}

/// Config path that does not exist, so defaults are used
fn no_config() -> PathBuf {
    std::env::temp_dir().join("prayerq-tests-missing-config.json")
}

/// Run prayerq with given args
fn run_prayerq(args: &[&str]) -> (String, String, bool) {
    let fixture = fixture();
    let config = no_config();
    let mut cmd_args: Vec<&str> = vec![
        "--color",
        "never",
        "--config",
        config.to_str().unwrap(),
        "-f",
        fixture.to_str().unwrap(),
    ];
    cmd_args.extend(args);

    let output = Command::new(env!("CARGO_BIN_EXE_prayerq"))
        .args(&cmd_args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run prayerq");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// Ids from `--json` output
fn json_ids(stdout: &str) -> Vec<String> {
    let value: serde_json::Value = serde_json::from_str(stdout).expect("valid JSON output");
    value
        .as_array()
        .expect("JSON array")
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_empty_query_lists_everything_newest_first() {
    let (stdout, _, ok) = run_prayerq(&["search", "--json"]);
    assert!(ok);
    assert_eq!(json_ids(&stdout), vec!["p3", "p1", "p2", "p4"]);
}

#[test]
fn test_field_or_query() {
    let (stdout, _, ok) = run_prayerq(&["search", "--json", "request:surgery OR name:ann"]);
    assert!(ok);
    assert_eq!(json_ids(&stdout), vec!["p1", "p2"]);
}

#[test]
fn test_field_and_query_matches_nothing() {
    let (stdout, _, ok) = run_prayerq(&["search", "--json", "name:ann AND request:surgery"]);
    assert!(ok);
    assert!(json_ids(&stdout).is_empty());
}

#[test]
fn test_query_words_are_joined() {
    // Separate shell words form one query with implicit AND
    let (stdout, _, ok) = run_prayerq(&["search", "--json", "healing", "mom"]);
    assert!(ok);
    assert_eq!(json_ids(&stdout), vec!["p3"]);
}

#[test]
fn test_status_filter() {
    let (stdout, _, ok) = run_prayerq(&["search", "--json", "--status", "answered", "heal"]);
    assert!(ok);
    assert_eq!(json_ids(&stdout), vec!["p2"]);
}

#[test]
fn test_default_command_renders_lists() {
    let (stdout, _, ok) = run_prayerq(&["answer:safely"]);
    assert!(ok);
    assert!(stdout.contains("Current requests (0)"));
    assert!(stdout.contains("No current prayer requests matching your search."));
    assert!(stdout.contains("Answered prayers (1)"));
    assert!(stdout.contains("Grandma Rose"));
    assert!(stdout.contains("Answered on 2024-01-14: Arrived safely"));
}

#[test]
fn test_malformed_query_does_not_fail() {
    for query in ["AND", "(", ")", "name:ann AND", "((mom OR", "\"unterminated"] {
        let (_, stderr, ok) = run_prayerq(&["search", "--json", query]);
        assert!(ok, "query {:?} failed: {}", query, stderr);
    }
}

#[test]
fn test_explain() {
    let (stdout, _, ok) = run_prayerq(&["explain", "alpha OR beta gamma"]);
    assert!(ok);
    assert!(stdout.contains("tokens: alpha OR beta AND gamma"));
    assert!(stdout.contains("tree: (alpha OR (beta AND gamma))"));
}

#[test]
fn test_recent_with_huge_window() {
    let (stdout, _, ok) = run_prayerq(&["recent", "--hours", "1000000"]);
    assert!(ok);
    assert!(stdout.starts_with("New prayer requests"));
}

#[test]
fn test_missing_records_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_prayerq"))
        .args([
            "--config",
            no_config().to_str().unwrap(),
            "-f",
            "/nonexistent/prayers.json",
            "search",
        ])
        .output()
        .expect("Failed to run prayerq");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read records file"));
}

/// Feed `input` to `prayerq repl` and collect its output
fn run_repl(input: &[u8]) -> (String, bool) {
    let fixture = fixture();
    let config = no_config();
    let mut child = Command::new(env!("CARGO_BIN_EXE_prayerq"))
        .args([
            "--color",
            "never",
            "--config",
            config.to_str().unwrap(),
            "-f",
            fixture.to_str().unwrap(),
            "repl",
        ])
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to run prayerq");

    child.stdin.take().unwrap().write_all(input).unwrap();

    let output = child.wait_with_output().unwrap();
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        output.status.success(),
    )
}

#[test]
fn test_repl_answers_each_line() {
    let (stdout, ok) = run_repl(b"name:ben\n\nname:ben\n");
    assert!(ok);
    assert_eq!(stdout.matches("> name:ben (1 of 4)").count(), 2);
    assert!(stdout.contains(">  (4 of 4)"));
}

#[test]
fn test_repl_survives_huge_query() {
    let mut input = "job ".repeat(200_000).into_bytes();
    input.push(b'\n');

    let (stdout, ok) = run_repl(&input);
    assert!(ok);
    assert!(stdout.contains("(1 of 4)"));
    assert!(stdout.contains("job interview on Friday"));
}
