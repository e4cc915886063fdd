use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn moodlog_cmd(db: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_moodlog"));
    cmd.arg("--db")
        .arg(db)
        .env_remove("MOODLOG_DB")
        .env_remove("MOODLOG_ADDR")
        .env_remove("MOODLOG_COLLISION");
    cmd
}

fn run(db: &Path, args: &[&str]) -> Output {
    moodlog_cmd(db).args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn init_with_user(tmp: &TempDir, username: &str) -> std::path::PathBuf {
    let db = tmp.path().join("moodlog.db");
    assert!(run(&db, &["init"]).status.success());
    assert!(run(&db, &["user", "add", username]).status.success());
    db
}

#[test]
fn test_init_creates_database() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("moodlog.db");

    let output = run(&db, &["init"]);

    assert!(output.status.success());
    assert!(db.exists());
    assert!(stdout(&output).contains("Initialized moodlog database"));
}

#[test]
fn test_init_twice_fails() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("moodlog.db");
    run(&db, &["init"]);

    let output = run(&db, &["init"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("already exists"));
}

#[test]
fn test_commands_without_init_fail() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("moodlog.db");

    let output = run(&db, &["user", "list"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("moodlog init"));
}

#[test]
fn test_user_add_and_list() {
    let tmp = TempDir::new().unwrap();
    let db = init_with_user(&tmp, "ana");

    let output = run(&db, &["user", "add", "ana"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("already registered"));

    let output = run(&db, &["user", "list", "--json"]);
    assert!(output.status.success());
    let users: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["username"], "ana");
}

#[test]
fn test_list_empty_and_unknown_user() {
    let tmp = TempDir::new().unwrap();
    let db = init_with_user(&tmp, "ana");

    let output = run(&db, &["list", "--user", "ana"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No entries found."));

    let output = run(&db, &["list", "--user", "bob"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("User not found: bob"));
}

#[test]
fn test_tracker_empty_calendar() {
    let tmp = TempDir::new().unwrap();
    let db = init_with_user(&tmp, "ana");

    let output = run(&db, &["tracker", "--user", "ana", "--json"]);
    assert!(output.status.success());
    let slots: Vec<u8> = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(slots, vec![0; 30]);

    let output = run(&db, &["tracker", "--user", "ana"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 5);
}

#[test]
fn test_tracker_rejects_bad_month() {
    let tmp = TempDir::new().unwrap();
    let db = init_with_user(&tmp, "ana");

    let output = run(&db, &["tracker", "--user", "ana", "--month", "2024-3"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid month"));

    let output = run(&db, &["tracker", "--user", "ana", "--collision", "random"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid collision policy"));
}
