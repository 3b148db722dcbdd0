//! Smoke tests for the postboard binary

use assert_cmd::Command;
use predicates::prelude::*;

fn postboard(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("postboard").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("MONGO_URI")
        .env_remove("MONGO_DB")
        .env_remove("PORT")
        .env_remove("POSTBOARD_HOST");
    cmd
}

#[test]
fn test_serve_help() {
    let dir = tempfile::tempdir().unwrap();
    postboard(&dir)
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("MongoDB connection string"))
        .stdout(predicate::str::contains("4000"));
}

#[test]
fn test_missing_mongo_uri_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    postboard(&dir)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MONGO_URI not set"));
}

#[test]
fn test_invalid_mongo_uri_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    postboard(&dir)
        .arg("serve")
        .arg("--mongo-uri")
        .arg("not-a-connection-string")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect to MongoDB"));
}

#[test]
fn test_shell_hostname_in_host_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    postboard(&dir)
        .env("HOST", "my-laptop.local")
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MONGO_URI not set"));
}
