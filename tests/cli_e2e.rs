//! End-to-end CLI tests for the file-downloader binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

/// Binary with an isolated config home and history database under `home`.
fn cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("file-downloader").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("RUST_LOG")
        .arg("-q")
        .arg("--db")
        .arg(home.join("downloads.db"));
    cmd
}

fn write_config(home: &Path, body: &str) {
    let dir = home.join("config").join("file-downloader");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), body).unwrap();
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("file-downloader").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download a file from a URL"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("file-downloader").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("file-downloader"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("file-downloader").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_history_empty_database() {
    let home = TempDir::new().unwrap();
    cmd(home.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No download history found"));
}

#[test]
fn test_history_json_empty_is_empty_array() {
    let home = TempDir::new().unwrap();
    cmd(home.path())
        .args(["history", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_get_empty_url_reports_and_records_nothing() {
    let home = TempDir::new().unwrap();
    cmd(home.path())
        .args(["get", "  ", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a URL."));

    cmd(home.path())
        .args(["history", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[tokio::test]
async fn test_get_saves_file_and_history_lists_it() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/paper.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 content".to_vec()))
        .mount(&mock_server)
        .await;

    let home = TempDir::new().unwrap();
    let out_dir = home.path().join("out");
    std::fs::create_dir_all(&out_dir).unwrap();
    let url = format!("{}/paper.pdf", mock_server.uri());

    cmd(home.path())
        .args(["get", &url, "--no-progress", "--output-dir"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Download complete:"))
        .stdout(predicate::str::contains("paper.pdf"));

    assert_eq!(
        std::fs::read(out_dir.join("paper.pdf")).unwrap(),
        b"%PDF-1.4 content"
    );

    let output = cmd(home.path())
        .args(["history", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["url"], url.as_str());
    assert_eq!(records[0]["status"], "completed");

    std::fs::remove_file(out_dir.join("paper.pdf")).unwrap();
    cmd(home.path())
        .args(["history", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(file not found)"));
}

#[tokio::test]
async fn test_get_http_error_exits_nonzero_and_records_failure() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let home = TempDir::new().unwrap();
    let url = format!("{}/gone", mock_server.uri());
    cmd(home.path())
        .args(["get", &url, "--no-progress", "--output"])
        .arg(home.path().join("gone.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error:"));

    cmd(home.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("failed"));
}

#[tokio::test]
async fn test_get_prompt_dash_cancels() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/file.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"text".to_vec()))
        .mount(&mock_server)
        .await;

    let home = TempDir::new().unwrap();
    cmd(home.path())
        .args(["get", &format!("{}/file.txt", mock_server.uri()), "--no-progress"])
        .write_stdin("-\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download cancelled"))
        .stderr(predicate::str::contains("Save as [file.txt]"));
}

#[test]
fn test_config_show_reports_file_values() {
    let home = TempDir::new().unwrap();
    write_config(
        home.path(),
        "output_dir = \"/srv/downloads\"\nread_timeout_secs = 90\nchunk_size = 16384\n",
    );

    cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains("output_dir = /srv/downloads"))
        .stdout(predicate::str::contains("read_timeout_secs = 90"))
        .stdout(predicate::str::contains("connect_timeout_secs = 30"))
        .stdout(predicate::str::contains("chunk_size = 16384"));
}

#[test]
fn test_config_show_without_file_uses_defaults() {
    let home = TempDir::new().unwrap();
    cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found (using defaults)"))
        .stdout(predicate::str::contains("chunk_size = 65536"));
}

#[test]
fn test_invalid_config_fails_with_context() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "chunk_size = 12\n");

    cmd(home.path())
        .arg("history")
        .assert()
        .failure()
        .stderr(predicate::str::contains("chunk_size"));
}
