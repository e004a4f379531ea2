//! Integration tests for ghfetch CLI

use httpmock::prelude::*;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const TOKEN_ENV: &str = "GHFETCH_IT_TOKEN";

/// Config file pointing both hosts at the mock server
fn write_config(dir: &TempDir, server: &MockServer) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    let contents = format!(
        "[github]\nweb_url = \"{}\"\napi_url = \"{}\"\ntoken_env = \"{TOKEN_ENV}\"\n",
        server.base_url(),
        server.url("/api")
    );
    std::fs::write(&path, contents).unwrap();
    path
}

fn ghfetch(config: &Path, token: Option<&str>, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ghfetch"));
    command
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("GHFETCH_GITHUB_URL")
        .env_remove("GHFETCH_GITHUB_API_URL")
        .env_remove("GHFETCH_TOKEN_ENV")
        .env_remove("GHFETCH_COLOR")
        .env_remove(TOKEN_ENV);
    if let Some(token) = token {
        command.env(TOKEN_ENV, token);
    }
    command.output().expect("Failed to execute ghfetch")
}

fn mock_repository<'a>(server: &'a MockServer, repo: &str) -> httpmock::Mock<'a> {
    let path = format!("/api/repos/acme/{repo}");
    server.mock(|when, then| {
        when.method(GET)
            .path(path)
            .header("authorization", "Bearer sekrit");
        then.status(200).json_body(serde_json::json!({
            "id": 1,
            "full_name": format!("acme/{repo}"),
            "private": true
        }));
    })
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_ghfetch"))
        .arg("--version")
        .output()
        .expect("Failed to execute ghfetch");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ghfetch"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_ghfetch"))
        .arg("--help")
        .output()
        .expect("Failed to execute ghfetch");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("private GitHub repositories"));
    assert!(stdout.contains("fetch"));
    assert!(stdout.contains("resolve"));
    assert!(stdout.contains("url"));
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_ghfetch"))
        .arg("invalid-command")
        .output()
        .expect("Failed to execute ghfetch");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_missing_token_names_variable() {
    let server = MockServer::start();
    let repo = mock_repository(&server, "widget");
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    let url = server.url("/acme/widget/main/a.zip");
    let output = ghfetch(&config, None, &["url", &url]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(TOKEN_ENV));
    repo.assert_hits(0);
}

#[test]
fn test_url_redacts_token() {
    let server = MockServer::start();
    let repo = mock_repository(&server, "widget");
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    let url = server.url("/acme/widget/main/a.zip");
    let output = ghfetch(&config, Some("sekrit"), &["url", &url]);

    assert!(output.status.success(), "{output:?}");
    repo.assert();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("sekrit"));
    assert_eq!(
        stdout.trim(),
        url.replacen("http://", "http://***@", 1)
    );
}

#[test]
fn test_fetch_release_asset_json() {
    let server = MockServer::start();
    let repo = mock_repository(&server, "widget");
    let release = server.mock(|when, then| {
        when.method(GET)
            .path("/api/repos/acme/widget/releases/tags/v1.0");
        then.status(200).json_body(serde_json::json!({
            "id": 10,
            "tag_name": "v1.0",
            "assets": [
                { "id": 1, "name": "a.tar.gz" },
                { "id": 2, "name": "b.tar.gz" }
            ]
        }));
    });
    let asset = server.mock(|when, then| {
        when.method(GET)
            .path("/api/repos/acme/widget/releases/assets/2")
            .header("accept", "application/octet-stream");
        then.status(200).body("asset bytes");
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let dest = dir.path().join("b.tar.gz");
    let url = server.url("/acme/widget/releases/download/v1.0/b.tar.gz");

    let output = ghfetch(
        &config,
        Some("sekrit"),
        &["--json", "fetch", &url, "-o", dest.to_str().unwrap()],
    );

    assert!(output.status.success(), "{output:?}");
    repo.assert();
    release.assert();
    asset.assert();
    assert_eq!(std::fs::read(&dest).unwrap(), b"asset bytes");

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["result"], "fetched");
    assert_eq!(result["strategy"], "release-asset");
    assert_eq!(result["size"], 11);
}

#[test]
fn test_resolve_prints_asset_id() {
    let server = MockServer::start();
    mock_repository(&server, "widget");
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/repos/acme/widget/releases/tags/v2");
        then.status(200).json_body(serde_json::json!({
            "id": 11,
            "tag_name": "v2",
            "assets": [{ "id": 42, "name": "tool.zip" }]
        }));
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let url = server.url("/acme/widget/releases/download/v2/tool.zip");

    let output = ghfetch(&config, Some("sekrit"), &["--json", "resolve", &url]);

    assert!(output.status.success(), "{output:?}");
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["asset_id"], 42);
    assert_eq!(result["tag"], "v2");
}

#[test]
fn test_access_denied_exit_code() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/repos/acme/secret");
        then.status(404)
            .json_body(serde_json::json!({ "message": "Not Found" }));
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let url = server.url("/acme/secret/main/a.zip");

    let output = ghfetch(
        &config,
        Some("sekrit"),
        &["fetch", &url, "-o", dir.path().join("a.zip").to_str().unwrap()],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("acme/secret"));
    assert!(!dir.path().join("a.zip").exists());
}
