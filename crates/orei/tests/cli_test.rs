//! Integration tests for the `orei` CLI binary.
//!
//! Parsing, help, completions and config management run without a device;
//! device commands run against a wiremock matrix on localhost.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const API_PATH: &str = "/cgi-bin/instr";

/// Build a [`Command`] for the `orei` binary with env isolation.
///
/// Clears all `OREI_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn orei_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("orei");
    cmd.env("HOME", "/tmp/orei-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/orei-cli-test-nonexistent")
        .env_remove("OREI_DEVICE")
        .env_remove("OREI_HOST")
        .env_remove("OREI_PORT")
        .env_remove("OREI_CONFIG")
        .env_remove("OREI_OUTPUT")
        .env_remove("OREI_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `orei` pointed at a wiremock device, no config file involved.
fn device_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = orei_cmd();
    cmd.args([
        "--host",
        "127.0.0.1",
        "--port",
        &server.address().port().to_string(),
        "--timeout",
        "2",
    ]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn config_arg(path: &Path) -> [String; 2] {
    ["--config".into(), path.display().to_string()]
}

async fn reply(server: &MockServer, comhead: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_partial_json(json!({ "comhead": comhead })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_device(server: &MockServer) {
    reply(
        server,
        "get status",
        json!({ "comhead": "get status", "model": "UHD44-EXB400R-K", "version": "V1.02" }),
    )
    .await;
    reply(
        server,
        "get video status",
        json!({
            "power": 1,
            "allsource": [1, 2, 2, 4],
            "allinputname": ["Apple TV", "Xbox", "PC", "Cable"],
            "alloutputname": ["Living Room", "Den", "Kitchen", "Bar"],
        }),
    )
    .await;
    reply(
        server,
        "get output status",
        json!({ "allconnect": [1, 1, 0, 0], "allhdbtconnect": [0, 0, 0, 0] }),
    )
    .await;
    reply(server, "get input status", json!({ "inactive": [0, 0, 1, 0] })).await;
    reply(server, "video switch", json!({ "comhead": "video switch", "result": 1 })).await;
}

async fn switch_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|req| serde_json::from_slice::<Value>(&req.body).ok())
        .filter(|body| body["comhead"] == "video switch")
        .collect()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = orei_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    orei_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("HDMI matrix")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("route"))
            .and(predicate::str::contains("power")),
    );
}

#[test]
fn test_version_flag() {
    orei_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("orei"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    orei_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    orei_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    orei_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = orei_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_status_without_device() {
    let output = orei_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("No matrix configured"), "Unexpected output:\n{text}");
}

#[test]
fn test_route_requires_numeric_output() {
    let output = orei_cmd()
        .args(["--host", "10.0.0.9", "route", "den", "Xbox"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_probe_unreachable_device() {
    // Bind and drop to get a port with nothing listening.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let output = orei_cmd()
        .args(["--host", "127.0.0.1", "--port", &port.to_string(), "probe"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    let text = combined_output(&output);
    assert!(text.contains("Could not connect"), "Unexpected output:\n{text}");
}

// ── Config management ───────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("orei.toml");

    orei_cmd()
        .args(config_arg(&file))
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("orei.toml"));
}

#[test]
fn test_config_show_no_config() {
    let dir = tempfile::tempdir().unwrap();
    orei_cmd()
        .args(config_arg(&dir.path().join("missing.toml")))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("orei.toml");

    orei_cmd()
        .args(config_arg(&file))
        .args(["config", "init", "--name", "den", "--device-host", "192.168.1.50", "--outputs", "8"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Device 'den'"));

    let written = std::fs::read_to_string(&file).unwrap();
    assert!(written.contains("192.168.1.50"), "Unexpected file:\n{written}");

    orei_cmd()
        .args(config_arg(&file))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("default_device = \"den\"")
                .and(predicate::str::contains("outputs = 8")),
        );
}

#[test]
fn test_config_init_duplicate_host() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("orei.toml");

    orei_cmd()
        .args(config_arg(&file))
        .args(["config", "init", "--name", "den", "--device-host", "192.168.1.50"])
        .assert()
        .success();

    let output = orei_cmd()
        .args(config_arg(&file))
        .args(["config", "init", "--name", "attic", "--device-host", "192.168.1.50"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));
    let text = combined_output(&output);
    assert!(text.contains("already configured"), "Unexpected output:\n{text}");
}

#[test]
fn test_config_init_rejects_empty_layout() {
    let dir = tempfile::tempdir().unwrap();
    let output = orei_cmd()
        .args(config_arg(&dir.path().join("orei.toml")))
        .args(["config", "init", "--device-host", "192.168.1.50", "--inputs", "0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unknown_device_lists_available() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("orei.toml");

    orei_cmd()
        .args(config_arg(&file))
        .args(["config", "init", "--name", "den", "--device-host", "192.168.1.50"])
        .assert()
        .success();

    let output = orei_cmd()
        .args(config_arg(&file))
        .args(["--device", "attic", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("attic") && text.contains("den"), "Unexpected output:\n{text}");
}

// ── Device commands ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json() {
    let server = MockServer::start().await;
    mount_device(&server).await;

    let output = device_cmd(&server)
        .args(["-o", "json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let view: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["power"], true);
    assert_eq!(view["outputs"][1]["source"], "Xbox");
    assert_eq!(view["outputs"][0]["name"], "Living Room");
    assert_eq!(view["inputs"][2]["active"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_plain() {
    let server = MockServer::start().await;
    mount_device(&server).await;

    device_cmd(&server)
        .args(["-o", "plain", "status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1\tApple TV\n2\tXbox"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_probe_reports_model() {
    let server = MockServer::start().await;
    mount_device(&server).await;

    device_cmd(&server)
        .args(["-o", "plain", "probe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UHD44-EXB400R-K"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_route_by_name() {
    let server = MockServer::start().await;
    mount_device(&server).await;

    device_cmd(&server)
        .args(["route", "3", "Xbox"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Output 3 (Kitchen)"));

    let switches = switch_bodies(&server).await;
    assert_eq!(switches.len(), 1);
    assert_eq!(switches[0]["source"], json!([2, 3]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_route_unknown_source() {
    let server = MockServer::start().await;
    mount_device(&server).await;

    let output = device_cmd(&server)
        .args(["route", "1", "Roku"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(switch_bodies(&server).await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_prints_once_with_count() {
    let server = MockServer::start().await;
    mount_device(&server).await;

    let output = device_cmd(&server)
        .args(["-o", "json", "watch", "--count", "1"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "Unexpected output:\n{stdout}");
    let view: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(view["outputs"][3]["source"], "Cable");
}
