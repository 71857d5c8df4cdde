//! Integration tests for the `aruba1830` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without a switch; the port commands run against a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `aruba1830` binary with env isolation.
///
/// Clears all `ARUBA_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn aruba_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("aruba1830");
    cmd.env("HOME", "/tmp/aruba1830-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/aruba1830-cli-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("ARUBA_PROFILE")
        .env_remove("ARUBA_HOST")
        .env_remove("ARUBA_USERNAME")
        .env_remove("ARUBA_PASSWORD")
        .env_remove("ARUBA_SESSION_TOKEN")
        .env_remove("ARUBA_SESSION_COOKIE")
        .env_remove("ARUBA_OUTPUT")
        .env_remove("ARUBA_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = aruba_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    aruba_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Aruba")
            .and(predicate::str::contains("mac-table"))
            .and(predicate::str::contains("ports"))
            .and(predicate::str::contains("poe")),
    );
}

#[test]
fn test_version_flag() {
    aruba_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aruba1830"));
}

#[test]
fn test_ports_subcommands_exist() {
    aruba_cmd()
        .args(["ports", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("enable"))
                .and(predicate::str::contains("disable"))
                .and(predicate::str::contains("ban"))
                .and(predicate::str::contains("log")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    aruba_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    aruba_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aruba1830"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    aruba_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_no_config() {
    aruba_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = aruba_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = aruba_cmd()
        .args(["--output", "invalid", "ports", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_missing_host_is_auth_error() {
    let dir = TempDir::new().unwrap();
    aruba_cmd()
        .current_dir(dir.path())
        .args(["ports", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("switch host"));
}

#[test]
fn test_missing_password_without_terminal() {
    let dir = TempDir::new().unwrap();
    aruba_cmd()
        .current_dir(dir.path())
        .args(["--host", "127.0.0.1:9", "--user", "admin", "ports", "list"])
        .write_stdin("")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("password"));
}

#[test]
fn test_disable_all_requires_yes_without_terminal() {
    let dir = TempDir::new().unwrap();
    let output = aruba_cmd()
        .current_dir(dir.path())
        .args([
            "--host",
            "127.0.0.1:9",
            "--user",
            "admin",
            "--session-token",
            "tok",
            "--session-cookie",
            "cookie",
            "ports",
            "disable",
            "all",
        ])
        .write_stdin("")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[test]
fn test_malformed_host_is_usage_error() {
    let dir = TempDir::new().unwrap();
    aruba_cmd()
        .current_dir(dir.path())
        .args([
            "--host",
            "bad host",
            "--user",
            "admin",
            "--session-token",
            "tok",
            "--session-cookie",
            "cookie",
            "ports",
            "list",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a valid switch URL"));
}

// ── Against a stand-in switch ───────────────────────────────────────

struct Sections(&'static str);

impl wiremock::Match for Sections {
    fn matches(&self, request: &Request) -> bool {
        request
            .url
            .query_pairs()
            .next()
            .is_some_and(|(key, _)| key == self.0)
    }
}

fn session_args(server: &MockServer) -> Vec<String> {
    [
        "--host",
        &server.address().to_string(),
        "--user",
        "admin",
        "--session-token",
        "tok",
        "--session-cookie",
        "cookie",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

async fn mount_section(server: &MockServer, section: &'static str, entries: &str) {
    let name = section.trim_matches(|c| c == '{' || c == '}');
    let body = format!(
        "<ResponseData><DeviceConfiguration><{name} type=\"section\">{entries}\
         </{name}></DeviceConfiguration></ResponseData>"
    );
    Mock::given(method("GET"))
        .and(path("/tok/hpe/wcd"))
        .and(Sections(section))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ports_list_plain() {
    let server = MockServer::start().await;
    mount_section(
        &server,
        "{Standard802_3List}",
        "<Entry><interfaceName>1</interfaceName><adminState>1</adminState></Entry>\
         <Entry><interfaceName>2</interfaceName><adminState>2</adminState></Entry>",
    )
    .await;
    let dir = TempDir::new().unwrap();

    aruba_cmd()
        .current_dir(dir.path())
        .args(session_args(&server))
        .args(["--output", "plain", "ports", "list"])
        .assert()
        .success()
        .stdout("1\tenabled\n2\tdisabled\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ports_disable_records_activity_log() {
    let server = MockServer::start().await;
    mount_section(
        &server,
        "{ForwardingTable}",
        "<Entry><VLANID>1</VLANID><MACAddress>AA:BB:CC:00:00:01</MACAddress>\
         <interfaceType>1</interfaceType><interfaceName>3</interfaceName>\
         <addressType>3</addressType></Entry>",
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/tok/hpe/wcd"))
        .and(body_string_contains("<adminState>2</adminState>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<ResponseData><ActionStatus><statusCode>0</statusCode></ActionStatus></ResponseData>",
        ))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("switch.ports");

    aruba_cmd()
        .current_dir(dir.path())
        .args(session_args(&server))
        .arg("--port-mac-file")
        .arg(&log)
        .args(["ports", "disable", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Port 3 disabled successfully"));

    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("\"3\""), "log: {text}");
    assert!(text.contains("aa:bb:cc:00:00:01"), "log: {text}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ban_shared_port_exits_with_conflict() {
    let server = MockServer::start().await;
    mount_section(
        &server,
        "{ForwardingTable}",
        "<Entry><VLANID>1</VLANID><MACAddress>00:11:22:33:44:55</MACAddress>\
         <interfaceType>1</interfaceType><interfaceName>3</interfaceName>\
         <addressType>3</addressType></Entry>\
         <Entry><VLANID>1</VLANID><MACAddress>00:11:22:33:44:66</MACAddress>\
         <interfaceType>1</interfaceType><interfaceName>3</interfaceName>\
         <addressType>3</addressType></Entry>",
    )
    .await;
    let dir = TempDir::new().unwrap();

    aruba_cmd()
        .current_dir(dir.path())
        .args(session_args(&server))
        .args(["ports", "ban", "00:11:22:33:44:55"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("--force"));
}
