//! CLI and exit-code tests for hostpulse_agent (server)
use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn help_mentions_port_flags() {
    let out = Command::cargo_bin("hostpulse_agent")
        .expect("binary exists")
        .arg("--help")
        .output()
        .expect("run agent --help");
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(
        text.contains("--port") && text.contains("-p") && text.contains("PORT"),
        "help text missing port flags\n{text}"
    );
}

#[test]
fn port_already_in_use_exits_with_one() {
    let held = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = held.local_addr().unwrap().port();

    let out = Command::cargo_bin("hostpulse_agent")
        .expect("binary exists")
        .env_remove("PORT")
        .args(["--bind", "127.0.0.1", "-p", &port.to_string()])
        .output()
        .expect("run agent");
    assert_eq!(out.status.code(), Some(1));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(text.contains("already in use"), "unexpected output\n{text}");
    drop(held);
}

#[test]
fn port_read_from_environment() {
    let held = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = held.local_addr().unwrap().port();

    // Same conflict, but the port only arrives through PORT
    let out = Command::cargo_bin("hostpulse_agent")
        .expect("binary exists")
        .env("PORT", port.to_string())
        .args(["--bind", "127.0.0.1"])
        .output()
        .expect("run agent");
    assert_eq!(out.status.code(), Some(1));
    drop(held);
}
