//! CLI arg parsing tests for hostpulse (viewer)
use assert_cmd::prelude::*;
use std::process::Command;

fn help_text() -> String {
    let out = Command::cargo_bin("hostpulse")
        .expect("binary exists")
        .arg("--help")
        .output()
        .expect("run hostpulse --help");
    assert!(out.status.success());
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn help_mentions_url_argument() {
    let text = help_text();
    assert!(text.contains("Usage:") && text.contains("[URL]"), "unexpected help\n{text}");
}

#[test]
fn url_defaults_to_local_agent() {
    let text = help_text();
    assert!(
        text.contains("[default: ws://localhost:9500/ws]"),
        "default url missing\n{text}"
    );
}

#[test]
fn version_flag_prints_package_version() {
    let out = Command::cargo_bin("hostpulse")
        .expect("binary exists")
        .arg("--version")
        .output()
        .expect("run hostpulse --version");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn extra_positional_rejected() {
    let out = Command::cargo_bin("hostpulse")
        .expect("binary exists")
        .args(["ws://a/ws", "ws://b/ws"])
        .output()
        .expect("run hostpulse");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unexpected argument"));
}
