// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn fw() -> Command {
    cargo_bin_cmd!("fw")
}

/// Helper to create an initialized temp directory without a remote
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    fw().arg("init")
        .arg("--org")
        .arg("acme")
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory syncing to `url`
pub fn init_temp_with_remote(url: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fw().arg("init")
        .arg("--org")
        .arg("acme")
        .arg("--remote")
        .arg(url)
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Run `fw` with `args` in `temp` and return its stdout.
pub fn run_ok(temp: &TempDir, args: &[&str]) -> String {
    let output = fw()
        .args(args)
        .current_dir(temp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&output).to_string()
}

/// Run `fw` with `args` in `temp` and parse its stdout as JSON.
pub fn run_json(temp: &TempDir, args: &[&str]) -> serde_json::Value {
    serde_json::from_str(&run_ok(temp, args)).unwrap()
}

/// Queue a mutation and return its queue item ID.
pub fn enqueue(temp: &TempDir, action: &str, collection: &str, payload: &str) -> String {
    run_ok(temp, &["enqueue", action, collection, payload])
        .trim()
        .to_string()
}

/// A local port that accepts connections and closes them at once: the host
/// is reachable but every WebSocket handshake fails.
pub fn hangup_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            drop(stream);
        }
    });
    format!("ws://127.0.0.1:{}", port)
}

/// A closed local port: connecting to it fails immediately.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("ws://127.0.0.1:{}", port)
}
