// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn test_file_logging_creates_log_file() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("firewatch.log");

    setup_file_logging(&log_path);
    assert!(log_path.exists());
}

#[test]
fn test_file_logging_falls_back_without_panicking() {
    let temp = TempDir::new().unwrap();
    setup_file_logging(&temp.path().join("missing/dir/firewatch.log"));
    setup_stderr_logging();
}
