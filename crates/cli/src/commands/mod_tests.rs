// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Test infrastructure for command testing without a `.firewatch/` setup.
//!
//! ```rust,ignore
//! use crate::commands::testing::TestContext;
//!
//! #[test]
//! fn test_some_command() {
//!     let ctx = TestContext::new();
//!     let photo = ctx.write_file("a.jpg", b"jpeg");
//!     // Test command logic using ctx.queue and ctx.config
//! }
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fw_core::Database;
use tempfile::TempDir;

use crate::config::Config;
use crate::sync::OfflineQueue;

/// Test context providing an in-memory store, a default config and a
/// scratch directory for input files.
pub struct TestContext {
    pub queue: OfflineQueue,
    pub config: Config,
    pub dir: PathBuf,
    _temp_dir: TempDir, // Keep alive for duration of test
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("Failed to create in-memory database");
        let config = Config::new("org-1".to_string()).expect("Failed to create config");
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestContext {
            queue: OfflineQueue::new(Arc::new(Mutex::new(db))),
            config,
            dir: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        }
    }

    /// Write `bytes` to a scratch file and return its path.
    pub fn write_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

#[test]
fn test_parse_object_accepts_object() {
    let map = super::parse_object("form", r#"{"result":"pass"}"#).unwrap();
    assert_eq!(map["result"], "pass");
}

#[test]
fn test_parse_object_rejects_array() {
    let err = super::parse_object("form", "[1,2]").unwrap_err();
    assert_eq!(err.to_string(), "form must be a JSON object");
}

#[test]
fn test_parse_object_rejects_malformed() {
    let err = super::parse_object("payload", "{").unwrap_err();
    assert!(err.to_string().starts_with("invalid payload:"));
}

#[test]
fn test_read_photos_keeps_order() {
    let ctx = TestContext::new();
    let a = ctx.write_file("a.jpg", b"first");
    let b = ctx.write_file("b.jpg", b"second");
    let photos = super::read_photos(&[b, a]).unwrap();
    assert_eq!(photos, vec![b"second".to_vec(), b"first".to_vec()]);
}

#[test]
fn test_read_missing_file() {
    let ctx = TestContext::new();
    let err = super::read_file(&ctx.dir.join("missing.jpg")).unwrap_err();
    assert!(err.to_string().contains("missing.jpg"));
}

#[test]
fn test_build_engine_requires_remote() {
    let ctx = TestContext::new();
    assert!(matches!(
        super::build_engine(&ctx.queue, &ctx.config),
        Err(crate::error::Error::NoRemote)
    ));
}
