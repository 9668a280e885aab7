// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod cache;
pub mod defect;
pub mod enqueue;
pub mod entry;
pub mod init;
pub mod pending;
pub mod queue;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{find_work_dir, get_store_path, validate_record_id, Config};
use crate::error::{Error, Result};
use crate::sync::{OfflineQueue, SyncEngine, WsRemote};

/// Helper to open the offline store from the current context.
pub fn open_queue() -> Result<(OfflineQueue, Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let store_path = get_store_path(&work_dir, &config);
    if let Some(parent) = store_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let queue = OfflineQueue::open(&store_path)?;
    Ok((queue, config, work_dir))
}

/// Build a sync engine over `queue`'s store talking to the configured remote.
pub(crate) fn build_engine(queue: &OfflineQueue, config: &Config) -> Result<Arc<SyncEngine>> {
    let remote = Arc::new(WsRemote::new(config.remote()?.client_config()));
    Ok(Arc::new(SyncEngine::new(
        queue.store(),
        remote.clone(),
        remote,
        config.sync_config(),
    )))
}

/// Create the tokio runtime that drives remote work.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))
}

/// Parse a command-line JSON argument that must be an object.
pub(crate) fn parse_object(what: &'static str, text: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidJson {
        what,
        reason: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::NotAnObject { what }),
    }
}

/// Reject a task or asset ID that cannot name a blob folder.
pub(crate) fn check_record_id(what: &'static str, id: Option<&str>) -> Result<()> {
    match id {
        Some(id) if !validate_record_id(id) => Err(Error::InvalidRecordId {
            what,
            id: id.to_string(),
        }),
        _ => Ok(()),
    }
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::UnreadableFile {
        path: path.display().to_string(),
        source,
    })
}

/// Read photo files in the order given.
pub(crate) fn read_photos(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    paths.iter().map(|path| read_file(path)).collect()
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
