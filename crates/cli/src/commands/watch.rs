// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running sync driven by connectivity probes.
//!
//! `fw watch` probes the remote host, runs a pass on every transition to
//! online and prints each status change. One watcher per store: an exclusive
//! lock next to the store refuses a second one.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{build_engine, open_queue, runtime};
use crate::config::{get_data_dir, LOCK_FILE_NAME, LOG_FILE_NAME};
use crate::display::format_status;
use crate::error::{Error, Result};
use crate::logging::setup_file_logging;
use crate::sync::{Connectivity, ProbeConnectivity, SyncEngine};

pub fn run() -> Result<()> {
    let (queue, config, work_dir) = open_queue()?;
    let remote = config.remote()?.clone();
    let addr = remote.probe_addr()?;

    let data_dir = get_data_dir(&work_dir, &config);
    fs::create_dir_all(&data_dir)?;
    let lock_file = acquire_lock(&data_dir.join(LOCK_FILE_NAME))?;
    setup_file_logging(&data_dir.join(LOG_FILE_NAME));
    info!(url = %remote.url, probe = %addr, "fw watch starting");

    let engine = build_engine(&queue, &config)?;
    let rt = runtime()?;
    let result = rt.block_on(watch(engine, &remote.url, addr, remote.probe_interval()));

    drop(lock_file);
    info!("fw watch stopped");
    result
}

async fn watch(engine: Arc<SyncEngine>, url: &str, addr: String, interval: Duration) -> Result<()> {
    engine.add_listener(|status| println!("{}", format_status(status)));

    let probe = ProbeConnectivity::spawn(addr, interval);
    engine.start(&probe);
    // The first probe may have finished before the engine subscribed
    if probe.current() == Some(Connectivity::Online) {
        let _ = engine.sync_now().await;
    }

    println!("Watching {} (Ctrl-C to stop)", url);
    tokio::signal::ctrl_c().await?;

    engine.dispose();
    Ok(())
}

/// Acquire an exclusive lock on the lock file.
fn acquire_lock(lock_path: &Path) -> Result<File> {
    use fs2::FileExt;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;

    // Try to acquire exclusive lock (non-blocking)
    file.try_lock_exclusive()
        .map_err(|_| Error::WatchLocked(lock_path.display().to_string()))?;

    Ok(file)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
