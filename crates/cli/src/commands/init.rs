// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use crate::config::{get_store_path, init_work_dir, Config};
use crate::error::Result;
use crate::sync::OfflineQueue;

pub fn run(org: String, remote: Option<String>, path: Option<PathBuf>) -> Result<()> {
    let target_path = match path {
        Some(p) => p,
        None => std::env::current_dir()?,
    };
    let (work_dir, store_path) = run_impl(&target_path, &org, remote.as_deref())?;

    println!("Initialized firewatch at {}", work_dir.display());
    println!("Org: {}", org);
    println!("Store: {}", store_path.display());
    match remote {
        Some(url) => println!("Remote: {}", url),
        None => println!("Remote: none (add a [remote] section to sync)"),
    }
    Ok(())
}

/// Create `.firewatch/` under `target_path` and its empty store.
/// Returns the work directory and the store path.
pub(crate) fn run_impl(
    target_path: &Path,
    org: &str,
    remote: Option<&str>,
) -> Result<(PathBuf, PathBuf)> {
    let work_dir = init_work_dir(target_path, org, remote)?;
    let config = Config::load(&work_dir)?;
    let store_path = get_store_path(&work_dir, &config);
    OfflineQueue::open(&store_path)?;
    Ok((work_dir, store_path))
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
