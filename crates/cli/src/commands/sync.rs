// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use tracing::debug;

use super::{build_engine, open_queue, print_json, runtime};
use crate::cli::OutputFormat;
use crate::display::format_report;
use crate::error::{Error, Result};
use crate::sync::{probe_once, Connectivity, PassOutcome, SyncEngine, SyncReport};

/// Run one pass against the configured remote and print its report.
///
/// Nothing is attempted while the remote host is unreachable, so an offline
/// run never spends retries.
pub fn run(output: OutputFormat) -> Result<()> {
    let (queue, config, _) = open_queue()?;
    let remote = config.remote()?;
    let addr = remote.probe_addr()?;
    let timeout = remote.request_timeout();
    let engine = build_engine(&queue, &config)?;
    let rt = runtime()?;
    let report = rt.block_on(async {
        ensure_reachable(&addr, timeout).await?;
        run_impl(&engine).await
    })?;

    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => println!("{}", format_report(&report)),
    }
    Ok(())
}

pub(crate) async fn ensure_reachable(addr: &str, timeout: Duration) -> Result<()> {
    match probe_once(addr, timeout).await {
        Connectivity::Online => Ok(()),
        Connectivity::Offline => {
            debug!(addr, "remote host unreachable, skipping pass");
            Err(Error::RemoteUnreachable(addr.to_string()))
        }
    }
}

pub(crate) async fn run_impl(engine: &SyncEngine) -> Result<SyncReport> {
    match engine.sync_now().await? {
        PassOutcome::Completed(report) => Ok(report),
        PassOutcome::Skipped => Err(Error::Sync(
            "another sync pass is already running".to_string(),
        )),
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
