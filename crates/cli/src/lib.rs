// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fwrs - offline-first capture and sync for fire-safety inspections.
//!
//! This crate provides the functionality behind the `fw` CLI tool: field
//! records are written to a local SQLite store first and replayed against
//! the remote backend whenever it is reachable.
//!
//! # Main Components
//!
//! - [`sync::OfflineQueue`] - write path into the local store
//! - [`sync::SyncEngine`] - drains the store against a remote, one pass at a time
//! - [`sync::WsRemote`] - WebSocket client for the `fw-remote` server
//! - [`Config`] - Project configuration (org, store location, remote)
//! - [`Error`] - Error types for all operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fwrs::sync::{ManualConnectivity, OfflineQueue, RemoteConfig, SyncConfig, SyncEngine, WsRemote};
//!
//! let queue = OfflineQueue::open(Path::new("offline.db"))?;
//! let remote = Arc::new(WsRemote::new(RemoteConfig::new("ws://localhost:7890")));
//! let engine = Arc::new(SyncEngine::new(queue.store(), remote.clone(), remote, SyncConfig::new("acme")));
//!
//! let connectivity = ManualConnectivity::new();
//! engine.start(&connectivity);
//! connectivity.set_online(); // runs a pass
//! ```

mod cli;
mod commands;
mod display;
mod logging;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{CacheCommand, Cli, Command, DefectCommand, EntryCommand, OutputFormat, QueueCommand};
pub use commands::entry::EntryArgs;
pub use config::{find_work_dir, get_store_path, init_work_dir, Config, RemoteSettings};
pub use error::{Error, Result};
pub use logging::{setup_file_logging, setup_stderr_logging};

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { org, remote, path } => commands::init::run(org, remote, path),
        Command::Enqueue {
            action,
            collection,
            payload,
        } => commands::enqueue::run(&action, &collection, &payload),
        Command::Entry(EntryCommand::Add {
            task,
            asset,
            form,
            photo,
            signature,
        }) => commands::entry::add(EntryArgs {
            task,
            asset,
            form,
            photos: photo,
            signature,
        }),
        Command::Defect(DefectCommand::Add { asset, form, photo }) => {
            commands::defect::add(asset, form, photo)
        }
        Command::Cache(cmd) => match cmd {
            CacheCommand::Put {
                collection,
                id,
                payload,
            } => commands::cache::put(&collection, &id, &payload),
            CacheCommand::Get { collection, id } => commands::cache::get(&collection, &id),
            CacheCommand::List { collection } => commands::cache::list(&collection),
            CacheCommand::Clear => commands::cache::clear(),
        },
        Command::Queue(cmd) => match cmd {
            QueueCommand::List { output } => commands::queue::list(output),
            QueueCommand::Dead { output } => commands::queue::dead(output),
            QueueCommand::Requeue { id } => commands::queue::requeue(&id),
            QueueCommand::Clear => commands::queue::clear(),
        },
        Command::Pending { output } => commands::pending::run(output),
        Command::Sync { output } => commands::sync::run(output),
        Command::Watch => commands::watch::run(),
    }
}
