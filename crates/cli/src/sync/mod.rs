// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first sync of field records to the remote backend.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ OfflineQueue │────►│  SyncEngine  │────►│ RemoteStore  │
//! │   (SQLite)   │◄────│   (passes)   │────►│  BlobStore   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             ▲                    │
//!                             │                    ▼
//!                      ┌──────────────┐     ┌──────────────┐
//!                      │ Connectivity │     │   WsRemote   │
//!                      │  (observer)  │     │ (Transport)  │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! Writes land in the local store first. A sync pass drains the generic
//! queue, then offline entries, then offline defects. Passes run on demand
//! or whenever connectivity comes back; at most one runs at a time.

mod client;
mod connectivity;
mod documents;
mod engine;
mod queue;
mod remote;
mod status;
mod transport;

pub use client::{RemoteConfig, WsRemote, DEFAULT_REQUEST_TIMEOUT};
pub use connectivity::{
    probe_address, probe_once, Connectivity, ConnectivityObserver, ManualConnectivity,
    ProbeConnectivity,
};
pub use documents::{
    blob_path, DEFECTS_COLLECTION, DEFECTS_FOLDER, ENTRIES_COLLECTION, EVIDENCE_FOLDER,
    SIGNATURES_FOLDER, TASKS_COLLECTION,
};
pub use engine::{
    PassOutcome, QueueStats, RecordStats, SyncConfig, SyncEngine, SyncError, SyncReport,
    SyncResult, DEFAULT_MAX_RETRIES,
};
pub use queue::{OfflineQueue, SharedStore};
pub use remote::{BlobStore, RemoteError, RemoteFuture, RemoteResult, RemoteStore};
pub use status::{ListenerId, SyncStatus};
pub use transport::{Transport, TransportError, WebSocketTransport};

#[cfg(test)]
pub(crate) mod test_helpers;
