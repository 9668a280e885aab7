// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{RemoteError, SyncError};

/// All possible errors that can occur in the fwrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'fw init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("invalid org ID: '{0}'\n  hint: use letters, digits, '-' or '_'")]
    InvalidOrgId(String),

    #[error("invalid {what} ID: '{id}'\n  hint: use letters, digits, '-' or '_'")]
    InvalidRecordId { what: &'static str, id: String },

    #[error("{0}")]
    InvalidRemoteUrl(String),

    #[error("no remote configured\n  hint: add a [remote] section with url = \"ws://host:port\" to .firewatch/config.toml")]
    NoRemote,

    #[error("queue item not found: {0}")]
    QueueItemNotFound(String),

    #[error("dead letter not found: {0}\n  hint: run 'fw queue dead' to list dead letters")]
    DeadLetterNotFound(String),

    #[error("cached record not found: {collection}/{id}")]
    CachedRecordNotFound { collection: String, id: String },

    #[error("invalid action: '{0}'\n  hint: valid actions are: create, update, delete")]
    InvalidAction(String),

    #[error("invalid {what}: {reason}")]
    InvalidJson { what: &'static str, reason: String },

    #[error("{what} must be a JSON object")]
    NotAnObject { what: &'static str },

    #[error("cannot read {path}: {source}")]
    UnreadableFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("remote unreachable: {0}\n  hint: queued work is kept; run 'fw sync' again once the network is back")]
    RemoteUnreachable(String),

    #[error("another 'fw watch' is already draining this store\n  hint: lock held on {0}")]
    WatchLocked(String),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("sync failed: {0}")]
    Sync(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("corrupted data in database: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for fwrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<fw_core::Error> for Error {
    fn from(e: fw_core::Error) -> Self {
        match e {
            fw_core::Error::QueueItemNotFound(id) => Error::QueueItemNotFound(id),
            fw_core::Error::DeadLetterNotFound(id) => Error::DeadLetterNotFound(id),
            fw_core::Error::EntryNotFound(id) => {
                Error::CorruptedData(format!("offline entry vanished: {}", id))
            }
            fw_core::Error::DefectNotFound(id) => {
                Error::CorruptedData(format!("offline defect vanished: {}", id))
            }
            fw_core::Error::InvalidAction(s) => Error::InvalidAction(s),
            fw_core::Error::InvalidDataUrl(s) | fw_core::Error::InvalidPayload(s) => {
                Error::InvalidData(s)
            }
            fw_core::Error::Database(e) => Error::Database(e),
            fw_core::Error::Io(e) => Error::Io(e),
            fw_core::Error::Json(e) => Error::Json(e),
            fw_core::Error::CorruptedData(s) => Error::CorruptedData(s),
        }
    }
}

impl From<SyncError> for Error {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Store(e) => e.into(),
            SyncError::Remote(e) => Error::Remote(e),
            SyncError::InvalidRecord(s) => Error::Sync(s),
            SyncError::Removed(id) => Error::Sync(format!("record removed during sync: {}", id)),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
