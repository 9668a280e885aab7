// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for fw-core operations.

use thiserror::Error;

/// All possible errors that can occur in fw-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("queue item not found: {0}")]
    QueueItemNotFound(String),

    #[error("offline entry not found: {0}")]
    EntryNotFound(String),

    #[error("offline defect not found: {0}")]
    DefectNotFound(String),

    #[error("dead letter not found: {0}")]
    DeadLetterNotFound(String),

    #[error("invalid action: '{0}'\n  hint: valid actions are: create, update, delete")]
    InvalidAction(String),

    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for fw-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
