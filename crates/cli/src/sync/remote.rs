// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote collaborators consumed by the sync engine.
//!
//! The engine never talks to a concrete backend. It writes documents through
//! [`RemoteStore`] and media through [`BlobStore`], which keeps the engine
//! testable with in-memory fakes.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;

use super::transport::TransportError;

/// Error type for remote operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The remote could not be reached.
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// The remote refused the request.
    #[error("remote rejected request: {0}")]
    Rejected(String),

    /// No reply arrived in time.
    #[error("remote request timed out after {0:?}")]
    Timeout(Duration),

    /// The remote replied with something the client did not ask for.
    #[error("unexpected reply from remote: {0}")]
    Protocol(String),
}

impl From<TransportError> for RemoteError {
    fn from(err: TransportError) -> Self {
        RemoteError::Unavailable(err.to_string())
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by remote operations.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// Remote document database, addressed by collection and document ID.
pub trait RemoteStore: Send + Sync {
    /// Write a full document under the given ID, replacing any existing one.
    fn create<'a>(&'a self, collection: &'a str, id: &'a str, document: Value)
        -> RemoteFuture<'a, ()>;

    /// Merge top-level fields into an existing document.
    fn update<'a>(&'a self, collection: &'a str, id: &'a str, patch: Value) -> RemoteFuture<'a, ()>;

    /// Remove a document.
    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()>;
}

/// Remote blob storage, addressed by path.
pub trait BlobStore: Send + Sync {
    /// Store bytes at the given path.
    fn upload<'a>(
        &'a self,
        path: &'a str,
        bytes: &'a [u8],
        content_type: &'a str,
    ) -> RemoteFuture<'a, ()>;

    /// Resolve the public URL of a stored blob.
    fn download_url<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, String>;
}
