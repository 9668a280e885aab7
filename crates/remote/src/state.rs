// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the document database and the blob directory for shared access
//! from every connection.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use fw_core::protocol::decode_blob;

const DOCUMENTS_DB: &str = "documents.db";
const BLOBS_DIR: &str = "blobs";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);
"#;

/// Errors reported back to clients as `error` replies.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("no such document: {collection}/{id}")]
    DocumentNotFound { collection: String, id: String },

    #[error("{0} must be a JSON object")]
    NotAnObject(&'static str),

    #[error("invalid blob path: '{0}'")]
    InvalidBlobPath(String),

    #[error("no such blob: {0}")]
    BlobNotFound(String),

    #[error("invalid blob data: {0}")]
    InvalidBlobData(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StateError>;

/// Shared server state containing the document database and blob root.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    /// The document database (protected by mutex for writes).
    db: Mutex<Connection>,
    /// Root directory of stored blobs.
    blob_dir: PathBuf,
    /// Base of every download URL, without a trailing slash.
    public_url: String,
}

impl ServerState {
    /// Opens (or creates) the document database and blob directory under `data_dir`.
    pub fn new(data_dir: &Path, public_url: Option<String>) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let blob_dir = data_dir.join(BLOBS_DIR);
        std::fs::create_dir_all(&blob_dir)?;
        let blob_dir = std::fs::canonicalize(&blob_dir)?;

        let db = Connection::open(data_dir.join(DOCUMENTS_DB))?;
        db.execute_batch(SCHEMA)?;

        let public_url = match public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("file://{}", blob_dir.display()),
        };

        Ok(ServerState {
            inner: Arc::new(ServerStateInner {
                db: Mutex::new(db),
                blob_dir,
                public_url,
            }),
        })
    }

    pub fn public_url(&self) -> &str {
        &self.inner.public_url
    }

    /// Writes a full document, replacing any previous one.
    pub async fn create(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        if !document.is_object() {
            return Err(StateError::NotAnObject("document"));
        }
        let body = serde_json::to_string(&document)?;
        let db = self.inner.db.lock().await;
        db.execute(
            "INSERT OR REPLACE INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
            params![collection, id, body],
        )?;
        debug!(collection, id, "document written");
        Ok(())
    }

    /// Merges the top-level fields of `patch` into an existing document.
    pub async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()> {
        let Value::Object(patch) = patch else {
            return Err(StateError::NotAnObject("patch"));
        };
        let db = self.inner.db.lock().await;
        let mut document = load_document(&db, collection, id)?.ok_or_else(|| {
            StateError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }
        })?;
        document.extend(patch);
        db.execute(
            "UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2",
            params![collection, id, serde_json::to_string(&document)?],
        )?;
        debug!(collection, id, "document updated");
        Ok(())
    }

    /// Removes a document. Removing a missing document succeeds.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let db = self.inner.db.lock().await;
        let removed = db.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )?;
        debug!(collection, id, removed, "document deleted");
        Ok(())
    }

    /// Reads a document back.
    #[cfg(test)]
    pub async fn document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let db = self.inner.db.lock().await;
        Ok(load_document(&db, collection, id)?.map(Value::Object))
    }

    /// Stores base64 `data` at `path`, replacing any previous blob.
    pub async fn upload(&self, path: &str, content_type: &str, data: &str) -> Result<()> {
        let file = self.blob_file(path)?;
        let bytes = decode_blob(data).map_err(|e| StateError::InvalidBlobData(e.to_string()))?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file, &bytes).await?;
        debug!(path, content_type, size = bytes.len(), "blob stored");
        Ok(())
    }

    /// Resolves the download URL of a stored blob.
    pub async fn download_url(&self, path: &str) -> Result<String> {
        let file = self.blob_file(path)?;
        if !tokio::fs::try_exists(&file).await? {
            return Err(StateError::BlobNotFound(path.to_string()));
        }
        Ok(format!("{}/{}", self.inner.public_url, path))
    }

    /// Maps a blob path onto the blob directory. Only plain relative
    /// segments are accepted.
    fn blob_file(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let plain = !path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !plain {
            return Err(StateError::InvalidBlobPath(path.to_string()));
        }
        Ok(self.inner.blob_dir.join(relative))
    }
}

fn load_document(
    db: &Connection,
    collection: &str,
    id: &str,
) -> Result<Option<Map<String, Value>>> {
    let body: Option<String> = db
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()?;
    match body {
        None => Ok(None),
        Some(body) => match serde_json::from_str(&body)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(StateError::NotAnObject("stored document")),
        },
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
