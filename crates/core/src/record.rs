// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Records held by the offline store.
//!
//! - [`QueueItem`]: a pending remote mutation
//! - [`CachedRecord`]: a mirrored remote document for offline reads
//! - [`OfflineEntry`]: a completed inspection captured while offline
//! - [`OfflineDefect`]: a defect report captured while offline
//! - [`DeadLetter`]: a queue item dropped after exhausting its retries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::id;

/// Form field holding the signature `data:` URL of an inspection entry.
pub const SIGNATURE_FIELD: &str = "signature";

/// Remote mutation carried by a queue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Write the payload as a full document (set-with-id).
    Create,
    /// Patch the payload fields onto an existing document.
    Update,
    /// Remove the document.
    Delete,
}

impl Action {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

/// A mutation waiting to be replayed against the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Generated record ID.
    pub id: String,
    /// The remote mutation to perform.
    pub action: Action,
    /// Remote collection the payload belongs to.
    pub collection_name: String,
    /// Document body; `payload.id` names the remote document.
    pub payload: Value,
    /// When the item was queued.
    pub enqueued_at: DateTime<Utc>,
    /// Failed replay attempts so far.
    pub retry_count: u32,
}

impl QueueItem {
    /// Creates a fresh queue item with no failed attempts.
    pub fn new(action: Action, collection_name: impl Into<String>, payload: Value) -> Self {
        QueueItem {
            id: id::generate_id(),
            action,
            collection_name: collection_name.into(),
            payload,
            enqueued_at: Utc::now(),
            retry_count: 0,
        }
    }

    /// Returns the remote document ID named by the payload.
    pub fn document_id(&self) -> Result<&str> {
        self.payload
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::InvalidPayload(format!(
                    "{} on '{}' has no string 'id' field",
                    self.action, self.collection_name
                ))
            })
    }

    /// Returns the payload fields to patch, without the `id` field.
    pub fn patch_fields(&self) -> Value {
        match &self.payload {
            Value::Object(map) => {
                let mut fields = map.clone();
                fields.remove("id");
                Value::Object(fields)
            }
            other => other.clone(),
        }
    }
}

/// A remote document mirrored locally for offline reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRecord {
    /// Cache key (format: `{collection}:{entity_id}`).
    pub id: String,
    /// Remote collection of the document.
    pub collection_name: String,
    /// Remote document ID.
    pub entity_id: String,
    /// Last seen document body.
    pub payload: Value,
    /// When the document was cached.
    pub cached_at: DateTime<Utc>,
}

impl CachedRecord {
    /// Creates a cached record stamped with the current time.
    pub fn new(
        collection_name: impl Into<String>,
        entity_id: impl Into<String>,
        payload: Value,
    ) -> Self {
        let collection_name = collection_name.into();
        let entity_id = entity_id.into();
        CachedRecord {
            id: id::cache_key(&collection_name, &entity_id),
            collection_name,
            entity_id,
            payload,
            cached_at: Utc::now(),
        }
    }
}

/// A completed inspection captured while offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineEntry {
    /// Generated record ID, reused as the remote document ID.
    pub id: String,
    /// Inspection task completed by this entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Asset inspected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    /// Captured form fields, including an optional signature data URL.
    pub form_data: Map<String, Value>,
    /// Photo evidence, in capture order.
    #[serde(skip)]
    pub photos: Vec<Vec<u8>>,
    /// When the inspection was captured.
    pub created_at: DateTime<Utc>,
    /// URLs of photos already uploaded, in capture order.
    #[serde(default)]
    pub evidence_urls: Vec<String>,
    /// URL of the signature once uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<String>,
}

impl OfflineEntry {
    /// Creates an entry with nothing uploaded yet.
    pub fn new(
        task_id: Option<String>,
        asset_id: Option<String>,
        form_data: Map<String, Value>,
        photos: Vec<Vec<u8>>,
    ) -> Self {
        OfflineEntry {
            id: id::generate_id(),
            task_id,
            asset_id,
            form_data,
            photos,
            created_at: Utc::now(),
            evidence_urls: Vec::new(),
            signature_url: None,
        }
    }

    /// Returns the signature data URL captured with the form, if any.
    pub fn signature_data_url(&self) -> Option<&str> {
        self.form_data
            .get(SIGNATURE_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Returns the photos not yet uploaded, with their capture index.
    pub fn pending_photos(&self) -> impl Iterator<Item = (usize, &[u8])> {
        pending(&self.photos, self.evidence_urls.len())
    }
}

/// A defect report captured while offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineDefect {
    /// Generated record ID, reused as the remote document ID.
    pub id: String,
    /// Asset the defect was found on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    /// Captured form fields.
    pub form_data: Map<String, Value>,
    /// Photo evidence, in capture order.
    #[serde(skip)]
    pub photos: Vec<Vec<u8>>,
    /// When the defect was reported.
    pub created_at: DateTime<Utc>,
    /// URLs of photos already uploaded, in capture order.
    #[serde(default)]
    pub evidence_urls: Vec<String>,
}

impl OfflineDefect {
    /// Creates a defect with nothing uploaded yet.
    pub fn new(
        asset_id: Option<String>,
        form_data: Map<String, Value>,
        photos: Vec<Vec<u8>>,
    ) -> Self {
        OfflineDefect {
            id: id::generate_id(),
            asset_id,
            form_data,
            photos,
            created_at: Utc::now(),
            evidence_urls: Vec::new(),
        }
    }

    /// Returns the photos not yet uploaded, with their capture index.
    pub fn pending_photos(&self) -> impl Iterator<Item = (usize, &[u8])> {
        pending(&self.photos, self.evidence_urls.len())
    }
}

fn pending(photos: &[Vec<u8>], uploaded: usize) -> impl Iterator<Item = (usize, &[u8])> {
    photos
        .iter()
        .enumerate()
        .skip(uploaded)
        .map(|(i, p)| (i, p.as_slice()))
}

/// A queue item dropped after exhausting its retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetter {
    /// ID of the original queue item.
    pub id: String,
    /// The remote mutation that kept failing.
    pub action: Action,
    /// Remote collection of the payload.
    pub collection_name: String,
    /// Document body of the original item.
    pub payload: Value,
    /// When the original item was queued.
    pub enqueued_at: DateTime<Utc>,
    /// Retry count at the time it was dropped.
    pub retry_count: u32,
    /// Error from the final attempt.
    pub last_error: String,
    /// When the item was dropped.
    pub dead_at: DateTime<Utc>,
}

impl DeadLetter {
    /// Builds a dead letter from a queue item and its final error.
    pub fn from_item(item: &QueueItem, last_error: impl Into<String>) -> Self {
        DeadLetter {
            id: item.id.clone(),
            action: item.action,
            collection_name: item.collection_name.clone(),
            payload: item.payload.clone(),
            enqueued_at: item.enqueued_at,
            retry_count: item.retry_count,
            last_error: last_error.into(),
            dead_at: Utc::now(),
        }
    }

    /// Returns a fresh queue item carrying the same mutation.
    pub fn requeue(&self) -> QueueItem {
        QueueItem {
            id: self.id.clone(),
            action: self.action,
            collection_name: self.collection_name.clone(),
            payload: self.payload.clone(),
            enqueued_at: Utc::now(),
            retry_count: 0,
        }
    }
}

/// Number of records waiting in each table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PendingCounts {
    pub queue: usize,
    pub entries: usize,
    pub defects: usize,
    pub dead_letters: usize,
}

impl PendingCounts {
    /// Returns true if nothing is waiting to be synced.
    pub fn is_idle(&self) -> bool {
        self.queue == 0 && self.entries == 0 && self.defects == 0
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
