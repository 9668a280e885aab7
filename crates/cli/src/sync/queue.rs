// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline write path into the local store.
//!
//! Every mutation made while offline goes through [`OfflineQueue`]: queued
//! remote mutations, captured inspection entries and defect reports, and
//! the read-through cache of remote documents. The sync engine shares the
//! same store and drains what is written here.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use fw_core::{
    Action, CachedRecord, Database, DeadLetter, OfflineDefect, OfflineEntry, PendingCounts,
    QueueItem, Result,
};

/// Local store shared between the queue writer and the sync engine.
pub type SharedStore = Arc<Mutex<Database>>;

/// Lock the shared store.
///
/// A poisoned lock is recovered: every multi-row write is a SQLite
/// transaction, so a panicking holder cannot leave partial state behind.
pub(crate) fn lock_store(store: &SharedStore) -> MutexGuard<'_, Database> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writer for the offline store.
#[derive(Clone)]
pub struct OfflineQueue {
    store: SharedStore,
}

impl OfflineQueue {
    /// Open (creating if needed) the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::open(path)?;
        Ok(Self::new(Arc::new(Mutex::new(db))))
    }

    /// Wrap an already open store.
    pub fn new(store: SharedStore) -> Self {
        OfflineQueue { store }
    }

    /// The underlying store, for sharing with a [`SyncEngine`](super::SyncEngine).
    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    /// Queue a remote mutation. Returns the new queue item's ID.
    pub fn enqueue(
        &self,
        action: Action,
        collection_name: &str,
        payload: Value,
    ) -> Result<String> {
        let item = QueueItem::new(action, collection_name, payload);
        lock_store(&self.store).enqueue(&item)?;
        tracing::debug!(id = %item.id, %action, collection = collection_name, "queued mutation");
        Ok(item.id)
    }

    /// Store an inspection entry captured offline.
    pub fn save_entry(&self, entry: &OfflineEntry) -> Result<()> {
        lock_store(&self.store).save_entry(entry)
    }

    /// Store a defect report captured offline.
    pub fn save_defect(&self, defect: &OfflineDefect) -> Result<()> {
        lock_store(&self.store).save_defect(defect)
    }

    /// Mirror a remote document for offline reads.
    pub fn cache_put(&self, collection_name: &str, entity_id: &str, payload: Value) -> Result<()> {
        let record = CachedRecord::new(collection_name, entity_id, payload);
        lock_store(&self.store).put_cached(&record)
    }

    /// Read a mirrored document.
    pub fn cache_get(
        &self,
        collection_name: &str,
        entity_id: &str,
    ) -> Result<Option<CachedRecord>> {
        lock_store(&self.store).get_cached(collection_name, entity_id)
    }

    /// List mirrored documents of one collection.
    pub fn cache_list(&self, collection_name: &str) -> Result<Vec<CachedRecord>> {
        lock_store(&self.store).list_cached(collection_name)
    }

    /// Drop every mirrored document. Returns the number removed.
    pub fn clear_cache(&self) -> Result<usize> {
        lock_store(&self.store).clear_cache()
    }

    /// Queued mutations in replay order.
    pub fn list(&self) -> Result<Vec<QueueItem>> {
        lock_store(&self.store).list_queue()
    }

    /// Drop every queued mutation. Returns the number removed.
    pub fn clear(&self) -> Result<usize> {
        lock_store(&self.store).clear_queue()
    }

    /// Mutations dropped after exhausting their retries.
    pub fn dead_letters(&self) -> Result<Vec<DeadLetter>> {
        lock_store(&self.store).list_dead_letters()
    }

    /// Move a dead letter back into the queue.
    pub fn requeue(&self, id: &str) -> Result<QueueItem> {
        lock_store(&self.store).requeue_dead_letter(id)
    }

    /// Number of records waiting in each table.
    pub fn pending_counts(&self) -> Result<PendingCounts> {
        lock_store(&self.store).pending_counts()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
