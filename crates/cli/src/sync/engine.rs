// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync engine draining the offline store into the remote.
//!
//! A pass runs three stages in order, each item its own failure domain:
//! 1. Queue: replay mutations FIFO; retry up to the ceiling, then dead-letter
//! 2. Entries: upload photos, then signature, write the entry, patch the task
//! 3. Defects: upload photos, write the defect
//!
//! Entries and defects are retried on every pass until they succeed. Each
//! completed upload is recorded locally so a retried record resumes from the
//! first incomplete step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fw_core::media::sniff_content_type;
use fw_core::{Action, DataUrl, Database, OfflineDefect, OfflineEntry, QueueItem};

use super::connectivity::{Connectivity, ConnectivityObserver};
use super::documents::{
    blob_path, defect_document, entry_document, task_completion_patch, DEFECTS_COLLECTION,
    DEFECTS_FOLDER, ENTRIES_COLLECTION, EVIDENCE_FOLDER, SIGNATURES_FOLDER, TASKS_COLLECTION,
};
use super::queue::{lock_store, SharedStore};
use super::remote::{BlobStore, RemoteError, RemoteStore};
use super::status::{ListenerId, Listeners, SyncStatus};

/// Default retry ceiling for queued mutations.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Organisation owning every uploaded blob.
    pub org_id: String,
    /// Failed attempts a queue item may accumulate before it is dead-lettered.
    pub max_retries: u32,
}

impl SyncConfig {
    pub fn new(org_id: impl Into<String>) -> Self {
        SyncConfig {
            org_id: org_id.into(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Error type for sync engine operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The local store failed; aborts the pass.
    #[error("local store error: {0}")]
    Store(#[from] fw_core::Error),

    /// A remote call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A stored record cannot be sent as is.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The record was removed from the local store while the pass used it.
    #[error("record removed during sync: {0}")]
    Removed(String),
}

impl SyncError {
    /// True for failures that abort the whole pass rather than one item.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, SyncError::Store(_))
    }

    /// Classify a store error. A missing record only concerns that record.
    fn from_store(e: fw_core::Error) -> Self {
        match e {
            fw_core::Error::QueueItemNotFound(id)
            | fw_core::Error::EntryNotFound(id)
            | fw_core::Error::DefectNotFound(id) => SyncError::Removed(id),
            e => SyncError::Store(e),
        }
    }
}

/// Result type for sync engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Queue stage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Items applied remotely and removed.
    pub applied: usize,
    /// Items that failed and stay queued.
    pub retried: usize,
    /// Items that failed past the ceiling and were dead-lettered.
    pub dropped: usize,
}

/// Entry or defect stage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    /// Records fully synced and removed.
    pub synced: usize,
    /// Records left for the next pass.
    pub failed: usize,
}

/// Outcome counters of one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub queue: QueueStats,
    pub entries: RecordStats,
    pub defects: RecordStats,
}

impl SyncReport {
    /// True if every item seen in the pass was synced.
    pub fn is_clean(&self) -> bool {
        self.queue.retried == 0
            && self.queue.dropped == 0
            && self.entries.failed == 0
            && self.defects.failed == 0
    }
}

/// Result of asking the engine for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// A pass ran to completion.
    Completed(SyncReport),
    /// Another pass was already running; nothing was done.
    Skipped,
}

/// Resets the in-flight flag when a pass ends, however it ends.
struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Driver {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drains the offline store into the remote on connectivity transitions.
pub struct SyncEngine {
    store: SharedStore,
    remote: Arc<dyn RemoteStore>,
    blobs: Arc<dyn BlobStore>,
    config: SyncConfig,
    in_flight: AtomicBool,
    listeners: Listeners,
    driver: Mutex<Option<Driver>>,
}

impl SyncEngine {
    pub fn new(
        store: SharedStore,
        remote: Arc<dyn RemoteStore>,
        blobs: Arc<dyn BlobStore>,
        config: SyncConfig,
    ) -> Self {
        SyncEngine {
            store,
            remote,
            blobs,
            config,
            in_flight: AtomicBool::new(false),
            listeners: Listeners::new(),
            driver: Mutex::new(None),
        }
    }

    /// Register a status listener.
    pub fn add_listener(
        &self,
        listener: impl Fn(SyncStatus) + Send + Sync + 'static,
    ) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Remove a status listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// True while a pass is running.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Follow `observer`: every online transition runs a pass, every offline
    /// transition reports idle. Replaces a previous driver.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>, observer: &dyn ConnectivityObserver) {
        let mut rx = observer.subscribe();
        let cancel = CancellationToken::new();
        let engine = Arc::clone(self);
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            loop {
                let transition = tokio::select! {
                    _ = token.cancelled() => break,
                    transition = rx.recv() => transition,
                };
                match transition {
                    Ok(Connectivity::Online) => {
                        debug!("online, starting sync pass");
                        // Failures are already logged and reported to listeners
                        let _ = engine.sync_now().await;
                    }
                    Ok(Connectivity::Offline) => {
                        debug!("offline");
                        engine.listeners.notify(SyncStatus::Idle);
                    }
                    Err(RecvError::Lagged(missed)) => {
                        debug!(missed, "connectivity transitions dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        if let Some(previous) = self.driver_slot().replace(Driver { cancel, handle }) {
            previous.cancel.cancel();
            previous.handle.abort();
        }
    }

    /// Stop following connectivity and remove every listener.
    ///
    /// The driver task started by [`SyncEngine::start`] holds the engine, so
    /// dropping the last handle does not stop it; call this explicitly.
    ///
    /// A pass in flight is aborted with its driving task; the store is left
    /// consistent because every local write is atomic.
    pub fn dispose(&self) {
        if let Some(driver) = self.driver_slot().take() {
            driver.cancel.cancel();
            driver.handle.abort();
        }
        self.listeners.clear();
    }

    /// Run one pass now, unless one is already running.
    pub async fn sync_now(&self) -> SyncResult<PassOutcome> {
        let Some(_guard) = self.try_begin_pass() else {
            debug!("sync pass already running, skipping");
            return Ok(PassOutcome::Skipped);
        };

        self.listeners.notify(SyncStatus::Syncing);
        match self.run_pass().await {
            Ok(report) => {
                info!(
                    applied = report.queue.applied,
                    retried = report.queue.retried,
                    dropped = report.queue.dropped,
                    entries_synced = report.entries.synced,
                    entries_failed = report.entries.failed,
                    defects_synced = report.defects.synced,
                    defects_failed = report.defects.failed,
                    "sync pass complete"
                );
                self.listeners.notify(SyncStatus::Idle);
                Ok(PassOutcome::Completed(report))
            }
            Err(e) => {
                warn!(error = %e, "sync pass aborted");
                self.listeners.notify(SyncStatus::Error);
                Err(e)
            }
        }
    }

    fn try_begin_pass(&self) -> Option<PassGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PassGuard(&self.in_flight))
    }

    fn driver_slot(&self) -> std::sync::MutexGuard<'_, Option<Driver>> {
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a closure against the store. The lock is released before returning,
    /// so it is never held across an await.
    fn with_store<T>(&self, f: impl FnOnce(&mut Database) -> fw_core::Result<T>) -> SyncResult<T> {
        let mut db = lock_store(&self.store);
        f(&mut db).map_err(SyncError::from_store)
    }

    async fn run_pass(&self) -> SyncResult<SyncReport> {
        let mut report = SyncReport::default();
        self.drain_queue(&mut report.queue).await?;
        self.sync_entries(&mut report.entries).await?;
        self.sync_defects(&mut report.defects).await?;
        Ok(report)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queue
    // ─────────────────────────────────────────────────────────────────────────

    async fn drain_queue(&self, stats: &mut QueueStats) -> SyncResult<()> {
        let items = self.with_store(|db| db.list_queue())?;

        for item in items {
            match self.apply(&item).await {
                Ok(()) => {
                    self.with_store(|db| db.remove_queue_item(&item.id))?;
                    debug!(
                        id = %item.id,
                        action = %item.action,
                        collection = %item.collection_name,
                        "applied queued mutation"
                    );
                    stats.applied += 1;
                }
                Err(e) => match self.record_failure(&item, &e.to_string(), stats) {
                    Err(SyncError::Removed(_)) => {
                        debug!(id = %item.id, "queued mutation removed during pass");
                    }
                    result => result?,
                },
            }
        }
        Ok(())
    }

    async fn apply(&self, item: &QueueItem) -> SyncResult<()> {
        let doc_id = item
            .document_id()
            .map_err(|e| SyncError::InvalidRecord(e.to_string()))?;
        let collection = item.collection_name.as_str();

        match item.action {
            Action::Create => {
                self.remote
                    .create(collection, doc_id, item.payload.clone())
                    .await?
            }
            Action::Update => {
                self.remote
                    .update(collection, doc_id, item.patch_fields())
                    .await?
            }
            Action::Delete => self.remote.delete(collection, doc_id).await?,
        }
        Ok(())
    }

    fn record_failure(
        &self,
        item: &QueueItem,
        error: &str,
        stats: &mut QueueStats,
    ) -> SyncResult<()> {
        if item.retry_count < self.config.max_retries {
            let retry_count = self.with_store(|db| db.increment_retry(&item.id))?;
            warn!(
                id = %item.id,
                action = %item.action,
                collection = %item.collection_name,
                retry_count,
                error,
                "queued mutation failed, will retry"
            );
            stats.retried += 1;
        } else {
            self.with_store(|db| db.dead_letter(item, error))?;
            warn!(
                id = %item.id,
                action = %item.action,
                collection = %item.collection_name,
                retry_count = item.retry_count,
                error,
                "queued mutation exceeded retry limit, moved to dead letters"
            );
            stats.dropped += 1;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entries and defects
    // ─────────────────────────────────────────────────────────────────────────

    async fn sync_entries(&self, stats: &mut RecordStats) -> SyncResult<()> {
        let entries = self.with_store(|db| db.list_entries())?;

        for entry in entries {
            let id = entry.id.clone();
            match self.sync_entry(entry).await {
                Ok(()) => {
                    debug!(%id, "synced offline entry");
                    stats.synced += 1;
                }
                Err(SyncError::Removed(_)) => {
                    debug!(%id, "offline entry removed during pass");
                }
                Err(e) if e.is_store_failure() => return Err(e),
                Err(e) => {
                    warn!(%id, error = %e, "offline entry sync failed, will retry");
                    stats.failed += 1;
                }
            }
        }
        Ok(())
    }

    async fn sync_entry(&self, entry: OfflineEntry) -> SyncResult<()> {
        let owner = entry.task_id.as_deref().or(entry.asset_id.as_deref());

        let mut evidence_urls = entry.evidence_urls.clone();
        for (_, photo) in entry.pending_photos() {
            let url = self
                .upload(EVIDENCE_FOLDER, owner, photo, sniff_content_type(photo))
                .await?;
            self.with_store(|db| db.record_entry_evidence_url(&entry.id, &url))?;
            evidence_urls.push(url);
        }

        let signature_url = match (&entry.signature_url, entry.signature_data_url()) {
            (Some(url), _) => url.clone(),
            (None, Some(data_url)) => {
                let signature = DataUrl::parse(data_url)
                    .map_err(|e| SyncError::InvalidRecord(format!("signature: {e}")))?;
                let url = self
                    .upload(SIGNATURES_FOLDER, owner, &signature.data, &signature.mime)
                    .await?;
                self.with_store(|db| db.set_entry_signature_url(&entry.id, &url))?;
                url
            }
            (None, None) => String::new(),
        };

        let now = Utc::now();
        let document = entry_document(&entry, &evidence_urls, &signature_url, now);
        self.remote
            .create(ENTRIES_COLLECTION, &entry.id, document)
            .await?;

        if let Some(task_id) = entry.task_id.as_deref() {
            self.remote
                .update(TASKS_COLLECTION, task_id, task_completion_patch(&entry.id, now))
                .await?;
        }

        self.with_store(|db| db.remove_entry(&entry.id))?;
        Ok(())
    }

    async fn sync_defects(&self, stats: &mut RecordStats) -> SyncResult<()> {
        let defects = self.with_store(|db| db.list_defects())?;

        for defect in defects {
            let id = defect.id.clone();
            match self.sync_defect(defect).await {
                Ok(()) => {
                    debug!(%id, "synced offline defect");
                    stats.synced += 1;
                }
                Err(SyncError::Removed(_)) => {
                    debug!(%id, "offline defect removed during pass");
                }
                Err(e) if e.is_store_failure() => return Err(e),
                Err(e) => {
                    warn!(%id, error = %e, "offline defect sync failed, will retry");
                    stats.failed += 1;
                }
            }
        }
        Ok(())
    }

    async fn sync_defect(&self, defect: OfflineDefect) -> SyncResult<()> {
        let owner = defect.asset_id.as_deref();

        let mut evidence_urls = defect.evidence_urls.clone();
        for (_, photo) in defect.pending_photos() {
            let url = self
                .upload(DEFECTS_FOLDER, owner, photo, sniff_content_type(photo))
                .await?;
            self.with_store(|db| db.record_defect_evidence_url(&defect.id, &url))?;
            evidence_urls.push(url);
        }

        let document = defect_document(&defect, &evidence_urls, Utc::now());
        self.remote
            .create(DEFECTS_COLLECTION, &defect.id, document)
            .await?;

        self.with_store(|db| db.remove_defect(&defect.id))?;
        Ok(())
    }

    /// Upload one blob and resolve its URL.
    async fn upload(
        &self,
        folder: &str,
        owner: Option<&str>,
        bytes: &[u8],
        content_type: &str,
    ) -> SyncResult<String> {
        let path = blob_path(folder, &self.config.org_id, owner, bytes, content_type);
        self.blobs.upload(&path, bytes, content_type).await?;
        let url = self.blobs.download_url(&path).await?;
        debug!(%path, "uploaded blob");
        Ok(url)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
