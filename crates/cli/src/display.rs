// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fw_core::{CachedRecord, DeadLetter, PendingCounts, QueueItem};

use crate::sync::{SyncReport, SyncStatus};

/// Width of the timestamp column.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line per queued mutation: ID, action, collection, document, retries.
pub fn format_queue_item(item: &QueueItem) -> String {
    let doc_id = item.document_id().unwrap_or("?");
    format!(
        "{}  {:<6} {}/{}  retries={}  queued {}",
        item.id,
        item.action,
        item.collection_name,
        doc_id,
        item.retry_count,
        item.enqueued_at.format(TIME_FORMAT)
    )
}

/// Two lines per dead letter: the mutation, then the last error indented.
pub fn format_dead_letter(letter: &DeadLetter) -> String {
    format!(
        "{}  {:<6} {}  retries={}  dead {}\n    {}",
        letter.id,
        letter.action,
        letter.collection_name,
        letter.retry_count,
        letter.dead_at.format(TIME_FORMAT),
        letter.last_error
    )
}

pub fn format_cached(record: &CachedRecord) -> String {
    format!(
        "{}/{}  cached {}\n    {}",
        record.collection_name,
        record.entity_id,
        record.cached_at.format(TIME_FORMAT),
        record.payload
    )
}

pub fn format_pending(counts: &PendingCounts) -> String {
    format!(
        "Queue: {}\nEntries: {}\nDefects: {}\nDead letters: {}",
        counts.queue, counts.entries, counts.defects, counts.dead_letters
    )
}

/// Multi-line summary of a completed pass.
pub fn format_report(report: &SyncReport) -> String {
    let mut out = format!(
        "Queue: {} applied, {} retried, {} dead-lettered\n\
         Entries: {} synced, {} failed\n\
         Defects: {} synced, {} failed",
        report.queue.applied,
        report.queue.retried,
        report.queue.dropped,
        report.entries.synced,
        report.entries.failed,
        report.defects.synced,
        report.defects.failed
    );
    if !report.is_clean() {
        out.push_str("\nSome records are still pending; they will be retried on the next sync.");
    }
    out
}

/// Status line printed by `fw watch`.
pub fn format_status(status: SyncStatus) -> String {
    match status {
        SyncStatus::Syncing => "syncing...".to_string(),
        SyncStatus::Idle => "idle".to_string(),
        SyncStatus::Error => "sync failed (see log)".to_string(),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
