// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed offline store.
//!
//! The [`Database`] struct provides all data access operations for the sync
//! queue, cached records, offline entries, offline defects, and dead letters.
//! Each table is independent; only a record and its own photos are written in
//! one transaction.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

use crate::error::{Error, Result};
use crate::record::{
    Action, CachedRecord, DeadLetter, OfflineDefect, OfflineEntry, PendingCounts, QueueItem,
};

/// Schema version stamped into `PRAGMA user_version` after migrations.
pub const SCHEMA_VERSION: i64 = 2;

/// SQL schema for the offline store.
pub const SCHEMA: &str = r#"
-- Pending remote mutations, replayed in insertion order
CREATE TABLE IF NOT EXISTS sync_queue (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    action TEXT NOT NULL,
    collection_name TEXT NOT NULL,
    payload TEXT NOT NULL,
    enqueued_at TEXT NOT NULL,
    retry_count INTEGER NOT NULL DEFAULT 0
);

-- Remote documents mirrored for offline reads
CREATE TABLE IF NOT EXISTS cached_records (
    id TEXT PRIMARY KEY,
    collection_name TEXT NOT NULL,
    entity_id TEXT NOT NULL,
    payload TEXT NOT NULL,
    cached_at TEXT NOT NULL
);

-- Inspections captured offline
CREATE TABLE IF NOT EXISTS offline_entries (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    task_id TEXT,
    asset_id TEXT,
    form_data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    evidence_urls TEXT NOT NULL DEFAULT '[]',
    signature_url TEXT
);

CREATE TABLE IF NOT EXISTS entry_photos (
    entry_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    data BLOB NOT NULL,
    PRIMARY KEY (entry_id, position),
    FOREIGN KEY (entry_id) REFERENCES offline_entries(id) ON DELETE CASCADE
);

-- Defect reports captured offline
CREATE TABLE IF NOT EXISTS offline_defects (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    asset_id TEXT,
    form_data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    evidence_urls TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS defect_photos (
    defect_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    data BLOB NOT NULL,
    PRIMARY KEY (defect_id, position),
    FOREIGN KEY (defect_id) REFERENCES offline_defects(id) ON DELETE CASCADE
);

-- Queue items dropped after exhausting their retries
CREATE TABLE IF NOT EXISTS dead_letters (
    id TEXT PRIMARY KEY,
    action TEXT NOT NULL,
    collection_name TEXT NOT NULL,
    payload TEXT NOT NULL,
    enqueued_at TEXT NOT NULL,
    retry_count INTEGER NOT NULL,
    last_error TEXT NOT NULL,
    dead_at TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_cached_collection ON cached_records(collection_name);
"#;

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| corrupted(format!("invalid value '{value}' in column '{column}'")))
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| corrupted(format!("invalid timestamp '{value}' in column '{column}'")))
}

/// Parse a JSON column from the database.
fn parse_json<T: DeserializeOwned>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    serde_json::from_str(value)
        .map_err(|e| corrupted(format!("invalid JSON in column '{column}': {e}")))
}

fn corrupted(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(Error::CorruptedData(message)),
    )
}

/// Run schema creation and all migrations on a database connection.
///
/// Creates missing tables, upgrades older stores, and stamps
/// [`SCHEMA_VERSION`] into `user_version`.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        migrate_add_resume_markers(conn)?;
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    Ok(())
}

/// Migration: Add upload progress columns to stores created before version 2.
///
/// Version 1 stores re-uploaded every photo on each retry. The new columns
/// record which uploads already succeeded.
fn migrate_add_resume_markers(conn: &Connection) -> Result<()> {
    let columns = [
        ("offline_entries", "evidence_urls", "TEXT NOT NULL DEFAULT '[]'"),
        ("offline_entries", "signature_url", "TEXT"),
        ("offline_defects", "evidence_urls", "TEXT NOT NULL DEFAULT '[]'"),
    ];

    for (table, column, decl) in columns {
        let has_column: bool = conn.query_row(
            &format!("SELECT COUNT(*) > 0 FROM pragma_table_info('{table}') WHERE name = ?1"),
            [column],
            |row| row.get(0),
        )?;

        if !has_column {
            conn.execute(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"), [])?;
        }
    }
    Ok(())
}

fn queue_item_from_row(row: &Row<'_>) -> std::result::Result<QueueItem, rusqlite::Error> {
    let action: String = row.get(1)?;
    let payload: String = row.get(3)?;
    let enqueued_at: String = row.get(4)?;
    Ok(QueueItem {
        id: row.get(0)?,
        action: parse_db::<Action>(&action, "action")?,
        collection_name: row.get(2)?,
        payload: parse_json(&payload, "payload")?,
        enqueued_at: parse_timestamp(&enqueued_at, "enqueued_at")?,
        retry_count: row.get(5)?,
    })
}

fn cached_record_from_row(row: &Row<'_>) -> std::result::Result<CachedRecord, rusqlite::Error> {
    let payload: String = row.get(3)?;
    let cached_at: String = row.get(4)?;
    Ok(CachedRecord {
        id: row.get(0)?,
        collection_name: row.get(1)?,
        entity_id: row.get(2)?,
        payload: parse_json(&payload, "payload")?,
        cached_at: parse_timestamp(&cached_at, "cached_at")?,
    })
}

fn entry_from_row(row: &Row<'_>) -> std::result::Result<OfflineEntry, rusqlite::Error> {
    let form_data: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let evidence_urls: String = row.get(5)?;
    Ok(OfflineEntry {
        id: row.get(0)?,
        task_id: row.get(1)?,
        asset_id: row.get(2)?,
        form_data: parse_json(&form_data, "form_data")?,
        photos: Vec::new(),
        created_at: parse_timestamp(&created_at, "created_at")?,
        evidence_urls: parse_json(&evidence_urls, "evidence_urls")?,
        signature_url: row.get(6)?,
    })
}

fn defect_from_row(row: &Row<'_>) -> std::result::Result<OfflineDefect, rusqlite::Error> {
    let form_data: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let evidence_urls: String = row.get(4)?;
    Ok(OfflineDefect {
        id: row.get(0)?,
        asset_id: row.get(1)?,
        form_data: parse_json(&form_data, "form_data")?,
        photos: Vec::new(),
        created_at: parse_timestamp(&created_at, "created_at")?,
        evidence_urls: parse_json(&evidence_urls, "evidence_urls")?,
    })
}

fn dead_letter_from_row(row: &Row<'_>) -> std::result::Result<DeadLetter, rusqlite::Error> {
    let action: String = row.get(1)?;
    let payload: String = row.get(3)?;
    let enqueued_at: String = row.get(4)?;
    let dead_at: String = row.get(7)?;
    Ok(DeadLetter {
        id: row.get(0)?,
        action: parse_db::<Action>(&action, "action")?,
        collection_name: row.get(2)?,
        payload: parse_json(&payload, "payload")?,
        enqueued_at: parse_timestamp(&enqueued_at, "enqueued_at")?,
        retry_count: row.get(5)?,
        last_error: row.get(6)?,
        dead_at: parse_timestamp(&dead_at, "dead_at")?,
    })
}

const QUEUE_COLUMNS: &str = "id, action, collection_name, payload, enqueued_at, retry_count";
const CACHE_COLUMNS: &str = "id, collection_name, entity_id, payload, cached_at";
const ENTRY_COLUMNS: &str =
    "id, task_id, asset_id, form_data, created_at, evidence_urls, signature_url";
const DEFECT_COLUMNS: &str = "id, asset_id, form_data, created_at, evidence_urls";
const DEAD_LETTER_COLUMNS: &str =
    "id, action, collection_name, payload, enqueued_at, retry_count, last_error, dead_at";

/// SQLite database connection with offline store operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode so a CLI writer and a watcher can share the store
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sync queue
    // ─────────────────────────────────────────────────────────────────────────

    /// Append an item to the sync queue.
    pub fn enqueue(&self, item: &QueueItem) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sync_queue (id, action, collection_name, payload, enqueued_at, retry_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.id,
                item.action.as_str(),
                item.collection_name,
                item.payload.to_string(),
                item.enqueued_at.to_rfc3339(),
                item.retry_count,
            ],
        )?;
        Ok(())
    }

    /// List all queued items in insertion order.
    pub fn list_queue(&self) -> Result<Vec<QueueItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {QUEUE_COLUMNS} FROM sync_queue ORDER BY seq"))?;
        let items = stmt
            .query_map([], queue_item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Get a queued item by ID.
    pub fn get_queue_item(&self, id: &str) -> Result<Option<QueueItem>> {
        let item = self
            .conn
            .query_row(
                &format!("SELECT {QUEUE_COLUMNS} FROM sync_queue WHERE id = ?1"),
                params![id],
                queue_item_from_row,
            )
            .optional()?;
        Ok(item)
    }

    /// Remove a queued item. Returns true if it existed.
    pub fn remove_queue_item(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM sync_queue WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Increment the retry count of a queued item, returning the new count.
    pub fn increment_retry(&self, id: &str) -> Result<u32> {
        let affected = self.conn.execute(
            "UPDATE sync_queue SET retry_count = retry_count + 1 WHERE id = ?1",
            params![id],
        )?;

        if affected == 0 {
            return Err(Error::QueueItemNotFound(id.to_string()));
        }

        let count: u32 = self.conn.query_row(
            "SELECT retry_count FROM sync_queue WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Remove every queued item. Returns the number removed.
    pub fn clear_queue(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM sync_queue", [])?)
    }

    /// Number of queued items.
    pub fn queue_len(&self) -> Result<usize> {
        self.count("sync_queue")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dead letters
    // ─────────────────────────────────────────────────────────────────────────

    /// Move a queue item to the dead-letter table, recording its final error.
    pub fn dead_letter(&mut self, item: &QueueItem, last_error: &str) -> Result<DeadLetter> {
        let dead = DeadLetter::from_item(item, last_error);
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM sync_queue WHERE id = ?1", params![item.id])?;
        if removed == 0 {
            return Err(Error::QueueItemNotFound(item.id.clone()));
        }
        tx.execute(
            "INSERT OR REPLACE INTO dead_letters
             (id, action, collection_name, payload, enqueued_at, retry_count, last_error, dead_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                dead.id,
                dead.action.as_str(),
                dead.collection_name,
                dead.payload.to_string(),
                dead.enqueued_at.to_rfc3339(),
                dead.retry_count,
                dead.last_error,
                dead.dead_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(dead)
    }

    /// List dead letters, oldest first.
    pub fn list_dead_letters(&self) -> Result<Vec<DeadLetter>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DEAD_LETTER_COLUMNS} FROM dead_letters ORDER BY dead_at, id"
        ))?;
        let letters = stmt
            .query_map([], dead_letter_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(letters)
    }

    /// Move a dead letter back into the sync queue with a fresh retry count.
    pub fn requeue_dead_letter(&mut self, id: &str) -> Result<QueueItem> {
        let tx = self.conn.transaction()?;
        let dead = tx
            .query_row(
                &format!("SELECT {DEAD_LETTER_COLUMNS} FROM dead_letters WHERE id = ?1"),
                params![id],
                dead_letter_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::DeadLetterNotFound(id.to_string()))?;

        let item = dead.requeue();
        tx.execute(
            "INSERT INTO sync_queue (id, action, collection_name, payload, enqueued_at, retry_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.id,
                item.action.as_str(),
                item.collection_name,
                item.payload.to_string(),
                item.enqueued_at.to_rfc3339(),
                item.retry_count,
            ],
        )?;
        tx.execute("DELETE FROM dead_letters WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(item)
    }

    /// Remove every dead letter. Returns the number removed.
    pub fn clear_dead_letters(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM dead_letters", [])?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cached records
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or overwrite a cached record.
    pub fn put_cached(&self, record: &CachedRecord) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO cached_records (id, collection_name, entity_id, payload, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.collection_name,
                record.entity_id,
                record.payload.to_string(),
                record.cached_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a cached record by collection and entity ID.
    pub fn get_cached(
        &self,
        collection_name: &str,
        entity_id: &str,
    ) -> Result<Option<CachedRecord>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {CACHE_COLUMNS} FROM cached_records
                     WHERE collection_name = ?1 AND entity_id = ?2"
                ),
                params![collection_name, entity_id],
                cached_record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// List cached records of one collection, ordered by entity ID.
    pub fn list_cached(&self, collection_name: &str) -> Result<Vec<CachedRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CACHE_COLUMNS} FROM cached_records
             WHERE collection_name = ?1 ORDER BY entity_id"
        ))?;
        let records = stmt
            .query_map(params![collection_name], cached_record_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Remove a cached record. Returns true if it existed.
    pub fn remove_cached(&self, collection_name: &str, entity_id: &str) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM cached_records WHERE collection_name = ?1 AND entity_id = ?2",
            params![collection_name, entity_id],
        )?;
        Ok(affected > 0)
    }

    /// Remove every cached record. Returns the number removed.
    pub fn clear_cache(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM cached_records", [])?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Offline entries
    // ─────────────────────────────────────────────────────────────────────────

    /// Store an offline entry together with its photos.
    pub fn save_entry(&mut self, entry: &OfflineEntry) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO offline_entries
             (id, task_id, asset_id, form_data, created_at, evidence_urls, signature_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id,
                entry.task_id,
                entry.asset_id,
                Value::Object(entry.form_data.clone()).to_string(),
                entry.created_at.to_rfc3339(),
                serde_json::to_string(&entry.evidence_urls)?,
                entry.signature_url,
            ],
        )?;
        for (position, photo) in entry.photos.iter().enumerate() {
            tx.execute(
                "INSERT INTO entry_photos (entry_id, position, data) VALUES (?1, ?2, ?3)",
                params![entry.id, position as i64, photo],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// List offline entries in capture order, photos included.
    pub fn list_entries(&self) -> Result<Vec<OfflineEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM offline_entries ORDER BY seq"
        ))?;
        let mut entries = stmt
            .query_map([], entry_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for entry in &mut entries {
            entry.photos = self.load_photos(
                "SELECT data FROM entry_photos WHERE entry_id = ?1 ORDER BY position",
                &entry.id,
            )?;
        }
        Ok(entries)
    }

    /// Get an offline entry by ID, photos included.
    pub fn get_entry(&self, id: &str) -> Result<Option<OfflineEntry>> {
        let entry = self
            .conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM offline_entries WHERE id = ?1"),
                params![id],
                entry_from_row,
            )
            .optional()?;

        match entry {
            Some(mut entry) => {
                entry.photos = self.load_photos(
                    "SELECT data FROM entry_photos WHERE entry_id = ?1 ORDER BY position",
                    &entry.id,
                )?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    /// Remove an offline entry and its photos. Returns true if it existed.
    pub fn remove_entry(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM offline_entries WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Remove every offline entry. Returns the number removed.
    pub fn clear_entries(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM offline_entries", [])?)
    }

    /// Record the URL of the next uploaded entry photo.
    pub fn record_entry_evidence_url(&self, id: &str, url: &str) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE offline_entries SET evidence_urls = json_insert(evidence_urls, '$[#]', ?1)
             WHERE id = ?2",
            params![url, id],
        )?;

        if affected == 0 {
            return Err(Error::EntryNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Record the URL of the uploaded entry signature.
    pub fn set_entry_signature_url(&self, id: &str, url: &str) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE offline_entries SET signature_url = ?1 WHERE id = ?2",
            params![url, id],
        )?;

        if affected == 0 {
            return Err(Error::EntryNotFound(id.to_string()));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Offline defects
    // ─────────────────────────────────────────────────────────────────────────

    /// Store an offline defect together with its photos.
    pub fn save_defect(&mut self, defect: &OfflineDefect) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO offline_defects (id, asset_id, form_data, created_at, evidence_urls)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                defect.id,
                defect.asset_id,
                Value::Object(defect.form_data.clone()).to_string(),
                defect.created_at.to_rfc3339(),
                serde_json::to_string(&defect.evidence_urls)?,
            ],
        )?;
        for (position, photo) in defect.photos.iter().enumerate() {
            tx.execute(
                "INSERT INTO defect_photos (defect_id, position, data) VALUES (?1, ?2, ?3)",
                params![defect.id, position as i64, photo],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// List offline defects in capture order, photos included.
    pub fn list_defects(&self) -> Result<Vec<OfflineDefect>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DEFECT_COLUMNS} FROM offline_defects ORDER BY seq"
        ))?;
        let mut defects = stmt
            .query_map([], defect_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for defect in &mut defects {
            defect.photos = self.load_photos(
                "SELECT data FROM defect_photos WHERE defect_id = ?1 ORDER BY position",
                &defect.id,
            )?;
        }
        Ok(defects)
    }

    /// Get an offline defect by ID, photos included.
    pub fn get_defect(&self, id: &str) -> Result<Option<OfflineDefect>> {
        let defect = self
            .conn
            .query_row(
                &format!("SELECT {DEFECT_COLUMNS} FROM offline_defects WHERE id = ?1"),
                params![id],
                defect_from_row,
            )
            .optional()?;

        match defect {
            Some(mut defect) => {
                defect.photos = self.load_photos(
                    "SELECT data FROM defect_photos WHERE defect_id = ?1 ORDER BY position",
                    &defect.id,
                )?;
                Ok(Some(defect))
            }
            None => Ok(None),
        }
    }

    /// Remove an offline defect and its photos. Returns true if it existed.
    pub fn remove_defect(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM offline_defects WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Remove every offline defect. Returns the number removed.
    pub fn clear_defects(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM offline_defects", [])?)
    }

    /// Record the URL of the next uploaded defect photo.
    pub fn record_defect_evidence_url(&self, id: &str, url: &str) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE offline_defects SET evidence_urls = json_insert(evidence_urls, '$[#]', ?1)
             WHERE id = ?2",
            params![url, id],
        )?;

        if affected == 0 {
            return Err(Error::DefectNotFound(id.to_string()));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Summary
    // ─────────────────────────────────────────────────────────────────────────

    /// Count the records waiting in each table.
    pub fn pending_counts(&self) -> Result<PendingCounts> {
        Ok(PendingCounts {
            queue: self.count("sync_queue")?,
            entries: self.count("offline_entries")?,
            defects: self.count("offline_defects")?,
            dead_letters: self.count("dead_letters")?,
        })
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn load_photos(&self, sql: &str, owner_id: &str) -> Result<Vec<Vec<u8>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let photos = stmt
            .query_map(params![owner_id], |row| row.get::<_, Vec<u8>>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(photos)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
