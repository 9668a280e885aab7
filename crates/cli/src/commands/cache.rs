// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local read cache of remote documents.

use fw_core::CachedRecord;
use serde_json::Value;

use super::{open_queue, parse_object};
use crate::display::format_cached;
use crate::error::{Error, Result};
use crate::sync::OfflineQueue;

pub fn put(collection: &str, id: &str, payload: &str) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    put_impl(&queue, collection, id, payload)?;
    println!("Cached {}/{}", collection, id);
    Ok(())
}

pub(crate) fn put_impl(
    queue: &OfflineQueue,
    collection: &str,
    id: &str,
    payload: &str,
) -> Result<()> {
    let payload = parse_object("document", payload)?;
    queue.cache_put(collection, id, Value::Object(payload))?;
    Ok(())
}

/// Print the cached document body as JSON.
pub fn get(collection: &str, id: &str) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let record = get_impl(&queue, collection, id)?;
    println!("{}", serde_json::to_string_pretty(&record.payload)?);
    Ok(())
}

pub(crate) fn get_impl(
    queue: &OfflineQueue,
    collection: &str,
    id: &str,
) -> Result<CachedRecord> {
    queue
        .cache_get(collection, id)?
        .ok_or_else(|| Error::CachedRecordNotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
}

pub fn list(collection: &str) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let records = queue.cache_list(collection)?;
    if records.is_empty() {
        println!("No cached documents in {}.", collection);
    }
    for record in &records {
        println!("{}", format_cached(record));
    }
    Ok(())
}

pub fn clear() -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let removed = queue.clear_cache()?;
    println!("Removed {} cached document(s)", removed);
    Ok(())
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
