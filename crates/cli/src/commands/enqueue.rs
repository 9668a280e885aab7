// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::Value;

use fw_core::Action;

use super::{open_queue, parse_object};
use crate::error::{Error, Result};
use crate::sync::OfflineQueue;

pub fn run(action: &str, collection: &str, payload: &str) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let id = run_impl(&queue, action, collection, payload)?;
    println!("{}", id);
    Ok(())
}

/// Validate and queue one mutation. Returns the queue item ID.
pub(crate) fn run_impl(
    queue: &OfflineQueue,
    action: &str,
    collection: &str,
    payload: &str,
) -> Result<String> {
    let action: Action = action.parse()?;
    if collection.trim().is_empty() {
        return Err(Error::InvalidData("collection name cannot be empty".to_string()));
    }
    let payload = parse_object("payload", payload)?;
    let has_id = payload
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_id {
        return Err(Error::InvalidData(format!(
            "{} payload needs a non-empty string \"id\" field",
            action
        )));
    }

    Ok(queue.enqueue(action, collection, Value::Object(payload))?)
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
