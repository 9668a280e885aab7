// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation queue inspection and dead-letter management.

use fw_core::QueueItem;

use super::{open_queue, print_json};
use crate::cli::OutputFormat;
use crate::display::{format_dead_letter, format_queue_item};
use crate::error::Result;
use crate::sync::OfflineQueue;

/// List queued mutations in replay order.
pub fn list(output: OutputFormat) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let items = queue.list()?;
    match output {
        OutputFormat::Json => print_json(&items)?,
        OutputFormat::Text => {
            if items.is_empty() {
                println!("Queue is empty.");
            }
            for item in &items {
                println!("{}", format_queue_item(item));
            }
        }
    }
    Ok(())
}

/// List dead letters, oldest first.
pub fn dead(output: OutputFormat) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let letters = queue.dead_letters()?;
    match output {
        OutputFormat::Json => print_json(&letters)?,
        OutputFormat::Text => {
            if letters.is_empty() {
                println!("No dead letters.");
            }
            for letter in &letters {
                println!("{}", format_dead_letter(letter));
            }
        }
    }
    Ok(())
}

pub fn requeue(id: &str) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let item = requeue_impl(&queue, id)?;
    println!("Requeued {} ({} {})", item.id, item.action, item.collection_name);
    Ok(())
}

/// Move a dead letter back into the queue with its retry count reset.
pub(crate) fn requeue_impl(queue: &OfflineQueue, id: &str) -> Result<QueueItem> {
    Ok(queue.requeue(id)?)
}

pub fn clear() -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let removed = queue.clear()?;
    println!("Removed {} queued mutation(s)", removed);
    Ok(())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
