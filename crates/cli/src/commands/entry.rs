// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use serde_json::{Map, Value};

use fw_core::media::sniff_content_type;
use fw_core::record::SIGNATURE_FIELD;
use fw_core::{DataUrl, OfflineEntry};

use super::{check_record_id, open_queue, parse_object, read_file, read_photos};
use crate::error::{Error, Result};
use crate::sync::OfflineQueue;

/// Inputs of `fw entry add`, as given on the command line.
#[derive(Debug, Default)]
pub struct EntryArgs {
    pub task: Option<String>,
    pub asset: Option<String>,
    pub form: Option<String>,
    pub photos: Vec<PathBuf>,
    pub signature: Option<PathBuf>,
}

pub fn add(args: EntryArgs) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let entry = add_impl(&queue, args)?;
    println!("Saved entry {}", entry.id);
    if !entry.photos.is_empty() {
        println!("Photos: {}", entry.photos.len());
    }
    if entry.signature_data_url().is_some() {
        println!("Signature: attached");
    }
    Ok(())
}

/// Build the entry from its inputs and save it to the store.
pub(crate) fn add_impl(queue: &OfflineQueue, args: EntryArgs) -> Result<OfflineEntry> {
    check_record_id("task", args.task.as_deref())?;
    check_record_id("asset", args.asset.as_deref())?;

    let mut form_data = match &args.form {
        Some(text) => parse_object("form", text)?,
        None => Map::new(),
    };

    if let Some(path) = &args.signature {
        let bytes = read_file(path)?;
        let mime = sniff_content_type(&bytes);
        if mime != "image/png" {
            return Err(Error::InvalidData(format!(
                "signature {} is not a PNG image",
                path.display()
            )));
        }
        form_data.insert(
            SIGNATURE_FIELD.to_string(),
            Value::String(DataUrl::encode(mime, &bytes)),
        );
    }

    let photos = read_photos(&args.photos)?;
    let entry = OfflineEntry::new(args.task, args.asset, form_data, photos);
    queue.save_entry(&entry)?;
    Ok(entry)
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
