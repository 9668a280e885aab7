// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use serde_json::Map;

use fw_core::OfflineDefect;

use super::{check_record_id, open_queue, parse_object, read_photos};
use crate::error::Result;
use crate::sync::OfflineQueue;

pub fn add(asset: Option<String>, form: Option<String>, photos: Vec<PathBuf>) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let defect = add_impl(&queue, asset, form.as_deref(), &photos)?;
    println!("Saved defect {}", defect.id);
    if !defect.photos.is_empty() {
        println!("Photos: {}", defect.photos.len());
    }
    Ok(())
}

pub(crate) fn add_impl(
    queue: &OfflineQueue,
    asset: Option<String>,
    form: Option<&str>,
    photos: &[PathBuf],
) -> Result<OfflineDefect> {
    check_record_id("asset", asset.as_deref())?;
    let form_data = match form {
        Some(text) => parse_object("form", text)?,
        None => Map::new(),
    };
    let defect = OfflineDefect::new(asset, form_data, read_photos(photos)?);
    queue.save_defect(&defect)?;
    Ok(defect)
}

#[cfg(test)]
#[path = "defect_tests.rs"]
mod tests;
