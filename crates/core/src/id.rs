// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier generation for local records and uploaded objects.

use sha2::{Digest, Sha256};

/// Generate a fresh record ID for a queue item, entry, or defect.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Content-addressed key for an uploaded object.
///
/// Format: first 16 hex chars of SHA256(bytes). Uploading the same bytes twice
/// targets the same object instead of leaving a duplicate behind.
pub fn content_key(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    hex::encode(&hash[..8])
}

/// Key under which a cached record is stored.
/// Format: {collection}:{entity_id}
pub fn cache_key(collection_name: &str, entity_id: &str) -> String {
    format!("{}:{}", collection_name, entity_id)
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
