// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote document shapes and blob paths written by the sync engine.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use fw_core::id::content_key;
use fw_core::media::extension_for;
use fw_core::record::SIGNATURE_FIELD;
use fw_core::{OfflineDefect, OfflineEntry};

/// Collection of synced inspection entries.
pub const ENTRIES_COLLECTION: &str = "entries";
/// Collection of synced defect reports.
pub const DEFECTS_COLLECTION: &str = "defects";
/// Collection of inspection tasks patched on completion.
pub const TASKS_COLLECTION: &str = "tasks";

/// Blob folder for inspection photos.
pub const EVIDENCE_FOLDER: &str = "evidence";
/// Blob folder for inspection signatures.
pub const SIGNATURES_FOLDER: &str = "signatures";
/// Blob folder for defect photos.
pub const DEFECTS_FOLDER: &str = "defects";

const UNASSIGNED: &str = "unassigned";

/// Content-addressed blob path:
/// `{folder}/{org_id}/{owner_id|unassigned}/{sha256 prefix}.{ext}`.
pub fn blob_path(
    folder: &str,
    org_id: &str,
    owner_id: Option<&str>,
    bytes: &[u8],
    content_type: &str,
) -> String {
    format!(
        "{folder}/{org_id}/{}/{}.{}",
        owner_id.unwrap_or(UNASSIGNED),
        content_key(bytes),
        extension_for(content_type)
    )
}

/// Remote document for an inspection entry.
pub fn entry_document(
    entry: &OfflineEntry,
    evidence_urls: &[String],
    signature_url: &str,
    synced_at: DateTime<Utc>,
) -> Value {
    let mut doc = form_fields(&entry.form_data);
    doc.insert("id".into(), json!(entry.id));
    doc.insert("taskId".into(), json!(entry.task_id));
    doc.insert("assetId".into(), json!(entry.asset_id));
    doc.insert("evidenceUrls".into(), json!(evidence_urls));
    doc.insert("signatureUrl".into(), json!(signature_url));
    doc.insert("createdAt".into(), json!(entry.created_at.to_rfc3339()));
    doc.insert("syncedAt".into(), json!(synced_at.to_rfc3339()));
    Value::Object(doc)
}

/// Remote document for a defect report.
pub fn defect_document(
    defect: &OfflineDefect,
    evidence_urls: &[String],
    synced_at: DateTime<Utc>,
) -> Value {
    let mut doc = form_fields(&defect.form_data);
    doc.insert("id".into(), json!(defect.id));
    doc.insert("assetId".into(), json!(defect.asset_id));
    doc.insert("evidenceUrls".into(), json!(evidence_urls));
    doc.insert("createdAt".into(), json!(defect.created_at.to_rfc3339()));
    doc.insert("syncedAt".into(), json!(synced_at.to_rfc3339()));
    Value::Object(doc)
}

/// Patch marking a task completed by the given entry.
pub fn task_completion_patch(entry_id: &str, completed_at: DateTime<Utc>) -> Value {
    json!({
        "status": "completed",
        "entryId": entry_id,
        "completedAt": completed_at.to_rfc3339(),
    })
}

// The raw signature data URL never leaves the device; it is replaced by signatureUrl.
fn form_fields(form_data: &Map<String, Value>) -> Map<String, Value> {
    let mut fields = form_data.clone();
    fields.remove(SIGNATURE_FIELD);
    fields
}

#[cfg(test)]
#[path = "documents_tests.rs"]
mod tests;
