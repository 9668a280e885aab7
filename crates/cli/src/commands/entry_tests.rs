// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::TestContext;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 4, 5, 6];

fn stored(ctx: &TestContext) -> Vec<OfflineEntry> {
    let store = ctx.queue.store();
    let db = store.lock().unwrap();
    db.list_entries().unwrap()
}

#[test]
fn test_add_minimal_entry() {
    let ctx = TestContext::new();
    let entry = add_impl(&ctx.queue, EntryArgs::default()).unwrap();

    let entries = stored(&ctx);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, entry.id);
    assert!(entries[0].task_id.is_none());
    assert!(entries[0].form_data.is_empty());
    assert!(entries[0].photos.is_empty());
}

#[test]
fn test_add_entry_with_photos_and_form() {
    let ctx = TestContext::new();
    let a = ctx.write_file("a.jpg", JPEG);
    let b = ctx.write_file("b.jpg", b"second");

    add_impl(
        &ctx.queue,
        EntryArgs {
            task: Some("t1".to_string()),
            asset: Some("a7".to_string()),
            form: Some(r#"{"result":"pass","pressure":12}"#.to_string()),
            photos: vec![a, b],
            signature: None,
        },
    )
    .unwrap();

    let entry = &stored(&ctx)[0];
    assert_eq!(entry.task_id.as_deref(), Some("t1"));
    assert_eq!(entry.asset_id.as_deref(), Some("a7"));
    assert_eq!(entry.form_data["pressure"], 12);
    assert_eq!(entry.photos, vec![JPEG.to_vec(), b"second".to_vec()]);
}

#[test]
fn test_add_entry_with_signature() {
    let ctx = TestContext::new();
    let sig = ctx.write_file("sig.png", PNG);

    let entry = add_impl(
        &ctx.queue,
        EntryArgs {
            signature: Some(sig),
            ..Default::default()
        },
    )
    .unwrap();

    let url = entry.signature_data_url().unwrap();
    let parsed = DataUrl::parse(url).unwrap();
    assert_eq!(parsed.mime, "image/png");
    assert_eq!(parsed.data, PNG);
}

#[test]
fn test_add_entry_rejects_non_png_signature() {
    let ctx = TestContext::new();
    let sig = ctx.write_file("sig.jpg", JPEG);

    let result = add_impl(
        &ctx.queue,
        EntryArgs {
            signature: Some(sig),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::InvalidData(_))));
    assert!(stored(&ctx).is_empty());
}

#[test]
fn test_add_entry_missing_photo_saves_nothing() {
    let ctx = TestContext::new();
    let result = add_impl(
        &ctx.queue,
        EntryArgs {
            photos: vec![ctx.dir.join("missing.jpg")],
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::UnreadableFile { .. })));
    assert!(stored(&ctx).is_empty());
}

#[test]
fn test_add_entry_rejects_bad_form() {
    let ctx = TestContext::new();
    let result = add_impl(
        &ctx.queue,
        EntryArgs {
            form: Some("not json".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::InvalidJson { .. })));
}

#[test]
fn test_add_entry_rejects_task_id_outside_blob_folder() {
    let ctx = TestContext::new();
    let photo = ctx.write_file("a.jpg", JPEG);
    let result = add_impl(
        &ctx.queue,
        EntryArgs {
            task: Some("..".to_string()),
            photos: vec![photo],
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::InvalidRecordId { what: "task", .. })));
    assert!(stored(&ctx).is_empty());
}

#[test]
fn test_add_entry_rejects_asset_id_with_slash() {
    let ctx = TestContext::new();
    let result = add_impl(
        &ctx.queue,
        EntryArgs {
            asset: Some("a1/a2".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::InvalidRecordId { what: "asset", .. })));
    assert!(stored(&ctx).is_empty());
}
