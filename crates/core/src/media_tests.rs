// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn parse_png_data_url() {
    let url = DataUrl::encode("image/png", &[0x89, b'P', b'N', b'G', 1, 2, 3]);
    let parsed = DataUrl::parse(&url).unwrap();
    assert_eq!(parsed.mime, "image/png");
    assert_eq!(parsed.data, vec![0x89, b'P', b'N', b'G', 1, 2, 3]);
}

#[test]
fn parse_defaults_mime_when_missing() {
    let parsed = DataUrl::parse("data:;base64,aGVsbG8=").unwrap();
    assert_eq!(parsed.mime, "text/plain");
    assert_eq!(parsed.data, b"hello");
}

#[parameterized(
    no_scheme = { "image/png;base64,AAAA" },
    no_comma = { "data:image/png;base64" },
    not_base64 = { "data:text/plain,hello" },
    bad_payload = { "data:image/png;base64,***" },
)]
fn parse_rejects(url: &str) {
    let err = DataUrl::parse(url).unwrap_err();
    assert!(matches!(err, Error::InvalidDataUrl(_)));
}

#[parameterized(
    jpeg = { &[0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg" },
    png = { &[0x89, b'P', b'N', b'G', 0x0D], "image/png" },
    gif = { b"GIF89a", "image/gif" },
    unknown = { &[0, 1, 2], "application/octet-stream" },
)]
fn sniff(bytes: &[u8], expected: &str) {
    assert_eq!(sniff_content_type(bytes), expected);
}

#[test]
fn sniff_webp() {
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(b"WEBP");
    assert_eq!(sniff_content_type(&bytes), "image/webp");
}

#[parameterized(
    jpeg = { "image/jpeg", "jpg" },
    png = { "image/png", "png" },
    other = { "application/pdf", "bin" },
)]
fn extensions(content_type: &str, expected: &str) {
    assert_eq!(extension_for(content_type), expected);
}
