// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Evidence media helpers.
//!
//! Signatures arrive as `data:` URLs captured from a signature pad; photos
//! arrive as raw bytes. Both need a content type and file extension before
//! they can be uploaded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};

/// Content type assumed when a data URL omits one.
const DEFAULT_MIME: &str = "text/plain";

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type from the URL header (e.g. `image/png`).
    pub mime: String,
    /// Decoded payload bytes.
    pub data: Vec<u8>,
}

impl DataUrl {
    /// Parse a base64 `data:` URL.
    ///
    /// Only base64 payloads are accepted; signature pads never emit the
    /// percent-encoded form.
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidDataUrl("missing 'data:' scheme".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidDataUrl("missing ',' separator".to_string()))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default().trim();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(Error::InvalidDataUrl(
                "expected a base64 payload".to_string(),
            ));
        }

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::InvalidDataUrl(e.to_string()))?;

        Ok(DataUrl {
            mime: if mime.is_empty() {
                DEFAULT_MIME.to_string()
            } else {
                mime.to_string()
            },
            data,
        })
    }

    /// Encode bytes as a base64 `data:` URL.
    pub fn encode(mime: &str, data: &[u8]) -> String {
        format!("data:{};base64,{}", mime, STANDARD.encode(data))
    }
}

/// Guess an image content type from its leading bytes.
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else {
        "application/octet-stream"
    }
}

/// File extension used for an uploaded object of the given content type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

#[cfg(test)]
#[path = "media_tests.rs"]
mod tests;
