// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between the sync engine and a remote.
//!
//! The protocol is request/response:
//! - Client sends numbered requests, each carrying one [`RemoteOp`]
//! - Server answers every request with `ok`, `url` or `error` echoing its id

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single remote document or blob operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteOp {
    /// Write a full document under the given ID.
    Create {
        collection: String,
        doc_id: String,
        document: Value,
    },

    /// Merge top-level fields into an existing document.
    Update {
        collection: String,
        doc_id: String,
        patch: Value,
    },

    /// Remove a document.
    Delete { collection: String, doc_id: String },

    /// Store a blob at the given path.
    Upload {
        path: String,
        content_type: String,
        /// Blob bytes, base64 encoded.
        data: String,
    },

    /// Resolve the public URL of a stored blob.
    DownloadUrl { path: String },
}

impl RemoteOp {
    /// Creates an Upload op, encoding the bytes.
    pub fn upload(path: impl Into<String>, content_type: impl Into<String>, bytes: &[u8]) -> Self {
        RemoteOp::Upload {
            path: path.into(),
            content_type: content_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            RemoteOp::Create { .. } => "create",
            RemoteOp::Update { .. } => "update",
            RemoteOp::Delete { .. } => "delete",
            RemoteOp::Upload { .. } => "upload",
            RemoteOp::DownloadUrl { .. } => "download_url",
        }
    }
}

/// Decodes the base64 payload of an Upload op.
pub fn decode_blob(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(data)
}

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Perform an operation.
    Request {
        /// Client-chosen ID echoed in the response.
        id: u64,
        op: RemoteOp,
    },

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The request succeeded.
    Ok { id: u64 },

    /// The request succeeded and produced a blob URL.
    Url { id: u64, url: String },

    /// The request failed.
    Error {
        /// ID of the failed request, or 0 if the request could not be parsed.
        id: u64,
        /// Human-readable error description.
        message: String,
    },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },
}

impl ClientMessage {
    /// Creates a Request message.
    pub fn request(id: u64, op: RemoteOp) -> Self {
        ClientMessage::Request { id, op }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Ok message.
    pub fn ok(id: u64) -> Self {
        ServerMessage::Ok { id }
    }

    /// Creates a Url message.
    pub fn url(id: u64, url: impl Into<String>) -> Self {
        ServerMessage::Url {
            id,
            url: url.into(),
        }
    }

    /// Creates an Error message.
    pub fn error(id: u64, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            id,
            message: message.into(),
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Returns the ID of the request or ping this message answers.
    pub fn id(&self) -> u64 {
        match self {
            ServerMessage::Ok { id }
            | ServerMessage::Url { id, .. }
            | ServerMessage::Error { id, .. }
            | ServerMessage::Pong { id } => *id,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
