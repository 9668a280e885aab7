// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fw-core: Shared library for the firewatch offline sync engine
//!
//! This crate provides the offline store, record types, media helpers and
//! wire protocol used by both the fw CLI and the fw-remote server.

pub mod db;
pub mod error;
pub mod id;
pub mod media;
pub mod protocol;
pub mod record;

pub use db::Database;
pub use error::{Error, Result};
pub use media::DataUrl;
pub use protocol::{ClientMessage, RemoteOp, ServerMessage};
pub use record::{
    Action, CachedRecord, DeadLetter, OfflineDefect, OfflineEntry, PendingCounts, QueueItem,
};
