// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket client for the fw-remote server.
//!
//! [`WsRemote`] implements both [`RemoteStore`] and [`BlobStore`] over one
//! connection. Requests are numbered and answered one at a time; the
//! connection is opened lazily and dropped after any transport failure so the
//! next request reconnects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use fw_core::protocol::{ClientMessage, RemoteOp, ServerMessage};

use super::remote::{BlobStore, RemoteError, RemoteFuture, RemoteResult, RemoteStore};
use super::transport::{Transport, TransportError, WebSocketTransport};

/// Default time to wait for a reply.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`WsRemote`].
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// `ws://` or `wss://` URL of the server.
    pub url: String,
    /// Time to wait for a reply, connection included.
    pub request_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Remote document and blob store reached over a WebSocket.
pub struct WsRemote<T: Transport = WebSocketTransport> {
    config: RemoteConfig,
    transport: Mutex<T>,
    next_id: AtomicU64,
}

impl WsRemote<WebSocketTransport> {
    /// Create a client using a real WebSocket transport.
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_transport(config, WebSocketTransport::new())
    }
}

impl<T: Transport> WsRemote<T> {
    /// Create a client with a custom transport (for testing).
    pub fn with_transport(config: RemoteConfig, transport: T) -> Self {
        WsRemote {
            config,
            transport: Mutex::new(transport),
            next_id: AtomicU64::new(1),
        }
    }

    /// Round-trip a ping to check the server is responsive.
    pub async fn ping(&self) -> RemoteResult<()> {
        let id = self.next_request_id();
        match self.exchange(ClientMessage::ping(id), id).await? {
            ServerMessage::Pong { .. } => Ok(()),
            other => Err(RemoteError::Protocol(format!("expected pong, got {other:?}"))),
        }
    }

    /// Close the connection, if open.
    pub async fn close(&self) -> RemoteResult<()> {
        self.transport.lock().await.disconnect().await?;
        Ok(())
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Send one op and wait for its reply. Returns the URL of a `url` reply.
    async fn call(&self, op: RemoteOp) -> RemoteResult<Option<String>> {
        let id = self.next_request_id();
        let name = op.name();
        match self.exchange(ClientMessage::request(id, op), id).await? {
            ServerMessage::Ok { .. } => Ok(None),
            ServerMessage::Url { url, .. } => Ok(Some(url)),
            ServerMessage::Error { message, .. } => {
                Err(RemoteError::Rejected(format!("{name}: {message}")))
            }
            ServerMessage::Pong { .. } => {
                Err(RemoteError::Protocol(format!("pong in reply to {name}")))
            }
        }
    }

    async fn exchange(&self, msg: ClientMessage, id: u64) -> RemoteResult<ServerMessage> {
        let mut guard = self.transport.lock().await;
        let transport = &mut *guard;
        let url = self.config.url.as_str();

        let attempt = tokio::time::timeout(
            self.config.request_timeout,
            round_trip(transport, url, msg, id),
        )
        .await;

        match attempt {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                let _ = transport.disconnect().await;
                Err(e.into())
            }
            Err(_) => {
                // A late reply would be mistaken for the next request's
                let _ = transport.disconnect().await;
                Err(RemoteError::Timeout(self.config.request_timeout))
            }
        }
    }
}

async fn round_trip<T: Transport>(
    transport: &mut T,
    url: &str,
    msg: ClientMessage,
    id: u64,
) -> Result<ServerMessage, TransportError> {
    if !transport.is_connected() {
        transport.connect(url).await?;
        debug!(url, "connected to remote");
    }
    transport.send(msg).await?;
    loop {
        match transport.recv().await? {
            Some(reply) if reply.id() == id => return Ok(reply),
            Some(stale) => {
                debug!(expected = id, got = stale.id(), "discarding stale reply");
            }
            None => return Err(TransportError::ConnectionClosed),
        }
    }
}

impl<T: Transport> RemoteStore for WsRemote<T> {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        document: Value,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.call(RemoteOp::Create {
                collection: collection.to_string(),
                doc_id: id.to_string(),
                document,
            })
            .await?;
            Ok(())
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        patch: Value,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.call(RemoteOp::Update {
                collection: collection.to_string(),
                doc_id: id.to_string(),
                patch,
            })
            .await?;
            Ok(())
        })
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.call(RemoteOp::Delete {
                collection: collection.to_string(),
                doc_id: id.to_string(),
            })
            .await?;
            Ok(())
        })
    }
}

impl<T: Transport> BlobStore for WsRemote<T> {
    fn upload<'a>(
        &'a self,
        path: &'a str,
        bytes: &'a [u8],
        content_type: &'a str,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.call(RemoteOp::upload(path, content_type, bytes)).await?;
            Ok(())
        })
    }

    fn download_url<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, String> {
        Box::pin(async move {
            let url = self
                .call(RemoteOp::DownloadUrl {
                    path: path.to_string(),
                })
                .await?;
            url.ok_or_else(|| RemoteError::Protocol(format!("no URL returned for {path}")))
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
