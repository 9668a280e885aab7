// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::Notify;

use fw_core::protocol::{ClientMessage, ServerMessage};
use fw_core::Database;

use super::engine::{SyncConfig, SyncEngine};
use super::queue::{OfflineQueue, SharedStore};
use super::remote::{BlobStore, RemoteError, RemoteFuture, RemoteResult, RemoteStore};
use super::transport::{Transport, TransportError, TransportResult};

/// Remote method selector for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Create,
    Update,
    Delete,
    Upload,
    DownloadUrl,
}

/// A remote call that succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create {
        collection: String,
        id: String,
        document: Value,
    },
    Update {
        collection: String,
        id: String,
        patch: Value,
    },
    Delete {
        collection: String,
        id: String,
    },
    Upload {
        path: String,
        bytes: Vec<u8>,
        content_type: String,
    },
    DownloadUrl {
        path: String,
    },
}

/// Forced failures for one method: let `skip` calls through, then fail
/// `times` calls. `u32::MAX` fails forever.
#[derive(Debug, Clone, Copy)]
struct FailPlan {
    skip: u32,
    times: u32,
}

/// In-memory remote document and blob store with call recording.
#[derive(Default)]
pub struct FakeRemote {
    calls: Mutex<Vec<Call>>,
    attempts: Mutex<Vec<Method>>,
    failures: Mutex<HashMap<Method, FailPlan>>,
    gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

pub const BLOB_BASE_URL: &str = "https://blobs.test";

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the next `times` calls of `method`.
    pub fn fail_next(&self, method: Method, times: u32) {
        self.fail_after(method, 0, times);
    }

    /// Let `skip` calls of `method` succeed, then fail the following `times`.
    pub fn fail_after(&self, method: Method, skip: u32, times: u32) {
        self.failures
            .lock()
            .unwrap()
            .insert(method, FailPlan { skip, times });
    }

    /// Fail every call of `method` until [`FakeRemote::recover`].
    pub fn fail_always(&self, method: Method) {
        self.fail_next(method, u32::MAX);
    }

    /// Stop failing `method`.
    pub fn recover(&self, method: Method) {
        self.failures.lock().unwrap().remove(&method);
    }

    /// Block every call until `release` is notified. `entered` is notified
    /// when a call reaches the gate.
    pub fn hold_calls(&self) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some((entered.clone(), release.clone()));
        (entered, release)
    }

    /// Stop holding new calls. Calls already at the gate still wait for
    /// `release`.
    pub fn open_gate(&self) {
        *self.gate.lock().unwrap() = None;
    }

    /// Successful calls, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Every attempted call, successful or not, in order.
    pub fn attempts(&self) -> Vec<Method> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<(String, String, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create {
                    collection,
                    id,
                    document,
                } => Some((collection, id, document)),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<(String, String, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update {
                    collection,
                    id,
                    patch,
                } => Some((collection, id, patch)),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Upload { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    fn should_fail(&self, method: Method) -> bool {
        let mut failures = self.failures.lock().unwrap();
        let Some(plan) = failures.get_mut(&method) else {
            return false;
        };
        if plan.skip > 0 {
            plan.skip -= 1;
            return false;
        }
        if plan.times == 0 {
            return false;
        }
        if plan.times != u32::MAX {
            plan.times -= 1;
        }
        true
    }

    async fn handle(&self, method: Method, call: Call) -> RemoteResult<()> {
        self.attempts.lock().unwrap().push(method);

        let gate = self.gate.lock().unwrap().clone();
        if let Some((entered, release)) = gate {
            entered.notify_one();
            release.notified().await;
        }

        if self.should_fail(method) {
            return Err(RemoteError::Unavailable(format!("{method:?} failed")));
        }

        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl RemoteStore for FakeRemote {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        document: Value,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(self.handle(
            Method::Create,
            Call::Create {
                collection: collection.to_string(),
                id: id.to_string(),
                document,
            },
        ))
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        patch: Value,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(self.handle(
            Method::Update,
            Call::Update {
                collection: collection.to_string(),
                id: id.to_string(),
                patch,
            },
        ))
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(self.handle(
            Method::Delete,
            Call::Delete {
                collection: collection.to_string(),
                id: id.to_string(),
            },
        ))
    }
}

impl BlobStore for FakeRemote {
    fn upload<'a>(
        &'a self,
        path: &'a str,
        bytes: &'a [u8],
        content_type: &'a str,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(self.handle(
            Method::Upload,
            Call::Upload {
                path: path.to_string(),
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        ))
    }

    fn download_url<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, String> {
        Box::pin(async move {
            self.handle(
                Method::DownloadUrl,
                Call::DownloadUrl {
                    path: path.to_string(),
                },
            )
            .await?;
            Ok(format!("{BLOB_BASE_URL}/{path}"))
        })
    }
}

type MockFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = TransportResult<T>> + Send + 'a>>;

type Responder = Arc<dyn Fn(&ClientMessage) -> Option<ServerMessage> + Send + Sync>;

/// Shared view of a [`MockTransport`] that stays usable after the transport
/// is moved into a client.
#[derive(Clone, Default)]
pub struct MockHandle {
    incoming: Arc<Mutex<VecDeque<ServerMessage>>>,
    outgoing: Arc<Mutex<Vec<ClientMessage>>>,
    connects: Arc<AtomicUsize>,
}

impl MockHandle {
    /// Add a message that will be returned by recv().
    pub fn queue_incoming(&self, msg: ServerMessage) {
        self.incoming.lock().unwrap().push_back(msg);
    }

    /// Get all messages that were sent.
    pub fn outgoing(&self) -> Vec<ClientMessage> {
        self.outgoing.lock().unwrap().clone()
    }

    /// Number of successful connects.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

/// Mock transport for testing without real sockets.
pub struct MockTransport {
    connected: bool,
    handle: MockHandle,
    responder: Option<Responder>,
    connect_should_fail: bool,
    hang_when_empty: bool,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            connected: false,
            handle: MockHandle::default(),
            responder: None,
            connect_should_fail: false,
            hang_when_empty: false,
        }
    }

    /// Answer every sent message with the responder's reply, if any.
    pub fn with_responder(
        mut self,
        responder: impl Fn(&ClientMessage) -> Option<ServerMessage> + Send + Sync + 'static,
    ) -> Self {
        self.responder = Some(Arc::new(responder));
        self
    }

    /// Make recv() wait forever instead of reporting a closed connection
    /// when nothing is queued.
    pub fn hang_when_empty(mut self) -> Self {
        self.hang_when_empty = true;
        self
    }

    /// Set whether connect should fail.
    pub fn set_connect_fail(&mut self, fail: bool) {
        self.connect_should_fail = fail;
    }

    pub fn handle(&self) -> MockHandle {
        self.handle.clone()
    }
}

/// Reply `ok` to every request and `pong` to every ping.
pub fn ok_responder(msg: &ClientMessage) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Request { id, .. } => Some(ServerMessage::ok(*id)),
        ClientMessage::Ping { id } => Some(ServerMessage::pong(*id)),
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, _url: &str) -> MockFuture<'_, ()> {
        Box::pin(async move {
            if self.connect_should_fail {
                Err(TransportError::ConnectionFailed("mock failure".into()))
            } else {
                self.connected = true;
                self.handle.connects.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    fn disconnect(&mut self) -> MockFuture<'_, ()> {
        Box::pin(async move {
            self.connected = false;
            Ok(())
        })
    }

    fn send(&mut self, msg: ClientMessage) -> MockFuture<'_, ()> {
        Box::pin(async move {
            if !self.connected {
                return Err(TransportError::ConnectionClosed);
            }
            if let Some(reply) = self.responder.as_ref().and_then(|r| r(&msg)) {
                self.handle.queue_incoming(reply);
            }
            self.handle.outgoing.lock().unwrap().push(msg);
            Ok(())
        })
    }

    fn recv(&mut self) -> MockFuture<'_, Option<ServerMessage>> {
        Box::pin(async move {
            let msg = self.handle.incoming.lock().unwrap().pop_front();
            if msg.is_none() && self.hang_when_empty {
                std::future::pending::<()>().await;
            }
            Ok(msg)
        })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Fresh in-memory store.
pub fn memory_store() -> SharedStore {
    Arc::new(Mutex::new(Database::open_in_memory().unwrap()))
}

/// Engine, queue writer and fake remote sharing one in-memory store.
pub fn engine_fixture() -> (Arc<SyncEngine>, OfflineQueue, Arc<FakeRemote>) {
    let store = memory_store();
    let remote = FakeRemote::new();
    let engine = SyncEngine::new(
        store.clone(),
        remote.clone(),
        remote.clone(),
        SyncConfig::new("org-1"),
    );
    (Arc::new(engine), OfflineQueue::new(store), remote)
}
