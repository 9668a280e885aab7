// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sources of online/offline transitions.
//!
//! The engine only sees [`ConnectivityObserver`]. Two sources are provided:
//! - [`ManualConnectivity`]: transitions are pushed explicitly
//! - [`ProbeConnectivity`]: periodic TCP reachability probe of the remote host

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::http::Uri;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 16;

/// Network reachability as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

/// A source of connectivity transitions.
pub trait ConnectivityObserver: Send + Sync {
    /// Subscribe to future transitions.
    fn subscribe(&self) -> broadcast::Receiver<Connectivity>;
}

/// Connectivity driven by explicit calls.
///
/// Every call emits, even when the state does not change.
pub struct ManualConnectivity {
    tx: broadcast::Sender<Connectivity>,
}

impl ManualConnectivity {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        ManualConnectivity { tx }
    }

    pub fn set_online(&self) {
        self.emit(Connectivity::Online);
    }

    pub fn set_offline(&self) {
        self.emit(Connectivity::Offline);
    }

    fn emit(&self, state: Connectivity) {
        // No subscribers is not an error
        let _ = self.tx.send(state);
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityObserver for ManualConnectivity {
    fn subscribe(&self) -> broadcast::Receiver<Connectivity> {
        self.tx.subscribe()
    }
}

const STATE_UNKNOWN: u8 = 0;
const STATE_ONLINE: u8 = 1;
const STATE_OFFLINE: u8 = 2;

/// Connectivity derived from periodically opening a TCP connection to the
/// remote host. Only transitions are emitted; the first probe always emits.
pub struct ProbeConnectivity {
    tx: broadcast::Sender<Connectivity>,
    state: Arc<AtomicU8>,
    cancel: CancellationToken,
}

impl ProbeConnectivity {
    /// Start probing `addr` (`host:port`) every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(addr: String, interval: Duration) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let state = Arc::new(AtomicU8::new(STATE_UNKNOWN));
        let cancel = CancellationToken::new();

        let task_tx = tx.clone();
        let task_state = state.clone();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                let reachable = probe(&addr, interval).await;
                let next = if reachable { STATE_ONLINE } else { STATE_OFFLINE };
                let prev = task_state.swap(next, Ordering::AcqRel);
                if prev != next {
                    let transition = if reachable {
                        Connectivity::Online
                    } else {
                        Connectivity::Offline
                    };
                    debug!(addr = %addr, ?transition, "connectivity changed");
                    let _ = task_tx.send(transition);
                }

                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        });

        ProbeConnectivity { tx, state, cancel }
    }

    /// Last probed state, or `None` before the first probe completes.
    pub fn current(&self) -> Option<Connectivity> {
        match self.state.load(Ordering::Acquire) {
            STATE_ONLINE => Some(Connectivity::Online),
            STATE_OFFLINE => Some(Connectivity::Offline),
            _ => None,
        }
    }
}

impl ConnectivityObserver for ProbeConnectivity {
    fn subscribe(&self) -> broadcast::Receiver<Connectivity> {
        self.tx.subscribe()
    }
}

impl Drop for ProbeConnectivity {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Probe `addr` once, waiting at most `timeout` for the connection.
pub async fn probe_once(addr: &str, timeout: Duration) -> Connectivity {
    if probe(addr, timeout).await {
        Connectivity::Online
    } else {
        Connectivity::Offline
    }
}

async fn probe(addr: &str, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// Derive the `host:port` to probe from a `ws://` or `wss://` URL.
pub fn probe_address(url: &str) -> Option<String> {
    let uri: Uri = url.parse().ok()?;
    let host = uri.host()?;
    let port = match (uri.port_u16(), uri.scheme_str()) {
        (Some(port), _) => port,
        (None, Some("wss")) => 443,
        (None, Some("ws")) => 80,
        _ => return None,
    };
    Some(format!("{host}:{port}"))
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
