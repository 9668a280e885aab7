// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn manual_emits_every_call() {
    let connectivity = ManualConnectivity::new();
    let mut rx = connectivity.subscribe();

    connectivity.set_online();
    connectivity.set_online();
    connectivity.set_offline();

    assert_eq!(rx.recv().await.unwrap(), Connectivity::Online);
    assert_eq!(rx.recv().await.unwrap(), Connectivity::Online);
    assert_eq!(rx.recv().await.unwrap(), Connectivity::Offline);
}

#[test]
fn manual_without_subscribers_does_not_fail() {
    let connectivity = ManualConnectivity::new();
    connectivity.set_online();
    connectivity.set_offline();
}

#[tokio::test]
async fn probe_reports_online_for_listening_host() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let probe = ProbeConnectivity::spawn(addr, Duration::from_millis(50));
    let mut rx = probe.subscribe();

    let first = tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(first, Connectivity::Online);
    assert_eq!(probe.current(), Some(Connectivity::Online));
}

#[tokio::test]
async fn probe_reports_offline_for_closed_port() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let probe = ProbeConnectivity::spawn(addr, Duration::from_millis(50));
    let mut rx = probe.subscribe();

    let first = tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(first, Connectivity::Offline);
}

#[tokio::test]
async fn probe_once_checks_a_single_connection() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    assert_eq!(probe_once(&addr, WAIT).await, Connectivity::Online);

    drop(listener);
    assert_eq!(probe_once(&addr, WAIT).await, Connectivity::Offline);
}

#[tokio::test]
async fn probe_emits_only_transitions() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let probe = ProbeConnectivity::spawn(addr, Duration::from_millis(20));
    let mut rx = probe.subscribe();
    assert_eq!(
        tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap(),
        Connectivity::Online
    );

    // Several probe rounds while the host stays reachable
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(matches!(
        rx.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
}

#[parameterized(
    ws_with_port = { "ws://localhost:7890", Some("localhost:7890") },
    ws_default_port = { "ws://sync.example.com/socket", Some("sync.example.com:80") },
    wss_default_port = { "wss://sync.example.com", Some("sync.example.com:443") },
    http_without_port = { "http://sync.example.com", None },
    garbage = { "not a url", None },
)]
fn probe_address_from_url(url: &str, expected: Option<&str>) {
    assert_eq!(probe_address(url).as_deref(), expected);
}
