// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::sync::test_helpers::MockTransport;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn mock_transport_connect() {
    let mut transport = MockTransport::new();
    assert!(!transport.is_connected());

    transport.connect("ws://localhost:1234").await.unwrap();
    assert!(transport.is_connected());
    assert_eq!(transport.handle().connects(), 1);

    transport.disconnect().await.unwrap();
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn mock_transport_send_recv() {
    let mut transport = MockTransport::new();
    transport.connect("ws://localhost:1234").await.unwrap();

    transport.send(ClientMessage::ping(42)).await.unwrap();
    let outgoing = transport.handle().outgoing();
    assert_eq!(outgoing, vec![ClientMessage::ping(42)]);

    transport.handle().queue_incoming(ServerMessage::pong(42));
    let received = transport.recv().await.unwrap();
    assert_eq!(received, Some(ServerMessage::pong(42)));

    // No more messages
    assert!(transport.recv().await.unwrap().is_none());
}

#[tokio::test]
async fn mock_transport_connect_fail() {
    let mut transport = MockTransport::new();
    transport.set_connect_fail(true);

    let result = transport.connect("ws://localhost:1234").await;
    assert!(result.is_err());
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn websocket_transport_requires_connection() {
    let mut transport = WebSocketTransport::new();
    assert!(!transport.is_connected());

    let err = transport.send(ClientMessage::ping(1)).await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectionClosed));
    assert!(transport.recv().await.is_err());
}

#[tokio::test]
async fn websocket_transport_connect_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut transport = WebSocketTransport::new();
    let err = transport
        .connect(&format!("ws://{addr}"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::ConnectionFailed(_)));
}

#[tokio::test]
async fn websocket_transport_round_trip() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Minimal server: answer one ping, then close
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(Message::Text(text))) = ws.next().await {
            if let Ok(ClientMessage::Ping { id }) = ClientMessage::from_json(&text) {
                let reply = ServerMessage::pong(id).to_json().unwrap();
                ws.send(Message::Text(reply.into())).await.unwrap();
                ws.close(None).await.unwrap();
                break;
            }
        }
    });

    let mut transport = WebSocketTransport::new();
    transport.connect(&format!("ws://{addr}")).await.unwrap();
    assert!(transport.is_connected());

    transport.send(ClientMessage::ping(7)).await.unwrap();
    assert_eq!(
        transport.recv().await.unwrap(),
        Some(ServerMessage::pong(7))
    );

    assert_eq!(transport.recv().await.unwrap(), None);
    assert!(!transport.is_connected());
}
