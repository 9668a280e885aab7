// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Every text frame carries one client message and gets exactly one reply.
//! Requests on a connection are handled in order.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use fw_core::protocol::{ClientMessage, RemoteOp, ServerMessage};

use crate::state::{Result, ServerState};

/// Run the WebSocket server on the given address.
pub async fn run(
    addr: SocketAddr,
    state: ServerState,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply = handle_client_message(&text, &state).await;
                ws_sink.send(Message::Text(reply.to_json()?.into())).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Ok(Message::Ping(data)) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Ok(_) => {
                // Binary, Pong and raw frames carry no requests
            }
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process a client message and build its reply.
pub(crate) async fn handle_client_message(text: &str, state: &ServerState) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Unparseable message: {}", e);
            return ServerMessage::error(0, format!("invalid message: {e}"));
        }
    };
    debug!("Received message: {:?}", msg);

    match msg {
        ClientMessage::Ping { id } => ServerMessage::pong(id),
        ClientMessage::Request { id, op } => {
            let name = op.name();
            match apply_op(op, state).await {
                Ok(Some(url)) => ServerMessage::url(id, url),
                Ok(None) => ServerMessage::ok(id),
                Err(e) => {
                    debug!("Request {} ({}) failed: {}", id, name, e);
                    ServerMessage::error(id, e.to_string())
                }
            }
        }
    }
}

/// Apply one op. Returns the URL for `download_url` requests.
async fn apply_op(op: RemoteOp, state: &ServerState) -> Result<Option<String>> {
    match op {
        RemoteOp::Create {
            collection,
            doc_id,
            document,
        } => state.create(&collection, &doc_id, document).await?,
        RemoteOp::Update {
            collection,
            doc_id,
            patch,
        } => state.update(&collection, &doc_id, patch).await?,
        RemoteOp::Delete { collection, doc_id } => state.delete(&collection, &doc_id).await?,
        RemoteOp::Upload {
            path,
            content_type,
            data,
        } => state.upload(&path, &content_type, &data).await?,
        RemoteOp::DownloadUrl { path } => return state.download_url(&path).await.map(Some),
    }
    Ok(None)
}
