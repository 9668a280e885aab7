// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fw-remote: reference document and blob server for the firewatch sync engine.
//!
//! Documents live in a SQLite file, blobs in a directory tree, both under the
//! data directory. Clients speak the request/response protocol defined in
//! `fw_core::protocol`.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// fw-remote: firewatch reference remote
#[derive(Parser, Debug)]
#[command(name = "fw-remote")]
#[command(about = "WebSocket document and blob server for firewatch sync")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Directory for the document database and blobs
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Base URL under which blobs are served (defaults to a file:// URL)
    #[arg(long)]
    public_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting fw-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());

    let state = state::ServerState::new(&args.data, args.public_url)?;
    info!("  Blob URL base: {}", state.public_url());

    tokio::select! {
        result = server::run(args.bind, state) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}
