// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// Custom help template that groups commands into sections
const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Field Capture:
  entry       Record an inspection entry offline
  defect      Report a defect offline
  enqueue     Queue a document mutation
  cache       Manage the local read cache

Sync:
  sync        Run one sync pass against the remote
  watch       Sync whenever the remote becomes reachable
  pending     Show counts of unsynced work
  queue       Inspect and manage the mutation queue

Setup:
  init        Initialize a firewatch store";

const QUICKSTART_HELP: &str = "\
Get started:
  fw init --org acme --remote ws://localhost:7890
  fw entry add --task t1 --photo extinguisher.jpg
  fw pending
  fw sync";

#[derive(Parser)]
#[command(name = "fw")]
#[command(about = "Offline-first capture and sync for fire-safety inspections")]
#[command(
    long_about = "Offline-first capture and sync for fire-safety inspections.\n\n\
    Records are written to a local store first and replayed against the remote \
    backend whenever it is reachable."
)]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize a firewatch store in the current directory
    #[command(after_help = "Examples:\n  \
        fw init --org acme                              Offline only\n  \
        fw init --org acme --remote ws://host:7890      With a sync remote")]
    Init {
        /// Organisation ID used in uploaded blob paths
        #[arg(long)]
        org: String,

        /// WebSocket URL of the fw-remote server
        #[arg(long)]
        remote: Option<String>,

        /// Directory to initialize (default: current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Field capture
    // ─────────────────────────────────────────────────────────────────────────
    /// Queue a create, update or delete of a remote document
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        fw enqueue create sites '{\"id\":\"s1\",\"name\":\"Test Site\"}'\n  \
        fw enqueue update tasks '{\"id\":\"t1\",\"status\":\"done\"}'\n  \
        fw enqueue delete sites '{\"id\":\"s1\"}'"
    )]
    Enqueue {
        /// Mutation kind (create, update, delete)
        action: String,

        /// Remote collection name
        collection: String,

        /// JSON object; must carry the document ID in its "id" field
        payload: String,
    },

    /// Inspection entries captured offline
    #[command(subcommand)]
    Entry(EntryCommand),

    /// Defect reports captured offline
    #[command(subcommand)]
    Defect(DefectCommand),

    /// Local read cache of remote documents
    #[command(subcommand)]
    Cache(CacheCommand),

    // ─────────────────────────────────────────────────────────────────────────
    // Sync
    // ─────────────────────────────────────────────────────────────────────────
    /// Mutation queue and dead letters
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Show counts of work waiting to be synced
    Pending {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Run one sync pass against the configured remote
    Sync {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Watch connectivity and sync on every reconnect
    Watch,
}

/// Mutation queue commands.
#[derive(Subcommand)]
pub enum QueueCommand {
    /// List queued mutations, oldest first
    List {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// List mutations dropped after too many failures
    Dead {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Move a dead letter back into the queue with a fresh retry budget
    #[command(arg_required_else_help = true)]
    Requeue {
        /// Dead letter ID
        id: String,
    },
    /// Discard every queued mutation
    Clear,
}

/// Inspection entry commands.
#[derive(Subcommand)]
pub enum EntryCommand {
    /// Record an inspection entry
    #[command(after_help = "Examples:\n  \
        fw entry add --task t1 --form '{\"result\":\"pass\"}'\n  \
        fw entry add --asset a7 --photo front.jpg --photo tag.jpg\n  \
        fw entry add --task t1 --signature signature.png")]
    Add {
        /// Task completed by this entry
        #[arg(long)]
        task: Option<String>,

        /// Asset inspected
        #[arg(long)]
        asset: Option<String>,

        /// Form answers as a JSON object
        #[arg(long)]
        form: Option<String>,

        /// Photo file(s) to attach, in capture order
        #[arg(long)]
        photo: Vec<PathBuf>,

        /// PNG signature to attach
        #[arg(long)]
        signature: Option<PathBuf>,
    },
}

/// Defect report commands.
#[derive(Subcommand)]
pub enum DefectCommand {
    /// Report a defect
    #[command(after_help = "Examples:\n  \
        fw defect add --asset a7 --form '{\"severity\":\"high\"}' --photo crack.jpg")]
    Add {
        /// Asset the defect was found on
        #[arg(long)]
        asset: Option<String>,

        /// Form answers as a JSON object
        #[arg(long)]
        form: Option<String>,

        /// Photo file(s) to attach, in capture order
        #[arg(long)]
        photo: Vec<PathBuf>,
    },
}

/// Read cache commands.
#[derive(Subcommand)]
pub enum CacheCommand {
    /// Store a document in the cache
    #[command(arg_required_else_help = true)]
    Put {
        /// Collection name
        collection: String,
        /// Document ID
        id: String,
        /// Document body as JSON
        payload: String,
    },
    /// Print a cached document
    #[command(arg_required_else_help = true)]
    Get {
        /// Collection name
        collection: String,
        /// Document ID
        id: String,
    },
    /// List cached documents of a collection
    #[command(arg_required_else_help = true)]
    List {
        /// Collection name
        collection: String,
    },
    /// Drop every cached document
    Clear,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
