// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use fwrs::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    // `fw watch` logs to a file next to the store instead
    if !matches!(cli.command, Command::Watch) {
        fwrs::setup_stderr_logging();
    }
    if let Err(e) = fwrs::run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
