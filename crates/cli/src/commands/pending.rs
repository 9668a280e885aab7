// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{open_queue, print_json};
use crate::cli::OutputFormat;
use crate::display::format_pending;
use crate::error::Result;

pub fn run(output: OutputFormat) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let counts = queue.pending_counts()?;
    match output {
        OutputFormat::Json => print_json(&counts)?,
        OutputFormat::Text => {
            println!("{}", format_pending(&counts));
            if counts.is_idle() {
                println!();
                println!("Everything is synced.");
            }
        }
    }
    Ok(())
}
