// ABOUTME: Trackline CLI - drives the tracking engine from recorded fixes and manages stored sessions
// ABOUTME: Replays GPS logs, inspects the snapshot slot, flushes the sync queue and exports GPX
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Replay a recorded hike (one JSON fix per line) and keep it for export
//! trackline replay hike.jsonl --sport hiking
//!
//! # Replay and hand the session to the sync queue
//! trackline replay run.jsonl --sport running --finalize
//!
//! # Show the stored session and pending queue
//! trackline status
//!
//! # Retry delivery of queued sessions
//! trackline sync
//!
//! # Export the stored session as GPX
//! trackline export-gpx --output hike.gpx
//!
//! # Throw the stored session away
//! trackline discard
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use trackline::logging::LoggingConfig;

use helpers::context::CliContext;

#[derive(Parser)]
#[command(
    name = "trackline",
    about = "Trackline activity tracking engine CLI",
    long_about = "Replays recorded GPS fixes through the tracking engine and manages the stored session and sync queue."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Data directory override (defaults to TRACKLINE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Replay a JSON-lines file of fixes as one session
    Replay {
        /// File with one fix object per line
        fixes: PathBuf,

        /// Sport of the session (running, hiking, mtb, ...)
        #[arg(long, default_value = "running")]
        sport: String,

        /// Submit the finished session to the sync queue instead of keeping it
        #[arg(long)]
        finalize: bool,
    },

    /// Show the stored session and the pending sync queue
    Status {
        /// Print the session as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flush the pending sync queue once
    Sync,

    /// Submit the stored stopped session to the sync queue
    Finalize,

    /// Discard the stored session
    Discard,

    /// Export the stored finished session as GPX 1.1
    ExportGpx {
        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Track name
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env().with_stderr();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let context = CliContext::load(cli.data_dir).await?;
    debug!(config = %context.config.summary(), "Configuration loaded");

    match cli.command {
        Command::Replay {
            fixes,
            sport,
            finalize,
        } => commands::replay::run(&context, &fixes, &sport, finalize).await?,
        Command::Status { json } => commands::session::status(&context, json).await?,
        Command::Sync => commands::session::sync(&context).await?,
        Command::Finalize => commands::session::finalize(&context).await?,
        Command::Discard => commands::session::discard(&context).await?,
        Command::ExportGpx { output, name } => {
            commands::session::export_gpx(&context, &output, name).await?;
        }
    }

    Ok(())
}
