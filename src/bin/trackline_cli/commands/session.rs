// ABOUTME: Commands operating on the stored session slot and the sync queue
// ABOUTME: Status display, queue flush, finalize, discard and GPX export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use trackline::export::GpxDocument;
use trackline::snapshot::Restore;
use trackline::sync::SyncOutcome;
use trackline_core::SystemClock;

use crate::helpers::context::CliContext;
use crate::helpers::display::{display_flush, display_pending, display_session, display_submit};

/// Show the stored session and pending queue
pub async fn status(context: &CliContext, json: bool) -> Result<()> {
    let mut tracker = context.tracker(Arc::new(SystemClock));
    let restored = tracker.restore().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tracker.view())?);
        return Ok(());
    }

    match restored {
        Restore::Empty => println!("No stored session"),
        Restore::Live(_) | Restore::Finished(_) => display_session(&tracker.view()),
    }
    display_pending(&context.sync.pending().await?);
    Ok(())
}

/// Flush the pending queue once
pub async fn sync(context: &CliContext) -> Result<()> {
    match context.sync.flush().await? {
        SyncOutcome::Completed(report) => display_flush(&report),
        SyncOutcome::AlreadySyncing => println!("A sync pass is already running"),
    }
    Ok(())
}

/// Hand the stored stopped session to the sync queue
pub async fn finalize(context: &CliContext) -> Result<()> {
    let mut tracker = context.tracker(Arc::new(SystemClock));
    match tracker.restore().await? {
        Restore::Empty => bail!("No stored session"),
        Restore::Live(_) => {
            bail!("The stored session is still in progress; stop it before finalizing")
        }
        Restore::Finished(_) => {}
    }
    display_submit(&tracker.finalize().await?);
    Ok(())
}

/// Throw away the stored session
pub async fn discard(context: &CliContext) -> Result<()> {
    let mut tracker = context.tracker(Arc::new(SystemClock));
    if tracker.restore().await? == Restore::Empty {
        println!("No stored session");
        return Ok(());
    }
    tracker.discard().await?;
    println!("Stored session discarded");
    Ok(())
}

/// Write the stored finished session as GPX
pub async fn export_gpx(context: &CliContext, output: &Path, name: Option<String>) -> Result<()> {
    let mut tracker = context.tracker(Arc::new(SystemClock));
    if let Restore::Live(_) = tracker.restore().await? {
        bail!("The stored session is still in progress; stop it before exporting");
    }
    let Some(payload) = tracker.engine().payload() else {
        bail!("No finished session to export");
    };

    let mut document = GpxDocument::from_payload(&payload);
    if let Some(name) = name {
        document = document.with_name(name);
    }
    tokio::fs::write(output, document.to_string())
        .await
        .with_context(|| format!("Cannot write {}", output.display()))?;

    info!(points = document.len(), path = %output.display(), "GPX exported");
    println!("Exported {} points to {}", document.len(), output.display());
    Ok(())
}
