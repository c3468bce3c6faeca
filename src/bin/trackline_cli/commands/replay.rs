// ABOUTME: Replay command feeding a recorded fix log through a full tracking session
// ABOUTME: Session time follows the fix timestamps so durations and splits match the recording
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use trackline::snapshot::Restore;
use trackline_core::models::{Fix, SportKind};
use trackline_core::{Clock, ManualClock};

use crate::helpers::context::CliContext;
use crate::helpers::display::{display_diagnostics, display_session, display_submit};

/// Replay `path` as one session of `sport`
pub async fn run(context: &CliContext, path: &Path, sport: &str, finalize: bool) -> Result<()> {
    let fixes = read_fixes(path).await?;
    let Some(first) = fixes.first() else {
        bail!("{} contains no fixes", path.display());
    };

    let sport = SportKind::from_name(sport);
    let clock = Arc::new(ManualClock::new(first.timestamp));
    let mut tracker = context.tracker(clock.clone());

    match tracker.restore().await? {
        Restore::Empty => {}
        Restore::Live(snapshot) => bail!(
            "Session {} is still in progress; run `trackline discard` first",
            snapshot.session_id.as_deref().unwrap_or("-")
        ),
        Restore::Finished(snapshot) => bail!(
            "Session {} is stopped but not finalized; run `trackline finalize` or `trackline discard` first",
            snapshot.session_id.as_deref().unwrap_or("-")
        ),
    }

    let started = tracker.start(sport).await?;
    info!(
        session.id = %started.session_id,
        remote_id = started.remote_id,
        fixes = fixes.len(),
        "Replaying recorded fixes"
    );

    for fix in &fixes {
        if fix.timestamp > clock.now() {
            clock.set(fix.timestamp);
        }
        tracker.handle_fix(fix).await;
    }
    tracker.stop().await?;

    display_session(&tracker.view());
    display_diagnostics(tracker.engine().diagnostics());

    if finalize {
        display_submit(&tracker.finalize().await?);
    } else {
        println!("\nSession kept; use `trackline export-gpx` or `trackline discard`");
    }
    Ok(())
}

async fn read_fixes(path: &Path) -> Result<Vec<Fix>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str::<Fix>(line)
                .with_context(|| format!("Invalid fix on line {}", number + 1))
        })
        .collect()
}
