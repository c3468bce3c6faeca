// ABOUTME: Output formatting helpers for the trackline CLI
// ABOUTME: Human-readable session summaries, split tables and sync reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use trackline::sync::{FlushReport, SubmitOutcome};
use trackline::tracking::{FilterDiagnostics, TrackingView};
use trackline_core::models::{PendingSyncItem, SplitKind};

fn format_duration(duration_ms: i64) -> String {
    let total_secs = duration_ms.max(0) / 1000;
    format!(
        "{}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}

/// Print a session summary
pub fn display_session(view: &TrackingView) {
    println!("\nSession {}", view.session_id.as_deref().unwrap_or("-"));
    println!("{}", "=".repeat(60));
    println!("   Sport:      {} ({})", view.sport.display_name(), view.status);
    println!(
        "   Duration:   {} (moving {})",
        format_duration(view.duration_ms),
        format_duration(view.moving_time_ms)
    );
    println!("   Distance:   {:.2} km", view.distance_m / 1000.0);
    println!(
        "   Speed:      avg {:.1} km/h | max {:.1} km/h",
        view.average_speed_kmh, view.max_speed_kmh
    );
    println!(
        "   Elevation:  +{:.0} m / -{:.0} m",
        view.elevation_gain_m, view.elevation_loss_m
    );
    if let (Some(min), Some(max)) = (view.min_altitude_m, view.max_altitude_m) {
        println!("   Altitude:   {min:.0} m .. {max:.0} m");
    }
    println!("   Calories:   {} kcal", view.calories);
    if view.steps > 0 {
        println!("   Steps:      {}", view.steps);
    }
    println!("   Points:     {}", view.path_len);

    if !view.splits.is_empty() {
        println!("\n   Splits:");
        for split in &view.splits {
            let kind = match split.kind {
                SplitKind::Auto => "auto",
                SplitKind::Manual => "manual",
            };
            println!(
                "   {:>4} {:<6} {:>9} {:>6.1} km/h",
                split.index,
                kind,
                format_duration(split.segment_ms),
                split.avg_speed_kmh
            );
        }
    }
    if let Some(stats) = &view.split_stats {
        println!(
            "   Best {} | worst {} | mean {}",
            format_duration(stats.best_ms),
            format_duration(stats.worst_ms),
            format_duration(stats.average_ms.round() as i64)
        );
    }
}

/// Print filter counters
pub fn display_diagnostics(diagnostics: &FilterDiagnostics) {
    println!(
        "\n   Fixes: {} accepted, {} rejected (accuracy {}, jitter {}, teleport {}, stale {}, not running {})",
        diagnostics.accepted,
        diagnostics.rejected(),
        diagnostics.accuracy,
        diagnostics.jitter,
        diagnostics.teleport,
        diagnostics.stale,
        diagnostics.not_running
    );
}

/// Print the pending queue
pub fn display_pending(items: &[PendingSyncItem]) {
    if items.is_empty() {
        println!("\nSync queue is empty");
        return;
    }
    println!("\nPending sessions: {}", items.len());
    for item in items {
        println!(
            "   {} retries={} queued={}",
            item.session_id,
            item.retry_count,
            item.enqueued_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
}

/// Print the outcome of a flush pass
pub fn display_flush(report: &FlushReport) {
    println!(
        "Sync finished: {} synced, {} failed, {} dropped, {} waiting for backoff",
        report.synced, report.failed, report.dropped, report.skipped
    );
}

/// Print where a finalized session went
pub fn display_submit(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Delivered => println!("\nSession delivered to the server"),
        SubmitOutcome::Queued { reason } => {
            println!("\nServer unreachable ({reason}); session queued for retry");
        }
    }
}
