// ABOUTME: Split detector emitting automatic per-kilometer laps and manual laps
// ABOUTME: Auto splits cover every whole unit crossed since the last check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};

use trackline_core::constants::filter::SPLIT_UNIT_METERS;
use trackline_core::constants::units::{METERS_PER_KM, MS_PER_HOUR};
use trackline_core::models::{Split, SplitKind, TrackingState};

fn speed_kmh(distance_m: f64, segment_ms: i64) -> f64 {
    if segment_ms <= 0 {
        return 0.0;
    }
    (distance_m / METERS_PER_KM) / (segment_ms as f64 / MS_PER_HOUR)
}

fn previous_split(state: &TrackingState) -> (i64, f64) {
    state
        .splits
        .last()
        .map_or((0, 0.0), |s| (s.elapsed_ms, s.distance_m))
}

/// Emit one Auto split per whole unit crossed since the last check
///
/// Returns the number of splits appended.
pub fn detect_auto_splits(state: &mut TrackingState, elapsed_ms: i64, now: DateTime<Utc>) -> usize {
    let consumed_units = (state.last_split_distance_m / SPLIT_UNIT_METERS).floor() as u32;
    let reached_units = (state.total_distance_m / SPLIT_UNIT_METERS).floor() as u32;
    if reached_units <= consumed_units {
        return 0;
    }

    for index in consumed_units + 1..=reached_units {
        let (previous_elapsed, _) = previous_split(state);
        let segment_ms = (elapsed_ms - previous_elapsed).max(0);
        state.splits.push(Split {
            index,
            elapsed_ms,
            segment_ms,
            avg_speed_kmh: speed_kmh(SPLIT_UNIT_METERS, segment_ms),
            distance_m: f64::from(index) * SPLIT_UNIT_METERS,
            kind: SplitKind::Auto,
            created_at: now,
        });
    }
    state.last_split_distance_m = f64::from(reached_units) * SPLIT_UNIT_METERS;

    (reached_units - consumed_units) as usize
}

/// Record a Manual split labelled with the next whole unit above the current distance
///
/// Not deduplicated against Auto splits carrying the same label.
pub fn manual_split(state: &mut TrackingState, elapsed_ms: i64, now: DateTime<Utc>) -> Split {
    let (previous_elapsed, previous_distance) = previous_split(state);
    let segment_ms = (elapsed_ms - previous_elapsed).max(0);
    let segment_distance = (state.total_distance_m - previous_distance).max(0.0);

    let split = Split {
        index: (state.total_distance_m / SPLIT_UNIT_METERS).floor() as u32 + 1,
        elapsed_ms,
        segment_ms,
        avg_speed_kmh: speed_kmh(segment_distance, segment_ms),
        distance_m: state.total_distance_m,
        kind: SplitKind::Manual,
        created_at: now,
    };
    state.splits.push(split.clone());
    split
}
