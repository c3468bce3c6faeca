// ABOUTME: Lap ("split") records produced automatically per distance unit or on demand
// ABOUTME: Includes aggregate statistics over the automatic splits of a session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a split was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    /// Emitted when a whole distance unit was crossed
    Auto,
    /// Requested by the user
    Manual,
}

/// A recorded lap boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Distance-unit label (kilometer number)
    pub index: u32,
    /// Elapsed session duration when the split was created, in milliseconds
    pub elapsed_ms: i64,
    /// Duration since the previous split (of any kind), in milliseconds
    pub segment_ms: i64,
    /// Average speed over the segment, in km/h
    pub avg_speed_kmh: f64,
    /// Cumulative distance at creation, in meters (the unit boundary for auto splits)
    pub distance_m: f64,
    /// Auto or manual
    pub kind: SplitKind,
    /// Wall-clock creation time
    pub created_at: DateTime<Utc>,
}

/// Summary of the automatic splits of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitStats {
    /// Fastest auto split duration (ms)
    pub best_ms: i64,
    /// Slowest auto split duration (ms)
    pub worst_ms: i64,
    /// Mean auto split duration (ms)
    pub average_ms: f64,
    /// All splits, auto and manual
    pub total_splits: usize,
    /// Auto splits only
    pub auto_splits: usize,
}

impl SplitStats {
    /// Compute statistics, or `None` when there is no auto split yet
    #[must_use]
    pub fn from_splits(splits: &[Split]) -> Option<Self> {
        let durations: Vec<i64> = splits
            .iter()
            .filter(|s| s.kind == SplitKind::Auto)
            .map(|s| s.segment_ms)
            .collect();

        let best_ms = durations.iter().copied().min()?;
        let worst_ms = durations.iter().copied().max()?;
        let sum: i64 = durations.iter().sum();

        Some(Self {
            best_ms,
            worst_ms,
            average_ms: sum as f64 / durations.len() as f64,
            total_splits: splits.len(),
            auto_splits: durations.len(),
        })
    }
}
