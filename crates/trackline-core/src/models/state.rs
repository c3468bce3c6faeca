// ABOUTME: The live tracking aggregate and its lifecycle status
// ABOUTME: One TrackingState per device, mutated only by the engine's accumulators and state machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use super::{Split, TrackPoint};

/// Session lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No session, or a session that was reset
    #[default]
    Idle,
    /// Accumulating fixes
    Running,
    /// Temporarily not accumulating
    Paused,
    /// Finished; frozen until finalized or discarded
    Stopped,
}

impl SessionStatus {
    /// Running or Paused: the session is in progress and must survive restarts
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

/// Live aggregate for the active session
///
/// Distances are in meters, speeds in km/h, altitudes in meters.
///
/// # Invariants
///
/// - `total_distance_m` never decreases while Running and is frozen otherwise
/// - `path` is append-only while Running
/// - `elevation_gain_m` / `elevation_loss_m` are non-negative and only change
///   on accepted fixes that carry an altitude
/// - auto splits are strictly ordered by index with no duplicates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingState {
    /// Lifecycle status
    pub status: SessionStatus,
    /// Set by `start()`
    pub started_at: Option<DateTime<Utc>>,
    /// Set by `stop()`
    pub ended_at: Option<DateTime<Utc>>,
    /// Set by `pause()`, cleared by `resume()`
    pub paused_at: Option<DateTime<Utc>>,
    /// Total time spent in completed pauses, in milliseconds
    #[serde(default)]
    pub paused_ms: i64,

    /// Accepted positions in acceptance order
    pub path: Vec<TrackPoint>,
    /// Position the next candidate fix is measured against
    pub reference_point: Option<TrackPoint>,
    /// Accumulated distance in meters
    pub total_distance_m: f64,

    /// Speed of the last accepted fix
    pub instant_speed_kmh: f64,
    /// Running maximum of accepted instantaneous speeds
    pub max_speed_kmh: f64,
    /// Ring buffer of the last N accepted speeds (N = profile smoothing window)
    pub speed_history: VecDeque<f64>,

    /// Cumulative positive altitude change in meters
    pub elevation_gain_m: f64,
    /// Cumulative negative altitude change (absolute) in meters
    pub elevation_loss_m: f64,
    /// Lowest altitude seen
    pub min_altitude_m: Option<f64>,
    /// Highest altitude seen
    pub max_altitude_m: Option<f64>,
    /// Altitude of the last accepted fix that carried one
    pub last_altitude_m: Option<f64>,

    /// Recorded splits in creation order
    pub splits: Vec<Split>,
    /// Distance threshold already consumed by automatic splits, in meters
    pub last_split_distance_m: f64,
}

impl TrackingState {
    /// Empty Idle state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moving average over `speed_history`
    ///
    /// This is the reported "average speed". It intentionally differs from
    /// total distance divided by total duration.
    #[must_use]
    pub fn moving_average_speed_kmh(&self) -> f64 {
        if self.speed_history.is_empty() {
            return 0.0;
        }
        self.speed_history.iter().sum::<f64>() / self.speed_history.len() as f64
    }

    /// Elapsed session duration in milliseconds
    ///
    /// `now - started_at` while Running, `ended_at - started_at` once Stopped,
    /// frozen at `paused_at - started_at` while Paused, and 0 when Idle or never
    /// started. Pauses are included; see [`TrackingState::moving_time_ms`].
    #[must_use]
    pub fn duration_ms(&self, now: DateTime<Utc>) -> i64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let until = match self.status {
            SessionStatus::Idle => return 0,
            SessionStatus::Running => Some(now),
            SessionStatus::Paused => self.paused_at,
            SessionStatus::Stopped => self.ended_at,
        };
        until.map_or(0, |end| (end - started_at).num_milliseconds().max(0))
    }

    /// Elapsed duration minus the time spent in completed pauses
    #[must_use]
    pub fn moving_time_ms(&self, now: DateTime<Utc>) -> i64 {
        (self.duration_ms(now) - self.paused_ms).max(0)
    }
}
