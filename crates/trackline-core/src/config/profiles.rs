// ABOUTME: Sport profile registry mapping each sport kind to filter and polling parameters
// ABOUTME: Exhaustive match over SportKind with a generic fallback profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Sport profiles
//!
//! A profile is chosen once when a session starts and copied into the
//! crash-recovery snapshot, so a restored session keeps filtering with the
//! parameters it started with even if these defaults change.

use serde::{Deserialize, Serialize};

use crate::models::SportKind;

/// Filtering and polling parameters for one sport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportProfile {
    /// Sport this profile was built for
    pub sport: SportKind,
    /// Highest realistic speed in km/h; twice this value is a GPS jump
    pub max_plausible_speed_kmh: f64,
    /// Movement below this distance (meters) is jitter
    pub min_accepted_distance_m: f64,
    /// Fixes with a worse horizontal accuracy (meters) are rejected
    pub accuracy_threshold_m: f64,
    /// Fastest polling interval in milliseconds
    pub min_poll_interval_ms: u64,
    /// Slowest polling interval in milliseconds
    pub max_poll_interval_ms: u64,
    /// Whether sustained timeouts may stretch the polling interval
    pub allow_slow_polling: bool,
    /// Number of accepted speeds averaged into the reported average speed
    pub speed_smoothing_window: usize,
}

impl SportProfile {
    /// Generic parameters used for sports without dedicated tuning
    #[must_use]
    pub const fn generic(sport: SportKind) -> Self {
        Self {
            sport,
            max_plausible_speed_kmh: 35.0,
            min_accepted_distance_m: 8.0,
            accuracy_threshold_m: 20.0,
            min_poll_interval_ms: 2_500,
            max_poll_interval_ms: 8_000,
            allow_slow_polling: true,
            speed_smoothing_window: 3,
        }
    }

    #[allow(clippy::too_many_arguments)]
    const fn tuned(
        sport: SportKind,
        max_plausible_speed_kmh: f64,
        min_accepted_distance_m: f64,
        accuracy_threshold_m: f64,
        min_poll_interval_ms: u64,
        max_poll_interval_ms: u64,
        allow_slow_polling: bool,
        speed_smoothing_window: usize,
    ) -> Self {
        Self {
            sport,
            max_plausible_speed_kmh,
            min_accepted_distance_m,
            accuracy_threshold_m,
            min_poll_interval_ms,
            max_poll_interval_ms,
            allow_slow_polling,
            speed_smoothing_window,
        }
    }

    /// Speed above which a candidate fix is treated as a GPS jump
    #[must_use]
    pub fn teleport_speed_kmh(&self) -> f64 {
        self.max_plausible_speed_kmh * crate::constants::filter::TELEPORT_MARGIN
    }
}

impl Default for SportProfile {
    fn default() -> Self {
        Self::generic(SportKind::Other)
    }
}

/// Look up the profile for a sport
///
/// Pure and infallible. Sports without dedicated tuning get
/// [`SportProfile::generic`].
#[must_use]
pub const fn profile_for(sport: SportKind) -> SportProfile {
    match sport {
        SportKind::Running => SportProfile::tuned(sport, 25.0, 8.0, 15.0, 2_000, 6_000, false, 3),
        SportKind::TrailRunning => {
            SportProfile::tuned(sport, 20.0, 10.0, 20.0, 3_000, 8_000, true, 3)
        }
        SportKind::Walking => SportProfile::tuned(sport, 8.0, 2.0, 20.0, 500, 5_000, true, 5),
        SportKind::Hiking => SportProfile::tuned(sport, 10.0, 10.0, 25.0, 4_000, 10_000, true, 5),
        SportKind::MountainBiking => {
            SportProfile::tuned(sport, 45.0, 15.0, 20.0, 1_500, 5_000, true, 3)
        }
        SportKind::Cycling => SportProfile::tuned(sport, 50.0, 20.0, 15.0, 2_000, 6_000, false, 3),
        SportKind::Swimming
        | SportKind::Climbing
        | SportKind::Paddleboarding
        | SportKind::Surfing
        | SportKind::Kayaking
        | SportKind::Other => SportProfile::generic(sport),
    }
}
