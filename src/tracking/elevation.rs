// ABOUTME: Elevation accumulator deriving gain, loss and altitude extremes from accepted fixes
// ABOUTME: Raw deltas, no smoothing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use trackline_core::models::TrackingState;

/// Fold one altitude reading into the elevation counters
///
/// Only called for accepted fixes that carry an altitude. Non-finite readings
/// are ignored.
pub fn record_altitude(state: &mut TrackingState, altitude_m: f64) {
    if !altitude_m.is_finite() {
        return;
    }

    if let Some(previous) = state.last_altitude_m {
        let delta = altitude_m - previous;
        if delta > 0.0 {
            state.elevation_gain_m += delta;
        } else {
            state.elevation_loss_m += -delta;
        }
    }

    state.min_altitude_m = Some(state.min_altitude_m.map_or(altitude_m, |m| m.min(altitude_m)));
    state.max_altitude_m = Some(state.max_altitude_m.map_or(altitude_m, |m| m.max(altitude_m)));
    state.last_altitude_m = Some(altitude_m);
}
