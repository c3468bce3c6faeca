// ABOUTME: Sample filter and distance accumulator for incoming location fixes
// ABOUTME: Rejects inaccurate, jittery, stale and teleporting fixes, then accumulates path and speed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use trackline_core::constants::units::{MPS_TO_KMH, MS_PER_SECOND};
use trackline_core::models::{Fix, RejectReason, TrackPoint, TrackingState};
use trackline_core::SportProfile;

/// Distance and speed of a fix that passed the filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedSample {
    /// Distance from the reference point, in meters (0 for the first fix)
    pub distance_m: f64,
    /// Instantaneous speed in km/h, when one can be derived
    pub speed_kmh: Option<f64>,
}

/// Outcome of evaluating one fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterDecision {
    /// Keep the fix
    Accept(AcceptedSample),
    /// Drop the fix
    Reject(RejectReason),
}

/// Decide whether `fix` is real movement relative to `reference`
///
/// The first fix of a session (no reference) is accepted unconditionally.
#[must_use]
pub fn evaluate(profile: &SportProfile, reference: Option<&TrackPoint>, fix: &Fix) -> FilterDecision {
    let device_speed_kmh = fix
        .speed
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map(|s| s * MPS_TO_KMH);

    let Some(reference) = reference else {
        return FilterDecision::Accept(AcceptedSample {
            distance_m: 0.0,
            speed_kmh: device_speed_kmh,
        });
    };

    if fix
        .accuracy
        .is_some_and(|accuracy| accuracy > profile.accuracy_threshold_m)
    {
        return FilterDecision::Reject(RejectReason::Accuracy);
    }

    let elapsed_ms = (fix.timestamp - reference.timestamp).num_milliseconds();
    if elapsed_ms <= 0 {
        return FilterDecision::Reject(RejectReason::Stale);
    }

    let distance_m = fix.distance_to(reference);
    if distance_m < profile.min_accepted_distance_m {
        return FilterDecision::Reject(RejectReason::Jitter);
    }

    let implied_kmh = distance_m / (elapsed_ms as f64 / MS_PER_SECOND) * MPS_TO_KMH;
    if implied_kmh > profile.teleport_speed_kmh() {
        return FilterDecision::Reject(RejectReason::Teleport);
    }

    FilterDecision::Accept(AcceptedSample {
        distance_m,
        speed_kmh: Some(device_speed_kmh.unwrap_or(implied_kmh)),
    })
}

/// Append an accepted fix to the path and fold its distance and speed in
pub fn accumulate(state: &mut TrackingState, profile: &SportProfile, fix: &Fix, sample: AcceptedSample) {
    let point = TrackPoint::from(fix);
    state.path.push(point.clone());
    state.reference_point = Some(point);
    state.total_distance_m += sample.distance_m;

    if let Some(speed) = sample.speed_kmh {
        state.instant_speed_kmh = speed;
        state.max_speed_kmh = state.max_speed_kmh.max(speed);
        state.speed_history.push_back(speed);
        while state.speed_history.len() > profile.speed_smoothing_window.max(1) {
            state.speed_history.pop_front();
        }
    }
}
