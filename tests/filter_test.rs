// ABOUTME: Integration tests for the sample filter and distance accumulator
// ABOUTME: Accuracy, jitter, teleport and stale rejection, pause handling and speed derivation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{fix_north, init_test_logging, manual_clock, t0};
use trackline::snapshot::Snapshot;
use trackline::tracking::{FixOutcome, TrackingEngine};
use trackline_core::models::{RejectReason, SportKind, TrackingState};
use trackline_core::{profile_for, ManualClock, SportProfile};

fn engine_with_profile(clock: Arc<ManualClock>, profile: SportProfile) -> TrackingEngine {
    let mut engine = TrackingEngine::from_snapshot(
        clock,
        Snapshot {
            session_id: None,
            profile,
            state: TrackingState::new(),
            saved_at: t0(),
        },
    );
    engine.start("filter-test".into()).unwrap();
    engine
}

fn running_engine() -> TrackingEngine {
    let mut engine = TrackingEngine::new(manual_clock());
    engine.select_sport(SportKind::Running).unwrap();
    engine.start("running".into()).unwrap();
    engine
}

#[test]
fn test_scenario_a_accuracy_then_jitter_then_accept() {
    init_test_logging();
    let profile = SportProfile {
        min_accepted_distance_m: 2.0,
        accuracy_threshold_m: 30.0,
        ..SportProfile::generic(SportKind::Walking)
    };
    let mut engine = engine_with_profile(manual_clock(), profile);

    assert!(engine.ingest_fix(&fix_north(0.0, 0)).is_accepted());

    let inaccurate = fix_north(3.0, 1).with_accuracy(50.0);
    assert_eq!(
        engine.ingest_fix(&inaccurate),
        FixOutcome::Rejected(RejectReason::Accuracy)
    );

    let jitter = fix_north(1.0, 2).with_accuracy(10.0);
    assert_eq!(
        engine.ingest_fix(&jitter),
        FixOutcome::Rejected(RejectReason::Jitter)
    );

    let real = fix_north(5.0, 3).with_accuracy(10.0);
    assert!(engine.ingest_fix(&real).is_accepted());

    let state = engine.state();
    assert!((state.total_distance_m - 5.0).abs() < 1e-6, "got {}", state.total_distance_m);
    assert_eq!(state.path.len(), 2);
    assert_eq!(engine.diagnostics().accepted, 2);
    assert_eq!(engine.diagnostics().rejected(), 2);
}

#[test]
fn test_inaccurate_fixes_never_change_distance_or_path() {
    let mut engine = running_engine();
    engine.ingest_fix(&fix_north(0.0, 0));
    let before = engine.state().clone();

    let threshold = engine.profile().accuracy_threshold_m;
    for i in 1..=50_i32 {
        let accuracy = threshold + 0.5 + f64::from(i) * 3.0;
        let fix = fix_north(f64::from(i) * 37.0, i64::from(i) * 5).with_accuracy(accuracy);
        assert_eq!(
            engine.ingest_fix(&fix),
            FixOutcome::Rejected(RejectReason::Accuracy)
        );
    }

    assert_eq!(engine.state(), &before);
    assert_eq!(engine.diagnostics().accuracy, 50);
}

#[test]
fn test_first_fix_is_accepted_without_distance() {
    let mut engine = running_engine();
    let outcome = engine.ingest_fix(&fix_north(0.0, 0).with_accuracy(80.0));

    assert_eq!(
        outcome,
        FixOutcome::Accepted {
            distance_m: 0.0,
            new_splits: 0
        }
    );
    assert_eq!(engine.state().path.len(), 1);
    assert!(engine.state().total_distance_m.abs() < f64::EPSILON);
    assert!(engine.state().speed_history.is_empty());
}

#[test]
fn test_teleport_is_rejected() {
    let mut engine = running_engine();
    engine.ingest_fix(&fix_north(0.0, 0));

    // 500 m in 10 s is 180 km/h, far beyond twice the running maximum
    assert_eq!(
        engine.ingest_fix(&fix_north(500.0, 10)),
        FixOutcome::Rejected(RejectReason::Teleport)
    );
    // Just under the margin is kept
    let limit_kmh = profile_for(SportKind::Running).teleport_speed_kmh();
    let meters = (limit_kmh / 3.6) * 10.0 - 1.0;
    assert!(engine.ingest_fix(&fix_north(meters, 10)).is_accepted());
}

#[test]
fn test_non_advancing_timestamp_is_stale() {
    let mut engine = running_engine();
    engine.ingest_fix(&fix_north(0.0, 10));

    assert_eq!(
        engine.ingest_fix(&fix_north(30.0, 10)),
        FixOutcome::Rejected(RejectReason::Stale)
    );
    assert_eq!(
        engine.ingest_fix(&fix_north(30.0, 5)),
        FixOutcome::Rejected(RejectReason::Stale)
    );
    assert_eq!(engine.diagnostics().stale, 2);
}

#[test]
fn test_fixes_outside_running_are_not_accumulated() {
    let mut engine = TrackingEngine::new(manual_clock());
    assert_eq!(
        engine.ingest_fix(&fix_north(0.0, 0)),
        FixOutcome::Rejected(RejectReason::NotRunning)
    );
    assert!(engine.state().path.is_empty());
    assert!(engine.state().reference_point.is_none());
}

#[test]
fn test_movement_during_pause_is_not_counted() {
    let mut engine = running_engine();
    engine.ingest_fix(&fix_north(0.0, 0));
    engine.ingest_fix(&fix_north(20.0, 10));
    engine.pause().unwrap();

    assert_eq!(
        engine.ingest_fix(&fix_north(500.0, 60)),
        FixOutcome::Rejected(RejectReason::NotRunning)
    );
    assert_eq!(engine.state().path.len(), 2);

    engine.resume().unwrap();
    assert!(engine.ingest_fix(&fix_north(520.0, 70)).is_accepted());

    let total = engine.state().total_distance_m;
    assert!((total - 40.0).abs() < 1e-6, "got {total}");
    assert_eq!(engine.state().path.len(), 3);
}

#[test]
fn test_fix_while_paused_before_any_accepted_point_is_ignored() {
    let mut engine = running_engine();
    engine.pause().unwrap();

    assert_eq!(
        engine.ingest_fix(&fix_north(0.0, 0)),
        FixOutcome::Rejected(RejectReason::NotRunning)
    );
    assert!(engine.state().reference_point.is_none());

    engine.resume().unwrap();
    // First fix of the session: accepted even 3 m from the paused position
    assert_eq!(
        engine.ingest_fix(&fix_north(3.0, 1)),
        FixOutcome::Accepted {
            distance_m: 0.0,
            new_splits: 0
        }
    );
    assert!(engine.ingest_fix(&fix_north(100.0, 20)).is_accepted());

    let state = engine.state();
    assert_eq!(state.path.len(), 2);
    // Distance is measured along the recorded path only
    assert!((state.total_distance_m - 97.0).abs() < 1e-6, "got {}", state.total_distance_m);
}

#[test]
fn test_device_speed_and_moving_average() {
    let mut engine = running_engine();
    engine.ingest_fix(&fix_north(0.0, 0));
    engine.ingest_fix(&fix_north(20.0, 10).with_speed(2.0));
    engine.ingest_fix(&fix_north(40.0, 20).with_speed(3.0));
    engine.ingest_fix(&fix_north(60.0, 30).with_speed(4.0));
    engine.ingest_fix(&fix_north(80.0, 40).with_speed(5.0));

    let state = engine.state();
    assert!((state.instant_speed_kmh - 18.0).abs() < 1e-9);
    assert!((state.max_speed_kmh - 18.0).abs() < 1e-9);
    // window of 3: (3 + 4 + 5) m/s * 3.6 / 3
    assert!((state.moving_average_speed_kmh() - 14.4).abs() < 1e-9);
}

#[test]
fn test_implied_speed_when_device_has_none() {
    let mut engine = running_engine();
    engine.ingest_fix(&fix_north(0.0, 0));
    engine.ingest_fix(&fix_north(25.0, 10));

    // 25 m in 10 s
    assert!((engine.state().instant_speed_kmh - 9.0).abs() < 1e-6);
}
