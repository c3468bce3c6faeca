// ABOUTME: Integration tests for GPX export of finished sessions
// ABOUTME: Document structure, point formatting, naming, escaping and empty tracks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;

use common::{base_point, sample_payload, t0};
use trackline::export::GpxDocument;
use trackline_core::models::{SportKind, TrackPoint};

fn three_point_payload() -> trackline_core::models::SessionPayload {
    let mut payload = sample_payload("gpx-1");
    payload.tracking_path = (0..3_i64)
        .map(|i| TrackPoint {
            latitude: -21.0 + 0.001 * i as f64,
            longitude: 55.5,
            altitude: (i != 1).then_some(100.0 + 5.0 * i as f64),
            timestamp: t0() + Duration::seconds(15 * i),
        })
        .collect();
    payload
}

#[test]
fn test_document_structure() {
    let gpx = GpxDocument::from_payload(&three_point_payload()).to_string();

    assert!(gpx.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(gpx.contains(r#"<gpx version="1.1" creator="trackline""#));
    assert!(gpx.contains(r#"xmlns="http://www.topografix.com/GPX/1/1""#));
    assert!(gpx.ends_with("</gpx>"));
    assert_eq!(gpx.matches("<trkpt ").count(), 3);
    assert_eq!(gpx.matches("<trkseg>").count(), 1);
    assert_eq!(gpx.matches("<wpt ").count(), 1);
    assert!(gpx.contains("<type>running</type>"));
}

#[test]
fn test_points_carry_position_elevation_and_time() {
    let gpx = GpxDocument::from_payload(&three_point_payload()).to_string();

    assert!(gpx.contains(r#"<trkpt lat="-21.0000000" lon="55.5000000">"#));
    assert!(gpx.contains(r#"<trkpt lat="-20.9990000" lon="55.5000000">"#));
    assert!(gpx.contains("<ele>100.0</ele>"));
    assert!(gpx.contains("<ele>110.0</ele>"));
    // The middle point has no altitude
    assert_eq!(gpx.matches("<ele>").count(), 2);
    assert!(gpx.contains("<time>2025-06-01T07:00:30.000Z</time>"));
}

#[test]
fn test_default_name_and_summary() {
    let gpx = GpxDocument::from_payload(&three_point_payload()).to_string();

    assert!(gpx.contains("<name>Running 2025-06-01</name>"));
    assert!(gpx.contains("<name>Summary - Running 2025-06-01</name>"));
    assert!(gpx.contains("Distance: 5.00 km | Duration: 0:30:00 | Gain: +42 m"));
    assert!(gpx.contains("<time>2025-06-01T07:00:00.000Z</time>"));
}

#[test]
fn test_custom_name_is_escaped() {
    let gpx = GpxDocument::from_payload(&three_point_payload())
        .with_name("Tom & Jerry <dawn run>")
        .to_string();

    assert!(gpx.contains("<name>Tom &amp; Jerry &lt;dawn run&gt;</name>"));
    assert!(!gpx.contains("<dawn run>"));
}

#[test]
fn test_empty_track() {
    let mut payload = sample_payload("empty");
    payload.sport = SportKind::Other;
    payload.tracking_path.clear();
    payload.started_at = None;

    let doc = GpxDocument::from_payload(&payload);
    assert!(doc.is_empty());
    let gpx = doc.to_string();

    assert!(gpx.contains("<name>Activity</name>"));
    assert!(!gpx.contains("<wpt "));
    assert!(!gpx.contains("<trkpt "));
    assert!(gpx.contains("<trkseg>"));
}

#[test]
fn test_single_point_summary_waypoint_sits_on_start() {
    let mut payload = sample_payload("one");
    payload.tracking_path = vec![base_point()];

    let doc = GpxDocument::from_payload(&payload);
    assert_eq!(doc.len(), 1);
    assert!(doc
        .to_string()
        .contains(r#"<wpt lat="-21.0000000" lon="55.5000000">"#));
}
