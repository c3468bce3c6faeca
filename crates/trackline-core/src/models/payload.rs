// ABOUTME: Finalized session payload sent to the remote service and its durable queue entry
// ABOUTME: Wire format is camelCase JSON matching the sessions API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{SportKind, Split, TrackPoint};

/// Remote status marker for a finished session
pub const COMPLETED_STATUS: &str = "completed";

/// Everything the remote service stores for a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Session identifier (server-issued or locally generated)
    pub session_id: String,
    /// Sport kind
    pub sport: SportKind,
    /// Total distance in kilometers
    pub distance: f64,
    /// Duration in milliseconds
    pub duration: i64,
    /// Estimated calories
    pub calories: u32,
    /// Moving-average speed in km/h
    pub avg_speed: f64,
    /// Maximum speed in km/h
    pub max_speed: f64,
    /// Estimated steps (0 for sports without steps)
    pub steps: u32,
    /// Elevation gain in meters
    pub elevation_gain: f64,
    /// Elevation loss in meters
    pub elevation_loss: f64,
    /// Lowest altitude seen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_altitude: Option<f64>,
    /// Highest altitude seen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_altitude: Option<f64>,
    /// Recorded path
    pub tracking_path: Vec<TrackPoint>,
    /// Recorded splits
    pub splits: Vec<Split>,
    /// Session start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Session end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Always `"completed"`
    pub status: String,
}

/// A finalized session awaiting delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSyncItem {
    /// Queue entry identifier
    pub id: Uuid,
    /// Session identifier
    pub session_id: String,
    /// Payload to deliver
    pub payload: SessionPayload,
    /// Failed retries so far (the initial immediate attempt is not counted)
    pub retry_count: u32,
    /// When the item entered the queue
    pub enqueued_at: DateTime<Utc>,
    /// Time of the last failed retry
    #[serde(default)]
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl PendingSyncItem {
    /// Wrap a payload into a fresh queue entry
    #[must_use]
    pub fn new(payload: SessionPayload, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: payload.session_id.clone(),
            payload,
            retry_count: 0,
            enqueued_at,
            last_attempt_at: None,
        }
    }
}
