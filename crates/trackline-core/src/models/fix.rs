// ABOUTME: Raw location fixes and accepted track points
// ABOUTME: Fix is produced by the acquisition loop; TrackPoint is what the path retains
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::haversine_meters;

/// One raw location reading from the platform location service
///
/// Fixes are never mutated after the acquisition loop emits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude in meters above sea level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Horizontal accuracy radius in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Device-reported ground speed in m/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Time the fix was taken
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    /// Create a fix with only a position and timestamp
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            accuracy: None,
            speed: None,
            timestamp,
        }
    }

    /// Set the altitude
    #[must_use]
    pub const fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Set the horizontal accuracy
    #[must_use]
    pub const fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Set the device-reported speed (m/s)
    #[must_use]
    pub const fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed = Some(speed_mps);
        self
    }

    /// Great-circle distance to a track point, in meters
    #[must_use]
    pub fn distance_to(&self, point: &TrackPoint) -> f64 {
        haversine_meters(point.latitude, point.longitude, self.latitude, self.longitude)
    }
}

/// An accepted position retained in the session path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude in meters, when the fix carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Time of the originating fix
    pub timestamp: DateTime<Utc>,
}

impl From<&Fix> for TrackPoint {
    fn from(fix: &Fix) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            altitude: fix.altitude,
            timestamp: fix.timestamp,
        }
    }
}

/// Why the sample filter dropped a fix
///
/// This is a filtering decision, not a fault: rejected fixes are counted for
/// diagnostics and never surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Horizontal accuracy worse than the profile threshold
    Accuracy,
    /// Movement below the minimum accepted distance
    Jitter,
    /// Implied speed far above the plausible maximum
    Teleport,
    /// Timestamp does not advance past the reference point
    Stale,
    /// Session is not running
    NotRunning,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Accuracy => "accuracy",
            Self::Jitter => "jitter",
            Self::Teleport => "teleport",
            Self::Stale => "stale",
            Self::NotRunning => "not_running",
        };
        f.write_str(label)
    }
}
