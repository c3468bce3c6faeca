// ABOUTME: Unit conversion constants for distance, time, and speed
// ABOUTME: Provides named constants to eliminate magic numbers in calculations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Meters per kilometer conversion factor
pub const METERS_PER_KM: f64 = 1000.0;

/// Milliseconds per second
pub const MS_PER_SECOND: f64 = 1000.0;

/// Milliseconds per hour
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// m/s to km/h
pub const MPS_TO_KMH: f64 = 3.6;

/// Mean Earth radius in meters (IUGG)
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;
