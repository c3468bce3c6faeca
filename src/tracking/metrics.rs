// ABOUTME: Derived session metrics: calorie and step estimates
// ABOUTME: Pure functions of distance, sport kind and instantaneous speed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use trackline_core::constants::units::METERS_PER_KM;
use trackline_core::models::SportKind;

/// Base energy cost per kilometer before category and speed adjustments
#[must_use]
pub const fn base_kcal_per_km(sport: SportKind) -> f64 {
    match sport {
        SportKind::Running => 60.0,
        SportKind::TrailRunning => 65.0,
        SportKind::Walking => 45.0,
        SportKind::Hiking | SportKind::Other => 50.0,
        SportKind::Climbing => 80.0,
        SportKind::MountainBiking | SportKind::Kayaking => 35.0,
        SportKind::Cycling => 30.0,
        SportKind::Swimming => 120.0,
        SportKind::Paddleboarding => 40.0,
        SportKind::Surfing => 45.0,
    }
}

/// Intensity factor of the current speed within the sport's expected band
#[must_use]
pub fn speed_factor(sport: SportKind, instant_speed_kmh: f64) -> f64 {
    let range = sport.category().speed_range();
    if instant_speed_kmh > range.max * 0.8 {
        1.3
    } else if instant_speed_kmh > range.normal {
        1.1
    } else if instant_speed_kmh < range.min * 2.0 {
        0.8
    } else {
        1.0
    }
}

/// Estimated calories burned over `distance_m`
#[must_use]
pub fn calories(distance_m: f64, sport: SportKind, instant_speed_kmh: f64) -> u32 {
    if distance_m <= 0.0 {
        return 0;
    }
    let per_km = base_kcal_per_km(sport)
        * sport.category().calories_multiplier()
        * speed_factor(sport, instant_speed_kmh);
    (distance_m / METERS_PER_KM * per_km).round() as u32
}

/// Average steps per kilometer, for sports where steps are meaningful
#[must_use]
pub const fn steps_per_km(sport: SportKind) -> Option<f64> {
    if !sport.category().counts_steps() {
        return None;
    }
    Some(match sport {
        SportKind::Running => 1300.0,
        SportKind::TrailRunning => 1400.0,
        SportKind::Walking => 1250.0,
        SportKind::Climbing => 800.0,
        _ => 1200.0,
    })
}

/// Estimated step count over `distance_m` (0 for sports without steps)
#[must_use]
pub fn steps(distance_m: f64, sport: SportKind) -> u32 {
    match steps_per_km(sport) {
        Some(per_km) if distance_m > 0.0 => (distance_m / METERS_PER_KM * per_km).round() as u32,
        _ => 0,
    }
}
