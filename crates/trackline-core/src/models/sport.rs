// ABOUTME: Sport kind enumeration for tracked sessions
// ABOUTME: Closed set of sports with name parsing, display names, and category classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Enumeration of supported sport kinds
///
/// The set is closed so the profile registry can match exhaustively; anything
/// the app does not know about is tracked as `Other` with generic parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SportKind {
    /// Road running
    Running,
    /// Off-road running
    TrailRunning,
    /// Walking
    Walking,
    /// Hiking / trekking on mountain trails
    Hiking,
    /// Mountain biking
    MountainBiking,
    /// Road cycling
    Cycling,
    /// Open-water swimming
    Swimming,
    /// Rock climbing
    Climbing,
    /// Stand-up paddleboarding
    Paddleboarding,
    /// Surfing
    Surfing,
    /// Kayaking
    Kayaking,
    /// Any sport without a dedicated profile
    Other,
}

impl SportKind {
    /// Every sport kind, in display order
    pub const ALL: [Self; 12] = [
        Self::Running,
        Self::TrailRunning,
        Self::Walking,
        Self::Hiking,
        Self::MountainBiking,
        Self::Cycling,
        Self::Swimming,
        Self::Climbing,
        Self::Paddleboarding,
        Self::Surfing,
        Self::Kayaking,
        Self::Other,
    ];

    /// Parse a user- or server-supplied sport name
    ///
    /// Accepts the snake_case identifiers as well as the labels used by the
    /// mobile client (`"Course"`, `"Randonnée"`, `"VTT"`, ...). Unknown names
    /// map to `Other`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "running" | "run" | "course" => Self::Running,
            "trail_running" | "trail" | "trailrunning" => Self::TrailRunning,
            "walking" | "walk" | "marche" => Self::Walking,
            "hiking" | "hike" | "randonnée" | "randonnee" => Self::Hiking,
            "mountain_biking" | "mtb" | "vtt" => Self::MountainBiking,
            "cycling" | "ride" | "vélo" | "velo" | "cyclisme" => Self::Cycling,
            "swimming" | "swim" | "natation" => Self::Swimming,
            "climbing" | "escalade" => Self::Climbing,
            "paddleboarding" | "sup" => Self::Paddleboarding,
            "surfing" | "surf" => Self::Surfing,
            "kayaking" | "kayak" => Self::Kayaking,
            _ => Self::Other,
        }
    }

    /// Stable snake_case identifier (matches the serde representation)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::TrailRunning => "trail_running",
            Self::Walking => "walking",
            Self::Hiking => "hiking",
            Self::MountainBiking => "mountain_biking",
            Self::Cycling => "cycling",
            Self::Swimming => "swimming",
            Self::Climbing => "climbing",
            Self::Paddleboarding => "paddleboarding",
            Self::Surfing => "surfing",
            Self::Kayaking => "kayaking",
            Self::Other => "other",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::TrailRunning => "Trail running",
            Self::Walking => "Walking",
            Self::Hiking => "Hiking",
            Self::MountainBiking => "Mountain biking",
            Self::Cycling => "Cycling",
            Self::Swimming => "Swimming",
            Self::Climbing => "Climbing",
            Self::Paddleboarding => "Paddleboarding",
            Self::Surfing => "Surfing",
            Self::Kayaking => "Kayaking",
            Self::Other => "Activity",
        }
    }

    /// Broad category used for calorie and step estimation
    #[must_use]
    pub const fn category(&self) -> SportCategory {
        match self {
            Self::Running | Self::TrailRunning | Self::Walking | Self::Hiking | Self::Other => {
                SportCategory::Foot
            }
            Self::MountainBiking | Self::Cycling => SportCategory::Bike,
            Self::Swimming | Self::Paddleboarding | Self::Surfing | Self::Kayaking => {
                SportCategory::Water
            }
            Self::Climbing => SportCategory::Climb,
        }
    }
}

impl fmt::Display for SportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected speed band of a category, in km/h
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRange {
    /// Slowest meaningful pace
    pub min: f64,
    /// Typical cruising speed
    pub normal: f64,
    /// Fastest realistic speed
    pub max: f64,
}

/// Sport families sharing metric conventions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SportCategory {
    /// On foot (walking, running, hiking)
    Foot,
    /// Wheeled
    Bike,
    /// On or in the water
    Water,
    /// Climbing
    Climb,
}

impl SportCategory {
    /// Speed band used to scale calorie burn
    #[must_use]
    pub const fn speed_range(&self) -> SpeedRange {
        match self {
            Self::Foot => SpeedRange {
                min: 1.0,
                normal: 6.0,
                max: 20.0,
            },
            Self::Bike => SpeedRange {
                min: 5.0,
                normal: 25.0,
                max: 50.0,
            },
            Self::Water => SpeedRange {
                min: 1.0,
                normal: 3.0,
                max: 8.0,
            },
            Self::Climb => SpeedRange {
                min: 0.1,
                normal: 2.0,
                max: 5.0,
            },
        }
    }

    /// Relative calorie cost per kilometer compared to sports on foot
    #[must_use]
    pub const fn calories_multiplier(&self) -> f64 {
        match self {
            Self::Foot => 1.0,
            Self::Bike => 0.6,
            Self::Water => 1.2,
            Self::Climb => 1.5,
        }
    }

    /// Whether a step count is meaningful for this category
    #[must_use]
    pub const fn counts_steps(&self) -> bool {
        matches!(self, Self::Foot | Self::Climb)
    }
}
