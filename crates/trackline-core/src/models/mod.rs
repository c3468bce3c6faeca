// ABOUTME: Core data models for tracked sessions
// ABOUTME: Sport kinds, fixes, track points, splits, tracking state and sync payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Raw fixes, accepted track points and filter decisions
pub mod fix;
/// Finalized session payload and sync queue entries
pub mod payload;
/// Sport kinds and categories
pub mod sport;
/// Split records and statistics
pub mod split;
/// Tracking state aggregate and session status
pub mod state;

pub use fix::{Fix, RejectReason, TrackPoint};
pub use payload::{PendingSyncItem, SessionPayload, COMPLETED_STATUS};
pub use sport::{SpeedRange, SportCategory, SportKind};
pub use split::{Split, SplitKind, SplitStats};
pub use state::{SessionStatus, TrackingState};
