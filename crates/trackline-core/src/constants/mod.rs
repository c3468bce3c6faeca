// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for filtering, acquisition, persistence and sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Unit conversion and measurement constants
pub mod units;

/// Sample filter constants
pub mod filter {
    /// Implied speed above `max_plausible_speed * TELEPORT_MARGIN` is treated as a GPS jump
    pub const TELEPORT_MARGIN: f64 = 2.0;

    /// Distance covered by one automatic split, in meters
    pub const SPLIT_UNIT_METERS: f64 = 1000.0;
}

/// Location acquisition loop constants
pub mod acquisition {
    /// Ceiling for a single fix request in milliseconds
    pub const FIX_REQUEST_TIMEOUT_MS: u64 = 10_000;

    /// Step by which the polling interval grows or shrinks, in milliseconds
    pub const INTERVAL_STEP_MS: u64 = 1_000;

    /// Consecutive timeouts before the loop slows down and reports itself inactive
    pub const SLOW_POLLING_THRESHOLD: u32 = 3;
}

/// Durable storage keys
pub mod storage_keys {
    /// Single-slot crash-recovery snapshot
    pub const SNAPSHOT: &str = "tracking_state_v1";

    /// Durable queue of finalized sessions awaiting delivery
    pub const SYNC_QUEUE: &str = "pending_sync_v1";

    /// Last unreadable copy of the sync queue, kept for inspection
    pub const SYNC_QUEUE_QUARANTINE: &str = "pending_sync_v1_corrupt";
}

/// Sync queue constants
pub mod sync {
    /// Failed retries after which a pending item is abandoned
    pub const MAX_RETRIES: u32 = 3;

    /// Pause between two items of the same flush pass, in milliseconds
    pub const ITEM_DELAY_MS: u64 = 1_000;

    /// Periodic connectivity re-check interval, in seconds
    pub const CHECK_INTERVAL_SECS: u64 = 30;

    /// First backoff step after a failed retry, in seconds
    pub const BACKOFF_BASE_SECS: u64 = 5;

    /// Upper bound of the exponential backoff, in seconds
    pub const BACKOFF_CAP_SECS: u64 = 300;
}

/// Remote session service defaults
pub mod remote {
    /// Default API base URL for local development
    pub const DEFAULT_API_URL: &str = "http://localhost:3000";

    /// Sessions endpoint path
    pub const SESSIONS_PATH: &str = "/api/sessions";

    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Default connection timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
}

/// Service identification for logs and exports
pub mod service_names {
    /// Engine service name
    pub const TRACKLINE: &str = "trackline";
}
