// ABOUTME: Unified error types for the tracking engine with stable error codes
// ABOUTME: Separates recoverable faults (timeouts, sync failures) from caller-facing failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Every fault the engine can observe maps onto one `TrackingError` variant and
//! one stable `ErrorCode`. Most of them are recoverable by design:
//!
//! - `FixTimeout` only drives the acquisition backoff
//! - `SnapshotCorrupt` is recovered by discarding the slot and starting fresh
//! - `Remote` failures are queued and retried by the sync queue
//!
//! Rejected location samples are *not* errors; see `models::RejectReason`.

/// Errors raised by the remote session service
pub mod remote;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::SessionStatus;

pub use remote::RemoteError;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Location (1000-1999)
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1000,
    #[serde(rename = "FIX_TIMEOUT")]
    FixTimeout = 1001,
    #[serde(rename = "LOCATION_UNAVAILABLE")]
    LocationUnavailable = 1002,

    // Session lifecycle (2000-2999)
    #[serde(rename = "INVALID_TRANSITION")]
    InvalidTransition = 2000,

    // Persistence (3000-3999)
    #[serde(rename = "SNAPSHOT_CORRUPT")]
    SnapshotCorrupt = 3000,
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 3001,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 3002,

    // Remote service (4000-4999)
    #[serde(rename = "SYNC_FAILURE")]
    SyncFailure = 4000,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6000,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location permission is required to record a track",
            Self::FixTimeout => "The location service did not answer in time",
            Self::LocationUnavailable => "Location is currently unavailable",
            Self::InvalidTransition => "This action is not allowed in the current session state",
            Self::SnapshotCorrupt => "The saved tracking state could not be read",
            Self::StorageError => "Local storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::SyncFailure => "The session could not be delivered to the server",
            Self::ConfigInvalid => "Configuration is invalid",
        }
    }

    /// Whether the failure should be presented to the end user
    ///
    /// Only a persistent "location unavailable" indicator and state-machine
    /// refusals are ever user-visible.
    #[must_use]
    pub const fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied | Self::LocationUnavailable | Self::InvalidTransition
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Session lifecycle action attempted against the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    /// `start()`
    Start,
    /// `pause()`
    Pause,
    /// `resume()`
    Resume,
    /// `stop()`
    Stop,
    /// `reset()`
    Reset,
    /// Manual split request
    ManualSplit,
    /// Sport selection
    SelectSport,
    /// Handing a stopped session to the sync queue
    Finalize,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
            Self::Reset => "reset",
            Self::ManualSplit => "manual_split",
            Self::SelectSport => "select_sport",
            Self::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// A guarded state-machine transition that was refused
///
/// Returned as the `Err` side of every transition attempt. Refusal never
/// mutates the tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} while session is {from}")]
pub struct InvalidTransition {
    /// Status the session was in when the action was attempted
    pub from: SessionStatus,
    /// The refused action
    pub action: SessionAction,
}

/// Engine error taxonomy
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Foreground location permission was not granted
    #[error("location permission denied")]
    PermissionDenied,

    /// A single fix request exceeded its ceiling
    #[error("location fix timed out after {timeout_ms} ms")]
    FixTimeout {
        /// Ceiling that was exceeded
        timeout_ms: u64,
    },

    /// The platform location service failed
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    /// The snapshot slot held unreadable data
    #[error("snapshot corrupt: {0}")]
    SnapshotCorrupt(String),

    /// Durable key-value store failure
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON encoding/decoding failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote session service failure
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Refused state-machine transition
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),
}

impl TrackingError {
    /// Create a storage error from any displayable source
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::Storage(message.to_string())
    }

    /// Map this error onto its stable code
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::PermissionDenied => ErrorCode::PermissionDenied,
            Self::FixTimeout { .. } => ErrorCode::FixTimeout,
            Self::LocationUnavailable(_) => ErrorCode::LocationUnavailable,
            Self::SnapshotCorrupt(_) => ErrorCode::SnapshotCorrupt,
            Self::Storage(_) => ErrorCode::StorageError,
            Self::Serialization(_) => ErrorCode::SerializationError,
            Self::Remote(_) => ErrorCode::SyncFailure,
            Self::InvalidTransition(_) => ErrorCode::InvalidTransition,
            Self::Config(_) => ErrorCode::ConfigInvalid,
        }
    }

    /// Whether retrying the same operation later may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::FixTimeout { .. } | Self::LocationUnavailable(_) | Self::Storage(_) => true,
            Self::Remote(remote) => remote.is_retryable(),
            Self::PermissionDenied
            | Self::SnapshotCorrupt(_)
            | Self::Serialization(_)
            | Self::InvalidTransition(_)
            | Self::Config(_) => false,
        }
    }
}

/// Result type used across the engine
pub type TrackingResult<T> = Result<T, TrackingError>;
