// ABOUTME: Core types and constants for the Trackline activity tracking engine
// ABOUTME: Foundation crate with error handling, domain models, sport profiles, and geodesy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Trackline Core
//!
//! Foundation crate providing shared types for the Trackline tracking engine.
//! This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Error taxonomy (`TrackingError`, `RemoteError`, `InvalidTransition`) and `ErrorCode`
//! - **constants**: Engine-wide constants organized by domain
//! - **models**: Fixes, track points, splits, tracking state and session payloads
//! - **config**: The sport profile registry
//! - **geo**: Great-circle distance
//! - **clock**: Wall-clock abstraction used by the state machine and split detector

/// Unified error handling with standard error codes
pub mod errors;

/// Engine constants organized by domain
pub mod constants;

/// Core data models (Fix, TrackingState, Split, SportKind, ...)
pub mod models;

/// Sport profile registry (filtering and polling parameters per sport)
pub mod config;

/// Geodesy helpers
pub mod geo;

/// Clock abstraction for deterministic time handling
pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::profiles::{profile_for, SportProfile};
pub use errors::{
    ErrorCode, InvalidTransition, RemoteError, SessionAction, TrackingError, TrackingResult,
};
pub use models::{
    Fix, PendingSyncItem, SessionPayload, SessionStatus, SportCategory, SportKind, Split,
    SplitKind, TrackPoint, TrackingState,
};
