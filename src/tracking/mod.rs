// ABOUTME: Tracking core: sample filter, elevation, splits, state machine, metrics and engine
// ABOUTME: Synchronous and I/O free so every rule can be tested with a manual clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tracking
//!
//! Data flows one way: a fix passes the [`filter`], accepted fixes feed the
//! [`elevation`] accumulator and the [`splits`] detector, and the [`session`]
//! state machine decides whether fixes are accumulated at all. The
//! [`engine::TrackingEngine`] ties them together around one `TrackingState`.

/// Elevation gain/loss accumulator
pub mod elevation;
/// Engine owning the live state
pub mod engine;
/// Sample filter and distance accumulator
pub mod filter;
/// Calorie and step estimates
pub mod metrics;
/// Session lifecycle state machine
pub mod session;
/// Auto and manual split detection
pub mod splits;

pub use engine::{FilterDiagnostics, FixOutcome, TrackingEngine, TrackingView};
pub use filter::{AcceptedSample, FilterDecision};
