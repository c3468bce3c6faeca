// ABOUTME: Main library entry point for the Trackline activity tracking engine
// ABOUTME: GPS sample filtering, splits, session lifecycle, crash recovery and offline-first sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Trackline
//!
//! Offline-first engine that turns a noisy stream of GPS fixes into a
//! trustworthy activity record.
//!
//! ## Features
//!
//! - **Sample filter**: accuracy, jitter and teleport rejection tuned per sport
//! - **Accumulators**: distance, moving-average speed, elevation gain/loss, splits
//! - **Session lifecycle**: guarded Idle/Running/Paused/Stopped state machine
//! - **Crash recovery**: single-slot snapshot restored on launch
//! - **Sync queue**: durable retry queue with exponential backoff
//!
//! ## Architecture
//!
//! - **tracking**: synchronous core owning the live `TrackingState`
//! - **acquisition**: adaptive polling of the platform location service
//! - **snapshot** / **storage**: durable key-value persistence
//! - **sync**: delivery of finished sessions to the remote service
//! - **tracker**: async orchestrator tying the pieces together
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trackline::config::EngineConfig;
//! use trackline::storage::FileStore;
//! use trackline::sync::SyncQueue;
//! use trackline::tracker::Tracker;
//! use trackline_core::{SportKind, SystemClock};
//! use trackline_remote::HttpSessionService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::from_env()?;
//!     let clock = Arc::new(SystemClock);
//!     let store = Arc::new(FileStore::open(&config.storage.data_dir).await?);
//!     let remote = Arc::new(HttpSessionService::new(config.remote.to_settings()));
//!     let sync = Arc::new(SyncQueue::new(store.clone(), remote.clone(), clock.clone(), config.sync));
//!
//!     let mut tracker = Tracker::new(clock, store, remote, sync, config.acquisition);
//!     tracker.restore().await?;
//!     tracker.start(SportKind::Hiking).await?;
//!     Ok(())
//! }
//! ```

/// Location acquisition loop and the location service contract
pub mod acquisition;

/// Environment-driven engine configuration
pub mod config;

/// Session export formats (GPX)
pub mod export;

/// Logging configuration and structured tracking events
pub mod logging;

/// Crash-recovery snapshot slot
pub mod snapshot;

/// Durable key-value storage backends
pub mod storage;

/// Offline-first sync queue and background worker
pub mod sync;

/// Async orchestrator owning the live session
pub mod tracker;

/// Synchronous tracking core
pub mod tracking;

pub use trackline_core as core;
pub use trackline_remote as remote;
