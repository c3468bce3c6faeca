// ABOUTME: Crash-recovery snapshot manager for the live tracking state
// ABOUTME: Single-slot JSON snapshot overwritten on every meaningful change and restored on launch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Snapshot Manager
//!
//! The slot holds one [`Snapshot`]: the full `TrackingState`, the sport
//! profile chosen at start, and the session identifier. It is written while a
//! session is Running or Paused (and once more at Stop), and cleared only when
//! the session is discarded or handed to the sync queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use trackline_core::constants::storage_keys;
use trackline_core::errors::TrackingResult;
use trackline_core::models::{SessionStatus, TrackingState};
use trackline_core::SportProfile;

use crate::logging::TrackingLogger;
use crate::storage::{self, KeyValueStore};

/// Serialized copy of the live session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Session identifier
    pub session_id: Option<String>,
    /// Profile the session was started with
    pub profile: SportProfile,
    /// Complete tracking state
    pub state: TrackingState,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
}

/// Result of reading the slot at launch
#[derive(Debug, Clone, PartialEq)]
pub enum Restore {
    /// Nothing usable stored; start Idle
    Empty,
    /// A Running or Paused session: hydrate and restart acquisition
    Live(Snapshot),
    /// A Stopped (or Idle) session: hydrate for display only
    Finished(Snapshot),
}

/// Reads and writes the snapshot slot
#[derive(Clone)]
pub struct SnapshotManager {
    store: Arc<dyn KeyValueStore>,
}

impl SnapshotManager {
    /// Manager over the given store
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrite the slot
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub async fn save(&self, snapshot: &Snapshot) -> TrackingResult<()> {
        storage::put_json(self.store.as_ref(), storage_keys::SNAPSHOT, snapshot).await?;
        TrackingLogger::log_snapshot_write(
            snapshot.session_id.as_deref(),
            snapshot.state.status,
            snapshot.state.path.len(),
        );
        Ok(())
    }

    /// Read the slot
    ///
    /// Corrupt contents are logged, removed and reported as `Empty`; they
    /// never fail the launch.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself cannot be read
    pub async fn restore(&self) -> TrackingResult<Restore> {
        let Some(bytes) = self.store.get(storage_keys::SNAPSHOT).await? else {
            return Ok(Restore::Empty);
        };

        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) if snapshot.state.status.is_live() => Ok(Restore::Live(snapshot)),
            Ok(snapshot) if snapshot.state.status == SessionStatus::Idle
                && snapshot.state.started_at.is_none()
                && snapshot.state.path.is_empty() =>
            {
                Ok(Restore::Empty)
            }
            Ok(snapshot) => Ok(Restore::Finished(snapshot)),
            Err(e) => {
                warn!(error = %e, "Snapshot slot is corrupt, starting fresh");
                if let Err(remove_err) = self.store.remove(storage_keys::SNAPSHOT).await {
                    warn!(error = %remove_err, "Failed to remove corrupt snapshot");
                }
                Ok(Restore::Empty)
            }
        }
    }

    /// Empty the slot
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    pub async fn clear(&self) -> TrackingResult<()> {
        self.store.remove(storage_keys::SNAPSHOT).await
    }
}
