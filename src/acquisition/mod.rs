// ABOUTME: Location acquisition loop polling the platform location service on an adaptive interval
// ABOUTME: Emits fixes over a channel and publishes an observable status; never fails after start
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Acquisition Loop
//!
//! After permission is granted, one background task requests a fix per tick.
//! Each request is raced against a fixed ceiling. Fixes with a new timestamp
//! are forwarded to the [`AcquisitionHandle`]; failures only move the
//! [`PollState`] backoff and, once sustained, flip the observable status to
//! [`AcquisitionStatus::Inactive`]. No fix is ever synthesized.

/// Adaptive polling policy
pub mod policy;

pub use policy::{FixVerdict, PollState};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use trackline_core::errors::{TrackingError, TrackingResult};
use trackline_core::models::Fix;
use trackline_core::SportProfile;

use crate::config::AcquisitionConfig;

/// Buffered fixes between the loop and its consumer
const FIX_CHANNEL_CAPACITY: usize = 64;

/// Foreground location permission answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Fixes may be requested
    Granted,
    /// The user refused
    Denied,
}

/// Platform location service
#[async_trait]
pub trait LocationService: Send + Sync {
    /// Ask for foreground location permission
    async fn request_permission(&self) -> PermissionStatus;

    /// Request one fix
    ///
    /// The loop also enforces `timeout` itself and drops the future when it
    /// expires, so implementations must be cancel-safe.
    ///
    /// # Errors
    ///
    /// Returns `FixTimeout` or `LocationUnavailable` when no fix can be produced
    async fn get_fix(&self, timeout: Duration) -> TrackingResult<Fix>;
}

/// Observable state of the acquisition loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionStatus {
    /// Waiting for the first fix
    #[default]
    Locating,
    /// Fixes are arriving
    Active,
    /// Sustained timeouts; surfaced as "location unavailable"
    Inactive,
    /// Permission was refused; the loop never started
    PermissionDenied,
    /// The loop has exited
    Stopped,
}

impl AcquisitionStatus {
    /// Whether the user should see a "location unavailable" indicator
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Inactive | Self::PermissionDenied)
    }
}

impl fmt::Display for AcquisitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Locating => "locating",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::PermissionDenied => "permission_denied",
            Self::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

/// Starts acquisition loops
pub struct AcquisitionLoop;

impl AcquisitionLoop {
    /// Request permission and spawn the polling task
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if the user refuses; no task is spawned
    pub async fn start(
        service: Arc<dyn LocationService>,
        profile: &SportProfile,
        config: &AcquisitionConfig,
    ) -> TrackingResult<AcquisitionHandle> {
        if service.request_permission().await == PermissionStatus::Denied {
            warn!(sport = %profile.sport, "Location permission denied, acquisition not started");
            return Err(TrackingError::PermissionDenied);
        }

        let (fix_tx, fix_rx) = mpsc::channel(FIX_CHANNEL_CAPACITY);
        let (status_tx, status_rx) = watch::channel(AcquisitionStatus::Locating);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let policy = PollState::new(profile, config);
        info!(
            sport = %profile.sport,
            interval_ms = policy.current_interval().as_millis() as u64,
            "Location acquisition started"
        );

        let task = tokio::spawn(run(
            service,
            policy,
            config.fix_timeout,
            fix_tx,
            status_tx,
            shutdown_rx,
        ));

        Ok(AcquisitionHandle {
            fixes: fix_rx,
            status: status_rx,
            shutdown: shutdown_tx,
            task: Some(task),
        })
    }
}

async fn run(
    service: Arc<dyn LocationService>,
    mut policy: PollState,
    fix_timeout: Duration,
    fixes: mpsc::Sender<Fix>,
    status: watch::Sender<AcquisitionStatus>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let request = tokio::time::timeout(fix_timeout, service.get_fix(fix_timeout));
        let result = tokio::select! {
            _ = shutdown.changed() => break,
            result = request => result,
        };

        match result {
            Ok(Ok(fix)) => match policy.on_fix(fix.timestamp) {
                FixVerdict::Emit => {
                    status.send_if_modified(|s| replace_status(s, AcquisitionStatus::Active));
                    let delivered = tokio::select! {
                        _ = shutdown.changed() => break,
                        sent = fixes.send(fix) => sent.is_ok(),
                    };
                    if !delivered {
                        debug!("Fix consumer dropped, stopping acquisition");
                        break;
                    }
                }
                FixVerdict::Duplicate => debug!("Discarded cached duplicate fix"),
            },
            Ok(Err(e)) => {
                debug!(error = %e, "Fix request failed");
                on_failure(&mut policy, &status);
            }
            Err(_) => {
                debug!(timeout_ms = fix_timeout.as_millis() as u64, "Fix request timed out");
                on_failure(&mut policy, &status);
            }
        }

        tokio::select! {
            _ = shutdown.changed() => break,
            () = tokio::time::sleep(policy.current_interval()) => {}
        }
    }

    status.send_replace(AcquisitionStatus::Stopped);
    debug!("Location acquisition stopped");
}

fn on_failure(policy: &mut PollState, status: &watch::Sender<AcquisitionStatus>) {
    policy.on_failure();
    if policy.is_inactive() {
        let flipped =
            status.send_if_modified(|s| replace_status(s, AcquisitionStatus::Inactive));
        if flipped {
            warn!(
                consecutive_timeouts = policy.consecutive_timeouts(),
                interval_ms = policy.current_interval().as_millis() as u64,
                "Location unavailable"
            );
        }
    }
}

fn replace_status(current: &mut AcquisitionStatus, next: AcquisitionStatus) -> bool {
    if *current == next {
        return false;
    }
    *current = next;
    true
}

/// Consumer side of a running acquisition loop
///
/// Dropping the handle aborts the task; [`AcquisitionHandle::stop`] shuts it
/// down cleanly and waits for it.
pub struct AcquisitionHandle {
    fixes: mpsc::Receiver<Fix>,
    status: watch::Receiver<AcquisitionStatus>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl AcquisitionHandle {
    /// Next fix, or `None` once the loop has exited and the buffer is drained
    pub async fn recv_fix(&mut self) -> Option<Fix> {
        self.fixes.recv().await
    }

    /// Next buffered fix without waiting
    pub fn try_recv_fix(&mut self) -> Option<Fix> {
        self.fixes.try_recv().ok()
    }

    /// Current loop status
    #[must_use]
    pub fn status(&self) -> AcquisitionStatus {
        *self.status.borrow()
    }

    /// Receiver for status changes
    #[must_use]
    pub fn status_watch(&self) -> watch::Receiver<AcquisitionStatus> {
        self.status.clone()
    }

    /// Whether the loop task is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the pending timer and any in-flight request
    ///
    /// Stopping an already stopped loop is a no-op.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        self.shutdown.send_replace(true);
        if let Err(e) = task.await {
            warn!(error = %e, "Acquisition task ended abnormally");
        }
    }
}

impl Drop for AcquisitionHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
